//! Pin capability resolution and analog I/O for ATtiny parts.
//!
//! A logical pin number is mapped to its port, bit mask, timer channel and ADC
//! channel through per-part capability tables ([`variant`]). On top of that
//! lookup the [`Mcu`] drives the ADC ([`adc`]) and routes duty-cycle requests
//! to the right timer compare unit ([`pwm`]), falling back to a plain digital
//! level when a pin has no timer.
//!
//! The part is a type parameter, so the register layout and the PWM decision
//! table are picked by the compiler. Firmware usually selects exactly one part
//! with a cargo feature and uses the [`Chip`] alias.
//!
//! ```ignore
//! use tinycore_hal::{prelude::*, reg::Mmio, Chip, Mcu};
//!
//! let mut mcu: Mcu<Chip, Mmio> = Mcu::new(unsafe { Mmio::steal() });
//! mcu.analog_write(0, 100);
//! let raw = mcu.analog_read(adc_ch(0));
//! ```
#![no_std]

#[macro_use]
mod fmt;

pub mod adc;
pub mod digital;
pub mod mcu;
pub mod pins;
pub mod prelude;
pub mod pwm;
pub mod reg;
pub mod resolve;
pub mod sim;
pub mod variant;

pub use mcu::Mcu;
pub use variant::Variant;

mod private {
    /// Super trait used to mark traits with an exhaustive set of
    /// implementations
    pub trait Sealed {}
}

pub(crate) use private::Sealed;

#[cfg(any(
    all(feature = "attiny85", any(feature = "attiny84", feature = "attiny861", feature = "attiny167", feature = "attiny841", feature = "attiny2313")),
    all(feature = "attiny84", any(feature = "attiny861", feature = "attiny167", feature = "attiny841", feature = "attiny2313")),
    all(feature = "attiny861", any(feature = "attiny167", feature = "attiny841", feature = "attiny2313")),
    all(feature = "attiny167", any(feature = "attiny841", feature = "attiny2313")),
    all(feature = "attiny841", feature = "attiny2313"),
))]
compile_error!("Select at most one target part feature");

/// The part selected with a cargo feature
#[cfg(feature = "attiny85")]
pub type Chip = variant::Attiny85;
/// The part selected with a cargo feature
#[cfg(feature = "attiny84")]
pub type Chip = variant::Attiny84;
/// The part selected with a cargo feature
#[cfg(feature = "attiny861")]
pub type Chip = variant::Attiny861;
/// The part selected with a cargo feature
#[cfg(feature = "attiny167")]
pub type Chip = variant::Attiny167;
/// The part selected with a cargo feature
#[cfg(feature = "attiny841")]
pub type Chip = variant::Attiny841;
/// The part selected with a cargo feature
#[cfg(feature = "attiny2313")]
pub type Chip = variant::Attiny2313;
