//! Prelude
pub use embedded_hal::prelude::*;

pub use crate::digital::DigitalIo as _tinycore_hal_digital_DigitalIo;
pub use crate::variant::Variant as _tinycore_hal_variant_Variant;

pub use crate::adc::{AdcError, Gain, Reference};
pub use crate::digital::{Level, PinMode};
pub use crate::pins::adc_ch;
