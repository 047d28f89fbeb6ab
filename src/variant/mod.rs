//! # Part variants
//!
//! A [`Variant`] is the build-time constant set of one ATtiny part: pin
//! counts, capability tables, register addresses, and the statically selected
//! ADC layout and PWM decision table. Variants are uninhabited marker types.
//! Everything they carry is a constant or an associated type, so the tables
//! themselves are the only thing left at run-time.
//!
//! | Variant | ADC layout | PWM routing |
//! |---|---|---|
//! | [`Attiny85`] | [`AdmuxRefs2`](crate::adc::AdmuxRefs2) | [`Tiny85Pwm`] |
//! | [`Attiny84`] | [`Admux`](crate::adc::Admux) | [`Tiny84Pwm`] |
//! | [`Attiny861`] | [`ScatteredMux`](crate::adc::ScatteredMux) | [`Tiny861Pwm`] |
//! | [`Attiny167`] | [`Admux`](crate::adc::Admux) | [`Tiny167Pwm`] |
//! | [`Attiny841`] | [`SplitMux`](crate::adc::SplitMux) | [`Tiny841Pwm`] |
//! | [`Attiny2313`] | [`NoAdc`](crate::adc::NoAdc) | [`Tiny2313Pwm`] |
use crate::{
    adc::{AdcLayout, AdcRegisters, Gain, Reference},
    pins::{Port, NOT_A_REGISTER},
    pwm::PwmRouting,
    reg::{Addr, RegisterBit},
    Sealed,
};

/// Build-time description of one ATtiny part
pub trait Variant: Sealed + 'static {
    const NAME: &'static str;

    const NUM_DIGITAL_PINS: u8;
    const NUM_ANALOG_INPUTS: u8;

    /// Port id per logical pin, [`NOT_A_PORT`](crate::pins::NOT_A_PORT) if none
    const DIGITAL_PIN_TO_PORT: &'static [u8];
    /// Bit mask within the port per logical pin
    const DIGITAL_PIN_TO_BIT_MASK: &'static [u8];
    /// Timer byte per logical pin, decoded by [`TimerChannel`](crate::pins::TimerChannel)
    const DIGITAL_PIN_TO_TIMER: &'static [u8];
    /// ADC mux channel per logical pin, [`NOT_A_CHANNEL`](crate::pins::NOT_A_CHANNEL) if none
    const DIGITAL_PIN_TO_ANALOG_INPUT: &'static [u8];

    /// PINx address per port id
    const PORT_TO_INPUT: &'static [u8];
    /// PORTx address per port id
    const PORT_TO_OUTPUT: &'static [u8];
    /// DDRx address per port id
    const PORT_TO_MODE: &'static [u8];

    const ADC: AdcRegisters;
    /// Legal references and their register code
    const REFERENCES: &'static [(Reference, u8)];
    const DEFAULT_REFERENCE: Reference;
    /// Legal gain settings and their register code, empty without gain select
    const GAINS: &'static [(Gain, u8)];
    /// Bipolar input mode bit, if the part has one
    const BIPOLAR: Option<RegisterBit>;

    type Adc: AdcLayout;
    type Pwm: PwmRouting;
}

/// Number of slots in a port table: `NOT_A_PORT` plus ports A to D
pub(crate) const PORT_SLOTS: usize = 5;

/// Build a port table indexed by port id
pub(crate) const fn port_table(entries: &[(Port, Addr)]) -> [u8; PORT_SLOTS] {
    let mut table = [NOT_A_REGISTER; PORT_SLOTS];
    let mut i = 0;
    while i < entries.len() {
        let (port, addr) = entries[i];
        assert!(addr != 0 && addr <= 0xFF, "port registers must live in the first 256 bytes");
        table[port as usize] = addr as u8;
        i += 1;
    }
    table
}

/// Declare the capability tables of a variant
///
/// Every row is `(logical pin, port, bit, timer byte, analog input)`. Besides
/// the four tables this generates a `PIN_Pxn` constant per row and checks at
/// compile time that the logical pin numbers are dense and in order.
macro_rules! pin_table {
    ($(($num:literal, $Port:ident, $bit:literal, $timer:expr, $adc:expr),)+) => {
        paste::paste! {
            $(
                #[doc = "Logical pin number of P" $Port $bit]
                pub const [<PIN_P $Port $bit>]: u8 = $num;
            )+
        }

        const PIN_COUNT: usize = [$($num),+].len();
        const PORT: [u8; PIN_COUNT] = [$($crate::pins::Port::$Port as u8),+];
        const BIT_MASK: [u8; PIN_COUNT] = [$(1u8 << $bit),+];
        const TIMER: [u8; PIN_COUNT] = [$($timer),+];
        const ANALOG_INPUT: [u8; PIN_COUNT] = [$($adc),+];

        const _: () = {
            let nums: [usize; PIN_COUNT] = [$($num),+];
            let mut i = 0;
            while i < PIN_COUNT {
                assert!(nums[i] == i, "logical pins must be numbered densely and in order");
                i += 1;
            }
            assert!(PIN_COUNT < $crate::pins::NOT_A_PIN as usize);
        };
    };
}

/// Declare a variant marker type and implement [`Variant`] for it from the
/// tables generated by `pin_table!` in the same module
macro_rules! variant {
    (
        $(#[$meta:meta])*
        $Variant:ident {
            name: $name:literal,
            analog_inputs: $analog:expr,
            ports: [$(($Port:ident, $pin:expr, $out:expr, $ddr:expr)),+ $(,)?],
            adc: $adc:expr,
            references: $refs:expr,
            default_reference: $default:expr,
            gains: $gains:expr,
            bipolar: $bipolar:expr,
            layout: $Layout:ty,
            pwm: $Pwm:ty $(,)?
        }
    ) => {
        $(#[$meta])*
        pub enum $Variant {}

        impl $crate::Sealed for $Variant {}

        impl $crate::variant::Variant for $Variant {
            const NAME: &'static str = $name;
            const NUM_DIGITAL_PINS: u8 = PIN_COUNT as u8;
            const NUM_ANALOG_INPUTS: u8 = $analog;
            const DIGITAL_PIN_TO_PORT: &'static [u8] = &PORT;
            const DIGITAL_PIN_TO_BIT_MASK: &'static [u8] = &BIT_MASK;
            const DIGITAL_PIN_TO_TIMER: &'static [u8] = &TIMER;
            const DIGITAL_PIN_TO_ANALOG_INPUT: &'static [u8] = &ANALOG_INPUT;
            const PORT_TO_INPUT: &'static [u8] = &$crate::variant::port_table(&[
                $(($crate::pins::Port::$Port, $pin)),+
            ]);
            const PORT_TO_OUTPUT: &'static [u8] = &$crate::variant::port_table(&[
                $(($crate::pins::Port::$Port, $out)),+
            ]);
            const PORT_TO_MODE: &'static [u8] = &$crate::variant::port_table(&[
                $(($crate::pins::Port::$Port, $ddr)),+
            ]);
            const ADC: $crate::adc::AdcRegisters = $adc;
            const REFERENCES: &'static [($crate::adc::Reference, u8)] = $refs;
            const DEFAULT_REFERENCE: $crate::adc::Reference = $default;
            const GAINS: &'static [($crate::adc::Gain, u8)] = $gains;
            const BIPOLAR: Option<$crate::reg::RegisterBit> = $bipolar;
            type Adc = $Layout;
            type Pwm = $Pwm;
        }

        const _: () = {
            let mut analog: u8 = 0;
            let mut i = 0;
            while i < PIN_COUNT {
                if ANALOG_INPUT[i] != $crate::pins::NOT_A_CHANNEL {
                    analog += 1;
                }
                i += 1;
            }
            assert!(analog <= $analog, "more analog pins than analog inputs");
        };
    };
}

// The part modules use `pin_table!` and `variant!` by textual scope
pub mod attiny167;
pub mod attiny2313;
pub mod attiny84;
pub mod attiny841;
pub mod attiny85;
pub mod attiny861;

pub use attiny167::{Attiny167, Tiny167Pwm};
pub use attiny2313::{Attiny2313, Tiny2313Pwm};
pub use attiny84::{Attiny84, Tiny84Pwm};
pub use attiny841::{Attiny841, Tiny841Pwm};
pub use attiny85::{Attiny85, Tiny85Pwm};
pub use attiny861::{Attiny861, Tiny861Pwm};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::{NOT_A_CHANNEL, NOT_A_PORT};

    fn check_tables<V: Variant>() {
        let n = V::NUM_DIGITAL_PINS as usize;
        assert_eq!(V::DIGITAL_PIN_TO_PORT.len(), n, "{}", V::NAME);
        assert_eq!(V::DIGITAL_PIN_TO_BIT_MASK.len(), n, "{}", V::NAME);
        assert_eq!(V::DIGITAL_PIN_TO_TIMER.len(), n, "{}", V::NAME);
        assert_eq!(V::DIGITAL_PIN_TO_ANALOG_INPUT.len(), n, "{}", V::NAME);
        for pin in 0..n {
            let port = V::DIGITAL_PIN_TO_PORT[pin];
            assert_ne!(port, NOT_A_PORT);
            assert_ne!(V::PORT_TO_OUTPUT[port as usize], NOT_A_REGISTER);
            assert_ne!(V::PORT_TO_INPUT[port as usize], NOT_A_REGISTER);
            assert_ne!(V::PORT_TO_MODE[port as usize], NOT_A_REGISTER);
            assert_eq!(V::DIGITAL_PIN_TO_BIT_MASK[pin].count_ones(), 1);
            let ch = V::DIGITAL_PIN_TO_ANALOG_INPUT[pin];
            assert!(ch == NOT_A_CHANNEL || ch < 0x40, "{} pin {}", V::NAME, pin);
        }
        // no two logical pins share a port bit
        for a in 0..n {
            for b in (a + 1)..n {
                assert!(
                    V::DIGITAL_PIN_TO_PORT[a] != V::DIGITAL_PIN_TO_PORT[b]
                        || V::DIGITAL_PIN_TO_BIT_MASK[a] != V::DIGITAL_PIN_TO_BIT_MASK[b],
                    "{} pins {} and {}",
                    V::NAME,
                    a,
                    b
                );
            }
        }
        assert!(V::REFERENCES.iter().any(|(r, _)| *r == V::DEFAULT_REFERENCE));
    }

    #[test]
    fn tables_are_consistent() {
        check_tables::<Attiny85>();
        check_tables::<Attiny84>();
        check_tables::<Attiny861>();
        check_tables::<Attiny167>();
        check_tables::<Attiny841>();
        check_tables::<Attiny2313>();
    }

    #[test]
    fn port_table_leaves_missing_ports_empty() {
        let table = port_table(&[(Port::B, 0x38), (Port::D, 0x32)]);
        assert_eq!(table, [NOT_A_REGISTER, NOT_A_REGISTER, 0x38, NOT_A_REGISTER, 0x32]);
    }
}
