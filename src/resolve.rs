//! # Resolved accessor
//!
//! Turns a logical pin (or a port id) into the value stored for it in one of
//! the capability tables. There are two paths with the same result for the
//! same `(table, index)`:
//!
//! - [`resolve_const`] is a `const fn`. Through [`Resolved`] it is evaluated
//!   by the compiler, so a pin number known at build time costs no table read
//!   at all.
//! - [`resolve`] reads the table at run-time.
//!
//! Indices at or beyond the table never touch memory; they resolve to the
//! sentinel of the table. The typed helpers at the end of this module convert
//! sentinels into `Option`s so callers do not compare raw bytes.
use core::marker::PhantomData;

use crate::{
    pins::{
        PinBinding, Port, PortRegisters, TimerChannel, NOT_A_CHANNEL, NOT_A_PIN, NOT_A_PORT,
        NOT_A_REGISTER, NOT_A_TIMER,
    },
    reg::Addr,
    variant::Variant,
};

/// One of the capability tables of a [`Variant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Table {
    /// Pin to port id
    Port,
    /// Pin to bit mask
    BitMask,
    /// Pin to timer byte
    Timer,
    /// Pin to ADC mux channel
    AnalogInput,
    /// Port id to PINx
    PortInput,
    /// Port id to PORTx
    PortOutput,
    /// Port id to DDRx
    PortMode,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Port,
        Table::BitMask,
        Table::Timer,
        Table::AnalogInput,
        Table::PortInput,
        Table::PortOutput,
        Table::PortMode,
    ];

    /// Value an out of range index resolves to
    pub const fn sentinel(self) -> u8 {
        match self {
            Table::Port => NOT_A_PORT,
            Table::BitMask => NOT_A_PIN,
            Table::Timer => NOT_A_TIMER,
            Table::AnalogInput => NOT_A_CHANNEL,
            Table::PortInput | Table::PortOutput | Table::PortMode => NOT_A_REGISTER,
        }
    }

    /// Tables indexed by logical pin rather than port id
    pub const fn is_pin_table(self) -> bool {
        matches!(
            self,
            Table::Port | Table::BitMask | Table::Timer | Table::AnalogInput
        )
    }

    pub const fn data<V: Variant>(self) -> &'static [u8] {
        match self {
            Table::Port => V::DIGITAL_PIN_TO_PORT,
            Table::BitMask => V::DIGITAL_PIN_TO_BIT_MASK,
            Table::Timer => V::DIGITAL_PIN_TO_TIMER,
            Table::AnalogInput => V::DIGITAL_PIN_TO_ANALOG_INPUT,
            Table::PortInput => V::PORT_TO_INPUT,
            Table::PortOutput => V::PORT_TO_OUTPUT,
            Table::PortMode => V::PORT_TO_MODE,
        }
    }

    #[inline]
    const fn in_range<V: Variant>(self, index: u8) -> bool {
        if self.is_pin_table() && index >= V::NUM_DIGITAL_PINS {
            return false;
        }
        (index as usize) < self.data::<V>().len()
    }
}

/// Look up `index` in `table`, evaluated by the compiler when used in a
/// constant context
pub const fn resolve_const<V: Variant>(table: Table, index: u8) -> u8 {
    if !table.in_range::<V>(index) {
        return table.sentinel();
    }
    table.data::<V>()[index as usize]
}

/// Look up `index` in `table` at run-time
#[inline]
pub fn resolve<V: Variant>(table: Table, index: u8) -> u8 {
    if !table.in_range::<V>(index) {
        return table.sentinel();
    }
    match table.data::<V>().get(index as usize) {
        Some(value) => *value,
        None => table.sentinel(),
    }
}

/// Capabilities of pin `PIN`, computed at build time
///
/// ```ignore
/// type Led = Resolved<Attiny85, 1>;
/// const MASK: u8 = Led::BIT_MASK;
/// ```
pub struct Resolved<V: Variant, const PIN: u8> {
    _variant: PhantomData<V>,
}

impl<V: Variant, const PIN: u8> Resolved<V, PIN> {
    pub const PORT: u8 = resolve_const::<V>(Table::Port, PIN);
    pub const BIT_MASK: u8 = resolve_const::<V>(Table::BitMask, PIN);
    pub const TIMER: u8 = resolve_const::<V>(Table::Timer, PIN);
    pub const ANALOG_INPUT: u8 = resolve_const::<V>(Table::AnalogInput, PIN);
    pub const TIMER_CHANNEL: TimerChannel = TimerChannel::from_code(Self::TIMER);

    /// Mux channel of `PIN`; referencing this fails the build when the pin has
    /// no analog input
    pub const CHECKED_ANALOG_INPUT: u8 = {
        assert!(PIN < V::NUM_DIGITAL_PINS, "pin does not exist on this part");
        assert!(Self::ANALOG_INPUT != NOT_A_CHANNEL, "pin has no analog input");
        Self::ANALOG_INPUT
    };
}

//==================================================================================================
//  Typed views
//==================================================================================================

#[inline]
pub fn digital_pin_to_port<V: Variant>(pin: u8) -> Option<Port> {
    Port::from_id(resolve::<V>(Table::Port, pin))
}

#[inline]
pub fn digital_pin_to_bit_mask<V: Variant>(pin: u8) -> Option<u8> {
    match resolve::<V>(Table::BitMask, pin) {
        NOT_A_PIN => None,
        mask => Some(mask),
    }
}

/// Port and bit of `pin`, `None` if either lookup hits a sentinel
pub fn digital_pin_to_binding<V: Variant>(pin: u8) -> Option<PinBinding> {
    let port = digital_pin_to_port::<V>(pin)?;
    let mask = digital_pin_to_bit_mask::<V>(pin)?;
    Some(PinBinding { port, mask })
}

#[inline]
pub fn digital_pin_to_timer<V: Variant>(pin: u8) -> TimerChannel {
    TimerChannel::from_code(resolve::<V>(Table::Timer, pin))
}

#[inline]
pub fn digital_pin_to_analog_input<V: Variant>(pin: u8) -> Option<u8> {
    match resolve::<V>(Table::AnalogInput, pin) {
        NOT_A_CHANNEL => None,
        channel => Some(channel),
    }
}

/// The three registers of `port`, `None` if the part does not have it
pub fn port_registers<V: Variant>(port: Port) -> Option<PortRegisters> {
    let id = port.id();
    let input = resolve::<V>(Table::PortInput, id);
    let output = resolve::<V>(Table::PortOutput, id);
    let mode = resolve::<V>(Table::PortMode, id);
    if input == NOT_A_REGISTER || output == NOT_A_REGISTER || mode == NOT_A_REGISTER {
        return None;
    }
    Some(PortRegisters {
        input: input as Addr,
        output: output as Addr,
        mode: mode as Addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pins::{Channel, TIMER0A},
        variant::{Attiny2313, Attiny84, Attiny85},
    };

    #[test]
    fn const_path_matches_runtime_path() {
        const PORT: u8 = resolve_const::<Attiny84>(Table::Port, 9);
        const MASK: u8 = resolve_const::<Attiny84>(Table::BitMask, 9);
        let pin = core::hint::black_box(9);
        assert_eq!(PORT, resolve::<Attiny84>(Table::Port, pin));
        assert_eq!(MASK, resolve::<Attiny84>(Table::BitMask, pin));
        assert_eq!(Resolved::<Attiny84, 9>::PORT, Port::B.id());
        assert_eq!(Resolved::<Attiny84, 9>::BIT_MASK, 1 << 1);
    }

    #[test]
    fn out_of_range_pins_resolve_to_sentinels() {
        let n = Attiny85::NUM_DIGITAL_PINS;
        assert_eq!(resolve::<Attiny85>(Table::Port, n), NOT_A_PORT);
        assert_eq!(resolve::<Attiny85>(Table::BitMask, n), NOT_A_PIN);
        assert_eq!(resolve::<Attiny85>(Table::Timer, 200), NOT_A_TIMER);
        assert_eq!(resolve::<Attiny85>(Table::AnalogInput, 255), NOT_A_CHANNEL);
        assert_eq!(resolve::<Attiny85>(Table::PortOutput, 9), NOT_A_REGISTER);
        assert_eq!(Resolved::<Attiny85, 6>::BIT_MASK, NOT_A_PIN);
        assert_eq!(digital_pin_to_binding::<Attiny85>(n), None);
    }

    #[test]
    fn typed_views() {
        assert_eq!(
            digital_pin_to_binding::<Attiny85>(3),
            Some(PinBinding {
                port: Port::B,
                mask: 1 << 3
            })
        );
        assert_eq!(
            digital_pin_to_timer::<Attiny85>(0),
            TimerChannel::Direct(Channel::Timer0A)
        );
        assert_eq!(Resolved::<Attiny85, 0>::TIMER, TIMER0A);
        assert_eq!(digital_pin_to_analog_input::<Attiny85>(0), None);
        assert_eq!(digital_pin_to_analog_input::<Attiny85>(2), Some(1));
        assert_eq!(Resolved::<Attiny85, 2>::CHECKED_ANALOG_INPUT, 1);
    }

    #[test]
    fn missing_ports_have_no_registers() {
        assert_eq!(port_registers::<Attiny85>(Port::A), None);
        assert!(port_registers::<Attiny85>(Port::B).is_some());
        assert_eq!(port_registers::<Attiny2313>(Port::C), None);
        assert_eq!(
            port_registers::<Attiny2313>(Port::D),
            Some(PortRegisters {
                input: 0x30,
                output: 0x32,
                mode: 0x31
            })
        );
    }
}
