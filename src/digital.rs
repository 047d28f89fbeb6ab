//! # Digital I/O
//!
//! The pin mode and level primitives the analog output builds on. Pins that
//! do not exist on the part are ignored, like the Arduino core does.
use crate::{
    mcu::Mcu,
    reg::RegisterAccess,
    resolve::{digital_pin_to_binding, port_registers},
    pins::{PinBinding, PortRegisters},
    variant::Variant,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    Input,
    /// Input with the internal pull-up enabled
    InputPullup,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    #[inline]
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Pin level and direction by logical pin number
pub trait DigitalIo {
    fn pin_mode(&mut self, pin: u8, mode: PinMode);

    /// Drive `pin`, detaching it from its timer first
    fn digital_write(&mut self, pin: u8, level: Level);

    /// Level on `pin`, [`Level::Low`] for pins that do not exist
    fn digital_read(&self, pin: u8) -> Level;
}

impl<V: Variant, R: RegisterAccess> Mcu<V, R> {
    fn port_of(pin: u8) -> Option<(PinBinding, PortRegisters)> {
        let binding = digital_pin_to_binding::<V>(pin)?;
        let regs = port_registers::<V>(binding.port)?;
        Some((binding, regs))
    }
}

impl<V: Variant, R: RegisterAccess> DigitalIo for Mcu<V, R> {
    fn pin_mode(&mut self, pin: u8, mode: PinMode) {
        let Some((binding, port)) = Self::port_of(pin) else {
            return;
        };
        match mode {
            PinMode::Input => {
                self.regs.clear_bits(port.mode, binding.mask);
                self.regs.clear_bits(port.output, binding.mask);
            }
            PinMode::InputPullup => {
                self.regs.clear_bits(port.mode, binding.mask);
                self.regs.set_bits(port.output, binding.mask);
            }
            PinMode::Output => self.regs.set_bits(port.mode, binding.mask),
        }
    }

    fn digital_write(&mut self, pin: u8, level: Level) {
        let Some((binding, port)) = Self::port_of(pin) else {
            return;
        };
        self.turn_off_pwm(pin);
        match level {
            Level::Low => self.regs.clear_bits(port.output, binding.mask),
            Level::High => self.regs.set_bits(port.output, binding.mask),
        }
    }

    fn digital_read(&self, pin: u8) -> Level {
        match Self::port_of(pin) {
            Some((binding, port)) => Level::from(self.regs.read(port.input) & binding.mask != 0),
            None => Level::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        sim::SimRegisters,
        variant::{attiny2313, attiny84, Attiny2313, Attiny84},
    };

    #[test]
    fn modes_set_direction_and_pullup() {
        let mut mcu: Mcu<Attiny84, SimRegisters<Attiny84>> = Mcu::new(SimRegisters::new());
        mcu.pin_mode(attiny84::PIN_PB2, PinMode::Output);
        assert_eq!(mcu.regs().peek(attiny84::DDRB), 1 << 2);
        mcu.pin_mode(attiny84::PIN_PB2, PinMode::InputPullup);
        assert_eq!(mcu.regs().peek(attiny84::DDRB), 0);
        assert_eq!(mcu.regs().peek(attiny84::PORTB), 1 << 2);
        mcu.pin_mode(attiny84::PIN_PB2, PinMode::Input);
        assert_eq!(mcu.regs().peek(attiny84::PORTB), 0);
    }

    #[test]
    fn reads_follow_external_level_on_inputs() {
        let mut mcu: Mcu<Attiny2313, SimRegisters<Attiny2313>> = Mcu::new(SimRegisters::new());
        mcu.regs_mut().set_input_levels(attiny2313::PIND, 1 << 2);
        assert_eq!(mcu.digital_read(attiny2313::PIN_PD2), Level::High);
        mcu.pin_mode(attiny2313::PIN_PD2, PinMode::Output);
        assert_eq!(mcu.digital_read(attiny2313::PIN_PD2), Level::Low);
        mcu.digital_write(attiny2313::PIN_PD2, Level::High);
        assert_eq!(mcu.digital_read(attiny2313::PIN_PD2), Level::High);
    }

    #[test]
    fn missing_pins_are_ignored() {
        let mut mcu: Mcu<Attiny84, SimRegisters<Attiny84>> = Mcu::new(SimRegisters::new());
        mcu.pin_mode(12, PinMode::Output);
        mcu.digital_write(200, Level::High);
        assert_eq!(mcu.digital_read(12), Level::Low);
        assert_eq!(mcu.regs().write_count(), 0);
    }
}
