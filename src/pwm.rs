//! # Analog output
//!
//! [`Mcu::analog_write`] drives a duty cycle onto a pin. The extremes bypass
//! the timers entirely: `value <= 0` is a steady LOW and `value >= 255` a
//! steady HIGH. Any other value is handed to the part's [`PwmRouting`], a
//! decision table from the pin's [`TimerChannel`] to the registers of that
//! compare unit. A channel the table does not know falls back to a digital
//! level split at 128.
//!
//! Each call derives the configuration from `(pin, value)` alone, so calls
//! are idempotent and may be repeated in any order.
use crate::{
    digital::{DigitalIo, Level, PinMode},
    mcu::Mcu,
    pins::TimerChannel,
    reg::{Addr, RegisterAccess, RegisterBit},
    resolve::digital_pin_to_timer,
    variant::Variant,
    Sealed,
};

/// Largest duty value, a steady HIGH
pub const DUTY_MAX: u8 = u8::MAX;

/// Duty values below this fall back to LOW on pins without timer
pub const DIGITAL_THRESHOLD: i16 = 128;

//==================================================================================================
//  Compare units
//==================================================================================================

/// Output compare register of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Compare {
    Bits8(Addr),
    /// 16-bit register pair, written through the shared TEMP register: high
    /// byte first
    Bits16 { low: Addr, high: Addr },
}

impl Compare {
    #[inline]
    pub fn write<R: RegisterAccess>(self, regs: &mut R, duty: u8) {
        match self {
            Compare::Bits8(addr) => regs.write(addr, duty),
            Compare::Bits16 { low, high } => {
                regs.write(high, 0);
                regs.write(low, duty);
            }
        }
    }
}

/// The compare-output-mode bit and the compare register of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompareOutput {
    /// COMnx1 in TCCRnA or its equivalent
    pub connect: RegisterBit,
    pub compare: Compare,
}

impl CompareOutput {
    pub const fn new(control: Addr, bit: u8, ocr: Addr) -> Self {
        CompareOutput {
            connect: RegisterBit::new(control, bit),
            compare: Compare::Bits8(ocr),
        }
    }

    pub const fn wide(control: Addr, bit: u8, low: Addr, high: Addr) -> Self {
        CompareOutput {
            connect: RegisterBit::new(control, bit),
            compare: Compare::Bits16 { low, high },
        }
    }
}

/// Pin multiplexer between a compare unit and its pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMux {
    /// The compare output is hard-wired to the pin
    Direct,
    /// One enable bit per pin, several pins share the compare unit
    /// (TCCR1D of the ATtiny87/167)
    Enable(RegisterBit),
    /// Timer output selected in a 2-bit field, then enabled (TOCC of the
    /// ATtiny441/841)
    Select {
        register: Addr,
        shift: u8,
        value: u8,
        enable: RegisterBit,
    },
}

/// Everything needed to put a compare unit on a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmRoute {
    pub output: CompareOutput,
    pub mux: OutputMux,
}

impl PwmRoute {
    pub const fn direct(output: CompareOutput) -> Self {
        PwmRoute {
            output,
            mux: OutputMux::Direct,
        }
    }

    /// Connect the compare output to the pin and load `duty`
    ///
    /// Only bits owned by this route are changed; other channels sharing a
    /// control register keep their state.
    pub fn connect<R: RegisterAccess>(&self, regs: &mut R, duty: u8) {
        if let OutputMux::Select {
            register,
            shift,
            value,
            ..
        } = self.mux
        {
            regs.write_field(register, 0b11 << shift, value << shift);
        }
        self.output.connect.write(regs, true);
        self.output.compare.write(regs, duty);
        match self.mux {
            OutputMux::Enable(enable) | OutputMux::Select { enable, .. } => {
                enable.write(regs, true)
            }
            OutputMux::Direct => {}
        }
    }

    /// Detach the pin from the timer
    ///
    /// On a multiplexed output only the pin's enable bit is cleared, the
    /// compare unit may still drive other pins.
    pub fn disconnect<R: RegisterAccess>(&self, regs: &mut R) {
        match self.mux {
            OutputMux::Direct => self.output.connect.write(regs, false),
            OutputMux::Enable(enable) | OutputMux::Select { enable, .. } => {
                enable.write(regs, false)
            }
        }
    }
}

/// Timer to pin decision table of a part family
pub trait PwmRouting: Sealed {
    /// Registers driving `channel`, `None` if the part has no such output
    fn route(channel: TimerChannel) -> Option<PwmRoute>;
}

//==================================================================================================
//  analogWrite
//==================================================================================================

/// Which branch [`Mcu::analog_write`] took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogOutput {
    /// Steady level, the pin is not on a timer
    Digital(Level),
    /// Hardware PWM on this channel
    Pwm(TimerChannel),
}

impl<V: Variant, R: RegisterAccess> Mcu<V, R> {
    /// Output `value` as a duty cycle on `pin`
    ///
    /// The pin is switched to output first. Values outside `1..=254` and pins
    /// without a routable timer give a digital level instead.
    pub fn analog_write(&mut self, pin: u8, value: i16) -> AnalogOutput {
        self.pin_mode(pin, PinMode::Output);
        if value <= 0 {
            self.digital_write(pin, Level::Low);
            return AnalogOutput::Digital(Level::Low);
        }
        if value >= DUTY_MAX as i16 {
            self.digital_write(pin, Level::High);
            return AnalogOutput::Digital(Level::High);
        }

        let channel = digital_pin_to_timer::<V>(pin);
        match V::Pwm::route(channel) {
            Some(route) => {
                trace!("analog_write: pin {} on {}", pin, channel);
                route.connect(&mut self.regs, value as u8);
                AnalogOutput::Pwm(channel)
            }
            None => {
                let level = if value < DIGITAL_THRESHOLD {
                    Level::Low
                } else {
                    Level::High
                };
                trace!("analog_write: pin {} not on a timer", pin);
                self.digital_write(pin, level);
                AnalogOutput::Digital(level)
            }
        }
    }

    /// Detach `pin` from its timer, if it has one
    pub fn turn_off_pwm(&mut self, pin: u8) {
        if let Some(route) = V::Pwm::route(digital_pin_to_timer::<V>(pin)) {
            route.disconnect(&mut self.regs);
        }
    }

    /// Borrow `pin` as an [`embedded_hal::PwmPin`]
    pub fn analog_out(&mut self, pin: u8) -> AnalogOut<'_, V, R> {
        AnalogOut {
            mcu: self,
            pin,
            duty: 0,
            enabled: false,
        }
    }
}

//==================================================================================================
//  embedded-hal
//==================================================================================================

/// A pin driven by [`Mcu::analog_write`]
///
/// The duty is kept while the output is disabled and applied on
/// [`enable`](embedded_hal::PwmPin::enable).
pub struct AnalogOut<'a, V: Variant, R: RegisterAccess> {
    mcu: &'a mut Mcu<V, R>,
    pin: u8,
    duty: u8,
    enabled: bool,
}

impl<V: Variant, R: RegisterAccess> AnalogOut<'_, V, R> {
    #[inline]
    pub fn pin(&self) -> u8 {
        self.pin
    }
}

impl<V: Variant, R: RegisterAccess> embedded_hal::PwmPin for AnalogOut<'_, V, R> {
    type Duty = u8;

    fn disable(&mut self) {
        self.enabled = false;
        self.mcu.digital_write(self.pin, Level::Low);
    }

    fn enable(&mut self) {
        self.enabled = true;
        self.mcu.analog_write(self.pin, self.duty as i16);
    }

    #[inline]
    fn get_duty(&self) -> u8 {
        self.duty
    }

    #[inline]
    fn get_max_duty(&self) -> u8 {
        DUTY_MAX
    }

    fn set_duty(&mut self, duty: u8) {
        self.duty = duty;
        if self.enabled {
            self.mcu.analog_write(self.pin, duty as i16);
        }
    }
}

/// Get the corresponding duty cycle for a given float percent value ranging
/// from 0.0 to 1.0. Values outside that range are clamped.
pub fn duty_from_percent(percent: f32) -> u8 {
    if percent >= 1.0 {
        DUTY_MAX
    } else if percent <= 0.0 {
        0
    } else {
        (percent * DUTY_MAX as f32) as u8
    }
}
