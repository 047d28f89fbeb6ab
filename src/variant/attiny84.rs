//! ATtiny24/44/84
//!
//! Port A carries all eight analog inputs. Both timers have A/B compare
//! outputs with the connect bits in TCCRnA; timer 1 is 16 bits wide.
use crate::{
    adc::{AdcRegisters, Admux, Reference},
    pins::{
        Channel, TimerChannel, NOT_A_CHANNEL, NOT_ON_TIMER, TIMER0A, TIMER0B, TIMER1A, TIMER1B,
    },
    pwm::{CompareOutput, PwmRoute, PwmRouting},
    reg::{Addr, RegisterBit},
    Sealed,
};

pub const ADCSRB: Addr = 0x23;
pub const ADCL: Addr = 0x24;
pub const ADCH: Addr = 0x25;
pub const ADCSRA: Addr = 0x26;
pub const ADMUX: Addr = 0x27;

pub const PINB: Addr = 0x36;
pub const DDRB: Addr = 0x37;
pub const PORTB: Addr = 0x38;
pub const PINA: Addr = 0x39;
pub const DDRA: Addr = 0x3A;
pub const PORTA: Addr = 0x3B;

pub const OCR1BL: Addr = 0x48;
pub const OCR1BH: Addr = 0x49;
pub const OCR1AL: Addr = 0x4A;
pub const OCR1AH: Addr = 0x4B;
pub const TCCR1A: Addr = 0x4F;
pub const TCCR0A: Addr = 0x50;
pub const OCR0A: Addr = 0x56;
pub const OCR0B: Addr = 0x5C;

pin_table! {
    (0, A, 0, NOT_ON_TIMER, 0),
    (1, A, 1, NOT_ON_TIMER, 1),
    (2, A, 2, NOT_ON_TIMER, 2),
    (3, A, 3, NOT_ON_TIMER, 3),
    (4, A, 4, NOT_ON_TIMER, 4),
    (5, A, 5, TIMER1B, 5),
    (6, A, 6, TIMER1A, 6),
    (7, A, 7, TIMER0B, 7),
    (8, B, 2, TIMER0A, NOT_A_CHANNEL),
    (9, B, 1, NOT_ON_TIMER, NOT_A_CHANNEL),
    (10, B, 0, NOT_ON_TIMER, NOT_A_CHANNEL),
    (11, B, 3, NOT_ON_TIMER, NOT_A_CHANNEL),
}

/// Timer routing of the ATtiny24/44/84
pub enum Tiny84Pwm {}

impl Sealed for Tiny84Pwm {}

impl PwmRouting for Tiny84Pwm {
    fn route(channel: TimerChannel) -> Option<PwmRoute> {
        let output = match channel {
            TimerChannel::Direct(Channel::Timer0A) => CompareOutput::new(TCCR0A, 7, OCR0A),
            TimerChannel::Direct(Channel::Timer0B) => CompareOutput::new(TCCR0A, 5, OCR0B),
            TimerChannel::Direct(Channel::Timer1A) => {
                CompareOutput::wide(TCCR1A, 7, OCR1AL, OCR1AH)
            }
            TimerChannel::Direct(Channel::Timer1B) => {
                CompareOutput::wide(TCCR1A, 5, OCR1BL, OCR1BH)
            }
            _ => return None,
        };
        Some(PwmRoute::direct(output))
    }
}

variant! {
    /// ATtiny24/44/84
    Attiny84 {
        name: "ATtiny84",
        analog_inputs: 8,
        ports: [(A, PINA, PORTA, DDRA), (B, PINB, PORTB, DDRB)],
        adc: AdcRegisters {
            mux: ADMUX,
            mux_secondary: ADCSRB,
            control: ADCSRA,
            data_low: ADCL,
            data_high: ADCH,
        },
        references: &[
            (Reference::Vcc, 0),
            (Reference::External, 1),
            (Reference::Internal1V1, 2),
        ],
        default_reference: Reference::Vcc,
        gains: &[],
        bipolar: Some(RegisterBit::new(ADCSRB, 7)),
        layout: Admux<0x3F>,
        pwm: Tiny84Pwm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{digital_pin_to_analog_input, digital_pin_to_binding};
    use crate::pins::{PinBinding, Port};

    #[test]
    fn port_b_is_numbered_after_port_a() {
        assert_eq!(PIN_PB2, 8);
        assert_eq!(
            digital_pin_to_binding::<Attiny84>(PIN_PB0),
            Some(PinBinding {
                port: Port::B,
                mask: 1
            })
        );
        assert_eq!(digital_pin_to_analog_input::<Attiny84>(PIN_PA7), Some(7));
        assert_eq!(digital_pin_to_analog_input::<Attiny84>(PIN_PB0), None);
    }
}
