//! ATtiny2313/4313
//!
//! No ADC. Three ports, with the logical pins following the DIP package
//! rather than the port order. Timer 0 and the 16-bit timer 1 each have A/B
//! compare outputs.
use crate::{
    adc::{AdcRegisters, NoAdc, Reference},
    pins::{
        Channel, TimerChannel, NOT_A_CHANNEL, NOT_ON_TIMER, TIMER0A, TIMER0B, TIMER1A, TIMER1B,
    },
    pwm::{CompareOutput, PwmRoute, PwmRouting},
    reg::Addr,
    Sealed,
};

pub const PIND: Addr = 0x30;
pub const DDRD: Addr = 0x31;
pub const PORTD: Addr = 0x32;
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
    (0, D, 0, NOT_ON_TIMER, NOT_A_CHANNEL),
    (1, D, 1, NOT_ON_TIMER, NOT_A_CHANNEL),
    (2, A, 1, NOT_ON_TIMER, NOT_A_CHANNEL),
    (3, A, 0, NOT_ON_TIMER, NOT_A_CHANNEL),
    (4, D, 2, NOT_ON_TIMER, NOT_A_CHANNEL),
    (5, D, 3, NOT_ON_TIMER, NOT_A_CHANNEL),
    (6, D, 4, NOT_ON_TIMER, NOT_A_CHANNEL),
    (7, D, 5, TIMER0B, NOT_A_CHANNEL),
    (8, D, 6, NOT_ON_TIMER, NOT_A_CHANNEL),
    (9, B, 0, NOT_ON_TIMER, NOT_A_CHANNEL),
    (10, B, 1, NOT_ON_TIMER, NOT_A_CHANNEL),
    (11, B, 2, TIMER0A, NOT_A_CHANNEL),
    (12, B, 3, TIMER1A, NOT_A_CHANNEL),
    (13, B, 4, TIMER1B, NOT_A_CHANNEL),
    (14, B, 5, NOT_ON_TIMER, NOT_A_CHANNEL),
    (15, B, 6, NOT_ON_TIMER, NOT_A_CHANNEL),
    (16, B, 7, NOT_ON_TIMER, NOT_A_CHANNEL),
    (17, A, 2, NOT_ON_TIMER, NOT_A_CHANNEL),
}

/// Timer routing of the ATtiny2313/4313
pub enum Tiny2313Pwm {}

impl Sealed for Tiny2313Pwm {}

impl PwmRouting for Tiny2313Pwm {
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
    /// ATtiny2313/4313
    Attiny2313 {
        name: "ATtiny2313",
        analog_inputs: 0,
        ports: [(A, PINA, PORTA, DDRA), (B, PINB, PORTB, DDRB), (D, PIND, PORTD, DDRD)],
        adc: AdcRegisters::NONE,
        references: &[(Reference::Vcc, 0)],
        default_reference: Reference::Vcc,
        gains: &[],
        bipolar: None,
        layout: NoAdc,
        pwm: Tiny2313Pwm,
    }
}
