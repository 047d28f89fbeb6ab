//! ATtiny261/461/861
//!
//! Timer 1 has three PWM channels, A, B and D, whose connect bits share
//! TCCR1C. Timer 0 has no compare outputs on pins. The ADC spreads REFS2,
//! MUX5 and the gain select over ADCSRB, next to the bipolar mode bit.
use crate::{
    adc::{AdcRegisters, Reference, ScatteredMux},
    pins::{Channel, TimerChannel, NOT_A_CHANNEL, NOT_ON_TIMER, TIMER1A, TIMER1B, TIMER1D},
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

pub const TCCR1C: Addr = 0x47;
pub const OCR1D: Addr = 0x4A;
pub const OCR1B: Addr = 0x4C;
pub const OCR1A: Addr = 0x4D;

pin_table! {
    (0, A, 0, NOT_ON_TIMER, 0),
    (1, A, 1, NOT_ON_TIMER, 1),
    (2, A, 2, NOT_ON_TIMER, 2),
    (3, A, 3, NOT_ON_TIMER, NOT_A_CHANNEL),
    (4, A, 4, NOT_ON_TIMER, 3),
    (5, A, 5, NOT_ON_TIMER, 4),
    (6, A, 6, NOT_ON_TIMER, 5),
    (7, A, 7, NOT_ON_TIMER, 6),
    (8, B, 0, NOT_ON_TIMER, NOT_A_CHANNEL),
    (9, B, 1, TIMER1A, NOT_A_CHANNEL),
    (10, B, 2, NOT_ON_TIMER, NOT_A_CHANNEL),
    (11, B, 3, TIMER1B, NOT_A_CHANNEL),
    (12, B, 4, NOT_ON_TIMER, 7),
    (13, B, 5, TIMER1D, 8),
    (14, B, 6, NOT_ON_TIMER, 9),
    (15, B, 7, NOT_ON_TIMER, 10),
}

/// Timer routing of the ATtiny261/461/861
///
/// Only COM1x0 is set (in the `S` shadow bits for A and B). In PWM mode
/// COM1x1:0 = 01 drives both OC1x and its complement !OC1x.
pub enum Tiny861Pwm {}

impl Sealed for Tiny861Pwm {}

impl PwmRouting for Tiny861Pwm {
    fn route(channel: TimerChannel) -> Option<PwmRoute> {
        let output = match channel {
            TimerChannel::Direct(Channel::Timer1A) => CompareOutput::new(TCCR1C, 6, OCR1A),
            TimerChannel::Direct(Channel::Timer1B) => CompareOutput::new(TCCR1C, 4, OCR1B),
            TimerChannel::Direct(Channel::Timer1D) => CompareOutput::new(TCCR1C, 2, OCR1D),
            _ => return None,
        };
        Some(PwmRoute::direct(output))
    }
}

variant! {
    /// ATtiny261/461/861
    Attiny861 {
        name: "ATtiny861",
        analog_inputs: 11,
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
            (Reference::Internal2V56NoCap, 6),
            (Reference::Internal2V56, 7),
        ],
        default_reference: Reference::Vcc,
        gains: &[],
        bipolar: Some(RegisterBit::new(ADCSRB, 7)),
        layout: ScatteredMux,
        pwm: Tiny861Pwm,
    }
}
