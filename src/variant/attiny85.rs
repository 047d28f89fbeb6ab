//! ATtiny25/45/85
//!
//! Six pins on port B. Timer 0 has two compare outputs in TCCR0A. Timer 1 is
//! the high speed timer: its channel A connect bit lives in TCCR1 and channel
//! B's in GTCCR.
use crate::{
    adc::{AdcRegisters, AdmuxRefs2, Reference},
    pins::{Channel, TimerChannel, NOT_A_CHANNEL, NOT_ON_TIMER, TIMER0A, TIMER0B, TIMER1B},
    pwm::{CompareOutput, PwmRoute, PwmRouting},
    reg::{Addr, RegisterBit},
    Sealed,
};

pub const PINB: Addr = 0x36;
pub const DDRB: Addr = 0x37;
pub const PORTB: Addr = 0x38;

pub const ADCSRB: Addr = 0x23;
pub const ADCL: Addr = 0x24;
pub const ADCH: Addr = 0x25;
pub const ADCSRA: Addr = 0x26;
pub const ADMUX: Addr = 0x27;

pub const OCR0B: Addr = 0x48;
pub const OCR0A: Addr = 0x49;
pub const TCCR0A: Addr = 0x4A;
pub const OCR1B: Addr = 0x4B;
pub const GTCCR: Addr = 0x4C;
pub const OCR1A: Addr = 0x4E;
pub const TCCR1: Addr = 0x50;

pin_table! {
    (0, B, 0, TIMER0A, NOT_A_CHANNEL),
    (1, B, 1, TIMER0B, NOT_A_CHANNEL),
    (2, B, 2, NOT_ON_TIMER, 1),
    (3, B, 3, NOT_ON_TIMER, 3),
    (4, B, 4, TIMER1B, 2),
    (5, B, 5, NOT_ON_TIMER, 0),
}

/// Timer routing of the ATtiny25/45/85
pub enum Tiny85Pwm {}

impl Sealed for Tiny85Pwm {}

impl PwmRouting for Tiny85Pwm {
    fn route(channel: TimerChannel) -> Option<PwmRoute> {
        let output = match channel {
            TimerChannel::Direct(Channel::Timer0A) => CompareOutput::new(TCCR0A, 7, OCR0A),
            TimerChannel::Direct(Channel::Timer0B) => CompareOutput::new(TCCR0A, 5, OCR0B),
            TimerChannel::Direct(Channel::Timer1A) => CompareOutput::new(TCCR1, 5, OCR1A),
            TimerChannel::Direct(Channel::Timer1B) => CompareOutput::new(GTCCR, 5, OCR1B),
            _ => return None,
        };
        Some(PwmRoute::direct(output))
    }
}

variant! {
    /// ATtiny25/45/85
    Attiny85 {
        name: "ATtiny85",
        analog_inputs: 4,
        ports: [(B, PINB, PORTB, DDRB)],
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
        layout: AdmuxRefs2<0x0F>,
        pwm: Tiny85Pwm,
    }
}
