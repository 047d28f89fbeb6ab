//! ATtiny441/841
//!
//! The compare outputs of all three timers reach the pins through the timer
//! output compare mux. Each of the eight TOCC slots selects one of three
//! outputs in a 2-bit field of TOCPMSA0/1 and is switched on by its bit in
//! TOCPMCOE. Even slots offer OC0B, OC1A and OC2B; odd slots offer OC0A, OC1B
//! and OC2A.
use crate::{
    adc::{AdcRegisters, Gain, Reference, SplitMux},
    pins::{
        tocc, Channel, TimerChannel, NOT_ON_TIMER, TIMER0A, TIMER0B, TIMER1A, TIMER1B, TIMER2A,
        TIMER2B,
    },
    pwm::{CompareOutput, OutputMux, PwmRoute, PwmRouting},
    reg::{Addr, RegisterBit},
    Sealed,
};

pub const ADCSRB: Addr = 0x24;
pub const ADCSRA: Addr = 0x25;
pub const ADCL: Addr = 0x26;
pub const ADCH: Addr = 0x27;
pub const ADMUXA: Addr = 0x29;
pub const ADMUXB: Addr = 0x2A;

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

pub const OCR2BL: Addr = 0xC0;
pub const OCR2BH: Addr = 0xC1;
pub const OCR2AL: Addr = 0xC2;
pub const OCR2AH: Addr = 0xC3;
pub const TCCR2A: Addr = 0xCA;
pub const TOCPMCOE: Addr = 0xE2;
pub const TOCPMSA0: Addr = 0xE8;
pub const TOCPMSA1: Addr = 0xE9;

pin_table! {
    (0, A, 0, NOT_ON_TIMER, 0),
    (1, A, 1, tocc(0, TIMER0B), 1),
    (2, A, 2, tocc(1, TIMER0A), 2),
    (3, A, 3, tocc(2, TIMER2B), 3),
    (4, A, 4, tocc(3, TIMER2A), 4),
    (5, A, 5, tocc(4, TIMER1A), 5),
    (6, A, 6, tocc(5, TIMER1B), 6),
    (7, A, 7, NOT_ON_TIMER, 7),
    (8, B, 2, NOT_ON_TIMER, 8),
    (9, B, 1, NOT_ON_TIMER, 10),
    (10, B, 0, NOT_ON_TIMER, 11),
    (11, B, 3, NOT_ON_TIMER, 9),
}

/// TOCC field value selecting `channel` on `slot`, `None` if the slot cannot
/// carry it
const fn tocc_select(slot: u8, channel: Channel) -> Option<u8> {
    let even = slot & 1 == 0;
    match channel {
        Channel::Timer0B if even => Some(0),
        Channel::Timer1A if even => Some(1),
        Channel::Timer2B if even => Some(2),
        Channel::Timer0A if !even => Some(0),
        Channel::Timer1B if !even => Some(1),
        Channel::Timer2A if !even => Some(2),
        _ => None,
    }
}

/// Timer routing of the ATtiny441/841
pub enum Tiny841Pwm {}

impl Sealed for Tiny841Pwm {}

impl PwmRouting for Tiny841Pwm {
    fn route(channel: TimerChannel) -> Option<PwmRoute> {
        let TimerChannel::Tocc { slot, channel } = channel else {
            return None;
        };
        if slot > 7 {
            return None;
        }
        let value = tocc_select(slot, channel)?;
        let output = match channel {
            Channel::Timer0A => CompareOutput::new(TCCR0A, 7, OCR0A),
            Channel::Timer0B => CompareOutput::new(TCCR0A, 5, OCR0B),
            Channel::Timer1A => CompareOutput::wide(TCCR1A, 7, OCR1AL, OCR1AH),
            Channel::Timer1B => CompareOutput::wide(TCCR1A, 5, OCR1BL, OCR1BH),
            Channel::Timer2A => CompareOutput::wide(TCCR2A, 7, OCR2AL, OCR2AH),
            Channel::Timer2B => CompareOutput::wide(TCCR2A, 5, OCR2BL, OCR2BH),
            Channel::Timer1D => return None,
        };
        Some(PwmRoute {
            output,
            mux: OutputMux::Select {
                register: if slot < 4 { TOCPMSA0 } else { TOCPMSA1 },
                shift: (slot & 0x03) * 2,
                value,
                enable: RegisterBit::new(TOCPMCOE, slot),
            },
        })
    }
}

variant! {
    /// ATtiny441/841
    Attiny841 {
        name: "ATtiny841",
        analog_inputs: 12,
        ports: [(A, PINA, PORTA, DDRA), (B, PINB, PORTB, DDRB)],
        adc: AdcRegisters {
            mux: ADMUXA,
            mux_secondary: ADMUXB,
            control: ADCSRA,
            data_low: ADCL,
            data_high: ADCH,
        },
        references: &[
            (Reference::Vcc, 0),
            (Reference::Internal1V1, 1),
            (Reference::Internal2V2, 2),
            (Reference::Internal4V096, 3),
            (Reference::External, 4),
        ],
        default_reference: Reference::Vcc,
        gains: &[(Gain::X1, 0), (Gain::X20, 1), (Gain::X100, 2)],
        bipolar: None,
        layout: SplitMux,
        pwm: Tiny841Pwm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_slot_offers_three_outputs() {
        let all = [
            Channel::Timer0A,
            Channel::Timer0B,
            Channel::Timer1A,
            Channel::Timer1B,
            Channel::Timer2A,
            Channel::Timer2B,
            Channel::Timer1D,
        ];
        for slot in 0..8 {
            let offered = all
                .iter()
                .filter(|c| tocc_select(slot, **c).is_some())
                .count();
            assert_eq!(offered, 3, "slot {}", slot);
        }
    }

    #[test]
    fn table_slots_are_routable() {
        for pin in PIN_PA1..=PIN_PA6 {
            let code = crate::resolve::resolve::<Attiny841>(crate::resolve::Table::Timer, pin);
            assert!(
                Tiny841Pwm::route(TimerChannel::from_code(code)).is_some(),
                "pin {}",
                pin
            );
        }
    }
}
