//! ATtiny87/167
//!
//! Timer 1 drives each of its two channels onto up to four port B pins. The
//! pin is picked by an enable bit in TCCR1D; the compare output mode of both
//! channels stays on.
use crate::{
    adc::{AdcRegisters, Admux, Reference},
    pins::{
        Channel, TimerChannel, NOT_A_CHANNEL, NOT_ON_TIMER, TIM1AU, TIM1AV, TIM1AW, TIM1AX, TIM1BU,
        TIM1BV, TIM1BW, TIM1BX, TIMER0A,
    },
    pwm::{Compare, CompareOutput, OutputMux, PwmRoute, PwmRouting},
    reg::{Addr, RegisterBit},
    Sealed,
};

pub const PINA: Addr = 0x20;
pub const DDRA: Addr = 0x21;
pub const PORTA: Addr = 0x22;
pub const PINB: Addr = 0x23;
pub const DDRB: Addr = 0x24;
pub const PORTB: Addr = 0x25;

pub const TCCR0A: Addr = 0x44;
pub const OCR0A: Addr = 0x47;

pub const ADCL: Addr = 0x78;
pub const ADCH: Addr = 0x79;
pub const ADCSRA: Addr = 0x7A;
pub const ADCSRB: Addr = 0x7B;
pub const ADMUX: Addr = 0x7C;

pub const TCCR1A: Addr = 0x80;
pub const TCCR1D: Addr = 0x83;
pub const OCR1AL: Addr = 0x88;
pub const OCR1AH: Addr = 0x89;
pub const OCR1BL: Addr = 0x8A;
pub const OCR1BH: Addr = 0x8B;

/// COM1A1 and COM1B1
const COM1X1: u8 = (1 << 7) | (1 << 5);

pin_table! {
    (0, A, 0, NOT_ON_TIMER, 0),
    (1, A, 1, NOT_ON_TIMER, 1),
    (2, A, 2, TIMER0A, 2),
    (3, A, 3, NOT_ON_TIMER, 3),
    (4, A, 4, NOT_ON_TIMER, 4),
    (5, A, 5, NOT_ON_TIMER, 5),
    (6, A, 6, NOT_ON_TIMER, 6),
    (7, A, 7, NOT_ON_TIMER, 7),
    (8, B, 0, TIM1AU, NOT_A_CHANNEL),
    (9, B, 1, TIM1BU, NOT_A_CHANNEL),
    (10, B, 2, TIM1AV, NOT_A_CHANNEL),
    (11, B, 3, TIM1BV, NOT_A_CHANNEL),
    (12, B, 4, TIM1AW, NOT_A_CHANNEL),
    (13, B, 5, TIM1BW, 8),
    (14, B, 6, TIM1AX, 9),
    (15, B, 7, TIM1BX, 10),
}

/// Timer routing of the ATtiny87/167
pub enum Tiny167Pwm {}

impl Sealed for Tiny167Pwm {}

impl PwmRouting for Tiny167Pwm {
    fn route(channel: TimerChannel) -> Option<PwmRoute> {
        match channel {
            TimerChannel::Direct(Channel::Timer0A) => {
                Some(PwmRoute::direct(CompareOutput::new(TCCR0A, 7, OCR0A)))
            }
            TimerChannel::Multiplexed { channel, output } => {
                let compare = match channel {
                    Channel::Timer1A => Compare::Bits16 {
                        low: OCR1AL,
                        high: OCR1AH,
                    },
                    Channel::Timer1B => Compare::Bits16 {
                        low: OCR1BL,
                        high: OCR1BH,
                    },
                    _ => return None,
                };
                // TCCR1D: OC1AU..OC1AX in bits 3:0, OC1BU..OC1BX in bits 7:4
                let code = channel_code(channel) | output as u8;
                Some(PwmRoute {
                    output: CompareOutput {
                        connect: RegisterBit {
                            addr: TCCR1A,
                            mask: COM1X1,
                        },
                        compare,
                    },
                    mux: OutputMux::Enable(RegisterBit::new(TCCR1D, code)),
                })
            }
            _ => None,
        }
    }
}

#[inline]
fn channel_code(channel: Channel) -> u8 {
    if channel == Channel::Timer1B {
        4
    } else {
        0
    }
}

variant! {
    /// ATtiny87/167
    Attiny167 {
        name: "ATtiny167",
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
            (Reference::Internal2V56, 3),
        ],
        default_reference: Reference::Vcc,
        gains: &[],
        bipolar: Some(RegisterBit::new(ADCSRB, 7)),
        layout: Admux<0x1F>,
        pwm: Tiny167Pwm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_port_b_pin_has_its_own_enable_bit() {
        let mut seen = 0u8;
        for pin in PIN_PB0..=PIN_PB7 {
            let code = crate::resolve::resolve::<Attiny167>(crate::resolve::Table::Timer, pin);
            let route = Tiny167Pwm::route(TimerChannel::from_code(code)).unwrap();
            match route.mux {
                OutputMux::Enable(bit) => {
                    assert_eq!(bit.addr, TCCR1D);
                    assert_eq!(seen & bit.mask, 0);
                    seen |= bit.mask;
                }
                other => panic!("pin {} routed through {:?}", pin, other),
            }
        }
        assert_eq!(seen, 0xFF);
    }
}
