//! Quantified behavior of every supported part, driven through the host
//! register file
use core::hint::black_box;

use proptest::prelude::*;
use tinycore_hal::{
    adc::{AdcLayout, MuxDecoded},
    digital::{DigitalIo, Level, PinMode},
    pins::adc_ch,
    pwm::{AnalogOutput, Compare, OutputMux, PwmRoute, PwmRouting},
    reg::RegisterAccess,
    resolve::{digital_pin_to_timer, resolve, resolve_const, Resolved, Table},
    sim::SimRegisters,
    variant::{Attiny167, Attiny2313, Attiny84, Attiny841, Attiny85, Attiny861},
    Mcu, Variant,
};

fn is_active<R: RegisterAccess>(route: &PwmRoute, regs: &R) -> bool {
    let enabled = match route.mux {
        OutputMux::Direct => true,
        OutputMux::Enable(bit) | OutputMux::Select { enable: bit, .. } => bit.is_set(regs),
    };
    enabled && route.output.connect.is_set(regs)
}

fn compare_value<V: Variant>(route: &PwmRoute, regs: &SimRegisters<V>) -> u8 {
    match route.output.compare {
        Compare::Bits8(addr) => regs.peek(addr),
        Compare::Bits16 { low, .. } => regs.peek(low),
    }
}

macro_rules! part_properties {
    ($($module:ident: $V:ty,)+) => {$(
        mod $module {
            use super::*;

            type V = $V;

            fn new_mcu() -> Mcu<V, SimRegisters<V>> {
                Mcu::new(SimRegisters::new())
            }

            #[test]
            fn compile_time_lookups_match_tables() {
                const LAST: u8 = <$V as Variant>::NUM_DIGITAL_PINS - 1;
                const PAST: u8 = <$V as Variant>::NUM_DIGITAL_PINS;
                assert_eq!(Resolved::<V, 0>::PORT, resolve::<V>(Table::Port, black_box(0)));
                assert_eq!(
                    Resolved::<V, LAST>::BIT_MASK,
                    resolve::<V>(Table::BitMask, black_box(LAST))
                );
                assert_eq!(
                    Resolved::<V, LAST>::TIMER,
                    resolve::<V>(Table::Timer, black_box(LAST))
                );
                assert_eq!(Resolved::<V, PAST>::PORT, Table::Port.sentinel());
                assert_eq!(Resolved::<V, PAST>::ANALOG_INPUT, Table::AnalogInput.sentinel());
            }

            proptest! {
                #[test]
                fn const_and_runtime_paths_agree(index in any::<u8>()) {
                    for table in Table::ALL {
                        prop_assert_eq!(
                            resolve::<V>(table, index),
                            resolve_const::<V>(table, index)
                        );
                    }
                }

                #[test]
                fn pins_past_the_end_resolve_to_sentinels(
                    pin in <V as Variant>::NUM_DIGITAL_PINS..=u8::MAX
                ) {
                    for table in [Table::Port, Table::BitMask, Table::Timer, Table::AnalogInput] {
                        prop_assert_eq!(resolve::<V>(table, pin), table.sentinel());
                    }
                }

                #[test]
                fn extremes_equal_plain_digital_writes(
                    pin in any::<u8>(),
                    low in i16::MIN..=0,
                    high in 255i16..=i16::MAX,
                ) {
                    let mut reference = new_mcu();
                    reference.pin_mode(pin, PinMode::Output);
                    reference.digital_write(pin, Level::Low);
                    let mut mcu = new_mcu();
                    prop_assert_eq!(mcu.analog_write(pin, low), AnalogOutput::Digital(Level::Low));
                    prop_assert_eq!(mcu.regs().snapshot(), reference.regs().snapshot());

                    reference.digital_write(pin, Level::High);
                    prop_assert_eq!(mcu.analog_write(pin, high), AnalogOutput::Digital(Level::High));
                    prop_assert_eq!(mcu.regs().snapshot(), reference.regs().snapshot());
                }

                #[test]
                fn mid_range_uses_the_timer_or_splits_at_128(
                    pin in 0..<V as Variant>::NUM_DIGITAL_PINS,
                    value in 1i16..255,
                ) {
                    let mut mcu = new_mcu();
                    let channel = digital_pin_to_timer::<V>(pin);
                    let output = mcu.analog_write(pin, value);
                    match <V as Variant>::Pwm::route(channel) {
                        Some(_) => prop_assert_eq!(output, AnalogOutput::Pwm(channel)),
                        None => {
                            let level = if value < 128 { Level::Low } else { Level::High };
                            prop_assert_eq!(output, AnalogOutput::Digital(level));
                            prop_assert_eq!(mcu.digital_read(pin), level);
                        }
                    }
                }

                #[test]
                fn pwm_touches_only_its_own_channel(
                    pick in any::<prop::sample::Index>(),
                    duty in 1u8..255,
                ) {
                    let routable: Vec<(u8, PwmRoute)> = (0..<V as Variant>::NUM_DIGITAL_PINS)
                        .filter_map(|pin| {
                            <V as Variant>::Pwm::route(digital_pin_to_timer::<V>(pin))
                                .map(|route| (pin, route))
                        })
                        .collect();
                    prop_assert!(!routable.is_empty());
                    let (pin, route) = *pick.get(&routable);

                    let mut mcu = new_mcu();
                    mcu.analog_write(pin, duty as i16);
                    prop_assert!(is_active(&route, mcu.regs()));
                    prop_assert_eq!(compare_value(&route, mcu.regs()), duty);

                    for other in 0..<V as Variant>::NUM_DIGITAL_PINS {
                        let Some(other_route) =
                            <V as Variant>::Pwm::route(digital_pin_to_timer::<V>(other))
                        else {
                            continue;
                        };
                        if other_route == route {
                            continue;
                        }
                        prop_assert!(!is_active(&other_route, mcu.regs()), "pin {}", other);
                        if other_route.output.compare != route.output.compare {
                            prop_assert_eq!(compare_value(&other_route, mcu.regs()), 0);
                        }
                    }
                }

                #[test]
                fn mux_reads_back_channel_and_reference(
                    channel in 0..=<<V as Variant>::Adc as AdcLayout>::MAX_CHANNEL,
                    reference in any::<prop::sample::Index>(),
                    gain in any::<prop::sample::Index>(),
                    sample in 0u16..1024,
                ) {
                    if !<<V as Variant>::Adc as AdcLayout>::PRESENT {
                        return Ok(());
                    }
                    let (reference, _) = *reference.get(<V as Variant>::REFERENCES);
                    let gain = if <V as Variant>::GAINS.is_empty() {
                        None
                    } else {
                        Some(gain.get(<V as Variant>::GAINS).0)
                    };

                    let mut mcu = new_mcu();
                    mcu.regs_mut().set_sample(channel, sample);
                    mcu.analog_reference(reference).unwrap();
                    if let Some(gain) = gain {
                        mcu.set_gain(gain).unwrap();
                    }
                    prop_assert_eq!(mcu.analog_read(adc_ch(channel)), Ok(sample));
                    prop_assert_eq!(
                        mcu.decode_mux(),
                        Some(MuxDecoded {
                            channel,
                            reference: Some(reference),
                            gain,
                        })
                    );
                }
            }
        }
    )+};
}

part_properties! {
    attiny85: Attiny85,
    attiny84: Attiny84,
    attiny861: Attiny861,
    attiny167: Attiny167,
    attiny841: Attiny841,
    attiny2313: Attiny2313,
}
