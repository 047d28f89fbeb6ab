//! # Host register file
//!
//! [`SimRegisters`] stands in for the data address space of a part on a host.
//! It stores every register as a plain byte and models the few behaviors the
//! analog and digital paths depend on:
//!
//! - Setting ADSC with ADEN set starts a conversion. ADSC reads back set for a
//!   configurable number of ADCSRA reads, then the sample of the selected
//!   channel is latched into ADCL/ADCH and ADSC clears.
//! - PINx reads back PORTx on output bits and the externally applied level on
//!   input bits.
//!
//! Every write through [`RegisterAccess`] is counted. [`peek`](SimRegisters::peek)
//! and [`poke`](SimRegisters::poke) bypass both the models and the counter.
use core::{cell::Cell, marker::PhantomData};

use crate::{
    adc::{AdcLayout, ADEN, ADSC},
    reg::{Addr, RegisterAccess},
    variant::Variant,
};

const SPACE: usize = 256;

pub struct SimRegisters<V: Variant> {
    mem: [Cell<u8>; SPACE],
    /// External pin levels, indexed by PINx address
    levels: [u8; SPACE],
    samples: [u16; 128],
    latency: u8,
    /// ADCSRA reads left until the running conversion completes
    remaining: Cell<Option<u8>>,
    conversions: Cell<usize>,
    writes: usize,
    _variant: PhantomData<V>,
}

impl<V: Variant> SimRegisters<V> {
    /// Registers as left by the core start-up code: everything zero except
    /// ADCSRA, which has the ADC enabled with the slowest prescaler
    pub fn new() -> Self {
        let sim = SimRegisters {
            mem: core::array::from_fn(|_| Cell::new(0)),
            levels: [0; SPACE],
            samples: [0; 128],
            latency: 0,
            remaining: Cell::new(None),
            conversions: Cell::new(0),
            writes: 0,
            _variant: PhantomData,
        };
        if V::Adc::PRESENT {
            sim.set(V::ADC.control, (1 << ADEN) | 0x07);
        }
        sim
    }

    /// Raw register content
    pub fn peek(&self, addr: Addr) -> u8 {
        self.get(addr)
    }

    /// Overwrite a register without triggering any model
    pub fn poke(&mut self, addr: Addr, value: u8) {
        self.set(addr, value);
    }

    /// Apply external levels to the input bits of the port read through
    /// `input`
    pub fn set_input_levels(&mut self, input: Addr, levels: u8) {
        if let Some(slot) = self.levels.get_mut(input as usize) {
            *slot = levels;
        }
    }

    /// Result of future conversions on mux channel `channel`
    pub fn set_sample(&mut self, channel: u8, value: u16) {
        self.samples[(channel & 0x7F) as usize] = value;
    }

    /// Number of ADCSRA reads that still see ADSC set after a start
    pub fn set_conversion_latency(&mut self, polls: u8) {
        self.latency = polls;
    }

    /// Writes performed through [`RegisterAccess`]
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Completed conversions
    pub fn conversions(&self) -> usize {
        self.conversions.get()
    }

    pub fn snapshot(&self) -> [u8; SPACE] {
        core::array::from_fn(|i| self.mem[i].get())
    }

    fn get(&self, addr: Addr) -> u8 {
        self.mem.get(addr as usize).map_or(0, Cell::get)
    }

    fn set(&self, addr: Addr, value: u8) {
        if let Some(cell) = self.mem.get(addr as usize) {
            cell.set(value);
        }
    }

    /// Output and direction registers of the port read through `addr`
    fn port_of_input(addr: Addr) -> Option<(Addr, Addr)> {
        (1..V::PORT_TO_INPUT.len())
            .find(|&id| V::PORT_TO_INPUT[id] != 0 && V::PORT_TO_INPUT[id] as Addr == addr)
            .map(|id| (V::PORT_TO_OUTPUT[id] as Addr, V::PORT_TO_MODE[id] as Addr))
    }

    fn tick_conversion(&self) {
        match self.remaining.get() {
            Some(0) => self.complete_conversion(),
            Some(n) => self.remaining.set(Some(n - 1)),
            None => {}
        }
    }

    fn complete_conversion(&self) {
        let adc = V::ADC;
        let channel = V::Adc::decode(self.get(adc.mux), self.get(adc.mux_secondary)).channel;
        let sample = self.samples[(channel & 0x7F) as usize];
        self.set(adc.data_low, sample as u8);
        self.set(adc.data_high, (sample >> 8) as u8);
        self.set(adc.control, self.get(adc.control) & !(1 << ADSC));
        self.remaining.set(None);
        self.conversions.set(self.conversions.get() + 1);
    }
}

impl<V: Variant> Default for SimRegisters<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variant> RegisterAccess for SimRegisters<V> {
    fn read(&self, addr: Addr) -> u8 {
        if V::Adc::PRESENT && addr == V::ADC.control {
            self.tick_conversion();
        }
        if let Some((output, mode)) = Self::port_of_input(addr) {
            let ddr = self.get(mode);
            let external = self.levels.get(addr as usize).copied().unwrap_or(0);
            return (self.get(output) & ddr) | (external & !ddr);
        }
        self.get(addr)
    }

    fn write(&mut self, addr: Addr, value: u8) {
        self.writes += 1;
        if !(V::Adc::PRESENT && addr == V::ADC.control) {
            self.set(addr, value);
            return;
        }
        if self.remaining.get().is_some() {
            // ADSC cannot be cleared by software
            self.set(addr, value | (1 << ADSC));
            return;
        }
        self.set(addr, value);
        let start = (1 << ADEN) | (1 << ADSC);
        if value & start == start {
            self.remaining.set(Some(self.latency));
            if self.latency == 0 {
                self.complete_conversion();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{Attiny2313, Attiny84};

    #[test]
    fn conversion_completes_after_latency() {
        let mut sim = SimRegisters::<Attiny84>::new();
        let adc = Attiny84::ADC;
        sim.set_sample(3, 0x155);
        sim.set_conversion_latency(2);
        sim.write(adc.mux, 3);
        sim.set_bits(adc.control, 1 << ADSC);
        assert_ne!(sim.read(adc.control) & (1 << ADSC), 0);
        assert_ne!(sim.read(adc.control) & (1 << ADSC), 0);
        assert_eq!(sim.read(adc.control) & (1 << ADSC), 0);
        assert_eq!(sim.read(adc.data_low), 0x55);
        assert_eq!(sim.read(adc.data_high), 0x01);
        assert_eq!(sim.conversions(), 1);
    }

    #[test]
    fn disabled_adc_does_not_convert() {
        let mut sim = SimRegisters::<Attiny84>::new();
        let control = Attiny84::ADC.control;
        sim.write(control, 1 << ADSC);
        assert_eq!(sim.conversions(), 0);
        assert_eq!(sim.write_count(), 1);
    }

    #[test]
    fn parts_without_adc_start_zeroed() {
        let sim = SimRegisters::<Attiny2313>::new();
        assert!(sim.snapshot().iter().all(|b| *b == 0));
    }
}
