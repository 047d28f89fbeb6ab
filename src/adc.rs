//! # Analog input
//!
//! The ADC of every supported part is driven the same way: write the channel
//! and the reference into the multiplexer registers, set ADSC, busy-wait until
//! the hardware clears it, then read ADCL before ADCH. What differs is where
//! the reference, channel and gain bits live. Each family's layout is an
//! [`AdcLayout`] selected by the [`Variant`], so the choice is made by the
//! compiler and never at run-time.
//!
//! Reference, gain and bipolar mode are software state ([`ReferenceMode`]).
//! The setters only record the request; the registers are updated by the next
//! conversion. Switching the reference while the ADC is idle can short the
//! AREF pin against the internal reference, so nothing is written early.
//!
//! ## Examples
//!
//! ```ignore
//! mcu.analog_reference(Reference::Internal1V1)?;
//! let raw = mcu.analog_read(PIN_PB4)?;
//! let temp = mcu.read_channel::<0x0F>()?;
//! ```
use core::marker::PhantomData;

use embedded_hal::adc::{Channel, OneShot};

use crate::{
    mcu::Mcu,
    pins::AnalogSource,
    reg::{Addr, RegisterAccess, RegisterBit},
    resolve::{digital_pin_to_analog_input, Resolved},
    variant::Variant,
    Sealed,
};

/// ADC enable bit of ADCSRA
pub const ADEN: u8 = 7;
/// ADC start conversion bit of ADCSRA
pub const ADSC: u8 = 6;

//==================================================================================================
//  Errors
//==================================================================================================

/// Reasons a conversion was not performed
///
/// The discriminants are the sentinels returned by
/// [`analog_read_code`](Mcu::analog_read_code). None of them can be produced by
/// a real conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i16)]
pub enum AdcError {
    /// The part has no ADC
    NoAdc = -32768,
    /// ADEN is clear
    Disabled = -32767,
    /// A conversion is already running
    Busy = -32766,
    /// The pin has no analog input or the channel is outside the mux range
    NotAChannel = -32765,
}

impl AdcError {
    #[inline]
    pub const fn sentinel(self) -> i16 {
        self as i16
    }
}

/// A configuration request the part cannot honor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    UnsupportedReference,
    UnsupportedGain,
    NoBipolarMode,
}

//==================================================================================================
//  Reference mode
//==================================================================================================

/// ADC voltage reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference {
    /// Supply voltage
    Vcc,
    /// Voltage on the AREF pin
    External,
    Internal1V1,
    Internal2V2,
    /// Internal 2.56 V with a bypass capacitor on AREF
    Internal2V56,
    /// Internal 2.56 V, AREF left free
    Internal2V56NoCap,
    Internal4V096,
}

/// Programmable gain of the differential input stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    X1,
    X20,
    X100,
}

/// Reference, gain and input mode applied by the next conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReferenceMode {
    pub reference: Reference,
    pub bipolar: bool,
    pub gain: Gain,
}

impl ReferenceMode {
    pub const fn default_for<V: Variant>() -> Self {
        ReferenceMode {
            reference: V::DEFAULT_REFERENCE,
            bipolar: false,
            gain: Gain::X1,
        }
    }
}

fn code_of<K: Copy + PartialEq>(codes: &[(K, u8)], key: K) -> Option<u8> {
    codes.iter().find(|(k, _)| *k == key).map(|(_, code)| *code)
}

fn key_of<K: Copy>(codes: &[(K, u8)], code: u8) -> Option<K> {
    codes.iter().find(|(_, c)| *c == code).map(|(k, _)| *k)
}

//==================================================================================================
//  Register layouts
//==================================================================================================

/// ADC register addresses of a part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcRegisters {
    /// ADMUX, or ADMUXA on parts with a split mux
    pub mux: Addr,
    /// Register holding the bits that do not fit into `mux`
    pub mux_secondary: Addr,
    /// ADCSRA
    pub control: Addr,
    pub data_low: Addr,
    pub data_high: Addr,
}

impl AdcRegisters {
    /// Register set of a part without ADC
    pub const NONE: AdcRegisters = AdcRegisters {
        mux: 0,
        mux_secondary: 0,
        control: 0,
        data_low: 0,
        data_high: 0,
    };

    #[inline]
    pub const fn enable(&self) -> RegisterBit {
        RegisterBit::new(self.control, ADEN)
    }

    #[inline]
    pub const fn start(&self) -> RegisterBit {
        RegisterBit::new(self.control, ADSC)
    }
}

/// Values to write into the mux registers for one conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxSetting {
    /// Written to the whole primary mux register
    pub primary: u8,
    /// Written to the secondary register under `secondary_mask`
    pub secondary: u8,
    /// Bits of the secondary register owned by the mux, zero if unused
    pub secondary_mask: u8,
}

/// Raw register codes read back from the mux registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxCodes {
    pub channel: u8,
    pub reference: u8,
    pub gain: u8,
}

/// Decoded contents of the mux registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MuxDecoded {
    pub channel: u8,
    /// `None` if the register holds a code the part does not list
    pub reference: Option<Reference>,
    /// `None` on parts without gain select
    pub gain: Option<Gain>,
}

/// Placement of the channel, reference and gain bits of one part family
pub trait AdcLayout: Sealed {
    /// `false` for parts without ADC
    const PRESENT: bool = true;
    /// Highest valid mux channel
    const MAX_CHANNEL: u8;

    fn encode(channel: u8, reference: u8, gain: u8) -> MuxSetting;

    fn decode(primary: u8, secondary: u8) -> MuxCodes;
}

/// No ADC hardware
pub enum NoAdc {}

impl Sealed for NoAdc {}

impl AdcLayout for NoAdc {
    const PRESENT: bool = false;
    const MAX_CHANNEL: u8 = 0;

    fn encode(_: u8, _: u8, _: u8) -> MuxSetting {
        MuxSetting {
            primary: 0,
            secondary: 0,
            secondary_mask: 0,
        }
    }

    fn decode(_: u8, _: u8) -> MuxCodes {
        MuxCodes {
            channel: 0,
            reference: 0,
            gain: 0,
        }
    }
}

/// Single ADMUX: REFS1:0 in bits 7:6, channel under `MUX_MASK`
pub enum Admux<const MUX_MASK: u8> {}

impl<const MUX_MASK: u8> Sealed for Admux<MUX_MASK> {}

impl<const MUX_MASK: u8> AdcLayout for Admux<MUX_MASK> {
    const MAX_CHANNEL: u8 = MUX_MASK;

    fn encode(channel: u8, reference: u8, _: u8) -> MuxSetting {
        MuxSetting {
            primary: ((reference & 0x03) << 6) | (channel & MUX_MASK),
            secondary: 0,
            secondary_mask: 0,
        }
    }

    fn decode(primary: u8, _: u8) -> MuxCodes {
        MuxCodes {
            channel: primary & MUX_MASK,
            reference: primary >> 6,
            gain: 0,
        }
    }
}

/// ADMUX with a third reference bit REFS2 at bit 4 (ATtiny25/45/85)
pub enum AdmuxRefs2<const MUX_MASK: u8> {}

impl<const MUX_MASK: u8> Sealed for AdmuxRefs2<MUX_MASK> {}

impl<const MUX_MASK: u8> AdcLayout for AdmuxRefs2<MUX_MASK> {
    const MAX_CHANNEL: u8 = MUX_MASK;

    fn encode(channel: u8, reference: u8, _: u8) -> MuxSetting {
        MuxSetting {
            primary: ((reference & 0x03) << 6) | ((reference & 0x04) << 2) | (channel & MUX_MASK),
            secondary: 0,
            secondary_mask: 0,
        }
    }

    fn decode(primary: u8, _: u8) -> MuxCodes {
        MuxCodes {
            channel: primary & MUX_MASK,
            reference: (primary >> 6) | ((primary >> 2) & 0x04),
            gain: 0,
        }
    }
}

/// ADMUX plus REFS2, MUX5 and GSEL scattered over ADCSRB (ATtiny261/461/861)
///
/// Channel bit 5 goes to MUX5 (ADCSRB bit 3), channel bit 6 to GSEL
/// (ADCSRB bit 6), reference bit 2 to REFS2 (ADCSRB bit 4). The rest of
/// ADCSRB, including BIN, is preserved.
pub enum ScatteredMux {}

impl Sealed for ScatteredMux {}

impl AdcLayout for ScatteredMux {
    const MAX_CHANNEL: u8 = 0x7F;

    fn encode(channel: u8, reference: u8, _: u8) -> MuxSetting {
        MuxSetting {
            primary: ((reference & 0x03) << 6) | (channel & 0x1F),
            secondary: ((reference & 0x04) << 2) | (channel & 0x40) | ((channel & 0x20) >> 2),
            secondary_mask: 0x58,
        }
    }

    fn decode(primary: u8, secondary: u8) -> MuxCodes {
        MuxCodes {
            channel: (primary & 0x1F) | (secondary & 0x40) | ((secondary & 0x08) << 2),
            reference: (primary >> 6) | ((secondary & 0x10) >> 2),
            gain: 0,
        }
    }
}

/// Channel in ADMUXA, reference and gain in ADMUXB (ATtiny441/841)
pub enum SplitMux {}

impl Sealed for SplitMux {}

impl AdcLayout for SplitMux {
    const MAX_CHANNEL: u8 = 0x3F;

    fn encode(channel: u8, reference: u8, gain: u8) -> MuxSetting {
        MuxSetting {
            primary: channel & 0x3F,
            secondary: ((reference & 0x07) << 5) | (gain & 0x03),
            secondary_mask: 0xFF,
        }
    }

    fn decode(primary: u8, secondary: u8) -> MuxCodes {
        MuxCodes {
            channel: primary & 0x3F,
            reference: secondary >> 5,
            gain: secondary & 0x03,
        }
    }
}

//==================================================================================================
//  Build-time checks
//==================================================================================================

struct AdcCheck<V: Variant, const N: u8>(PhantomData<V>);

impl<V: Variant, const N: u8> AdcCheck<V, N> {
    /// `N` is a mux channel, with or without the channel tag
    const CHANNEL: u8 = {
        assert!(V::Adc::PRESENT, "analog read on a part without ADC");
        assert!(
            N & 0x7F <= V::Adc::MAX_CHANNEL,
            "ADC channel does not exist on this part"
        );
        N & 0x7F
    };

    /// `N` is a logical pin
    const PIN: u8 = {
        assert!(V::Adc::PRESENT, "analog read on a part without ADC");
        Resolved::<V, N>::CHECKED_ANALOG_INPUT
    };
}

//==================================================================================================
//  Conversions
//==================================================================================================

impl<V: Variant, R: RegisterAccess> Mcu<V, R> {
    /// Select the reference used from the next conversion on
    ///
    /// No register is written here.
    pub fn analog_reference(&mut self, reference: Reference) -> Result<(), ConfigError> {
        if code_of(V::REFERENCES, reference).is_none() {
            return Err(ConfigError::UnsupportedReference);
        }
        debug!("{}: analog reference {}", V::NAME, reference);
        self.mode.reference = reference;
        Ok(())
    }

    /// Select the differential gain used from the next conversion on
    ///
    /// [`Gain::X1`] is accepted on every part.
    pub fn set_gain(&mut self, gain: Gain) -> Result<(), ConfigError> {
        if gain != Gain::X1 && code_of(V::GAINS, gain).is_none() {
            return Err(ConfigError::UnsupportedGain);
        }
        debug!("{}: ADC gain {}", V::NAME, gain);
        self.mode.gain = gain;
        Ok(())
    }

    /// Switch differential conversions between unipolar and bipolar input
    /// mode from the next conversion on
    pub fn set_bipolar(&mut self, bipolar: bool) -> Result<(), ConfigError> {
        if bipolar && V::BIPOLAR.is_none() {
            return Err(ConfigError::NoBipolarMode);
        }
        debug!("{}: ADC bipolar {}", V::NAME, bipolar);
        self.mode.bipolar = bipolar;
        Ok(())
    }

    /// Convert `pin` and return the raw result
    ///
    /// `pin` is a logical pin, or a mux channel tagged with
    /// [`adc_ch`](crate::pins::adc_ch). Blocks until the conversion
    /// completes; there is no timeout.
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, AdcError> {
        self.ready()?;
        let channel = Self::channel_of(pin)?;
        self.start(channel);
        nb::block!(self.poll())
    }

    /// [`analog_read`](Self::analog_read) with errors folded into the
    /// negative sentinels of [`AdcError`]
    pub fn analog_read_code(&mut self, pin: u8) -> i16 {
        match self.analog_read(pin) {
            Ok(value) => value as i16,
            Err(err) => err.sentinel(),
        }
    }

    /// Convert mux channel `CH`, checked against the part at build time
    ///
    /// ```
    /// use tinycore_hal::{sim::SimRegisters, variant::Attiny85, Mcu};
    ///
    /// let mut mcu: Mcu<Attiny85, SimRegisters<Attiny85>> = Mcu::new(SimRegisters::new());
    /// mcu.regs_mut().set_sample(0x0F, 300);
    /// assert_eq!(mcu.read_channel::<0x0F>(), Ok(300));
    /// ```
    ///
    /// A channel above the mux range of the part does not build:
    ///
    /// ```compile_fail
    /// use tinycore_hal::{sim::SimRegisters, variant::Attiny85, Mcu};
    ///
    /// let mut mcu: Mcu<Attiny85, SimRegisters<Attiny85>> = Mcu::new(SimRegisters::new());
    /// let _ = mcu.read_channel::<0x10>();
    /// ```
    ///
    /// Neither does any read on a part without ADC:
    ///
    /// ```compile_fail
    /// use tinycore_hal::{sim::SimRegisters, variant::Attiny2313, Mcu};
    ///
    /// let mut mcu: Mcu<Attiny2313, SimRegisters<Attiny2313>> = Mcu::new(SimRegisters::new());
    /// let _ = mcu.read_channel::<0>();
    /// ```
    pub fn read_channel<const CH: u8>(&mut self) -> Result<u16, AdcError> {
        let channel = AdcCheck::<V, CH>::CHANNEL;
        self.ready()?;
        self.start(channel);
        nb::block!(self.poll())
    }

    /// Convert logical pin `PIN`, checked against the part at build time
    ///
    /// PB0 of the ATtiny85 has no analog input:
    ///
    /// ```compile_fail
    /// use tinycore_hal::{sim::SimRegisters, variant::{attiny85, Attiny85}, Mcu};
    ///
    /// let mut mcu: Mcu<Attiny85, SimRegisters<Attiny85>> = Mcu::new(SimRegisters::new());
    /// let _ = mcu.read_pin::<{ attiny85::PIN_PB0 }>();
    /// ```
    pub fn read_pin<const PIN: u8>(&mut self) -> Result<u16, AdcError> {
        let channel = AdcCheck::<V, PIN>::PIN;
        self.ready()?;
        self.start(channel);
        nb::block!(self.poll())
    }

    /// Read back and decode the mux registers, `None` without ADC
    pub fn decode_mux(&self) -> Option<MuxDecoded> {
        if !V::Adc::PRESENT {
            return None;
        }
        let codes = V::Adc::decode(
            self.regs.read(V::ADC.mux),
            self.regs.read(V::ADC.mux_secondary),
        );
        let gain = if V::GAINS.is_empty() {
            None
        } else {
            key_of(V::GAINS, codes.gain)
        };
        Some(MuxDecoded {
            channel: codes.channel,
            reference: key_of(V::REFERENCES, codes.reference),
            gain,
        })
    }

    fn channel_of(pin: u8) -> Result<u8, AdcError> {
        let channel = match AnalogSource::from(pin) {
            AnalogSource::Digital(pin) => {
                digital_pin_to_analog_input::<V>(pin).ok_or(AdcError::NotAChannel)?
            }
            AnalogSource::Channel(channel) => channel,
        };
        if channel > V::Adc::MAX_CHANNEL {
            return Err(AdcError::NotAChannel);
        }
        Ok(channel)
    }

    /// Check that a conversion can be started, without writing anything
    fn ready(&self) -> Result<(), AdcError> {
        if !V::Adc::PRESENT {
            return Err(AdcError::NoAdc);
        }
        if !V::ADC.enable().is_set(&self.regs) {
            return Err(AdcError::Disabled);
        }
        if V::ADC.start().is_set(&self.regs) {
            return Err(AdcError::Busy);
        }
        Ok(())
    }

    /// Apply the reference mode and the channel, then set ADSC
    fn start(&mut self, channel: u8) {
        let mode = self.mode;
        let reference = code_of(V::REFERENCES, mode.reference).unwrap_or(0);
        let gain = code_of(V::GAINS, mode.gain).unwrap_or(0);
        let setting = V::Adc::encode(channel, reference, gain);

        self.regs.write(V::ADC.mux, setting.primary);
        if setting.secondary_mask == 0xFF {
            self.regs.write(V::ADC.mux_secondary, setting.secondary);
        } else if setting.secondary_mask != 0 {
            self.regs
                .write_field(V::ADC.mux_secondary, setting.secondary_mask, setting.secondary);
        }
        if let Some(bin) = V::BIPOLAR {
            if bin.is_set(&self.regs) != mode.bipolar {
                let regs = &mut self.regs;
                critical_section::with(|_| bin.write(regs, mode.bipolar));
            }
        }

        V::ADC.start().write(&mut self.regs, true);
        self.pending = Some(channel);
    }

    /// Collect the result once ADSC has cleared
    fn poll(&mut self) -> nb::Result<u16, AdcError> {
        if V::ADC.start().is_set(&self.regs) {
            return Err(nb::Error::WouldBlock);
        }
        self.pending = None;
        // ADCL first: reading it locks ADCH until ADCH is read
        let low = self.regs.read(V::ADC.data_low);
        let high = self.regs.read(V::ADC.data_high);
        Ok((u16::from(high) << 8) | u16::from(low))
    }
}

//==================================================================================================
//  embedded-hal
//==================================================================================================

/// The ADC of the part, as seen by [`embedded_hal::adc`]
pub enum AdcUnit {}

/// Analog input on logical pin `PIN`
///
/// Constructing one for a pin without analog input fails the build:
///
/// ```compile_fail
/// use tinycore_hal::{adc::AnalogPin, variant::{attiny84, Attiny84}};
///
/// let _ = AnalogPin::<Attiny84, { attiny84::PIN_PB2 }>::new();
/// ```
pub struct AnalogPin<V: Variant, const PIN: u8> {
    _variant: PhantomData<V>,
}

impl<V: Variant, const PIN: u8> AnalogPin<V, PIN> {
    pub fn new() -> Self {
        let _ = AdcCheck::<V, PIN>::PIN;
        AnalogPin {
            _variant: PhantomData,
        }
    }
}

impl<V: Variant, const PIN: u8> Default for AnalogPin<V, PIN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Variant, const PIN: u8> Channel<AdcUnit> for AnalogPin<V, PIN> {
    type ID = u8;

    fn channel() -> u8 {
        AdcCheck::<V, PIN>::PIN
    }
}

impl<V, R, const PIN: u8> OneShot<AdcUnit, u16, AnalogPin<V, PIN>> for Mcu<V, R>
where
    V: Variant,
    R: RegisterAccess,
{
    type Error = AdcError;

    /// The first call starts a conversion, later calls return
    /// [`nb::Error::WouldBlock`] until it completes. Another pin gets
    /// [`AdcError::Busy`] only while that conversion is still running.
    fn read(&mut self, _pin: &mut AnalogPin<V, PIN>) -> nb::Result<u16, AdcError> {
        let channel = <AnalogPin<V, PIN> as Channel<AdcUnit>>::channel();
        match self.pending {
            Some(pending) if pending == channel => self.poll(),
            Some(_) if V::ADC.start().is_set(&self.regs) => {
                Err(nb::Error::Other(AdcError::Busy))
            }
            _ => {
                // a finished conversion nobody collected does not hold the ADC
                self.pending = None;
                self.ready()?;
                self.start(channel);
                self.poll()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pins::adc_ch,
        sim::SimRegisters,
        variant::{
            attiny167, attiny85::PIN_PB4, Attiny167, Attiny2313, Attiny84, Attiny841, Attiny85,
            Attiny861,
        },
    };

    fn new_mcu<V: Variant>() -> Mcu<V, SimRegisters<V>> {
        Mcu::new(SimRegisters::new())
    }

    #[test]
    fn reads_latched_sample() {
        let mut mcu = new_mcu::<Attiny85>();
        mcu.regs_mut().set_sample(2, 0x2A5);
        assert_eq!(mcu.analog_read(PIN_PB4), Ok(0x2A5));
        assert_eq!(mcu.analog_read(adc_ch(2)), Ok(0x2A5));
        assert_eq!(mcu.analog_read_code(PIN_PB4), 0x2A5);
    }

    #[test]
    fn no_adc_is_reported_without_writes() {
        let mut mcu = new_mcu::<Attiny2313>();
        assert_eq!(mcu.analog_read(0), Err(AdcError::NoAdc));
        assert_eq!(mcu.analog_read_code(adc_ch(0)), -32768);
        assert_eq!(mcu.regs().write_count(), 0);
        assert_eq!(mcu.decode_mux(), None);
    }

    #[test]
    fn disabled_and_busy_adc() {
        let mut mcu = new_mcu::<Attiny84>();
        let control = Attiny84::ADC.control;
        mcu.regs_mut().poke(control, 0);
        assert_eq!(mcu.analog_read(0), Err(AdcError::Disabled));
        mcu.regs_mut().poke(control, (1 << ADEN) | (1 << ADSC));
        assert_eq!(mcu.analog_read(0), Err(AdcError::Busy));
        assert_eq!(mcu.analog_read_code(0), AdcError::Busy.sentinel());
        assert_eq!(mcu.regs().write_count(), 0);
    }

    #[test]
    fn pins_without_channel() {
        let mut mcu = new_mcu::<Attiny85>();
        assert_eq!(mcu.analog_read(0), Err(AdcError::NotAChannel));
        assert_eq!(mcu.analog_read(40), Err(AdcError::NotAChannel));
        assert_eq!(mcu.analog_read(adc_ch(0x10)), Err(AdcError::NotAChannel));
        assert_eq!(mcu.analog_read(adc_ch(0x0F)), Ok(0));
        assert_eq!(mcu.regs().write_count(), 2);
    }

    #[test]
    fn reference_is_applied_lazily() {
        let mut mcu = new_mcu::<Attiny85>();
        let before = mcu.regs().snapshot();
        mcu.analog_reference(Reference::Internal2V56).unwrap();
        assert_eq!(mcu.regs().snapshot(), before);
        assert_eq!(mcu.regs().write_count(), 0);

        mcu.analog_read(adc_ch(3)).unwrap();
        // REFS1:0 = 11, REFS2 = 1, MUX = 3
        assert_eq!(mcu.regs().peek(Attiny85::ADC.mux), 0b1101_0011);
        assert_eq!(
            mcu.decode_mux(),
            Some(MuxDecoded {
                channel: 3,
                reference: Some(Reference::Internal2V56),
                gain: None
            })
        );
    }

    #[test]
    fn unsupported_settings_are_rejected() {
        let mut mcu = new_mcu::<Attiny84>();
        assert_eq!(
            mcu.analog_reference(Reference::Internal2V56),
            Err(ConfigError::UnsupportedReference)
        );
        assert_eq!(mcu.set_gain(Gain::X20), Err(ConfigError::UnsupportedGain));
        assert_eq!(mcu.set_gain(Gain::X1), Ok(()));
        let mut mcu = new_mcu::<Attiny841>();
        assert_eq!(mcu.set_bipolar(true), Err(ConfigError::NoBipolarMode));
        assert_eq!(mcu.set_bipolar(false), Ok(()));
        assert_eq!(mcu.reference_mode(), ReferenceMode::default_for::<Attiny841>());
    }

    #[test]
    fn scattered_mux_keeps_unrelated_adcsrb_bits() {
        let mut mcu = new_mcu::<Attiny861>();
        let adcsrb = Attiny861::ADC.mux_secondary;
        // ADTS1:0 and the reserved bit 5
        mcu.regs_mut().poke(adcsrb, 0x23);
        mcu.analog_reference(Reference::Internal2V56NoCap).unwrap();
        mcu.analog_read(adc_ch(0x6B)).unwrap();
        assert_eq!(mcu.regs().peek(Attiny861::ADC.mux), 0b1000_1011);
        assert_eq!(mcu.regs().peek(adcsrb), 0x23 | 0x40 | 0x10 | 0x08);
        let decoded = mcu.decode_mux().unwrap();
        assert_eq!(decoded.channel, 0x6B);
        assert_eq!(decoded.reference, Some(Reference::Internal2V56NoCap));
    }

    #[test]
    fn bipolar_mode_sets_bin_at_conversion() {
        let mut mcu = new_mcu::<Attiny861>();
        let bin = Attiny861::BIPOLAR.unwrap();
        mcu.set_bipolar(true).unwrap();
        assert!(!bin.is_set(mcu.regs()));
        mcu.analog_read(adc_ch(0x10)).unwrap();
        assert!(bin.is_set(mcu.regs()));
        mcu.set_bipolar(false).unwrap();
        mcu.analog_read(adc_ch(0x10)).unwrap();
        assert!(!bin.is_set(mcu.regs()));
    }

    #[test]
    fn split_mux_carries_gain() {
        let mut mcu = new_mcu::<Attiny841>();
        mcu.analog_reference(Reference::Internal2V2).unwrap();
        mcu.set_gain(Gain::X100).unwrap();
        mcu.regs_mut().set_sample(0x21, 1000);
        assert_eq!(mcu.analog_read(adc_ch(0x21)), Ok(1000));
        assert_eq!(mcu.regs().peek(Attiny841::ADC.mux), 0x21);
        assert_eq!(mcu.regs().peek(Attiny841::ADC.mux_secondary), (2 << 5) | 2);
        assert_eq!(
            mcu.decode_mux(),
            Some(MuxDecoded {
                channel: 0x21,
                reference: Some(Reference::Internal2V2),
                gain: Some(Gain::X100)
            })
        );
    }

    #[test]
    fn const_checked_reads() {
        let mut mcu = new_mcu::<Attiny167>();
        mcu.regs_mut().set_sample(8, 77);
        mcu.regs_mut().set_sample(0x1F, 12);
        assert_eq!(mcu.read_pin::<{ attiny167::PIN_PB5 }>(), Ok(77));
        assert_eq!(mcu.read_channel::<0x1F>(), Ok(12));
        assert_eq!(mcu.read_channel::<{ adc_ch(0x1F) }>(), Ok(12));
    }

    #[test]
    fn one_shot_polls_until_done() {
        let mut mcu = new_mcu::<Attiny84>();
        mcu.regs_mut().set_conversion_latency(4);
        mcu.regs_mut().set_sample(5, 512);
        let mut pin = AnalogPin::<Attiny84, 5>::new();
        let mut other = AnalogPin::<Attiny84, 6>::new();
        assert_eq!(mcu.read(&mut pin), Err(nb::Error::WouldBlock));
        assert_eq!(mcu.read(&mut other), Err(nb::Error::Other(AdcError::Busy)));
        assert_eq!(mcu.analog_read(6), Err(AdcError::Busy));
        assert_eq!(nb::block!(mcu.read(&mut pin)), Ok(512));
        assert_eq!(mcu.analog_read(5), Ok(512));
    }

    #[test]
    fn uncollected_conversion_does_not_hold_the_adc() {
        let mut mcu = new_mcu::<Attiny84>();
        mcu.regs_mut().set_conversion_latency(1);
        mcu.regs_mut().set_sample(6, 300);
        let mut pin = AnalogPin::<Attiny84, 5>::new();
        let mut other = AnalogPin::<Attiny84, 6>::new();
        assert_eq!(mcu.read(&mut pin), Err(nb::Error::WouldBlock));

        // channel 5 finishes while nobody polls it
        while Attiny84::ADC.start().is_set(mcu.regs()) {}
        assert_eq!(mcu.regs().conversions(), 1);

        assert_eq!(nb::block!(mcu.read(&mut other)), Ok(300));
        assert_eq!(mcu.regs().conversions(), 2);
        assert_eq!(mcu.read(&mut other), Err(nb::Error::WouldBlock));
    }
}
