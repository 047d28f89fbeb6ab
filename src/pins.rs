//! # Pin data model
//!
//! Capability tables store one byte per logical pin. The byte encodings and
//! the reserved sentinel values are defined here, together with the typed
//! views callers use instead of comparing against sentinels:
//!
//! | table | typed view | sentinel |
//! |---|---|---|
//! | pin to port | [`Port`] | [`NOT_A_PORT`] |
//! | pin to bit mask | `u8` with one bit set | [`NOT_A_PIN`] |
//! | pin to timer | [`TimerChannel`] | [`NOT_ON_TIMER`], [`NOT_A_TIMER`] |
//! | pin to analog input | mux channel `u8` | [`NOT_A_CHANNEL`] |
//! | port to register | [`PortRegisters`] | [`NOT_A_REGISTER`] |
use crate::reg::Addr;

//==================================================================================================
//  Sentinels
//==================================================================================================

/// Bit mask of a pin that does not exist
pub const NOT_A_PIN: u8 = 255;
/// Port id of a pin that does not exist
pub const NOT_A_PORT: u8 = 0;
/// Timer byte of a pin that does not exist
pub const NOT_A_TIMER: u8 = 255;
/// Analog input of a pin without ADC channel
pub const NOT_A_CHANNEL: u8 = 127;
/// Register address of a port that does not exist
pub const NOT_A_REGISTER: u8 = 0;

//==================================================================================================
//  Ports
//==================================================================================================

/// Hardware port, numbered like the port tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Port {
    A = 1,
    B = 2,
    C = 3,
    D = 4,
}

impl Port {
    pub const fn from_id(id: u8) -> Option<Port> {
        match id {
            1 => Some(Port::A),
            2 => Some(Port::B),
            3 => Some(Port::C),
            4 => Some(Port::D),
            _ => None,
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// The three registers controlling one port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PortRegisters {
    /// PINx
    pub input: Addr,
    /// PORTx
    pub output: Addr,
    /// DDRx
    pub mode: Addr,
}

/// Port and bit of a logical pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinBinding {
    pub port: Port,
    /// Exactly one bit set
    pub mask: u8,
}

//==================================================================================================
//  Timer channels
//==================================================================================================

pub const NOT_ON_TIMER: u8 = 0;
pub const TIMER0A: u8 = 1;
pub const TIMER0B: u8 = 2;
pub const TIMER1A: u8 = 3;
pub const TIMER1B: u8 = 4;
pub const TIMER2A: u8 = 5;
pub const TIMER2B: u8 = 6;
pub const TIMER1D: u8 = 7;

// Timer 1 of the ATtiny87/167 drives the same waveform on up to four pins per
// channel. Bit 2 selects channel B, bits 1:0 select the output pin.
pub const TIM1AU: u8 = 0x08;
pub const TIM1AV: u8 = 0x09;
pub const TIM1AW: u8 = 0x0A;
pub const TIM1AX: u8 = 0x0B;
pub const TIM1BU: u8 = 0x0C;
pub const TIM1BV: u8 = 0x0D;
pub const TIM1BW: u8 = 0x0E;
pub const TIM1BX: u8 = 0x0F;

// TOCC slots of the ATtiny441/841. The timer byte is `0b tttt s ccc`:
// `ccc` is the channel, `tttt` is `1 << (slot & 3)` and `s` is set for slots 4..8.
pub const TOCC0: u8 = 0x10;
pub const TOCC1: u8 = 0x20;
pub const TOCC2: u8 = 0x40;
pub const TOCC3: u8 = 0x80;
pub const TOCC4: u8 = 0x18;
pub const TOCC5: u8 = 0x28;
pub const TOCC6: u8 = 0x48;
pub const TOCC7: u8 = 0x88;

/// Encode a TOCC slot and a channel code into a timer byte
pub const fn tocc(slot: u8, channel: u8) -> u8 {
    let high = if slot >= 4 { 0x08 } else { 0x00 };
    ((1 << (slot & 0x03)) << 4) | high | (channel & 0x07)
}

/// A compare unit: timer number plus comparator letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    Timer0A = TIMER0A,
    Timer0B = TIMER0B,
    Timer1A = TIMER1A,
    Timer1B = TIMER1B,
    Timer2A = TIMER2A,
    Timer2B = TIMER2B,
    Timer1D = TIMER1D,
}

impl Channel {
    pub const fn from_code(code: u8) -> Option<Channel> {
        match code {
            TIMER0A => Some(Channel::Timer0A),
            TIMER0B => Some(Channel::Timer0B),
            TIMER1A => Some(Channel::Timer1A),
            TIMER1B => Some(Channel::Timer1B),
            TIMER2A => Some(Channel::Timer2A),
            TIMER2B => Some(Channel::Timer2B),
            TIMER1D => Some(Channel::Timer1D),
            _ => None,
        }
    }
}

/// Output pin of the ATtiny87/167 timer 1 output multiplexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Tim1Output {
    U = 0,
    V = 1,
    W = 2,
    X = 3,
}

/// Typed view of a pin's timer byte
///
/// Every byte decodes to exactly one variant. Which variants a part can
/// actually drive is decided by its [`PwmRouting`](crate::pwm::PwmRouting).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerChannel {
    /// No timer drives this pin ([`NOT_ON_TIMER`] or [`NOT_A_TIMER`])
    NotOnTimer,
    /// Compare output wired to a fixed pin
    Direct(Channel),
    /// Timer 1 channel fanned out through the output multiplexer
    Multiplexed { channel: Channel, output: Tim1Output },
    /// Channel routed through a TOCC slot of the timer output mux
    Tocc { slot: u8, channel: Channel },
    /// A byte no encoding produces
    Unknown(u8),
}

impl TimerChannel {
    pub const fn from_code(code: u8) -> TimerChannel {
        match code {
            NOT_ON_TIMER | NOT_A_TIMER => TimerChannel::NotOnTimer,
            TIMER0A..=TIMER1D => match Channel::from_code(code) {
                Some(channel) => TimerChannel::Direct(channel),
                None => TimerChannel::Unknown(code),
            },
            TIM1AU..=TIM1BX => {
                let channel = if code & 0x04 != 0 {
                    Channel::Timer1B
                } else {
                    Channel::Timer1A
                };
                let output = match code & 0x03 {
                    0 => Tim1Output::U,
                    1 => Tim1Output::V,
                    2 => Tim1Output::W,
                    _ => Tim1Output::X,
                };
                TimerChannel::Multiplexed { channel, output }
            }
            _ => {
                let onehot = code >> 4;
                if onehot.count_ones() != 1 {
                    return TimerChannel::Unknown(code);
                }
                let slot = onehot.trailing_zeros() as u8 + if code & 0x08 != 0 { 4 } else { 0 };
                match Channel::from_code(code & 0x07) {
                    Some(channel) => TimerChannel::Tocc { slot, channel },
                    None => TimerChannel::Unknown(code),
                }
            }
        }
    }

    /// Encode back into the table byte
    pub const fn code(self) -> u8 {
        match self {
            TimerChannel::NotOnTimer => NOT_ON_TIMER,
            TimerChannel::Direct(channel) => channel as u8,
            TimerChannel::Multiplexed { channel, output } => {
                let b = if matches!(channel, Channel::Timer1B) { 0x04 } else { 0x00 };
                TIM1AU | b | output as u8
            }
            TimerChannel::Tocc { slot, channel } => tocc(slot, channel as u8),
            TimerChannel::Unknown(code) => code,
        }
    }
}

//==================================================================================================
//  Analog sources
//==================================================================================================

/// Tag marking a byte as an ADC mux channel rather than a digital pin
pub const ADC_CHANNEL_TAG: u8 = 0x80;

/// Tag a mux channel so [`analog_read`](crate::Mcu::analog_read) skips the
/// digital pin translation
#[inline]
pub const fn adc_ch(channel: u8) -> u8 {
    ADC_CHANNEL_TAG | channel
}

/// What an analog read argument refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogSource {
    /// Logical pin number, translated through the analog input table
    Digital(u8),
    /// Raw mux channel, tag already stripped
    Channel(u8),
}

impl From<u8> for AnalogSource {
    #[inline]
    fn from(pin: u8) -> Self {
        if pin & ADC_CHANNEL_TAG != 0 {
            AnalogSource::Channel(pin & !ADC_CHANNEL_TAG)
        } else {
            AnalogSource::Digital(pin)
        }
    }
}
