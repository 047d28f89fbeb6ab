//! # Device state
//!
//! [`Mcu`] owns the register interface and the one piece of mutable software
//! state of the analog subsystem, the [`ReferenceMode`] applied by the next
//! conversion. The analog input, analog output and digital I/O operations are
//! implemented on it in their own modules.
use core::marker::PhantomData;

use crate::{adc::ReferenceMode, reg::RegisterAccess, variant::Variant};

/// Analog and digital I/O of one part
///
/// `V` selects the part at build time, `R` is the register interface:
/// [`Mmio`](crate::reg::Mmio) on the target or
/// [`SimRegisters`](crate::sim::SimRegisters) on a host.
pub struct Mcu<V: Variant, R: RegisterAccess> {
    pub(crate) regs: R,
    pub(crate) mode: ReferenceMode,
    /// Mux channel of the conversion started by the non-blocking interface
    pub(crate) pending: Option<u8>,
    _variant: PhantomData<V>,
}

impl<V: Variant, R: RegisterAccess> Mcu<V, R> {
    /// Take ownership of the registers. The reference mode starts at the
    /// part's default reference, unipolar, unity gain.
    pub fn new(regs: R) -> Self {
        Mcu {
            regs,
            mode: ReferenceMode::default_for::<V>(),
            pending: None,
            _variant: PhantomData,
        }
    }

    /// Reference mode the next conversion will use
    #[inline]
    pub fn reference_mode(&self) -> ReferenceMode {
        self.mode
    }

    #[inline]
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Direct register access, bypassing the reference and conversion
    /// bookkeeping of this driver
    #[inline]
    pub fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Give back the register interface
    #[inline]
    pub fn release(self) -> R {
        self.regs
    }
}
