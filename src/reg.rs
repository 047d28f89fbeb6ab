//! # Register interface
//!
//! Every hardware access of this crate goes through [`RegisterAccess`]. An
//! address is a location in the AVR data address space, i.e. the I/O address
//! plus `0x20` for registers in the low I/O range.
//!
//! On the target, [`Mmio`] performs volatile reads and writes. On a host,
//! [`SimRegisters`](crate::sim::SimRegisters) models the registers this crate
//! touches.

/// Address in the data address space
pub type Addr = u16;

/// Byte-wide register access
///
/// Writes require `&mut self`, so exclusive ownership of the implementor is
/// exclusive ownership of the registers. Read-modify-write helpers are not
/// atomic with respect to interrupt handlers; callers sharing a control
/// register with an interrupt handler must wrap the call in a critical
/// section.
pub trait RegisterAccess {
    /// Read the register at `addr`
    fn read(&self, addr: Addr) -> u8;

    /// Write `value` to the register at `addr`
    fn write(&mut self, addr: Addr, value: u8);

    #[inline]
    fn modify(&mut self, addr: Addr, f: impl FnOnce(u8) -> u8) {
        let value = self.read(addr);
        self.write(addr, f(value));
    }

    /// Set the bits of `mask`, leaving all other bits untouched
    #[inline]
    fn set_bits(&mut self, addr: Addr, mask: u8) {
        self.modify(addr, |v| v | mask);
    }

    /// Clear the bits of `mask`, leaving all other bits untouched
    #[inline]
    fn clear_bits(&mut self, addr: Addr, mask: u8) {
        self.modify(addr, |v| v & !mask);
    }

    /// Replace the bits selected by `mask` with the matching bits of `bits`
    #[inline]
    fn write_field(&mut self, addr: Addr, mask: u8, bits: u8) {
        self.modify(addr, |v| (v & !mask) | (bits & mask));
    }
}

/// A single bit inside a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterBit {
    pub addr: Addr,
    pub mask: u8,
}

impl RegisterBit {
    pub const fn new(addr: Addr, bit: u8) -> Self {
        RegisterBit {
            addr,
            mask: 1 << bit,
        }
    }

    #[inline]
    pub fn is_set<R: RegisterAccess>(&self, regs: &R) -> bool {
        regs.read(self.addr) & self.mask != 0
    }

    #[inline]
    pub fn write<R: RegisterAccess>(&self, regs: &mut R, set: bool) {
        if set {
            regs.set_bits(self.addr, self.mask);
        } else {
            regs.clear_bits(self.addr, self.mask);
        }
    }
}

/// Volatile access to the memory mapped registers of the running part
///
/// [`Mmio`] is a zero-sized token. Holding it is the permission to touch any
/// register, so there must be at most one in existence.
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create the register token
    ///
    /// # Safety
    ///
    /// Only valid on the AVR part the firmware was built for, and at most one
    /// [`Mmio`] may exist at any given time. Creating a second one allows
    /// unsynchronized read-modify-write of shared control registers.
    #[inline]
    pub unsafe fn steal() -> Self {
        Mmio { _private: () }
    }
}

impl RegisterAccess for Mmio {
    #[inline(always)]
    fn read(&self, addr: Addr) -> u8 {
        // Safety: the caller of `steal` guarantees that we run on the part
        // whose register map produced `addr`
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    #[inline(always)]
    fn write(&mut self, addr: Addr, value: u8) {
        // Safety: see `read`; `&mut self` serializes writers
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, value) }
    }
}

impl<T: RegisterAccess> RegisterAccess for &mut T {
    #[inline]
    fn read(&self, addr: Addr) -> u8 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&mut self, addr: Addr, value: u8) {
        (**self).write(addr, value)
    }
}
