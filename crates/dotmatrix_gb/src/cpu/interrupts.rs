use super::{Bus, Cpu};

pub const IE_ADDR: u16 = 0xFFFF;
pub const IF_ADDR: u16 = 0xFF0F;

/// Interrupt sources in priority order; the bit index doubles as the
/// vector offset (`0x40 + 8 * index`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub fn mask(self) -> u8 {
        1 << self as u8
    }

    #[inline]
    pub fn vector(self) -> u16 {
        0x0040 + u16::from(self as u8) * 8
    }
}

impl Cpu {
    /// Service the highest-priority pending interrupt, if any.
    ///
    /// A halted CPU wakes as soon as `IE & IF` is non-zero; with IME clear it
    /// just resumes at the next instruction. Returns `Some(20)` when an
    /// interrupt was dispatched.
    pub(super) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        let iflags = bus.read8(IF_ADDR);
        let pending = bus.read8(IE_ADDR) & iflags & 0x1F;
        if pending == 0 {
            return None;
        }

        self.halted = false;
        if !self.ime {
            return None;
        }

        let interrupt = Interrupt::ALL
            .into_iter()
            .find(|i| pending & i.mask() != 0)?;
        log::debug!(
            "interrupt {:?} -> {:#06x} (pc={:#06x} sp={:#06x})",
            interrupt,
            interrupt.vector(),
            self.regs.pc,
            self.regs.sp
        );

        self.ime = false;
        bus.write8(IF_ADDR, iflags & !interrupt.mask());
        let pc = self.regs.pc;
        self.push_u16(bus, pc);
        self.regs.pc = interrupt.vector();

        Some(20)
    }
}
