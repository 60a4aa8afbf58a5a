use super::{LcdControl, LcdStatus, Ppu, PpuMode};
use crate::cpu::Interrupt;
use crate::memory::{io, Memory};

impl Ppu {
    /// Write the mode and LY=LYC bits into STAT and raise the STAT
    /// interrupt on a rising edge of the enabled sources.
    pub(super) fn update_status(&mut self, memory: &mut Memory) {
        let lcdc = LcdControl::from_bits_retain(memory.io_register(io::LCDC));
        let raw = memory.io_register(io::STAT);
        let mut status = LcdStatus::from_bits_truncate(raw);
        status.set(
            LcdStatus::COINCIDENCE,
            memory.io_register(io::LYC) == self.line,
        );
        memory.set_io_register(io::STAT, (raw & 0x80) | status.bits() | self.mode as u8);

        if !lcdc.contains(LcdControl::ENABLE) {
            self.stat_line = false;
            return;
        }

        let line = (status.contains(LcdStatus::LYC_INT) && status.contains(LcdStatus::COINCIDENCE))
            || match self.mode {
                PpuMode::HBlank => status.contains(LcdStatus::HBLANK_INT),
                PpuMode::VBlank => status.contains(LcdStatus::VBLANK_INT),
                PpuMode::Oam => status.contains(LcdStatus::OAM_INT),
                PpuMode::Vram => false,
            };

        if line && !self.stat_line {
            memory.request_interrupt(Interrupt::LcdStat);
            log::trace!("STAT interrupt (mode {:?}, line {})", self.mode, self.line);
        }
        self.stat_line = line;
    }
}
