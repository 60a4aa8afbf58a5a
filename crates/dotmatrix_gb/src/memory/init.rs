use super::{io, Memory};

impl Memory {
    /// I/O register values left behind by the DMG boot ROM (Pan Docs,
    /// "Power Up Sequence"). Audio registers are included because software
    /// can observe them even though no APU is emulated.
    pub(super) fn apply_post_boot_io_state(&mut self) {
        const POST_BOOT: &[(u16, u8)] = &[
            (io::JOYP, 0x30),
            (0xFF05, 0x00), // TIMA
            (0xFF06, 0x00), // TMA
            (0xFF07, 0x00), // TAC
            (io::IF, 0x01),
            (0xFF10, 0x80),
            (0xFF11, 0xBF),
            (0xFF12, 0xF3),
            (0xFF14, 0xBF),
            (0xFF16, 0x3F),
            (0xFF17, 0x00),
            (0xFF19, 0xBF),
            (0xFF1A, 0x7F),
            (0xFF1B, 0xFF),
            (0xFF1C, 0x9F),
            (0xFF1E, 0xBF),
            (0xFF20, 0xFF),
            (0xFF21, 0x00),
            (0xFF22, 0x00),
            (0xFF23, 0xBF),
            (0xFF24, 0x77),
            (0xFF25, 0xF3),
            (0xFF26, 0xF1),
            (io::LCDC, 0x91),
            (io::STAT, 0x05),
            (io::SCY, 0x00),
            (io::SCX, 0x00),
            (io::LY, 0x00),
            (io::LYC, 0x00),
            (io::DMA, 0xFF),
            (io::BGP, 0xFC),
            (io::OBP0, 0xFF),
            (io::OBP1, 0xFF),
            (io::WY, 0x00),
            (io::WX, 0x00),
        ];

        for &(addr, value) in POST_BOOT {
            self.set_io_register(addr, value);
        }
        self.hram[(io::IE - 0xFF80) as usize] = 0x00;
    }
}
