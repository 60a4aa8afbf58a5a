use super::{io, Memory, OAM_SIZE};

impl Memory {
    /// OAM DMA: copy 160 bytes from `value << 8` into 0xFE00–0xFE9F.
    ///
    /// The transfer completes immediately; the 160 M-cycle bus lockout is
    /// not modelled.
    pub(super) fn oam_dma(&mut self, value: u8) {
        let base = u16::from(value) << 8;
        for i in 0..OAM_SIZE as u16 {
            self.oam[i as usize] = self.peek(base.wrapping_add(i));
        }
        self.set_io_register(io::DMA, value);
        log::trace!("OAM DMA from {base:#06x}");
    }
}
