use bitflags::bitflags;

bitflags! {
    /// LCDC (0xFF40).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LcdControl: u8 {
        const ENABLE        = 0b1000_0000;
        /// Window tile map at 0x9C00 instead of 0x9800.
        const WINDOW_MAP    = 0b0100_0000;
        const WINDOW_ENABLE = 0b0010_0000;
        /// Unsigned tile data at 0x8000 instead of signed at 0x8800.
        const TILE_DATA     = 0b0001_0000;
        /// Background tile map at 0x9C00 instead of 0x9800.
        const BG_MAP        = 0b0000_1000;
        /// 8x16 sprites instead of 8x8.
        const OBJ_SIZE      = 0b0000_0100;
        const OBJ_ENABLE    = 0b0000_0010;
        const BG_ENABLE     = 0b0000_0001;
    }
}

bitflags! {
    /// The writable interrupt-select half of STAT (0xFF41) plus the
    /// coincidence flag. Bits 0–1 hold the mode and are handled separately.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LcdStatus: u8 {
        const LYC_INT     = 0b0100_0000;
        const OAM_INT     = 0b0010_0000;
        const VBLANK_INT  = 0b0001_0000;
        const HBLANK_INT  = 0b0000_1000;
        const COINCIDENCE = 0b0000_0100;
    }
}

impl LcdControl {
    #[inline]
    pub fn bg_map_base(self) -> u16 {
        if self.contains(LcdControl::BG_MAP) {
            0x9C00
        } else {
            0x9800
        }
    }

    #[inline]
    pub fn window_map_base(self) -> u16 {
        if self.contains(LcdControl::WINDOW_MAP) {
            0x9C00
        } else {
            0x9800
        }
    }

    /// Map a background/window tile number to an index into the tile
    /// cache. In signed mode numbers 0–127 live at 0x9000 (cache tiles
    /// 256–383) and 128–255 at 0x8800.
    #[inline]
    pub fn tile_index(self, tile: u8) -> usize {
        if self.contains(LcdControl::TILE_DATA) || tile >= 128 {
            usize::from(tile)
        } else {
            256 + usize::from(tile)
        }
    }

    #[inline]
    pub fn sprite_height(self) -> u8 {
        if self.contains(LcdControl::OBJ_SIZE) {
            16
        } else {
            8
        }
    }
}
