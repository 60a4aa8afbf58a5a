use crate::memory::{TILE_DATA_END, VRAM_SIZE};

/// Tiles in 0x8000–0x97FF.
pub const TILE_COUNT: usize = 384;

/// One decoded tile: `tile[row][col]` is a 2-bit colour number, col 0 on
/// the left.
pub type Tile = [[u8; 8]; 8];

/// Decoded copy of the tile data area, kept in step with VRAM.
#[derive(Clone, PartialEq, Eq)]
pub struct TileCache {
    tiles: Vec<Tile>,
}

impl Default for TileCache {
    fn default() -> Self {
        Self {
            tiles: vec![[[0; 8]; 8]; TILE_COUNT],
        }
    }
}

impl std::fmt::Debug for TileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileCache")
            .field("tiles", &self.tiles.len())
            .finish()
    }
}

impl TileCache {
    /// Decode every tile from scratch.
    pub fn build_tile_data(&mut self, vram: &[u8; VRAM_SIZE]) {
        for addr in (0x8000..TILE_DATA_END).step_by(2) {
            self.update_tile(vram, addr);
        }
    }

    /// Re-decode the 8-pixel row containing `addr`. Either byte of the row
    /// may be passed. Addresses outside tile data are ignored.
    pub fn update_tile(&mut self, vram: &[u8; VRAM_SIZE], addr: u16) {
        if !(0x8000..TILE_DATA_END).contains(&addr) {
            return;
        }

        let base = usize::from(addr - 0x8000) & !1;
        let tile = base / 16;
        let row = (base % 16) / 2;
        let low = vram[base];
        let high = vram[base + 1];

        for (col, pixel) in self.tiles[tile][row].iter_mut().enumerate() {
            let bit = 7 - col;
            *pixel = ((high >> bit) & 1) << 1 | ((low >> bit) & 1);
        }
    }

    #[inline]
    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index % TILE_COUNT]
    }
}
