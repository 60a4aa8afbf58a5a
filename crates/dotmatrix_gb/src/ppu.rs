mod lcdc;
mod render;
mod status;
mod tiles;

pub use lcdc::{LcdControl, LcdStatus};
pub use tiles::{Tile, TileCache, TILE_COUNT};

use crate::cpu::Interrupt;
use crate::memory::{io, Memory};
use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Machine cycles spent in each mode of a visible line.
pub const OAM_CYCLES: u32 = 20;
pub const VRAM_CYCLES: u32 = 43;
pub const HBLANK_CYCLES: u32 = 51;
/// Machine cycles per line; every V-Blank line lasts this long.
pub const LINE_CYCLES: u32 = OAM_CYCLES + VRAM_CYCLES + HBLANK_CYCLES;

/// First V-Blank line.
pub const VBLANK_LINE: u8 = SCREEN_HEIGHT as u8;
pub const LAST_LINE: u8 = 153;

/// The four PPU modes, numbered as in STAT bits 0–1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum PpuMode {
    HBlank = 0,
    VBlank = 1,
    #[default]
    Oam = 2,
    Vram = 3,
}

/// DMG shades as RGB grey levels, indexed by palette colour 0–3.
pub const SHADES: [u8; 4] = [0xFF, 0xAA, 0x55, 0x00];

/// A 160x144 RGB24 picture.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl Default for FrameBuffer {
    /// All white.
    fn default() -> Self {
        Self {
            pixels: vec![SHADES[0]; SCREEN_WIDTH * SCREEN_HEIGHT * 3],
        }
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl FrameBuffer {
    /// Row-major RGB24 bytes, `SCREEN_WIDTH * SCREEN_HEIGHT * 3` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * SCREEN_WIDTH + x) * 3;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    /// Palette shade (0–3) at a pixel, recovered from its grey level.
    pub fn shade(&self, x: usize, y: usize) -> u8 {
        let grey = self.pixel(x, y)[0];
        SHADES.iter().position(|&s| s == grey).unwrap_or(0) as u8
    }

    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * SCREEN_WIDTH * 3;
        &mut self.pixels[start..start + SCREEN_WIDTH * 3]
    }
}

/// Pixel processing unit.
///
/// Counts machine cycles handed to [`Ppu::sync`] and walks the
/// OAM → VRAM → H-Blank cycle for lines 0–143, then ten V-Blank lines. A
/// line is rendered into the frame buffer as it leaves VRAM mode.
///
/// Memory is borrowed per call; every register is read fresh from it.
#[derive(Debug)]
pub struct Ppu {
    mode: PpuMode,
    /// Cycles accumulated in the current mode.
    clock: u32,
    line: u8,
    /// Lines of the window drawn so far this frame.
    window_line: u8,
    tiles: TileCache,
    frame: FrameBuffer,
    frame_ready: bool,
    /// Level of the combined STAT interrupt sources after the last update.
    stat_line: bool,
}

impl Ppu {
    /// Create a PPU and hook it up to `memory`'s tile data writes.
    pub fn new(memory: &mut Memory) -> Self {
        memory.attach_ppu();

        let mut tiles = TileCache::default();
        tiles.build_tile_data(memory.vram());
        // Anything queued before the full decode is already reflected.
        memory.take_tile_writes();

        let mut ppu = Self {
            mode: PpuMode::Oam,
            clock: 0,
            line: 0,
            window_line: 0,
            tiles,
            frame: FrameBuffer::default(),
            frame_ready: false,
            stat_line: false,
        };
        memory.set_io_register(io::LY, 0);
        ppu.update_status(memory);
        ppu
    }

    pub fn mode(&self) -> PpuMode {
        self.mode
    }

    pub fn line(&self) -> u8 {
        self.line
    }

    /// Cycles spent so far in the current mode.
    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn frame_ready(&self) -> bool {
        self.frame_ready
    }

    pub fn tiles(&self) -> &TileCache {
        &self.tiles
    }

    /// The frame buffer as drawn so far, complete or not.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Take the finished frame, once. Returns `None` until the next V-Blank
    /// after a frame has been taken.
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if !self.frame_ready {
            return None;
        }
        self.frame_ready = false;
        Some(self.frame.clone())
    }

    /// Advance by `cycles` machine cycles.
    ///
    /// Leftover cycles carry into the next mode, so one call may cross
    /// several transitions.
    pub fn sync(&mut self, memory: &mut Memory, cycles: u32) {
        self.refresh_tiles(memory);
        self.clock += cycles;

        loop {
            match self.mode {
                PpuMode::Oam if self.clock >= OAM_CYCLES => {
                    self.clock -= OAM_CYCLES;
                    self.enter_mode(memory, PpuMode::Vram);
                }
                PpuMode::Vram if self.clock >= VRAM_CYCLES => {
                    self.clock -= VRAM_CYCLES;
                    self.render_scanline(memory);
                    self.enter_mode(memory, PpuMode::HBlank);
                }
                PpuMode::HBlank if self.clock >= HBLANK_CYCLES => {
                    self.clock -= HBLANK_CYCLES;
                    self.set_line(memory, self.line + 1);
                    if self.line == VBLANK_LINE {
                        self.enter_vblank(memory);
                    } else {
                        self.enter_mode(memory, PpuMode::Oam);
                    }
                }
                PpuMode::VBlank if self.clock >= LINE_CYCLES => {
                    self.clock -= LINE_CYCLES;
                    if self.line >= LAST_LINE {
                        self.set_line(memory, 0);
                        self.window_line = 0;
                        self.frame_ready = false;
                        self.enter_mode(memory, PpuMode::Oam);
                    } else {
                        self.set_line(memory, self.line + 1);
                        self.update_status(memory);
                    }
                }
                _ => break,
            }
        }
    }

    fn enter_vblank(&mut self, memory: &mut Memory) {
        self.frame_ready = true;
        let lcdc = LcdControl::from_bits_retain(memory.io_register(io::LCDC));
        if lcdc.contains(LcdControl::ENABLE) {
            memory.request_interrupt(Interrupt::VBlank);
        }
        log::debug!("frame ready");
        self.enter_mode(memory, PpuMode::VBlank);
    }

    fn enter_mode(&mut self, memory: &mut Memory, mode: PpuMode) {
        self.mode = mode;
        self.update_status(memory);
    }

    fn set_line(&mut self, memory: &mut Memory, line: u8) {
        self.line = line;
        memory.set_io_register(io::LY, line);
    }

    /// Re-decode tile rows written since the last call.
    fn refresh_tiles(&mut self, memory: &mut Memory) {
        let writes = memory.take_tile_writes();
        for addr in writes {
            self.tiles.update_tile(memory.vram(), addr);
        }
    }
}

#[cfg(test)]
mod tests;
