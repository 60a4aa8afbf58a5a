use super::{LcdControl, Ppu, SHADES};
use crate::memory::{io, Memory};
use crate::SCREEN_WIDTH;

const MAX_SPRITES_PER_LINE: usize = 10;

/// OAM attribute bits.
const ATTR_BEHIND_BG: u8 = 0x80;
const ATTR_FLIP_Y: u8 = 0x40;
const ATTR_FLIP_X: u8 = 0x20;
const ATTR_OBP1: u8 = 0x10;

#[inline]
fn shade(palette: u8, color: u8) -> u8 {
    (palette >> (color * 2)) & 0x03
}

#[derive(Clone, Copy)]
struct Sprite {
    y: i16,
    x: i16,
    tile: u8,
    attrs: u8,
}

impl Ppu {
    /// Draw the current line into the frame buffer.
    pub(super) fn render_scanline(&mut self, memory: &Memory) {
        let y = usize::from(self.line);
        let lcdc = LcdControl::from_bits_retain(memory.io_register(io::LCDC));

        if !lcdc.contains(LcdControl::ENABLE) {
            self.frame.row_mut(y).fill(SHADES[0]);
            return;
        }

        // Colour numbers before palette lookup; sprites need them for the
        // behind-background attribute.
        let mut colors = [0u8; SCREEN_WIDTH];
        // Background and window off: white, whatever BGP says.
        let mut shades = [0u8; SCREEN_WIDTH];
        if lcdc.contains(LcdControl::BG_ENABLE) {
            self.render_background(memory, lcdc, &mut colors);
            self.render_window(memory, lcdc, &mut colors);

            let bgp = memory.io_register(io::BGP);
            for (out, &color) in shades.iter_mut().zip(colors.iter()) {
                *out = shade(bgp, color);
            }
        }

        if lcdc.contains(LcdControl::OBJ_ENABLE) {
            self.render_sprites(memory, lcdc, &colors, &mut shades);
        }

        let row = self.frame.row_mut(y);
        for (px, &s) in row.chunks_exact_mut(3).zip(shades.iter()) {
            px.fill(SHADES[usize::from(s)]);
        }
    }

    fn render_background(&self, memory: &Memory, lcdc: LcdControl, colors: &mut [u8; SCREEN_WIDTH]) {
        let scy = memory.io_register(io::SCY);
        let scx = memory.io_register(io::SCX);
        let vram = memory.vram();

        let bg_y = self.line.wrapping_add(scy);
        let map_row = lcdc.bg_map_base() - 0x8000 + u16::from(bg_y / 8) * 32;
        let fine_y = usize::from(bg_y % 8);

        for (x, out) in colors.iter_mut().enumerate() {
            let bg_x = (x as u8).wrapping_add(scx);
            let tile = vram[usize::from(map_row + u16::from(bg_x / 8))];
            *out = self.tiles.tile(lcdc.tile_index(tile))[fine_y][usize::from(bg_x % 8)];
        }
    }

    /// The window covers the background from (WX - 7, WY) to the bottom
    /// right corner. Its own line counter only advances on lines where it
    /// was actually drawn.
    fn render_window(&mut self, memory: &Memory, lcdc: LcdControl, colors: &mut [u8; SCREEN_WIDTH]) {
        if !lcdc.contains(LcdControl::WINDOW_ENABLE) {
            return;
        }
        let wy = memory.io_register(io::WY);
        let wx = i16::from(memory.io_register(io::WX)) - 7;
        if self.line < wy || wx >= SCREEN_WIDTH as i16 {
            return;
        }

        let vram = memory.vram();
        let win_y = self.window_line;
        let map_row = lcdc.window_map_base() - 0x8000 + u16::from(win_y / 8) * 32;
        let fine_y = usize::from(win_y % 8);

        let start = wx.max(0) as usize;
        for (x, out) in colors.iter_mut().enumerate().skip(start) {
            let win_x = (x as i16 - wx) as u16;
            let tile = vram[usize::from(map_row + win_x / 8)];
            *out = self.tiles.tile(lcdc.tile_index(tile))[fine_y][usize::from(win_x % 8)];
        }
        self.window_line = self.window_line.wrapping_add(1);
    }

    /// Up to ten sprites per line, chosen in OAM order. Where sprites
    /// overlap the one with the smaller X wins, then the one earlier in OAM.
    fn render_sprites(
        &self,
        memory: &Memory,
        lcdc: LcdControl,
        bg_colors: &[u8; SCREEN_WIDTH],
        shades: &mut [u8; SCREEN_WIDTH],
    ) {
        let height = i16::from(lcdc.sprite_height());
        let line = i16::from(self.line);

        let mut sprites: Vec<Sprite> = memory
            .oam()
            .chunks_exact(4)
            .map(|entry| Sprite {
                y: i16::from(entry[0]) - 16,
                x: i16::from(entry[1]) - 8,
                tile: entry[2],
                attrs: entry[3],
            })
            .filter(|s| line >= s.y && line < s.y + height)
            .take(MAX_SPRITES_PER_LINE)
            .collect();
        // Stable sort keeps OAM order for equal X.
        sprites.sort_by_key(|s| s.x);

        let obp0 = memory.io_register(io::OBP0);
        let obp1 = memory.io_register(io::OBP1);
        let mut drawn = [false; SCREEN_WIDTH];

        for sprite in &sprites {
            let mut row = line - sprite.y;
            if sprite.attrs & ATTR_FLIP_Y != 0 {
                row = height - 1 - row;
            }
            let tile = if height == 16 {
                (sprite.tile & 0xFE) + (row / 8) as u8
            } else {
                sprite.tile
            };
            let pixels = &self.tiles.tile(usize::from(tile))[(row % 8) as usize];
            let palette = if sprite.attrs & ATTR_OBP1 != 0 { obp1 } else { obp0 };

            for col in 0..8i16 {
                let x = sprite.x + col;
                if !(0..SCREEN_WIDTH as i16).contains(&x) {
                    continue;
                }
                let x = x as usize;
                if drawn[x] {
                    continue;
                }

                let src = if sprite.attrs & ATTR_FLIP_X != 0 { 7 - col } else { col };
                let color = pixels[src as usize];
                // Colour 0 is transparent.
                if color == 0 {
                    continue;
                }
                drawn[x] = true;
                if sprite.attrs & ATTR_BEHIND_BG != 0 && bg_colors[x] != 0 {
                    continue;
                }
                shades[x] = shade(palette, color);
            }
        }
    }
}
