mod boot;
mod cartridge;
mod dma;
mod init;
pub mod io;

pub use boot::{BOOT_ROM_LEN, DMG_BOOT_ROM};
pub use cartridge::{BankingKind, CARTRIDGE_TYPE_ADDR, RAM_SIZE_ADDR};

use crate::cpu::{Bus, Interrupt};
use crate::GbError;
use cartridge::Cartridge;

pub const VRAM_SIZE: usize = 0x2000;
pub const OAM_SIZE: usize = 0xA0;
const WRAM_SIZE: usize = 0x2000;
const IO_SIZE: usize = (io::IO_END - 0xFF00) as usize;
const HRAM_SIZE: usize = 0x80;

/// End of the tile data area (exclusive); VRAM above it holds tile maps.
pub const TILE_DATA_END: u16 = 0x9800;

/// Outcome of [`Memory::load_cartridge`]. Loading never fails; an unknown
/// cartridge type is mapped as a plain ROM and reported in `warning`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CartridgeLoad {
    pub kind: BankingKind,
    pub warning: Option<GbError>,
}

/// The DMG address space.
///
/// Owns every byte the CPU and PPU can see plus the cartridge banking state.
/// Regions and their backing stores:
///
/// | range         | backing                                   |
/// |---------------|-------------------------------------------|
/// | 0x0000–0x7FFF | cartridge ROM (boot ROM overlay at start) |
/// | 0x8000–0x9FFF | VRAM                                      |
/// | 0xA000–0xBFFF | cartridge RAM / RTC                       |
/// | 0xC000–0xDFFF | work RAM                                  |
/// | 0xE000–0xFDFF | echo of work RAM                          |
/// | 0xFE00–0xFE9F | OAM                                       |
/// | 0xFF00–0xFF4B | I/O registers                             |
/// | 0xFF80–0xFFFF | high RAM, including IE                    |
///
/// Everything else reads as 0 and ignores writes.
pub struct Memory {
    cartridge: Cartridge,
    vram: [u8; VRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    oam: [u8; OAM_SIZE],
    io: [u8; IO_SIZE],
    hram: [u8; HRAM_SIZE],
    boot_rom_active: bool,
    /// Tile data writes not yet seen by the PPU. `None` until a PPU is
    /// attached.
    tile_writes: Option<Vec<u16>>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Power-on memory: no cartridge, all RAM and registers zero, boot ROM
    /// mapped.
    pub fn new() -> Self {
        Self {
            cartridge: Cartridge::default(),
            vram: [0; VRAM_SIZE],
            wram: [0; WRAM_SIZE],
            oam: [0; OAM_SIZE],
            io: [0; IO_SIZE],
            hram: [0; HRAM_SIZE],
            boot_rom_active: true,
            tile_writes: None,
        }
    }

    /// Insert a cartridge image, choosing the banking strategy from header
    /// byte 0x147.
    pub fn load_cartridge(&mut self, rom: &[u8]) -> CartridgeLoad {
        let code = rom.get(CARTRIDGE_TYPE_ADDR).copied().unwrap_or(0);
        let (kind, warning) = match BankingKind::from_type_code(code) {
            Some(kind) => (kind, None),
            None => {
                let warning = GbError::UnrecognizedCartridgeType { code };
                log::warn!("{warning}");
                (BankingKind::None, Some(warning))
            }
        };

        self.cartridge = Cartridge::new(kind, rom);
        log::debug!(
            "cartridge loaded: {} bytes, type {code:#04x}, banking {kind:?}",
            rom.len()
        );
        CartridgeLoad { kind, warning }
    }

    pub fn banking_kind(&self) -> BankingKind {
        self.cartridge.kind()
    }

    /// ROM bank mapped at 0x4000–0x7FFF.
    pub fn rom_bank(&self) -> usize {
        self.cartridge.rom_bank()
    }

    /// Start recording writes to tile data (0x8000–0x97FF) for the PPU's
    /// tile cache.
    pub fn attach_ppu(&mut self) {
        if self.tile_writes.is_none() {
            self.tile_writes = Some(Vec::new());
        }
    }

    pub fn boot_rom_active(&self) -> bool {
        self.boot_rom_active
    }

    /// Unmap the boot ROM and put the I/O registers in the state the boot
    /// program leaves them in.
    pub fn skip_boot(&mut self) {
        self.boot_rom_active = false;
        self.apply_post_boot_io_state();
    }

    pub fn read(&mut self, addr: u16) -> u8 {
        if self.boot_rom_active {
            if (addr as usize) < BOOT_ROM_LEN {
                return DMG_BOOT_ROM[addr as usize];
            }
            if addr == 0x0100 {
                log::debug!("boot ROM unmapped");
                self.boot_rom_active = false;
            }
        }
        self.peek(addr)
    }

    /// Read without side effects on the boot overlay. The overlay itself is
    /// not visible through this path.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_read(addr),
            0x8000..=0x9FFF => self.vram[(addr - 0x8000) as usize],
            0xA000..=0xBFFF => self.cartridge.ram_read(addr),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFE00..=0xFE9F => self.oam[(addr - 0xFE00) as usize],
            0xFF00..=0xFF4B => self.read_io(addr),
            0xFF80..=0xFFFF => self.hram[(addr - 0xFF80) as usize],
            _ => 0,
        }
    }

    pub fn write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x7FFF => self.cartridge.rom_write(addr, value),
            0x8000..=0x9FFF => {
                self.vram[(addr - 0x8000) as usize] = value;
                if addr < TILE_DATA_END {
                    if let Some(writes) = self.tile_writes.as_mut() {
                        writes.push(addr);
                    }
                }
            }
            0xA000..=0xBFFF => self.cartridge.ram_write(addr, value),
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = value,
            0xFE00..=0xFE9F => self.oam[(addr - 0xFE00) as usize] = value,
            0xFF00..=0xFF4B => self.write_io(addr, value),
            io::BOOT if value != 0 => {
                if self.boot_rom_active {
                    log::debug!("boot ROM unmapped by write to {:#06x}", io::BOOT);
                }
                self.boot_rom_active = false;
            }
            0xFF80..=0xFFFF => self.hram[(addr - 0xFF80) as usize] = value,
            _ => log::trace!("ignored write {value:#04x} -> {addr:#06x}"),
        }
    }

    /// Register reads as the CPU sees them: unused bits of P1, STAT and IF
    /// read back as 1.
    fn read_io(&self, addr: u16) -> u8 {
        let raw = self.io_register(addr);
        match addr {
            // No buttons are ever pressed.
            io::JOYP => 0xC0 | (raw & 0x30) | 0x0F,
            io::IF => raw | 0xE0,
            io::STAT => raw | 0x80,
            _ => raw,
        }
    }

    fn write_io(&mut self, addr: u16, value: u8) {
        match addr {
            io::JOYP => self.set_io_register(addr, value & 0x30),
            // Mode and coincidence bits belong to the PPU.
            io::STAT => {
                let status = self.io_register(io::STAT);
                self.set_io_register(addr, (value & 0x78) | (status & 0x07));
            }
            io::LY => log::trace!("ignored write to LY"),
            io::DMA => self.oam_dma(value),
            _ => self.set_io_register(addr, value),
        }
    }

    /// Raw I/O register value, bypassing CPU-visible masking. Addresses
    /// outside 0xFF00–0xFF4B read as 0.
    #[inline]
    pub fn io_register(&self, addr: u16) -> u8 {
        addr.checked_sub(0xFF00)
            .and_then(|offset| self.io.get(offset as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Store a raw I/O register value without triggering write side
    /// effects. Used by the PPU for LY and STAT.
    #[inline]
    pub fn set_io_register(&mut self, addr: u16, value: u8) {
        if let Some(slot) = addr
            .checked_sub(0xFF00)
            .and_then(|offset| self.io.get_mut(offset as usize))
        {
            *slot = value;
        }
    }

    pub fn request_interrupt(&mut self, interrupt: Interrupt) {
        let flags = self.io_register(io::IF);
        self.set_io_register(io::IF, flags | interrupt.mask());
    }

    #[inline]
    pub fn vram(&self) -> &[u8; VRAM_SIZE] {
        &self.vram
    }

    #[inline]
    pub fn oam(&self) -> &[u8; OAM_SIZE] {
        &self.oam
    }

    /// Hand over the tile data addresses written since the last call.
    pub(crate) fn take_tile_writes(&mut self) -> Vec<u16> {
        self.tile_writes
            .as_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
