use super::RomImage;

const MBC2_RAM_SIZE: usize = 512;

/// MBC2: up to 16 ROM banks and 512 half-bytes of RAM built into the
/// controller. Both registers live in 0x0000–0x3FFF and are told apart by
/// address bit 8.
pub(crate) struct Mbc2Cartridge {
    rom: RomImage,
    ram: [u8; MBC2_RAM_SIZE],
    rom_bank: u8,
    ram_enabled: bool,
}

impl Mbc2Cartridge {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            rom: RomImage::new(rom),
            ram: [0; MBC2_RAM_SIZE],
            rom_bank: 1,
            ram_enabled: false,
        }
    }

    pub(super) fn rom_bank(&self) -> usize {
        usize::from(self.rom_bank)
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        if addr < 0x4000 {
            self.rom.read(0, addr)
        } else {
            self.rom.read(self.rom_bank(), addr)
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        if addr >= 0x4000 {
            return;
        }
        if addr & 0x0100 == 0 {
            self.ram_enabled = value & 0x0F == 0x0A;
        } else {
            self.rom_bank = match value & 0x0F {
                0 => 1,
                bank => bank,
            };
            log::trace!("MBC2 ROM bank -> {}", self.rom_bank);
        }
    }

    /// The 512-entry RAM repeats across 0xA000–0xBFFF; only the low nibble
    /// is stored and the high nibble reads as 1s.
    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        self.ram[addr as usize & (MBC2_RAM_SIZE - 1)] | 0xF0
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enabled {
            self.ram[addr as usize & (MBC2_RAM_SIZE - 1)] = value & 0x0F;
        }
    }
}
