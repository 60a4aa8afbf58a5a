use super::{ram_bank_count, BankedRam, RomImage};

/// MBC5: 9-bit ROM bank number split over two registers, 4-bit RAM bank.
pub(crate) struct Mbc5Cartridge {
    rom: RomImage,
    ram: BankedRam,
    rom_bank_low8: u8,
    rom_bank_high1: u8,
    ram_bank: u8,
    ram_enabled: bool,
}

impl Mbc5Cartridge {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            rom: RomImage::new(rom),
            ram: BankedRam::new(ram_bank_count(rom)),
            rom_bank_low8: 1,
            rom_bank_high1: 0,
            ram_bank: 0,
            ram_enabled: false,
        }
    }

    /// Selecting bank 0 maps bank 1, the same rule as the older mappers.
    pub(super) fn rom_bank(&self) -> usize {
        match (usize::from(self.rom_bank_high1) << 8) | usize::from(self.rom_bank_low8) {
            0 => 1,
            bank => bank,
        }
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        if addr < 0x4000 {
            self.rom.read(0, addr)
        } else {
            self.rom.read(self.rom_bank(), addr)
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x2FFF => {
                self.rom_bank_low8 = value;
                log::trace!("MBC5 ROM bank -> {}", self.rom_bank());
            }
            0x3000..=0x3FFF => {
                self.rom_bank_high1 = value & 0x01;
                log::trace!("MBC5 ROM bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.ram_bank = value & 0x0F,
            _ => {}
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        self.ram.read(usize::from(self.ram_bank), addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enabled {
            self.ram.write(usize::from(self.ram_bank), addr, value);
        }
    }
}
