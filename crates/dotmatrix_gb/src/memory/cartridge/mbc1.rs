use super::{ram_bank_count, BankedRam, RomImage};

/// MBC1: 5-bit ROM bank register plus a 2-bit register shared between the
/// upper ROM bank bits and the RAM bank, selected by the memory model bit.
pub(crate) struct Mbc1Cartridge {
    rom: RomImage,
    ram: BankedRam,
    bank_low5: u8,
    bank_high2: u8,
    ram_enabled: bool,
    /// Memory model: `false` = 16 Mbit ROM / 8 KiB RAM, `true` = 4 Mbit
    /// ROM / 32 KiB RAM.
    ram_banking: bool,
}

impl Mbc1Cartridge {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            rom: RomImage::new(rom),
            ram: BankedRam::new(ram_bank_count(rom)),
            bank_low5: 1,
            bank_high2: 0,
            ram_enabled: false,
            ram_banking: false,
        }
    }

    pub(super) fn rom_bank(&self) -> usize {
        let low = match self.bank_low5 & 0x1F {
            0 => 1,
            bank => bank,
        };
        if self.ram_banking {
            usize::from(low)
        } else {
            usize::from(low | (self.bank_high2 << 5))
        }
    }

    fn ram_bank(&self) -> usize {
        if self.ram_banking {
            usize::from(self.bank_high2)
        } else {
            0
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
            0x2000..=0x3FFF => {
                self.bank_low5 = value & 0x1F;
                log::trace!("MBC1 ROM bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.bank_high2 = value & 0x03,
            _ => self.ram_banking = value & 0x01 != 0,
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        self.ram.read(self.ram_bank(), addr)
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        if self.ram_enabled {
            self.ram.write(self.ram_bank(), addr, value);
        }
    }
}
