mod mbc1;
mod mbc2;
mod mbc3;
mod mbc5;
mod rtc;

use mbc1::Mbc1Cartridge;
use mbc2::Mbc2Cartridge;
use mbc3::Mbc3Cartridge;
use mbc5::Mbc5Cartridge;

pub(crate) use rtc::Rtc;

pub(crate) const ROM_BANK_SIZE: usize = 0x4000;
pub(crate) const RAM_BANK_SIZE: usize = 0x2000;

/// Header offset of the cartridge type byte.
pub const CARTRIDGE_TYPE_ADDR: usize = 0x0147;
/// Header offset of the external RAM size code.
pub const RAM_SIZE_ADDR: usize = 0x0149;

/// Banking strategy selected from the cartridge header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BankingKind {
    /// Plain 32 KiB ROM, optionally with one fixed RAM bank.
    #[default]
    None,
    Mbc1,
    Mbc2,
    Mbc3,
    Mbc5,
}

impl BankingKind {
    /// Classify header byte 0x147. `None` here means the code is not one we
    /// know how to map at all.
    pub fn from_type_code(code: u8) -> Option<Self> {
        match code {
            0x00 | 0x08 | 0x09 | 0x0B..=0x0D => Some(BankingKind::None),
            0x01..=0x03 => Some(BankingKind::Mbc1),
            0x05 | 0x06 => Some(BankingKind::Mbc2),
            0x0F..=0x13 => Some(BankingKind::Mbc3),
            0x19..=0x1E => Some(BankingKind::Mbc5),
            _ => None,
        }
    }
}

/// Number of 16 KiB banks in the image, rounded up, at least one.
fn rom_bank_count(rom: &[u8]) -> usize {
    rom.len().div_ceil(ROM_BANK_SIZE).max(1)
}

/// Number of 8 KiB external RAM banks declared by header byte 0x149.
///
/// The 2 KiB size (code 0x01) is rounded up to a full bank.
fn ram_bank_count(rom: &[u8]) -> usize {
    match rom.get(RAM_SIZE_ADDR).copied().unwrap_or(0) {
        0x01 | 0x02 => 1,
        0x03 => 4,
        0x04 => 16,
        0x05 => 8,
        _ => 0,
    }
}

/// Shared ROM image with bank-aware reads.
pub(crate) struct RomImage {
    data: Vec<u8>,
    banks: usize,
}

impl RomImage {
    fn new(rom: &[u8]) -> Self {
        Self {
            data: rom.to_vec(),
            banks: rom_bank_count(rom),
        }
    }

    /// Read `addr & 0x3FFF` within `bank`. Bank numbers past the end of the
    /// image wrap; bytes past the end of a short image read as 0xFF.
    #[inline]
    fn read(&self, bank: usize, addr: u16) -> u8 {
        let bank = bank % self.banks;
        let index = bank * ROM_BANK_SIZE + (addr as usize & (ROM_BANK_SIZE - 1));
        self.data.get(index).copied().unwrap_or(0xFF)
    }
}

/// Banked external RAM, 8 KiB per bank.
pub(crate) struct BankedRam {
    data: Vec<u8>,
    banks: usize,
}

impl BankedRam {
    fn new(banks: usize) -> Self {
        Self {
            data: vec![0; banks * RAM_BANK_SIZE],
            banks,
        }
    }

    #[inline]
    fn index(&self, bank: usize, addr: u16) -> Option<usize> {
        if self.banks == 0 {
            return None;
        }
        let offset = (addr as usize).wrapping_sub(0xA000) & (RAM_BANK_SIZE - 1);
        Some((bank % self.banks) * RAM_BANK_SIZE + offset)
    }

    fn read(&self, bank: usize, addr: u16) -> u8 {
        self.index(bank, addr)
            .and_then(|i| self.data.get(i).copied())
            .unwrap_or(0xFF)
    }

    fn write(&mut self, bank: usize, addr: u16, value: u8) {
        if let Some(slot) = self.index(bank, addr).and_then(|i| self.data.get_mut(i)) {
            *slot = value;
        }
    }
}

/// Cartridge without a mapper: 0x0000–0x7FFF is a flat window onto the
/// image and there is one always-enabled RAM bank.
pub(crate) struct RomOnlyCartridge {
    rom: RomImage,
    ram: BankedRam,
}

impl RomOnlyCartridge {
    fn new(rom: &[u8]) -> Self {
        Self {
            rom: RomImage::new(rom),
            ram: BankedRam::new(1),
        }
    }

    fn rom_read(&self, addr: u16) -> u8 {
        self.rom.read(usize::from(addr >= 0x4000), addr)
    }
}

pub(crate) enum Cartridge {
    RomOnly(RomOnlyCartridge),
    Mbc1(Mbc1Cartridge),
    Mbc2(Mbc2Cartridge),
    Mbc3(Mbc3Cartridge),
    Mbc5(Mbc5Cartridge),
}

impl Default for Cartridge {
    /// No cartridge inserted: every ROM read is 0xFF.
    fn default() -> Self {
        Self::new(BankingKind::None, &[])
    }
}

impl Cartridge {
    pub(crate) fn new(kind: BankingKind, rom: &[u8]) -> Self {
        match kind {
            BankingKind::None => Cartridge::RomOnly(RomOnlyCartridge::new(rom)),
            BankingKind::Mbc1 => Cartridge::Mbc1(Mbc1Cartridge::new(rom)),
            BankingKind::Mbc2 => Cartridge::Mbc2(Mbc2Cartridge::new(rom)),
            BankingKind::Mbc3 => Cartridge::Mbc3(Mbc3Cartridge::new(rom)),
            BankingKind::Mbc5 => Cartridge::Mbc5(Mbc5Cartridge::new(rom)),
        }
    }

    pub(crate) fn kind(&self) -> BankingKind {
        match self {
            Cartridge::RomOnly(_) => BankingKind::None,
            Cartridge::Mbc1(_) => BankingKind::Mbc1,
            Cartridge::Mbc2(_) => BankingKind::Mbc2,
            Cartridge::Mbc3(_) => BankingKind::Mbc3,
            Cartridge::Mbc5(_) => BankingKind::Mbc5,
        }
    }

    /// Read from 0x0000–0x7FFF.
    pub(crate) fn rom_read(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.rom_read(addr),
            Cartridge::Mbc1(c) => c.rom_read(addr),
            Cartridge::Mbc2(c) => c.rom_read(addr),
            Cartridge::Mbc3(c) => c.rom_read(addr),
            Cartridge::Mbc5(c) => c.rom_read(addr),
        }
    }

    /// Write to the mapper's register windows in 0x0000–0x7FFF.
    pub(crate) fn rom_write(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(_) => {
                log::trace!("ignored ROM write {value:#04x} -> {addr:#06x}");
            }
            Cartridge::Mbc1(c) => c.rom_write(addr, value),
            Cartridge::Mbc2(c) => c.rom_write(addr, value),
            Cartridge::Mbc3(c) => c.rom_write(addr, value),
            Cartridge::Mbc5(c) => c.rom_write(addr, value),
        }
    }

    /// Read from 0xA000–0xBFFF.
    pub(crate) fn ram_read(&self, addr: u16) -> u8 {
        match self {
            Cartridge::RomOnly(c) => c.ram.read(0, addr),
            Cartridge::Mbc1(c) => c.ram_read(addr),
            Cartridge::Mbc2(c) => c.ram_read(addr),
            Cartridge::Mbc3(c) => c.ram_read(addr),
            Cartridge::Mbc5(c) => c.ram_read(addr),
        }
    }

    pub(crate) fn ram_write(&mut self, addr: u16, value: u8) {
        match self {
            Cartridge::RomOnly(c) => c.ram.write(0, addr, value),
            Cartridge::Mbc1(c) => c.ram_write(addr, value),
            Cartridge::Mbc2(c) => c.ram_write(addr, value),
            Cartridge::Mbc3(c) => c.ram_write(addr, value),
            Cartridge::Mbc5(c) => c.ram_write(addr, value),
        }
    }

    /// ROM bank currently mapped at 0x4000–0x7FFF, after the 0 → 1 rule and
    /// before wrapping.
    pub(crate) fn rom_bank(&self) -> usize {
        match self {
            Cartridge::RomOnly(_) => 1,
            Cartridge::Mbc1(c) => c.rom_bank(),
            Cartridge::Mbc2(c) => c.rom_bank(),
            Cartridge::Mbc3(c) => c.rom_bank(),
            Cartridge::Mbc5(c) => c.rom_bank(),
        }
    }
}
