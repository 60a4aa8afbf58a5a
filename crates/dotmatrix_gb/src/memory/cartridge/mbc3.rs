use std::time::SystemTime;

use super::{ram_bank_count, BankedRam, Rtc, RomImage};

/// MBC3: 7-bit ROM bank, four RAM banks and a real-time clock whose
/// registers share the 0xA000–0xBFFF window with RAM.
pub(crate) struct Mbc3Cartridge {
    rom: RomImage,
    ram: BankedRam,
    rtc: Rtc,
    rom_bank: u8,
    /// 0x00–0x03 select a RAM bank; anything above maps the RTC.
    ram_select: u8,
    ram_enabled: bool,
    /// Set by a 0x00 write to the latch register; a following 0x01 latches.
    latch_armed: bool,
}

impl Mbc3Cartridge {
    pub(super) fn new(rom: &[u8]) -> Self {
        Self {
            rom: RomImage::new(rom),
            ram: BankedRam::new(ram_bank_count(rom)),
            rtc: Rtc::new(SystemTime::now()),
            rom_bank: 1,
            ram_select: 0,
            ram_enabled: false,
            latch_armed: false,
        }
    }

    pub(super) fn rom_bank(&self) -> usize {
        match self.rom_bank {
            0 => 1,
            bank => usize::from(bank),
        }
    }

    #[inline]
    fn rtc_mapped(&self) -> bool {
        self.ram_select > 0x03
    }

    pub(super) fn rom_read(&self, addr: u16) -> u8 {
        if addr < 0x4000 {
            self.rom.read(0, addr)
        } else {
            self.rom.read(self.rom_bank(), addr)
        }
    }

    pub(super) fn rom_write(&mut self, addr: u16, value: u8) {
        self.rom_write_at(addr, value, SystemTime::now());
    }

    fn rom_write_at(&mut self, addr: u16, value: u8, now: SystemTime) {
        match addr {
            0x0000..=0x1FFF => self.ram_enabled = value & 0x0F == 0x0A,
            0x2000..=0x3FFF => {
                self.rom_bank = value;
                log::trace!("MBC3 ROM bank -> {}", self.rom_bank());
            }
            0x4000..=0x5FFF => self.ram_select = value,
            _ => {
                if self.latch_armed && value == 0x01 {
                    self.rtc.latch(now);
                }
                self.latch_armed = value == 0x00;
            }
        }
    }

    pub(super) fn ram_read(&self, addr: u16) -> u8 {
        if !self.ram_enabled {
            return 0xFF;
        }
        if self.rtc_mapped() {
            self.rtc.read(self.ram_select)
        } else {
            self.ram.read(usize::from(self.ram_select), addr)
        }
    }

    pub(super) fn ram_write(&mut self, addr: u16, value: u8) {
        self.ram_write_at(addr, value, SystemTime::now());
    }

    fn ram_write_at(&mut self, addr: u16, value: u8, now: SystemTime) {
        if !self.ram_enabled {
            return;
        }
        if self.rtc_mapped() {
            self.rtc.write(self.ram_select, value, now);
        } else {
            self.ram.write(usize::from(self.ram_select), addr, value);
        }
    }
}
