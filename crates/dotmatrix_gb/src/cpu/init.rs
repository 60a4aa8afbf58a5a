use super::{Cpu, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A CPU in the state the DMG boot ROM leaves behind, ready to run
    /// cartridge code at 0x0100.
    pub fn new() -> Self {
        let mut cpu = Self::power_on();
        cpu.apply_dmg_boot_state();
        cpu
    }

    /// A CPU straight out of reset: every register zero, PC at 0x0000 where
    /// the boot ROM overlay starts.
    pub fn power_on() -> Self {
        Self {
            regs: Registers::default(),
            ime: false,
            halted: false,
        }
    }

    /// Register values observed on hardware when the boot ROM hands control
    /// to the cartridge (Pan Docs, "Power Up Sequence").
    fn apply_dmg_boot_state(&mut self) {
        self.regs.a = 0x01;
        self.regs.f = 0xB0;
        self.regs.b = 0x00;
        self.regs.c = 0x13;
        self.regs.d = 0x00;
        self.regs.e = 0xD8;
        self.regs.h = 0x01;
        self.regs.l = 0x4D;
        self.regs.sp = 0xFFFE;
        self.regs.pc = 0x0100;
        self.ime = false;
    }
}
