use super::decode::{Condition, Indirect, Operand8};
use super::{Bus, Cpu, Flag};

impl Cpu {
    #[inline]
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.get8(reg),
            Operand8::HlIndirect => bus.read8(self.regs.hl()),
        }
    }

    #[inline]
    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8, value: u8) {
        match operand {
            Operand8::Reg(reg) => self.regs.set8(reg, value),
            Operand8::HlIndirect => bus.write8(self.regs.hl(), value),
        }
    }

    /// Resolve a `(BC)`, `(DE)`, `(HL+)` or `(HL-)` operand, applying the
    /// post-increment or post-decrement to HL.
    pub(super) fn indirect_addr(&mut self, operand: Indirect) -> u16 {
        match operand {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Option<Condition>) -> bool {
        match cond {
            None => true,
            Some(Condition::Nz) => !self.get_flag(Flag::Z),
            Some(Condition::Z) => self.get_flag(Flag::Z),
            Some(Condition::Nc) => !self.get_flag(Flag::C),
            Some(Condition::C) => self.get_flag(Flag::C),
        }
    }

    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// Two-byte immediate, low byte first.
    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// SP is decremented before each write; the high byte lands at the
    /// higher address.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([lo, hi])
    }

    /// JR/JR cc. The displacement is relative to the address following the
    /// operand, which is fetched whether or not the branch is taken.
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>) -> bool {
        let offset = self.fetch8(bus) as i8;
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as i16 as u16);
        }
        taken
    }

    pub(super) fn jp<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>) -> bool {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn call<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>) -> bool {
        let addr = self.fetch16(bus);
        let taken = self.condition(cond);
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
        }
        taken
    }

    pub(super) fn ret<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>) -> bool {
        let taken = self.condition(cond);
        if taken {
            self.regs.pc = self.pop_u16(bus);
        }
        taken
    }
}
