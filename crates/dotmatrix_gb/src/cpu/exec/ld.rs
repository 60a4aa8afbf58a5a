use crate::cpu::decode::{Indirect, Operand8, Reg16};
use crate::cpu::{Bus, Cpu};

const HIGH_PAGE: u16 = 0xFF00;

impl Cpu {
    pub(super) fn exec_ld<B: Bus>(&mut self, bus: &mut B, dst: Operand8, src: Operand8) {
        let value = self.read_operand(bus, src);
        self.write_operand(bus, dst, value);
    }

    pub(super) fn exec_ld_imm8<B: Bus>(&mut self, bus: &mut B, dst: Operand8) {
        let value = self.fetch8(bus);
        self.write_operand(bus, dst, value);
    }

    pub(super) fn exec_ld_imm16<B: Bus>(&mut self, bus: &mut B, dst: Reg16) {
        let value = self.fetch16(bus);
        self.regs.set16(dst, value);
    }

    pub(super) fn exec_store_a<B: Bus>(&mut self, bus: &mut B, addr: Indirect) {
        let addr = self.indirect_addr(addr);
        bus.write8(addr, self.regs.a);
    }

    pub(super) fn exec_load_a<B: Bus>(&mut self, bus: &mut B, addr: Indirect) {
        let addr = self.indirect_addr(addr);
        self.regs.a = bus.read8(addr);
    }

    /// LD (a16),SP stores SP little-endian.
    pub(super) fn exec_store_sp<B: Bus>(&mut self, bus: &mut B) {
        let addr = self.fetch16(bus);
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }

    pub(super) fn exec_ldh_imm<B: Bus>(&mut self, bus: &mut B, store: bool) {
        let addr = HIGH_PAGE | u16::from(self.fetch8(bus));
        self.transfer_a(bus, addr, store);
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, store: bool) {
        let addr = HIGH_PAGE | u16::from(self.regs.c);
        self.transfer_a(bus, addr, store);
    }

    pub(super) fn exec_ld_abs<B: Bus>(&mut self, bus: &mut B, store: bool) {
        let addr = self.fetch16(bus);
        self.transfer_a(bus, addr, store);
    }

    pub(super) fn exec_ld_hl_sp_offset<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        let value = self.alu_sp_offset(offset);
        self.regs.set_hl(value);
    }

    pub(super) fn exec_add_sp_offset<B: Bus>(&mut self, bus: &mut B) {
        let offset = self.fetch8(bus);
        self.regs.sp = self.alu_sp_offset(offset);
    }

    #[inline]
    fn transfer_a<B: Bus>(&mut self, bus: &mut B, addr: u16, store: bool) {
        if store {
            bus.write8(addr, self.regs.a);
        } else {
            self.regs.a = bus.read8(addr);
        }
    }
}
