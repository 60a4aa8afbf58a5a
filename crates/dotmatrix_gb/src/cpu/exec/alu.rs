use crate::cpu::decode::{AluOp, Operand8};
use crate::cpu::{Bus, Cpu, Flag};

impl Cpu {
    pub(super) fn exec_alu<B: Bus>(&mut self, bus: &mut B, op: AluOp, src: Operand8) {
        let value = self.read_operand(bus, src);
        self.alu(op, value);
    }

    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, op: Operand8) {
        let value = self.read_operand(bus, op);
        let result = self.alu_inc8(value);
        self.write_operand(bus, op, result);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, op: Operand8) {
        let value = self.read_operand(bus, op);
        let result = self.alu_dec8(value);
        self.write_operand(bus, op, result);
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, true);
    }

    pub(super) fn exec_scf(&mut self) {
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, true);
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.get_flag(Flag::C);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, !carry);
    }
}
