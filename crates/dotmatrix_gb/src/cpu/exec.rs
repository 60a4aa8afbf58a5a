mod alu;
mod control;
mod ld;
mod system;

use super::decode::Instruction;
use super::{Bus, Cpu};

impl Cpu {
    /// Execute one decoded instruction whose opcode byte has already been
    /// fetched. Returns the cost in T-cycles.
    ///
    /// Conditional control flow reports whether the branch was taken so the
    /// cost can be looked up from the instruction's [`Timing`].
    ///
    /// [`Timing`]: super::decode::Timing
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, instr: Instruction) -> u32 {
        let mut taken = true;

        match instr {
            Instruction::Nop | Instruction::Illegal(_) => {}
            Instruction::Prefix => return self.step_cb(bus),

            Instruction::Stop => self.exec_stop(bus),
            Instruction::Halt => self.exec_halt(),
            Instruction::Di => self.ime = false,
            Instruction::Ei => self.ime = true,

            Instruction::Ld { dst, src } => self.exec_ld(bus, dst, src),
            Instruction::LdImm8(dst) => self.exec_ld_imm8(bus, dst),
            Instruction::LdImm16(dst) => self.exec_ld_imm16(bus, dst),
            Instruction::StoreA(addr) => self.exec_store_a(bus, addr),
            Instruction::LoadA(addr) => self.exec_load_a(bus, addr),
            Instruction::StoreSp => self.exec_store_sp(bus),
            Instruction::LdhStoreImm => self.exec_ldh_imm(bus, true),
            Instruction::LdhLoadImm => self.exec_ldh_imm(bus, false),
            Instruction::LdhStoreC => self.exec_ldh_c(bus, true),
            Instruction::LdhLoadC => self.exec_ldh_c(bus, false),
            Instruction::StoreAbs => self.exec_ld_abs(bus, true),
            Instruction::LoadAbs => self.exec_ld_abs(bus, false),
            Instruction::LdSpHl => self.regs.sp = self.regs.hl(),
            Instruction::LdHlSpOffset => self.exec_ld_hl_sp_offset(bus),
            Instruction::AddSpOffset => self.exec_add_sp_offset(bus),

            Instruction::Inc8(op) => self.exec_inc8(bus, op),
            Instruction::Dec8(op) => self.exec_dec8(bus, op),
            Instruction::Inc16(reg) => {
                let value = self.regs.get16(reg).wrapping_add(1);
                self.regs.set16(reg, value);
            }
            Instruction::Dec16(reg) => {
                let value = self.regs.get16(reg).wrapping_sub(1);
                self.regs.set16(reg, value);
            }
            Instruction::AddHl(reg) => self.alu_add_hl(self.regs.get16(reg)),
            Instruction::Alu(op, src) => self.exec_alu(bus, op, src),
            Instruction::AluImm(op) => {
                let value = self.fetch8(bus);
                self.alu(op, value);
            }
            Instruction::Rotate(rotate) => self.alu_rotate_a(rotate),
            Instruction::Daa => self.alu_daa(),
            Instruction::Cpl => self.exec_cpl(),
            Instruction::Scf => self.exec_scf(),
            Instruction::Ccf => self.exec_ccf(),

            Instruction::Jr(cond) => taken = self.jr(bus, cond),
            Instruction::Jp(cond) => taken = self.jp(bus, cond),
            Instruction::JpHl => self.regs.pc = self.regs.hl(),
            Instruction::Call(cond) => taken = self.call(bus, cond),
            Instruction::Ret(cond) => taken = self.ret(bus, cond),
            Instruction::Reti => self.exec_reti(bus),
            Instruction::Rst(vector) => self.exec_rst(bus, vector),
            Instruction::Push(pair) => self.push_u16(bus, self.regs.get_pair(pair)),
            Instruction::Pop(pair) => {
                let value = self.pop_u16(bus);
                self.regs.set_pair(pair, value);
            }
        }

        instr.timing().cycles(taken)
    }
}
