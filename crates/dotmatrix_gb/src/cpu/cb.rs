use super::decode::{self, CbInstruction};
use super::{Bus, Cpu, Flag};

impl Cpu {
    /// Fetch the byte after 0xCB and run it through the CB table.
    ///
    /// The returned cost already includes the prefix fetch.
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let instr = decode::lookup_cb(self.fetch8(bus));

        match instr {
            CbInstruction::Shift(op, target) => {
                let value = self.read_operand(bus, target);
                let result = self.alu_shift(op, value);
                self.write_operand(bus, target, result);
            }
            CbInstruction::Bit(bit, target) => {
                let value = self.read_operand(bus, target);
                // C is preserved.
                self.set_flag(Flag::Z, value & (1 << bit) == 0);
                self.set_flag(Flag::N, false);
                self.set_flag(Flag::H, true);
            }
            CbInstruction::Res(bit, target) => {
                let value = self.read_operand(bus, target);
                self.write_operand(bus, target, value & !(1 << bit));
            }
            CbInstruction::Set(bit, target) => {
                let value = self.read_operand(bus, target);
                self.write_operand(bus, target, value | (1 << bit));
            }
        }

        instr.cycles()
    }
}
