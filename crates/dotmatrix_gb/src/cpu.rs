mod alu;
mod bus;
mod cb;
pub mod decode;
mod exec;
mod helpers;
mod init;
mod interrupts;
mod regs;

pub use bus::Bus;
pub use decode::{CbInstruction, Instruction};
pub use interrupts::{Interrupt, IE_ADDR, IF_ADDR};
pub use regs::{Flag, Registers};

use crate::GbError;

/// Sharp LR35902 core.
///
/// Owns the register file and the interrupt master enable. All memory traffic
/// goes through a [`Bus`] borrowed for the duration of a single `step`.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub ime: bool,
    /// Set by HALT and STOP; cleared once `IE & IF` becomes non-zero.
    pub halted: bool,
}

impl Cpu {
    #[inline]
    pub fn get_flag(&self, flag: Flag) -> bool {
        let bit = flag as u8;
        (self.regs.f & (1 << bit)) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let bit = flag as u8;
        if value {
            self.regs.f |= 1 << bit;
        } else {
            self.regs.f &= !(1 << bit);
        }
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.f = 0;
    }

    /// Execute a single instruction (or interrupt entry) and return the number
    /// of T-cycles it took.
    ///
    /// Pending interrupts are checked once, before the opcode fetch. An
    /// undefined opcode is consumed (PC moves past it) and reported as
    /// [`GbError::IllegalOpcode`]; what happens next is up to the caller.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, GbError> {
        if let Some(cycles) = self.handle_interrupts(bus) {
            return Ok(cycles);
        }

        if self.halted {
            return Ok(4);
        }

        let pc = self.regs.pc;
        let opcode = self.fetch8(bus);
        match decode::lookup(opcode) {
            Instruction::Illegal(opcode) => Err(GbError::IllegalOpcode { opcode, pc }),
            instr => Ok(self.execute(bus, instr)),
        }
    }
}
