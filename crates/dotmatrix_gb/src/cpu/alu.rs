use super::decode::{AccRotate, AluOp, ShiftOp};
use super::{Cpu, Flag};

impl Cpu {
    /// Apply one of the eight accumulator operations with `value` as the
    /// right-hand operand.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.regs.a = self.alu_sub(value, false),
            AluOp::Sbc => self.regs.a = self.alu_sub(value, true),
            AluOp::And => self.alu_logic(self.regs.a & value, true),
            AluOp::Xor => self.alu_logic(self.regs.a ^ value, false),
            AluOp::Or => self.alu_logic(self.regs.a | value, false),
            // CP is SUB with the result thrown away.
            AluOp::Cp => {
                self.alu_sub(value, false);
            }
        }
    }

    fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a;
        let carry_in = u8::from(use_carry && self.get_flag(Flag::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
        let result = full as u8;

        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, half & 0x10 != 0);
        self.set_flag(Flag::C, full > 0xFF);
    }

    /// Compute `A - value` (minus carry for SBC) and set flags. Returns the
    /// difference; the caller decides whether A is written.
    fn alu_sub(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a;
        let carry_in = i16::from(use_carry && self.get_flag(Flag::C));

        let half = i16::from(a & 0x0F) - i16::from(value & 0x0F) - carry_in;
        let full = i16::from(a) - i16::from(value) - carry_in;
        let result = full as u8;

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, half < 0);
        self.set_flag(Flag::C, full < 0);
        result
    }

    #[inline]
    fn alu_logic(&mut self, result: u8, half: bool) {
        self.regs.a = result;
        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::H, half);
    }

    /// Decimal adjust A after a BCD add or subtract. N is preserved.
    pub(super) fn alu_daa(&mut self) {
        let mut a = self.regs.a;
        let mut adjust: u8 = if self.get_flag(Flag::C) { 0x60 } else { 0x00 };
        if self.get_flag(Flag::H) {
            adjust |= 0x06;
        }

        if self.get_flag(Flag::N) {
            a = a.wrapping_sub(adjust);
        } else {
            if a & 0x0F > 0x09 {
                adjust |= 0x06;
            }
            if a > 0x99 {
                adjust |= 0x60;
            }
            a = a.wrapping_add(adjust);
        }

        self.set_flag(Flag::Z, a == 0);
        self.set_flag(Flag::H, false);
        self.set_flag(Flag::C, adjust >= 0x60);
        self.regs.a = a;
    }

    /// INC r / INC (HL). C is left alone.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, value & 0x0F == 0x0F);
        result
    }

    /// DEC r / DEC (HL). C is left alone.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::N, true);
        self.set_flag(Flag::H, value & 0x0F == 0);
        result
    }

    /// ADD HL,rr: Z untouched, H from bit 11, C from bit 15.
    pub(super) fn alu_add_hl(&mut self, value: u16) {
        let hl = self.regs.hl();

        self.set_flag(Flag::N, false);
        self.set_flag(Flag::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flag::C, u32::from(hl) + u32::from(value) > 0xFFFF);

        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// SP plus a signed 8-bit displacement, shared by ADD SP,r8 and
    /// LD HL,SP+r8. H and C come from the unsigned low-byte addition.
    pub(super) fn alu_sp_offset(&mut self, offset: u8) -> u16 {
        let sp = self.regs.sp;
        let offset = offset as i8 as i16 as u16;

        self.clear_flags();
        self.set_flag(Flag::H, (sp & 0x000F) + (offset & 0x000F) > 0x000F);
        self.set_flag(Flag::C, (sp & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        sp.wrapping_add(offset)
    }

    /// RLCA/RRCA/RLA/RRA. Same as the CB forms except Z is always cleared.
    pub(super) fn alu_rotate_a(&mut self, rotate: AccRotate) {
        let op = match rotate {
            AccRotate::Rlca => ShiftOp::Rlc,
            AccRotate::Rrca => ShiftOp::Rrc,
            AccRotate::Rla => ShiftOp::Rl,
            AccRotate::Rra => ShiftOp::Rr,
        };
        self.regs.a = self.alu_shift(op, self.regs.a);
        self.set_flag(Flag::Z, false);
    }

    /// The CB rotate/shift group. Sets Z from the result, clears N and H,
    /// and loads C with the bit shifted out (SWAP clears C).
    pub(super) fn alu_shift(&mut self, op: ShiftOp, value: u8) -> u8 {
        let carry_in = self.get_flag(Flag::C);
        let (result, carry) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        self.clear_flags();
        self.set_flag(Flag::Z, result == 0);
        self.set_flag(Flag::C, carry);
        result
    }
}
