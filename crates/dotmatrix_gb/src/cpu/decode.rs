//! Opcode decoding.
//!
//! Every one of the 256 base opcodes and 256 CB-prefixed opcodes decodes to
//! a typed [`Instruction`] / [`CbInstruction`]. The decoder walks the usual
//! `xx yyy zzz` bit fields once per opcode to fill two static tables, and
//! `Cpu::step` only ever indexes those tables.

use lazy_static::lazy_static;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    B,
    C,
    D,
    E,
    H,
    L,
    A,
}

/// An 8-bit source/destination: a register or the byte at (HL).
///
/// Encoded in opcodes as 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand8 {
    Reg(Reg8),
    HlIndirect,
}

impl Operand8 {
    fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => Operand8::Reg(Reg8::B),
            1 => Operand8::Reg(Reg8::C),
            2 => Operand8::Reg(Reg8::D),
            3 => Operand8::Reg(Reg8::E),
            4 => Operand8::Reg(Reg8::H),
            5 => Operand8::Reg(Reg8::L),
            6 => Operand8::HlIndirect,
            _ => Operand8::Reg(Reg8::A),
        }
    }

    #[inline]
    pub fn is_memory(self) -> bool {
        matches!(self, Operand8::HlIndirect)
    }
}

/// 16-bit register operand of LD rr,d16 / INC rr / DEC rr / ADD HL,rr.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg16 {
    Bc,
    De,
    Hl,
    Sp,
}

impl Reg16 {
    fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Reg16::Bc,
            1 => Reg16::De,
            2 => Reg16::Hl,
            _ => Reg16::Sp,
        }
    }
}

/// Register pair operand of PUSH / POP (AF takes the place of SP).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    Bc,
    De,
    Hl,
    Af,
}

impl StackPair {
    fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => StackPair::Bc,
            1 => StackPair::De,
            2 => StackPair::Hl,
            _ => StackPair::Af,
        }
    }
}

/// Address operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    Bc,
    De,
    /// (HL+): HL is incremented after the access.
    HlInc,
    /// (HL-): HL is decremented after the access.
    HlDec,
}

impl Indirect {
    fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Indirect::Bc,
            1 => Indirect::De,
            2 => Indirect::HlInc,
            _ => Indirect::HlDec,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Nz,
    Z,
    Nc,
    C,
}

impl Condition {
    fn from_index(index: u8) -> Self {
        match index & 0x03 {
            0 => Condition::Nz,
            1 => Condition::Z,
            2 => Condition::Nc,
            _ => Condition::C,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// The unprefixed accumulator rotates (RLCA, RRCA, RLA, RRA).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccRotate {
    Rlca,
    Rrca,
    Rla,
    Rra,
}

/// Rotate/shift group of the CB table (`CB 00`–`CB 3F`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    fn from_index(index: u8) -> Self {
        match index & 0x07 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// One decoded base opcode.
///
/// Immediate operands are not part of the variant; they are fetched from the
/// instruction stream while executing, so every variant maps back to exactly
/// one opcode byte (or a family of them).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    /// LD r,r' (including the (HL) forms).
    Ld { dst: Operand8, src: Operand8 },
    /// LD r,d8
    LdImm8(Operand8),
    /// LD rr,d16
    LdImm16(Reg16),
    /// LD (rr),A
    StoreA(Indirect),
    /// LD A,(rr)
    LoadA(Indirect),
    /// LD (a16),SP
    StoreSp,
    /// LDH (a8),A
    LdhStoreImm,
    /// LDH A,(a8)
    LdhLoadImm,
    /// LD (C),A
    LdhStoreC,
    /// LD A,(C)
    LdhLoadC,
    /// LD (a16),A
    StoreAbs,
    /// LD A,(a16)
    LoadAbs,
    LdSpHl,
    /// LD HL,SP+r8
    LdHlSpOffset,
    /// ADD SP,r8
    AddSpOffset,
    Inc8(Operand8),
    Dec8(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    Alu(AluOp, Operand8),
    AluImm(AluOp),
    Rotate(AccRotate),
    Daa,
    Cpl,
    Scf,
    Ccf,
    Jr(Option<Condition>),
    Jp(Option<Condition>),
    JpHl,
    Call(Option<Condition>),
    Ret(Option<Condition>),
    Reti,
    /// RST with the target vector (0x00, 0x08, ..., 0x38).
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),
    /// 0xCB: the next byte indexes the CB table.
    Prefix,
    Illegal(u8),
}

/// One decoded CB-prefixed opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CbInstruction {
    Shift(ShiftOp, Operand8),
    Bit(u8, Operand8),
    Res(u8, Operand8),
    Set(u8, Operand8),
}

/// Cycle cost of an instruction in T-cycles.
///
/// `taken` only differs from `cycles` for conditional control flow, where
/// `cycles` is the cost when the branch is not taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    pub cycles: u32,
    pub taken: u32,
}

impl Timing {
    const fn fixed(cycles: u32) -> Self {
        Self {
            cycles,
            taken: cycles,
        }
    }

    const fn branch(not_taken: u32, taken: u32) -> Self {
        Self {
            cycles: not_taken,
            taken,
        }
    }

    #[inline]
    pub fn cycles(self, taken: bool) -> u32 {
        if taken {
            self.taken
        } else {
            self.cycles
        }
    }
}

impl Instruction {
    pub fn decode(opcode: u8) -> Self {
        let x = opcode >> 6;
        let y = (opcode >> 3) & 0x07;
        let z = opcode & 0x07;
        let p = y >> 1;
        let q = y & 0x01;

        match (x, z) {
            (0, 0) => match y {
                0 => Instruction::Nop,
                1 => Instruction::StoreSp,
                2 => Instruction::Stop,
                3 => Instruction::Jr(None),
                _ => Instruction::Jr(Some(Condition::from_index(y - 4))),
            },
            (0, 1) if q == 0 => Instruction::LdImm16(Reg16::from_index(p)),
            (0, 1) => Instruction::AddHl(Reg16::from_index(p)),
            (0, 2) if q == 0 => Instruction::StoreA(Indirect::from_index(p)),
            (0, 2) => Instruction::LoadA(Indirect::from_index(p)),
            (0, 3) if q == 0 => Instruction::Inc16(Reg16::from_index(p)),
            (0, 3) => Instruction::Dec16(Reg16::from_index(p)),
            (0, 4) => Instruction::Inc8(Operand8::from_index(y)),
            (0, 5) => Instruction::Dec8(Operand8::from_index(y)),
            (0, 6) => Instruction::LdImm8(Operand8::from_index(y)),
            (0, _) => match y {
                0 => Instruction::Rotate(AccRotate::Rlca),
                1 => Instruction::Rotate(AccRotate::Rrca),
                2 => Instruction::Rotate(AccRotate::Rla),
                3 => Instruction::Rotate(AccRotate::Rra),
                4 => Instruction::Daa,
                5 => Instruction::Cpl,
                6 => Instruction::Scf,
                _ => Instruction::Ccf,
            },

            // 0x76 sits where LD (HL),(HL) would be.
            (1, _) if opcode == 0x76 => Instruction::Halt,
            (1, _) => Instruction::Ld {
                dst: Operand8::from_index(y),
                src: Operand8::from_index(z),
            },

            (2, _) => Instruction::Alu(AluOp::from_index(y), Operand8::from_index(z)),

            (_, 0) => match y {
                0..=3 => Instruction::Ret(Some(Condition::from_index(y))),
                4 => Instruction::LdhStoreImm,
                5 => Instruction::AddSpOffset,
                6 => Instruction::LdhLoadImm,
                _ => Instruction::LdHlSpOffset,
            },
            (_, 1) if q == 0 => Instruction::Pop(StackPair::from_index(p)),
            (_, 1) => match p {
                0 => Instruction::Ret(None),
                1 => Instruction::Reti,
                2 => Instruction::JpHl,
                _ => Instruction::LdSpHl,
            },
            (_, 2) => match y {
                0..=3 => Instruction::Jp(Some(Condition::from_index(y))),
                4 => Instruction::LdhStoreC,
                5 => Instruction::StoreAbs,
                6 => Instruction::LdhLoadC,
                _ => Instruction::LoadAbs,
            },
            (_, 3) => match y {
                0 => Instruction::Jp(None),
                1 => Instruction::Prefix,
                6 => Instruction::Di,
                7 => Instruction::Ei,
                // D3, DB, E3, EB
                _ => Instruction::Illegal(opcode),
            },
            (_, 4) => match y {
                0..=3 => Instruction::Call(Some(Condition::from_index(y))),
                // E4, EC, F4, FC
                _ => Instruction::Illegal(opcode),
            },
            (_, 5) if q == 0 => Instruction::Push(StackPair::from_index(p)),
            (_, 5) => match p {
                0 => Instruction::Call(None),
                // DD, ED, FD
                _ => Instruction::Illegal(opcode),
            },
            (_, 6) => Instruction::AluImm(AluOp::from_index(y)),
            _ => Instruction::Rst(y * 8),
        }
    }

    /// Encoded length in bytes, including the opcode and any immediates.
    pub fn length(self) -> u16 {
        match self {
            Instruction::LdImm16(_)
            | Instruction::StoreSp
            | Instruction::StoreAbs
            | Instruction::LoadAbs
            | Instruction::Jp(_)
            | Instruction::Call(_) => 3,
            Instruction::Stop
            | Instruction::LdImm8(_)
            | Instruction::LdhStoreImm
            | Instruction::LdhLoadImm
            | Instruction::LdHlSpOffset
            | Instruction::AddSpOffset
            | Instruction::AluImm(_)
            | Instruction::Jr(_)
            | Instruction::Prefix => 2,
            _ => 1,
        }
    }

    /// Cycle cost in T-cycles.
    ///
    /// `Prefix` reports the register-operand cost of the CB table; (HL)
    /// operands are priced by [`CbInstruction::cycles`].
    pub fn timing(self) -> Timing {
        match self {
            Instruction::Nop
            | Instruction::Stop
            | Instruction::Halt
            | Instruction::Di
            | Instruction::Ei
            | Instruction::Rotate(_)
            | Instruction::Daa
            | Instruction::Cpl
            | Instruction::Scf
            | Instruction::Ccf
            | Instruction::JpHl
            | Instruction::Illegal(_) => Timing::fixed(4),
            Instruction::Ld { dst, src } => {
                if dst.is_memory() || src.is_memory() {
                    Timing::fixed(8)
                } else {
                    Timing::fixed(4)
                }
            }
            Instruction::LdImm8(dst) => Timing::fixed(if dst.is_memory() { 12 } else { 8 }),
            Instruction::LdImm16(_) => Timing::fixed(12),
            Instruction::StoreA(_) | Instruction::LoadA(_) => Timing::fixed(8),
            Instruction::StoreSp => Timing::fixed(20),
            Instruction::LdhStoreImm | Instruction::LdhLoadImm => Timing::fixed(12),
            Instruction::LdhStoreC | Instruction::LdhLoadC => Timing::fixed(8),
            Instruction::StoreAbs | Instruction::LoadAbs => Timing::fixed(16),
            Instruction::LdSpHl => Timing::fixed(8),
            Instruction::LdHlSpOffset => Timing::fixed(12),
            Instruction::AddSpOffset => Timing::fixed(16),
            Instruction::Inc8(op) | Instruction::Dec8(op) => {
                Timing::fixed(if op.is_memory() { 12 } else { 4 })
            }
            Instruction::Inc16(_) | Instruction::Dec16(_) | Instruction::AddHl(_) => {
                Timing::fixed(8)
            }
            Instruction::Alu(_, src) => Timing::fixed(if src.is_memory() { 8 } else { 4 }),
            Instruction::AluImm(_) => Timing::fixed(8),
            Instruction::Jr(None) => Timing::fixed(12),
            Instruction::Jr(Some(_)) => Timing::branch(8, 12),
            Instruction::Jp(None) => Timing::fixed(16),
            Instruction::Jp(Some(_)) => Timing::branch(12, 16),
            Instruction::Call(None) => Timing::fixed(24),
            Instruction::Call(Some(_)) => Timing::branch(12, 24),
            Instruction::Ret(None) | Instruction::Reti => Timing::fixed(16),
            Instruction::Ret(Some(_)) => Timing::branch(8, 20),
            Instruction::Rst(_) | Instruction::Push(_) => Timing::fixed(16),
            Instruction::Pop(_) => Timing::fixed(12),
            Instruction::Prefix => Timing::fixed(8),
        }
    }
}

impl CbInstruction {
    pub fn decode(opcode: u8) -> Self {
        let y = (opcode >> 3) & 0x07;
        let operand = Operand8::from_index(opcode);

        match opcode >> 6 {
            0 => CbInstruction::Shift(ShiftOp::from_index(y), operand),
            1 => CbInstruction::Bit(y, operand),
            2 => CbInstruction::Res(y, operand),
            _ => CbInstruction::Set(y, operand),
        }
    }

    /// Total cycle cost in T-cycles, including the 0xCB prefix fetch.
    pub fn cycles(self) -> u32 {
        match self {
            CbInstruction::Bit(_, op) => {
                if op.is_memory() {
                    12
                } else {
                    8
                }
            }
            CbInstruction::Shift(_, op) | CbInstruction::Res(_, op) | CbInstruction::Set(_, op) => {
                if op.is_memory() {
                    16
                } else {
                    8
                }
            }
        }
    }
}

lazy_static! {
    static ref BASE_TABLE: [Instruction; 256] =
        std::array::from_fn(|opcode| Instruction::decode(opcode as u8));
    static ref CB_TABLE: [CbInstruction; 256] =
        std::array::from_fn(|opcode| CbInstruction::decode(opcode as u8));
}

/// Look up a base opcode in the static dispatch table.
#[inline]
pub fn lookup(opcode: u8) -> Instruction {
    BASE_TABLE[opcode as usize]
}

/// Look up the byte following 0xCB in the static CB dispatch table.
#[inline]
pub fn lookup_cb(opcode: u8) -> CbInstruction {
    CB_TABLE[opcode as usize]
}
