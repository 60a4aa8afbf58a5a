use once_cell::sync::OnceCell;

use super::*;
use crate::memory::{io, BankingKind, CARTRIDGE_TYPE_ADDR};
use crate::ppu::{PpuMode, LINE_CYCLES, VBLANK_LINE};

static BASE_ROM: OnceCell<Vec<u8>> = OnceCell::new();

/// 32 KiB ROM-only image with a V-Blank handler that counts interrupts in
/// 0xC000. The program area at 0x0100 is all NOPs.
fn base_rom() -> &'static [u8] {
    BASE_ROM.get_or_init(|| {
        let mut rom = vec![0u8; 0x8000];
        // 0x0040: LD HL,0xC000; INC (HL); RETI
        rom[0x40..0x45].copy_from_slice(&[0x21, 0x00, 0xC0, 0x34, 0xD9]);
        rom[CARTRIDGE_TYPE_ADDR] = 0x00;
        rom
    })
}

fn rom_with_program(program: &[u8]) -> Vec<u8> {
    let mut rom = base_rom().to_vec();
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom
}

fn machine(program: &[u8], config: MachineConfig) -> GameBoy {
    let mut gb = GameBoy::new(config);
    gb.load_rom(&rom_with_program(program));
    gb
}

#[test]
fn starts_at_cartridge_entry_without_boot_rom() {
    let gb = machine(&[], MachineConfig::default());
    assert_eq!(gb.cpu.regs.pc, 0x0100);
    assert_eq!(gb.cpu.regs.sp, 0xFFFE);
    assert!(!gb.memory.boot_rom_active());
    assert_eq!(gb.memory.peek(io::LCDC), 0x91);
}

#[test]
fn boot_rom_config_starts_at_zero() {
    let config = MachineConfig::builder().boot_rom(true).build();
    let mut gb = machine(&[], config);
    assert_eq!(gb.cpu.regs.pc, 0x0000);
    assert!(gb.memory.boot_rom_active());

    // LD SP,0xFFFE
    let cycles = gb.step().expect("boot program runs");
    assert_eq!(cycles, 12);
    assert_eq!(gb.cpu.regs.sp, 0xFFFE);
    assert_eq!(gb.cpu.regs.pc, 0x0003);
}

#[test]
fn load_rom_reports_banking() {
    let mut gb = GameBoy::default();
    let load = gb.load_rom(base_rom());
    assert_eq!(load.kind, BankingKind::None);
    assert!(load.warning.is_none());

    let mut rom = base_rom().to_vec();
    rom[CARTRIDGE_TYPE_ADDR] = 0xFD;
    let load = gb.load_rom(&rom);
    assert_eq!(load.kind, BankingKind::None);
    assert_eq!(
        load.warning,
        Some(GbError::UnrecognizedCartridgeType { code: 0xFD })
    );
}

#[test]
fn ppu_advances_in_machine_cycles() {
    let mut gb = machine(&[], MachineConfig::default());

    assert_eq!(gb.step(), Ok(4));
    assert_eq!(gb.ppu.clock(), 1);

    // LD HL,nn is 12 T-cycles.
    let mut gb = machine(&[0x21, 0x34, 0x12], MachineConfig::default());
    assert_eq!(gb.step(), Ok(12));
    assert_eq!(gb.ppu.clock(), 3);
    assert_eq!(gb.ppu.mode(), PpuMode::Oam);
}

#[test]
fn step_frame_runs_to_vblank() {
    // JR -2
    let mut gb = machine(&[0x18, 0xFE], MachineConfig::default());

    let mut cycles = 0u32;
    while gb.take_frame().is_none() {
        cycles += gb.step().expect("loop runs");
    }
    let first_frame = LINE_CYCLES * u32::from(VBLANK_LINE);
    assert!(cycles / 4 >= first_frame);
    assert!(cycles / 4 < first_frame + 3);

    gb.step_frame().expect("second frame");
    assert_eq!(gb.ppu.line(), VBLANK_LINE);
    assert_eq!(gb.ppu.mode(), PpuMode::VBlank);
}

#[test]
fn program_output_reaches_the_frame() {
    let program = [
        0x21, 0x10, 0x80, // LD HL,0x8010
        0x3E, 0xFF, // LD A,0xFF
        0x06, 0x10, // LD B,16
        0x22, // loop: LD (HL+),A
        0x05, // DEC B
        0x20, 0xFC, // JR NZ,loop
        0x3E, 0x01, // LD A,1
        0xEA, 0x00, 0x98, // LD (0x9800),A
        0x18, 0xFE, // JR -2
    ];
    let mut gb = machine(&program, MachineConfig::default());

    // Line 0 of the first frame is drawn before the program finishes.
    gb.step_frame().expect("first frame");
    let frame = gb.step_frame().expect("second frame");

    assert_eq!(frame.pixel(0, 0), [0x00, 0x00, 0x00]);
    assert_eq!(frame.pixel(7, 7), [0x00, 0x00, 0x00]);
    assert_eq!(frame.pixel(8, 0), [0xFF, 0xFF, 0xFF]);
}

#[test]
fn vblank_interrupt_runs_handler_once_per_frame() {
    let program = [
        0x3E, 0x01, // LD A,1
        0xE0, 0xFF, // LDH (IE),A
        0xAF, // XOR A
        0xE0, 0x0F, // LDH (IF),A
        0xFB, // EI
        0x18, 0xFE, // JR -2
    ];
    let mut gb = machine(&program, MachineConfig::default());

    for _ in 0..3 {
        gb.step_frame().expect("frame");
    }
    for _ in 0..10 {
        gb.step().expect("step");
    }

    assert_eq!(gb.memory.peek(0xC000), 3);
}

#[test]
fn illegal_opcode_halts_by_default() {
    let mut gb = machine(&[0xD3], MachineConfig::default());
    let expected = GbError::IllegalOpcode {
        opcode: 0xD3,
        pc: 0x0100,
    };

    assert_eq!(gb.step(), Err(expected));
    assert_eq!(gb.halted_on(), Some(expected));
    let pc = gb.cpu.regs.pc;
    assert_eq!(gb.step(), Err(expected));
    assert_eq!(gb.cpu.regs.pc, pc);
    assert_eq!(gb.step_frame(), Err(expected));
}

#[test]
fn illegal_opcode_can_be_skipped() {
    let config = MachineConfig::builder()
        .illegal_opcode(IllegalOpcodePolicy::Skip)
        .build();
    let mut gb = machine(&[0xD3, 0x00], config);

    assert_eq!(gb.step(), Ok(4));
    assert_eq!(gb.cpu.regs.pc, 0x0101);
    assert_eq!(gb.step(), Ok(4));
    assert!(gb.halted_on().is_none());
}

#[test]
fn reloading_clears_halt_state() {
    let mut gb = machine(&[0xD3], MachineConfig::default());
    assert!(gb.step().is_err());

    gb.load_rom(base_rom());
    assert_eq!(gb.step(), Ok(4));
}
