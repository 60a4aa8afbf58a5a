use thiserror::Error;

/// Recoverable conditions surfaced by the core.
///
/// Neither variant leaves the machine in a corrupted state: an illegal
/// opcode has already been consumed (PC points past it) and an unknown
/// cartridge type has already been mapped as a plain ROM. The caller
/// decides what to do next.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GbError {
    #[error("illegal opcode {opcode:#04x} at pc {pc:#06x}")]
    IllegalOpcode { opcode: u8, pc: u16 },
    #[error("unrecognized cartridge type {code:#04x}, falling back to ROM-only banking")]
    UnrecognizedCartridgeType { code: u8 },
}
