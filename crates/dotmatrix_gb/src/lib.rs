pub mod cpu;
mod error;
pub mod machine;
pub mod memory;
pub mod ppu;

pub use error::GbError;
pub use machine::{GameBoy, IllegalOpcodePolicy, MachineConfig};
pub use memory::{BankingKind, CartridgeLoad, Memory};
pub use ppu::{FrameBuffer, Ppu, PpuMode};

/// Logical screen width in pixels for the Game Boy DMG.
pub const SCREEN_WIDTH: usize = 160;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 144;
