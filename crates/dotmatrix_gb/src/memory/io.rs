//! Addresses of the memory-mapped registers the core reads and writes.

pub const JOYP: u16 = 0xFF00;
pub const IF: u16 = 0xFF0F;
pub const LCDC: u16 = 0xFF40;
pub const STAT: u16 = 0xFF41;
pub const SCY: u16 = 0xFF42;
pub const SCX: u16 = 0xFF43;
pub const LY: u16 = 0xFF44;
pub const LYC: u16 = 0xFF45;
pub const DMA: u16 = 0xFF46;
pub const BGP: u16 = 0xFF47;
pub const OBP0: u16 = 0xFF48;
pub const OBP1: u16 = 0xFF49;
pub const WY: u16 = 0xFF4A;
pub const WX: u16 = 0xFF4B;
/// Boot ROM disable. Lies outside the backed I/O block; only its
/// write side effect is modelled.
pub const BOOT: u16 = 0xFF50;
pub const IE: u16 = 0xFFFF;

/// First address past the backed I/O block.
pub const IO_END: u16 = 0xFF4C;
