/// Abstraction over everything the CPU can address.
///
/// The system implementation is [`crate::Memory`]; tests use a flat 64 KiB
/// array. Reads take `&mut self` because some reads have side effects (the
/// boot overlay is switched off by the first read at 0x0100).
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}
