use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// STOP is two bytes long; the padding byte is fetched and discarded.
    /// Without a joypad the CPU can only leave STOP through an interrupt, so
    /// it is treated like HALT.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) {
        let _padding = self.fetch8(bus);
        self.halted = true;
    }

    pub(super) fn exec_halt(&mut self) {
        self.halted = true;
    }
}
