use typed_builder::TypedBuilder;

use crate::cpu::Cpu;
use crate::memory::{CartridgeLoad, Memory};
use crate::ppu::{FrameBuffer, Ppu};
use crate::GbError;

/// What the machine does when the CPU decodes an undefined opcode.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default)]
pub enum IllegalOpcodePolicy {
    /// Stop executing. Every later `step` returns the same error.
    #[default]
    Halt,
    /// Log a warning and carry on as if the opcode were a NOP.
    Skip,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct MachineConfig {
    /// Run the DMG boot program from 0x0000 instead of starting at 0x0100
    /// with post-boot register values.
    #[builder(default = false)]
    pub boot_rom: bool,
    #[builder(default)]
    pub illegal_opcode: IllegalOpcodePolicy,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// High-level DMG machine: CPU, memory and PPU driven in lockstep.
///
/// Each [`GameBoy::step`] runs one CPU instruction and then hands its cost to
/// the PPU, so the PPU never observes a half-executed instruction.
pub struct GameBoy {
    pub cpu: Cpu,
    pub memory: Memory,
    pub ppu: Ppu,
    config: MachineConfig,
    /// Set once the machine has stopped on an illegal opcode.
    halted_on: Option<GbError>,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl GameBoy {
    /// A machine with no cartridge inserted.
    pub fn new(config: MachineConfig) -> Self {
        let mut memory = Memory::new();
        let cpu = Self::boot(&config, &mut memory);
        let ppu = Ppu::new(&mut memory);
        Self {
            cpu,
            memory,
            ppu,
            config,
            halted_on: None,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Insert a ROM and power-cycle the machine around it.
    pub fn load_rom(&mut self, rom: &[u8]) -> CartridgeLoad {
        let mut memory = Memory::new();
        let load = memory.load_cartridge(rom);
        self.cpu = Self::boot(&self.config, &mut memory);
        self.ppu = Ppu::new(&mut memory);
        self.memory = memory;
        self.halted_on = None;
        load
    }

    fn boot(config: &MachineConfig, memory: &mut Memory) -> Cpu {
        if config.boot_rom {
            Cpu::power_on()
        } else {
            memory.skip_boot();
            Cpu::new()
        }
    }

    /// The error the machine stopped on, if any.
    pub fn halted_on(&self) -> Option<GbError> {
        self.halted_on
    }

    /// Execute one instruction (or interrupt dispatch) and advance the PPU by
    /// the same amount of time. Returns the T-cycles consumed.
    pub fn step(&mut self) -> Result<u32, GbError> {
        if let Some(err) = self.halted_on {
            return Err(err);
        }

        let cycles = match self.cpu.step(&mut self.memory) {
            Ok(cycles) => cycles,
            Err(err) => match self.config.illegal_opcode {
                IllegalOpcodePolicy::Halt => {
                    log::error!("machine halted: {err}");
                    self.halted_on = Some(err);
                    return Err(err);
                }
                IllegalOpcodePolicy::Skip => {
                    log::warn!("{err}, skipped");
                    4
                }
            },
        };

        // The PPU counts machine cycles.
        self.ppu.sync(&mut self.memory, cycles / 4);
        Ok(cycles)
    }

    /// Run until the PPU finishes a frame and return it.
    pub fn step_frame(&mut self) -> Result<FrameBuffer, GbError> {
        loop {
            self.step()?;
            if let Some(frame) = self.ppu.get_frame() {
                return Ok(frame);
            }
        }
    }

    /// The completed frame, if one is waiting. See [`Ppu::get_frame`].
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        self.ppu.get_frame()
    }
}

#[cfg(test)]
mod tests;
