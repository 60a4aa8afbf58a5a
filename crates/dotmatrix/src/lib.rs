use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use typed_builder::TypedBuilder;

use dotmatrix_gb::{FrameBuffer, GameBoy, MachineConfig};

#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    /// Frames to run; `None` runs until the stop flag is raised.
    #[builder(default = Some(60))]
    pub frames: Option<u64>,
    /// Where to write the last frame as raw 160x144 RGB24.
    #[builder(default, setter(strip_option))]
    pub dump_path: Option<PathBuf>,
    #[builder(default)]
    pub machine: MachineConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    /// T-cycles executed.
    pub cycles: u64,
    /// True when the run ended because `stop` was raised.
    pub stopped: bool,
}

/// Load `rom` and run it headless.
///
/// `stop` is polled between instructions. An illegal opcode under the halt
/// policy ends the run with an error.
pub fn run(config: RunConfig, rom: &[u8], stop: &AtomicBool) -> Result<RunSummary> {
    let mut gb = GameBoy::new(config.machine);
    let load = gb.load_rom(rom);
    log::info!("loaded {} byte ROM, banking {:?}", rom.len(), load.kind);

    let mut summary = RunSummary::default();
    let mut last_frame: Option<FrameBuffer> = None;

    'run: while config.frames.map_or(true, |n| summary.frames < n) {
        loop {
            if stop.load(Ordering::Relaxed) {
                summary.stopped = true;
                break 'run;
            }
            let cycles = gb
                .step()
                .with_context(|| format!("emulation stopped after {} frames", summary.frames))?;
            summary.cycles += u64::from(cycles);
            if let Some(frame) = gb.take_frame() {
                last_frame = Some(frame);
                summary.frames += 1;
                break;
            }
        }
    }

    log::info!(
        "ran {} frames ({} cycles){}",
        summary.frames,
        summary.cycles,
        if summary.stopped { ", stopped" } else { "" }
    );

    if let Some(path) = &config.dump_path {
        let frame = last_frame.unwrap_or_else(|| gb.ppu.frame().clone());
        std::fs::write(path, frame.as_bytes())
            .with_context(|| format!("failed to write frame dump '{}'", path.display()))?;
        log::info!("wrote frame dump to '{}'", path.display());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotmatrix_gb::{GbError, SCREEN_HEIGHT, SCREEN_WIDTH};

    fn looping_rom() -> Vec<u8> {
        let mut rom = vec![0u8; 0x8000];
        // JR -2
        rom[0x100] = 0x18;
        rom[0x101] = 0xFE;
        rom
    }

    #[test]
    fn runs_requested_frames() {
        let stop = AtomicBool::new(false);
        let config = RunConfig::builder().frames(Some(3)).build();

        let summary = run(config, &looping_rom(), &stop).expect("run");

        assert_eq!(summary.frames, 3);
        assert!(!summary.stopped);
        assert!(summary.cycles > 0);
    }

    #[test]
    fn stop_flag_ends_the_run() {
        let stop = AtomicBool::new(true);
        let config = RunConfig::builder().frames(None).build();

        let summary = run(config, &looping_rom(), &stop).expect("run");

        assert!(summary.stopped);
        assert_eq!(summary.frames, 0);
    }

    #[test]
    fn illegal_opcode_is_an_error() {
        let stop = AtomicBool::new(false);
        let mut rom = looping_rom();
        rom[0x100] = 0xDD;

        let err = run(RunConfig::builder().build(), &rom, &stop).unwrap_err();
        assert_eq!(
            err.downcast_ref::<GbError>(),
            Some(&GbError::IllegalOpcode {
                opcode: 0xDD,
                pc: 0x0100
            })
        );
    }

    #[test]
    fn dumps_last_frame_as_rgb24() {
        let stop = AtomicBool::new(false);
        let path = std::env::temp_dir().join(format!("dotmatrix-dump-{}.rgb", std::process::id()));
        let config = RunConfig::builder()
            .frames(Some(1))
            .dump_path(path.clone())
            .build();

        run(config, &looping_rom(), &stop).expect("run");

        let bytes = std::fs::read(&path).expect("dump written");
        let _ = std::fs::remove_file(&path);
        assert_eq!(bytes.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    }
}
