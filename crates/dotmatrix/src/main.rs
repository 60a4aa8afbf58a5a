use std::path::PathBuf;
use std::sync::atomic::AtomicBool;

use anyhow::{bail, Context, Result};

use dotmatrix::RunConfig;
use dotmatrix_gb::{IllegalOpcodePolicy, MachineConfig};

const USAGE: &str = "Usage: dotmatrix <rom_path> [--frames N|--forever] [--dump out.rgb] [--boot-rom] [--skip-illegal]";

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let mut rom_path: Option<PathBuf> = None;
    let mut frames: Option<u64> = match std::env::var("DOTMATRIX_FRAMES") {
        Ok(value) => Some(
            value
                .parse()
                .with_context(|| format!("DOTMATRIX_FRAMES is not a number: '{value}'"))?,
        ),
        Err(_) => Some(60),
    };
    let mut dump_path: Option<PathBuf> = None;
    let mut machine = MachineConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                frames = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid frame count '{value}'"))?,
                );
            }
            "--forever" => frames = None,
            "--dump" => dump_path = Some(args.next().context("--dump needs a path")?.into()),
            "--boot-rom" => machine.boot_rom = true,
            "--skip-illegal" => machine.illegal_opcode = IllegalOpcodePolicy::Skip,
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(());
            }
            other if other.starts_with("--") => bail!("unknown option '{other}'\n{USAGE}"),
            other => rom_path = Some(other.into()),
        }
    }

    let Some(rom_path) = rom_path else {
        bail!("no ROM path given\n{USAGE}");
    };

    log::info!("loading ROM '{}'", rom_path.display());
    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM '{}'", rom_path.display()))?;

    let config = RunConfig {
        frames,
        dump_path,
        machine,
    };
    // Nothing raises this yet; `--forever` runs until the process is killed.
    let stop = AtomicBool::new(false);
    let summary = dotmatrix::run(config, &rom, &stop)?;
    log::info!(
        "done: {} frames, {} cycles",
        summary.frames,
        summary.cycles
    );
    Ok(())
}
