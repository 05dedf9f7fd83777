#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Space Invaders.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use invaders_core::TARGET_TICK_RATE;
use invaders_game::{Session, SessionConfig, SessionReport};
use invaders_rendering::{HeadlessPlatform, InputScript};
use invaders_rendering_macroquad::{MacroquadBackend, DEFAULT_MANIFEST_PATH};

const DEFAULT_HEADLESS_TICKS: u64 = 600;

/// Command-line arguments for the Space Invaders binary.
#[derive(Debug, Parser)]
#[command(name = "invaders", about = "A minimal Space Invaders", version)]
struct CliArgs {
    /// Sprite manifest naming the image for every sprite.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_MANIFEST_PATH)]
    manifest: PathBuf,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
    /// Keep bullets that leave the top of the screen.
    #[arg(long)]
    keep_offscreen_bullets: bool,
    /// Run without a window, drawing into memory.
    #[arg(long)]
    headless: bool,
    /// Number of ticks a headless run lasts. Defaults to 600, extended so a
    /// script's last batch is always replayed.
    #[arg(long, requires = "headless")]
    ticks: Option<u64>,
    /// Input script replayed by a headless run.
    #[arg(long, value_name = "PATH", requires = "headless")]
    script: Option<PathBuf>,
    /// Run headless ticks back to back instead of at the target rate.
    #[arg(long, requires = "headless")]
    unpaced: bool,
}

impl CliArgs {
    fn session_config(&self) -> SessionConfig {
        SessionConfig {
            target_hz: TARGET_TICK_RATE,
            cull_offscreen_bullets: !self.keep_offscreen_bullets,
        }
    }

    fn headless_ticks(&self, script: &InputScript) -> u64 {
        self.ticks.unwrap_or_else(|| {
            script
                .last_tick()
                .map_or(DEFAULT_HEADLESS_TICKS, |last| {
                    last.saturating_add(1).max(DEFAULT_HEADLESS_TICKS)
                })
        })
    }
}

/// Entry point for the Space Invaders command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    log::debug!("parsed arguments: {args:?}");

    let report = if args.headless {
        run_headless(&args)?
    } else {
        MacroquadBackend::new()
            .with_vsync(args.vsync)
            .with_show_fps(args.show_fps)
            .with_manifest_path(&args.manifest)
            .run(args.session_config())?
    };

    println!("{report}");
    Ok(())
}

fn run_headless(args: &CliArgs) -> Result<SessionReport> {
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::new(),
    };
    let ticks = args.headless_ticks(&script);
    let mut platform = HeadlessPlatform::new()
        .with_script(script)
        .with_pacing(!args.unpaced);
    let mut session = Session::new(&mut platform, args.session_config())
        .context("failed to start headless session")?;
    Ok(session.run_for(&mut platform, ticks))
}
