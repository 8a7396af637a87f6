//! DishaNav driver - runs a navigation session and renders snapshots.
//!
//! Thin presentation shell around the library: it owns the tick cadence
//! and rendering, never the simulation state. Rendering only ever reads
//! `snapshot()` between ticks.

use clap::Parser;
use disha_nav::{DishaConfig, Mode, NavController, Snapshot};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "disha-nav", about = "Grid navigation simulator")]
struct Args {
    /// Path to a TOML configuration file (default: disha.toml if present)
    config: Option<PathBuf>,

    /// Override the tick budget from the configuration
    #[arg(long)]
    ticks: Option<usize>,

    /// Run without sleeping between ticks
    #[arg(long)]
    fast: bool,
}

fn main() -> disha_nav::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            DishaConfig::load(path)?
        }
        None if Path::new("disha.toml").exists() => {
            info!("Loading configuration from disha.toml");
            DishaConfig::load(Path::new("disha.toml"))?
        }
        None => {
            info!("Using default configuration");
            DishaConfig::default()
        }
    };

    let mut nav = NavController::new(&config)?;
    let max_ticks = args.ticks.unwrap_or(config.driver.max_ticks);
    let interval = Duration::from_millis(config.driver.tick_interval_ms);

    let mut final_tick = max_ticks;
    for tick in 1..=max_ticks {
        let mode = nav.tick();
        if mode == Mode::Reached {
            info!("Goal reached after {} ticks", tick);
            final_tick = tick;
            break;
        }
        if !args.fast && !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }

    let snap = nav.snapshot();
    if snap.mode != Mode::Reached {
        info!(
            "Stopped after {} ticks in mode {:?} at ({},{})",
            final_tick, snap.mode, snap.robot.x, snap.robot.y
        );
    }
    print!("{}", render(&snap, config.planner.occupancy_threshold));

    Ok(())
}

/// Render a snapshot as ASCII art, rows top to bottom.
///
/// `R` robot, `G` goal, `*` remaining path, `#` believed occupied,
/// `.` uncertain, space believed free.
fn render(snap: &Snapshot, threshold: f32) -> String {
    let mut out = String::with_capacity((snap.width + 3) * (snap.height + 2));
    let path: std::collections::HashSet<_> = snap.path.iter().copied().collect();

    out.push('+');
    out.push_str(&"-".repeat(snap.width));
    out.push_str("+\n");

    for y in (0..snap.height as i32).rev() {
        out.push('|');
        for x in 0..snap.width as i32 {
            let coord = disha_nav::GridCoord::new(x, y);
            let belief = snap.belief[y as usize * snap.width + x as usize];
            let ch = if coord == snap.robot {
                'R'
            } else if coord == snap.goal {
                'G'
            } else if path.contains(&coord) {
                '*'
            } else if belief >= threshold {
                '#'
            } else if belief > 0.0 {
                '.'
            } else {
                ' '
            };
            out.push(ch);
        }
        out.push_str("|\n");
    }

    out.push('+');
    out.push_str(&"-".repeat(snap.width));
    out.push_str("+\n");
    out
}
