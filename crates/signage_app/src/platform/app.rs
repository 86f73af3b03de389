use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use signage_core::{BoardViewModel, Clock, ReducedMotionFlag};
use signage_logging::signage_info;
use signage_runtime::{load_board, RuntimeEvent, RuntimeHandle, RuntimeSettings};

use super::render;

/// Interval at which the main thread drains runtime events.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub config: PathBuf,
    pub reduced_motion: bool,
    pub run_for_secs: Option<u64>,
    pub json: bool,
}

pub fn run(options: AppOptions) -> anyhow::Result<()> {
    let board = load_board(&options.config)
        .with_context(|| format!("loading board {}", options.config.display()))?;
    let motion = ReducedMotionFlag::new(options.reduced_motion || board.reduced_motion);

    let mut handle = RuntimeHandle::spawn(
        RuntimeSettings::default(),
        Clock::system(),
        Arc::new(motion),
    );
    for msg in board.mount_messages() {
        handle.send(msg);
    }
    signage_info!(
        "board {} running with {} widgets",
        options.config.display(),
        board.widgets.len()
    );

    let deadline = options
        .run_for_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    let stdout = io::stdout();
    while deadline.is_none_or(|deadline| Instant::now() < deadline) {
        while let Some(event) = handle.try_recv() {
            let mut out = stdout.lock();
            match event {
                RuntimeEvent::ViewChanged(view) => print_view(&mut out, &view, options.json)?,
                RuntimeEvent::CountdownCompleted { widget } => {
                    signage_info!("countdown widget {} reached zero", widget);
                    if !options.json {
                        writeln!(out, "countdown #{widget} completed")?;
                    }
                }
            }
            out.flush()?;
        }
        thread::sleep(POLL_INTERVAL);
    }

    handle.shutdown();
    Ok(())
}

fn print_view(out: &mut impl Write, view: &BoardViewModel, json: bool) -> anyhow::Result<()> {
    if json {
        let line = serde_json::to_string(view).context("encoding view")?;
        writeln!(out, "{line}")?;
    } else {
        for line in render::render(view) {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
