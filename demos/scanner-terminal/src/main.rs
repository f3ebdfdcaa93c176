mod commands;
mod config;
mod scanner_state;

use std::process::ExitCode;
use std::sync::mpsc::TryRecvError;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use emotion_scanner_core::{CaptureLifecycle, FrameProvider, ScanSnapshot};

use clap::Parser;

use commands::{Command, Flow};
use config::{Cli, TerminalConfig};
use scanner_state::{emit, TerminalDelegate, TerminalEvent};

#[cfg(feature = "native")]
fn camera() -> emotion_scanner_camera::NokhwaCamera {
    emotion_scanner_camera::NokhwaCamera::default_device()
}

#[cfg(not(feature = "native"))]
fn camera() -> emotion_scanner_camera::TestPatternCamera {
    emotion_scanner_camera::TestPatternCamera::default()
}

fn main() -> ExitCode {
    env_logger::init();

    let config = match TerminalConfig::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let provider = Arc::new(camera());
    log::info!("Using camera: {}", provider.device_info().name);

    let mut scanner = match CaptureLifecycle::new(provider, config.scanner.clone()) {
        Ok(scanner) => scanner,
        Err(e) => {
            log::error!("Invalid scanner configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    scanner.set_delegate(TerminalDelegate::new(config.verbose_results));

    let commands = match commands::spawn_reader() {
        Ok(rx) => rx,
        Err(e) => {
            log::error!("Failed to read commands: {}", e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Commands: start, stop, status, devices, labels, quit");
    run(&mut scanner, &commands, &config);
    ExitCode::SUCCESS
}

/// Display-refresh loop: drain commands, drive one scanner frame, print the
/// projection when it changes label or every `print_every` refreshes.
fn run<P: FrameProvider>(
    scanner: &mut CaptureLifecycle<P>,
    commands: &std::sync::mpsc::Receiver<Command>,
    config: &TerminalConfig,
) {
    let refresh = Duration::from_secs_f64(1.0 / config.refresh_hz);
    let monitor = scanner.monitor();
    let mut last_printed = ScanSnapshot::default();
    let mut refreshes: u64 = 0;

    loop {
        let frame_start = Instant::now();

        loop {
            match commands.try_recv() {
                Ok(command) => {
                    if commands::handle(command, scanner) == Flow::Quit {
                        return;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    scanner.stop();
                    return;
                }
            }
        }

        scanner.on_frame(chrono::Utc::now());
        refreshes += 1;

        let snapshot = monitor.snapshot();
        let label_changed = snapshot.label != last_printed.label;
        let periodic = snapshot.is_scanning && refreshes % config.print_every == 0;
        if label_changed || periodic {
            emit(&TerminalEvent::Snapshot {
                snapshot: &snapshot,
            });
            last_printed = snapshot;
        }

        if let Some(remaining) = refresh.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}
