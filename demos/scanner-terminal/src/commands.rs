use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use emotion_scanner_core::{CaptureLifecycle, FrameProvider, Label};

use crate::scanner_state::{emit, DeviceInfo, TerminalEvent};

/// A line typed at the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Status,
    Devices,
    Labels,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "start" | "s" => Some(Self::Start),
            "stop" | "x" => Some(Self::Stop),
            "status" | "?" => Some(Self::Status),
            "devices" => Some(Self::Devices),
            "labels" => Some(Self::Labels),
            "quit" | "exit" | "q" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Whether the host loop keeps running after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Read commands from stdin on a background thread. EOF sends `Quit`.
pub fn spawn_reader() -> io::Result<mpsc::Receiver<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match Command::parse(&line) {
                    Some(cmd) => {
                        if tx.send(cmd).is_err() {
                            return;
                        }
                    }
                    None => log::warn!(
                        "Unknown command '{}' (start, stop, status, devices, labels, quit)",
                        line.trim()
                    ),
                }
            }
            let _ = tx.send(Command::Quit);
        })?;
    Ok(rx)
}

pub fn handle<P: FrameProvider>(command: Command, scanner: &mut CaptureLifecycle<P>) -> Flow {
    match command {
        Command::Start => {
            if let Err(e) = scanner.start() {
                emit(&TerminalEvent::Error {
                    message: e.to_string(),
                });
            }
        }
        Command::Stop => scanner.stop(),
        Command::Status => {
            let snapshot = scanner.snapshot();
            emit(&TerminalEvent::Snapshot {
                snapshot: &snapshot,
            });
            log::info!("Diagnostics: {:?}", scanner.diagnostics());
        }
        Command::Devices => emit(&TerminalEvent::Devices {
            devices: scanner
                .available_devices()
                .into_iter()
                .map(DeviceInfo::from)
                .collect(),
        }),
        Command::Labels => emit(&TerminalEvent::Labels {
            labels: &Label::CATALOGUE,
        }),
        Command::Quit => {
            scanner.stop();
            return Flow::Quit;
        }
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_case_insensitively() {
        assert_eq!(Command::parse(" START "), Some(Command::Start));
        assert_eq!(Command::parse("stop"), Some(Command::Stop));
        assert_eq!(Command::parse("q"), Some(Command::Quit));
        assert_eq!(Command::parse("dance"), None);
    }
}
