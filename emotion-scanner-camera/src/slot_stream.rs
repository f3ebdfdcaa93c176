//! Latest-frame slot filled by a dedicated capture thread.
//!
//! The capture thread overwrites the slot with every decoded image; readers
//! clone whatever is there. Nothing is queued, so a reader always sees the
//! most recent frame and never waits for a new one.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

use emotion_scanner_core::models::error::CaptureError;
use emotion_scanner_core::models::frame::Frame;

#[derive(Debug, Clone, PartialEq)]
enum SlotState {
    Pending,
    Ready(Frame),
    Lost(String),
}

/// Shared single-frame buffer.
#[derive(Debug, Clone)]
pub struct FrameSlot {
    state: Arc<Mutex<SlotState>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState::Pending)),
        }
    }

    /// Replace the current frame.
    pub fn store(&self, frame: Frame) {
        *self.state.lock() = SlotState::Ready(frame);
    }

    /// Mark the device as gone. Later reads report `DeviceLost`.
    pub fn mark_lost(&self, detail: impl Into<String>) {
        *self.state.lock() = SlotState::Lost(detail.into());
    }

    pub fn latest(&self) -> Result<Frame, CaptureError> {
        match &*self.state.lock() {
            SlotState::Pending => Err(CaptureError::FrameUnavailable),
            SlotState::Ready(frame) => Ok(frame.clone()),
            SlotState::Lost(detail) => Err(CaptureError::DeviceLost(detail.clone())),
        }
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// An open stream backed by a capture thread writing into a `FrameSlot`.
pub struct SlotStream {
    running: Arc<AtomicBool>,
    slot: FrameSlot,
    handle: Option<thread::JoinHandle<()>>,
}

impl SlotStream {
    /// Spawn `body` on a named thread. `body` must return once the running
    /// flag it receives goes false.
    pub fn spawn<F>(name: &str, body: F) -> io::Result<Self>
    where
        F: FnOnce(Arc<AtomicBool>, FrameSlot) + Send + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let slot = FrameSlot::new();

        let thread_running = Arc::clone(&running);
        let thread_slot = slot.clone();
        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || body(thread_running, thread_slot))?;

        Ok(Self {
            running,
            slot,
            handle: Some(handle),
        })
    }

    pub fn latest(&self) -> Result<Frame, CaptureError> {
        self.slot.latest()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signal the capture thread to exit. Idempotent. Never blocks: the
    /// thread is joined on a short-lived reaper thread.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            reap(handle);
        }
    }
}

fn reap(handle: thread::JoinHandle<()>) {
    let name = handle
        .thread()
        .name()
        .map(|n| format!("{}-reaper", n))
        .unwrap_or_else(|| "capture-reaper".into());

    let spawned = thread::Builder::new().name(name).spawn(move || {
        if handle.join().is_err() {
            log::error!("Capture thread panicked");
        }
    });
    if let Err(e) = spawned {
        log::warn!("Failed to spawn reaper, detaching capture thread: {}", e);
    }
}

impl Drop for SlotStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn pending_slot_has_no_frame() {
        let slot = FrameSlot::new();
        assert_eq!(slot.latest(), Err(CaptureError::FrameUnavailable));
    }

    #[test]
    fn store_overwrites_previous_frame() {
        let slot = FrameSlot::new();
        slot.store(Frame::solid(1, 1, [1, 1, 1]));
        slot.store(Frame::solid(1, 1, [9, 9, 9]));
        assert_eq!(slot.latest().unwrap().as_rgb(), &[9, 9, 9]);
    }

    #[test]
    fn lost_slot_reports_device_lost() {
        let slot = FrameSlot::new();
        slot.store(Frame::solid(1, 1, [1, 1, 1]));
        slot.mark_lost("unplugged");
        assert_eq!(
            slot.latest(),
            Err(CaptureError::DeviceLost("unplugged".into()))
        );
    }

    #[test]
    fn stop_joins_thread_and_is_idempotent() {
        let mut stream = SlotStream::spawn("slot-test", |running, slot| {
            while running.load(Ordering::SeqCst) {
                slot.store(Frame::solid(2, 2, [5, 5, 5]));
                thread::sleep(Duration::from_millis(1));
            }
        })
        .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while stream.latest().is_err() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(stream.latest().unwrap().pixel_count(), 4);

        stream.stop();
        assert!(!stream.is_running());
        stream.stop();
    }

    #[test]
    fn stop_does_not_wait_for_a_stalled_read() {
        let exited = Arc::new(AtomicBool::new(false));
        let thread_exited = Arc::clone(&exited);
        let mut stream = SlotStream::spawn("slot-stall", move |running, slot| {
            while running.load(Ordering::SeqCst) {
                slot.store(Frame::solid(1, 1, [1, 1, 1]));
                thread::sleep(Duration::from_millis(500));
            }
            thread_exited.store(true, Ordering::SeqCst);
        })
        .unwrap();
        thread::sleep(Duration::from_millis(20));

        let started = Instant::now();
        stream.stop();
        assert!(started.elapsed() < Duration::from_millis(100));
        assert!(!stream.is_running());

        let deadline = Instant::now() + Duration::from_secs(5);
        while !exited.load(Ordering::SeqCst) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(exited.load(Ordering::SeqCst));
    }

    #[test]
    fn drop_does_not_wait_for_a_stalled_read() {
        let stream = SlotStream::spawn("slot-stall-drop", |running, _slot| {
            while running.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(500));
            }
        })
        .unwrap();

        let started = Instant::now();
        drop(stream);
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
