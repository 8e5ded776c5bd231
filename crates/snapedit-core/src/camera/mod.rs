//! Live camera capture.
//!
//! [`CameraSession`] is a small state machine around a [`CameraSource`]:
//!
//! ```text
//!   Closed --open--> Streaming --close--------------> Closed
//!                    Streaming --capture_one--> Capturing --> Closed
//! ```
//!
//! Polling is cooperative. The host calls [`CameraSession::tick`] with a
//! monotonic timestamp on its own timer; the session decides whether a frame
//! is due and performs at most one device read per due tick. No threads are
//! spawned.
//!
//! The open device lives inside a guard that releases it on drop, so every
//! way out of `Streaming` (close, capture, errors, dropping the session)
//! gives the handle back.

mod queue;

use std::mem;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::buffer::PixelBuffer;
use crate::decode::CapturedFrame;

pub use queue::{FrameQueue, QueuedDevice};

/// Error types for camera operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    /// The capture device could not be opened.
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// A single-shot capture produced no usable frame.
    #[error("Failed to capture a frame from the camera")]
    CaptureFailed,

    /// The operation requires an active stream.
    #[error("Camera is not streaming")]
    NotStreaming,
}

/// An opened capture device.
pub trait CameraDevice {
    /// Pull the next frame. `None` is a transient miss, not an error.
    fn read_frame(&mut self) -> Option<CapturedFrame>;

    /// Give the device back. Called exactly once, when the session lets go.
    fn release(&mut self);
}

/// Something that can open a capture device.
pub trait CameraSource {
    type Device: CameraDevice;

    /// Acquire the device.
    ///
    /// # Errors
    ///
    /// `CameraError::DeviceUnavailable` if the device cannot be opened.
    fn open(&mut self) -> Result<Self::Device, CameraError>;
}

/// Uninhabited device type for [`NoCamera`].
#[derive(Debug)]
pub enum NoDevice {}

impl CameraDevice for NoDevice {
    fn read_frame(&mut self) -> Option<CapturedFrame> {
        match *self {}
    }

    fn release(&mut self) {
        match *self {}
    }
}

/// A source for hosts without a camera. Opening always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

impl CameraSource for NoCamera {
    type Device = NoDevice;

    fn open(&mut self) -> Result<NoDevice, CameraError> {
        Err(CameraError::DeviceUnavailable(
            "no camera backend configured".to_string(),
        ))
    }
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraState {
    Closed,
    Streaming,
    /// Transitional state inside [`CameraSession::capture_one`].
    Capturing,
}

/// Releases the wrapped device when dropped.
struct DeviceGuard<D: CameraDevice> {
    device: D,
}

impl<D: CameraDevice> DeviceGuard<D> {
    fn read(&mut self) -> Option<CapturedFrame> {
        self.device.read_frame()
    }
}

impl<D: CameraDevice> Drop for DeviceGuard<D> {
    fn drop(&mut self) {
        self.device.release();
        debug!("camera device released");
    }
}

enum Session<D: CameraDevice> {
    Closed,
    Streaming {
        guard: DeviceGuard<D>,
        next_due: Duration,
    },
    Capturing,
}

/// Camera state machine with cooperative fixed-interval polling.
pub struct CameraSession<S: CameraSource> {
    source: S,
    session: Session<S::Device>,
    poll_interval: Duration,
}

impl<S: CameraSource> CameraSession<S> {
    /// Create a closed session. A zero interval is bumped to 1ms.
    pub fn new(source: S, poll_interval: Duration) -> Self {
        Self {
            source,
            session: Session::Closed,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }

    /// Current state.
    pub fn state(&self) -> CameraState {
        match self.session {
            Session::Closed => CameraState::Closed,
            Session::Streaming { .. } => CameraState::Streaming,
            Session::Capturing => CameraState::Capturing,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.session, Session::Streaming { .. })
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Timestamp at which the next tick will read a frame, while streaming.
    pub fn next_due(&self) -> Option<Duration> {
        match self.session {
            Session::Streaming { next_due, .. } => Some(next_due),
            _ => None,
        }
    }

    /// Start streaming. The first tick at or after `now` reads a frame.
    ///
    /// Opening an already streaming session is a no-op.
    ///
    /// # Errors
    ///
    /// `DeviceUnavailable` if the source cannot open the device; the
    /// session stays `Closed`.
    pub fn open(&mut self, now: Duration) -> Result<(), CameraError> {
        if self.is_streaming() {
            debug!("camera already streaming");
            return Ok(());
        }

        match self.source.open() {
            Ok(device) => {
                self.session = Session::Streaming {
                    guard: DeviceGuard { device },
                    next_due: now,
                };
                debug!(interval_ms = self.poll_interval.as_millis() as u64, "camera streaming");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "camera open failed");
                self.session = Session::Closed;
                Err(e)
            }
        }
    }

    /// Poll for a live frame.
    ///
    /// Returns `None` when the session is not streaming, when the next frame
    /// is not yet due, or when the device had no frame ready. None of these
    /// change the state.
    pub fn tick(&mut self, now: Duration) -> Option<PixelBuffer> {
        let interval = self.poll_interval;
        let Session::Streaming { guard, next_due } = &mut self.session else {
            trace!("tick ignored: camera not streaming");
            return None;
        };

        if now < *next_due {
            return None;
        }

        // Keep a fixed cadence, but never try to catch up on missed ticks.
        let mut next = next_due.saturating_add(interval);
        if next <= now {
            next = now.saturating_add(interval);
        }
        *next_due = next;

        match guard.read().and_then(PixelBuffer::from_captured_frame) {
            Some(frame) => Some(frame),
            None => {
                trace!("no frame ready, tick skipped");
                None
            }
        }
    }

    /// Take one frame and stop streaming.
    ///
    /// The device is released whether or not the read succeeds, and the read
    /// is not retried.
    ///
    /// # Errors
    ///
    /// - `NotStreaming` if the session is not streaming (state unchanged)
    /// - `CaptureFailed` if the device produced no usable frame
    pub fn capture_one(&mut self) -> Result<PixelBuffer, CameraError> {
        let mut guard = match mem::replace(&mut self.session, Session::Capturing) {
            Session::Streaming { guard, .. } => guard,
            other => {
                self.session = other;
                return Err(CameraError::NotStreaming);
            }
        };

        let frame = guard.read();
        drop(guard);
        self.session = Session::Closed;

        match frame.and_then(PixelBuffer::from_captured_frame) {
            Some(buffer) => {
                debug!(
                    width = buffer.width(),
                    height = buffer.height(),
                    "captured frame"
                );
                Ok(buffer)
            }
            None => {
                warn!("capture produced no frame");
                Err(CameraError::CaptureFailed)
            }
        }
    }

    /// Stop streaming and release the device. Idempotent.
    pub fn close(&mut self) {
        if !matches!(self.session, Session::Closed) {
            debug!("camera closing");
        }
        self.session = Session::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FrameLayout;

    const INTERVAL: Duration = Duration::from_millis(30);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn frame(value: u8) -> CapturedFrame {
        CapturedFrame::new(2, 2, FrameLayout::Rgb, vec![value; 12])
    }

    fn streaming_session(queue: &FrameQueue) -> CameraSession<FrameQueue> {
        let mut session = CameraSession::new(queue.clone(), INTERVAL);
        session.open(ms(0)).unwrap();
        session
    }

    #[test]
    fn test_new_session_is_closed() {
        let session = CameraSession::new(FrameQueue::new(), INTERVAL);
        assert_eq!(session.state(), CameraState::Closed);
        assert_eq!(session.next_due(), None);
    }

    #[test]
    fn test_open_unavailable_stays_closed() {
        let mut session = CameraSession::new(NoCamera, INTERVAL);
        let err = session.open(ms(0)).unwrap_err();
        assert!(matches!(err, CameraError::DeviceUnavailable(_)));
        assert_eq!(session.state(), CameraState::Closed);

        // Ticking a closed session is a harmless no-op
        assert!(session.tick(ms(100)).is_none());
        assert_eq!(session.state(), CameraState::Closed);
    }

    #[test]
    fn test_open_disconnected_queue_fails() {
        let queue = FrameQueue::new();
        queue.set_available(false);
        let mut session = CameraSession::new(queue.clone(), INTERVAL);
        assert!(matches!(
            session.open(ms(0)),
            Err(CameraError::DeviceUnavailable(_))
        ));
        assert!(!queue.is_held());
    }

    #[test]
    fn test_open_twice_is_noop() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        session.open(ms(5)).unwrap();
        assert_eq!(session.state(), CameraState::Streaming);
        assert_eq!(queue.open_count(), 1);
    }

    #[test]
    fn test_tick_returns_due_frame() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        queue.push(frame(7));

        let buf = session.tick(ms(0)).unwrap();
        assert_eq!(buf.get(0, 0), Some([7, 7, 7]));
        assert_eq!(session.next_due(), Some(ms(30)));
    }

    #[test]
    fn test_tick_before_due_does_not_read() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        queue.push(frame(1));
        assert!(session.tick(ms(0)).is_some());

        queue.push(frame(2));
        assert!(session.tick(ms(10)).is_none());
        assert_eq!(queue.len(), 1, "frame must stay queued until due");

        assert_eq!(session.tick(ms(30)).unwrap().get(0, 0), Some([2, 2, 2]));
    }

    #[test]
    fn test_tick_miss_is_silent() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);

        assert!(session.tick(ms(0)).is_none());
        assert_eq!(session.state(), CameraState::Streaming);

        queue.push(frame(3));
        assert!(session.tick(ms(30)).is_some());
    }

    #[test]
    fn test_late_tick_does_not_burst() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        session.tick(ms(0));

        // Host stalled for a long time; next due is rescheduled from now
        session.tick(ms(500));
        assert_eq!(session.next_due(), Some(ms(530)));
    }

    #[test]
    fn test_capture_one_stops_stream_and_releases() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        queue.push(frame(9));

        let buf = session.capture_one().unwrap();
        assert_eq!(buf.get(1, 1), Some([9, 9, 9]));
        assert_eq!(session.state(), CameraState::Closed);
        assert!(!queue.is_held());
    }

    #[test]
    fn test_capture_failure_still_releases() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);

        assert_eq!(session.capture_one(), Err(CameraError::CaptureFailed));
        assert_eq!(session.state(), CameraState::Closed);
        assert!(!queue.is_held());
    }

    #[test]
    fn test_capture_malformed_frame_fails() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        queue.push(CapturedFrame::new(4, 4, FrameLayout::Bgr, vec![0; 5]));

        assert_eq!(session.capture_one(), Err(CameraError::CaptureFailed));
        assert!(!queue.is_held());
    }

    #[test]
    fn test_capture_when_closed() {
        let mut session = CameraSession::new(FrameQueue::new(), INTERVAL);
        assert_eq!(session.capture_one(), Err(CameraError::NotStreaming));
        assert_eq!(session.state(), CameraState::Closed);
    }

    #[test]
    fn test_close_is_idempotent() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        assert!(queue.is_held());

        session.close();
        assert_eq!(session.state(), CameraState::Closed);
        assert!(!queue.is_held());

        session.close();
        assert_eq!(session.state(), CameraState::Closed);
        assert_eq!(queue.release_count(), 1);
    }

    #[test]
    fn test_drop_releases_device() {
        let queue = FrameQueue::new();
        {
            let _session = streaming_session(&queue);
            assert!(queue.is_held());
        }
        assert!(!queue.is_held());
    }

    #[test]
    fn test_reopen_after_close() {
        let queue = FrameQueue::new();
        let mut session = streaming_session(&queue);
        session.close();
        session.open(ms(100)).unwrap();
        assert_eq!(session.next_due(), Some(ms(100)));
        assert_eq!(queue.open_count(), 2);
    }

    #[test]
    fn test_schedule_saturates_at_max_timestamp() {
        let mut queue = FrameQueue::new();
        let mut session = CameraSession::new(queue.clone(), INTERVAL);
        session.open(Duration::MAX).unwrap();

        queue.push(CapturedFrame::new(1, 1, FrameLayout::Rgb, vec![4, 5, 6]));
        let frame = session.tick(Duration::MAX).unwrap();
        assert_eq!(frame.get(0, 0), Some([4, 5, 6]));
        assert_eq!(session.next_due(), Some(Duration::MAX));
        assert!(queue.open().is_err(), "device stays held while streaming");
    }

    #[test]
    fn test_zero_interval_is_bumped() {
        let session = CameraSession::new(NoCamera, Duration::ZERO);
        assert_eq!(session.poll_interval(), ms(1));
    }
}
