//! A push-driven camera source.
//!
//! Hosts that receive frames through callbacks (a browser `getUserMedia`
//! stream, a capture thread marshalled onto the UI thread, a test) push them
//! into a [`FrameQueue`]; the session pulls them on its own cadence. Only the
//! most recent frames are kept so a slow consumer always sees a fresh image.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::{CameraDevice, CameraError, CameraSource};
use crate::decode::CapturedFrame;

/// Frames kept before the oldest is dropped.
const DEFAULT_CAPACITY: usize = 2;

#[derive(Debug)]
struct QueueState {
    frames: VecDeque<CapturedFrame>,
    capacity: usize,
    available: bool,
    held: bool,
    opens: usize,
    releases: usize,
}

/// Shared frame mailbox that doubles as a [`CameraSource`].
///
/// Cloning yields another handle to the same queue.
#[derive(Debug, Clone)]
pub struct FrameQueue {
    inner: Rc<RefCell<QueueState>>,
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue that keeps at most `capacity` frames (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QueueState {
                frames: VecDeque::new(),
                capacity: capacity.max(1),
                available: true,
                held: false,
                opens: 0,
                releases: 0,
            })),
        }
    }

    /// Offer a frame. The oldest frame is dropped when the queue is full.
    pub fn push(&self, frame: CapturedFrame) {
        let mut state = self.inner.borrow_mut();
        while state.frames.len() >= state.capacity {
            state.frames.pop_front();
        }
        state.frames.push_back(frame);
    }

    /// Mark the underlying device as connected or not. Opening a
    /// disconnected queue fails with `DeviceUnavailable`.
    pub fn set_available(&self, available: bool) {
        self.inner.borrow_mut().available = available;
    }

    /// Number of frames waiting.
    pub fn len(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while a session holds the device open.
    pub fn is_held(&self) -> bool {
        self.inner.borrow().held
    }

    /// How many times the device was opened.
    pub fn open_count(&self) -> usize {
        self.inner.borrow().opens
    }

    /// How many times the device was released.
    pub fn release_count(&self) -> usize {
        self.inner.borrow().releases
    }
}

impl CameraSource for FrameQueue {
    type Device = QueuedDevice;

    fn open(&mut self) -> Result<QueuedDevice, CameraError> {
        let mut state = self.inner.borrow_mut();
        if !state.available {
            return Err(CameraError::DeviceUnavailable(
                "frame source is not connected".to_string(),
            ));
        }
        if state.held {
            return Err(CameraError::DeviceUnavailable(
                "frame source is already in use".to_string(),
            ));
        }
        state.held = true;
        state.opens += 1;
        // Frames pushed before opening are stale.
        state.frames.clear();
        Ok(QueuedDevice {
            inner: Rc::clone(&self.inner),
        })
    }
}

/// Open handle on a [`FrameQueue`].
#[derive(Debug)]
pub struct QueuedDevice {
    inner: Rc<RefCell<QueueState>>,
}

impl CameraDevice for QueuedDevice {
    fn read_frame(&mut self) -> Option<CapturedFrame> {
        self.inner.borrow_mut().frames.pop_front()
    }

    fn release(&mut self) {
        let mut state = self.inner.borrow_mut();
        state.held = false;
        state.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FrameLayout;

    fn frame(value: u8) -> CapturedFrame {
        CapturedFrame::new(1, 1, FrameLayout::Rgb, vec![value; 3])
    }

    #[test]
    fn test_push_keeps_latest_frames() {
        let queue = FrameQueue::with_capacity(2);
        queue.push(frame(1));
        queue.push(frame(2));
        queue.push(frame(3));
        assert_eq!(queue.len(), 2);

        let mut source = queue.clone();
        // Opening clears stale frames, so push after opening
        let mut device = source.open().unwrap();
        queue.push(frame(4));
        queue.push(frame(5));
        queue.push(frame(6));
        assert_eq!(device.read_frame().unwrap().pixels[0], 5);
        assert_eq!(device.read_frame().unwrap().pixels[0], 6);
        assert!(device.read_frame().is_none());
    }

    #[test]
    fn test_open_clears_stale_frames() {
        let queue = FrameQueue::new();
        queue.push(frame(1));
        let mut source = queue.clone();
        let mut device = source.open().unwrap();
        assert!(device.read_frame().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_exclusive_open() {
        let mut queue = FrameQueue::new();
        let _device = queue.open().unwrap();
        assert!(matches!(
            queue.open(),
            Err(CameraError::DeviceUnavailable(_))
        ));
    }

    #[test]
    fn test_release_frees_device() {
        let mut queue = FrameQueue::new();
        let mut device = queue.open().unwrap();
        assert!(queue.is_held());
        device.release();
        assert!(!queue.is_held());
        assert_eq!(queue.release_count(), 1);
        assert!(queue.open().is_ok());
    }

    #[test]
    fn test_zero_capacity_bumped() {
        let queue = FrameQueue::with_capacity(0);
        queue.push(frame(1));
        queue.push(frame(2));
        assert_eq!(queue.len(), 1);
    }
}
