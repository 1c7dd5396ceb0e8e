//! Frame clock, advanced once per frame by the render loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::LazyLock;
use std::time::Instant;

use atomic_float::AtomicF32;

static START: LazyLock<Instant> = LazyLock::new(Instant::now);
// Zero until the first frame has been presented.
static DELTA: LazyLock<AtomicF32> = LazyLock::new(|| AtomicF32::new(0.0));
static FRAMES: AtomicU64 = AtomicU64::new(0);

pub(crate) fn initialize() {
    let _ = &*START;
}

/// Seconds since the window was opened.
pub fn elapsed_time() -> f32 {
    Instant::now().duration_since(*START).as_secs_f32()
}

pub(crate) fn end_frame(delta: f32) {
    DELTA.store(delta, Ordering::Release);
    FRAMES.fetch_add(1, Ordering::AcqRel);
}

/// Duration of the previous frame in seconds.
pub fn delta_time() -> f32 {
    DELTA.load(Ordering::Acquire)
}

pub fn frame_count() -> u64 {
    FRAMES.load(Ordering::Acquire)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_time_is_monotonic() {
        initialize();
        let a = elapsed_time();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(elapsed_time() > a);
    }

    #[test]
    fn end_frame_records_delta() {
        let before = frame_count();
        end_frame(0.016);
        assert_eq!(delta_time(), 0.016);
        assert!(frame_count() > before);
    }
}
