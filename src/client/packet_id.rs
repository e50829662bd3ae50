use std::sync::atomic::{AtomicU16, Ordering};

/// Allocates the 16-bit packet identifiers required for QoS > 0 publishes and all
/// subscribe/unsubscribe requests.
///
/// Identifiers run 1..=65535 and wrap past the maximum back to 1; 0 is reserved by the
/// protocol and never issued. Allocation is atomic so concurrent callers cannot observe
/// the same identifier until the counter has wrapped the full range.
pub(crate) struct PacketIdCounter {
    last: AtomicU16,
}

impl PacketIdCounter {
    pub fn new() -> Self {
        Self {
            last: AtomicU16::new(0),
        }
    }

    pub fn next(&self) -> u16 {
        let prev = self
            .last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                Some(if last == u16::MAX { 1 } else { last + 1 })
            })
            .unwrap_or_else(|last| last);
        if prev == u16::MAX {
            1
        } else {
            prev + 1
        }
    }
}
