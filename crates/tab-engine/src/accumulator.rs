//! Common data buffer and the apply collaborator fed from it.

use tab_protocol::MAX_PAYLOAD_SIZE;

/// Collaborator that consumes accumulated DATA payloads.
///
/// Invoked once per completed DATA frame; the boolean result selects the ACK
/// (success) or NACK (failure) reply. What "apply" means (writing to storage,
/// staging an image, ...) is up to the host application.
pub trait DataSink {
    /// Apply one accumulated payload. Returns true on success.
    fn apply(&mut self, data: &[u8]) -> bool;
}

/// Stock sink that ignores every payload and reports failure, so DATA frames
/// are negative-acknowledged until a host wires in a real sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink;

impl DataSink for DiscardSink {
    fn apply(&mut self, _data: &[u8]) -> bool {
        false
    }
}

/// Reusable buffer collecting the payload of the most recent DATA frame.
///
/// The buffer is overwritten, not appended, on each load; payload byte 0
/// always lands at index 0.
#[derive(Debug, Clone)]
pub struct DataAccumulator {
    data: [u8; MAX_PAYLOAD_SIZE],
    end: usize,
}

impl Default for DataAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl DataAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        DataAccumulator {
            data: [0u8; MAX_PAYLOAD_SIZE],
            end: 0,
        }
    }

    /// Overwrite the buffer with a payload.
    pub fn load(&mut self, payload: &[u8]) {
        self.data[..payload.len()].copy_from_slice(payload);
        self.end = payload.len();
    }

    /// Get the valid bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.end]
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.end
    }

    /// Whether the buffer holds no valid bytes.
    pub fn is_empty(&self) -> bool {
        self.end == 0
    }

    /// Zero-fill the buffer and mark it empty.
    pub fn clear(&mut self) {
        self.data = [0u8; MAX_PAYLOAD_SIZE];
        self.end = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_overwrites() {
        let mut acc = DataAccumulator::new();
        acc.load(&[1, 2, 3, 4]);
        assert_eq!(acc.bytes(), &[1, 2, 3, 4]);

        acc.load(&[9]);
        assert_eq!(acc.bytes(), &[9]);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut acc = DataAccumulator::new();
        acc.load(&[1, 2, 3]);
        acc.clear();
        assert!(acc.is_empty());
        assert_eq!(acc.bytes(), &[] as &[u8]);
    }

    #[test]
    fn test_full_payload_fits() {
        let mut acc = DataAccumulator::new();
        let payload = [0xab; MAX_PAYLOAD_SIZE];
        acc.load(&payload);
        assert_eq!(acc.len(), MAX_PAYLOAD_SIZE);
    }
}
