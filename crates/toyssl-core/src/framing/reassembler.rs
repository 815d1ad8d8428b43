use std::sync::Mutex;

use crate::framing::RECORD_HEADER_LEN;

// Inbound byte FIFO that hands out complete record frames.
// The lock is held only for one append or one extraction attempt.
#[derive(Debug, Default)]
pub struct RecordReassembler {
    fifo: Mutex<Vec<u8>>,
}

impl RecordReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, chunk: &[u8]) {
        self.lock().extend_from_slice(chunk);
    }

    /// Removes and returns one full `[header][payload]` frame, or `None` if
    /// the buffered bytes do not yet hold one. Call until `None` to drain.
    pub fn try_extract_record(&self) -> Option<Vec<u8>> {
        let mut fifo = self.lock();
        if fifo.len() < RECORD_HEADER_LEN {
            return None;
        }

        let declared = usize::from(u16::from_be_bytes([fifo[3], fifo[4]]));
        let total = RECORD_HEADER_LEN + declared;
        if fifo.len() < total {
            return None;
        }

        Some(fifo.drain(..total).collect())
    }

    pub fn buffered(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<u8>> {
        self.fifo.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
