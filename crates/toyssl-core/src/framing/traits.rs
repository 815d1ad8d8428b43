use async_trait::async_trait;

use crate::{framing::Record, wire::WireError};

/*
    Record-level transport.
      - Reads yield whole records in arrival order; partial reads are hidden
        behind a reassembler.
      - Writes emit one record per call.
*/
#[async_trait]
pub trait RecordIo: Send {
    async fn read_record(&mut self) -> Result<Record, FramingError>;
    async fn write_record(&mut self, record: &Record) -> Result<(), FramingError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FramingError {
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),

    #[error("record payload too large: len={len}, max={max}")]
    RecordTooLarge { len: usize, max: usize },

    #[error("unknown record content type: {0}")]
    UnknownContentType(u8),

    #[error("unknown protocol version: {0:#06x}")]
    UnknownVersion(u16),

    #[error("malformed record: {0}")]
    Wire(#[from] WireError),

    #[error("peer closed the stream with {0} bytes of an incomplete record buffered")]
    UnexpectedEof(usize),

    #[error("peer closed the stream")]
    Closed,

    #[error("I/O error: {0}")]
    Io(String),
}
