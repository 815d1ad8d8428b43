use crate::wire::wire_enum;

// Largest payload a single record may carry (the length field is 16 bits).
pub const MAX_RECORD_PAYLOAD: usize = 0xffff;

// Record header: content type, version, 16-bit length.
pub const RECORD_HEADER_LEN: usize = 5;

wire_enum! {
    pub enum ContentType: u8 {
        ChangeCipherSpec = 20,
        Handshake = 22,
    }
}

wire_enum! {
    pub enum ProtocolVersion: u16 {
        Ssl3_0 = 0x0300,
        Tls1_0 = 0x0301,
        Tls1_1 = 0x0302,
        Tls1_2 = 0x0303,
    }
}

// One record-layer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub content_type: ContentType,
    pub version: ProtocolVersion,
    pub payload: Vec<u8>,
}

impl Record {
    pub fn new(content_type: ContentType, version: ProtocolVersion, payload: Vec<u8>) -> Self {
        Self { content_type, version, payload }
    }
}
