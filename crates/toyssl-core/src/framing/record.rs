use crate::{
    framing::{ContentType, FramingError, ProtocolVersion, Record, MAX_RECORD_PAYLOAD},
    wire::WireBuffer,
};

impl Record {
    /// Record format:
    ///   [u8 content type][u16 version][u16 length][payload]
    pub fn serialize(&self) -> Result<Vec<u8>, FramingError> {
        if self.payload.len() > MAX_RECORD_PAYLOAD {
            return Err(FramingError::RecordTooLarge { len: self.payload.len(), max: MAX_RECORD_PAYLOAD });
        }

        let mut buf = WireBuffer::new();
        buf.add_uint(u64::from(self.content_type.code()), 1)?;
        buf.add_uint(u64::from(self.version.code()), 2)?;
        buf.add_opaque(2, &self.payload)?;
        Ok(buf.into_bytes()?)
    }

    /// Parses exactly one record; any byte left over is a framing bug upstream.
    pub fn parse(bytes: &[u8]) -> Result<Record, FramingError> {
        let mut buf = WireBuffer::from_bytes(bytes);

        let ct = buf.get_u8()?;
        let content_type = ContentType::from_code(ct).ok_or(FramingError::UnknownContentType(ct))?;

        let v = buf.get_u16()?;
        let version = ProtocolVersion::from_code(v).ok_or(FramingError::UnknownVersion(v))?;

        let payload = buf.get_opaque(2)?.as_bytes().to_vec();

        match buf.ensure_consumed() {
            Ok(()) => Ok(Record { content_type, version, payload }),
            Err(_) => Err(FramingError::TrailingBytes(buf.remaining())),
        }
    }
}
