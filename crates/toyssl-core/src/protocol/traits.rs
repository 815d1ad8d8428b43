use crate::{
    protocol::{HandshakeType, ProtocolError},
    wire::WireBuffer,
};

/*
    Codec for one handshake message variant.
      - Implementors only describe the body.
      - The default methods add the 1-byte type tag and the 3-byte
        length-prefixed body, and enforce that the body is consumed exactly.
*/
pub trait HandshakeCodec: Sized {
    const TYPE: HandshakeType;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError>;
    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError>;

    fn write_to(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        buf.add_uint(u64::from(Self::TYPE.code()), 1)?;
        let mut body = buf.add_opaque_deferred(3)?;
        self.write_body(&mut body)
    }

    fn serialize(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = WireBuffer::new();
        self.write_to(&mut buf)?;
        Ok(buf.into_bytes()?)
    }

    fn parse(bytes: &[u8]) -> Result<Self, ProtocolError> {
        let mut buf = WireBuffer::from_bytes(bytes);
        let got = buf.get_u8()?;
        if got != Self::TYPE.code() {
            return Err(ProtocolError::TypeMismatch { expected: Self::TYPE, got });
        }
        let mut body = buf.get_opaque(3)?;
        let msg = Self::read_body(&mut body)?;
        expect_consumed(&body, Self::TYPE.name())?;
        expect_consumed(&buf, Self::TYPE.name())?;
        Ok(msg)
    }
}

pub(crate) fn expect_consumed(buf: &WireBuffer, field: &'static str) -> Result<(), ProtocolError> {
    match buf.remaining() {
        0 => Ok(()),
        remaining => Err(ProtocolError::TrailingBytes { field, remaining }),
    }
}
