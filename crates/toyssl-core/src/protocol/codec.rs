use crate::{
    framing::{ContentType, ProtocolVersion, Record, MAX_RECORD_PAYLOAD},
    protocol::{
        extensions::{decode, read_extensions, write_extensions},
        traits::expect_consumed,
        Certificate, CipherSuite, ClientHello, ClientKeyExchange, CompressionMethod,
        HandshakeCodec, HandshakeMessage, HandshakeType, Message, ProtocolError, Random, ServerHello,
        ServerHelloDone, ServerKeyExchange, CHANGE_CIPHER_SPEC,
    },
    wire::WireBuffer,
};

fn write_version(buf: &mut WireBuffer, version: ProtocolVersion) -> Result<(), ProtocolError> {
    Ok(buf.add_uint(u64::from(version.code()), 2)?)
}

fn read_version(buf: &mut WireBuffer) -> Result<ProtocolVersion, ProtocolError> {
    decode(ProtocolVersion::from_code, buf.get_u16()?, "protocol version")
}

fn read_random(buf: &mut WireBuffer) -> Result<Random, ProtocolError> {
    Ok(Random(buf.get_array()?))
}

impl HandshakeCodec for ClientHello {
    const TYPE: HandshakeType = HandshakeType::ClientHello;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        write_version(buf, self.version)?;
        buf.add_bytes(&self.random.0);
        buf.add_opaque(1, &self.session_id)?;
        {
            let mut suites = buf.add_opaque_deferred(2)?;
            for cs in &self.cipher_suites {
                suites.add_uint(u64::from(cs.code()), 2)?;
            }
        }
        {
            let mut methods = buf.add_opaque_deferred(1)?;
            for cm in &self.compression_methods {
                methods.add_uint(u64::from(cm.code()), 1)?;
            }
        }
        if let Some(exts) = &self.extensions {
            write_extensions(buf, exts)?;
        }
        Ok(())
    }

    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        let version = read_version(body)?;
        let random = read_random(body)?;
        let session_id = body.get_opaque(1)?.get_rest().to_vec();

        let mut suites = body.get_opaque(2)?;
        if suites.len() % 2 != 0 {
            return Err(ProtocolError::TrailingBytes { field: "cipher suite list", remaining: 1 });
        }
        let mut cipher_suites = Vec::with_capacity(suites.len() / 2);
        while suites.remaining() > 0 {
            cipher_suites.push(decode(CipherSuite::from_code, suites.get_u16()?, "cipher suite")?);
        }

        let mut methods = body.get_opaque(1)?;
        let mut compression_methods = Vec::with_capacity(methods.len());
        while methods.remaining() > 0 {
            compression_methods.push(decode(CompressionMethod::from_code, methods.get_u8()?, "compression method")?);
        }

        let extensions = read_extensions(body)?;

        Ok(ClientHello { version, random, session_id, cipher_suites, compression_methods, extensions })
    }
}

impl HandshakeCodec for ServerHello {
    const TYPE: HandshakeType = HandshakeType::ServerHello;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        write_version(buf, self.version)?;
        buf.add_bytes(&self.random.0);
        buf.add_opaque(1, &self.session_id)?;
        buf.add_uint(u64::from(self.cipher_suite.code()), 2)?;
        buf.add_uint(u64::from(self.compression_method.code()), 1)?;
        if let Some(exts) = &self.extensions {
            write_extensions(buf, exts)?;
        }
        Ok(())
    }

    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        let version = read_version(body)?;
        let random = read_random(body)?;
        let session_id = body.get_opaque(1)?.get_rest().to_vec();
        let cipher_suite = decode(CipherSuite::from_code, body.get_u16()?, "cipher suite")?;
        let compression_method = decode(CompressionMethod::from_code, body.get_u8()?, "compression method")?;
        let extensions = read_extensions(body)?;

        Ok(ServerHello { version, random, session_id, cipher_suite, compression_method, extensions })
    }
}

impl HandshakeCodec for Certificate {
    const TYPE: HandshakeType = HandshakeType::Certificate;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        let mut list = buf.add_opaque_deferred(3)?;
        for der in &self.chain {
            list.add_opaque(3, der)?;
        }
        Ok(())
    }

    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        let mut list = body.get_opaque(3)?;
        let mut chain = Vec::new();
        while list.remaining() > 0 {
            chain.push(list.get_opaque(3)?.get_rest().to_vec());
        }
        Ok(Certificate { chain })
    }
}

impl ServerKeyExchange {
    /// The part of the message covered by the server's signature:
    /// `opaque16 p, opaque16 g, opaque16 Ys`.
    pub fn signed_params(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = WireBuffer::new();
        buf.add_opaque(2, &self.p)?;
        buf.add_opaque(2, &self.g)?;
        buf.add_opaque(2, &self.public_value)?;
        Ok(buf.into_bytes()?)
    }
}

impl HandshakeCodec for ServerKeyExchange {
    const TYPE: HandshakeType = HandshakeType::ServerKeyExchange;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        buf.add_bytes(&self.signed_params()?);
        buf.add_opaque(2, &self.signature)?;
        Ok(())
    }

    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        let p = body.get_opaque(2)?.get_rest().to_vec();
        let g = body.get_opaque(2)?.get_rest().to_vec();
        let public_value = body.get_opaque(2)?.get_rest().to_vec();
        let signature = body.get_opaque(2)?.get_rest().to_vec();
        Ok(ServerKeyExchange { p, g, public_value, signature })
    }
}

impl HandshakeCodec for ClientKeyExchange {
    const TYPE: HandshakeType = HandshakeType::ClientKeyExchange;

    fn write_body(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        buf.add_opaque(2, &self.public_value)?;
        if let Some(sig) = &self.signature {
            buf.add_opaque(2, sig)?;
        }
        Ok(())
    }

    fn read_body(body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        let public_value = body.get_opaque(2)?.get_rest().to_vec();
        let signature = match body.remaining() {
            0 => None,
            _ => Some(body.get_opaque(2)?.get_rest().to_vec()),
        };
        Ok(ClientKeyExchange { public_value, signature })
    }
}

impl HandshakeCodec for ServerHelloDone {
    const TYPE: HandshakeType = HandshakeType::ServerHelloDone;

    fn write_body(&self, _buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        Ok(())
    }

    fn read_body(_body: &mut WireBuffer) -> Result<Self, ProtocolError> {
        Ok(ServerHelloDone)
    }
}

fn read_framed<T: HandshakeCodec>(body: &mut WireBuffer) -> Result<T, ProtocolError> {
    let msg = T::read_body(body)?;
    expect_consumed(body, T::TYPE.name())?;
    Ok(msg)
}

impl HandshakeMessage {
    pub fn write_to(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        match self {
            HandshakeMessage::ClientHello(m) => m.write_to(buf),
            HandshakeMessage::ServerHello(m) => m.write_to(buf),
            HandshakeMessage::Certificate(m) => m.write_to(buf),
            HandshakeMessage::ServerKeyExchange(m) => m.write_to(buf),
            HandshakeMessage::ClientKeyExchange(m) => m.write_to(buf),
            HandshakeMessage::ServerHelloDone(m) => m.write_to(buf),
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, ProtocolError> {
        let mut buf = WireBuffer::new();
        self.write_to(&mut buf)?;
        Ok(buf.into_bytes()?)
    }

    /// Reads one `[type][u24 length][body]` message from the cursor.
    pub fn read_from(buf: &mut WireBuffer) -> Result<HandshakeMessage, ProtocolError> {
        let code = buf.get_u8()?;
        let ty = HandshakeType::from_code(code).ok_or(ProtocolError::UnknownHandshakeType(code))?;
        let mut body = buf.get_opaque(3)?;

        Ok(match ty {
            HandshakeType::ClientHello => HandshakeMessage::ClientHello(read_framed(&mut body)?),
            HandshakeType::ServerHello => HandshakeMessage::ServerHello(read_framed(&mut body)?),
            HandshakeType::Certificate => HandshakeMessage::Certificate(read_framed(&mut body)?),
            HandshakeType::ServerKeyExchange => HandshakeMessage::ServerKeyExchange(read_framed(&mut body)?),
            HandshakeType::ClientKeyExchange => HandshakeMessage::ClientKeyExchange(read_framed(&mut body)?),
            HandshakeType::ServerHelloDone => HandshakeMessage::ServerHelloDone(read_framed(&mut body)?),
        })
    }

    /// Parses exactly one message.
    pub fn parse(bytes: &[u8]) -> Result<HandshakeMessage, ProtocolError> {
        let mut buf = WireBuffer::from_bytes(bytes);
        let msg = Self::read_from(&mut buf)?;
        expect_consumed(&buf, "handshake message")?;
        Ok(msg)
    }

    /// Parses every message coalesced into one handshake record payload.
    pub fn parse_all(payload: &[u8]) -> Result<Vec<HandshakeMessage>, ProtocolError> {
        if payload.is_empty() {
            return Err(ProtocolError::EmptyRecord);
        }
        let mut buf = WireBuffer::from_bytes(payload);
        let mut out = Vec::new();
        while buf.remaining() > 0 {
            out.push(Self::read_from(&mut buf)?);
        }
        Ok(out)
    }
}

impl Message {
    /// Bytes carried in the record payload for this message.
    pub fn payload(&self) -> Result<Vec<u8>, ProtocolError> {
        match self {
            Message::Handshake(m) => m.serialize(),
            Message::ChangeCipherSpec => Ok(vec![CHANGE_CIPHER_SPEC]),
        }
    }

    pub fn to_record(&self, version: ProtocolVersion) -> Result<Record, ProtocolError> {
        let content_type = match self {
            Message::Handshake(_) => ContentType::Handshake,
            Message::ChangeCipherSpec => ContentType::ChangeCipherSpec,
        };
        Ok(Record::new(content_type, version, self.payload()?))
    }

    /// Splits a record into the application messages it carries.
    pub fn from_record(record: &Record) -> Result<Vec<Message>, ProtocolError> {
        match record.content_type {
            ContentType::Handshake => Ok(HandshakeMessage::parse_all(&record.payload)?
                .into_iter()
                .map(Message::Handshake)
                .collect()),
            ContentType::ChangeCipherSpec => {
                if record.payload.as_slice() != [CHANGE_CIPHER_SPEC] {
                    return Err(ProtocolError::BadChangeCipherSpec(record.payload.clone()));
                }
                Ok(vec![Message::ChangeCipherSpec])
            }
        }
    }

    /// Packs a flight into records. Consecutive handshake messages share a
    /// record while the payload fits; ChangeCipherSpec always stands alone.
    pub fn pack(msgs: &[Message], version: ProtocolVersion) -> Result<Vec<Record>, ProtocolError> {
        let mut records = Vec::new();
        let mut pending: Vec<u8> = Vec::new();

        for msg in msgs {
            match msg {
                Message::Handshake(m) => {
                    let bytes = m.serialize()?;
                    if !pending.is_empty() && pending.len() + bytes.len() > MAX_RECORD_PAYLOAD {
                        records.push(Record::new(ContentType::Handshake, version, std::mem::take(&mut pending)));
                    }
                    pending.extend_from_slice(&bytes);
                }
                Message::ChangeCipherSpec => {
                    if !pending.is_empty() {
                        records.push(Record::new(ContentType::Handshake, version, std::mem::take(&mut pending)));
                    }
                    records.push(msg.to_record(version)?);
                }
            }
        }
        if !pending.is_empty() {
            records.push(Record::new(ContentType::Handshake, version, pending));
        }
        Ok(records)
    }
}
