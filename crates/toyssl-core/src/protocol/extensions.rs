use crate::{
    protocol::{EcPointFormat, ExtensionType, HashAlgorithm, NamedGroup, ProtocolError, SignatureAlgorithm},
    wire::WireBuffer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignatureAndHash {
    pub hash: HashAlgorithm,
    pub signature: SignatureAlgorithm,
}

impl SignatureAndHash {
    pub fn new(signature: SignatureAlgorithm, hash: HashAlgorithm) -> Self {
        Self { hash, signature }
    }
}

// Hello extension. Types without a structured codec keep their raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extension {
    SignatureAlgorithms(Vec<SignatureAndHash>),
    SupportedGroups(Vec<NamedGroup>),
    EcPointFormats(Vec<EcPointFormat>),
    Unknown { ext_type: u16, data: Vec<u8> },
}

impl Extension {
    pub fn ext_type(&self) -> u16 {
        match self {
            Extension::SignatureAlgorithms(_) => ExtensionType::SignatureAlgorithms.code(),
            Extension::SupportedGroups(_) => ExtensionType::SupportedGroups.code(),
            Extension::EcPointFormats(_) => ExtensionType::EcPointFormats.code(),
            Extension::Unknown { ext_type, .. } => *ext_type,
        }
    }

    pub fn label(&self) -> String {
        match ExtensionType::from_code(self.ext_type()) {
            Some(t) => t.name().to_string(),
            None => format!("Extension({:#06x})", self.ext_type()),
        }
    }

    /// `[u16 type][u16 length][payload]`
    pub fn write_to(&self, buf: &mut WireBuffer) -> Result<(), ProtocolError> {
        buf.add_uint(u64::from(self.ext_type()), 2)?;
        let mut data = buf.add_opaque_deferred(2)?;
        match self {
            Extension::SignatureAlgorithms(algs) => {
                let mut list = data.add_opaque_deferred(2)?;
                for alg in algs {
                    list.add_uint(u64::from(alg.hash.code()), 1)?;
                    list.add_uint(u64::from(alg.signature.code()), 1)?;
                }
            }
            Extension::SupportedGroups(groups) => {
                let mut list = data.add_opaque_deferred(2)?;
                for group in groups {
                    list.add_uint(u64::from(group.code()), 2)?;
                }
            }
            Extension::EcPointFormats(formats) => {
                let mut list = data.add_opaque_deferred(1)?;
                for format in formats {
                    list.add_uint(u64::from(format.code()), 1)?;
                }
            }
            Extension::Unknown { data: raw, .. } => data.add_bytes(raw),
        }
        Ok(())
    }

    pub fn read_from(buf: &mut WireBuffer) -> Result<Extension, ProtocolError> {
        let ext_type = buf.get_u16()?;
        let mut data = buf.get_opaque(2)?;

        let ext = match ExtensionType::from_code(ext_type) {
            Some(ExtensionType::SignatureAlgorithms) => {
                let mut list = data.get_opaque(2)?;
                let mut algs = Vec::new();
                while list.remaining() > 0 {
                    let hash = decode(HashAlgorithm::from_code, list.get_u8()?, "hash algorithm")?;
                    let signature = decode(SignatureAlgorithm::from_code, list.get_u8()?, "signature algorithm")?;
                    algs.push(SignatureAndHash { hash, signature });
                }
                Extension::SignatureAlgorithms(algs)
            }
            Some(ExtensionType::SupportedGroups) => {
                let mut list = data.get_opaque(2)?;
                let mut groups = Vec::new();
                while list.remaining() > 0 {
                    groups.push(decode(NamedGroup::from_code, list.get_u16()?, "named group")?);
                }
                Extension::SupportedGroups(groups)
            }
            Some(ExtensionType::EcPointFormats) => {
                let mut list = data.get_opaque(1)?;
                let mut formats = Vec::new();
                while list.remaining() > 0 {
                    formats.push(decode(EcPointFormat::from_code, list.get_u8()?, "ec point format")?);
                }
                Extension::EcPointFormats(formats)
            }
            _ => Extension::Unknown { ext_type, data: data.get_rest().to_vec() },
        };

        match data.remaining() {
            0 => Ok(ext),
            remaining => Err(ProtocolError::TrailingBytes { field: "extension", remaining }),
        }
    }
}

pub(crate) fn decode<C, T>(from_code: fn(C) -> Option<T>, code: C, field: &'static str) -> Result<T, ProtocolError>
where
    C: Copy + Into<u32>,
{
    from_code(code).ok_or(ProtocolError::UnknownCode { field, code: code.into() })
}

// Writes an extensions block: a 2-byte length followed by the entries.
pub(crate) fn write_extensions(buf: &mut WireBuffer, exts: &[Extension]) -> Result<(), ProtocolError> {
    let mut block = buf.add_opaque_deferred(2)?;
    for ext in exts {
        ext.write_to(&mut block)?;
    }
    Ok(())
}

// Reads an optional trailing extensions block. The block's declared length
// must match the bytes left in the enclosing body exactly.
pub(crate) fn read_extensions(body: &mut WireBuffer) -> Result<Option<Vec<Extension>>, ProtocolError> {
    if body.remaining() == 0 {
        return Ok(None);
    }

    let mark = body.pos();
    let declared = body.get_u16()? as usize;
    let actual = body.remaining();
    if declared != actual {
        return Err(ProtocolError::LengthMismatch { field: "extensions", declared, actual });
    }

    body.seek(mark)?;
    let mut block = body.get_opaque(2)?;
    let mut exts = Vec::new();
    while block.remaining() > 0 {
        exts.push(Extension::read_from(&mut block)?);
    }
    Ok(Some(exts))
}
