use std::ops::{AddAssign, Deref, DerefMut};

use crate::wire::WireError;

/*
    Growable big-endian byte buffer with a single cursor.
        - Writes always append at the end and leave the cursor there.
        - `+=` appends too, but only advances the cursor by what it appended.
        - Reads start at the cursor and advance it.
        - `get_opaque` hands out an independent window, so nested parsing
          can never read past the field it was given.
*/
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireBuffer {
    data: Vec<u8>,
    pos: usize,
    // Offset of data[0] inside the outermost buffer this window was cut from.
    base: usize,
    poisoned: Option<WireError>,
}

fn check_width(n: usize) -> Result<(), WireError> {
    if (1..=4).contains(&n) {
        Ok(())
    } else {
        Err(WireError::InvalidWidth(n))
    }
}

fn max_for_width(n: usize) -> u64 {
    (1u64 << (8 * n)) - 1
}

impl WireBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps existing bytes for reading; the cursor starts at 0.
    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into(), ..Self::default() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Absolute offset of the cursor relative to the outermost buffer.
    pub fn abs_pos(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        if pos > self.data.len() {
            return Err(WireError::Overrun { offset: self.abs_pos(), wanted: pos - self.pos, available: self.remaining() });
        }
        self.pos = pos;
        Ok(())
    }

    /// Finishes a write sequence. Fails if a deferred field overflowed its width.
    pub fn into_bytes(self) -> Result<Vec<u8>, WireError> {
        match self.poisoned {
            Some(e) => Err(e),
            None => Ok(self.data),
        }
    }

    pub fn add_uint(&mut self, value: u64, n: usize) -> Result<(), WireError> {
        check_width(n)?;
        if value > max_for_width(n) {
            return Err(WireError::ValueTooLarge { value, width: n });
        }
        let be = value.to_be_bytes();
        self.add_bytes(&be[8 - n..]);
        Ok(())
    }

    pub fn add_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
        self.pos = self.data.len();
    }

    pub fn add_opaque(&mut self, n: usize, data: &[u8]) -> Result<(), WireError> {
        self.add_uint(data.len() as u64, n)?;
        self.add_bytes(data);
        Ok(())
    }

    /// Reserves an `n`-byte length prefix that is patched with the size of
    /// everything written through the returned guard once it goes out of scope.
    pub fn add_opaque_deferred(&mut self, n: usize) -> Result<DeferredField<'_>, WireError> {
        check_width(n)?;
        let at = self.data.len();
        self.add_bytes(&[0u8; 4][..n]);
        Ok(DeferredField { buf: self, at, width: n })
    }

    pub fn get_uint(&mut self, n: usize) -> Result<u64, WireError> {
        check_width(n)?;
        let bytes = self.get_bytes(n)?;
        Ok(bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    pub fn get_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.get_uint(1)? as u8)
    }

    pub fn get_u16(&mut self) -> Result<u16, WireError> {
        Ok(self.get_uint(2)? as u16)
    }

    pub fn get_bytes(&mut self, len: usize) -> Result<&[u8], WireError> {
        if len > self.remaining() {
            return Err(WireError::Overrun { offset: self.abs_pos(), wanted: len, available: self.remaining() });
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.data[start..self.pos])
    }

    pub fn get_array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.get_bytes(N)?);
        Ok(out)
    }

    /// Reads an `n`-byte length, then returns a window over exactly that many bytes.
    pub fn get_opaque(&mut self, n: usize) -> Result<WireBuffer, WireError> {
        let len = self.get_uint(n)? as usize;
        let base = self.abs_pos();
        let data = self.get_bytes(len)?.to_vec();
        Ok(WireBuffer { data, pos: 0, base, poisoned: None })
    }

    pub fn get_rest(&mut self) -> &[u8] {
        let start = self.pos;
        self.pos = self.data.len();
        &self.data[start..]
    }

    pub fn ensure_consumed(&self) -> Result<(), WireError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(WireError::TrailingBytes(n)),
        }
    }
}

impl AddAssign<&WireBuffer> for WireBuffer {
    fn add_assign(&mut self, rhs: &WireBuffer) {
        *self += rhs.data.as_slice();
    }
}

impl AddAssign<&[u8]> for WireBuffer {
    fn add_assign(&mut self, rhs: &[u8]) {
        self.data.extend_from_slice(rhs);
        self.pos += rhs.len();
    }
}

// Scope guard for a length prefix whose value is only known after the body is written.
pub struct DeferredField<'a> {
    buf: &'a mut WireBuffer,
    at: usize,
    width: usize,
}

impl Deref for DeferredField<'_> {
    type Target = WireBuffer;

    fn deref(&self) -> &WireBuffer {
        self.buf
    }
}

impl DerefMut for DeferredField<'_> {
    fn deref_mut(&mut self) -> &mut WireBuffer {
        self.buf
    }
}

impl Drop for DeferredField<'_> {
    fn drop(&mut self) {
        let len = self.buf.data.len() - self.at - self.width;
        if len as u64 > max_for_width(self.width) {
            self.buf.poisoned.get_or_insert(WireError::DeferredOverflow { len, width: self.width });
            return;
        }
        let be = (len as u64).to_be_bytes();
        self.buf.data[self.at..self.at + self.width].copy_from_slice(&be[8 - self.width..]);
    }
}
