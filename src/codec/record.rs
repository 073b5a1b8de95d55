//! Password record wire format
//!
//! Each stored entry is one self-describing byte buffer:
//!
//! ```text
//! +------------------+
//! | Name Length      | (u16 BE)
//! +------------------+
//! | Name             | (name_len bytes, arbitrary content)
//! +------------------+
//! | Password Length  | (u16 BE)
//! +------------------+
//! | Password         | (passwd_len bytes, arbitrary content)
//! +------------------+
//! ```
//!
//! Invariant: `buffer.len() == 4 + name_len + passwd_len`.
//!
//! Length prefixes are big-endian so the format is identical regardless of
//! host byte order, and the fields need no delimiter (password bytes are
//! arbitrary and may contain any value, including NUL).

use super::errors::{CodecError, CodecResult};

/// Size of one length prefix in bytes
const PREFIX_LEN: usize = 2;

/// Minimum size of a well-formed record (two prefixes, both fields empty)
const MIN_RECORD_LEN: usize = 2 * PREFIX_LEN;

/// One decoded (name, password) pair.
///
/// Both fields are fully-owned byte vectors: decoding never hands out
/// references into the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordRecord {
    /// Entry name used for lookup
    pub name: Vec<u8>,
    /// Stored password value (opaque bytes, not validated or encrypted here)
    pub password: Vec<u8>,
}

impl PasswordRecord {
    /// Create a new record from owned field values
    pub fn new(name: impl Into<Vec<u8>>, password: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }

    /// Encode the record into its packed wire form.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::FieldTooLarge` if either field exceeds 65535
    /// bytes. This is a hard rejection: a 16-bit cast would silently wrap
    /// and corrupt the record.
    pub fn encode(&self) -> CodecResult<Vec<u8>> {
        let name_len = field_len("name", &self.name)?;
        let passwd_len = field_len("password", &self.password)?;

        let mut buf = Vec::with_capacity(MIN_RECORD_LEN + self.name.len() + self.password.len());
        buf.extend_from_slice(&name_len.to_be_bytes());
        buf.extend_from_slice(&self.name);
        buf.extend_from_slice(&passwd_len.to_be_bytes());
        buf.extend_from_slice(&self.password);
        Ok(buf)
    }

    /// Decode a packed buffer back into a record.
    ///
    /// Every length prefix is validated against the remaining buffer before
    /// any slicing, and a buffer with trailing bytes beyond the declared
    /// lengths is rejected: a well-formed record is exactly
    /// `4 + name_len + passwd_len` bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::MalformedRecord` on any structural violation.
    pub fn decode(buf: &[u8]) -> CodecResult<Self> {
        let (name, rest) = split_field(buf, "name")?;
        let (password, rest) = split_field(rest, "password")?;
        if !rest.is_empty() {
            return Err(CodecError::MalformedRecord(format!(
                "{} trailing bytes after password field",
                rest.len()
            )));
        }
        Ok(Self {
            name: name.to_vec(),
            password: password.to_vec(),
        })
    }
}

/// Read only the name portion of a packed buffer.
///
/// Used by scan loops to match entries by name without copying out the
/// password of every record along the way. The password prefix must still
/// be present for the buffer to be accepted.
pub fn peek_name(buf: &[u8]) -> CodecResult<&[u8]> {
    let (name, rest) = split_field(buf, "name")?;
    if rest.len() < PREFIX_LEN {
        return Err(CodecError::MalformedRecord(
            "buffer ends before password length prefix".into(),
        ));
    }
    Ok(name)
}

/// Validate a field length against the 16-bit prefix limit
fn field_len(field: &'static str, value: &[u8]) -> CodecResult<u16> {
    u16::try_from(value.len()).map_err(|_| CodecError::FieldTooLarge {
        field,
        len: value.len(),
    })
}

/// Split one length-prefixed field off the front of `buf`.
///
/// Returns the field bytes and the remainder after them.
fn split_field<'a>(buf: &'a [u8], field: &'static str) -> CodecResult<(&'a [u8], &'a [u8])> {
    if buf.len() < PREFIX_LEN {
        return Err(CodecError::MalformedRecord(format!(
            "buffer ends before {} length prefix",
            field
        )));
    }
    let len = u16::from_be_bytes([buf[0], buf[1]]) as usize;
    let rest = &buf[PREFIX_LEN..];
    if rest.len() < len {
        return Err(CodecError::MalformedRecord(format!(
            "declared {} length {} overruns buffer ({} bytes remain)",
            field,
            len,
            rest.len()
        )));
    }
    Ok(rest.split_at(len))
}
