//! Bounded, inline string storage for rule names and lexemes

use std::{fmt, ops};

use thiserror::Error;

/// Maximum byte length of a [`Name`]
pub const MAX_NAME_LEN: usize = 63;

/// Returned when a string doesn't fit in a [`Name`]
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("{len} bytes don't fit in a name of at most {} bytes", MAX_NAME_LEN)]
pub struct TooLong {
    pub len: usize,
}

/// String of at most [`MAX_NAME_LEN`] bytes, stored inline
///
/// Construction copies the whole input or fails. It never truncates.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Name {
    buf: [u8; MAX_NAME_LEN],
    len: u8,
}

impl Name {
    pub const EMPTY: Self = Self {
        buf: [0; MAX_NAME_LEN],
        len: 0,
    };

    /// Copies `s` into bounded storage
    pub fn new(s: &str) -> Result<Self, TooLong> {
        let bytes = s.as_bytes();
        if bytes.len() > MAX_NAME_LEN {
            return Err(TooLong { len: bytes.len() });
        }

        let mut name = Self::EMPTY;
        name.buf[..bytes.len()].copy_from_slice(bytes);
        name.len = bytes.len() as u8;
        Ok(name)
    }

    pub fn as_str(&self) -> &str {
        // `buf[..len]` is always a full copy of a `&str`
        std::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or_default()
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl ops::Deref for Name {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl TryFrom<&str> for Name {
    type Error = TooLong;

    fn try_from(s: &str) -> Result<Self, TooLong> {
        Self::new(s)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
