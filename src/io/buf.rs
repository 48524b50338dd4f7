use byteorder::{BigEndian, ByteOrder};
use bytes::{Buf, Bytes};
use memchr::memchr;

use crate::error::{Error, Result};

pub(crate) trait BufExt {
    /// Read a NUL-terminated UTF-8 string, consuming the terminator.
    fn get_str_nul(&mut self) -> Result<String>;
}

impl BufExt for Bytes {
    fn get_str_nul(&mut self) -> Result<String> {
        let nul =
            memchr(b'\0', self).ok_or_else(|| err_protocol!("expected NUL in byte sequence"))?;

        let s = std::str::from_utf8(&self[..nul])
            .map_err(|err| Error::Protocol(err.to_string()))?
            .to_owned();

        self.advance(nul + 1);

        Ok(s)
    }
}

pub(crate) trait BufMutExt {
    fn put_str_nul(&mut self, s: &str);

    /// Write a length-prefixed frame: reserves 4 bytes, runs `f`, then
    /// writes the total frame length (including the prefix itself) back.
    fn put_length_prefixed<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Vec<u8>);
}

impl BufMutExt for Vec<u8> {
    fn put_str_nul(&mut self, s: &str) {
        self.extend_from_slice(s.as_bytes());
        self.push(0);
    }

    fn put_length_prefixed<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Vec<u8>),
    {
        let pos = self.len();
        self.extend_from_slice(&0_u32.to_be_bytes());

        f(self);

        let len = self.len() - pos;
        BigEndian::write_u32(&mut self[pos..], len as u32);
    }
}
