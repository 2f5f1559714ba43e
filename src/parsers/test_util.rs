//! Byte-level writer used by the unit tests to build chunks by hand.

use super::Endianness;

pub(crate) struct Bytes {
    data: Vec<u8>,
    endianness: Endianness,
}

impl Bytes {
    pub fn new() -> Self {
        Self::with_endianness(Endianness::Little)
    }

    pub fn with_endianness(endianness: Endianness) -> Self {
        Self {
            data: Vec::new(),
            endianness,
        }
    }

    pub fn i32(mut self, v: i32) -> Self {
        match self.endianness {
            Endianness::Little => self.data.extend_from_slice(&v.to_le_bytes()),
            Endianness::Big => self.data.extend_from_slice(&v.to_be_bytes()),
        }
        self
    }

    pub fn i32s(self, values: &[i32]) -> Self {
        values.iter().fold(self, |b, &v| b.i32(v))
    }

    pub fn f32s(self, values: &[f32]) -> Self {
        values.iter().fold(self, |b, &v| b.i32(v.to_bits() as i32))
    }

    pub fn string(mut self, s: &str) -> Self {
        self.data.extend_from_slice(s.as_bytes());
        self.data.push(0);
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn chunk(self, tag: &[u8; 4], body: Bytes) -> Self {
        let body = body.build();
        self.raw(tag).i32(body.len() as i32).raw(&body)
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}
