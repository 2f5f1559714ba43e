use super::{failure, primitive::parse_i32, B3dParseError, Endianness, Result};
use nom::{
    bytes::complete::take,
    error::{ErrorKind, ParseError},
};
use std::{convert::TryFrom, fmt};

/// Four ASCII characters identifying the type of a chunk.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const BB3D: FourCC = FourCC(*b"BB3D");
    pub const TEXS: FourCC = FourCC(*b"TEXS");
    pub const BRUS: FourCC = FourCC(*b"BRUS");
    pub const NODE: FourCC = FourCC(*b"NODE");
    pub const MESH: FourCC = FourCC(*b"MESH");
    pub const VRTS: FourCC = FourCC(*b"VRTS");
    pub const TRIS: FourCC = FourCC(*b"TRIS");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FourCC(\"{}\")", self)
    }
}

/// A chunk whose header was read. `body` holds exactly the declared number of bytes.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    pub tag: FourCC,
    pub body: &'a [u8],
    end: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Declared length of the payload.
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Whether `cursor`, a suffix of `body`, still has bytes of this chunk in front of it.
    pub fn within(&self, cursor: &[u8]) -> bool {
        !cursor.is_empty()
    }

    /// Returns the input right after the chunk, no matter how much of the payload was actually read.
    pub fn close(&self, cursor: &'a [u8]) -> &'a [u8] {
        if !cursor.is_empty() {
            log::trace!(
                "{} chunk: {} of {} bytes left unread",
                self.tag,
                cursor.len(),
                self.body.len()
            );
        }
        self.end
    }
}

pub fn chunk_tag(input: &[u8]) -> Result<FourCC> {
    let (input, v) = take(4_usize)(input)?;
    Ok((input, FourCC([v[0], v[1], v[2], v[3]])))
}

/// Tag of the next chunk, without consuming anything.
pub fn peek_tag(input: &[u8]) -> Option<FourCC> {
    chunk_tag(input).ok().map(|(_, tag)| tag)
}

/// Reads the 8 byte chunk header. Lengths are checked against `input`, which is the rest of the enclosing chunk (or
/// of the file), so a chunk can never claim bytes that belong to its parent's siblings.
pub fn open_chunk(input: &[u8], endianness: Endianness) -> Result<Chunk> {
    let (input, tag) = chunk_tag(input)?;
    let (input, length) = parse_i32(input, endianness)?;

    let size = match usize::try_from(length) {
        Ok(size) if size <= input.len() => size,
        _ => {
            return failure(B3dParseError::MalformedChunkLength {
                tag,
                length,
                available: input.len(),
            })
        }
    };

    let (end, body) = take(size)(input)?;
    Ok((end, Chunk { tag, body, end }))
}

/// Like `open_chunk` but the chunk must have the `expected` tag.
pub fn expect_chunk(input: &[u8], expected: FourCC, endianness: Endianness) -> Result<Chunk> {
    match peek_tag(input) {
        Some(tag) if tag == expected => open_chunk(input, endianness),
        _ => Err(nom::Err::Error(B3dParseError::from_error_kind(
            input,
            ErrorKind::Tag,
        ))),
    }
}

/// Jumps over a whole chunk using only its declared length.
pub fn skip_chunk(input: &[u8], endianness: Endianness) -> Result<FourCC> {
    let (input, chunk) = open_chunk(input, endianness)?;
    log::debug!("skipping {} chunk ({} bytes)", chunk.tag, chunk.len());
    Ok((input, chunk.tag))
}
