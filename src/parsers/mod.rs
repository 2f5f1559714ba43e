pub mod b3d;
pub mod chunk;
pub mod collector;
pub mod material;
pub mod mesh;
pub mod node;
pub mod primitive;

#[cfg(test)]
pub(crate) mod test_util;

use chunk::FourCC;
use nom::{
    error::{ErrorKind, ParseError},
    IResult,
};
use std::io;
use thiserror::Error;

pub(crate) type Result<'a, T> = IResult<&'a [u8], T, B3dParseError>;

/// Byte order of every multi-byte number in a .b3d file. A single file never mixes the two.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Endianness {
    Little,
    Big,
}

impl Default for Endianness {
    /// Blitz3D itself only ever writes little endian files.
    fn default() -> Self {
        Endianness::Little
    }
}

/// Knobs for a single decode. The defaults read any file Blitz3D writes.
#[derive(Debug, Copy, Clone, Default)]
pub struct DecodeOptions {
    /// Byte order of the numeric fields.
    pub endianness: Endianness,
    /// Deepest allowed `NODE` nesting, the root node being depth 0. `None` means the nesting is only limited by the
    /// file itself, which is fine for trusted files but lets a hostile file exhaust the stack.
    pub max_depth: Option<usize>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = endianness;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Errors that can happen while decoding a .b3d file.
/// Every variant is fatal, a file either decodes completely or not at all.
#[derive(Debug, Error)]
pub enum B3dParseError {
    #[error("parser error ({kind:?})")]
    NomError {
        kind: ErrorKind,
        other: Option<Box<B3dParseError>>,
    },
    #[error("could not read b3d data: {0}")]
    IoError(#[from] io::Error),
    /// Returned when the data doesn't start with `b"BB3D"`.
    #[error("data does not start with the BB3D signature")]
    NotAB3DFile,
    /// A read needed more bytes than the file (or the enclosing chunk) had left. This includes a string whose
    /// null terminator is never found.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// A chunk declared a negative length or a length reaching past the end of its parent.
    #[error("chunk {tag} declares {length} bytes but only {available} are left in its parent")]
    MalformedChunkLength {
        tag: FourCC,
        length: i32,
        available: usize,
    },
    /// Returned when a `MESH` chunk doesn't start with its `VRTS` chunk.
    #[error("{parent} chunk has no {expected} chunk")]
    MissingRequiredSubchunk { parent: FourCC, expected: FourCC },
    #[error("BB3D chunk has no root NODE chunk")]
    MissingRootNode,
    /// The root chunk must list `TEXS`, `BRUS` and `NODE` in this order, each at most once.
    #[error("{tag} chunk appears out of order")]
    UnexpectedChunkOrder { tag: FourCC },
    /// A count field is negative, or larger than any .b3d writer produces.
    #[error("{field} is out of range, found {value}")]
    InvalidCount { field: &'static str, value: i32 },
    #[error("triangle index {index} is out of range for {vertex_count} vertices")]
    TriangleIndexOutOfRange { index: i32, vertex_count: usize },
    #[error("nodes are nested deeper than {max_depth} levels")]
    NodeDepthExceeded { max_depth: usize },
}

impl ParseError<&[u8]> for B3dParseError {
    fn from_error_kind(_input: &[u8], kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Eof => B3dParseError::UnexpectedEndOfInput,
            kind => B3dParseError::NomError { kind, other: None },
        }
    }

    fn append(_input: &[u8], kind: ErrorKind, other: Self) -> Self {
        match other {
            B3dParseError::NomError { .. } => B3dParseError::NomError {
                kind,
                other: Some(Box::new(other)),
            },
            other => other,
        }
    }
}

/// Shared state of every chunk decoder. The `impl` blocks live next to the chunks they decode.
#[derive(Debug, Clone, Copy)]
pub struct B3dParseContext {
    endianness: Endianness,
    max_depth: Option<usize>,
}

impl B3dParseContext {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            endianness: options.endianness,
            max_depth: options.max_depth,
        }
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }
}

impl Default for B3dParseContext {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}

pub(crate) fn failure<T>(error: B3dParseError) -> Result<'static, T> {
    Err(nom::Err::Failure(error))
}
