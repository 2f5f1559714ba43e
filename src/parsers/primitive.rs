use super::{Endianness, Result};
use nom::{
    bytes::complete::{take, take_while},
    number::complete::{be_f32, be_i32, be_u32, le_f32, le_i32, le_u32},
};

/// Fixed size values stored in a .b3d file. Every number in the format is 4 bytes wide.
pub(crate) trait B3dPrimitive: Sized + Copy + Default {
    fn parse(input: &[u8], endianness: Endianness) -> Result<Self>;
}

impl B3dPrimitive for i32 {
    fn parse(input: &[u8], endianness: Endianness) -> Result<Self> {
        parse_i32(input, endianness)
    }
}

impl B3dPrimitive for u32 {
    fn parse(input: &[u8], endianness: Endianness) -> Result<Self> {
        parse_u32(input, endianness)
    }
}

impl B3dPrimitive for f32 {
    fn parse(input: &[u8], endianness: Endianness) -> Result<Self> {
        parse_f32(input, endianness)
    }
}

pub fn parse_i32(input: &[u8], endianness: Endianness) -> Result<i32> {
    match endianness {
        Endianness::Little => le_i32(input),
        Endianness::Big => be_i32(input),
    }
}

pub fn parse_u32(input: &[u8], endianness: Endianness) -> Result<u32> {
    match endianness {
        Endianness::Little => le_u32(input),
        Endianness::Big => be_u32(input),
    }
}

/// Floats are stored as the raw IEEE-754 bit pattern of a 32 bit integer.
pub fn parse_f32(input: &[u8], endianness: Endianness) -> Result<f32> {
    match endianness {
        Endianness::Little => le_f32(input),
        Endianness::Big => be_f32(input),
    }
}

/// Reads `N` consecutive values, used for vectors, colors and quaternions.
pub(crate) fn parse_array<T: B3dPrimitive, const N: usize>(
    mut input: &[u8],
    endianness: Endianness,
) -> Result<[T; N]> {
    let mut values = [T::default(); N];
    for value in values.iter_mut() {
        let (rest, v) = T::parse(input, endianness)?;
        *value = v;
        input = rest;
    }
    Ok((input, values))
}

/// Reads `len` consecutive values into `out`.
pub(crate) fn parse_into<'a, T: B3dPrimitive>(
    mut input: &'a [u8],
    len: usize,
    endianness: Endianness,
    out: &mut Vec<T>,
) -> Result<'a, ()> {
    for _ in 0..len {
        let (rest, v) = T::parse(input, endianness)?;
        out.push(v);
        input = rest;
    }
    Ok((input, ()))
}

/// Null terminated string. The terminator is consumed but not returned and a missing terminator is an error, not
/// the end of the string.
pub fn cstring(input: &[u8]) -> Result<String> {
    let (input, bytes) = take_while(|b: u8| b != 0)(input)?;
    let (input, _) = take(1_usize)(input)?;
    Ok((input, String::from_utf8_lossy(bytes).into_owned()))
}
