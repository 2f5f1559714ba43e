use crate::{
    parsers::{
        chunk::{expect_chunk, FourCC},
        collector::collect_within,
        failure,
        primitive::{cstring, parse_array, parse_f32, parse_i32, parse_into},
        B3dParseContext, B3dParseError, Result,
    },
    scene::{Brush, BrushTable, Texture},
};
use std::convert::TryFrom;

impl B3dParseContext {
    fn texture<'a>(&self, input: &'a [u8]) -> Result<'a, Texture> {
        let (input, file) = cstring(input)?;
        let (input, flags) = parse_i32(input, self.endianness)?;
        let (input, blend) = parse_i32(input, self.endianness)?;
        let (input, position) = parse_array(input, self.endianness)?;
        let (input, scale) = parse_array(input, self.endianness)?;
        let (input, rotation) = parse_f32(input, self.endianness)?;

        Ok((
            input,
            Texture {
                file,
                flags,
                blend,
                position,
                scale,
                rotation,
            },
        ))
    }

    /// `TEXS`: texture records back to back until the end of the chunk, there is no count.
    pub fn textures<'a>(&self, input: &'a [u8]) -> Result<'a, Vec<Texture>> {
        let (_, chunk) = expect_chunk(input, FourCC::TEXS, self.endianness)?;
        let (cursor, textures) = collect_within(&chunk, chunk.body, |i| self.texture(i))?;

        log::debug!("TEXS chunk: {} textures", textures.len());
        Ok((chunk.close(cursor), textures))
    }

    fn brush<'a>(&self, input: &'a [u8], textures_per_brush: usize) -> Result<'a, Brush> {
        let (input, name) = cstring(input)?;
        let (input, color) = parse_array(input, self.endianness)?;
        let (input, shininess) = parse_f32(input, self.endianness)?;
        let (input, blend) = parse_i32(input, self.endianness)?;
        let (input, fx) = parse_i32(input, self.endianness)?;

        let mut texture_ids = Vec::with_capacity(textures_per_brush.min(input.len() / 4));
        let (input, ()) = parse_into(input, textures_per_brush, self.endianness, &mut texture_ids)?;

        Ok((
            input,
            Brush {
                name,
                color,
                shininess,
                blend,
                fx,
                texture_ids,
            },
        ))
    }

    /// `BRUS`: the number of texture slots, shared by every brush, followed by the brush records.
    pub fn brushes<'a>(&self, input: &'a [u8]) -> Result<'a, BrushTable> {
        let (_, chunk) = expect_chunk(input, FourCC::BRUS, self.endianness)?;
        let (cursor, n_texs) = parse_i32(chunk.body, self.endianness)?;

        let textures_per_brush = match usize::try_from(n_texs) {
            Ok(n) => n,
            Err(_) => {
                return failure(B3dParseError::InvalidCount {
                    field: "textures per brush",
                    value: n_texs,
                })
            }
        };

        let (cursor, brushes) =
            collect_within(&chunk, cursor, |i| self.brush(i, textures_per_brush))?;

        log::debug!(
            "BRUS chunk: {} brushes with {} textures each",
            brushes.len(),
            textures_per_brush
        );
        Ok((
            chunk.close(cursor),
            BrushTable {
                textures_per_brush,
                brushes,
            },
        ))
    }
}
