use crate::{
    parsers::{
        chunk::{expect_chunk, peek_tag, skip_chunk, FourCC},
        collector::{collect_within, RecordCollector},
        failure,
        primitive::{parse_array, parse_i32, parse_into},
        B3dParseContext, B3dParseError, Result,
    },
    scene::{Mesh, TriangleGroup, Vertex, VertexBlock, VERTEX_COLORS, VERTEX_NORMALS},
};
use std::convert::TryFrom;

/// Shape shared by every vertex of a `VRTS` chunk.
#[derive(Debug, Clone, Copy)]
struct VertexLayout {
    flags: i32,
    tex_coord_sets: usize,
    tex_coord_components: usize,
}

/// Blitz3D supports up to 8 texture coordinate sets of at most 4 components each.
const MAX_TEX_COORD_SETS: usize = 8;
const MAX_TEX_COORD_COMPONENTS: usize = 4;

fn count(value: i32, max: usize, field: &'static str) -> std::result::Result<usize, B3dParseError> {
    match usize::try_from(value) {
        Ok(n) if n <= max => Ok(n),
        _ => Err(B3dParseError::InvalidCount { field, value }),
    }
}

impl B3dParseContext {
    fn vertex_layout<'a>(&self, input: &'a [u8]) -> Result<'a, VertexLayout> {
        let (input, flags) = parse_i32(input, self.endianness)?;
        let (input, sets) = parse_i32(input, self.endianness)?;
        let (input, components) = parse_i32(input, self.endianness)?;

        let tex_coord_sets = count(sets, MAX_TEX_COORD_SETS, "texture coordinate sets")
            .map_err(nom::Err::Failure)?;
        let tex_coord_components = count(
            components,
            MAX_TEX_COORD_COMPONENTS,
            "texture coordinate components",
        )
        .map_err(nom::Err::Failure)?;

        Ok((
            input,
            VertexLayout {
                flags,
                tex_coord_sets,
                tex_coord_components,
            },
        ))
    }

    fn vertex<'a>(&self, input: &'a [u8], layout: &VertexLayout) -> Result<'a, Vertex> {
        let (mut input, position) = parse_array(input, self.endianness)?;

        let mut normal = None;
        if layout.flags & VERTEX_NORMALS != 0 {
            let (rest, n) = parse_array(input, self.endianness)?;
            normal = Some(n);
            input = rest;
        }

        let mut color = None;
        if layout.flags & VERTEX_COLORS != 0 {
            let (rest, c) = parse_array(input, self.endianness)?;
            color = Some(c);
            input = rest;
        }

        let len = layout.tex_coord_sets * layout.tex_coord_components;
        let mut tex_coords = Vec::with_capacity(len);
        let (input, ()) = parse_into(input, len, self.endianness, &mut tex_coords)?;

        Ok((
            input,
            Vertex {
                position,
                normal,
                color,
                tex_coords,
            },
        ))
    }

    /// `VRTS`: the attribute layout followed by the vertices until the end of the chunk.
    pub fn vertices<'a>(&self, input: &'a [u8]) -> Result<'a, VertexBlock> {
        let (_, chunk) = expect_chunk(input, FourCC::VRTS, self.endianness)?;
        let (cursor, layout) = self.vertex_layout(chunk.body)?;
        let (cursor, vertices) = collect_within(&chunk, cursor, |i| self.vertex(i, &layout))?;

        log::debug!(
            "VRTS chunk: {} vertices, flags {}, {} sets of {} texture coordinates",
            vertices.len(),
            layout.flags,
            layout.tex_coord_sets,
            layout.tex_coord_components
        );

        let block = VertexBlock::from_vertices(
            layout.flags,
            layout.tex_coord_sets,
            layout.tex_coord_components,
            vertices,
        );
        Ok((chunk.close(cursor), block))
    }

    /// `TRIS`: a brush followed by index triples. Every index must address one of the `vertex_count` vertices of the
    /// mesh.
    pub fn triangles<'a>(&self, input: &'a [u8], vertex_count: usize) -> Result<'a, TriangleGroup> {
        let (_, chunk) = expect_chunk(input, FourCC::TRIS, self.endianness)?;
        let (cursor, brush_id) = parse_i32(chunk.body, self.endianness)?;
        let (cursor, triangles) = collect_within(&chunk, cursor, |i| {
            parse_array::<i32, 3>(i, self.endianness)
        })?;

        let mut indices = Vec::with_capacity(triangles.len() * 3);
        for &index in triangles.iter().flatten() {
            match u32::try_from(index) {
                Ok(i) if (i as usize) < vertex_count => indices.push(i),
                _ => {
                    return failure(B3dParseError::TriangleIndexOutOfRange {
                        index,
                        vertex_count,
                    })
                }
            }
        }

        log::debug!(
            "TRIS chunk: {} triangles, brush {}",
            triangles.len(),
            brush_id
        );
        Ok((chunk.close(cursor), TriangleGroup { brush_id, indices }))
    }

    /// `MESH`: a brush, the mandatory `VRTS` chunk and then any number of `TRIS` chunks. Other chunks are skipped.
    pub fn mesh<'a>(&self, input: &'a [u8]) -> Result<'a, Mesh> {
        let (_, chunk) = expect_chunk(input, FourCC::MESH, self.endianness)?;
        let (cursor, brush_id) = parse_i32(chunk.body, self.endianness)?;

        if peek_tag(cursor) != Some(FourCC::VRTS) {
            return failure(B3dParseError::MissingRequiredSubchunk {
                parent: FourCC::MESH,
                expected: FourCC::VRTS,
            });
        }
        let (mut cursor, vertices) = self.vertices(cursor)?;

        let mut triangle_groups = RecordCollector::new();
        while chunk.within(cursor) {
            cursor = match peek_tag(cursor) {
                Some(FourCC::TRIS) => {
                    let (rest, group) = self.triangles(cursor, vertices.vertex_count())?;
                    triangle_groups.append(group);
                    rest
                }
                _ => skip_chunk(cursor, self.endianness)?.0,
            };
        }

        log::debug!(
            "MESH chunk: brush {}, {} triangle groups",
            brush_id,
            triangle_groups.len()
        );
        Ok((
            chunk.close(cursor),
            Mesh {
                brush_id,
                vertices,
                triangle_groups: triangle_groups.finalize(),
            },
        ))
    }
}
