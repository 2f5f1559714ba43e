#![allow(dead_code)]

/// Writes .b3d chunks by hand, little endian unless told otherwise.
pub struct Writer {
    data: Vec<u8>,
    big_endian: bool,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            big_endian: false,
        }
    }

    pub fn big_endian() -> Self {
        Self {
            data: Vec::new(),
            big_endian: true,
        }
    }

    fn sibling(&self) -> Self {
        Self {
            data: Vec::new(),
            big_endian: self.big_endian,
        }
    }

    pub fn i32(mut self, v: i32) -> Self {
        let bytes = if self.big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        };
        self.data.extend_from_slice(&bytes);
        self
    }

    pub fn i32s(self, values: &[i32]) -> Self {
        values.iter().fold(self, |w, &v| w.i32(v))
    }

    pub fn f32s(self, values: &[f32]) -> Self {
        values.iter().fold(self, |w, &v| w.i32(v.to_bits() as i32))
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

    /// Appends a chunk whose payload is written by `body`.
    pub fn chunk(self, tag: &[u8; 4], body: impl FnOnce(Writer) -> Writer) -> Self {
        let payload = body(self.sibling()).build();
        self.raw(tag).i32(payload.len() as i32).raw(&payload)
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }

    // Higher level helpers for the chunks the decoder understands.

    pub fn texture(self, file: &str, flags: i32, blend: i32) -> Self {
        self.string(file)
            .i32s(&[flags, blend])
            .f32s(&[0.0, 0.0, 1.0, 1.0, 0.0])
    }

    pub fn brush(self, name: &str, texture_ids: &[i32]) -> Self {
        self.string(name)
            .f32s(&[1.0, 1.0, 1.0, 1.0, 0.0])
            .i32s(&[1, 0])
            .i32s(texture_ids)
    }

    pub fn node_header(self, name: &str) -> Self {
        self.string(name)
            .f32s(&[0.0, 0.0, 0.0])
            .f32s(&[1.0, 1.0, 1.0])
            .f32s(&[1.0, 0.0, 0.0, 0.0])
    }

    /// A `VRTS` chunk with positions only, vertex `i` at `(i, 0, 0)`.
    pub fn plain_vertices(self, count: usize) -> Self {
        self.chunk(b"VRTS", |w| {
            (0..count).fold(w.i32s(&[0, 0, 0]), |w, i| w.f32s(&[i as f32, 0.0, 0.0]))
        })
    }

    pub fn triangles(self, brush: i32, indices: &[i32]) -> Self {
        self.chunk(b"TRIS", |w| w.i32(brush).i32s(indices))
    }

    /// A whole file: signature, version and whatever `body` writes inside the root chunk.
    pub fn file(version: i32, body: impl FnOnce(Writer) -> Writer) -> Vec<u8> {
        Writer::new()
            .chunk(b"BB3D", |w| body(w.i32(version)))
            .build()
    }
}
