use crate::{
    parsers::{
        chunk::{open_chunk, peek_tag, skip_chunk, FourCC},
        failure,
        primitive::parse_i32,
        B3dParseContext, B3dParseError, Result,
    },
    scene::{BrushTable, Scene},
};

/// How far into the fixed `TEXS`, `BRUS`, `NODE` sequence of the root chunk the decoder is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum RootStage {
    Start,
    Textures,
    Brushes,
    Node,
}

impl B3dParseContext {
    /// The whole file. Its first four bytes, `b"BB3D"`, are the tag of the root chunk.
    pub fn b3d<'a>(&self, input: &'a [u8]) -> Result<'a, Scene> {
        if peek_tag(input) != Some(FourCC::BB3D) {
            return failure(B3dParseError::NotAB3DFile);
        }

        let (input, scene) = self.root(input)?;
        if !input.is_empty() {
            log::debug!("ignoring {} bytes after the BB3D chunk", input.len());
        }

        Ok((input, scene))
    }

    /// `BB3D`: the format version, then the texture table, the brush table and the root node. Both tables are
    /// optional but the order is not, chunks the decoder doesn't know about can appear anywhere.
    fn root<'a>(&self, input: &'a [u8]) -> Result<'a, Scene> {
        let (_, chunk) = open_chunk(input, self.endianness)?;
        let (mut cursor, version) = parse_i32(chunk.body, self.endianness)?;

        let mut stage = RootStage::Start;
        let mut textures = Vec::new();
        let mut brushes = BrushTable::default();
        let mut root = None;

        while chunk.within(cursor) {
            let (rest, next_stage) = match peek_tag(cursor) {
                Some(FourCC::TEXS) if stage < RootStage::Textures => {
                    let (rest, t) = self.textures(cursor)?;
                    textures = t;
                    (rest, RootStage::Textures)
                }
                Some(FourCC::BRUS) if stage < RootStage::Brushes => {
                    let (rest, b) = self.brushes(cursor)?;
                    brushes = b;
                    (rest, RootStage::Brushes)
                }
                Some(FourCC::NODE) if stage < RootStage::Node => {
                    let (rest, node) = self.node(cursor, 0)?;
                    root = Some(node);
                    (rest, RootStage::Node)
                }
                Some(tag @ FourCC::TEXS) | Some(tag @ FourCC::BRUS) | Some(tag @ FourCC::NODE) => {
                    return failure(B3dParseError::UnexpectedChunkOrder { tag });
                }
                _ => (skip_chunk(cursor, self.endianness)?.0, stage),
            };
            cursor = rest;
            stage = next_stage;
        }

        let root = match root {
            Some(root) => root,
            None => return failure(B3dParseError::MissingRootNode),
        };

        log::debug!(
            "BB3D chunk: version {}, {} textures, {} brushes",
            version,
            textures.len(),
            brushes.len()
        );
        Ok((
            chunk.close(cursor),
            Scene {
                version,
                textures,
                brushes,
                root,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::test_util::Bytes;

    fn node(name: &str) -> Bytes {
        Bytes::new().chunk(
            b"NODE",
            Bytes::new()
                .string(name)
                .f32s(&[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0]),
        )
    }

    fn file(body: Bytes) -> Vec<u8> {
        Bytes::new().chunk(b"BB3D", Bytes::new().i32(1).raw(&body.build())).build()
    }

    fn decode(data: &[u8]) -> Result<Scene> {
        B3dParseContext::default().b3d(data)
    }

    #[test]
    fn tables_are_optional() {
        let bytes = file(node("Root"));
        let (rest, scene) = decode(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(scene.version(), 1);
        assert_eq!(scene.texture_count(), 0);
        assert_eq!(scene.brush_count(), 0);
        assert_eq!(scene.textures_per_brush(), 0);
        assert_eq!(scene.root().name(), "Root");
    }

    #[test]
    fn signature_is_checked_first() {
        for data in &[&b"XXXX\x00\x00\x00\x00"[..], &b"BB3"[..], &[][..]] {
            assert!(matches!(
                decode(data),
                Err(nom::Err::Failure(B3dParseError::NotAB3DFile))
            ));
        }
    }

    #[test]
    fn root_node_is_required() {
        let body = Bytes::new().chunk(b"TEXS", Bytes::new());
        assert!(matches!(
            decode(&file(body)),
            Err(nom::Err::Failure(B3dParseError::MissingRootNode))
        ));
    }

    #[test]
    fn tables_out_of_order() {
        let body = Bytes::new()
            .chunk(b"BRUS", Bytes::new().i32(0))
            .chunk(b"TEXS", Bytes::new())
            .raw(&node("Root").build());
        assert!(matches!(
            decode(&file(body)),
            Err(nom::Err::Failure(B3dParseError::UnexpectedChunkOrder { tag: FourCC::TEXS }))
        ));

        let body = node("Root").raw(&node("Second").build());
        assert!(matches!(
            decode(&file(body)),
            Err(nom::Err::Failure(B3dParseError::UnexpectedChunkOrder { tag: FourCC::NODE }))
        ));
    }

    #[test]
    fn unknown_chunks_around_the_tables() {
        let body = Bytes::new()
            .chunk(b"XTRA", Bytes::new().i32(9))
            .chunk(b"TEXS", Bytes::new())
            .chunk(b"XTRA", Bytes::new())
            .raw(&node("Root").build())
            .chunk(b"XTRA", Bytes::new().i32(9));
        let mut data = file(body);
        data.extend_from_slice(b"junk");

        let (rest, scene) = decode(&data).unwrap();
        assert_eq!(rest, b"junk");
        assert_eq!(scene.root().name(), "Root");
    }

    #[test]
    fn stray_bytes_in_the_root_chunk() {
        for stray in 1..4 {
            let body = node("Root").raw(&vec![0_u8; stray]);
            assert!(matches!(
                decode(&file(body)),
                Err(nom::Err::Error(B3dParseError::UnexpectedEndOfInput))
            ));
        }
    }

    #[test]
    fn root_chunk_longer_than_file() {
        let mut data = file(node("Root"));
        data.truncate(data.len() - 1);
        assert!(matches!(
            decode(&data),
            Err(nom::Err::Failure(B3dParseError::MalformedChunkLength { tag: FourCC::BB3D, .. }))
        ));
    }
}
