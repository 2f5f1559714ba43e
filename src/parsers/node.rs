use crate::{
    parsers::{
        chunk::{expect_chunk, peek_tag, skip_chunk, FourCC},
        collector::RecordCollector,
        failure,
        primitive::{cstring, parse_array},
        B3dParseContext, B3dParseError, Result,
    },
    scene::{Node, Transform},
};

impl B3dParseContext {
    fn transform<'a>(&self, input: &'a [u8]) -> Result<'a, Transform> {
        let (input, position) = parse_array(input, self.endianness)?;
        let (input, scale) = parse_array(input, self.endianness)?;
        let (input, rotation) = parse_array(input, self.endianness)?;

        Ok((
            input,
            Transform {
                position,
                scale,
                rotation,
            },
        ))
    }

    /// `NODE`: name and transform, followed by child `NODE`s and at most one `MESH` in any order. `depth` is 0 for
    /// the root node.
    pub fn node<'a>(&self, input: &'a [u8], depth: usize) -> Result<'a, Node> {
        if let Some(max_depth) = self.max_depth {
            if depth > max_depth {
                return failure(B3dParseError::NodeDepthExceeded { max_depth });
            }
        }

        let (_, chunk) = expect_chunk(input, FourCC::NODE, self.endianness)?;
        let (cursor, name) = cstring(chunk.body)?;
        let (mut cursor, transform) = self.transform(cursor)?;

        let mut mesh = None;
        let mut children = RecordCollector::new();
        while chunk.within(cursor) {
            cursor = match peek_tag(cursor) {
                Some(FourCC::NODE) => {
                    let (rest, child) = self.node(cursor, depth + 1)?;
                    children.append(child);
                    rest
                }
                Some(FourCC::MESH) => {
                    let (rest, m) = self.mesh(cursor)?;
                    if mesh.replace(m).is_some() {
                        log::debug!("NODE \"{}\": replacing previous MESH chunk", name);
                    }
                    rest
                }
                _ => skip_chunk(cursor, self.endianness)?.0,
            };
        }

        log::debug!(
            "NODE chunk \"{}\": {} children, {}",
            name,
            children.len(),
            if mesh.is_some() { "with mesh" } else { "no mesh" }
        );
        Ok((
            chunk.close(cursor),
            Node {
                name,
                transform,
                mesh,
                children: children.finalize(),
            },
        ))
    }
}
