use crate::parsers::{B3dParseContext, B3dParseError, DecodeOptions};
use std::{convert::TryFrom, io::Read, path::Path, result::Result as StdResult};

/// Value of `TriangleGroup::brush_id` (and `Mesh::brush_id`) meaning "no brush of my own".
pub const INHERIT_BRUSH: i32 = -1;

/// Bit of `VertexBlock::flags` set when every vertex has a normal.
pub const VERTEX_NORMALS: i32 = 1;
/// Bit of `VertexBlock::flags` set when every vertex has an RGBA color.
pub const VERTEX_COLORS: i32 = 2;

/// An entry of the texture table. Only the file name is stored, loading the image is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    pub(crate) file: String,
    pub(crate) flags: i32,
    pub(crate) blend: i32,
    pub(crate) position: [f32; 2],
    pub(crate) scale: [f32; 2],
    pub(crate) rotation: f32,
}

impl Texture {
    /// File name as written by the exporter, usually relative to the .b3d file.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn blend(&self) -> i32 {
        self.blend
    }

    pub fn position(&self) -> [f32; 2] {
        self.position
    }

    pub fn scale(&self) -> [f32; 2] {
        self.scale
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }
}

/// A surface material. Every brush of a file has the same number of texture slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub(crate) name: String,
    pub(crate) color: [f32; 4],
    pub(crate) shininess: f32,
    pub(crate) blend: i32,
    pub(crate) fx: i32,
    pub(crate) texture_ids: Vec<i32>,
}

impl Brush {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// RGBA, usually but not necessarily in `0.0..=1.0`.
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    pub fn shininess(&self) -> f32 {
        self.shininess
    }

    pub fn blend(&self) -> i32 {
        self.blend
    }

    pub fn fx(&self) -> i32 {
        self.fx
    }

    /// Texture table indices, one per slot. Unused slots are usually `-1`. What each slot means is up to the
    /// exporter, no ordering is assumed here.
    pub fn texture_ids(&self) -> &[i32] {
        &self.texture_ids
    }

    pub fn texture_id(&self, slot: usize) -> Option<i32> {
        self.texture_ids.get(slot).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrushTable {
    pub(crate) textures_per_brush: usize,
    pub(crate) brushes: Vec<Brush>,
}

impl BrushTable {
    /// Length of `Brush::texture_ids` for every brush in the table.
    pub fn textures_per_brush(&self) -> usize {
        self.textures_per_brush
    }

    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Brush> {
        self.brushes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Brush> {
        self.brushes.iter()
    }

    pub fn as_slice(&self) -> &[Brush] {
        &self.brushes
    }
}

/// One vertex as it is laid out in the file, before `VertexBlock` splits the attributes apart.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: Option<[f32; 3]>,
    pub color: Option<[f32; 4]>,
    /// `tex_coord_sets * tex_coord_components` values, set by set.
    pub tex_coords: Vec<f32>,
}

/// The vertices of a mesh, stored attribute by attribute so they can be handed to a renderer as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBlock {
    pub(crate) flags: i32,
    pub(crate) tex_coord_sets: usize,
    pub(crate) tex_coord_components: usize,
    pub(crate) vertex_count: usize,
    pub(crate) positions: Vec<f32>,
    pub(crate) normals: Option<Vec<f32>>,
    pub(crate) colors: Option<Vec<f32>>,
    pub(crate) tex_coords: Vec<Vec<f32>>,
}

impl VertexBlock {
    /// Every vertex in `vertices` must have the shape described by `flags`, `tex_coord_sets` and
    /// `tex_coord_components`.
    pub(crate) fn from_vertices(
        flags: i32,
        tex_coord_sets: usize,
        tex_coord_components: usize,
        vertices: Vec<Vertex>,
    ) -> Self {
        let vertex_count = vertices.len();
        let with_normals = flags & VERTEX_NORMALS != 0;
        let with_colors = flags & VERTEX_COLORS != 0;

        let mut positions = Vec::with_capacity(vertex_count * 3);
        let mut normals = Vec::with_capacity(if with_normals { vertex_count * 3 } else { 0 });
        let mut colors = Vec::with_capacity(if with_colors { vertex_count * 4 } else { 0 });
        let mut tex_coords: Vec<Vec<f32>> = (0..tex_coord_sets)
            .map(|_| Vec::with_capacity(vertex_count * tex_coord_components))
            .collect();

        for vertex in vertices {
            positions.extend_from_slice(&vertex.position);
            if let Some(normal) = vertex.normal {
                normals.extend_from_slice(&normal);
            }
            if let Some(color) = vertex.color {
                colors.extend_from_slice(&color);
            }
            if tex_coord_components > 0 {
                for (set, values) in tex_coords
                    .iter_mut()
                    .zip(vertex.tex_coords.chunks(tex_coord_components))
                {
                    set.extend_from_slice(values);
                }
            }
        }

        Self {
            flags,
            tex_coord_sets,
            tex_coord_components,
            vertex_count,
            positions,
            normals: if with_normals { Some(normals) } else { None },
            colors: if with_colors { Some(colors) } else { None },
            tex_coords,
        }
    }

    /// The raw attribute bitmask, see `VERTEX_NORMALS` and `VERTEX_COLORS`.
    pub fn flags(&self) -> i32 {
        self.flags
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// `x, y, z` for every vertex.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn position(&self, vertex: usize) -> Option<[f32; 3]> {
        if vertex >= self.vertex_count {
            return None;
        }
        let p = self.positions.get(vertex * 3..vertex * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }

    /// `nx, ny, nz` for every vertex.
    pub fn normals(&self) -> Option<&[f32]> {
        self.normals.as_deref()
    }

    /// `r, g, b, a` for every vertex.
    pub fn colors(&self) -> Option<&[f32]> {
        self.colors.as_deref()
    }

    pub fn tex_coord_sets(&self) -> usize {
        self.tex_coord_sets
    }

    /// Number of values in one texture coordinate, usually 2.
    pub fn tex_coord_components(&self) -> usize {
        self.tex_coord_components
    }

    /// `tex_coord_components` values for every vertex.
    pub fn tex_coords(&self, set: usize) -> Option<&[f32]> {
        self.tex_coords.get(set).map(Vec::as_slice)
    }

    pub fn tex_coord(&self, set: usize, vertex: usize) -> Option<&[f32]> {
        if vertex >= self.vertex_count {
            return None;
        }
        let size = self.tex_coord_components;
        self.tex_coords(set)?.get(vertex * size..vertex * size + size)
    }
}

/// A batch of triangles sharing a brush.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGroup {
    pub(crate) brush_id: i32,
    pub(crate) indices: Vec<u32>,
}

impl TriangleGroup {
    /// The brush as written in the file, `INHERIT_BRUSH` included.
    pub fn brush_id(&self) -> i32 {
        self.brush_id
    }

    pub fn inherits_brush(&self) -> bool {
        self.brush_id == INHERIT_BRUSH
    }

    /// The brush to draw this group with given the brush of the mesh that owns it.
    pub fn resolve_brush_id(&self, mesh_brush_id: i32) -> i32 {
        if self.inherits_brush() {
            mesh_brush_id
        } else {
            self.brush_id
        }
    }

    /// Three vertex indices per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub(crate) brush_id: i32,
    pub(crate) vertices: VertexBlock,
    pub(crate) triangle_groups: Vec<TriangleGroup>,
}

impl Mesh {
    pub fn brush_id(&self) -> i32 {
        self.brush_id
    }

    pub fn vertices(&self) -> &VertexBlock {
        &self.vertices
    }

    pub fn triangle_groups(&self) -> &[TriangleGroup] {
        &self.triangle_groups
    }

    pub fn resolved_brush_id(&self, group: &TriangleGroup) -> i32 {
        group.resolve_brush_id(self.brush_id)
    }
}

/// Local transform of a node. The rotation is kept exactly as stored, no component order is assumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) mesh: Option<Mesh>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> [f32; 3] {
        self.transform.position
    }

    pub fn scale(&self) -> [f32; 3] {
        self.transform.scale
    }

    pub fn rotation(&self) -> [f32; 4] {
        self.transform.rotation
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// This node and all of its descendants, parents before children and siblings in file order.
    pub fn descendants(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }
}

/// Depth-first iterator over a node tree, see `Node::descendants`.
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A decoded .b3d file.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub(crate) version: i32,
    pub(crate) textures: Vec<Texture>,
    pub(crate) brushes: BrushTable,
    pub(crate) root: Node,
}

impl Scene {
    /// Returns a new `Scene` from `data`.
    pub fn from_data<T: Read>(mut data: T) -> StdResult<Self, B3dParseError> {
        let mut buffer = Vec::new();
        data.read_to_end(&mut buffer)
            .map_err(B3dParseError::IoError)?;

        decode(&buffer)
    }

    /// Returns a new `Scene` from a path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> StdResult<Self, B3dParseError> {
        use std::fs::File;

        let file = File::open(path).map_err(B3dParseError::IoError)?;
        Scene::from_data(file)
    }

    /// Format version stored in the root chunk, Blitz3D writes `1`.
    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn texture(&self, index: usize) -> Option<&Texture> {
        self.textures.get(index)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn brushes(&self) -> &BrushTable {
        &self.brushes
    }

    pub fn brush(&self, index: usize) -> Option<&Brush> {
        self.brushes.get(index)
    }

    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    pub fn textures_per_brush(&self) -> usize {
        self.brushes.textures_per_brush()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Every node of the scene, root first.
    pub fn nodes(&self) -> Nodes<'_> {
        self.root.descendants()
    }

    /// The brush a triangle group of `mesh` is drawn with, after resolving `INHERIT_BRUSH`. `None` when the group
    /// has no brush at all or references a brush the table doesn't have.
    pub fn brush_for_group(&self, mesh: &Mesh, group: &TriangleGroup) -> Option<&Brush> {
        let id = usize::try_from(mesh.resolved_brush_id(group)).ok()?;
        self.brush(id)
    }

    /// The texture in `slot` of `brush`, `None` for empty slots and dangling indices.
    pub fn texture_for_slot(&self, brush: &Brush, slot: usize) -> Option<&Texture> {
        let id = usize::try_from(brush.texture_id(slot)?).ok()?;
        self.texture(id)
    }
}

/// Decodes a little endian .b3d file held in memory.
pub fn decode(data: &[u8]) -> StdResult<Scene, B3dParseError> {
    decode_with(data, DecodeOptions::default())
}

pub fn decode_with(data: &[u8], options: DecodeOptions) -> StdResult<Scene, B3dParseError> {
    let ctx = B3dParseContext::new(options);

    match ctx.b3d(data) {
        Ok((_, scene)) => Ok(scene),
        Err(nom::Err::Failure(e)) | Err(nom::Err::Error(e)) => Err(e),
        Err(nom::Err::Incomplete(..)) => Err(B3dParseError::UnexpectedEndOfInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: f32, normal: bool, color: bool, tex_coords: Vec<f32>) -> Vertex {
        Vertex {
            position: [x, x + 1.0, x + 2.0],
            normal: if normal { Some([0.0, 1.0, 0.0]) } else { None },
            color: if color { Some([1.0, 0.5, 0.25, 1.0]) } else { None },
            tex_coords,
        }
    }

    fn leaf(name: &str, children: Vec<Node>) -> Node {
        Node {
            name: name.to_owned(),
            transform: Transform {
                position: [0.0; 3],
                scale: [1.0; 3],
                rotation: [1.0, 0.0, 0.0, 0.0],
            },
            mesh: None,
            children,
        }
    }

    #[test]
    fn vertices_are_split_by_attribute() {
        let block = VertexBlock::from_vertices(
            VERTEX_NORMALS,
            2,
            2,
            vec![
                vertex(0.0, true, false, vec![0.0, 0.1, 0.2, 0.3]),
                vertex(10.0, true, false, vec![1.0, 1.1, 1.2, 1.3]),
            ],
        );

        assert_eq!(block.vertex_count(), 2);
        assert_eq!(block.positions(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
        assert_eq!(block.position(1), Some([10.0, 11.0, 12.0]));
        assert_eq!(block.position(2), None);
        assert_eq!(block.normals(), Some(&[0.0, 1.0, 0.0, 0.0, 1.0, 0.0][..]));
        assert!(!block.has_colors());
        assert_eq!(block.tex_coords(0), Some(&[0.0, 0.1, 1.0, 1.1][..]));
        assert_eq!(block.tex_coords(1), Some(&[0.2, 0.3, 1.2, 1.3][..]));
        assert_eq!(block.tex_coord(1, 1), Some(&[1.2, 1.3][..]));
        assert_eq!(block.tex_coords(2), None);
    }

    #[test]
    fn colors_without_normals() {
        let block = VertexBlock::from_vertices(
            VERTEX_COLORS,
            0,
            2,
            vec![vertex(0.0, false, true, vec![])],
        );
        assert!(!block.has_normals());
        assert_eq!(block.colors(), Some(&[1.0, 0.5, 0.25, 1.0][..]));
        assert_eq!(block.tex_coord_sets(), 0);
        assert_eq!(block.tex_coords(0), None);
    }

    #[test]
    fn huge_vertex_indices_are_none() {
        let block = VertexBlock::from_vertices(
            0,
            1,
            2,
            vec![vertex(0.0, false, false, vec![0.5, 0.5])],
        );
        assert_eq!(block.position(usize::MAX), None);
        assert_eq!(block.position(usize::MAX / 3), None);
        assert_eq!(block.tex_coord(0, usize::MAX), None);
        assert_eq!(block.tex_coord(0, usize::MAX / 2), None);
        assert_eq!(block.tex_coord(0, 0), Some(&[0.5, 0.5][..]));
    }

    #[test]
    fn zero_component_sets_are_empty() {
        let block = VertexBlock::from_vertices(0, 3, 0, vec![vertex(0.0, false, false, vec![])]);
        assert_eq!(block.tex_coord_sets(), 3);
        assert_eq!(block.tex_coords(2), Some(&[][..]));
        assert_eq!(block.tex_coord(2, 0), Some(&[][..]));
    }

    #[test]
    fn sentinel_brush_falls_back_to_mesh() {
        let group = TriangleGroup {
            brush_id: INHERIT_BRUSH,
            indices: vec![0, 1, 2, 2, 1, 0],
        };
        assert!(group.inherits_brush());
        assert_eq!(group.resolve_brush_id(7), 7);
        assert_eq!(group.triangle_count(), 2);
        assert_eq!(
            group.triangles().collect::<Vec<_>>(),
            vec![[0, 1, 2], [2, 1, 0]]
        );

        let own = TriangleGroup {
            brush_id: 3,
            indices: vec![],
        };
        assert_eq!(own.resolve_brush_id(7), 3);
    }

    #[test]
    fn nodes_are_visited_depth_first() {
        let root = leaf(
            "root",
            vec![
                leaf("a", vec![leaf("a1", vec![]), leaf("a2", vec![])]),
                leaf("b", vec![]),
            ],
        );
        let names: Vec<_> = root.descendants().map(Node::name).collect();
        assert_eq!(names, vec!["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn lookups_are_bounds_checked() {
        let brush = Brush {
            name: "b".to_owned(),
            color: [1.0; 4],
            shininess: 0.0,
            blend: 1,
            fx: 0,
            texture_ids: vec![0, -1, 5],
        };
        let mesh = Mesh {
            brush_id: 0,
            vertices: VertexBlock::from_vertices(0, 0, 0, vec![]),
            triangle_groups: vec![],
        };
        let scene = Scene {
            version: 1,
            textures: vec![Texture {
                file: "t.png".to_owned(),
                flags: 1,
                blend: 2,
                position: [0.0; 2],
                scale: [1.0; 2],
                rotation: 0.0,
            }],
            brushes: BrushTable {
                textures_per_brush: 3,
                brushes: vec![brush.clone()],
            },
            root: leaf("root", vec![]),
        };

        assert_eq!(scene.texture_for_slot(&brush, 0).map(Texture::file), Some("t.png"));
        assert!(scene.texture_for_slot(&brush, 1).is_none());
        assert!(scene.texture_for_slot(&brush, 2).is_none());
        assert!(scene.texture_for_slot(&brush, 3).is_none());

        let inherit = TriangleGroup {
            brush_id: INHERIT_BRUSH,
            indices: vec![],
        };
        let dangling = TriangleGroup {
            brush_id: 4,
            indices: vec![],
        };
        assert_eq!(scene.brush_for_group(&mesh, &inherit).map(Brush::name), Some("b"));
        assert!(scene.brush_for_group(&mesh, &dangling).is_none());
    }
}
