//! # B3D - A crate for decoding Blitz3D .b3d files
//!
//! ## Example
//!
//! ```ignore
//! use b3d::Scene;
//!
//! /// Prints the name and position of every node
//! fn main() {
//!     let scene = Scene::from_path("file.b3d").expect("could not decode file.b3d");
//!
//!     for node in scene.nodes() {
//!         println!("\"{}\" at {:?}", node.name(), node.position());
//!     }
//! }
//! ```
//!
//! ## The .b3d file
//!
//! A .b3d file is a tree of chunks. Every chunk starts with a four character tag and the length of its payload, and
//! the payload is a few fixed fields followed by any number of records or child chunks. The file itself is a single
//! `BB3D` chunk, which is why every .b3d file starts with the bytes `"BB3D"`. A simplified view of a file with a
//! single textured mesh (lengths omitted):
//!
//! ```ignore
//! BB3D {
//!     version: i32 = 1,
//!     TEXS { texture, texture, ... },
//!     BRUS { textures_per_brush: i32, brush, brush, ... },
//!     NODE {
//!         name: "Root", position, scale, rotation,
//!         MESH {
//!             brush_id: i32,
//!             VRTS { flags, tex_coord_sets, tex_coord_components, vertex, vertex, ... },
//!             TRIS { brush_id, [i32; 3], [i32; 3], ... },
//!             TRIS { ... },
//!         },
//!         NODE { ... },
//!     },
//! }
//! ```
//!
//! Records have no count, a chunk simply ends when its declared length has been read. Chunks this crate doesn't
//! understand (`ANIM`, `BONE`, `KEYS` and anything newer) are skipped using their length alone.
//!
//! ## This crate
//!
//! Decoding is done in one go: `decode` either returns the whole `Scene` or the first error it found, nothing is
//! read lazily and no partially decoded scene is ever returned. The `Scene` owns every node, mesh, texture and brush
//! and can be shared between threads once decoded.
//!
//! Vertices are stored attribute by attribute (all positions, all normals, all colors, one array per texture
//! coordinate set) and triangles as flat index arrays, so they can be uploaded to a GPU without further work.
//! Textures are only names, loading images and resolving their paths is left to the caller.
//!
//! ### Brushes
//!
//! A triangle group whose brush is `INHERIT_BRUSH` (`-1`) uses the brush of its mesh. `Mesh::resolved_brush_id` and
//! `Scene::brush_for_group` take care of that. Brushes list their textures in slots; what each slot is used for is
//! decided by the exporter and this crate keeps the slots exactly as they are stored.
//!
//! ### Logging
//!
//! Chunks are reported through the `log` crate at `debug` level, skipped chunks included. Install any logger to see
//! them, the `print_scene` demo uses `env_logger`.
//!
//! ### Warnings
//!
//! Node nesting is only limited by the file. A crafted file can nest nodes deep enough to overflow the stack, use
//! `DecodeOptions::max_depth` when reading untrusted files.
//!
//! ### Limitations
//!
//! This crate does not write .b3d files, and animation data (`ANIM`, `BONE`, `KEYS`) is skipped.

pub mod parsers;
pub mod scene;
mod scene_to_string;

pub use parsers::{B3dParseError, DecodeOptions, Endianness};
pub use scene::{
    decode, decode_with, Brush, BrushTable, Mesh, Node, Scene, Texture, Transform, TriangleGroup,
    VertexBlock, INHERIT_BRUSH,
};
