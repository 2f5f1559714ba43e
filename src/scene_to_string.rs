use crate::scene::{Mesh, Node, Scene};
use std::fmt;

fn fmt_mesh(f: &mut fmt::Formatter, mesh: &Mesh, ident_str: &str) -> fmt::Result {
    let vertices = mesh.vertices();

    write!(
        f,
        "{}    MESH (brush:{}) {} vertices",
        ident_str,
        mesh.brush_id(),
        vertices.vertex_count()
    )?;
    if vertices.has_normals() {
        write!(f, " +normals")?;
    }
    if vertices.has_colors() {
        write!(f, " +colors")?;
    }
    writeln!(
        f,
        " +{}x{} texture coordinates",
        vertices.tex_coord_sets(),
        vertices.tex_coord_components()
    )?;

    for group in mesh.triangle_groups() {
        writeln!(
            f,
            "{}        TRIS (brush:{}) {} triangles",
            ident_str,
            mesh.resolved_brush_id(group),
            group.triangle_count()
        )?;
    }

    Ok(())
}

fn fmt_node(f: &mut fmt::Formatter, node: &Node, ident: usize) -> fmt::Result {
    let ident_str: String = std::iter::repeat(" ").take(4 * ident).collect();
    let t = node.transform();

    writeln!(
        f,
        "{}NODE \"{}\" pos:{:?} scale:{:?} rot:{:?}",
        ident_str,
        node.name(),
        t.position,
        t.scale,
        t.rotation
    )?;

    if let Some(mesh) = node.mesh() {
        fmt_mesh(f, mesh, &ident_str)?;
    }

    for child in node.children() {
        fmt_node(f, child, ident + 1)?;
    }

    Ok(())
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "BB3D version {}", self.version())?;

        writeln!(f, "TEXS {} textures", self.texture_count())?;
        for (i, texture) in self.textures().iter().enumerate() {
            writeln!(
                f,
                "    {}: \"{}\" flags:{} blend:{}",
                i,
                texture.file(),
                texture.flags(),
                texture.blend()
            )?;
        }

        writeln!(
            f,
            "BRUS {} brushes, {} textures each",
            self.brush_count(),
            self.textures_per_brush()
        )?;
        for (i, brush) in self.brushes().iter().enumerate() {
            writeln!(
                f,
                "    {}: \"{}\" color:{:?} textures:{:?}",
                i,
                brush.name(),
                brush.color(),
                brush.texture_ids()
            )?;
        }

        fmt_node(f, self.root(), 0)
    }
}
