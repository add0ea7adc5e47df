//! Wavefront OBJ output.
//!
//! Meshes are written as polygon faces. Traced strands are written as closed
//! polylines, one `l` statement per strand, so they open directly in most
//! modelling tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::Result;
use crate::mesh::{to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use knotwork::io::obj;
/// use knotwork::mesh::{shapes, HalfEdgeMesh};
///
/// let mesh: HalfEdgeMesh = shapes::cube().unwrap();
/// obj::save(&mesh, "cube.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_mesh(mesh, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_mesh<I: MeshIndex, W: Write>(mesh: &HalfEdgeMesh<I>, writer: &mut W) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by knotwork")?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        write!(writer, "f")?;
        for i in f {
            // OBJ indices are 1-based
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Save closed polylines to an OBJ file.
///
/// Each polyline becomes an object `strand_<n>` whose `l` statement returns
/// to its first point. Empty polylines are skipped.
pub fn save_polylines<P: AsRef<Path>>(polylines: &[Vec<Point3<f64>>], path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_polylines(polylines, &mut writer)?;
    writer.flush()?;
    Ok(())
}

fn write_polylines<W: Write>(polylines: &[Vec<Point3<f64>>], writer: &mut W) -> Result<()> {
    writeln!(writer, "# Generated by knotwork")?;

    let mut base = 1;
    for (n, line) in polylines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        writeln!(writer, "o strand_{}", n)?;
        for p in line {
            writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
        }
        write!(writer, "l")?;
        for i in 0..line.len() {
            write!(writer, " {}", base + i)?;
        }
        writeln!(writer, " {}", base)?;
        base += line.len();
    }
    Ok(())
}
