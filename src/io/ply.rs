//! PLY (Stanford polygon) format support.
//!
//! Faces are read as polygons and kept as they are; a quad file gives a quad
//! mesh. Saving writes ASCII PLY with double-precision coordinates.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::error::{Result, WeaveError};
use crate::mesh::{build_from_polygons, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Load a polygon mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use knotwork::io::ply;
/// use knotwork::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: &str| WeaveError::LoadError {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(&e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let x = get_float_property(vertex, "x")
            .ok_or_else(|| load_error("vertex missing x coordinate"))?;
        let y = get_float_property(vertex, "y")
            .ok_or_else(|| load_error("vertex missing y coordinate"))?;
        let z = get_float_property(vertex, "z")
            .ok_or_else(|| load_error("vertex missing z coordinate"))?;
        vertices.push(Point3::new(x, y, z));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error("PLY file has no face element"))?;

    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error("face missing vertex_indices property"))?;
        faces.push(indices);
    }

    log::debug!(
        "read {}: {} vertices, {} faces",
        path.display(),
        vertices.len(),
        faces.len()
    );

    build_from_polygons(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

// Negative indices map to usize::MAX so the builder reports them as invalid
fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    fn signed(x: i64) -> usize {
        usize::try_from(x).unwrap_or(usize::MAX)
    }

    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| signed(x as i64)).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| signed(x as i64)).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| signed(x as i64)).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh to a PLY file (ASCII format).
///
/// Faces with more than 255 corners cannot be written with a `uchar` count
/// and are rejected with [`WeaveError::SaveError`].
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let (vertices, faces) = to_face_vertex(mesh);

    if let Some(face) = faces.iter().find(|f| f.len() > u8::MAX as usize) {
        return Err(WeaveError::SaveError {
            path: path.to_path_buf(),
            message: format!("face with {} corners exceeds the PLY list limit", face.len()),
        });
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by knotwork")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    writeln!(writer, "element face {}", faces.len())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    for v in &vertices {
        writeln!(writer, "{} {} {}", v.x, v.y, v.z)?;
    }

    for f in &faces {
        write!(writer, "{}", f.len())?;
        for i in f {
            write!(writer, " {}", i)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("knotwork-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_quads_survive_save_and_load() {
        let cube: HalfEdgeMesh = shapes::cube().unwrap();
        let path = scratch("cube.ply");
        save(&cube, &path).unwrap();

        let loaded: HalfEdgeMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.num_vertices(), 8);
        assert_eq!(loaded.num_faces(), 6);
        assert_eq!(loaded.num_edges(), 12);
        assert!(loaded.face_ids().all(|f| loaded.face_degree(f) == 4));
        for v in cube.vertex_ids() {
            assert_eq!(cube.position(v), loaded.position(v));
        }
    }

    #[test]
    fn test_load_mixed_polygons() {
        let path = scratch("house.ply");
        let text = "ply\n\
                    format ascii 1.0\n\
                    element vertex 5\n\
                    property float x\n\
                    property float y\n\
                    property float z\n\
                    element face 2\n\
                    property list uchar int vertex_indices\n\
                    end_header\n\
                    0 0 0\n\
                    1 0 0\n\
                    1 1 0\n\
                    0 1 0\n\
                    0.5 1.5 0\n\
                    4 0 1 2 3\n\
                    3 3 2 4\n";
        std::fs::write(&path, text).unwrap();

        let mesh: HalfEdgeMesh = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_edges(), 6);
        let mut degrees: Vec<usize> = mesh.face_ids().map(|f| mesh.face_degree(f)).collect();
        degrees.sort_unstable();
        assert_eq!(degrees, vec![3, 4]);
    }

    #[test]
    fn test_load_errors() {
        let missing = scratch("does-not-exist.ply");
        assert!(matches!(
            load::<_, u32>(&missing),
            Err(WeaveError::Io(_))
        ));

        let path = scratch("no-faces.ply");
        let text = "ply\n\
                    format ascii 1.0\n\
                    element vertex 1\n\
                    property float x\n\
                    property float y\n\
                    property float z\n\
                    end_header\n\
                    0 0 0\n";
        std::fs::write(&path, text).unwrap();
        let result = load::<_, u32>(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(WeaveError::LoadError { .. })));
    }
}
