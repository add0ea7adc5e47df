//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | PLY | `.ply` | ✓ | ✓ | Polygon faces, ASCII output |
//! | Wavefront OBJ | `.obj` | ✗ | ✓ | Meshes and strand polylines |
//!
//! # Usage
//!
//! ```no_run
//! use knotwork::io::{load, save};
//! use knotwork::mesh::HalfEdgeMesh;
//!
//! // Load with automatic format detection
//! let mesh: HalfEdgeMesh = load("model.ply").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.obj").unwrap();
//! ```

pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{Result, WeaveError};
use crate::mesh::{HalfEdgeMesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| WeaveError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Ply => ply::load(path),
        Format::Obj => Err(WeaveError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ loading is not supported".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.PLY"), Some(Format::Ply));
        assert_eq!(Format::from_path("strands.obj"), Some(Format::Obj));
        assert_eq!(Format::from_path("model.stl"), None);
        assert_eq!(Format::from_path("no_extension"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load::<_, u32>("model.stl").unwrap_err();
        assert!(matches!(err, WeaveError::UnsupportedFormat { ref extension } if extension == "stl"));

        let err = load::<_, u32>("model.obj").unwrap_err();
        assert!(matches!(err, WeaveError::LoadError { .. }));
    }
}
