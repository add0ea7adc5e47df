//! Small reference meshes.
//!
//! All shapes are consistently oriented with outward-facing normals.

use std::f64::consts::TAU;

use nalgebra::Point3;

use super::builder::build_from_polygons;
use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::error::{Result, WeaveError};

/// A regular tetrahedron inscribed in the cube `[-1, 1]^3`.
pub fn tetrahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(-1.0, -1.0, 1.0),
    ];
    let faces: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    build_from_polygons(&vertices, &faces)
}

/// The unit cube `[0, 1]^3` with six quad faces.
pub fn cube<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let faces: [[usize; 4]; 6] = [
        [0, 3, 2, 1],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [2, 3, 7, 6],
        [0, 4, 7, 3],
        [1, 2, 6, 5],
    ];
    build_from_polygons(&vertices, &faces)
}

/// A flat `nx` by `ny` grid of unit quads in the XY plane, facing +Z.
///
/// Vertex `(i, j)` sits at `(i, j, 0)` with id `j * (nx + 1) + i`.
pub fn quad_grid<I: MeshIndex>(nx: usize, ny: usize) -> Result<HalfEdgeMesh<I>> {
    let row = nx + 1;
    let vertices: Vec<Point3<f64>> = (0..=ny)
        .flat_map(|j| (0..=nx).map(move |i| Point3::new(i as f64, j as f64, 0.0)))
        .collect();

    let mut faces = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v = j * row + i;
            faces.push([v, v + 1, v + row + 1, v + row]);
        }
    }

    build_from_polygons(&vertices, &faces)
}

/// A closed quad torus around the Z axis.
///
/// The tube has `n_minor` quads around it and `n_major` rings. The major
/// radius is 2 and the minor radius 0.5. Both counts must be at least 3.
pub fn quad_torus<I: MeshIndex>(n_major: usize, n_minor: usize) -> Result<HalfEdgeMesh<I>> {
    if n_major < 3 {
        return Err(WeaveError::invalid_param("n_major", n_major, "must be at least 3"));
    }
    if n_minor < 3 {
        return Err(WeaveError::invalid_param("n_minor", n_minor, "must be at least 3"));
    }

    const MAJOR: f64 = 2.0;
    const MINOR: f64 = 0.5;

    let mut vertices = Vec::with_capacity(n_major * n_minor);
    for i in 0..n_major {
        let u = TAU * i as f64 / n_major as f64;
        for j in 0..n_minor {
            let v = TAU * j as f64 / n_minor as f64;
            let ring = MAJOR + MINOR * v.cos();
            vertices.push(Point3::new(ring * u.cos(), ring * u.sin(), MINOR * v.sin()));
        }
    }

    let id = |i: usize, j: usize| (i % n_major) * n_minor + (j % n_minor);
    let mut faces = Vec::with_capacity(n_major * n_minor);
    for i in 0..n_major {
        for j in 0..n_minor {
            faces.push([id(i, j), id(i + 1, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }

    build_from_polygons(&vertices, &faces)
}
