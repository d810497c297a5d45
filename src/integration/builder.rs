//! Incremental construction of meshes.

use crate::error::{Error, Result};
use crate::model::Mesh;

/// Builder collecting vertices and faces for a [`Mesh`].
#[derive(Debug, Clone, Default)]
pub struct MeshBuilder {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    faces: Vec<[u16; 3]>,
    overflowed: bool,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex. Its index is the [`vertex_count`](Self::vertex_count)
    /// before the call.
    pub fn vertex(mut self, position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
        self
    }

    /// Append a triangle; winding is counter-clockwise when seen from the front.
    pub fn face(mut self, a: u16, b: u16, c: u16) -> Self {
        self.faces.push([a, b, c]);
        self
    }

    /// Append a quad as two triangles `a b c` and `a c d`.
    pub fn quad(self, a: u16, b: u16, c: u16, d: u16) -> Self {
        self.face(a, b, c).face(a, c, d)
    }

    /// Append an axis-aligned rectangle in the z = `z` plane facing +z, with
    /// texture coordinates spanning the whole image.
    ///
    /// Rectangles past the 16-bit index range make [`build`](Self::build) fail.
    pub fn rect(mut self, min: [f32; 2], max: [f32; 2], z: f32) -> Self {
        let Ok(base) = u16::try_from(self.positions.len() + 3).map(|last| last - 3) else {
            self.overflowed = true;
            return self;
        };
        let normal = [0.0, 0.0, 1.0];
        self.vertex([min[0], min[1], z], normal, [0.0, 0.0])
            .vertex([max[0], min[1], z], normal, [1.0, 0.0])
            .vertex([max[0], max[1], z], normal, [1.0, 1.0])
            .vertex([min[0], max[1], z], normal, [0.0, 1.0])
            .quad(base, base + 1, base + 2, base + 3)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Validate and build the mesh.
    pub fn build(self) -> Result<Mesh> {
        if self.overflowed {
            return Err(Error::InvalidMesh(
                "more vertices than 16-bit indices can address".into(),
            ));
        }
        Mesh::new(self.positions, self.normals, self.tex_coords, self.faces)
    }
}
