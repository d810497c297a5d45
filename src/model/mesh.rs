//! Triangle mesh rendered with indexed `TRIANGLES`.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Immutable triangle mesh.
///
/// Attributes are stored as contiguous `n x 3` / `n x 2` blocks so they can be
/// handed to the graphics API as flat float slices.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Array2<f32>,
    normals: Array2<f32>,
    tex_coords: Array2<f32>,
    faces: Vec<[u16; 3]>,
}

impl Mesh {
    /// Build a mesh, checking that the attribute arrays agree and every index is in range.
    pub fn new(
        positions: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        tex_coords: Vec<[f32; 2]>,
        faces: Vec<[u16; 3]>,
    ) -> Result<Self> {
        let n = positions.len();
        if normals.len() != n || tex_coords.len() != n {
            return Err(Error::InvalidMesh(format!(
                "{} positions, {} normals, {} texture coordinates",
                n,
                normals.len(),
                tex_coords.len()
            )));
        }
        if let Some(face) = faces
            .iter()
            .find(|face| face.iter().any(|&i| i as usize >= n))
        {
            return Err(Error::InvalidMesh(format!(
                "face {face:?} indexes past {n} vertices"
            )));
        }

        Ok(Self {
            positions: Array2::from(positions),
            normals: Array2::from(normals),
            tex_coords: Array2::from(tex_coords),
            faces,
        })
    }

    /// The canonical 2x2 plane centred on the target, facing +z.
    pub fn unit_plane() -> Self {
        Self {
            positions: Array2::from(vec![
                [-1.0, -1.0, 0.0],
                [1.0, -1.0, 0.0],
                [1.0, 1.0, 0.0],
                [-1.0, 1.0, 0.0],
            ]),
            normals: Array2::from(vec![[0.0, 0.0, 1.0]; 4]),
            tex_coords: Array2::from(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]),
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.nrows()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions, three floats per vertex.
    pub fn positions(&self) -> &[f32] {
        flat(&self.positions)
    }

    /// Vertex normals, three floats per vertex.
    pub fn normals(&self) -> &[f32] {
        flat(&self.normals)
    }

    /// Texture coordinates, two floats per vertex.
    pub fn tex_coords(&self) -> &[f32] {
        flat(&self.tex_coords)
    }

    /// Triangle indices, three per face.
    pub fn indices(&self) -> &[u16] {
        self.faces.as_flattened()
    }

    pub fn faces(&self) -> &[[u16; 3]] {
        &self.faces
    }
}

fn flat(block: &Array2<f32>) -> &[f32] {
    // Blocks are only ever built from `Vec<[f32; N]>`, which yields standard layout.
    block.as_slice().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_plane() {
        let plane = Mesh::unit_plane();
        assert_eq!(plane.vertex_count(), 4);
        assert_eq!(plane.face_count(), 2);
        assert_eq!(plane.positions().len(), 12);
        assert_eq!(plane.normals().len(), 12);
        assert_eq!(plane.tex_coords().len(), 8);
        assert_eq!(plane.indices(), &[0, 1, 2, 0, 2, 3]);
        // Spans [-1, 1] on both axes.
        let xs: Vec<f32> = plane.positions().chunks(3).map(|v| v[0]).collect();
        assert_eq!(xs, vec![-1.0, 1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_rejects_mismatched_attributes() {
        let err = Mesh::new(
            vec![[0.0; 3]; 3],
            vec![[0.0; 3]; 2],
            vec![[0.0; 2]; 3],
            vec![[0, 1, 2]],
        );
        assert!(matches!(err, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let err = Mesh::new(
            vec![[0.0; 3]; 3],
            vec![[0.0; 3]; 3],
            vec![[0.0; 2]; 3],
            vec![[0, 1, 3]],
        );
        assert!(matches!(err, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_flat_attribute_order() {
        let mesh = Mesh::new(
            vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]],
            vec![[0.0, 0.0, 1.0]; 3],
            vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            vec![[2, 1, 0]],
        )
        .unwrap();
        assert_eq!(&mesh.positions()[3..6], &[4.0, 5.0, 6.0]);
        assert_eq!(mesh.indices(), &[2, 1, 0]);
    }
}
