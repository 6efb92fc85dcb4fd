//! CPU-side mesh representation produced by the OBJ loader.

/// Vertex with position/normal/uv in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Non-empty buffers and a whole number of triangles.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty() && self.indices.len() % 3 == 0
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds as `(min, max)`, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for i in 0..3 {
                lo[i] = lo[i].min(v.position[i]);
                hi[i] = hi[i].max(v.position[i]);
            }
            (lo, hi)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0, 0, 0]);
        assert!(data.is_valid());
        assert_eq!(data.triangle_count(), 1);

        let partial = MeshData::new(vec![MeshVertex::default()], vec![0, 0]);
        assert!(!partial.is_valid());
    }

    #[test]
    fn bounds_span_all_vertices() {
        let data = MeshData::new(
            vec![
                MeshVertex::new([-1.0, 2.0, 0.5], [0.0; 3], [0.0; 2]),
                MeshVertex::new([3.0, -4.0, 0.0], [0.0; 3], [0.0; 2]),
            ],
            vec![0, 1, 1],
        );
        assert_eq!(data.bounds(), Some(([-1.0, -4.0, 0.0], [3.0, 2.0, 0.5])));
        assert_eq!(MeshData::default().bounds(), None);
    }
}
