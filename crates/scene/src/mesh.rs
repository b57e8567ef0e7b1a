//! Fixed cube geometry: 6 faces, 2 triangles each, 36 vertices.

/// Number of vertices in the cube mesh.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// One vertex of the cube: position and outward face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = {
    let p = 0.5_f32;
    [
        // +Z
        ([0.0, 0.0, 1.0], [[-p, -p, p], [p, -p, p], [p, p, p], [-p, p, p]]),
        // -Z
        ([0.0, 0.0, -1.0], [[p, -p, -p], [-p, -p, -p], [-p, p, -p], [p, p, -p]]),
        // +X
        ([1.0, 0.0, 0.0], [[p, -p, p], [p, -p, -p], [p, p, -p], [p, p, p]]),
        // -X
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p, p], [-p, p, p], [-p, p, -p]]),
        // +Y
        ([0.0, 1.0, 0.0], [[-p, p, p], [p, p, p], [p, p, -p], [-p, p, -p]]),
        // -Y
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [p, -p, -p], [p, -p, p], [-p, -p, p]]),
    ]
};

/// Unit cube centred on the origin, counter-clockwise front faces.
pub fn unit_cube() -> Vec<MeshVertex> {
    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for (normal, quad) in FACES {
        for corner in [0, 1, 2, 2, 3, 0] {
            vertices.push(MeshVertex {
                position: quad[corner],
                normal,
            });
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn has_36_vertices() {
        assert_eq!(unit_cube().len(), CUBE_VERTEX_COUNT as usize);
    }

    #[test]
    fn triangles_wind_outward() {
        let verts = unit_cube();
        for tri in verts.chunks(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let n = Vec3::from(tri[0].normal);
            assert!((b - a).cross(c - a).dot(n) > 0.0, "{tri:?}");
        }
    }

    #[test]
    fn vertices_lie_on_unit_cube() {
        for v in unit_cube() {
            for c in v.position {
                assert_eq!(c.abs(), 0.5);
            }
        }
    }
}
