use orrery_common::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Main viewing camera stored alongside the bodies. Physics never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in degrees.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 1000.0),
            target: Vector3::ZERO,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 10_000.0,
        }
    }
}

impl Camera {
    /// Translate the camera without changing its target.
    pub fn move_by(&mut self, delta: Vector3) {
        self.position += delta;
    }

    pub fn look_at(&mut self, target: Vector3) {
        self.target = target;
    }

    pub fn set_clipping(&mut self, near: f64, far: f64) {
        self.near = near;
        self.far = far;
    }

    /// Unit vector from the camera toward its target (zero if they coincide).
    pub fn view_direction(&self) -> Vector3 {
        (self.target - self.position).normalize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Vector3,
    pub tex_coord: [f64; 2],
}

/// Indices into a mesh's vertex list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle(pub u32, pub u32, pub u32);

/// Upper bound on `Mesh::sphere` tessellation.
pub const MAX_SPHERE_SEGMENTS: u32 = 512;

/// Named triangle mesh used by the renderer to draw bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub name: String,
    pub color: [f32; 3],
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: [1.0, 1.0, 1.0],
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Append a vertex and return its index, or `None` once the mesh
    /// already holds as many vertices as a `u32` index can address.
    pub fn push_vertex(&mut self, vertex: Vertex) -> Option<u32> {
        let index = u32::try_from(self.vertices.len()).ok()?;
        self.vertices.push(vertex);
        Some(index)
    }

    pub fn push_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.triangles.clear();
    }

    /// UV sphere with `segments` rings and `segments` slices, clamped to
    /// `1..=MAX_SPHERE_SEGMENTS`.
    pub fn sphere(radius: f64, segments: u32) -> Self {
        let segments = segments.clamp(1, MAX_SPHERE_SEGMENTS);
        let mut mesh = Self::new("sphere");
        let seg = f64::from(segments);

        for i in 0..=segments {
            let phi = PI * f64::from(i) / seg;
            for j in 0..=segments {
                let theta = 2.0 * PI * f64::from(j) / seg;
                let position = Vector3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                mesh.push_vertex(Vertex {
                    position,
                    normal: position.normalize(),
                    tex_coord: [f64::from(j) / seg, f64::from(i) / seg],
                });
            }
        }

        let row = segments + 1;
        for i in 0..segments {
            for j in 0..segments {
                let v1 = i * row + j;
                let v2 = v1 + 1;
                let v3 = (i + 1) * row + j;
                let v4 = v3 + 1;
                mesh.push_triangle(Triangle(v1, v2, v3));
                mesh.push_triangle(Triangle(v2, v4, v3));
            }
        }
        mesh
    }

    /// Axis-aligned cube centred on the origin with 8 shared corners.
    pub fn cube(size: f64) -> Self {
        let mut mesh = Self::new("cube");
        let s = size / 2.0;
        let corners = [
            [-1.0, -1.0, -1.0],
            [1.0, -1.0, -1.0],
            [1.0, 1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
        ];
        for [x, y, z] in corners {
            let dir = Vector3::new(x, y, z);
            mesh.push_vertex(Vertex {
                position: dir * s,
                normal: dir.normalize(),
                tex_coord: [(x + 1.0) / 2.0, (y + 1.0) / 2.0],
            });
        }

        const FACES: [u32; 36] = [
            0, 1, 2, 0, 2, 3, // front
            4, 6, 5, 4, 7, 6, // back
            3, 2, 6, 3, 6, 7, // top
            0, 5, 1, 0, 4, 5, // bottom
            1, 5, 6, 1, 6, 2, // right
            0, 3, 7, 0, 7, 4, // left
        ];
        for tri in FACES.chunks_exact(3) {
            mesh.push_triangle(Triangle(tri[0], tri[1], tri[2]));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_defaults_look_at_origin() {
        let cam = Camera::default();
        assert_eq!(cam.view_direction(), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn camera_move_keeps_target() {
        let mut cam = Camera::default();
        cam.move_by(Vector3::new(0.0, 0.0, -500.0));
        assert_eq!(cam.position, Vector3::new(0.0, 0.0, 500.0));
        assert_eq!(cam.target, Vector3::ZERO);
    }

    #[test]
    fn camera_on_target_has_zero_direction() {
        let mut cam = Camera::default();
        cam.look_at(cam.position);
        assert_eq!(cam.view_direction(), Vector3::ZERO);
    }

    #[test]
    fn sphere_counts() {
        let mesh = Mesh::sphere(1.0, 8);
        assert_eq!(mesh.vertices().len(), 81);
        assert_eq!(mesh.triangles().len(), 128);
        for v in mesh.vertices() {
            assert!((v.position.magnitude() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sphere_segments_are_clamped() {
        let mesh = Mesh::sphere(1.0, 65_535);
        let row = MAX_SPHERE_SEGMENTS as usize + 1;
        assert_eq!(mesh.vertices().len(), row * row);
        let max_index = mesh
            .triangles()
            .iter()
            .flat_map(|t| [t.0, t.1, t.2])
            .max()
            .unwrap();
        assert_eq!(max_index as usize, mesh.vertices().len() - 1);

        assert_eq!(Mesh::sphere(1.0, 0).vertices().len(), 4);
    }

    #[test]
    fn push_vertex_returns_index() {
        let mut mesh = Mesh::new("custom");
        let v = Vertex {
            position: Vector3::ZERO,
            normal: Vector3::new(0.0, 1.0, 0.0),
            tex_coord: [0.0, 0.0],
        };
        assert_eq!(mesh.push_vertex(v), Some(0));
        assert_eq!(mesh.push_vertex(v), Some(1));
        mesh.push_triangle(Triangle(0, 1, 0));
        assert_eq!(mesh.triangles().len(), 1);
    }

    #[test]
    fn cube_counts() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.triangles().len(), 12);
        assert_eq!(mesh.vertices()[6].position, Vector3::new(1.0, 1.0, 1.0));
        let max_index = mesh
            .triangles()
            .iter()
            .flat_map(|t| [t.0, t.1, t.2])
            .max()
            .unwrap();
        assert_eq!(max_index, 7);
    }

    #[test]
    fn mesh_clear_empties_geometry() {
        let mut mesh = Mesh::cube(1.0);
        mesh.clear();
        assert!(mesh.vertices().is_empty());
        assert!(mesh.triangles().is_empty());
        assert_eq!(mesh.name, "cube");
    }
}
