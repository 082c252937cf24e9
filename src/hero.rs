//! Geometry and camera math for the hero background.
//!
//! Matrices are column-major `[f32; 16]`, ready for `uniformMatrix4fv`.

use std::collections::HashMap;

pub const RADIUS: f32 = 12.0;
pub const DETAIL: u32 = 1;
pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 30.0;
pub const SPIN_X_PER_FRAME: f32 = 0.005;
pub const SPIN_Y_PER_FRAME: f32 = 0.008;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

pub const BASE_COLOR: [f32; 3] = [0x25 as f32 / 255.0, 0x63 as f32 / 255.0, 0xeb as f32 / 255.0];
pub const WIREFRAME_OPACITY: f32 = 0.3;
pub const POINT_OPACITY: f32 = 0.6;
pub const POINT_SIZE: f32 = 2.0;

pub type Mat4 = [f32; 16];

const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn icosahedron_corners() -> [[f32; 3]; 12] {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
    [
        [-1.0, t, 0.0],
        [1.0, t, 0.0],
        [-1.0, -t, 0.0],
        [1.0, -t, 0.0],
        [0.0, -1.0, t],
        [0.0, 1.0, t],
        [0.0, -1.0, -t],
        [0.0, 1.0, -t],
        [t, 0.0, -1.0],
        [t, 0.0, 1.0],
        [-t, 0.0, -1.0],
        [-t, 0.0, 1.0],
    ]
}

fn lerp(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

fn onto_sphere(v: [f32; 3], radius: f32) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length <= f32::EPSILON {
        return [0.0, 0.0, 0.0];
    }
    let scale = radius / length;
    [v[0] * scale, v[1] * scale, v[2] * scale]
}

/// Subdivided icosahedron with shared vertices and unique edges.
#[derive(Clone, Debug)]
pub struct Polyhedron {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<[u16; 3]>,
    pub edges: Vec<[u16; 2]>,
}

#[derive(Default)]
struct VertexPool {
    vertices: Vec<[f32; 3]>,
    lookup: HashMap<[i64; 3], u16>,
}

impl VertexPool {
    fn insert(&mut self, v: [f32; 3]) -> u16 {
        let key = v.map(|component| (component * 10_000.0).round() as i64);
        if let Some(index) = self.lookup.get(&key) {
            return *index;
        }
        let index = self.vertices.len() as u16;
        self.vertices.push(v);
        self.lookup.insert(key, index);
        index
    }
}

impl Polyhedron {
    /// Splits each face edge into `detail + 1` segments and pushes every
    /// point out to the sphere of `radius`.
    pub fn icosahedron(radius: f32, detail: u32) -> Self {
        let corners = icosahedron_corners();
        let cols = detail as usize + 1;
        let mut pool = VertexPool::default();
        let mut triangles = Vec::with_capacity(ICOSAHEDRON_FACES.len() * cols * cols);

        for face in ICOSAHEDRON_FACES {
            let [a, b, c] = face.map(|corner| corners[corner]);

            let mut grid: Vec<Vec<u16>> = Vec::with_capacity(cols + 1);
            for i in 0..=cols {
                let step = i as f32 / cols as f32;
                let aj = lerp(a, c, step);
                let bj = lerp(b, c, step);
                let rows = cols - i;

                let row = (0..=rows)
                    .map(|j| {
                        let point = if j == 0 && i == cols {
                            aj
                        } else {
                            lerp(aj, bj, j as f32 / rows as f32)
                        };
                        pool.insert(onto_sphere(point, radius))
                    })
                    .collect();
                grid.push(row);
            }

            for i in 0..cols {
                for j in 0..(2 * (cols - i) - 1) {
                    let k = j / 2;
                    if j % 2 == 0 {
                        triangles.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
                    } else {
                        triangles.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
                    }
                }
            }
        }

        let mut edges: Vec<[u16; 2]> = triangles
            .iter()
            .flat_map(|[a, b, c]| [[*a, *b], [*b, *c], [*c, *a]])
            .map(|[from, to]| [from.min(to), from.max(to)])
            .collect();
        edges.sort_unstable();
        edges.dedup();

        Self {
            vertices: pool.vertices,
            triangles,
            edges,
        }
    }

    pub fn flat_vertices(&self) -> Vec<f32> {
        self.vertices.iter().flatten().copied().collect()
    }

    pub fn flat_edges(&self) -> Vec<u16> {
        self.edges.iter().flatten().copied().collect()
    }
}

/// Rotation shared by the wireframe and the point cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spin {
    pub x: f32,
    pub y: f32,
}

impl Spin {
    pub fn advance(&mut self) {
        self.x += SPIN_X_PER_FRAME;
        self.y += SPIN_Y_PER_FRAME;
    }
}

/// Drawing-buffer size and aspect ratio for a viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> Self {
        let pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_PIXEL_RATIO)
        } else {
            1.0
        };

        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.css_height <= 0.0 {
            return 1.0;
        }
        (self.css_width / self.css_height) as f32
    }

    pub fn buffer_size(&self) -> (u32, u32) {
        (
            (self.css_width * self.pixel_ratio).floor() as u32,
            (self.css_height * self.pixel_ratio).floor() as u32,
        )
    }
}

pub fn identity() -> Mat4 {
    let mut m = [0.0; 16];
    m[0] = 1.0;
    m[5] = 1.0;
    m[10] = 1.0;
    m[15] = 1.0;
    m
}

pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut c = [0.0; 16];
    for col in 0..4 {
        for row in 0..4 {
            c[col * 4 + row] = (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum();
        }
    }
    c
}

pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
    let mut m = [0.0; 16];
    m[0] = f / aspect;
    m[5] = f;
    m[10] = (far + near) / (near - far);
    m[11] = -1.0;
    m[14] = 2.0 * far * near / (near - far);
    m
}

pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    let mut m = identity();
    m[12] = x;
    m[13] = y;
    m[14] = z;
    m
}

pub fn rotation_x(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = identity();
    m[5] = c;
    m[6] = s;
    m[9] = -s;
    m[10] = c;
    m
}

pub fn rotation_y(angle: f32) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let mut m = identity();
    m[0] = c;
    m[2] = -s;
    m[8] = s;
    m[10] = c;
    m
}

/// Projection * view * model for the current spin; the model uses XYZ Euler
/// order, so the x rotation is applied last.
pub fn model_view_projection(spin: Spin, aspect: f32) -> Mat4 {
    let projection = perspective(FOV_Y_DEGREES, aspect, NEAR, FAR);
    let view = translation(0.0, 0.0, -CAMERA_Z);
    let model = multiply(&rotation_x(spin.x), &rotation_y(spin.y));
    multiply(&projection, &multiply(&view, &model))
}

pub fn transform_point(m: &Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0; 4];
    for (row, value) in out.iter_mut().enumerate() {
        *value = m[row] * p[0] + m[4 + row] * p[1] + m[8 + row] * p[2] + m[12 + row];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn base_icosahedron_has_twelve_corners() {
        let solid = Polyhedron::icosahedron(1.0, 0);
        assert_eq!(solid.vertices.len(), 12);
        assert_eq!(solid.triangles.len(), 20);
        assert_eq!(solid.edges.len(), 30);
    }

    #[test]
    fn detail_one_splits_each_face_in_four() {
        let solid = Polyhedron::icosahedron(RADIUS, DETAIL);
        assert_eq!(solid.vertices.len(), 42);
        assert_eq!(solid.triangles.len(), 80);
        assert_eq!(solid.edges.len(), 120);

        let euler = solid.vertices.len() as i64 - solid.edges.len() as i64
            + solid.triangles.len() as i64;
        assert_eq!(euler, 2);
    }

    #[test]
    fn every_vertex_sits_on_the_sphere() {
        let solid = Polyhedron::icosahedron(RADIUS, DETAIL);
        for [x, y, z] in &solid.vertices {
            assert!(close((x * x + y * y + z * z).sqrt(), RADIUS));
        }
        assert_eq!(solid.flat_vertices().len(), 42 * 3);
        assert_eq!(solid.flat_edges().len(), 240);
    }

    #[test]
    fn spin_advances_both_axes_per_frame() {
        let mut spin = Spin::default();
        for _ in 0..100 {
            spin.advance();
        }
        assert!(close(spin.x, 0.5));
        assert!(close(spin.y, 0.8));
    }

    #[test]
    fn viewport_caps_pixel_ratio_and_guards_zero_height() {
        let viewport = Viewport::new(1280.0, 720.0, 3.0);
        assert_eq!(viewport.buffer_size(), (2560, 1440));
        assert!(close(viewport.aspect(), 1280.0 / 720.0));

        let flat = Viewport::new(800.0, 0.0, f64::NAN);
        assert_eq!(flat.aspect(), 1.0);
        assert_eq!(flat.pixel_ratio, 1.0);
    }

    #[test]
    fn multiply_by_identity_is_noop() {
        let m = rotation_y(0.7);
        assert_eq!(multiply(&identity(), &m), m);
        assert_eq!(multiply(&m, &identity()), m);
    }

    #[test]
    fn rotations_turn_axes_the_right_way() {
        let quarter = std::f32::consts::FRAC_PI_2;
        let p = transform_point(&rotation_y(quarter), [1.0, 0.0, 0.0]);
        assert!(close(p[0], 0.0) && close(p[2], -1.0));

        let p = transform_point(&rotation_x(quarter), [0.0, 1.0, 0.0]);
        assert!(close(p[1], 0.0) && close(p[2], 1.0));
    }

    #[test]
    fn origin_projects_to_screen_center_inside_depth_range() {
        let mvp = model_view_projection(Spin::default(), 16.0 / 9.0);
        let clip = transform_point(&mvp, [0.0, 0.0, 0.0]);
        let ndc_z = clip[2] / clip[3];

        assert!(close(clip[0], 0.0) && close(clip[1], 0.0));
        assert!(close(clip[3], CAMERA_Z));
        assert!(ndc_z > -1.0 && ndc_z < 1.0);
    }
}
