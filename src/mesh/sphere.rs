//! UV-sphere tessellation.

use std::f32::consts::{PI, TAU};

use glam::{Mat3, Mat4, Quat, Vec3};

use super::{MeshBuilder, Sphere};

const MIN_LAT_DIV: usize = 2;
const MIN_LONG_DIV: usize = 3;

/// Builds unit UV-sphere geometry and per-atom sphere transforms.
///
/// Vertices are generated latitude-major: bands run from the north pole
/// (+Y) to the south pole, and within each band segments advance in
/// longitude. Each band/segment cell emits two triangles; at the poles one
/// triangle of each pair collapses to zero area because the pole ring is a
/// single point.
#[derive(Debug, Clone)]
pub struct SphereMeshBuilder {
    lat_div: usize,
    long_div: usize,
    positions: Vec<Vec3>,
}

impl SphereMeshBuilder {
    /// Sphere with `lat_div` latitude bands and `long_div` longitude
    /// segments (clamped to at least 2 and 3).
    #[must_use]
    pub fn new(lat_div: usize, long_div: usize) -> Self {
        let lat_div = lat_div.max(MIN_LAT_DIV);
        let long_div = long_div.max(MIN_LONG_DIV);
        Self {
            lat_div,
            long_div,
            positions: unit_sphere(lat_div, long_div),
        }
    }

    /// Latitude bands.
    #[must_use]
    pub fn lat_div(&self) -> usize {
        self.lat_div
    }

    /// Longitude segments.
    #[must_use]
    pub fn long_div(&self) -> usize {
        self.long_div
    }
}

impl MeshBuilder for SphereMeshBuilder {
    type Shape = Sphere;

    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    // Unit sphere: the normal at each vertex is the vertex itself.
    fn normals(&self) -> &[Vec3] {
        &self.positions
    }

    fn model_matrix(&self, shape: &Sphere) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(shape.radius),
            Quat::IDENTITY,
            shape.center,
        )
    }

    fn normal_matrix(&self, _shape: &Sphere) -> Mat3 {
        Mat3::IDENTITY
    }
}

fn ring_point(lat: usize, long: usize, lat_div: usize, long_div: usize) -> Vec3 {
    let theta = lat as f32 * PI / lat_div as f32;
    let phi = long as f32 * TAU / long_div as f32;
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p)
}

fn unit_sphere(lat_div: usize, long_div: usize) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(lat_div * long_div * 6);
    for lat in 0..lat_div {
        for long in 0..long_div {
            let p00 = ring_point(lat, long, lat_div, long_div);
            let p01 = ring_point(lat, long + 1, lat_div, long_div);
            let p10 = ring_point(lat + 1, long, lat_div, long_div);
            let p11 = ring_point(lat + 1, long + 1, lat_div, long_div);
            out.extend_from_slice(&[p00, p01, p10, p01, p11, p10]);
        }
    }
    out
}
