//! Cylinder (and cone) lateral-surface tessellation.

use std::f32::consts::{FRAC_1_SQRT_2, TAU};

use glam::{Mat3, Mat4, Vec3};

use super::{orthonormal_basis, Cylinder, MeshBuilder, MIN_EXTENT};

const MIN_SEGMENTS: usize = 3;

/// One end of the canonical cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CylinderEnd {
    /// The ring at y = 0 (the shape's `bottom`).
    Bottom,
    /// The ring at y = 1 (the shape's `top`).
    Top,
}

/// Builds unit cylinder geometry and per-bond cylinder transforms.
///
/// The canonical cylinder has radius 1 around +Y, from y = 0 to y = 1.
/// With a `flare` end set, that end collapses to a point and the surface
/// becomes a cone; bond halves use this to meet at the bond midpoint.
#[derive(Debug, Clone)]
pub struct CylinderMeshBuilder {
    segments: usize,
    flare: Option<CylinderEnd>,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl CylinderMeshBuilder {
    /// Cylinder with `segments` radial segments (clamped to at least 3).
    #[must_use]
    pub fn new(segments: usize, flare: Option<CylinderEnd>) -> Self {
        let segments = segments.max(MIN_SEGMENTS);
        let (positions, normals) = unit_cylinder(segments, flare);
        Self {
            segments,
            flare,
            positions,
            normals,
        }
    }

    /// Radial segments.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// End collapsed to a point, if any.
    #[must_use]
    pub fn flare(&self) -> Option<CylinderEnd> {
        self.flare
    }
}

impl MeshBuilder for CylinderMeshBuilder {
    type Shape = Cylinder;

    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    fn model_matrix(&self, shape: &Cylinder) -> Mat4 {
        let basis = orthonormal_basis(shape.axis()).unwrap_or(Mat3::IDENTITY);
        let length = if shape.is_degenerate() {
            0.0
        } else {
            shape.length()
        };
        Mat4::from_cols(
            (basis.x_axis * shape.radius).extend(0.0),
            (basis.y_axis * length).extend(0.0),
            (basis.z_axis * shape.radius).extend(0.0),
            shape.bottom.extend(1.0),
        )
    }

    fn normal_matrix(&self, shape: &Cylinder) -> Mat3 {
        let basis = orthonormal_basis(shape.axis()).unwrap_or(Mat3::IDENTITY);
        let radial = 1.0 / shape.radius.abs().max(MIN_EXTENT);
        let axial = 1.0 / shape.length().max(MIN_EXTENT);
        basis * Mat3::from_diagonal(Vec3::new(radial, axial, radial))
    }
}

fn unit_cylinder(
    segments: usize,
    flare: Option<CylinderEnd>,
) -> (Vec<Vec3>, Vec<Vec3>) {
    let (bottom_radius, top_radius, normal_y) = match flare {
        None => (1.0, 1.0, 0.0),
        Some(CylinderEnd::Top) => (1.0, 0.0, FRAC_1_SQRT_2),
        Some(CylinderEnd::Bottom) => (0.0, 1.0, -FRAC_1_SQRT_2),
    };
    let radial_scale = if flare.is_some() { FRAC_1_SQRT_2 } else { 1.0 };

    let ring = |i: usize| {
        let (sin, cos) = (i as f32 * TAU / segments as f32).sin_cos();
        (Vec3::new(cos, 0.0, sin), Vec3::new(cos, 0.0, sin) * radial_scale)
    };

    let mut positions = Vec::with_capacity(segments * 6);
    let mut normals = Vec::with_capacity(segments * 6);
    for i in 0..segments {
        let (d0, n0) = ring(i);
        let (d1, n1) = ring(i + 1);
        let n0 = n0 + Vec3::Y * normal_y;
        let n1 = n1 + Vec3::Y * normal_y;
        let b0 = d0 * bottom_radius;
        let b1 = d1 * bottom_radius;
        let t0 = d0 * top_radius + Vec3::Y;
        let t1 = d1 * top_radius + Vec3::Y;
        positions.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
        normals.extend_from_slice(&[n0, n0, n1, n1, n0, n1]);
    }
    (positions, normals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transformed(
        builder: &CylinderMeshBuilder,
        shape: &Cylinder,
    ) -> (Vec<Vec3>, Vec<Vec3>) {
        let mut positions = Vec::new();
        let mut normals = Vec::new();
        builder.append_instance(shape, &mut positions, &mut normals);
        (
            positions.into_iter().map(Vec3::from).collect(),
            normals.into_iter().map(Vec3::from).collect(),
        )
    }

    #[test]
    fn vertex_count_proportional_to_segments() {
        for segments in [3, 8, 17] {
            let builder = CylinderMeshBuilder::new(segments, None);
            assert_eq!(builder.vertices_per_instance(), segments * 6);
        }
        assert_eq!(CylinderMeshBuilder::new(1, None).segments(), 3);
    }

    #[test]
    fn straight_cylinder_normals_are_radial() {
        let builder = CylinderMeshBuilder::new(8, None);
        for (p, n) in builder.positions().iter().zip(builder.normals()) {
            let radial = Vec3::new(p.x, 0.0, p.z);
            assert!((radial - *n).length() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn flared_end_collapses_to_point() {
        let builder = CylinderMeshBuilder::new(8, Some(CylinderEnd::Top));
        for p in builder.positions() {
            if p.y > 0.5 {
                assert!((*p - Vec3::Y).length() < 1e-6);
            } else {
                assert!((Vec3::new(p.x, 0.0, p.z).length() - 1.0).abs() < 1e-5);
            }
        }
        for n in builder.normals() {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.y > 0.0);
        }
    }

    #[test]
    fn triangles_face_outward() {
        let builder = CylinderMeshBuilder::new(12, None);
        for tri in builder.positions().chunks_exact(3) {
            let n = (tri[1] - tri[0]).cross(tri[2] - tri[0]);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let radial = Vec3::new(centroid.x, 0.0, centroid.z);
            assert!(n.dot(radial) > 0.0);
        }
    }

    #[test]
    fn instance_spans_bottom_to_top() {
        let builder = CylinderMeshBuilder::new(10, None);
        let shape =
            Cylinder::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 4.0), 0.25);
        let (positions, normals) = transformed(&builder, &shape);
        let axis = shape.axis().normalize();
        for (p, n) in positions.iter().zip(&normals) {
            let rel = *p - shape.bottom;
            let along = rel.dot(axis);
            assert!((-1e-4..=3.0 + 1e-4).contains(&along));
            let radial = rel - axis * along;
            assert!((radial.length() - 0.25).abs() < 1e-4);
            assert!(n.dot(axis).abs() < 1e-4);
            assert!((radial.normalize() - *n).length() < 1e-3);
        }
    }

    #[test]
    fn zero_length_bond_produces_finite_geometry() {
        let builder = CylinderMeshBuilder::new(6, Some(CylinderEnd::Top));
        let point = Vec3::new(2.0, 3.0, 4.0);
        let shape = Cylinder::new(point, point, 0.2);
        let (positions, normals) = transformed(&builder, &shape);
        assert!(positions.iter().all(|p| p.is_finite()));
        assert!(normals.iter().all(|n| n.is_finite()));
        assert!(builder.model_matrix(&shape).is_finite());
    }
}
