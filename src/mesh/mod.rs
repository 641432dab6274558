//! Procedural geometry for atom spheres and bond cylinders.
//!
//! Builders compute canonical unit geometry once at construction. The
//! instanced strategy uploads that geometry as-is and streams
//! [`MeshBuilder::model_matrix`] per instance; the batched strategy calls
//! [`MeshBuilder::append_instance`] to bake one transformed copy per
//! instance into a flat buffer.
//!
//! All geometry is emitted as a non-indexed triangle list with
//! counter-clockwise winding seen from outside.

mod cylinder;
mod shape;
mod sphere;

pub use cylinder::{CylinderEnd, CylinderMeshBuilder};
use glam::{Mat3, Mat4, Vec3};
pub use shape::{orthonormal_basis, Cylinder, Sphere};
pub use sphere::SphereMeshBuilder;

/// Smallest extent used when inverting a shape's scale for normals.
pub(crate) const MIN_EXTENT: f32 = 1e-6;

/// Canonical geometry plus the per-instance transform for one primitive.
pub trait MeshBuilder {
    /// Shape descriptor that positions one instance.
    type Shape;

    /// Canonical unit-geometry positions.
    fn positions(&self) -> &[Vec3];

    /// Canonical unit-geometry normals, one per position.
    fn normals(&self) -> &[Vec3];

    /// Vertices emitted per instance.
    fn vertices_per_instance(&self) -> usize {
        self.positions().len()
    }

    /// Transform taking canonical geometry onto `shape`.
    fn model_matrix(&self, shape: &Self::Shape) -> Mat4;

    /// Transform for canonical normals (inverse transpose of the linear
    /// part of [`Self::model_matrix`], up to scale).
    fn normal_matrix(&self, shape: &Self::Shape) -> Mat3;

    /// Append one transformed copy of the canonical geometry.
    fn append_instance(
        &self,
        shape: &Self::Shape,
        positions: &mut Vec<[f32; 3]>,
        normals: &mut Vec<[f32; 3]>,
    ) {
        let model = self.model_matrix(shape);
        let normal_matrix = self.normal_matrix(shape);
        positions.extend(
            self.positions()
                .iter()
                .map(|&p| model.transform_point3(p).to_array()),
        );
        normals.extend(
            self.normals()
                .iter()
                .map(|&n| (normal_matrix * n).normalize_or(n).to_array()),
        );
    }
}
