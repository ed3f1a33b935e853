//! Asset-neutral scene fragments.
//!
//! A fragment is what an asset load hands back: a root transform plus a flat,
//! traversable list of meshes, each carrying its own material. Node hierarchies
//! are flattened into each mesh's `local` matrix at load time.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::transform::Transform;

/// Problems found when validating a fragment's geometry.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("mesh '{name}' has {normals} normals for {positions} positions")]
    NormalCountMismatch {
        name: String,
        positions: usize,
        normals: usize,
    },

    #[error("mesh '{name}' index count {count} is not a multiple of 3")]
    IncompleteTriangle { name: String, count: usize },

    #[error("mesh '{name}' references vertex {index} but has only {vertices}")]
    IndexOutOfRange {
        name: String,
        index: u32,
        vertices: usize,
    },
}

/// Surface appearance of one mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Linear RGBA base color.
    pub base_color: [f32; 4],
    /// Linear RGB emissive color.
    pub emissive: [f32; 3],
    /// Multiplier on `emissive`.
    pub emissive_intensity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: [0.8, 0.8, 0.8, 1.0],
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
        }
    }
}

impl Material {
    /// Emissive color with intensity folded in.
    pub fn emissive_radiance(&self) -> [f32; 3] {
        [
            self.emissive[0] * self.emissive_intensity,
            self.emissive[1] * self.emissive_intensity,
            self.emissive[2] * self.emissive_intensity,
        ]
    }
}

/// One drawable mesh inside a fragment.
#[derive(Debug, Clone)]
pub struct FragmentMesh {
    pub name: String,
    /// Mesh-to-fragment-root matrix.
    pub local: Mat4,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub material: Material,
}

impl FragmentMesh {
    pub fn new(name: impl Into<String>, positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            local: Mat4::IDENTITY,
            positions,
            normals,
            indices,
            material: Material::default(),
        }
    }

    pub fn with_local(mut self, local: Mat4) -> Self {
        self.local = local;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn validate(&self) -> Result<(), SceneError> {
        if self.normals.len() != self.positions.len() {
            return Err(SceneError::NormalCountMismatch {
                name: self.name.clone(),
                positions: self.positions.len(),
                normals: self.normals.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(SceneError::IncompleteTriangle {
                name: self.name.clone(),
                count: self.indices.len(),
            });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= self.positions.len()) {
            return Err(SceneError::IndexOutOfRange {
                name: self.name.clone(),
                index,
                vertices: self.positions.len(),
            });
        }
        Ok(())
    }
}

/// A loaded scene-graph fragment: root transform and its mesh subtree.
#[derive(Debug, Clone, Default)]
pub struct SceneFragment {
    pub root: Transform,
    meshes: Vec<FragmentMesh>,
}

impl SceneFragment {
    pub fn new(meshes: Vec<FragmentMesh>) -> Self {
        Self {
            root: Transform::default(),
            meshes,
        }
    }

    pub fn meshes(&self) -> &[FragmentMesh] {
        &self.meshes
    }

    /// Visit every mesh in the subtree.
    pub fn meshes_mut(&mut self) -> impl Iterator<Item = &mut FragmentMesh> {
        self.meshes.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Replace the material of every mesh in the subtree.
    pub fn override_material(&mut self, material: Material) {
        for mesh in self.meshes_mut() {
            mesh.material = material;
        }
    }

    /// Set emissive intensity on every mesh material in the subtree.
    pub fn set_emissive_intensity(&mut self, intensity: f32) {
        for mesh in self.meshes_mut() {
            mesh.material.emissive_intensity = intensity;
        }
    }

    /// Check that every mesh is drawable as an indexed triangle list.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.meshes.iter().try_for_each(FragmentMesh::validate)
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.positions.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(name: &str) -> FragmentMesh {
        FragmentMesh::new(
            name,
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec3::Z; 3],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn override_material_reaches_every_mesh() {
        let mut fragment = SceneFragment::new(vec![triangle("a"), triangle("b")]);
        let material = Material {
            base_color: [0.1, 0.2, 0.3, 1.0],
            emissive: [0.0, 0.0, 1.0],
            emissive_intensity: 0.5,
        };
        fragment.override_material(material);
        assert!(fragment.meshes().iter().all(|m| m.material == material));
    }

    #[test]
    fn emissive_intensity_applies_to_subtree() {
        let mut fragment = SceneFragment::new(vec![triangle("a"), triangle("b"), triangle("c")]);
        fragment.set_emissive_intensity(1.7);
        assert!(fragment
            .meshes()
            .iter()
            .all(|m| (m.material.emissive_intensity - 1.7).abs() < 1e-6));
    }

    #[test]
    fn validate_catches_out_of_range_index() {
        let mut mesh = triangle("broken");
        mesh.indices = vec![0, 1, 3];
        let fragment = SceneFragment::new(vec![mesh]);
        assert_eq!(
            fragment.validate(),
            Err(SceneError::IndexOutOfRange {
                name: "broken".into(),
                index: 3,
                vertices: 3,
            })
        );
    }

    #[test]
    fn validate_catches_partial_triangle() {
        let mut mesh = triangle("partial");
        mesh.indices.push(0);
        let fragment = SceneFragment::new(vec![mesh]);
        assert!(matches!(
            fragment.validate(),
            Err(SceneError::IncompleteTriangle { count: 4, .. })
        ));
    }

    #[test]
    fn emissive_radiance_scales_color() {
        let material = Material {
            emissive: [1.0, 0.5, 0.0],
            emissive_intensity: 2.0,
            ..Default::default()
        };
        assert_eq!(material.emissive_radiance(), [2.0, 1.0, 0.0]);
    }
}
