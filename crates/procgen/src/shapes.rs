//! Built-in procedural fragments standing in for model files.

use engine_core::{FragmentMesh, Material, SceneFragment};
use glam::{Mat4, Vec3};

/// UV sphere with smooth normals.
pub fn uv_sphere(name: &str, radius: f32, segments: u32, rings: u32) -> FragmentMesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for segment in 0..=segments {
            let theta = std::f32::consts::TAU * segment as f32 / segments as f32;
            let normal = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            positions.push(normal * radius);
            normals.push(normal);
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    FragmentMesh::new(name, positions, normals, indices)
}

/// Star-like body: a bright core sphere wrapped in a faint, larger corona shell.
pub fn sun_fragment() -> SceneFragment {
    let core = uv_sphere("sun_core", 1.0, 32, 24).with_material(Material {
        base_color: [1.0, 0.85, 0.4, 1.0],
        emissive: [1.0, 0.7, 0.25],
        emissive_intensity: 1.0,
    });
    let corona = uv_sphere("sun_corona", 1.0, 24, 16)
        .with_local(Mat4::from_scale(Vec3::splat(1.15)))
        .with_material(Material {
            base_color: [1.0, 0.5, 0.15, 1.0],
            emissive: [1.0, 0.45, 0.1],
            emissive_intensity: 1.0,
        });
    SceneFragment::new(vec![core, corona])
}

/// Faceted wedge-hull fighter, nose along -Z. Flat-shaded.
pub fn craft_fragment() -> SceneFragment {
    let nose = Vec3::new(0.0, 0.0, -1.6);
    let top = Vec3::new(0.0, 0.3, 0.4);
    let belly = Vec3::new(0.0, -0.2, 0.4);
    let wing_l = Vec3::new(-1.2, 0.0, 0.7);
    let wing_r = Vec3::new(1.2, 0.0, 0.7);
    let tail = Vec3::new(0.0, 0.05, 0.9);

    let hull = flat_shaded(
        "hull",
        &[
            // upper nose
            [nose, wing_l, top],
            [nose, top, wing_r],
            // lower nose
            [nose, belly, wing_l],
            [nose, wing_r, belly],
            // upper rear
            [top, wing_l, tail],
            [top, tail, wing_r],
            // lower rear
            [belly, tail, wing_l],
            [belly, wing_r, tail],
        ],
    );

    let fin_base_front = Vec3::new(0.0, 0.25, 0.3);
    let fin_base_back = Vec3::new(0.0, 0.08, 0.85);
    let fin_tip = Vec3::new(0.0, 0.65, 0.95);
    let fin = flat_shaded(
        "fin",
        &[
            [fin_base_front, fin_base_back, fin_tip],
            [fin_base_front, fin_tip, fin_base_back],
        ],
    );

    SceneFragment::new(vec![hull, fin])
}

/// One vertex triple per triangle with a shared face normal.
fn flat_shaded(name: &str, triangles: &[[Vec3; 3]]) -> FragmentMesh {
    let mut positions = Vec::with_capacity(triangles.len() * 3);
    let mut normals = Vec::with_capacity(triangles.len() * 3);
    for [a, b, c] in triangles {
        let normal = (*b - *a).cross(*c - *a).normalize_or_zero();
        positions.extend_from_slice(&[*a, *b, *c]);
        normals.extend_from_slice(&[normal; 3]);
    }
    let indices = (0..positions.len() as u32).collect();
    FragmentMesh::new(name, positions, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fragments_are_valid() {
        assert!(sun_fragment().validate().is_ok());
        assert!(craft_fragment().validate().is_ok());
    }

    #[test]
    fn sphere_vertices_sit_on_radius() {
        let sphere = uv_sphere("s", 2.0, 8, 6);
        assert!(sphere.positions.iter().all(|p| (p.length() - 2.0).abs() < 1e-4));
        assert_eq!(sphere.indices.len(), 8 * 6 * 6);
    }

    #[test]
    fn craft_points_down_negative_z() {
        let craft = craft_fragment();
        let min_z = craft
            .meshes()
            .iter()
            .flat_map(|m| m.positions.iter())
            .map(|p| p.z)
            .fold(f32::INFINITY, f32::min);
        assert!((min_z + 1.6).abs() < 1e-6);
    }

    #[test]
    fn craft_upper_hull_faces_up() {
        let craft = craft_fragment();
        let hull = &craft.meshes()[0];
        assert!(hull.normals[0].y > 0.0);
    }
}
