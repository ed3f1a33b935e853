//! Tube extrusion around a Catmull-Rom curve, used for the craft's motion trail.

use engine_core::FragmentMesh;
use glam::Vec3;

use crate::curve::CatmullRomCurve;

/// Fewest samples that produce a tube. Two samples only describe a straight
/// segment, which is skipped rather than extruded.
pub const MIN_TUBE_POINTS: usize = 3;

/// Upper bound on tubular segments along the whole curve.
pub const MAX_TUBE_SEGMENTS: usize = 4096;

/// Upper bound on vertices around a ring.
pub const MAX_RADIAL_SEGMENTS: u32 = 64;

/// Below this total length the curve is treated as a single point.
const MIN_CHORD_LENGTH: f32 = 1e-4;

/// Tube shape parameters.
#[derive(Debug, Clone, Copy)]
pub struct TubeConfig {
    pub radius: f32,
    /// Tubular segments generated per control-point span.
    pub segments_per_span: u32,
    /// Vertices around each ring.
    pub radial_segments: u32,
    /// Fraction the radius shrinks towards the tail (0 = uniform tube).
    pub taper: f32,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            radius: 0.05,
            segments_per_span: 2,
            radial_segments: 6,
            taper: 0.5,
        }
    }
}

/// Build a tube through `points` (head first).
///
/// Returns `None` for fewer than [`MIN_TUBE_POINTS`] samples or a curve with no
/// usable direction (every sample in the same place).
pub fn build_tube(points: &[Vec3], config: &TubeConfig) -> Option<FragmentMesh> {
    if points.len() < MIN_TUBE_POINTS {
        return None;
    }
    let curve = CatmullRomCurve::new(points.to_vec())?;
    if curve.chord_length() < MIN_CHORD_LENGTH {
        return None;
    }

    let segments = curve
        .span_count()
        .saturating_mul(config.segments_per_span.max(1) as usize)
        .min(MAX_TUBE_SEGMENTS);
    let radial = config.radial_segments.clamp(3, MAX_RADIAL_SEGMENTS) as usize;

    let samples: Vec<Vec3> = (0..=segments)
        .map(|i| curve.point_at(i as f32 / segments as f32))
        .collect();
    let tangents = sample_tangents(&curve, segments)?;
    let frames = transport_frames(&tangents);

    let ring = radial + 1;
    let mut positions = Vec::with_capacity((segments + 1) * ring);
    let mut normals = Vec::with_capacity((segments + 1) * ring);
    for (i, (center, (normal, binormal))) in samples.iter().zip(frames.iter()).enumerate() {
        let along = i as f32 / segments as f32;
        let radius = config.radius * (1.0 - config.taper.clamp(0.0, 1.0) * along);
        for j in 0..=radial {
            let angle = j as f32 / radial as f32 * std::f32::consts::TAU;
            let (sin, cos) = angle.sin_cos();
            let dir = (*normal * cos + *binormal * sin).normalize_or_zero();
            positions.push(*center + dir * radius);
            normals.push(dir);
        }
    }

    let mut indices = Vec::with_capacity(segments * radial * 6);
    for i in 0..segments {
        for j in 0..radial {
            let a = (i * ring + j) as u32;
            let b = ((i + 1) * ring + j) as u32;
            let c = ((i + 1) * ring + j + 1) as u32;
            let d = (i * ring + j + 1) as u32;
            indices.extend_from_slice(&[a, d, b, b, d, c]);
        }
    }

    Some(FragmentMesh::new("trail", positions, normals, indices))
}

/// Unit tangents at each sample; zero-length derivatives borrow a neighbour's tangent.
fn sample_tangents(curve: &CatmullRomCurve, segments: usize) -> Option<Vec<Vec3>> {
    let raw: Vec<Vec3> = (0..=segments)
        .map(|i| curve.derivative_at(i as f32 / segments as f32).normalize_or_zero())
        .collect();

    let first = raw.iter().copied().find(|t| *t != Vec3::ZERO)?;
    let mut last = first;
    Some(
        raw.into_iter()
            .map(|t| {
                if t != Vec3::ZERO {
                    last = t;
                }
                last
            })
            .collect(),
    )
}

/// Parallel-transport (normal, binormal) pairs along the tangents.
fn transport_frames(tangents: &[Vec3]) -> Vec<(Vec3, Vec3)> {
    let mut frames = Vec::with_capacity(tangents.len());
    let mut normal = initial_normal(tangents[0]);
    let mut prev = tangents[0];

    for &tangent in tangents {
        let axis = prev.cross(tangent);
        if axis.length_squared() > 1e-12 {
            let angle = prev.dot(tangent).clamp(-1.0, 1.0).acos();
            normal = glam::Quat::from_axis_angle(axis.normalize(), angle) * normal;
        }
        // Re-orthogonalise against drift
        normal = (normal - tangent * tangent.dot(normal)).normalize_or_zero();
        if normal == Vec3::ZERO {
            normal = initial_normal(tangent);
        }
        frames.push((normal, tangent.cross(normal)));
        prev = tangent;
    }
    frames
}

/// Any unit vector perpendicular to `tangent`, built from its smallest axis.
fn initial_normal(tangent: Vec3) -> Vec3 {
    let abs = tangent.abs();
    let axis = if abs.x <= abs.y && abs.x <= abs.z {
        Vec3::X
    } else if abs.y <= abs.z {
        Vec3::Y
    } else {
        Vec3::Z
    };
    tangent.cross(axis).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bend() -> Vec<Vec3> {
        vec![
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.5, 0.2, 2.0),
            Vec3::new(1.5, 0.2, 2.5),
        ]
    }

    #[test]
    fn two_samples_produce_no_tube() {
        let points = [Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)];
        assert!(build_tube(&points, &TubeConfig::default()).is_none());
    }

    #[test]
    fn too_few_samples_produce_no_tube() {
        assert!(build_tube(&[], &TubeConfig::default()).is_none());
        assert!(build_tube(&[Vec3::ONE], &TubeConfig::default()).is_none());
    }

    #[test]
    fn coincident_samples_produce_no_tube() {
        let points = [Vec3::ONE; 10];
        assert!(build_tube(&points, &TubeConfig::default()).is_none());
    }

    #[test]
    fn tube_sizes_follow_config() {
        let config = TubeConfig {
            segments_per_span: 3,
            radial_segments: 8,
            ..Default::default()
        };
        let mesh = build_tube(&bend(), &config).expect("tube");
        let segments = 3 * 3;
        assert_eq!(mesh.positions.len(), (segments + 1) * 9);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert_eq!(mesh.indices.len(), segments * 8 * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn colinear_samples_still_extrude() {
        let points = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0, Vec3::X * 3.0];
        let mesh = build_tube(&points, &TubeConfig::default()).expect("tube");
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
        assert!(mesh.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-4));
    }

    #[test]
    fn ring_radius_tapers_towards_tail() {
        let config = TubeConfig {
            radius: 1.0,
            taper: 0.5,
            segments_per_span: 1,
            radial_segments: 4,
        };
        let points = [Vec3::ZERO, Vec3::Z, Vec3::Z * 2.0];
        let mesh = build_tube(&points, &config).expect("tube");
        let ring = 5;
        let head = mesh.positions[0].distance(Vec3::ZERO);
        let tail = mesh.positions[2 * ring].distance(Vec3::Z * 2.0);
        assert!((head - 1.0).abs() < 1e-4);
        assert!((tail - 0.5).abs() < 1e-4);
    }

    #[test]
    fn oversized_config_is_capped() {
        let points: Vec<Vec3> = (0..50).map(|i| Vec3::Z * i as f32).collect();
        let config = TubeConfig {
            segments_per_span: u32::MAX / 10,
            radial_segments: u32::MAX,
            ..Default::default()
        };
        let mesh = build_tube(&points, &config).expect("tube");
        let ring = MAX_RADIAL_SEGMENTS as usize + 1;
        assert_eq!(mesh.positions.len(), (MAX_TUBE_SEGMENTS + 1) * ring);
        assert_eq!(mesh.indices.len(), MAX_TUBE_SEGMENTS * MAX_RADIAL_SEGMENTS as usize * 6);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.positions.len()));
    }

    #[test]
    fn repeated_head_samples_do_not_produce_nan() {
        // Craft idle for a few frames, then moving
        let points = [Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, Vec3::Z, Vec3::Z * 2.0];
        let mesh = build_tube(&points, &TubeConfig::default()).expect("tube");
        assert!(mesh.positions.iter().all(|p| p.is_finite()));
    }
}
