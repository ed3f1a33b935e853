//! Asset loading: glTF files and built-in procedural models.
//!
//! `AssetLoader::load` only records the request. `poll` performs at most one load
//! per call and hands the outcome to the frame loop as a continuation, so nothing
//! a load produces touches the context until the queue is drained.

use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

use engine_core::{FragmentMesh, Material, SceneError, SceneFragment, TaskQueue};
use glam::{Mat4, Vec3};

/// Prefix selecting a procedural model instead of a file.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// Error type for asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load glTF: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("Missing position data for mesh: {0}")]
    MissingPositions(String),

    #[error("Scene contains no meshes: {0}")]
    EmptyScene(String),

    #[error("Unknown built-in asset: {0}")]
    UnknownBuiltin(String),

    #[error("Malformed geometry: {0}")]
    Invalid(#[from] SceneError),
}

/// Where a scene fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// A `.gltf` / `.glb` file.
    Path(PathBuf),
    /// A procedural model, by name (`builtin:<name>`).
    Builtin(String),
}

impl AssetSource {
    pub fn parse(source: &str) -> Self {
        match source.strip_prefix(BUILTIN_PREFIX) {
            Some(name) => AssetSource::Builtin(name.to_string()),
            None => AssetSource::Path(PathBuf::from(source)),
        }
    }
}

impl fmt::Display for AssetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSource::Path(path) => write!(f, "{}", path.display()),
            AssetSource::Builtin(name) => write!(f, "{}{}", BUILTIN_PREFIX, name),
        }
    }
}

type ProgressFn = Box<dyn FnMut(f32)>;
type SuccessFn<C> = Box<dyn FnOnce(&mut C, SceneFragment)>;
type ErrorFn<C> = Box<dyn FnOnce(&mut C, AssetError)>;

struct PendingLoad<C> {
    source: AssetSource,
    on_progress: ProgressFn,
    on_success: SuccessFn<C>,
    on_error: ErrorFn<C>,
}

/// Deferred loader. Requests are served in order, one per `poll`.
pub struct AssetLoader<C> {
    pending: VecDeque<PendingLoad<C>>,
}

impl<C: 'static> Default for AssetLoader<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> AssetLoader<C> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    /// Request a load. Returns immediately; callbacks fire from later polls/drains.
    pub fn load(
        &mut self,
        source: AssetSource,
        on_progress: impl FnMut(f32) + 'static,
        on_success: impl FnOnce(&mut C, SceneFragment) + 'static,
        on_error: impl FnOnce(&mut C, AssetError) + 'static,
    ) {
        log::debug!("Queued asset load: {}", source);
        self.pending.push_back(PendingLoad {
            source,
            on_progress: Box::new(on_progress),
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
        });
    }

    /// Loads still waiting for a poll.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run the oldest pending load and queue its continuation. Returns false if idle.
    pub fn poll(&mut self, tasks: &mut TaskQueue<C>) -> bool {
        let Some(mut request) = self.pending.pop_front() else {
            return false;
        };

        (request.on_progress)(0.0);
        match load_fragment(&request.source) {
            Ok(fragment) => {
                (request.on_progress)(1.0);
                log::info!(
                    "Loaded {} ({} meshes, {} vertices)",
                    request.source,
                    fragment.meshes().len(),
                    fragment.vertex_count()
                );
                let on_success = request.on_success;
                tasks.enqueue(move |ctx| on_success(ctx, fragment));
            }
            Err(err) => {
                let on_error = request.on_error;
                tasks.enqueue(move |ctx| on_error(ctx, err));
            }
        }
        true
    }
}

/// Resolve a source into a validated fragment.
pub fn load_fragment(source: &AssetSource) -> Result<SceneFragment, AssetError> {
    let fragment = match source {
        AssetSource::Builtin(name) => builtin_fragment(name)?,
        AssetSource::Path(path) => load_gltf(path)?,
    };
    fragment.validate()?;
    Ok(fragment)
}

fn builtin_fragment(name: &str) -> Result<SceneFragment, AssetError> {
    match name {
        "sun" => Ok(procgen::sun_fragment()),
        "craft" => Ok(procgen::craft_fragment()),
        other => Err(AssetError::UnknownBuiltin(other.to_string())),
    }
}

/// Load a glTF/GLB file, flattening node transforms into each mesh's local matrix.
pub fn load_gltf(path: &Path) -> Result<SceneFragment, AssetError> {
    std::fs::metadata(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (document, buffers, _images) = gltf::import(path)?;

    let mut meshes = Vec::new();
    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };
    for scene in scenes {
        for node in scene.nodes() {
            process_node(&node, Mat4::IDENTITY, &buffers, &mut meshes)?;
        }
    }

    if meshes.is_empty() {
        return Err(AssetError::EmptyScene(path.display().to_string()));
    }
    Ok(SceneFragment::new(meshes))
}

/// Process a glTF node and its children recursively.
fn process_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<FragmentMesh>,
) -> Result<(), AssetError> {
    let local = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed").to_string();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("Skipping non-triangle primitive in mesh '{}'", name);
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| AssetError::MissingPositions(name.clone()))?
                .map(Vec3::from)
                .collect();

            let indices: Vec<u32> = reader
                .read_indices()
                .map(|iter| iter.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let normals: Vec<Vec3> = match reader.read_normals() {
                Some(iter) => iter.map(Vec3::from).collect(),
                None => smooth_normals(&positions, &indices),
            };

            let material = primitive_material(&primitive.material());
            out.push(
                FragmentMesh::new(name.clone(), positions, normals, indices)
                    .with_local(local)
                    .with_material(material),
            );
        }
    }

    for child in node.children() {
        process_node(&child, local, buffers, out)?;
    }
    Ok(())
}

fn primitive_material(material: &gltf::Material) -> Material {
    let emissive = material.emissive_factor();
    let glowing = emissive.iter().any(|&c| c > 0.0);
    Material {
        base_color: material.pbr_metallic_roughness().base_color_factor(),
        emissive,
        emissive_intensity: if glowing { 1.0 } else { 0.0 },
    }
}

/// Area-weighted vertex normals for meshes that ship without them.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}
