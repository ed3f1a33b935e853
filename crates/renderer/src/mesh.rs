//! GPU meshes and CPU-side mesh data.

use crate::vertex::Vertex;
use engine_core::FragmentMesh;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32]) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }

    /// Upload one mesh of a scene fragment.
    pub fn from_fragment(device: &wgpu::Device, mesh: &FragmentMesh) -> Self {
        MeshData::from(mesh).upload(device)
    }
}

/// Mesh data before GPU upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload(&self, device: &wgpu::Device) -> Mesh {
        Mesh::new(device, &self.vertices, &self.indices)
    }
}

impl From<&FragmentMesh> for MeshData {
    fn from(mesh: &FragmentMesh) -> Self {
        let vertices = mesh
            .positions
            .iter()
            .zip(mesh.normals.iter())
            .map(|(p, n)| Vertex::new((*p).into(), (*n).into()))
            .collect();
        Self {
            vertices,
            indices: mesh.indices.clone(),
        }
    }
}
