//! Rendering: stars, scene fragments, and the trail. Called from `GameState::render()`.

use anyhow::Result;
use engine_core::{SceneFragment, Transform};
use hecs::{Entity, World};
use glam::Mat4;
use procgen::Star;
use renderer::{InstanceData, Mesh, StarInstance};
use std::collections::HashMap;

use crate::light::light_uniform;
use crate::GameState;

/// GPU copies of each entity's fragment meshes, uploaded on first sight.
#[derive(Default)]
pub struct GpuScene {
    meshes: HashMap<Entity, Vec<Mesh>>,
}

impl GpuScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload fragments for new entities and forget ones that left the world.
    fn sync(&mut self, device: &wgpu::Device, world: &World) {
        self.meshes.retain(|entity, _| world.contains(*entity));
        for (entity, fragment) in world.query::<&SceneFragment>().iter() {
            self.meshes.entry(entity).or_insert_with(|| {
                log::debug!("Uploading {} meshes for {:?}", fragment.meshes().len(), entity);
                fragment.meshes().iter().map(|m| Mesh::from_fragment(device, m)).collect()
            });
        }
    }
}

pub fn star_instances(stars: &[Star]) -> Vec<StarInstance> {
    stars
        .iter()
        .map(|star| StarInstance {
            position: star.position.to_array(),
            size: star.size,
            color: [star.color[0], star.color[1], star.color[2], 1.0],
        })
        .collect()
}

/// Run all render passes.
pub fn run(state: &mut GameState) -> Result<()> {
    let ctx = &state.ctx;
    state.renderer.update_camera(&ctx.camera);
    state
        .renderer
        .update_light(&light_uniform(&ctx.light, ctx.sun_direction, &ctx.config.light));

    let Some((output, mut encoder)) = state.renderer.begin_frame()? else {
        return Ok(());
    };
    let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

    state.renderer.render_stars(&mut encoder, &view);

    state.gpu.sync(state.renderer.device(), &ctx.world);

    // Full rebuild: last frame's trail buffers are dropped with this mesh.
    let trail = ctx
        .trail
        .mesh()
        .map(|fragment| (Mesh::from_fragment(state.renderer.device(), fragment), fragment.material));

    let mut draws: Vec<(&Mesh, InstanceData)> = Vec::new();
    let mut query = ctx.world.query::<(&Transform, &SceneFragment)>();
    for (entity, (transform, fragment)) in query.iter() {
        let Some(meshes) = state.gpu.meshes.get(&entity) else {
            continue;
        };
        let model = transform.to_matrix();
        for (mesh, source) in meshes.iter().zip(fragment.meshes()) {
            draws.push((mesh, InstanceData::new(model * source.local, &source.material)));
        }
    }
    if let Some((mesh, material)) = &trail {
        draws.push((mesh, InstanceData::new(Mat4::IDENTITY, material)));
    }

    state.renderer.render_meshes(&mut encoder, &view, &draws);

    state.renderer.end_frame(output, encoder);
    Ok(())
}
