//! Traits the host implements for the preview pipeline.
//!
//! [`Device`] and [`CommandList`] mirror the host's graphics abstraction.
//! Every call is made from inside a host callback, on the thread the host
//! delivers that callback on.

use std::collections::HashMap;

use anyhow::Result;

use crate::api::*;
use crate::groups::ToggleGroup;
use crate::inputs::{InvocationFlags, PreviewStage};

/// A host graphics device.
pub trait Device {
    fn id(&self) -> DeviceId;

    fn api(&self) -> DeviceApi;

    fn resource_desc(&self, resource: Resource) -> ResourceDesc;

    fn create_pipeline_layout(&self, params: &[DescriptorRange]) -> Result<PipelineLayout>;

    fn create_pipeline(&self, layout: PipelineLayout, desc: &PipelineDesc<'_>) -> Result<Pipeline>;

    fn create_sampler(&self, desc: &SamplerDesc) -> Result<Sampler>;

    fn create_resource(&self, desc: &ResourceDesc, initial_usage: ResourceUsage)
        -> Result<Resource>;

    fn create_resource_view(
        &self,
        resource: Resource,
        usage: ResourceUsage,
        format: Format,
    ) -> Result<ResourceView>;

    /// Map `buffer` write-only, copy `data` in at `offset`, and unmap.
    fn write_buffer(&self, buffer: Resource, offset: u64, data: &[u8]) -> Result<()>;

    fn destroy_resource(&self, resource: Resource);

    fn destroy_resource_view(&self, view: ResourceView);

    fn destroy_pipeline(&self, pipeline: Pipeline);

    fn destroy_pipeline_layout(&self, layout: PipelineLayout);

    fn destroy_sampler(&self, sampler: Sampler);
}

/// A host command list in the recording state.
pub trait CommandList {
    fn id(&self) -> CommandListId;

    fn device(&self) -> &dyn Device;

    /// Snapshot the current pipeline and binding state through the host's
    /// state tracking.
    fn capture_state(&mut self);

    /// Re-apply the last snapshot taken with [`CommandList::capture_state`].
    fn apply_state(&mut self);

    fn barrier(&mut self, resources: &[Resource], old: &[ResourceUsage], new: &[ResourceUsage]);

    fn copy_resource(&mut self, source: Resource, dest: Resource);

    fn bind_render_targets_and_depth_stencil(
        &mut self,
        render_targets: &[ResourceView],
        depth_stencil: Option<ResourceView>,
    );

    fn bind_pipeline(&mut self, stage: PipelineStage, pipeline: Pipeline);

    fn bind_primitive_topology(&mut self, topology: PrimitiveTopology);

    fn push_descriptors(
        &mut self,
        stages: ShaderStages,
        layout: PipelineLayout,
        param_index: u32,
        update: DescriptorUpdate<'_>,
    );

    fn bind_viewports(&mut self, first: u32, viewports: &[Viewport]);

    fn bind_scissor_rects(&mut self, first: u32, rects: &[Rect]);

    fn bind_vertex_buffer(&mut self, slot: u32, buffer: Resource, offset: u64, stride: u32);

    fn draw(&mut self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32);
}

/// The post-processing runtime that owns the flip and tone-map techniques.
pub trait EffectRuntime {
    fn special_effect(&self, effect: SpecialEffect) -> Option<Technique>;

    fn render_technique(
        &mut self,
        technique: Technique,
        cmd: &mut dyn CommandList,
        source: ResourceView,
        dest: ResourceView,
    );
}

/// A view currently bound for a stage, as reported by the resource tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedView {
    pub resource: Resource,
    /// Format of the view the resource is bound through.
    pub format: Format,
    /// Usage the resource is bound as (render target, unordered access, ...).
    pub usage: ResourceUsage,
}

/// Answers "which resource is bound for stage X right now".
pub trait BoundResourceSource {
    fn current_resource_view(
        &self,
        cmd: &dyn CommandList,
        group: &ToggleGroup,
        stage: PreviewStage,
        match_flags: InvocationFlags,
    ) -> Option<ResolvedView>;
}

/// Small integer id of an embedded shader blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u16);

/// Source of precompiled shader bytecode.
pub trait ShaderLibrary {
    fn shader(&self, id: ShaderId) -> Option<&[u8]>;
}

/// A [`ShaderLibrary`] over blobs embedded in the binary.
///
/// ```rust,ignore
/// let mut shaders = EmbeddedShaders::new();
/// shaders.insert(ShaderId(101), include_bytes!("fullscreen_vs_4_0.cso"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct EmbeddedShaders {
    blobs: HashMap<ShaderId, &'static [u8]>,
}

impl EmbeddedShaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ShaderId, bytecode: &'static [u8]) {
        self.blobs.insert(id, bytecode);
    }

    pub fn with(mut self, id: ShaderId, bytecode: &'static [u8]) -> Self {
        self.insert(id, bytecode);
        self
    }
}

impl ShaderLibrary for EmbeddedShaders {
    fn shader(&self, id: ShaderId) -> Option<&[u8]> {
        self.blobs.get(&id).copied()
    }
}
