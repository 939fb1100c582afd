//! Recording fakes of the host collaborators.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use anyhow::{bail, Result};
use hunt_core::*;
use hunt_interop::{PreviewBridge, StagingHandles};

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Created {
    Sampler(Sampler),
    Layout(PipelineLayout),
    Pipeline(Pipeline, ColorWriteMask),
    Buffer(Resource),
}

pub struct FakeDevice {
    pub id: DeviceId,
    pub api: DeviceApi,
    next: Cell<u64>,
    descs: RefCell<HashMap<u64, ResourceDesc>>,
    pub live: RefCell<Vec<u64>>,
    pub created: RefCell<Vec<Created>>,
    pub destroyed: RefCell<Vec<u64>>,
    pub buffer_writes: RefCell<Vec<Vec<u8>>>,
    /// Fail the n-th `create_pipeline` call (0-based).
    pub fail_pipeline: Cell<Option<u32>>,
    pipelines_attempted: Cell<u32>,
    pub fail_buffer_write: Cell<bool>,
}

impl FakeDevice {
    pub fn new(api: DeviceApi) -> Self {
        Self {
            id: DeviceId(1),
            api,
            next: Cell::new(100),
            descs: RefCell::default(),
            live: RefCell::default(),
            created: RefCell::default(),
            destroyed: RefCell::default(),
            buffer_writes: RefCell::default(),
            fail_pipeline: Cell::new(None),
            pipelines_attempted: Cell::new(0),
            fail_buffer_write: Cell::new(false),
        }
    }

    fn alloc(&self) -> u64 {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.live.borrow_mut().push(id);
        id
    }

    fn release(&self, id: u64) {
        self.live.borrow_mut().retain(|live| *live != id);
        self.destroyed.borrow_mut().push(id);
    }

    /// Register a host-owned texture the resolver can report.
    pub fn add_texture(&self, desc: TextureDesc) -> Resource {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.descs.borrow_mut().insert(id, ResourceDesc::Texture(desc));
        Resource::from_raw(id).unwrap()
    }

    pub fn add_buffer(&self, size: u64) -> Resource {
        let id = self.next.get() + 1;
        self.next.set(id);
        let desc = BufferDesc {
            size,
            heap: MemoryHeap::GpuOnly,
            usage: ResourceUsage::UNORDERED_ACCESS,
        };
        self.descs.borrow_mut().insert(id, ResourceDesc::Buffer(desc));
        Resource::from_raw(id).unwrap()
    }

    pub fn pipeline_write_masks(&self) -> Vec<ColorWriteMask> {
        self.created
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Created::Pipeline(_, mask) => Some(*mask),
                _ => None,
            })
            .collect()
    }
}

impl Device for FakeDevice {
    fn id(&self) -> DeviceId {
        self.id
    }

    fn api(&self) -> DeviceApi {
        self.api
    }

    fn resource_desc(&self, resource: Resource) -> ResourceDesc {
        self.descs.borrow()[&resource.raw()]
    }

    fn create_pipeline_layout(&self, params: &[DescriptorRange]) -> Result<PipelineLayout> {
        assert_eq!(params.len(), 2);
        let layout = PipelineLayout::from_raw(self.alloc()).unwrap();
        self.created.borrow_mut().push(Created::Layout(layout));
        Ok(layout)
    }

    fn create_pipeline(&self, _: PipelineLayout, desc: &PipelineDesc<'_>) -> Result<Pipeline> {
        let attempt = self.pipelines_attempted.get();
        self.pipelines_attempted.set(attempt + 1);
        if self.fail_pipeline.get() == Some(attempt) {
            bail!("shader compilation failed");
        }
        let pipeline = Pipeline::from_raw(self.alloc()).unwrap();
        self.created
            .borrow_mut()
            .push(Created::Pipeline(pipeline, desc.blend.render_target_write_mask));
        Ok(pipeline)
    }

    fn create_sampler(&self, desc: &SamplerDesc) -> Result<Sampler> {
        assert_eq!(desc.filter, FilterMode::MinMagMipPoint);
        let sampler = Sampler::from_raw(self.alloc()).unwrap();
        self.created.borrow_mut().push(Created::Sampler(sampler));
        Ok(sampler)
    }

    fn create_resource(&self, desc: &ResourceDesc, _: ResourceUsage) -> Result<Resource> {
        let id = self.alloc();
        self.descs.borrow_mut().insert(id, *desc);
        let resource = Resource::from_raw(id).unwrap();
        self.created.borrow_mut().push(Created::Buffer(resource));
        Ok(resource)
    }

    fn create_resource_view(&self, _: Resource, _: ResourceUsage, _: Format) -> Result<ResourceView> {
        Ok(ResourceView::from_raw(self.alloc()).unwrap())
    }

    fn write_buffer(&self, _: Resource, _: u64, data: &[u8]) -> Result<()> {
        if self.fail_buffer_write.get() {
            bail!("map failed");
        }
        self.buffer_writes.borrow_mut().push(data.to_vec());
        Ok(())
    }

    fn destroy_resource(&self, resource: Resource) {
        self.release(resource.raw());
    }

    fn destroy_resource_view(&self, view: ResourceView) {
        self.release(view.raw());
    }

    fn destroy_pipeline(&self, pipeline: Pipeline) {
        self.release(pipeline.raw());
    }

    fn destroy_pipeline_layout(&self, layout: PipelineLayout) {
        self.release(layout.raw());
    }

    fn destroy_sampler(&self, sampler: Sampler) {
        self.release(sampler.raw());
    }
}

// ---------------------------------------------------------------------------
// Command list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CaptureState,
    ApplyState,
    Barrier(Vec<Resource>, Vec<ResourceUsage>, Vec<ResourceUsage>),
    Copy { source: Resource, dest: Resource },
    BindRenderTarget(ResourceView),
    BindPipeline(Pipeline),
    Topology(PrimitiveTopology),
    PushSampler(u32, Sampler),
    PushView(u32, ResourceView),
    Viewport(f32, f32),
    Scissor(Rect),
    VertexBuffer(Resource, u32),
    Draw(u32),
}

pub struct FakeCommandList {
    pub id: CommandListId,
    pub device: FakeDevice,
    pub calls: Vec<Call>,
}

impl FakeCommandList {
    pub fn new(device: FakeDevice) -> Self {
        Self {
            id: CommandListId(7),
            device,
            calls: Vec::new(),
        }
    }

    pub fn copies(&self) -> Vec<(Resource, Resource)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Copy { source, dest } => Some((*source, *dest)),
                _ => None,
            })
            .collect()
    }

    pub fn draws(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, Call::Draw(_))).count()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl CommandList for FakeCommandList {
    fn id(&self) -> CommandListId {
        self.id
    }

    fn device(&self) -> &dyn Device {
        &self.device
    }

    fn capture_state(&mut self) {
        self.calls.push(Call::CaptureState);
    }

    fn apply_state(&mut self) {
        self.calls.push(Call::ApplyState);
    }

    fn barrier(&mut self, resources: &[Resource], old: &[ResourceUsage], new: &[ResourceUsage]) {
        self.calls
            .push(Call::Barrier(resources.to_vec(), old.to_vec(), new.to_vec()));
    }

    fn copy_resource(&mut self, source: Resource, dest: Resource) {
        self.calls.push(Call::Copy { source, dest });
    }

    fn bind_render_targets_and_depth_stencil(
        &mut self,
        render_targets: &[ResourceView],
        depth_stencil: Option<ResourceView>,
    ) {
        assert_eq!(render_targets.len(), 1);
        assert!(depth_stencil.is_none());
        self.calls.push(Call::BindRenderTarget(render_targets[0]));
    }

    fn bind_pipeline(&mut self, stage: PipelineStage, pipeline: Pipeline) {
        assert_eq!(stage, PipelineStage::AllGraphics);
        self.calls.push(Call::BindPipeline(pipeline));
    }

    fn bind_primitive_topology(&mut self, topology: PrimitiveTopology) {
        self.calls.push(Call::Topology(topology));
    }

    fn push_descriptors(
        &mut self,
        stages: ShaderStages,
        _: PipelineLayout,
        param_index: u32,
        update: DescriptorUpdate<'_>,
    ) {
        assert_eq!(stages, ShaderStages::PIXEL);
        match update {
            DescriptorUpdate::Samplers(samplers) => {
                self.calls.push(Call::PushSampler(param_index, samplers[0]))
            }
            DescriptorUpdate::ShaderResourceViews(views) => {
                self.calls.push(Call::PushView(param_index, views[0]))
            }
        }
    }

    fn bind_viewports(&mut self, _: u32, viewports: &[Viewport]) {
        self.calls
            .push(Call::Viewport(viewports[0].width, viewports[0].height));
    }

    fn bind_scissor_rects(&mut self, _: u32, rects: &[Rect]) {
        self.calls.push(Call::Scissor(rects[0]));
    }

    fn bind_vertex_buffer(&mut self, _: u32, buffer: Resource, _: u64, stride: u32) {
        self.calls.push(Call::VertexBuffer(buffer, stride));
    }

    fn draw(&mut self, vertex_count: u32, instance_count: u32, _: u32, _: u32) {
        assert_eq!(instance_count, 1);
        self.calls.push(Call::Draw(vertex_count));
    }
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Reports a fixed view per stage and records each query's stage and match
/// flags.
#[derive(Default)]
pub struct ScriptedResolver {
    pub views: HashMap<PreviewStage, ResolvedView>,
    pub queried: RefCell<Vec<(PreviewStage, InvocationFlags)>>,
}

impl ScriptedResolver {
    pub fn with(mut self, stage: PreviewStage, view: ResolvedView) -> Self {
        self.views.insert(stage, view);
        self
    }
}

impl BoundResourceSource for ScriptedResolver {
    fn current_resource_view(
        &self,
        _: &dyn CommandList,
        _: &ToggleGroup,
        stage: PreviewStage,
        match_flags: InvocationFlags,
    ) -> Option<ResolvedView> {
        self.queried.borrow_mut().push((stage, match_flags));
        self.views.get(&stage).copied()
    }
}

pub struct FakeBridge {
    pub ping: Option<StagingHandles>,
    pub pong: Option<StagingHandles>,
    pub compatible: bool,
    pub recreated: Vec<(TextureDesc, Format)>,
    pub cleanups: u32,
}

pub fn staging(resource: u64, rtv: u64, srv: u64) -> StagingHandles {
    StagingHandles {
        resource: Resource::from_raw(resource).unwrap(),
        render_target: ResourceView::from_raw(rtv),
        shader_resource: ResourceView::from_raw(srv),
    }
}

impl Default for FakeBridge {
    fn default() -> Self {
        Self {
            ping: Some(staging(1, 2, 3)),
            pong: Some(staging(4, 5, 6)),
            compatible: true,
            recreated: Vec::new(),
            cleanups: 0,
        }
    }
}

impl PreviewBridge for FakeBridge {
    fn ping(&self, _: &dyn Device) -> Option<StagingHandles> {
        self.ping
    }

    fn pong(&self, _: &dyn Device) -> Option<StagingHandles> {
        self.pong
    }

    fn is_compatible(&self, _: &dyn Device, _: Resource, _: Format) -> bool {
        self.compatible
    }

    fn recreate(&mut self, _: &dyn Device, desc: &TextureDesc, view_format: Format) -> Result<()> {
        self.recreated.push((*desc, view_format));
        self.compatible = true;
        Ok(())
    }

    fn cleanup(&mut self, _: &dyn Device) {
        self.cleanups += 1;
    }
}

pub const FLIP: u64 = 900;
pub const TONEMAP: u64 = 901;

#[derive(Default)]
pub struct FakeRuntime {
    pub missing: Vec<SpecialEffect>,
    pub rendered: Vec<(Technique, ResourceView, ResourceView)>,
}

impl EffectRuntime for FakeRuntime {
    fn special_effect(&self, effect: SpecialEffect) -> Option<Technique> {
        if self.missing.contains(&effect) {
            return None;
        }
        match effect {
            SpecialEffect::Flip => Technique::from_raw(FLIP),
            SpecialEffect::TonemapToSdr => Technique::from_raw(TONEMAP),
        }
    }

    fn render_technique(
        &mut self,
        technique: Technique,
        _: &mut dyn CommandList,
        source: ResourceView,
        dest: ResourceView,
    ) {
        self.rendered.push((technique, source, dest));
    }
}

pub fn shader_library() -> EmbeddedShaders {
    static BYTECODE: [u8; 4] = [0x44, 0x58, 0x42, 0x43];
    EmbeddedShaders::new()
        .with(ShaderId(1), &BYTECODE)
        .with(ShaderId(2), &BYTECODE)
        .with(ShaderId(3), &BYTECODE)
        .with(ShaderId(4), &BYTECODE)
}

pub fn texture(width: u32, height: u32, format: Format) -> TextureDesc {
    TextureDesc {
        width,
        height,
        levels: 1,
        format,
        heap: MemoryHeap::GpuOnly,
        usage: ResourceUsage::RENDER_TARGET | ResourceUsage::SHADER_RESOURCE,
    }
}
