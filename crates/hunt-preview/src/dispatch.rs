//! Blit pipeline creation and the fullscreen copy draw.
//!
//! All pipeline creation and dispatch methods live on [`DeviceScope`].

use anyhow::{anyhow, Result};
use hunt_core::{
    AddressMode, BlendDesc, CommandList, DescriptorRange, DescriptorType, DescriptorUpdate, Device,
    FilterMode, Format, PipelineDesc, PipelineStage, PrimitiveTopology, Rect, ResourceView,
    SamplerDesc, ShaderLibrary, ShaderStages, Viewport,
};
use tracing::{debug, warn};

use crate::buffer::{create_quad_buffer, QUAD_INPUT_LAYOUT, QUAD_VERTEX_STRIDE};
use crate::context::DeviceScope;
use crate::error::{PreviewError, PreviewResult};
use crate::pipeline::{BlitKind, BlitPipeline};
use crate::shaders::ShaderFamily;

/// Render target format of both blit pipelines.
pub const BLIT_TARGET_FORMAT: Format = Format::R8G8B8A8Typeless.default_typed();

const POINT_CLAMP: SamplerDesc = SamplerDesc {
    filter: FilterMode::MinMagMipPoint,
    address_u: AddressMode::Clamp,
    address_v: AddressMode::Clamp,
    address_w: AddressMode::Clamp,
};

/// Slot 0: the sampler. Slot 1: the source view.
const BLIT_LAYOUT: [DescriptorRange; 2] = [
    DescriptorRange {
        binding: 0,
        count: 1,
        visibility: ShaderStages::PIXEL,
        ty: DescriptorType::Sampler,
    },
    DescriptorRange {
        binding: 0,
        count: 1,
        visibility: ShaderStages::PIXEL,
        ty: DescriptorType::ShaderResourceView,
    },
];

const SAMPLER_PARAM: u32 = 0;
const SOURCE_PARAM: u32 = 1;

// ---------------------------------------------------------------------------
// Pipeline creation
// ---------------------------------------------------------------------------

fn create_blit_pipeline(
    device: &dyn Device,
    shaders: &dyn ShaderLibrary,
    family: ShaderFamily,
    kind: BlitKind,
) -> Result<BlitPipeline> {
    let (vs_id, ps_id) = family.shader_ids();
    let vertex_shader = shaders
        .shader(vs_id)
        .ok_or_else(|| anyhow!("vertex shader {vs_id:?} not embedded"))?;
    let pixel_shader = shaders
        .shader(ps_id)
        .ok_or_else(|| anyhow!("pixel shader {ps_id:?} not embedded"))?;

    let input_layout: &[_] = match family {
        ShaderFamily::Legacy => &QUAD_INPUT_LAYOUT,
        ShaderFamily::Modern => &[],
    };
    let desc = PipelineDesc {
        vertex_shader,
        pixel_shader,
        input_layout,
        topology: PrimitiveTopology::TriangleList,
        blend: BlendDesc {
            blend_enable: false,
            render_target_write_mask: kind.write_mask(),
        },
        render_target_formats: &[BLIT_TARGET_FORMAT],
    };

    let sampler = device
        .create_sampler(&POINT_CLAMP)
        .map_err(|e| anyhow!("failed to create blit sampler: {e}"))?;
    let layout = match device.create_pipeline_layout(&BLIT_LAYOUT) {
        Ok(layout) => layout,
        Err(e) => {
            device.destroy_sampler(sampler);
            return Err(anyhow!("failed to create blit pipeline layout: {e}"));
        }
    };
    let pipeline = match device.create_pipeline(layout, &desc) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            device.destroy_pipeline_layout(layout);
            device.destroy_sampler(sampler);
            return Err(anyhow!("failed to create {kind:?} blit pipeline: {e}"));
        }
    };

    Ok(BlitPipeline {
        pipeline,
        layout,
        sampler,
    })
}

impl DeviceScope {
    /// Create both blit pipelines (and the legacy quad) if they do not exist
    /// yet. A pipeline that fails to build is left empty; the other one is
    /// still attempted.
    pub fn init_shaders(
        &mut self,
        device: &dyn Device,
        shaders: &dyn ShaderLibrary,
    ) -> PreviewResult<()> {
        let Some(family) = self.caps.shader_family else {
            return Err(PreviewError::UnsupportedApi(self.caps.api));
        };

        let mut first_error = None;
        for kind in [BlitKind::Copy, BlitKind::AlphaPreservingCopy] {
            let slot = self.blit.slot_mut(kind);
            if slot.is_some() {
                continue;
            }
            match create_blit_pipeline(device, shaders, family, kind) {
                Ok(blit) => {
                    debug!(?kind, api = ?self.caps.api, "created blit pipeline");
                    *slot = Some(blit);
                }
                Err(e) => {
                    warn!("unable to create pipeline: {e:#}");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        if self.caps.needs_explicit_quad_buffer && self.blit.fullscreen_quad.is_none() {
            match create_quad_buffer(device) {
                Ok(buffer) => self.blit.fullscreen_quad = Some(buffer),
                Err(e) => warn!("unable to create fullscreen quad: {e:#}"),
            }
        }

        match first_error {
            Some(e) => Err(PreviewError::PipelineCreation(e)),
            None => Ok(()),
        }
    }

    /// Release every blit object. Safe to call repeatedly.
    pub fn destroy_shaders(&mut self, device: &dyn Device) {
        let blit = std::mem::take(&mut self.blit);

        if let Some(buffer) = blit.fullscreen_quad {
            device.destroy_resource(buffer);
        }
        let pipelines = [blit.copy, blit.alpha_preserving_copy];
        for p in pipelines.iter().flatten() {
            device.destroy_pipeline(p.pipeline);
        }
        for p in pipelines.iter().flatten() {
            device.destroy_pipeline_layout(p.layout);
        }
        for p in pipelines.iter().flatten() {
            device.destroy_sampler(p.sampler);
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Sample `source` into `dest` with all four channels written.
    ///
    /// Returns false if nothing was drawn (no pipeline for this device).
    pub fn copy_resource(
        &self,
        cmd: &mut dyn CommandList,
        source: ResourceView,
        dest: ResourceView,
        width: u32,
        height: u32,
    ) -> bool {
        let drawn = self.apply_shader(cmd, BlitKind::Copy, source, dest, width, height);
        cmd.apply_state();
        drawn
    }

    /// Like [`copy_resource`](Self::copy_resource) but leaves the
    /// destination's alpha channel untouched.
    pub fn copy_resource_mask_alpha(
        &self,
        cmd: &mut dyn CommandList,
        source: ResourceView,
        dest: ResourceView,
        width: u32,
        height: u32,
    ) -> bool {
        let drawn =
            self.apply_shader(cmd, BlitKind::AlphaPreservingCopy, source, dest, width, height);
        cmd.apply_state();
        drawn
    }

    fn apply_shader(
        &self,
        cmd: &mut dyn CommandList,
        kind: BlitKind,
        source: ResourceView,
        dest: ResourceView,
        width: u32,
        height: u32,
    ) -> bool {
        if !self.caps.supports_blit() {
            return false;
        }
        let Some(blit) = self.blit.get(kind) else {
            return false;
        };
        let quad = if self.caps.needs_explicit_quad_buffer {
            match self.blit.fullscreen_quad {
                Some(quad) => Some(quad),
                None => return false,
            }
        } else {
            None
        };

        cmd.capture_state();

        cmd.bind_render_targets_and_depth_stencil(&[dest], None);
        cmd.bind_pipeline(PipelineStage::AllGraphics, blit.pipeline);
        cmd.push_descriptors(
            ShaderStages::PIXEL,
            blit.layout,
            SAMPLER_PARAM,
            DescriptorUpdate::Samplers(&[blit.sampler]),
        );
        cmd.push_descriptors(
            ShaderStages::PIXEL,
            blit.layout,
            SOURCE_PARAM,
            DescriptorUpdate::ShaderResourceViews(&[source]),
        );

        let viewport = Viewport {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        };
        cmd.bind_viewports(0, &[viewport]);
        let scissor = Rect {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        cmd.bind_scissor_rects(0, &[scissor]);

        match quad {
            Some(quad) if self.caps.uses_strip_topology => {
                cmd.bind_primitive_topology(PrimitiveTopology::TriangleStrip);
                cmd.bind_vertex_buffer(0, quad, 0, QUAD_VERTEX_STRIDE);
                cmd.draw(4, 1, 0, 0);
            }
            _ => cmd.draw(3, 1, 0, 0),
        }

        cmd.apply_state();
        true
    }
}
