//! Fullscreen quad for the legacy fixed-function family.
//!
//! Modern families synthesize a fullscreen triangle in the vertex shader from
//! the vertex id, so only the legacy family needs a vertex buffer.

use anyhow::{Context, Result};
use hunt_core::{BufferDesc, Device, Format, InputElement, MemoryHeap, Resource, ResourceDesc, ResourceUsage};

use crate::bytes::AsBytes;

/// One quad corner. Position is derived from the UV in the vertex shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadVertex {
    pub uv: [f32; 2],
}

unsafe impl AsBytes for QuadVertex {}

/// Triangle-strip order: top-left, bottom-left, top-right, bottom-right.
pub const FULLSCREEN_QUAD: [QuadVertex; 4] = [
    QuadVertex { uv: [0.0, 0.0] },
    QuadVertex { uv: [0.0, 1.0] },
    QuadVertex { uv: [1.0, 0.0] },
    QuadVertex { uv: [1.0, 1.0] },
];

pub const QUAD_VERTEX_STRIDE: u32 = std::mem::size_of::<QuadVertex>() as u32;

pub const QUAD_INPUT_LAYOUT: [InputElement; 1] = [InputElement {
    location: 0,
    semantic: "TEXCOORD",
    semantic_index: 0,
    format: Format::R32G32Float,
    offset: 0,
    stride: QUAD_VERTEX_STRIDE,
}];

/// Allocate a host-writable vertex buffer and upload [`FULLSCREEN_QUAD`].
/// The buffer is released again if the upload fails.
pub fn create_quad_buffer(device: &dyn Device) -> Result<Resource> {
    let desc = ResourceDesc::Buffer(BufferDesc {
        size: std::mem::size_of_val(&FULLSCREEN_QUAD) as u64,
        heap: MemoryHeap::CpuToGpu,
        usage: ResourceUsage::VERTEX_BUFFER,
    });
    let buffer = device
        .create_resource(&desc, ResourceUsage::CPU_ACCESS)
        .context("failed to create fullscreen quad buffer")?;

    if let Err(e) = device.write_buffer(buffer, 0, FULLSCREEN_QUAD.as_bytes()) {
        device.destroy_resource(buffer);
        return Err(e.context("failed to upload fullscreen quad"));
    }
    Ok(buffer)
}
