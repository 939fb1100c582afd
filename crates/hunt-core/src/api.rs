//! Opaque handles, formats and descriptors shared with the host.
//!
//! Raw values follow the host's graphics abstraction: handle value `0` is the
//! null handle, [`DeviceApi`] and [`Format`] carry the host's numeric codes so
//! they can be converted with [`DeviceApi::from_raw`] / [`Format::from_raw`].

use std::num::NonZeroU64;

use bitflags::bitflags;
use num_derive::{FromPrimitive, ToPrimitive};

// =====================================================================
// Handles
// =====================================================================

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $name(NonZeroU64);

        impl $name {
            /// Wrap a raw host handle. The null handle maps to `None`.
            pub const fn from_raw(raw: u64) -> Option<Self> {
                match NonZeroU64::new(raw) {
                    Some(value) => Some(Self(value)),
                    None => None,
                }
            }

            /// The raw host value of this handle.
            pub const fn raw(self) -> u64 {
                self.0.get()
            }
        }
    };
}

define_handle!(
    /// A texture or buffer owned by the host or created through [`crate::Device`].
    Resource
);
define_handle!(
    /// A render-target or shader-resource view of a [`Resource`].
    ResourceView
);
define_handle!(
    /// A compiled graphics pipeline state object.
    Pipeline
);
define_handle!(
    /// A root signature / descriptor layout.
    PipelineLayout
);
define_handle!(
    /// A sampler state object.
    Sampler
);
define_handle!(
    /// A post-processing technique owned by the effect runtime.
    Technique
);

/// Opaque identity of a host device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u64);

/// Opaque identity of a host command list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandListId(pub u64);

// =====================================================================
// Device API families
// =====================================================================

/// Graphics API a host device runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum DeviceApi {
    D3D9 = 0x9000,
    D3D10 = 0xa000,
    D3D11 = 0xb000,
    D3D12 = 0xc000,
    OpenGl = 0x10000,
    Vulkan = 0x20000,
}

impl DeviceApi {
    pub fn from_raw(raw: u32) -> Option<Self> {
        <Self as num_traits::FromPrimitive>::from_u32(raw)
    }

    /// Direct3D 9 is the only family still driven through the fixed-function
    /// input assembler (explicit vertex buffer, strip topology).
    pub fn is_legacy(self) -> bool {
        self == Self::D3D9
    }

    pub fn is_direct3d(self) -> bool {
        matches!(self, Self::D3D9 | Self::D3D10 | Self::D3D11 | Self::D3D12)
    }
}

// =====================================================================
// Formats
// =====================================================================

/// Texel formats, numbered like their DXGI counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum Format {
    #[default]
    Unknown = 0,
    R16G16B16A16Typeless = 9,
    R16G16B16A16Float = 10,
    R32G32Float = 16,
    R10G10B10A2Typeless = 23,
    R10G10B10A2Unorm = 24,
    R11G11B10Float = 26,
    R8G8B8A8Typeless = 27,
    R8G8B8A8Unorm = 28,
    R8G8B8A8UnormSrgb = 29,
    B8G8R8A8Unorm = 87,
    B8G8R8A8Typeless = 90,
    B8G8R8A8UnormSrgb = 91,
}

impl Format {
    pub fn from_raw(raw: u32) -> Option<Self> {
        <Self as num_traits::FromPrimitive>::from_u32(raw)
    }

    /// The typeless member of this format's family.
    pub const fn typeless(self) -> Self {
        match self {
            Self::R16G16B16A16Typeless | Self::R16G16B16A16Float => Self::R16G16B16A16Typeless,
            Self::R10G10B10A2Typeless | Self::R10G10B10A2Unorm => Self::R10G10B10A2Typeless,
            Self::R8G8B8A8Typeless | Self::R8G8B8A8Unorm | Self::R8G8B8A8UnormSrgb => {
                Self::R8G8B8A8Typeless
            }
            Self::B8G8R8A8Typeless | Self::B8G8R8A8Unorm | Self::B8G8R8A8UnormSrgb => {
                Self::B8G8R8A8Typeless
            }
            other => other,
        }
    }

    /// Convert a typeless format to the typed format views default to.
    /// Typed formats are returned unchanged.
    pub const fn default_typed(self) -> Self {
        match self {
            Self::R16G16B16A16Typeless => Self::R16G16B16A16Float,
            Self::R10G10B10A2Typeless => Self::R10G10B10A2Unorm,
            Self::R8G8B8A8Typeless => Self::R8G8B8A8Unorm,
            Self::B8G8R8A8Typeless => Self::B8G8R8A8Unorm,
            other => other,
        }
    }
}

// =====================================================================
// Resources
// =====================================================================

bitflags! {
    /// How a resource is, or may be, used by the pipeline.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ResourceUsage: u32 {
        const DEPTH_STENCIL = 1 << 0;
        const RENDER_TARGET = 1 << 1;
        const SHADER_RESOURCE = 1 << 2;
        const UNORDERED_ACCESS = 1 << 3;
        const COPY_DEST = 1 << 4;
        const COPY_SOURCE = 1 << 5;
        const VERTEX_BUFFER = 1 << 6;
        const CPU_ACCESS = 1 << 7;
    }
}

/// Memory heap a resource is allocated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryHeap {
    #[default]
    GpuOnly,
    /// Host-writable memory visible to the GPU (upload heap).
    CpuToGpu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub levels: u16,
    pub format: Format,
    pub heap: MemoryHeap,
    pub usage: ResourceUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDesc {
    pub size: u64,
    pub heap: MemoryHeap,
    pub usage: ResourceUsage,
}

/// Description of a resource as declared at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDesc {
    Texture(TextureDesc),
    Buffer(BufferDesc),
}

impl ResourceDesc {
    pub fn as_texture(&self) -> Option<&TextureDesc> {
        match self {
            Self::Texture(texture) => Some(texture),
            Self::Buffer(_) => None,
        }
    }
}

// =====================================================================
// Pipeline state
// =====================================================================

bitflags! {
    /// Shader stages a descriptor range or push is visible to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX = 1 << 0;
        const PIXEL = 1 << 4;
        const COMPUTE = 1 << 5;
        const ALL_GRAPHICS = Self::VERTEX.bits() | Self::PIXEL.bits();
    }
}

bitflags! {
    /// Per-channel enables of a render target's blend stage.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u8 {
        const RED = 0x1;
        const GREEN = 0x2;
        const BLUE = 0x4;
        const ALPHA = 0x8;
        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits();
        const ALL = Self::COLOR.bits() | Self::ALPHA.bits();
    }
}

/// Pipeline stages affected by [`crate::CommandList::bind_pipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    AllGraphics,
    Compute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    MinMagMipPoint,
    MinMagMipLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Wrap,
    Clamp,
    Border,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerDesc {
    pub filter: FilterMode,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorType {
    Sampler,
    ShaderResourceView,
}

/// One parameter of a pipeline layout: a contiguous range of descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorRange {
    pub binding: u32,
    pub count: u32,
    pub visibility: ShaderStages,
    pub ty: DescriptorType,
}

/// Descriptors pushed directly into a layout parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorUpdate<'a> {
    Samplers(&'a [Sampler]),
    ShaderResourceViews(&'a [ResourceView]),
}

/// A single vertex attribute of the input assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputElement {
    pub location: u32,
    pub semantic: &'static str,
    pub semantic_index: u32,
    pub format: Format,
    pub offset: u32,
    pub stride: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendDesc {
    pub blend_enable: bool,
    pub render_target_write_mask: ColorWriteMask,
}

impl Default for BlendDesc {
    fn default() -> Self {
        Self {
            blend_enable: false,
            render_target_write_mask: ColorWriteMask::ALL,
        }
    }
}

/// Everything needed to build a graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineDesc<'a> {
    pub vertex_shader: &'a [u8],
    pub pixel_shader: &'a [u8],
    /// Empty when the vertex shader synthesizes its own vertices.
    pub input_layout: &'a [InputElement],
    pub topology: PrimitiveTopology,
    pub blend: BlendDesc,
    pub render_target_formats: &'a [Format],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

// =====================================================================
// Runtime effects
// =====================================================================

/// Built-in post-processing effects the preview can run over the captured
/// image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialEffect {
    Flip,
    TonemapToSdr,
}
