//! Embedded blit shader ids.
//!
//! The blit needs one vertex + pixel pair per shader model family. Bytecode
//! is looked up by id in the host-supplied [`ShaderLibrary`](hunt_core::ShaderLibrary).

use hunt_core::{DeviceApi, ShaderId};

pub const FULLSCREEN_VS_3_0: ShaderId = ShaderId(1);
pub const PREVIEW_COPY_PS_3_0: ShaderId = ShaderId(2);
pub const FULLSCREEN_VS_4_0: ShaderId = ShaderId(3);
pub const PREVIEW_COPY_PS_4_0: ShaderId = ShaderId(4);

/// Shader model family a device consumes bytecode for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderFamily {
    /// Shader model 3: quad vertex buffer with a `TEXCOORD` input.
    Legacy,
    /// Shader model 4+: fullscreen triangle from the vertex id.
    Modern,
}

impl ShaderFamily {
    /// Family for `api`, or `None` when no blit shaders are shipped for it.
    pub fn for_api(api: DeviceApi) -> Option<Self> {
        match api {
            DeviceApi::D3D9 => Some(Self::Legacy),
            DeviceApi::D3D10 | DeviceApi::D3D11 | DeviceApi::D3D12 => Some(Self::Modern),
            DeviceApi::OpenGl | DeviceApi::Vulkan => None,
        }
    }

    /// `(vertex, pixel)` shader ids.
    pub fn shader_ids(self) -> (ShaderId, ShaderId) {
        match self {
            Self::Legacy => (FULLSCREEN_VS_3_0, PREVIEW_COPY_PS_3_0),
            Self::Modern => (FULLSCREEN_VS_4_0, PREVIEW_COPY_PS_4_0),
        }
    }
}
