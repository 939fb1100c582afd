//! Staging pair allocated through the host device.
//!
//! One [`StagingPair`] exists per device. It is created lazily by
//! [`StagingPool::recreate`] once the first capture target is known, and
//! reallocated whenever a later target no longer fits.

use std::collections::HashMap;

use anyhow::{Context, Result};
use hunt_core::{
    Device, DeviceId, Format, MemoryHeap, Resource, ResourceDesc, ResourceUsage, ResourceView,
    TextureDesc,
};
use tracing::{debug, warn};

use crate::{PreviewBridge, StagingHandles};

/// A texture with cached render-target and shader-resource views.
struct StagingTexture {
    resource: Resource,
    rtv: ResourceView,
    srv: ResourceView,
}

impl StagingTexture {
    fn new(device: &dyn Device, desc: &TextureDesc, view_format: Format) -> Result<Self> {
        let texture = TextureDesc {
            width: desc.width,
            height: desc.height,
            levels: 1,
            format: desc.format.typeless(),
            heap: MemoryHeap::GpuOnly,
            usage: ResourceUsage::RENDER_TARGET
                | ResourceUsage::SHADER_RESOURCE
                | ResourceUsage::COPY_DEST,
        };
        let resource = device
            .create_resource(&ResourceDesc::Texture(texture), ResourceUsage::SHADER_RESOURCE)
            .context("failed to create staging texture")?;

        let view_format = view_format.default_typed();
        let rtv = match device.create_resource_view(resource, ResourceUsage::RENDER_TARGET, view_format)
        {
            Ok(view) => view,
            Err(e) => {
                device.destroy_resource(resource);
                return Err(e.context("failed to create staging render target view"));
            }
        };
        let srv =
            match device.create_resource_view(resource, ResourceUsage::SHADER_RESOURCE, view_format)
            {
                Ok(view) => view,
                Err(e) => {
                    device.destroy_resource_view(rtv);
                    device.destroy_resource(resource);
                    return Err(e.context("failed to create staging shader resource view"));
                }
            };

        Ok(Self { resource, rtv, srv })
    }

    fn handles(&self) -> StagingHandles {
        StagingHandles {
            resource: self.resource,
            render_target: Some(self.rtv),
            shader_resource: Some(self.srv),
        }
    }

    fn destroy(self, device: &dyn Device) {
        device.destroy_resource_view(self.srv);
        device.destroy_resource_view(self.rtv);
        device.destroy_resource(self.resource);
    }
}

struct StagingPair {
    ping: StagingTexture,
    pong: StagingTexture,
    width: u32,
    height: u32,
    format: Format,
    view_format: Format,
}

impl StagingPair {
    fn new(device: &dyn Device, desc: &TextureDesc, view_format: Format) -> Result<Self> {
        let ping = StagingTexture::new(device, desc, view_format)?;
        let pong = match StagingTexture::new(device, desc, view_format) {
            Ok(pong) => pong,
            Err(e) => {
                ping.destroy(device);
                return Err(e);
            }
        };
        Ok(Self {
            ping,
            pong,
            width: desc.width,
            height: desc.height,
            format: desc.format.typeless(),
            view_format,
        })
    }

    fn fits(&self, desc: &TextureDesc, view_format: Format) -> bool {
        self.width == desc.width
            && self.height == desc.height
            && self.format == desc.format.typeless()
            && self.view_format == view_format
    }

    fn destroy(self, device: &dyn Device) {
        self.ping.destroy(device);
        self.pong.destroy(device);
    }
}

/// [`PreviewBridge`] that owns one staging pair per device.
#[derive(Default)]
pub struct StagingPool {
    pairs: HashMap<DeviceId, StagingPair>,
}

impl StagingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current staging dimensions for `device`.
    pub fn dimensions(&self, device: DeviceId) -> Option<(u32, u32)> {
        self.pairs.get(&device).map(|pair| (pair.width, pair.height))
    }
}

impl PreviewBridge for StagingPool {
    fn ping(&self, device: &dyn Device) -> Option<StagingHandles> {
        self.pairs.get(&device.id()).map(|pair| pair.ping.handles())
    }

    fn pong(&self, device: &dyn Device) -> Option<StagingHandles> {
        self.pairs.get(&device.id()).map(|pair| pair.pong.handles())
    }

    fn is_compatible(&self, device: &dyn Device, resource: Resource, view_format: Format) -> bool {
        let Some(pair) = self.pairs.get(&device.id()) else {
            return false;
        };
        match device.resource_desc(resource) {
            ResourceDesc::Texture(desc) => pair.fits(&desc, view_format),
            ResourceDesc::Buffer(_) => false,
        }
    }

    fn recreate(
        &mut self,
        device: &dyn Device,
        desc: &TextureDesc,
        view_format: Format,
    ) -> Result<()> {
        if let Some(pair) = self.pairs.get(&device.id()) {
            if pair.fits(desc, view_format) {
                return Ok(());
            }
        }

        if let Some(old) = self.pairs.remove(&device.id()) {
            old.destroy(device);
        }

        match StagingPair::new(device, desc, view_format) {
            Ok(pair) => {
                debug!(
                    width = desc.width,
                    height = desc.height,
                    format = ?desc.format,
                    ?view_format,
                    "recreated preview staging pair"
                );
                self.pairs.insert(device.id(), pair);
                Ok(())
            }
            Err(e) => {
                warn!("unable to create preview staging pair: {e:#}");
                Err(e)
            }
        }
    }

    fn cleanup(&mut self, device: &dyn Device) {
        if let Some(pair) = self.pairs.remove(&device.id()) {
            pair.destroy(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    use anyhow::bail;
    use hunt_core::*;

    #[derive(Default)]
    struct CountingDevice {
        next: Cell<u64>,
        descs: RefCell<HashMap<u64, ResourceDesc>>,
        live: RefCell<Vec<u64>>,
        fail_views_after: Cell<Option<u32>>,
        views_created: Cell<u32>,
    }

    impl CountingDevice {
        fn alloc(&self) -> u64 {
            let id = self.next.get() + 1;
            self.next.set(id);
            self.live.borrow_mut().push(id);
            id
        }

        fn release(&self, id: u64) {
            self.live.borrow_mut().retain(|live| *live != id);
        }

        fn insert_texture(&self, desc: TextureDesc) -> Resource {
            let id = self.alloc();
            self.descs.borrow_mut().insert(id, ResourceDesc::Texture(desc));
            self.live.borrow_mut().retain(|live| *live != id);
            Resource::from_raw(id).unwrap()
        }
    }

    impl Device for CountingDevice {
        fn id(&self) -> DeviceId {
            DeviceId(1)
        }

        fn api(&self) -> DeviceApi {
            DeviceApi::D3D11
        }

        fn resource_desc(&self, resource: Resource) -> ResourceDesc {
            self.descs.borrow()[&resource.raw()]
        }

        fn create_pipeline_layout(&self, _: &[DescriptorRange]) -> Result<PipelineLayout> {
            bail!("unused")
        }

        fn create_pipeline(&self, _: PipelineLayout, _: &PipelineDesc<'_>) -> Result<Pipeline> {
            bail!("unused")
        }

        fn create_sampler(&self, _: &SamplerDesc) -> Result<Sampler> {
            bail!("unused")
        }

        fn create_resource(&self, desc: &ResourceDesc, _: ResourceUsage) -> Result<Resource> {
            let id = self.alloc();
            self.descs.borrow_mut().insert(id, *desc);
            Ok(Resource::from_raw(id).unwrap())
        }

        fn create_resource_view(
            &self,
            _: Resource,
            _: ResourceUsage,
            _: Format,
        ) -> Result<ResourceView> {
            let created = self.views_created.get();
            if self.fail_views_after.get() == Some(created) {
                bail!("out of descriptors");
            }
            self.views_created.set(created + 1);
            Ok(ResourceView::from_raw(self.alloc()).unwrap())
        }

        fn write_buffer(&self, _: Resource, _: u64, _: &[u8]) -> Result<()> {
            Ok(())
        }

        fn destroy_resource(&self, resource: Resource) {
            self.release(resource.raw());
        }

        fn destroy_resource_view(&self, view: ResourceView) {
            self.release(view.raw());
        }

        fn destroy_pipeline(&self, _: Pipeline) {}

        fn destroy_pipeline_layout(&self, _: PipelineLayout) {}

        fn destroy_sampler(&self, _: Sampler) {}
    }

    fn target_desc(width: u32, height: u32, format: Format) -> TextureDesc {
        TextureDesc {
            width,
            height,
            levels: 1,
            format,
            heap: MemoryHeap::GpuOnly,
            usage: ResourceUsage::RENDER_TARGET,
        }
    }

    #[test]
    fn empty_pool_is_incompatible() {
        let device = CountingDevice::default();
        let pool = StagingPool::new();
        let target = device.insert_texture(target_desc(64, 64, Format::R8G8B8A8Unorm));

        assert!(!pool.is_compatible(&device, target, Format::R8G8B8A8Unorm));
        assert!(pool.ping(&device).is_none());
        assert!(pool.pong(&device).is_none());
    }

    #[test]
    fn recreate_matches_target() {
        let device = CountingDevice::default();
        let mut pool = StagingPool::new();
        let desc = target_desc(1920, 1080, Format::R8G8B8A8UnormSrgb);
        let target = device.insert_texture(desc);

        pool.recreate(&device, &desc, Format::R8G8B8A8Unorm).unwrap();

        assert!(pool.is_compatible(&device, target, Format::R8G8B8A8Unorm));
        assert!(!pool.is_compatible(&device, target, Format::B8G8R8A8Unorm));
        assert_eq!(pool.dimensions(DeviceId(1)), Some((1920, 1080)));

        let ping = pool.ping(&device).unwrap();
        let pong = pool.pong(&device).unwrap();
        assert_ne!(ping.resource, pong.resource);
        assert!(ping.shader_resource.is_some() && pong.render_target.is_some());

        let resized = device.insert_texture(target_desc(1280, 720, Format::R8G8B8A8Unorm));
        assert!(!pool.is_compatible(&device, resized, Format::R8G8B8A8Unorm));
    }

    #[test]
    fn recreate_releases_previous_pair() {
        let device = CountingDevice::default();
        let mut pool = StagingPool::new();

        pool.recreate(&device, &target_desc(64, 64, Format::R8G8B8A8Unorm), Format::R8G8B8A8Unorm)
            .unwrap();
        assert_eq!(device.live.borrow().len(), 6);

        pool.recreate(&device, &target_desc(32, 32, Format::R8G8B8A8Unorm), Format::R8G8B8A8Unorm)
            .unwrap();
        assert_eq!(device.live.borrow().len(), 6);

        pool.cleanup(&device);
        assert!(device.live.borrow().is_empty());
    }

    #[test]
    fn failed_allocation_leaves_nothing_behind() {
        let device = CountingDevice::default();
        device.fail_views_after.set(Some(3));
        let mut pool = StagingPool::new();

        let result = pool.recreate(
            &device,
            &target_desc(64, 64, Format::R8G8B8A8Unorm),
            Format::R8G8B8A8Unorm,
        );

        assert!(result.is_err());
        assert!(pool.pong(&device).is_none());
        assert!(device.live.borrow().is_empty());
    }
}
