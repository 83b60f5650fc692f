//! One registry plus one sampler cache per graphics context.

use crate::device::Device;
use crate::registry::PipelineRegistry;
use crate::sampler::SamplerCache;

/// The pipeline registry and sampler cache serving one graphics context.
///
/// This is an ordinary value owned by the rendering subsystem. Dropping it
/// releases every pipeline, then every sampler, so it must be dropped while
/// the context is still current.
pub struct Context<D: Device> {
    /// Compiled pipelines.
    pub pipelines: PipelineRegistry<D>,
    /// Shared samplers.
    pub samplers: SamplerCache<D>,
}

impl<D: Device + Clone> Context<D> {
    /// Empty registry and cache, both driving `device`.
    pub fn new(device: D) -> Self {
        Self {
            pipelines: PipelineRegistry::new(device.clone()),
            samplers: SamplerCache::new(device),
        }
    }
}
