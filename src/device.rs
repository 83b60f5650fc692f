//! The driver seam.
//!
//! [`PipelineRegistry`](crate::PipelineRegistry) and
//! [`SamplerCache`](crate::SamplerCache) never talk to OpenGL directly; they
//! go through a [`Device`]. The `glow` backend is
//! [`GlDevice`](crate::GlDevice).

use std::fmt;

use crate::error::Result;
use crate::pipeline::{ComputePipelineInfo, GraphicsPipelineDesc, GraphicsPipelineInfo};
use crate::sampler::SamplerState;

/// Creates, binds and destroys driver objects.
///
/// Implementations are driven from the thread owning the graphics context.
/// Object types are plain `Copy` names; ownership is tracked by the registry
/// and cache, never by the device.
pub trait Device {
    /// Driver object backing a graphics pipeline.
    type GraphicsPipeline: Copy + fmt::Debug;
    /// Driver object backing a compute pipeline.
    type ComputePipeline: Copy + fmt::Debug;
    /// Driver sampler object.
    type Sampler: Copy + Eq + fmt::Debug;

    /// Compile and link every stage of `info`.
    ///
    /// # Errors
    ///
    /// [`Error::Compilation`](crate::Error::Compilation) carrying the driver
    /// log when a stage fails to compile or the program fails to link, or
    /// [`Error::Driver`](crate::Error::Driver) if object creation fails. No
    /// driver object may be left alive on error.
    ///
    /// Backends with vertex array state may leave none bound on return.
    fn create_graphics_pipeline(
        &self,
        info: &GraphicsPipelineInfo<'_>,
    ) -> Result<Self::GraphicsPipeline>;

    /// Release a graphics pipeline.
    fn destroy_graphics_pipeline(&self, pipeline: Self::GraphicsPipeline);

    /// Make `pipeline` current and apply the fixed-function state in `desc`.
    fn bind_graphics_pipeline(&self, pipeline: Self::GraphicsPipeline, desc: &GraphicsPipelineDesc);

    /// Compile and link a compute pipeline.
    ///
    /// # Errors
    ///
    /// Same contract as [`create_graphics_pipeline`](Self::create_graphics_pipeline).
    fn create_compute_pipeline(&self, info: &ComputePipelineInfo<'_>)
        -> Result<Self::ComputePipeline>;

    /// Release a compute pipeline.
    fn destroy_compute_pipeline(&self, pipeline: Self::ComputePipeline);

    /// Make `pipeline` current for dispatch.
    fn bind_compute_pipeline(&self, pipeline: Self::ComputePipeline);

    /// Create a sampler with every field of `state` applied.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`](crate::Error::Driver) if the driver refuses.
    fn create_sampler(&self, state: &SamplerState) -> Result<Self::Sampler>;

    /// Release a sampler.
    fn destroy_sampler(&self, sampler: Self::Sampler);
}
