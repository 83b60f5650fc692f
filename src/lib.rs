//! Pipeline registry and sampler cache for OpenGL via [glow].
//!
//! Creating GL programs and samplers is expensive, and a renderer usually
//! wants a small set of them alive for the whole run. This crate owns them
//! behind opaque handles:
//!
//! - [`PipelineRegistry`] compiles graphics and compute pipelines (GLSL
//!   stages plus fixed-function state), stores an owned copy of each
//!   description under a generational handle, and destroys the GL objects
//!   when a handle is released or the registry is dropped.
//! - [`SamplerCache`] hands out exactly one sampler object per distinct
//!   [`SamplerState`] value.
//! - [`Context`] bundles one of each for a graphics context.
//!
//! Both talk to the driver through the [`Device`] trait; [`GlDevice`] is the
//! glow implementation (feature `glow`, on by default).
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use glow_pipeline_cache::*;
//! # fn example(gl: Arc<glow::Context>) -> Result<()> {
//! // SAFETY: `gl` stays current on this thread while `ctx` lives.
//! let mut ctx = Context::new(unsafe { GlDevice::new(gl) });
//!
//! let vs = Shader::fullscreen_triangle();
//! let fs = Shader::from_file(ShaderStage::Fragment, "shaders/ShadeDeferred.frag.glsl")?;
//! let shading = ctx.pipelines.compile_graphics(&GraphicsPipelineInfo {
//!     name: "shading",
//!     rasterization_state: RasterizationState {
//!         cull_mode: CullMode::None,
//!         ..Default::default()
//!     },
//!     ..GraphicsPipelineInfo::new(&vs, Some(&fs))
//! })?;
//!
//! let nearest = ctx.samplers.get_or_create(&SamplerState {
//!     min_filter: Filter::Nearest,
//!     mag_filter: Filter::Nearest,
//!     ..Default::default()
//! })?;
//!
//! // Each frame:
//! ctx.pipelines.bind_graphics(shading)?;
//! # let _ = nearest;
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded and must be driven from the thread
//! owning the GL context. Compilation is synchronous and may take tens of
//! milliseconds.
//!
//! [glow]: https://docs.rs/glow

mod context;
#[cfg(feature = "glow")]
mod convert;
mod device;
mod error;
#[cfg(feature = "glow")]
mod gl;
#[cfg(test)]
mod mock;
mod pipeline;
mod registry;
mod sampler;
mod shader;
mod types;

pub use context::Context;
pub use device::Device;
pub use error::{Error, PipelineKind, Result};
#[cfg(feature = "glow")]
pub use gl::{GlDevice, GlGraphicsPipeline};
pub use pipeline::{
    ColorBlendAttachmentState, ColorBlendState, ColorBlendStateOwned, ComputePipelineDesc,
    ComputePipelineHandle, ComputePipelineInfo, DepthState, GraphicsPipelineDesc,
    GraphicsPipelineHandle, GraphicsPipelineInfo, InputAssemblyState, RasterizationState,
    StencilOpState, StencilState, VertexInputBindingDescription, VertexInputState,
    VertexInputStateOwned,
};
pub use registry::PipelineRegistry;
pub use sampler::{SamplerCache, SamplerState};
pub use shader::{Shader, ShaderStage, FULLSCREEN_TRIANGLE_VERTEX_SRC};
pub use types::{
    AddressMode, BlendFactor, BlendOp, BorderColor, ColorComponentFlags, CompareOp, ComponentType,
    CullMode, Filter, Format, FrontFace, LogicOp, PolygonMode, PrimitiveTopology, SampleCount,
    StencilOp,
};
