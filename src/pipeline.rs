//! Pipeline descriptions.
//!
//! Callers describe a pipeline with the borrowed [`GraphicsPipelineInfo`] /
//! [`ComputePipelineInfo`], whose slices and shader references only have to
//! outlive the compile call. The registry immediately materializes an owned
//! [`GraphicsPipelineDesc`] / [`ComputePipelineDesc`] from them and keeps that
//! for introspection.

use slotmap::{new_key_type, Key};

use crate::shader::{Shader, ShaderStage};
use crate::types::{
    BlendFactor, BlendOp, ColorComponentFlags, CompareOp, CullMode, Format, FrontFace, LogicOp,
    PolygonMode, PrimitiveTopology, StencilOp,
};

new_key_type! {
    /// Opaque handle to a compiled graphics pipeline.
    pub struct GraphicsPipelineHandle;

    /// Opaque handle to a compiled compute pipeline.
    pub struct ComputePipelineHandle;
}

impl GraphicsPipelineHandle {
    /// The opaque 64-bit value of this handle.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

impl ComputePipelineHandle {
    /// The opaque 64-bit value of this handle.
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }
}

/// Primitive assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct InputAssemblyState {
    /// Primitive type.
    pub topology: PrimitiveTopology,
    /// Whether the maximum index value restarts a strip.
    pub primitive_restart_enable: bool,
}

/// One vertex attribute: where it comes from and how it is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexInputBindingDescription {
    /// Shader attribute location.
    pub location: u32,
    /// Vertex buffer binding index the attribute reads from.
    pub binding: u32,
    /// Attribute format.
    pub format: Format,
    /// Byte offset inside the vertex.
    pub offset: u32,
}

/// Rasterizer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizationState {
    /// Clamp depth instead of clipping.
    pub depth_clamp_enable: bool,
    /// Fill, line or point.
    pub polygon_mode: PolygonMode,
    /// Faces to cull.
    pub cull_mode: CullMode,
    /// Front-face winding.
    pub front_face: FrontFace,
    /// Enable polygon offset.
    pub depth_bias_enable: bool,
    /// Constant polygon offset (`units`).
    pub depth_bias_constant_factor: f32,
    /// Slope-scaled polygon offset (`factor`).
    pub depth_bias_slope_factor: f32,
    /// Rasterized line width.
    pub line_width: f32,
    /// Rasterized point size.
    pub point_size: f32,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            depth_clamp_enable: false,
            polygon_mode: PolygonMode::Fill,
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
            depth_bias_enable: false,
            depth_bias_constant_factor: 0.0,
            depth_bias_slope_factor: 0.0,
            line_width: 1.0,
            point_size: 1.0,
        }
    }
}

/// Depth test and write configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthState {
    /// Enable the depth test.
    pub depth_test_enable: bool,
    /// Enable depth writes.
    pub depth_write_enable: bool,
    /// Depth comparison.
    pub depth_compare_op: CompareOp,
}

/// Stencil configuration for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilOpState {
    /// Stencil and depth both passed.
    pub pass_op: StencilOp,
    /// Stencil failed.
    pub fail_op: StencilOp,
    /// Stencil passed, depth failed.
    pub depth_fail_op: StencilOp,
    /// Stencil comparison.
    pub compare_op: CompareOp,
    /// Mask applied before comparing.
    pub compare_mask: u32,
    /// Mask applied on write.
    pub write_mask: u32,
    /// Reference value.
    pub reference: u32,
}

impl Default for StencilOpState {
    fn default() -> Self {
        Self {
            pass_op: StencilOp::Keep,
            fail_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
            compare_mask: 0,
            write_mask: 0,
            reference: 0,
        }
    }
}

/// Stencil test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StencilState {
    /// Enable the stencil test.
    pub stencil_test_enable: bool,
    /// Front-face state.
    pub front: StencilOpState,
    /// Back-face state.
    pub back: StencilOpState,
}

/// Blend configuration for one color attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBlendAttachmentState {
    /// Enable blending. When disabled the source color is written unchanged.
    pub blend_enable: bool,
    /// Source RGB factor.
    pub src_color_blend_factor: BlendFactor,
    /// Destination RGB factor.
    pub dst_color_blend_factor: BlendFactor,
    /// RGB equation.
    pub color_blend_op: BlendOp,
    /// Source alpha factor.
    pub src_alpha_blend_factor: BlendFactor,
    /// Destination alpha factor.
    pub dst_alpha_blend_factor: BlendFactor,
    /// Alpha equation.
    pub alpha_blend_op: BlendOp,
    /// Channels written.
    pub color_write_mask: ColorComponentFlags,
}

impl Default for ColorBlendAttachmentState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_blend_factor: BlendFactor::One,
            dst_color_blend_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_blend_factor: BlendFactor::One,
            dst_alpha_blend_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorComponentFlags::RGBA,
        }
    }
}

/// Blend configuration for all attachments, borrowing the attachment list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorBlendState<'a> {
    /// Enable the logic op (replaces blending).
    pub logic_op_enable: bool,
    /// Logic op to apply.
    pub logic_op: LogicOp,
    /// Per-attachment blend state, indexed by draw buffer.
    pub attachments: &'a [ColorBlendAttachmentState],
    /// Constant blend color.
    pub blend_constants: [f32; 4],
}

/// Vertex input layout, borrowing the attribute list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexInputState<'a> {
    /// Attribute descriptions.
    pub vertex_binding_descriptions: &'a [VertexInputBindingDescription],
}

/// Everything needed to compile a graphics pipeline.
///
/// Only needs to live for the duration of
/// [`PipelineRegistry::compile_graphics`](crate::PipelineRegistry::compile_graphics).
#[derive(Debug, Clone, Copy)]
pub struct GraphicsPipelineInfo<'a> {
    /// Debug name.
    pub name: &'a str,
    /// Vertex stage.
    pub vertex_shader: &'a Shader,
    /// Fragment stage. `None` for depth-only pipelines.
    pub fragment_shader: Option<&'a Shader>,
    /// Primitive assembly.
    pub input_assembly_state: InputAssemblyState,
    /// Vertex attribute layout.
    pub vertex_input_state: VertexInputState<'a>,
    /// Rasterizer state.
    pub rasterization_state: RasterizationState,
    /// Depth state.
    pub depth_state: DepthState,
    /// Stencil state.
    pub stencil_state: StencilState,
    /// Blend state.
    pub color_blend_state: ColorBlendState<'a>,
}

impl<'a> GraphicsPipelineInfo<'a> {
    /// Info with default fixed-function state for the given stages.
    pub fn new(vertex_shader: &'a Shader, fragment_shader: Option<&'a Shader>) -> Self {
        Self {
            name: "",
            vertex_shader,
            fragment_shader,
            input_assembly_state: InputAssemblyState::default(),
            vertex_input_state: VertexInputState::default(),
            rasterization_state: RasterizationState::default(),
            depth_state: DepthState::default(),
            stencil_state: StencilState::default(),
            color_blend_state: ColorBlendState::default(),
        }
    }

    /// Shaders in link order.
    pub fn shaders(&self) -> impl Iterator<Item = &'a Shader> {
        std::iter::once(self.vertex_shader).chain(self.fragment_shader)
    }
}

/// Everything needed to compile a compute pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ComputePipelineInfo<'a> {
    /// Debug name.
    pub name: &'a str,
    /// Compute stage.
    pub shader: &'a Shader,
}

/// Owned copy of [`VertexInputState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexInputStateOwned {
    /// Attribute descriptions.
    pub vertex_binding_descriptions: Vec<VertexInputBindingDescription>,
}

/// Owned copy of [`ColorBlendState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColorBlendStateOwned {
    /// Enable the logic op.
    pub logic_op_enable: bool,
    /// Logic op to apply.
    pub logic_op: LogicOp,
    /// Per-attachment blend state.
    pub attachments: Vec<ColorBlendAttachmentState>,
    /// Constant blend color.
    pub blend_constants: [f32; 4],
}

/// Owned description of a live graphics pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsPipelineDesc {
    /// Debug name.
    pub name: String,
    /// Stages in link order.
    pub stages: Vec<ShaderStage>,
    /// Primitive assembly.
    pub input_assembly_state: InputAssemblyState,
    /// Vertex attribute layout.
    pub vertex_input_state: VertexInputStateOwned,
    /// Rasterizer state.
    pub rasterization_state: RasterizationState,
    /// Depth state.
    pub depth_state: DepthState,
    /// Stencil state.
    pub stencil_state: StencilState,
    /// Blend state.
    pub color_blend_state: ColorBlendStateOwned,
}

impl From<&GraphicsPipelineInfo<'_>> for GraphicsPipelineDesc {
    fn from(info: &GraphicsPipelineInfo<'_>) -> Self {
        let blend = &info.color_blend_state;
        Self {
            name: info.name.to_owned(),
            stages: info.shaders().map(Shader::stage).collect(),
            input_assembly_state: info.input_assembly_state,
            vertex_input_state: VertexInputStateOwned {
                vertex_binding_descriptions: info
                    .vertex_input_state
                    .vertex_binding_descriptions
                    .to_vec(),
            },
            rasterization_state: info.rasterization_state,
            depth_state: info.depth_state,
            stencil_state: info.stencil_state,
            color_blend_state: ColorBlendStateOwned {
                logic_op_enable: blend.logic_op_enable,
                logic_op: blend.logic_op,
                attachments: blend.attachments.to_vec(),
                blend_constants: blend.blend_constants,
            },
        }
    }
}

/// Owned description of a live compute pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputePipelineDesc {
    /// Debug name.
    pub name: String,
}

impl From<&ComputePipelineInfo<'_>> for ComputePipelineDesc {
    fn from(info: &ComputePipelineInfo<'_>) -> Self {
        Self {
            name: info.name.to_owned(),
        }
    }
}
