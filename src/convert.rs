//! State enums to GL enums.

use crate::shader::ShaderStage;
use crate::types::{
    AddressMode, BlendFactor, BlendOp, CompareOp, ComponentType, CullMode, Filter, FrontFace,
    PolygonMode, PrimitiveTopology, StencilOp,
};

/// GL enum values are small enough that the cast is always lossless.
#[expect(clippy::cast_possible_wrap)]
pub(crate) fn as_param(value: u32) -> i32 {
    value as i32
}

pub(crate) fn shader_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Compute => glow::COMPUTE_SHADER,
    }
}

/// Primitive mode for draw calls. Not part of the state applied on bind.
pub(crate) fn primitive_topology(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::PointList => glow::POINTS,
        PrimitiveTopology::LineList => glow::LINES,
        PrimitiveTopology::LineStrip => glow::LINE_STRIP,
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::TriangleFan => glow::TRIANGLE_FAN,
        PrimitiveTopology::PatchList => glow::PATCHES,
    }
}

pub(crate) fn component_type(ty: ComponentType) -> u32 {
    match ty {
        ComponentType::F32 => glow::FLOAT,
        ComponentType::F16 => glow::HALF_FLOAT,
        ComponentType::U8 => glow::UNSIGNED_BYTE,
        ComponentType::I8 => glow::BYTE,
        ComponentType::I16 => glow::SHORT,
        ComponentType::U32 => glow::UNSIGNED_INT,
        ComponentType::I32 => glow::INT,
    }
}

pub(crate) fn polygon_mode(mode: PolygonMode) -> u32 {
    match mode {
        PolygonMode::Fill => glow::FILL,
        PolygonMode::Line => glow::LINE,
        PolygonMode::Point => glow::POINT,
    }
}

/// `None` means culling is disabled.
pub(crate) fn cull_mode(mode: CullMode) -> Option<u32> {
    match mode {
        CullMode::None => None,
        CullMode::Front => Some(glow::FRONT),
        CullMode::Back => Some(glow::BACK),
        CullMode::FrontAndBack => Some(glow::FRONT_AND_BACK),
    }
}

pub(crate) fn front_face(face: FrontFace) -> u32 {
    match face {
        FrontFace::CounterClockwise => glow::CCW,
        FrontFace::Clockwise => glow::CW,
    }
}

pub(crate) fn compare_op(op: CompareOp) -> u32 {
    match op {
        CompareOp::Never => glow::NEVER,
        CompareOp::Less => glow::LESS,
        CompareOp::Equal => glow::EQUAL,
        CompareOp::LessOrEqual => glow::LEQUAL,
        CompareOp::Greater => glow::GREATER,
        CompareOp::NotEqual => glow::NOTEQUAL,
        CompareOp::GreaterOrEqual => glow::GEQUAL,
        CompareOp::Always => glow::ALWAYS,
    }
}

pub(crate) fn stencil_op(op: StencilOp) -> u32 {
    match op {
        StencilOp::Keep => glow::KEEP,
        StencilOp::Zero => glow::ZERO,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::IncrementAndClamp => glow::INCR,
        StencilOp::DecrementAndClamp => glow::DECR,
        StencilOp::Invert => glow::INVERT,
        StencilOp::IncrementAndWrap => glow::INCR_WRAP,
        StencilOp::DecrementAndWrap => glow::DECR_WRAP,
    }
}

pub(crate) fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
        BlendFactor::Src1Color => glow::SRC1_COLOR,
        BlendFactor::OneMinusSrc1Color => glow::ONE_MINUS_SRC1_COLOR,
        BlendFactor::Src1Alpha => glow::SRC1_ALPHA,
        BlendFactor::OneMinusSrc1Alpha => glow::ONE_MINUS_SRC1_ALPHA,
    }
}

pub(crate) fn blend_op(op: BlendOp) -> u32 {
    match op {
        BlendOp::Add => glow::FUNC_ADD,
        BlendOp::Subtract => glow::FUNC_SUBTRACT,
        BlendOp::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendOp::Min => glow::MIN,
        BlendOp::Max => glow::MAX,
    }
}

pub(crate) fn address_mode(mode: AddressMode) -> u32 {
    match mode {
        AddressMode::Repeat => glow::REPEAT,
        AddressMode::MirroredRepeat => glow::MIRRORED_REPEAT,
        AddressMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        AddressMode::ClampToBorder => glow::CLAMP_TO_BORDER,
        AddressMode::MirrorClampToEdge => glow::MIRROR_CLAMP_TO_EDGE,
    }
}

/// `GL_TEXTURE_MAG_FILTER` value. A `None` filter falls back to linear.
pub(crate) fn mag_filter(filter: Filter) -> u32 {
    match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::None | Filter::Linear => glow::LINEAR,
    }
}

/// `GL_TEXTURE_MIN_FILTER` value combining the texel and mipmap filters.
pub(crate) fn min_filter(min: Filter, mipmap: Filter) -> u32 {
    match (min, mipmap) {
        (Filter::Nearest, Filter::None) => glow::NEAREST,
        (Filter::Nearest, Filter::Nearest) => glow::NEAREST_MIPMAP_NEAREST,
        (Filter::Nearest, Filter::Linear) => glow::NEAREST_MIPMAP_LINEAR,
        (Filter::None | Filter::Linear, Filter::None) => glow::LINEAR,
        (Filter::None | Filter::Linear, Filter::Nearest) => glow::LINEAR_MIPMAP_NEAREST,
        (Filter::None | Filter::Linear, Filter::Linear) => glow::LINEAR_MIPMAP_LINEAR,
    }
}
