//! Fixed-function and sampler state enums.
//!
//! These are backend-neutral; the GL backend maps them to GL enums in
//! `convert`.

use bitflags::bitflags;

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// `GL_POINTS`
    PointList,
    /// `GL_LINES`
    LineList,
    /// `GL_LINE_STRIP`
    LineStrip,
    /// `GL_TRIANGLES`
    #[default]
    TriangleList,
    /// `GL_TRIANGLE_STRIP`
    TriangleStrip,
    /// `GL_TRIANGLE_FAN`
    TriangleFan,
    /// `GL_PATCHES`
    PatchList,
}

/// Vertex attribute formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// One 32-bit float.
    R32_FLOAT,
    /// Two 32-bit floats.
    R32G32_FLOAT,
    /// Three 32-bit floats.
    R32G32B32_FLOAT,
    /// Four 32-bit floats.
    R32G32B32A32_FLOAT,
    /// Two 16-bit floats.
    R16G16_FLOAT,
    /// Four 16-bit floats.
    R16G16B16A16_FLOAT,
    /// Four normalized unsigned bytes.
    R8G8B8A8_UNORM,
    /// Four normalized signed bytes.
    R8G8B8A8_SNORM,
    /// Two normalized signed shorts.
    R16G16_SNORM,
    /// One 32-bit unsigned integer.
    R32_UINT,
    /// One 32-bit signed integer.
    R32_SINT,
    /// Two 32-bit unsigned integers.
    R32G32_UINT,
    /// Four 32-bit unsigned integers.
    R32G32B32A32_UINT,
}

/// Scalar type of each component of a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    /// 32-bit float.
    F32,
    /// 16-bit float.
    F16,
    /// 8-bit unsigned.
    U8,
    /// 8-bit signed.
    I8,
    /// 16-bit signed.
    I16,
    /// 32-bit unsigned.
    U32,
    /// 32-bit signed.
    I32,
}

impl Format {
    /// Number of components (1..=4).
    pub fn component_count(self) -> u32 {
        match self {
            Self::R32_FLOAT | Self::R32_UINT | Self::R32_SINT => 1,
            Self::R32G32_FLOAT | Self::R16G16_FLOAT | Self::R16G16_SNORM | Self::R32G32_UINT => 2,
            Self::R32G32B32_FLOAT => 3,
            Self::R32G32B32A32_FLOAT
            | Self::R16G16B16A16_FLOAT
            | Self::R8G8B8A8_UNORM
            | Self::R8G8B8A8_SNORM
            | Self::R32G32B32A32_UINT => 4,
        }
    }

    /// Scalar type of each component.
    pub fn component_type(self) -> ComponentType {
        match self {
            Self::R32_FLOAT
            | Self::R32G32_FLOAT
            | Self::R32G32B32_FLOAT
            | Self::R32G32B32A32_FLOAT => ComponentType::F32,
            Self::R16G16_FLOAT | Self::R16G16B16A16_FLOAT => ComponentType::F16,
            Self::R8G8B8A8_UNORM => ComponentType::U8,
            Self::R8G8B8A8_SNORM => ComponentType::I8,
            Self::R16G16_SNORM => ComponentType::I16,
            Self::R32_UINT | Self::R32G32_UINT | Self::R32G32B32A32_UINT => ComponentType::U32,
            Self::R32_SINT => ComponentType::I32,
        }
    }

    /// Whether integer components are normalized to `[0, 1]` / `[-1, 1]`.
    pub fn is_normalized(self) -> bool {
        matches!(
            self,
            Self::R8G8B8A8_UNORM | Self::R8G8B8A8_SNORM | Self::R16G16_SNORM
        )
    }

    /// Whether the attribute reaches the shader as an integer (`ivec`/`uvec`).
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::R32_UINT | Self::R32_SINT | Self::R32G32_UINT | Self::R32G32B32A32_UINT
        )
    }
}

/// Polygon rasterization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PolygonMode {
    /// Filled polygons.
    #[default]
    Fill,
    /// Edges only.
    Line,
    /// Vertices only.
    Point,
}

/// Which faces are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Culling disabled.
    None,
    /// Cull front faces.
    Front,
    /// Cull back faces.
    #[default]
    Back,
    /// Cull everything.
    FrontAndBack,
}

/// Winding order of front faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrontFace {
    /// Counter-clockwise is front.
    #[default]
    CounterClockwise,
    /// Clockwise is front.
    Clockwise,
}

/// Comparison function for depth, stencil and shadow samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompareOp {
    /// Never passes.
    Never,
    /// `a < b`
    #[default]
    Less,
    /// `a == b`
    Equal,
    /// `a <= b`
    LessOrEqual,
    /// `a > b`
    Greater,
    /// `a != b`
    NotEqual,
    /// `a >= b`
    GreaterOrEqual,
    /// Always passes.
    Always,
}

/// Stencil buffer update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StencilOp {
    /// Keep the current value.
    #[default]
    Keep,
    /// Set to zero.
    Zero,
    /// Set to the reference value.
    Replace,
    /// Increment, clamping at the maximum.
    IncrementAndClamp,
    /// Decrement, clamping at zero.
    DecrementAndClamp,
    /// Bitwise invert.
    Invert,
    /// Increment, wrapping to zero.
    IncrementAndWrap,
    /// Decrement, wrapping to the maximum.
    DecrementAndWrap,
}

/// Source/destination blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
    Src1Color,
    OneMinusSrc1Color,
    Src1Alpha,
    OneMinusSrc1Alpha,
}

/// Blend equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum BlendOp {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Framebuffer logic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum LogicOp {
    Clear,
    Set,
    #[default]
    Copy,
    CopyInverted,
    NoOp,
    Invert,
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Equivalent,
    AndReverse,
    AndInverted,
    OrReverse,
    OrInverted,
}

bitflags! {
    /// Color channels written by a blend attachment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorComponentFlags: u8 {
        /// Red channel.
        const R = 1 << 0;
        /// Green channel.
        const G = 1 << 1;
        /// Blue channel.
        const B = 1 << 2;
        /// Alpha channel.
        const A = 1 << 3;
        /// All four channels.
        const RGBA = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

impl Default for ColorComponentFlags {
    fn default() -> Self {
        Self::RGBA
    }
}

/// Texture filtering mode. `None` is only meaningful as a mipmap filter;
/// as a min or mag filter it behaves like `Linear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// No mipmapping (mipmap filter only).
    None,
    /// Nearest texel.
    Nearest,
    /// Linear interpolation.
    Linear,
}

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    /// Tile.
    #[default]
    Repeat,
    /// Tile, mirroring every other repetition.
    MirroredRepeat,
    /// Clamp to the edge texel.
    ClampToEdge,
    /// Clamp to the border color.
    ClampToBorder,
    /// Mirror once then clamp to edge.
    MirrorClampToEdge,
}

/// Border color used with [`AddressMode::ClampToBorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum BorderColor {
    FloatTransparentBlack,
    IntTransparentBlack,
    FloatOpaqueBlack,
    IntOpaqueBlack,
    #[default]
    FloatOpaqueWhite,
    IntOpaqueWhite,
}

impl BorderColor {
    /// RGBA value of the border, as passed to `GL_TEXTURE_BORDER_COLOR`.
    pub fn rgba(self) -> [f32; 4] {
        match self {
            Self::FloatTransparentBlack | Self::IntTransparentBlack => [0.0, 0.0, 0.0, 0.0],
            Self::FloatOpaqueBlack | Self::IntOpaqueBlack => [0.0, 0.0, 0.0, 1.0],
            Self::FloatOpaqueWhite | Self::IntOpaqueWhite => [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Maximum anisotropic filtering samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(missing_docs)]
pub enum SampleCount {
    #[default]
    Samples1,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl SampleCount {
    /// Numeric sample count.
    pub fn count(self) -> u32 {
        match self {
            Self::Samples1 => 1,
            Self::Samples2 => 2,
            Self::Samples4 => 4,
            Self::Samples8 => 8,
            Self::Samples16 => 16,
        }
    }
}
