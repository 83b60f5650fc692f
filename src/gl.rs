//! [`Device`] implementation on top of [glow].
//!
//! Programs are linked from GLSL with the stage objects deleted right after
//! linking, so a pipeline only owns its program (plus a vertex array object
//! for graphics pipelines). Fixed-function state is not baked into GL
//! objects; it is re-applied every time a pipeline is bound.
//!
//! [glow]: https://docs.rs/glow

use std::sync::Arc;

use glow::HasContext;

use crate::convert::{self, as_param};
use crate::device::Device;
use crate::error::{Error, Result};
use crate::pipeline::{
    ComputePipelineInfo, GraphicsPipelineDesc, GraphicsPipelineInfo, StencilOpState,
    VertexInputBindingDescription,
};
use crate::sampler::SamplerState;
use crate::shader::Shader;
use crate::types::{ColorComponentFlags, SampleCount};

/// GL objects backing a graphics pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlGraphicsPipeline {
    /// Linked program.
    pub program: glow::Program,
    /// Vertex array object holding the vertex input layout. Vertex and index
    /// buffers are bound to it by the caller.
    pub vao: glow::VertexArray,
}

/// OpenGL 4.6 driver.
///
/// Cloning shares the same context.
#[derive(Clone)]
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    /// Wrap a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as this device,
    /// or any registry or cache built on it, is used or dropped. Every
    /// [`Device`] method issues raw GL calls under that assumption.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// The wrapped context.
    pub fn context(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    /// GL primitive mode (`GL_TRIANGLES`, ...) for draws with this pipeline.
    pub fn primitive_mode(desc: &GraphicsPipelineDesc) -> u32 {
        convert::primitive_topology(desc.input_assembly_state.topology)
    }
}

impl Device for GlDevice {
    type GraphicsPipeline = GlGraphicsPipeline;
    type ComputePipeline = glow::Program;
    type Sampler = glow::Sampler;

    fn create_graphics_pipeline(
        &self,
        info: &GraphicsPipelineInfo<'_>,
    ) -> Result<GlGraphicsPipeline> {
        let gl = &*self.gl;
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe {
            let program = link_program(gl, info.name, info.shaders())?;
            let vao = match create_vertex_array(
                gl,
                info.vertex_input_state.vertex_binding_descriptions,
            ) {
                Ok(vao) => vao,
                Err(err) => {
                    gl.delete_program(program);
                    return Err(err);
                }
            };
            Ok(GlGraphicsPipeline { program, vao })
        }
    }

    fn destroy_graphics_pipeline(&self, pipeline: GlGraphicsPipeline) {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe {
            self.gl.delete_vertex_array(pipeline.vao);
            self.gl.delete_program(pipeline.program);
        }
    }

    fn bind_graphics_pipeline(&self, pipeline: GlGraphicsPipeline, desc: &GraphicsPipelineDesc) {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe {
            self.gl.use_program(Some(pipeline.program));
            self.gl.bind_vertex_array(Some(pipeline.vao));
            apply_fixed_function_state(&self.gl, desc);
        }
    }

    fn create_compute_pipeline(&self, info: &ComputePipelineInfo<'_>) -> Result<glow::Program> {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe { link_program(&self.gl, info.name, std::iter::once(info.shader)) }
    }

    fn destroy_compute_pipeline(&self, pipeline: glow::Program) {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe { self.gl.delete_program(pipeline) };
    }

    fn bind_compute_pipeline(&self, pipeline: glow::Program) {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe { self.gl.use_program(Some(pipeline)) };
    }

    fn create_sampler(&self, state: &SamplerState) -> Result<glow::Sampler> {
        let gl = &*self.gl;
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe {
            let sampler = gl.create_sampler()?;
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_MIN_FILTER,
                as_param(convert::min_filter(state.min_filter, state.mipmap_filter)),
            );
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_MAG_FILTER,
                as_param(convert::mag_filter(state.mag_filter)),
            );
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_WRAP_S,
                as_param(convert::address_mode(state.address_mode_u)),
            );
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_WRAP_T,
                as_param(convert::address_mode(state.address_mode_v)),
            );
            gl.sampler_parameter_i32(
                sampler,
                glow::TEXTURE_WRAP_R,
                as_param(convert::address_mode(state.address_mode_w)),
            );
            gl.sampler_parameter_f32_slice(
                sampler,
                glow::TEXTURE_BORDER_COLOR,
                &state.border_color.rgba(),
            );

            if state.anisotropy != SampleCount::Samples1 {
                #[expect(clippy::cast_precision_loss)]
                let max = state.anisotropy.count() as f32;
                gl.sampler_parameter_f32(sampler, glow::TEXTURE_MAX_ANISOTROPY, max);
            }

            match state.compare_op {
                Some(op) => {
                    gl.sampler_parameter_i32(
                        sampler,
                        glow::TEXTURE_COMPARE_MODE,
                        as_param(glow::COMPARE_REF_TO_TEXTURE),
                    );
                    gl.sampler_parameter_i32(
                        sampler,
                        glow::TEXTURE_COMPARE_FUNC,
                        as_param(convert::compare_op(op)),
                    );
                }
                None => {
                    gl.sampler_parameter_i32(
                        sampler,
                        glow::TEXTURE_COMPARE_MODE,
                        as_param(glow::NONE),
                    );
                }
            }

            gl.sampler_parameter_f32(sampler, glow::TEXTURE_LOD_BIAS, state.lod_bias);
            gl.sampler_parameter_f32(sampler, glow::TEXTURE_MIN_LOD, state.min_lod);
            gl.sampler_parameter_f32(sampler, glow::TEXTURE_MAX_LOD, state.max_lod);

            Ok(sampler)
        }
    }

    fn destroy_sampler(&self, sampler: glow::Sampler) {
        // SAFETY: the context is current per `GlDevice::new`.
        unsafe { self.gl.delete_sampler(sampler) };
    }
}

/// Compile every stage and link them into one program.
///
/// Stage objects are deleted whether or not linking succeeds.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn link_program<'a>(
    gl: &glow::Context,
    name: &str,
    shaders: impl Iterator<Item = &'a Shader>,
) -> Result<glow::Program> {
    let program = unsafe { gl.create_program() }?;

    let mut stages = Vec::with_capacity(2);
    for shader in shaders {
        match unsafe { compile_shader(gl, name, shader) } {
            Ok(stage) => stages.push(stage),
            Err(err) => {
                unsafe {
                    for stage in stages {
                        gl.delete_shader(stage);
                    }
                    gl.delete_program(program);
                }
                return Err(err);
            }
        }
    }

    unsafe {
        for &stage in &stages {
            gl.attach_shader(program, stage);
        }
        gl.link_program(program);
        let linked = gl.get_program_link_status(program);
        let log = if linked {
            String::new()
        } else {
            gl.get_program_info_log(program)
        };

        for stage in stages {
            gl.detach_shader(program, stage);
            gl.delete_shader(stage);
        }

        if !linked {
            gl.delete_program(program);
            return Err(Error::Compilation {
                name: name.to_owned(),
                log: format!("program link error: {log}"),
            });
        }
    }

    Ok(program)
}

/// Compile a single stage from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn compile_shader(gl: &glow::Context, name: &str, shader: &Shader) -> Result<glow::Shader> {
    unsafe {
        let object = gl.create_shader(convert::shader_stage(shader.stage()))?;
        gl.shader_source(object, shader.source());
        gl.compile_shader(object);

        if !gl.get_shader_compile_status(object) {
            let log = gl.get_shader_info_log(object);
            gl.delete_shader(object);
            return Err(Error::Compilation {
                name: name.to_owned(),
                log: format!("{} shader compile error: {log}", shader.stage()),
            });
        }

        Ok(object)
    }
}

/// Build a vertex array object describing `bindings`.
///
/// Leaves no vertex array bound afterwards, replacing whatever binding the
/// caller had.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn create_vertex_array(
    gl: &glow::Context,
    bindings: &[VertexInputBindingDescription],
) -> Result<glow::VertexArray> {
    unsafe {
        let vao = gl.create_vertex_array()?;
        gl.bind_vertex_array(Some(vao));
        for desc in bindings {
            let size = as_param(desc.format.component_count());
            let ty = convert::component_type(desc.format.component_type());
            gl.enable_vertex_attrib_array(desc.location);
            if desc.format.is_integer() {
                gl.vertex_attrib_format_i32(desc.location, size, ty, desc.offset);
            } else {
                gl.vertex_attrib_format_f32(
                    desc.location,
                    size,
                    ty,
                    desc.format.is_normalized(),
                    desc.offset,
                );
            }
            gl.vertex_attrib_binding(desc.location, desc.binding);
        }
        gl.bind_vertex_array(None);
        Ok(vao)
    }
}

unsafe fn set_enabled(gl: &glow::Context, cap: u32, enabled: bool) {
    unsafe {
        if enabled {
            gl.enable(cap);
        } else {
            gl.disable(cap);
        }
    }
}

/// Every `glEnable` / `glDisable` capability a bind sets, with its value.
///
/// All of them are written on every bind so nothing leaks from the
/// previously bound pipeline. `GL_COLOR_LOGIC_OP` is always off since the
/// backend cannot select the op itself.
fn capabilities(desc: &GraphicsPipelineDesc) -> [(u32, bool); 9] {
    let raster = &desc.rasterization_state;
    [
        (
            glow::PRIMITIVE_RESTART_FIXED_INDEX,
            desc.input_assembly_state.primitive_restart_enable,
        ),
        (glow::DEPTH_CLAMP, raster.depth_clamp_enable),
        (
            glow::CULL_FACE,
            convert::cull_mode(raster.cull_mode).is_some(),
        ),
        (glow::POLYGON_OFFSET_FILL, raster.depth_bias_enable),
        (glow::POLYGON_OFFSET_LINE, raster.depth_bias_enable),
        (glow::POLYGON_OFFSET_POINT, raster.depth_bias_enable),
        (glow::DEPTH_TEST, desc.depth_state.depth_test_enable),
        (glow::STENCIL_TEST, desc.stencil_state.stencil_test_enable),
        (glow::COLOR_LOGIC_OP, false),
    ]
}

/// Apply rasterization, depth, stencil and blend state.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
unsafe fn apply_fixed_function_state(gl: &glow::Context, desc: &GraphicsPipelineDesc) {
    let raster = &desc.rasterization_state;
    let depth = &desc.depth_state;
    let stencil = &desc.stencil_state;
    let blend = &desc.color_blend_state;

    unsafe {
        for (cap, enabled) in capabilities(desc) {
            set_enabled(gl, cap, enabled);
        }

        gl.polygon_mode(glow::FRONT_AND_BACK, convert::polygon_mode(raster.polygon_mode));
        if let Some(face) = convert::cull_mode(raster.cull_mode) {
            gl.cull_face(face);
        }
        gl.front_face(convert::front_face(raster.front_face));
        gl.polygon_offset(
            raster.depth_bias_slope_factor,
            raster.depth_bias_constant_factor,
        );
        gl.line_width(raster.line_width);

        gl.depth_mask(depth.depth_write_enable);
        gl.depth_func(convert::compare_op(depth.depth_compare_op));

        if stencil.stencil_test_enable {
            apply_stencil_face(gl, glow::FRONT, &stencil.front);
            apply_stencil_face(gl, glow::BACK, &stencil.back);
        }

        if blend.logic_op_enable {
            log::warn!(
                "pipeline `{}`: logic op {:?} is not supported by the GL backend, ignoring",
                desc.name,
                blend.logic_op
            );
        }
        for (index, attachment) in blend.attachments.iter().enumerate() {
            let Ok(buffer) = u32::try_from(index) else {
                break;
            };
            if attachment.blend_enable {
                gl.enable_draw_buffer(glow::BLEND, buffer);
                gl.blend_equation_separate_draw_buffer(
                    buffer,
                    convert::blend_op(attachment.color_blend_op),
                    convert::blend_op(attachment.alpha_blend_op),
                );
                gl.blend_func_separate_draw_buffer(
                    buffer,
                    convert::blend_factor(attachment.src_color_blend_factor),
                    convert::blend_factor(attachment.dst_color_blend_factor),
                    convert::blend_factor(attachment.src_alpha_blend_factor),
                    convert::blend_factor(attachment.dst_alpha_blend_factor),
                );
            } else {
                gl.disable_draw_buffer(glow::BLEND, buffer);
            }
            let mask = attachment.color_write_mask;
            gl.color_mask_draw_buffer(
                buffer,
                mask.contains(ColorComponentFlags::R),
                mask.contains(ColorComponentFlags::G),
                mask.contains(ColorComponentFlags::B),
                mask.contains(ColorComponentFlags::A),
            );
        }
        let [r, g, b, a] = blend.blend_constants;
        gl.blend_color(r, g, b, a);
    }
}

unsafe fn apply_stencil_face(gl: &glow::Context, face: u32, state: &StencilOpState) {
    // References above i32::MAX are clamped by GL to the stencil range anyway.
    let reference = i32::try_from(state.reference).unwrap_or(i32::MAX);
    unsafe {
        gl.stencil_op_separate(
            face,
            convert::stencil_op(state.fail_op),
            convert::stencil_op(state.depth_fail_op),
            convert::stencil_op(state.pass_op),
        );
        gl.stencil_func_separate(
            face,
            convert::compare_op(state.compare_op),
            reference,
            state.compare_mask,
        );
        gl.stencil_mask_separate(face, state.write_mask);
    }
}
