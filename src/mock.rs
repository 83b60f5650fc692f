//! Recording [`Device`] for unit tests. No GL context involved.
//!
//! "Compiling" a stage only checks that the source has a `main` entry point
//! and balanced delimiters, which is enough to exercise the failure paths.

use std::cell::RefCell;
use std::rc::Rc;

use crate::device::Device;
use crate::error::{Error, Result};
use crate::pipeline::{ComputePipelineInfo, GraphicsPipelineDesc, GraphicsPipelineInfo};
use crate::sampler::SamplerState;
use crate::shader::Shader;

pub(crate) const VERTEX_SRC: &str = r"#version 460 core
layout(location = 0) in vec3 a_pos;
layout(location = 1) in vec2 a_normal;
layout(location = 2) in vec2 a_uv;
void main() {
    gl_Position = vec4(a_pos, 1.0);
}
";

pub(crate) const FRAGMENT_SRC: &str = r"#version 460 core
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(1.0);
}
";

pub(crate) const BROKEN_FRAGMENT_SRC: &str = r"#version 460 core
layout(location = 0) out vec4 o_color;
void main() {
    o_color = vec4(1.0;
";

pub(crate) const COMPUTE_SRC: &str = r"#version 460 core
layout(local_size_x = 8, local_size_y = 8) in;
void main() {
}
";

pub(crate) const BROKEN_COMPUTE_SRC: &str = r"#version 460 core
layout(local_size_x = 8, local_size_y = 8) in;
void main() {
    uvec2 texel = gl_GlobalInvocationID.xy;
";

#[derive(Default)]
struct State {
    next_id: u32,
    compile_calls: usize,
    live_graphics: Vec<u32>,
    live_compute: Vec<u32>,
    live_samplers: Vec<u32>,
    compute_destroyed: usize,
    samplers_created: usize,
    fail_samplers: bool,
    bound_graphics: Option<(u32, GraphicsPipelineDesc)>,
    bound_compute: Option<u32>,
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Cheaply clonable; clones share recorded state.
#[derive(Clone, Default)]
pub(crate) struct MockDevice {
    state: Rc<RefCell<State>>,
}

impl MockDevice {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn compile_calls(&self) -> usize {
        self.state.borrow().compile_calls
    }

    pub(crate) fn live_graphics_pipelines(&self) -> usize {
        self.state.borrow().live_graphics.len()
    }

    pub(crate) fn live_compute_pipelines(&self) -> usize {
        self.state.borrow().live_compute.len()
    }

    pub(crate) fn compute_pipelines_destroyed(&self) -> usize {
        self.state.borrow().compute_destroyed
    }

    pub(crate) fn live_samplers(&self) -> usize {
        self.state.borrow().live_samplers.len()
    }

    pub(crate) fn samplers_created(&self) -> usize {
        self.state.borrow().samplers_created
    }

    pub(crate) fn fail_sampler_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_samplers = fail;
    }

    pub(crate) fn last_bound_graphics(&self) -> Option<(u32, GraphicsPipelineDesc)> {
        self.state.borrow().bound_graphics.clone()
    }

    pub(crate) fn last_bound_compute(&self) -> Option<u32> {
        self.state.borrow().bound_compute
    }

    fn compile<'a>(&self, name: &str, shaders: impl Iterator<Item = &'a Shader>) -> Result<u32> {
        let mut state = self.state.borrow_mut();
        state.compile_calls += 1;
        for shader in shaders {
            check_source(shader.source()).map_err(|log| Error::Compilation {
                name: name.to_owned(),
                log: format!("{} shader: {log}", shader.stage()),
            })?;
        }
        Ok(state.allocate())
    }
}

fn check_source(source: &str) -> std::result::Result<(), String> {
    if !source.contains("void main") {
        return Err("0:0: error: missing entry point `main`".to_owned());
    }
    let mut depth = [0i32; 2];
    for (line_no, line) in source.lines().enumerate() {
        for c in line.chars() {
            match c {
                '(' => depth[0] += 1,
                ')' => depth[0] -= 1,
                '{' => depth[1] += 1,
                '}' => depth[1] -= 1,
                _ => {}
            }
        }
        if depth[0] != 0 {
            return Err(format!("0:{}: error: syntax error, unbalanced `(`", line_no + 1));
        }
    }
    if depth[1] != 0 {
        return Err("0:0: error: syntax error, unexpected end of file".to_owned());
    }
    Ok(())
}

impl Device for MockDevice {
    type GraphicsPipeline = u32;
    type ComputePipeline = u32;
    type Sampler = u32;

    fn create_graphics_pipeline(&self, info: &GraphicsPipelineInfo<'_>) -> Result<u32> {
        let id = self.compile(info.name, info.shaders())?;
        self.state.borrow_mut().live_graphics.push(id);
        Ok(id)
    }

    fn destroy_graphics_pipeline(&self, pipeline: u32) {
        self.state.borrow_mut().live_graphics.retain(|&id| id != pipeline);
    }

    fn bind_graphics_pipeline(&self, pipeline: u32, desc: &GraphicsPipelineDesc) {
        self.state.borrow_mut().bound_graphics = Some((pipeline, desc.clone()));
    }

    fn create_compute_pipeline(&self, info: &ComputePipelineInfo<'_>) -> Result<u32> {
        let id = self.compile(info.name, std::iter::once(info.shader))?;
        self.state.borrow_mut().live_compute.push(id);
        Ok(id)
    }

    fn destroy_compute_pipeline(&self, pipeline: u32) {
        let mut state = self.state.borrow_mut();
        state.live_compute.retain(|&id| id != pipeline);
        state.compute_destroyed += 1;
    }

    fn bind_compute_pipeline(&self, pipeline: u32) {
        self.state.borrow_mut().bound_compute = Some(pipeline);
    }

    fn create_sampler(&self, _state: &SamplerState) -> Result<u32> {
        let mut state = self.state.borrow_mut();
        if state.fail_samplers {
            return Err(Error::Driver("GL_OUT_OF_MEMORY".to_owned()));
        }
        let id = state.allocate();
        state.samplers_created += 1;
        state.live_samplers.push(id);
        Ok(id)
    }

    fn destroy_sampler(&self, sampler: u32) {
        self.state.borrow_mut().live_samplers.retain(|&id| id != sampler);
    }
}
