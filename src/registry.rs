//! The pipeline registry: opaque handles to owned, compiled pipelines.

use std::sync::Arc;

use slotmap::SlotMap;

use crate::device::Device;
use crate::error::{Error, PipelineKind, Result};
use crate::pipeline::{
    ComputePipelineDesc, ComputePipelineHandle, ComputePipelineInfo, GraphicsPipelineDesc,
    GraphicsPipelineHandle, GraphicsPipelineInfo,
};
use crate::shader::ShaderStage;

struct GraphicsRecord<P> {
    pipeline: P,
    desc: Arc<GraphicsPipelineDesc>,
}

struct ComputeRecord<P> {
    pipeline: P,
    desc: Arc<ComputePipelineDesc>,
}

/// Owns every compiled pipeline of a graphics context.
///
/// Handles are generational: once a pipeline is destroyed its handle stays
/// dead even if the slot is reused, and every lookup through it fails with
/// [`Error::NotFound`]. Destroying an unknown or already-destroyed handle
/// also returns [`Error::NotFound`] and touches nothing.
///
/// Dropping the registry releases all remaining pipelines.
pub struct PipelineRegistry<D: Device> {
    device: D,
    graphics: SlotMap<GraphicsPipelineHandle, GraphicsRecord<D::GraphicsPipeline>>,
    compute: SlotMap<ComputePipelineHandle, ComputeRecord<D::ComputePipeline>>,
}

impl<D: Device> PipelineRegistry<D> {
    /// Empty registry compiling on `device`.
    pub fn new(device: D) -> Self {
        Self {
            device,
            graphics: SlotMap::with_key(),
            compute: SlotMap::with_key(),
        }
    }

    /// Compile a graphics pipeline and take an owned copy of its description.
    ///
    /// `info` and everything it borrows only need to outlive this call.
    ///
    /// On the GL backend this leaves no vertex array object bound; rebind
    /// before drawing with one of your own.
    ///
    /// # Errors
    ///
    /// - [`Error::StageMismatch`] if a shader is in the wrong slot.
    /// - [`Error::Compilation`] with the driver log if compiling or linking
    ///   fails.
    /// - [`Error::Driver`] if the driver cannot create the objects.
    ///
    /// No handle is issued on error.
    pub fn compile_graphics(
        &mut self,
        info: &GraphicsPipelineInfo<'_>,
    ) -> Result<GraphicsPipelineHandle> {
        info.vertex_shader.expect_stage(ShaderStage::Vertex)?;
        if let Some(fragment) = info.fragment_shader {
            fragment.expect_stage(ShaderStage::Fragment)?;
        }

        let pipeline = self
            .device
            .create_graphics_pipeline(info)
            .inspect_err(|err| log::warn!("graphics pipeline `{}`: {err}", info.name))?;
        let desc = Arc::new(GraphicsPipelineDesc::from(info));
        let handle = self.graphics.insert(GraphicsRecord { pipeline, desc });

        log::debug!(
            "compiled graphics pipeline `{}` as {:#x} ({pipeline:?})",
            info.name,
            handle.to_raw()
        );
        Ok(handle)
    }

    /// Compile a compute pipeline.
    ///
    /// # Errors
    ///
    /// Same as [`compile_graphics`](Self::compile_graphics).
    pub fn compile_compute(&mut self, info: &ComputePipelineInfo<'_>) -> Result<ComputePipelineHandle> {
        info.shader.expect_stage(ShaderStage::Compute)?;

        let pipeline = self
            .device
            .create_compute_pipeline(info)
            .inspect_err(|err| log::warn!("compute pipeline `{}`: {err}", info.name))?;
        let desc = Arc::new(ComputePipelineDesc::from(info));
        let handle = self.compute.insert(ComputeRecord { pipeline, desc });

        log::debug!(
            "compiled compute pipeline `{}` as {:#x} ({pipeline:?})",
            info.name,
            handle.to_raw()
        );
        Ok(handle)
    }

    /// Description of a live graphics pipeline.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn graphics(&self, handle: GraphicsPipelineHandle) -> Result<Arc<GraphicsPipelineDesc>> {
        self.graphics_record(handle).map(|r| Arc::clone(&r.desc))
    }

    /// Description of a live compute pipeline.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn compute(&self, handle: ComputePipelineHandle) -> Result<Arc<ComputePipelineDesc>> {
        self.compute_record(handle).map(|r| Arc::clone(&r.desc))
    }

    /// Driver object of a live graphics pipeline.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn graphics_pipeline(&self, handle: GraphicsPipelineHandle) -> Result<D::GraphicsPipeline> {
        self.graphics_record(handle).map(|r| r.pipeline)
    }

    /// Driver object of a live compute pipeline.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn compute_pipeline(&self, handle: ComputePipelineHandle) -> Result<D::ComputePipeline> {
        self.compute_record(handle).map(|r| r.pipeline)
    }

    /// Make a graphics pipeline current, applying all of its fixed-function
    /// state.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn bind_graphics(&self, handle: GraphicsPipelineHandle) -> Result<()> {
        let record = self.graphics_record(handle)?;
        self.device.bind_graphics_pipeline(record.pipeline, &record.desc);
        Ok(())
    }

    /// Make a compute pipeline current.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is not live.
    pub fn bind_compute(&self, handle: ComputePipelineHandle) -> Result<()> {
        let record = self.compute_record(handle)?;
        self.device.bind_compute_pipeline(record.pipeline);
        Ok(())
    }

    /// Release a graphics pipeline and forget its description.
    ///
    /// Descriptions already handed out stay valid.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is unknown or already destroyed.
    pub fn destroy_graphics(&mut self, handle: GraphicsPipelineHandle) -> Result<()> {
        let record = self.graphics.remove(handle).ok_or(Error::NotFound {
            kind: PipelineKind::Graphics,
            handle: handle.to_raw(),
        })?;
        self.device.destroy_graphics_pipeline(record.pipeline);
        log::debug!(
            "destroyed graphics pipeline `{}` ({:#x})",
            record.desc.name,
            handle.to_raw()
        );
        Ok(())
    }

    /// Release a compute pipeline and forget its description.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `handle` is unknown or already destroyed.
    pub fn destroy_compute(&mut self, handle: ComputePipelineHandle) -> Result<()> {
        let record = self.compute.remove(handle).ok_or(Error::NotFound {
            kind: PipelineKind::Compute,
            handle: handle.to_raw(),
        })?;
        self.device.destroy_compute_pipeline(record.pipeline);
        log::debug!(
            "destroyed compute pipeline `{}` ({:#x})",
            record.desc.name,
            handle.to_raw()
        );
        Ok(())
    }

    /// Number of live graphics pipelines.
    pub fn graphics_len(&self) -> usize {
        self.graphics.len()
    }

    /// Number of live compute pipelines.
    pub fn compute_len(&self) -> usize {
        self.compute.len()
    }

    /// Whether no pipeline of either kind is live.
    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty() && self.compute.is_empty()
    }

    /// The device pipelines are compiled on.
    pub fn device(&self) -> &D {
        &self.device
    }

    fn graphics_record(
        &self,
        handle: GraphicsPipelineHandle,
    ) -> Result<&GraphicsRecord<D::GraphicsPipeline>> {
        self.graphics.get(handle).ok_or(Error::NotFound {
            kind: PipelineKind::Graphics,
            handle: handle.to_raw(),
        })
    }

    fn compute_record(
        &self,
        handle: ComputePipelineHandle,
    ) -> Result<&ComputeRecord<D::ComputePipeline>> {
        self.compute.get(handle).ok_or(Error::NotFound {
            kind: PipelineKind::Compute,
            handle: handle.to_raw(),
        })
    }
}

impl<D: Device> Drop for PipelineRegistry<D> {
    fn drop(&mut self) {
        if self.is_empty() {
            return;
        }
        log::debug!(
            "releasing {} graphics and {} compute pipelines",
            self.graphics.len(),
            self.compute.len()
        );
        for (_, record) in self.graphics.drain() {
            self.device.destroy_graphics_pipeline(record.pipeline);
        }
        for (_, record) in self.compute.drain() {
            self.device.destroy_compute_pipeline(record.pipeline);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mock::{
        MockDevice, BROKEN_COMPUTE_SRC, BROKEN_FRAGMENT_SRC, COMPUTE_SRC, FRAGMENT_SRC, VERTEX_SRC,
    };
    use crate::pipeline::{
        ColorBlendAttachmentState, ColorBlendState, DepthState, InputAssemblyState,
        RasterizationState, StencilOpState, StencilState, VertexInputBindingDescription,
        VertexInputState,
    };
    use crate::shader::Shader;
    use crate::types::{
        BlendFactor, BlendOp, ColorComponentFlags, CompareOp, CullMode, Format, FrontFace,
        LogicOp, PolygonMode, PrimitiveTopology, StencilOp,
    };

    fn scene_bindings() -> Vec<VertexInputBindingDescription> {
        vec![
            VertexInputBindingDescription {
                location: 0,
                binding: 0,
                format: Format::R32G32B32_FLOAT,
                offset: 0,
            },
            VertexInputBindingDescription {
                location: 1,
                binding: 0,
                format: Format::R16G16_SNORM,
                offset: 12,
            },
            VertexInputBindingDescription {
                location: 2,
                binding: 0,
                format: Format::R32G32_FLOAT,
                offset: 16,
            },
        ]
    }

    #[test]
    fn compile_then_get_returns_isolated_copy() {
        let mut registry = PipelineRegistry::new(MockDevice::new());
        let vs = Shader::new(ShaderStage::Vertex, VERTEX_SRC);
        let fs = Shader::new(ShaderStage::Fragment, FRAGMENT_SRC);

        let mut bindings = scene_bindings();
        let mut attachments = vec![ColorBlendAttachmentState {
            blend_enable: true,
            src_color_blend_factor: BlendFactor::SrcAlpha,
            dst_color_blend_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::ReverseSubtract,
            alpha_blend_op: BlendOp::Max,
            color_write_mask: ColorComponentFlags::R | ColorComponentFlags::A,
            ..Default::default()
        }];
        let front = StencilOpState {
            pass_op: StencilOp::Replace,
            fail_op: StencilOp::Zero,
            depth_fail_op: StencilOp::IncrementAndWrap,
            compare_op: CompareOp::Equal,
            compare_mask: 0x0f,
            write_mask: 0xf0,
            reference: 7,
        };
        let back = StencilOpState {
            pass_op: StencilOp::Invert,
            compare_op: CompareOp::NotEqual,
            reference: 3,
            ..front
        };
        let info = GraphicsPipelineInfo {
            name: "rsm scene",
            input_assembly_state: InputAssemblyState {
                topology: PrimitiveTopology::TriangleStrip,
                primitive_restart_enable: true,
            },
            vertex_input_state: VertexInputState {
                vertex_binding_descriptions: &bindings,
            },
            rasterization_state: RasterizationState {
                depth_clamp_enable: true,
                polygon_mode: PolygonMode::Line,
                cull_mode: CullMode::Front,
                front_face: FrontFace::Clockwise,
                depth_bias_enable: true,
                depth_bias_constant_factor: 1.5,
                depth_bias_slope_factor: 2.0,
                line_width: 3.0,
                point_size: 4.0,
            },
            depth_state: DepthState {
                depth_test_enable: true,
                depth_write_enable: false,
                depth_compare_op: CompareOp::GreaterOrEqual,
            },
            stencil_state: StencilState {
                stencil_test_enable: true,
                front,
                back,
            },
            color_blend_state: ColorBlendState {
                logic_op_enable: true,
                logic_op: LogicOp::Xor,
                attachments: &attachments,
                blend_constants: [0.25, 0.5, 0.75, 1.0],
            },
            ..GraphicsPipelineInfo::new(&vs, Some(&fs))
        };
        let handle = registry.compile_graphics(&info).unwrap();

        let desc = registry.graphics(handle).unwrap();
        assert_eq!(desc.name, "rsm scene");
        assert_eq!(desc.stages, [ShaderStage::Vertex, ShaderStage::Fragment]);

        assert_eq!(desc.input_assembly_state.topology, PrimitiveTopology::TriangleStrip);
        assert!(desc.input_assembly_state.primitive_restart_enable);

        let raster = &desc.rasterization_state;
        assert!(raster.depth_clamp_enable);
        assert_eq!(raster.polygon_mode, PolygonMode::Line);
        assert_eq!(raster.cull_mode, CullMode::Front);
        assert_eq!(raster.front_face, FrontFace::Clockwise);
        assert!(raster.depth_bias_enable);
        assert_eq!(raster.depth_bias_constant_factor, 1.5);
        assert_eq!(raster.depth_bias_slope_factor, 2.0);
        assert_eq!(raster.line_width, 3.0);
        assert_eq!(raster.point_size, 4.0);

        assert!(desc.depth_state.depth_test_enable);
        assert!(!desc.depth_state.depth_write_enable);
        assert_eq!(desc.depth_state.depth_compare_op, CompareOp::GreaterOrEqual);

        let stencil = &desc.stencil_state;
        assert!(stencil.stencil_test_enable);
        assert_eq!(stencil.front.pass_op, StencilOp::Replace);
        assert_eq!(stencil.front.fail_op, StencilOp::Zero);
        assert_eq!(stencil.front.depth_fail_op, StencilOp::IncrementAndWrap);
        assert_eq!(stencil.front.compare_op, CompareOp::Equal);
        assert_eq!(stencil.front.compare_mask, 0x0f);
        assert_eq!(stencil.front.write_mask, 0xf0);
        assert_eq!(stencil.front.reference, 7);
        assert_eq!(stencil.back.pass_op, StencilOp::Invert);
        assert_eq!(stencil.back.compare_op, CompareOp::NotEqual);
        assert_eq!(stencil.back.reference, 3);

        let blend = &desc.color_blend_state;
        assert!(blend.logic_op_enable);
        assert_eq!(blend.logic_op, LogicOp::Xor);
        assert_eq!(blend.blend_constants, [0.25, 0.5, 0.75, 1.0]);
        assert_eq!(blend.attachments.len(), 1);
        let attachment = &blend.attachments[0];
        assert!(attachment.blend_enable);
        assert_eq!(attachment.src_color_blend_factor, BlendFactor::SrcAlpha);
        assert_eq!(attachment.dst_color_blend_factor, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(attachment.color_blend_op, BlendOp::ReverseSubtract);
        assert_eq!(attachment.alpha_blend_op, BlendOp::Max);
        assert_eq!(
            attachment.color_write_mask,
            ColorComponentFlags::R | ColorComponentFlags::A
        );

        assert_eq!(
            desc.vertex_input_state.vertex_binding_descriptions,
            scene_bindings()
        );
        assert_ne!(
            desc.vertex_input_state.vertex_binding_descriptions.as_ptr(),
            bindings.as_ptr()
        );

        // Later caller mutation must not leak into the stored copy.
        bindings.clear();
        attachments[0].blend_enable = false;
        let desc = registry.graphics(handle).unwrap();
        assert_eq!(desc.vertex_input_state.vertex_binding_descriptions.len(), 3);
        assert!(desc.color_blend_state.attachments[0].blend_enable);
    }

    #[test]
    fn destroy_then_get_is_not_found() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let vs = Shader::fullscreen_triangle();
        let fs = Shader::new(ShaderStage::Fragment, FRAGMENT_SRC);

        let handle = registry
            .compile_graphics(&GraphicsPipelineInfo::new(&vs, Some(&fs)))
            .unwrap();
        registry.destroy_graphics(handle).unwrap();

        assert!(matches!(
            registry.graphics(handle),
            Err(Error::NotFound {
                kind: PipelineKind::Graphics,
                ..
            })
        ));
        assert_eq!(registry.graphics_len(), 0);
        assert_eq!(device.live_graphics_pipelines(), 0);
    }

    #[test]
    fn double_destroy_is_not_found() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let cs = Shader::new(ShaderStage::Compute, COMPUTE_SRC);

        let handle = registry
            .compile_compute(&ComputePipelineInfo {
                name: "rsm indirect",
                shader: &cs,
            })
            .unwrap();
        registry.destroy_compute(handle).unwrap();

        let err = registry.destroy_compute(handle).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound { kind: PipelineKind::Compute, handle: raw } if raw == handle.to_raw()
        ));
        assert_eq!(device.compute_pipelines_destroyed(), 1);
    }

    #[test]
    fn stale_handle_does_not_alias_reused_slot() {
        let mut registry = PipelineRegistry::new(MockDevice::new());
        let vs = Shader::fullscreen_triangle();

        let old = registry
            .compile_graphics(&GraphicsPipelineInfo {
                name: "old",
                ..GraphicsPipelineInfo::new(&vs, None)
            })
            .unwrap();
        registry.destroy_graphics(old).unwrap();
        let new = registry
            .compile_graphics(&GraphicsPipelineInfo {
                name: "new",
                ..GraphicsPipelineInfo::new(&vs, None)
            })
            .unwrap();

        assert_ne!(old, new);
        assert_ne!(old.to_raw(), new.to_raw());
        assert!(registry.graphics(old).is_err());
        assert_eq!(registry.graphics(new).unwrap().name, "new");
    }

    #[test]
    fn compile_error_issues_no_handle() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let vs = Shader::new(ShaderStage::Vertex, VERTEX_SRC);
        let good = Shader::new(ShaderStage::Fragment, FRAGMENT_SRC);
        let broken = Shader::new(ShaderStage::Fragment, BROKEN_FRAGMENT_SRC);

        registry
            .compile_graphics(&GraphicsPipelineInfo::new(&vs, Some(&good)))
            .unwrap();

        let err = registry
            .compile_graphics(&GraphicsPipelineInfo {
                name: "shading",
                ..GraphicsPipelineInfo::new(&vs, Some(&broken))
            })
            .unwrap_err();
        match err {
            Error::Compilation { name, log } => {
                assert_eq!(name, "shading");
                assert!(!log.is_empty());
            }
            other => panic!("expected compilation error, got {other:?}"),
        }
        assert_eq!(registry.graphics_len(), 1);
        assert_eq!(device.live_graphics_pipelines(), 1);
    }

    #[test]
    fn compute_compile_error_issues_no_handle() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let good = Shader::new(ShaderStage::Compute, COMPUTE_SRC);
        let broken = Shader::new(ShaderStage::Compute, BROKEN_COMPUTE_SRC);

        registry
            .compile_compute(&ComputePipelineInfo {
                name: "light injection",
                shader: &good,
            })
            .unwrap();

        let err = registry
            .compile_compute(&ComputePipelineInfo {
                name: "propagation",
                shader: &broken,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Compilation { ref name, .. } if name == "propagation"));
        assert_eq!(registry.compute_len(), 1);
        assert_eq!(device.live_compute_pipelines(), 1);
    }

    #[test]
    fn wrong_stage_is_rejected_before_the_driver() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let fs = Shader::new(ShaderStage::Fragment, FRAGMENT_SRC);

        let err = registry
            .compile_compute(&ComputePipelineInfo {
                name: "not compute",
                shader: &fs,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            Error::StageMismatch {
                expected: ShaderStage::Compute,
                found: ShaderStage::Fragment,
            }
        ));

        let err = registry
            .compile_graphics(&GraphicsPipelineInfo::new(&fs, None))
            .unwrap_err();
        assert!(matches!(err, Error::StageMismatch { .. }));
        assert_eq!(device.compile_calls(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn graphics_and_compute_tables_are_independent() {
        let mut registry = PipelineRegistry::new(MockDevice::new());
        let vs = Shader::fullscreen_triangle();
        let cs = Shader::new(ShaderStage::Compute, COMPUTE_SRC);

        let g = registry
            .compile_graphics(&GraphicsPipelineInfo::new(&vs, None))
            .unwrap();
        let c = registry
            .compile_compute(&ComputePipelineInfo {
                name: "indirect",
                shader: &cs,
            })
            .unwrap();

        assert_eq!(registry.graphics_len(), 1);
        assert_eq!(registry.compute_len(), 1);
        registry.destroy_graphics(g).unwrap();
        assert_eq!(registry.compute(c).unwrap().name, "indirect");
    }

    #[test]
    fn bind_applies_stored_state() {
        let device = MockDevice::new();
        let mut registry = PipelineRegistry::new(device.clone());
        let vs = Shader::fullscreen_triangle();
        let fs = Shader::new(ShaderStage::Fragment, FRAGMENT_SRC);
        let cs = Shader::new(ShaderStage::Compute, COMPUTE_SRC);

        let shading = registry
            .compile_graphics(&GraphicsPipelineInfo {
                name: "shading",
                rasterization_state: RasterizationState {
                    cull_mode: CullMode::None,
                    ..Default::default()
                },
                ..GraphicsPipelineInfo::new(&vs, Some(&fs))
            })
            .unwrap();
        let indirect = registry
            .compile_compute(&ComputePipelineInfo {
                name: "indirect",
                shader: &cs,
            })
            .unwrap();

        registry.bind_graphics(shading).unwrap();
        let bound = device.last_bound_graphics().unwrap();
        assert_eq!(bound.0, registry.graphics_pipeline(shading).unwrap());
        assert_eq!(bound.1.rasterization_state.cull_mode, CullMode::None);

        registry.bind_compute(indirect).unwrap();
        assert_eq!(
            device.last_bound_compute(),
            Some(registry.compute_pipeline(indirect).unwrap())
        );

        registry.destroy_compute(indirect).unwrap();
        assert!(registry.bind_compute(indirect).is_err());
    }

    #[test]
    fn descriptions_outlive_destruction() {
        let mut registry = PipelineRegistry::new(MockDevice::new());
        let vs = Shader::fullscreen_triangle();
        let handle = registry
            .compile_graphics(&GraphicsPipelineInfo {
                name: "debug texture",
                ..GraphicsPipelineInfo::new(&vs, None)
            })
            .unwrap();

        let desc = registry.graphics(handle).unwrap();
        registry.destroy_graphics(handle).unwrap();
        assert_eq!(desc.name, "debug texture");
    }

    #[test]
    fn drop_releases_everything() {
        let device = MockDevice::new();
        {
            let mut registry = PipelineRegistry::new(device.clone());
            let vs = Shader::fullscreen_triangle();
            let cs = Shader::new(ShaderStage::Compute, COMPUTE_SRC);
            for name in ["a", "b", "c"] {
                registry
                    .compile_graphics(&GraphicsPipelineInfo {
                        name,
                        ..GraphicsPipelineInfo::new(&vs, None)
                    })
                    .unwrap();
            }
            registry
                .compile_compute(&ComputePipelineInfo {
                    name: "cs",
                    shader: &cs,
                })
                .unwrap();
            assert_eq!(device.live_graphics_pipelines(), 3);
        }
        assert_eq!(device.live_graphics_pipelines(), 0);
        assert_eq!(device.live_compute_pipelines(), 0);
    }
}
