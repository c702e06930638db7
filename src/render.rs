use glam::{Mat3, Mat4, Vec3};
use viewer_core::{
    Camera, TriangleMesh, AMBIENT_INTENSITY, BACKGROUND_COLOR, LINES_WGSL, MARKERS_WGSL,
    MESH_WGSL, MODEL_COLOR, POINT_LIGHTS,
};
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
pub mod scene;

use helpers::{make_pipeline, uniform_binding, PipelineSpec, UniformBinding};
use scene::{LineVertex, MarkerInstance, MeshVertex, QUAD};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MeshUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    color: [f32; 4],
    light0: [f32; 4],
    light1: [f32; 4],
    ambient: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ViewUniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MarkerUniforms {
    view_proj: [[f32; 4]; 4],
    right: [f32; 4],
    up: [f32; 4],
}

const MESH_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const LINE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
const QUAD_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];
const INSTANCE_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32, 3 => Float32x4];

const MIN_INSTANCE_CAPACITY: usize = 16;

/// What to draw this frame.
pub struct SceneFrame<'f> {
    pub camera: &'f Camera,
    /// Model world matrix; `None` when there is no model or it is hidden.
    pub model: Option<Mat4>,
    pub markers: &'f [MarkerInstance],
}

struct ModelBuffers {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    mesh_pipeline: wgpu::RenderPipeline,
    mesh_uniforms: UniformBinding,
    model: Option<ModelBuffers>,

    line_pipeline: wgpu::RenderPipeline,
    line_uniforms: UniformBinding,
    line_vertices: wgpu::Buffer,
    line_count: u32,

    marker_pipeline: wgpu::RenderPipeline,
    marker_uniforms: UniformBinding,
    quad: wgpu::Buffer,
    instances: wgpu::Buffer,
    instance_capacity: usize,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let (_, depth_view) = helpers::create_depth_texture(&device, width, height);

        let mesh_uniforms = uniform_binding(
            &device,
            "mesh_uniforms",
            std::mem::size_of::<MeshUniforms>() as u64,
        );
        let mesh_pipeline = make_pipeline(
            &device,
            &PipelineSpec {
                label: "mesh",
                source: MESH_WGSL,
                layout: &mesh_uniforms.layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<MeshVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &MESH_ATTRS,
                }],
                topology: wgpu::PrimitiveTopology::TriangleList,
                color_format: format,
                blend: None,
                depth_write: true,
            },
        );

        let line_uniforms = uniform_binding(
            &device,
            "line_uniforms",
            std::mem::size_of::<ViewUniforms>() as u64,
        );
        let line_pipeline = make_pipeline(
            &device,
            &PipelineSpec {
                label: "lines",
                source: LINES_WGSL,
                layout: &line_uniforms.layout,
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<LineVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &LINE_ATTRS,
                }],
                topology: wgpu::PrimitiveTopology::LineList,
                color_format: format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                depth_write: true,
            },
        );
        let lines = scene::helper_lines();
        let line_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("helper_lines"),
            contents: bytemuck::cast_slice(&lines),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let marker_uniforms = uniform_binding(
            &device,
            "marker_uniforms",
            std::mem::size_of::<MarkerUniforms>() as u64,
        );
        let marker_pipeline = make_pipeline(
            &device,
            &PipelineSpec {
                label: "markers",
                source: MARKERS_WGSL,
                layout: &marker_uniforms.layout,
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &QUAD_ATTRS,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<MarkerInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &INSTANCE_ATTRS,
                    },
                ],
                topology: wgpu::PrimitiveTopology::TriangleList,
                color_format: format,
                blend: None,
                depth_write: true,
            },
        );
        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("marker_quad"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instances = create_instance_buffer(&device, MIN_INSTANCE_CAPACITY);

        let bg = scene::linear_rgba(BACKGROUND_COLOR, 1.0);
        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            mesh_pipeline,
            mesh_uniforms,
            model: None,
            line_pipeline,
            line_uniforms,
            line_vertices,
            line_count: lines.len() as u32,
            marker_pipeline,
            marker_uniforms,
            quad,
            instances,
            instance_capacity: MIN_INSTANCE_CAPACITY,
            width,
            height,
            clear_color: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: 1.0,
            },
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.reconfigure();
        }
    }

    fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
        let (_, depth_view) = helpers::create_depth_texture(&self.device, self.width, self.height);
        self.depth_view = depth_view;
    }

    /// Replace the uploaded model geometry; `None` or an empty mesh clears it.
    pub fn upload_model(&mut self, mesh: Option<&TriangleMesh>) {
        self.model = mesh.filter(|m| !m.is_empty()).map(|m| {
            let vertices = scene::mesh_vertices(m);
            ModelBuffers {
                vertices: self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("model_vertices"),
                        contents: bytemuck::cast_slice(&vertices),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                indices: self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("model_indices"),
                        contents: bytemuck::cast_slice(&m.indices),
                        usage: wgpu::BufferUsages::INDEX,
                    }),
                index_count: m.indices.len() as u32,
            }
        });
        log::info!(
            "[gpu] model upload: {} indices",
            self.model.as_ref().map(|m| m.index_count).unwrap_or(0)
        );
    }

    fn write_uniforms(&mut self, frame: &SceneFrame<'_>) {
        let view_proj = frame.camera.view_proj();
        self.queue.write_buffer(
            &self.line_uniforms.buffer,
            0,
            bytemuck::bytes_of(&ViewUniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );

        let forward = frame.camera.forward();
        let right = forward.cross(frame.camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.queue.write_buffer(
            &self.marker_uniforms.buffer,
            0,
            bytemuck::bytes_of(&MarkerUniforms {
                view_proj: view_proj.to_cols_array_2d(),
                right: right.extend(0.0).to_array(),
                up: up.extend(0.0).to_array(),
            }),
        );

        if let Some(model) = frame.model {
            let light = |(p, i): ([f32; 3], f32)| Vec3::from(p).extend(i).to_array();
            self.queue.write_buffer(
                &self.mesh_uniforms.buffer,
                0,
                bytemuck::bytes_of(&MeshUniforms {
                    view_proj: view_proj.to_cols_array_2d(),
                    model: model.to_cols_array_2d(),
                    normal_matrix: normal_matrix(model).to_cols_array_2d(),
                    color: scene::linear_rgba(MODEL_COLOR, 1.0),
                    light0: light(POINT_LIGHTS[0]),
                    light1: light(POINT_LIGHTS[1]),
                    ambient: AMBIENT_INTENSITY,
                    _pad: [0.0; 3],
                }),
            );
        }
    }

    fn ensure_instance_capacity(&mut self, count: usize) {
        if count > self.instance_capacity {
            self.instance_capacity = count.next_power_of_two();
            self.instances = create_instance_buffer(&self.device, self.instance_capacity);
        }
    }

    pub fn render(&mut self, frame: &SceneFrame<'_>) -> Result<(), wgpu::SurfaceError> {
        self.write_uniforms(frame);
        self.ensure_instance_capacity(frame.markers.len());
        if !frame.markers.is_empty() {
            self.queue
                .write_buffer(&self.instances, 0, bytemuck::cast_slice(frame.markers));
        }

        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.reconfigure();
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let (Some(_), Some(model)) = (frame.model, &self.model) {
                rpass.set_pipeline(&self.mesh_pipeline);
                rpass.set_bind_group(0, &self.mesh_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, model.vertices.slice(..));
                rpass.set_index_buffer(model.indices.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..model.index_count, 0, 0..1);
            }

            rpass.set_pipeline(&self.line_pipeline);
            rpass.set_bind_group(0, &self.line_uniforms.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.line_vertices.slice(..));
            rpass.draw(0..self.line_count, 0..1);

            if !frame.markers.is_empty() {
                rpass.set_pipeline(&self.marker_pipeline);
                rpass.set_bind_group(0, &self.marker_uniforms.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quad.slice(..));
                rpass.set_vertex_buffer(1, self.instances.slice(..));
                rpass.draw(0..QUAD.len() as u32, 0..frame.markers.len() as u32);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("marker_instances"),
        size: (capacity * std::mem::size_of::<MarkerInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Inverse-transpose of the upper 3x3; identity when the model is collapsed to zero scale.
fn normal_matrix(model: Mat4) -> Mat4 {
    let m = Mat3::from_mat4(model);
    if m.determinant().abs() < 1e-12 {
        return Mat4::IDENTITY;
    }
    Mat4::from_mat3(m.inverse().transpose())
}
