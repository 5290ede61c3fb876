use nalgebra::Matrix4;
use objmesh::RenderMesh;
use std::borrow::Cow;
use std::mem::size_of;
use std::num::NonZeroU32;
use wgpu::util::{BufferInitDescriptor, DeviceExt};
use wgpu::{
    BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayout, BindGroupLayoutDescriptor,
    BindGroupLayoutEntry, BindingResource, BindingType, Buffer, BufferUsages, Color,
    ColorTargetState, ColorWrites, CommandEncoderDescriptor, CompareFunction, DepthBiasState,
    DepthStencilState, Device, DeviceDescriptor, Extent3d, Features, FilterMode, FragmentState,
    ImageCopyTexture, ImageDataLayout, Instance, Limits, LoadOp, MultisampleState, Operations,
    Origin3d, PipelineLayoutDescriptor, PowerPreference, PresentMode, PrimitiveState,
    PushConstantRange, Queue, RenderPass, RenderPassColorAttachment,
    RenderPassDepthStencilAttachment, RenderPassDescriptor, RenderPipeline,
    RenderPipelineDescriptor, RequestAdapterOptions, Sampler, SamplerBindingType,
    SamplerDescriptor, ShaderModule, ShaderSource, ShaderStages, Surface, SurfaceConfiguration,
    TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType,
    TextureUsages, TextureView, TextureViewDimension, VertexAttribute, VertexBufferLayout,
    VertexFormat, VertexState, VertexStepMode,
};
use winit::window::Window;

// 1k on a side, same as it ever was
const SHADOW_MAP_SIZE: u32 = 1024;

fn depth(device: &Device, width: u32, height: u32, for_sampling: bool) -> TextureView {
    let usage = if for_sampling {
        TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING
    } else {
        TextureUsages::RENDER_ATTACHMENT
    };
    let depth = device.create_texture(&TextureDescriptor {
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Depth32Float,
        usage,
        label: None,
    });
    depth.create_view(&wgpu::TextureViewDescriptor::default())
}

fn projgen(width: u32, height: u32) -> Matrix4<f32> {
    let proj = nalgebra::Perspective3::new(
        width as f32 / height as f32,
        45.0f32.to_radians(),
        0.1,
        100.0,
    );
    proj.to_homogeneous()
}

fn raw_bytes(data: &[f32]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len() * 4) }
}

// copied over from textured
fn color_texture(device: &Device, queue: &Queue, width: u32, height: u32, pixels: &[u8]) -> TextureView {
    let texture = device.create_texture(&TextureDescriptor {
        size: Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: TextureFormat::Rgba8UnormSrgb,
        usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        label: None,
    });
    queue.write_texture(
        ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: Origin3d::ZERO,
            aspect: TextureAspect::All,
        },
        pixels,
        ImageDataLayout {
            offset: 0,
            bytes_per_row: NonZeroU32::new(4 * width),
            rows_per_image: None,
        },
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn checker_pixels() -> [u8; 16] {
    #[rustfmt::skip]
    let px = [
        255, 0, 0, 255,    0, 255, 0, 255,
        0, 0, 255, 255,    255, 255, 0, 255,
    ];
    px
}

// one mvp for the scene pass plus the light's mvp for shadow lookup;
// exactly fills the 128 push-constant bytes the device was asked for
pub struct FrameMatrices {
    pub model_mvp: Matrix4<f32>,
    pub model_light_mvp: Matrix4<f32>,
    pub floor_mvp: Matrix4<f32>,
    pub floor_light_mvp: Matrix4<f32>,
}

fn push_pair(mvp: &Matrix4<f32>, light_mvp: &Matrix4<f32>) -> [f32; 32] {
    let mut pair = [0.0f32; 32];
    pair[..16].copy_from_slice(mvp.as_slice());
    pair[16..].copy_from_slice(light_mvp.as_slice());
    pair
}

struct Drawable {
    positions: Buffer,
    tex_coords: Buffer,
    vertex_count: u32,
    bind_group: BindGroup,
}

impl Drawable {
    fn create(
        device: &Device,
        layout: &BindGroupLayout,
        positions: &[f32],
        tex_coords: &[f32],
        texture: &TextureView,
        sampler: &Sampler,
    ) -> Self {
        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: None,
            layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(texture),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(sampler),
                },
            ],
        });
        Self {
            positions: device.create_buffer_init(&BufferInitDescriptor {
                label: None,
                contents: raw_bytes(positions),
                usage: BufferUsages::VERTEX,
            }),
            tex_coords: device.create_buffer_init(&BufferInitDescriptor {
                label: None,
                contents: raw_bytes(tex_coords),
                usage: BufferUsages::VERTEX,
            }),
            vertex_count: (positions.len() / 3) as u32,
            bind_group,
        }
    }

    // the shadow pass only reads positions
    fn draw_depth<'a>(&'a self, rpass: &mut RenderPass<'a>, pair: &[f32; 32]) {
        rpass.set_push_constants(ShaderStages::VERTEX, 0, raw_bytes(pair));
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }

    fn draw<'a>(&'a self, rpass: &mut RenderPass<'a>, pair: &[f32; 32]) {
        rpass.set_push_constants(ShaderStages::VERTEX, 0, raw_bytes(pair));
        rpass.set_bind_group(1, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.set_vertex_buffer(1, self.tex_coords.slice(..));
        rpass.draw(0..self.vertex_count, 0..1);
    }
}

pub struct RenderState {
    _instance: Instance,
    surface: Surface,
    surface_cfg: SurfaceConfiguration,
    device: Device,
    queue: Queue,
    _shader: ShaderModule,
    shadow_pipeline: RenderPipeline,
    scene_pipeline: RenderPipeline,
    shadow_view: TextureView,
    shadow_bind_group: BindGroup,
    model: Drawable,
    floor: Drawable,
    depth_view: TextureView,
    pub proj: Matrix4<f32>,
}

impl RenderState {
    pub fn create(
        window: &Window,
        mesh: &RenderMesh,
        floor_positions: &[f32],
        floor_tex_coords: &[f32],
        texture: &image::RgbaImage,
    ) -> Self {
        let instance = Instance::new(wgpu::Backends::all());
        let surface = unsafe { instance.create_surface(&window) };
        let adapter = futures::executor::block_on(async {
            instance
                .request_adapter(&RequestAdapterOptions {
                    power_preference: PowerPreference::HighPerformance,
                    force_fallback_adapter: false,
                    compatible_surface: Some(&surface),
                })
                .await
        })
        .unwrap();
        log::info!("Chose the adapter: {:?}", adapter.get_info());
        let format = surface.get_supported_formats(&adapter)[0];
        let (width, height) = window.inner_size().into();
        let surface_cfg = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: PresentMode::Mailbox,
        };
        let (device, queue) = futures::executor::block_on(async {
            adapter
                .request_device(
                    &DeviceDescriptor {
                        label: None,
                        features: Features::PUSH_CONSTANTS,
                        limits: Limits {
                            // two mat4s for the scene pass
                            max_push_constant_size: 128,
                            ..Default::default()
                        },
                    },
                    None,
                )
                .await
        })
        .unwrap();
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: ShaderSource::Wgsl(Cow::Borrowed(include_str!("shader.wgsl"))),
        });

        let shadow_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Depth,
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let color_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let positions_layout = VertexBufferLayout {
            array_stride: (3 * size_of::<f32>()) as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &[VertexAttribute {
                format: VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            }],
        };
        let tex_coords_layout = VertexBufferLayout {
            array_stride: (2 * size_of::<f32>()) as u64,
            step_mode: VertexStepMode::Vertex,
            attributes: &[VertexAttribute {
                format: VertexFormat::Float32x2,
                offset: 0,
                shader_location: 1,
            }],
        };

        // pass one: depth only, from the light, into the shadow map.
        // the shader's push block is two matrices even though this pass
        // only reads the first, so the range covers the whole thing
        let shadow_pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStages::VERTEX,
                range: 0..128,
            }],
        });
        let shadow_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: None,
            layout: Some(&shadow_pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_shadow",
                buffers: &[positions_layout.clone()],
            },
            primitive: PrimitiveState::default(),
            depth_stencil: Some(DepthStencilState {
                format: TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: Default::default(),
                // stand-in for glPolygonOffset; keeps the model from
                // shadowing itself in stripes
                bias: DepthBiasState {
                    constant: 4,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: MultisampleState::default(),
            fragment: None,
            multiview: None,
        });

        // pass two: the scene from the eye, shadow map in hand
        let scene_pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&shadow_layout, &color_layout],
            push_constant_ranges: &[PushConstantRange {
                stages: ShaderStages::VERTEX,
                range: 0..128,
            }],
        });
        let scene_pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: None,
            layout: Some(&scene_pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: "vs_scene",
                buffers: &[positions_layout, tex_coords_layout],
            },
            primitive: PrimitiveState::default(),
            depth_stencil: Some(DepthStencilState {
                format: TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: MultisampleState::default(),
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: "fs_scene",
                targets: &[Some(ColorTargetState {
                    format,
                    blend: None,
                    write_mask: ColorWrites::COLOR,
                })],
            }),
            multiview: None,
        });

        let shadow_view = depth(&device, SHADOW_MAP_SIZE, SHADOW_MAP_SIZE, true);
        let shadow_sampler = device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            compare: Some(CompareFunction::LessEqual),
            ..Default::default()
        });
        let shadow_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: None,
            layout: &shadow_layout,
            entries: &[
                BindGroupEntry {
                    binding: 0,
                    resource: BindingResource::TextureView(&shadow_view),
                },
                BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let linear = device.create_sampler(&SamplerDescriptor {
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });
        let nearest = device.create_sampler(&SamplerDescriptor::default());
        let (tex_w, tex_h) = texture.dimensions();
        let model_texture = color_texture(&device, &queue, tex_w, tex_h, texture.as_raw());
        let floor_texture = color_texture(&device, &queue, 2, 2, &checker_pixels());

        let model = Drawable::create(
            &device,
            &color_layout,
            &mesh.vertex_positions,
            &mesh.vertex_tex_coords,
            &model_texture,
            &linear,
        );
        let floor = Drawable::create(
            &device,
            &color_layout,
            floor_positions,
            floor_tex_coords,
            &floor_texture,
            &nearest,
        );

        let (w, h) = window.inner_size().into();
        let depth_view = depth(&device, w, h, false);
        let proj = projgen(w, h);
        Self {
            _instance: instance,
            surface,
            surface_cfg,
            device,
            queue,
            _shader: shader,
            shadow_pipeline,
            scene_pipeline,
            shadow_view,
            shadow_bind_group,
            model,
            floor,
            depth_view,
            proj,
        }
    }

    pub fn resize(&mut self, (width, height): (u32, u32)) {
        self.surface_cfg.width = width;
        self.surface_cfg.height = height;
        self.surface.configure(&self.device, &self.surface_cfg);
        self.depth_view = depth(&self.device, width, height, false);
        self.proj = projgen(width, height);
    }

    pub fn render(&self, mats: &FrameMatrices) {
        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: None });
        let frame = self.surface.get_current_texture().unwrap();
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // first pass: depth from the light's point of view
        {
            let model_light = push_pair(&mats.model_light_mvp, &mats.model_light_mvp);
            let floor_light = push_pair(&mats.floor_light_mvp, &mats.floor_light_mvp);
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            rpass.set_pipeline(&self.shadow_pipeline);
            self.floor.draw_depth(&mut rpass, &floor_light);
            self.model.draw_depth(&mut rpass, &model_light);
        }

        // second pass: the scene, with every fragment asking the shadow
        // map whether the light can see it
        {
            let model_pair = push_pair(&mats.model_mvp, &mats.model_light_mvp);
            let floor_pair = push_pair(&mats.floor_mvp, &mats.floor_light_mvp);
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(Color::WHITE),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            rpass.set_pipeline(&self.scene_pipeline);
            rpass.set_bind_group(0, &self.shadow_bind_group, &[]);
            self.floor.draw(&mut rpass, &floor_pair);
            self.model.draw(&mut rpass, &model_pair);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }
}
