use crate::constants::{BORDER_WIDTH_PX, CAMERA_FOV_DEG, CAMERA_Z, LABEL_ATLAS_SIZE};
use crate::dom::ImagePixels;
use crate::tracker::SceneDraws;
use glam::{Mat4, Vec3};
use web_sys as web;

mod helpers;
mod labels;
mod post;
mod quads;
mod shelf;

use labels::LabelAtlas;
use quads::{Globals, QuadInstance, QuadResources};

const SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");
const POST_WGSL: &str = include_str!("../shaders/post.wgsl");

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    linear_sampler: wgpu::Sampler,

    // Offscreen scene target, sampled by the distortion composite
    scene_view: wgpu::TextureView,

    quads: QuadResources,
    post: post::PostResources,
    post_bind_group: wgpu::BindGroup,

    atlas: LabelAtlas,
    atlas_texture: wgpu::Texture,
    atlas_view: wgpu::TextureView,
    ornament_view: wgpu::TextureView,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        document: &web::Document,
    ) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

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
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
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
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_format = wgpu::TextureFormat::Rgba16Float;
        let (_scene_tex, scene_view) = helpers::create_color_texture(
            &device,
            "scene_tex",
            width.max(1),
            height.max(1),
            scene_format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let atlas = LabelAtlas::new(document)?;
        let (atlas_texture, atlas_view) = helpers::create_color_texture(
            &device,
            "label_atlas",
            LABEL_ATLAS_SIZE,
            LABEL_ATLAS_SIZE,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        );
        // White placeholder until the ornament image finishes loading
        let (_tex, ornament_view) = helpers::upload_rgba_texture(
            &device,
            &queue,
            "ornament_tex",
            1,
            1,
            &[255, 255, 255, 255],
        );

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(POST_WGSL.into()),
        });

        let quads = quads::create_quad_resources(
            &device,
            &scene_shader,
            scene_format,
            &linear_sampler,
            &atlas_view,
            &ornament_view,
        );
        let post = post::create_post_resources(&device, &post_shader, format);
        let post_bind_group =
            post::make_scene_bind_group(&device, &post, &scene_view, &linear_sampler);

        let mut state = Self {
            surface,
            device,
            queue,
            config,
            linear_sampler,
            scene_view,
            quads,
            post,
            post_bind_group,
            atlas,
            atlas_texture,
            atlas_view,
            ornament_view,
            width,
            height,
            clear_color: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
        };
        state.write_globals();
        Ok(state)
    }

    fn write_globals(&mut self) {
        let aspect = if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        };
        let proj = Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
        let globals = Globals {
            view_proj: (proj * view).to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.quads.globals_buffer, 0, bytemuck::bytes_of(&globals));
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);

            let (_tex, scene_view) = helpers::create_color_texture(
                &self.device,
                "scene_tex",
                width,
                height,
                wgpu::TextureFormat::Rgba16Float,
                wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            );
            self.scene_view = scene_view;
            self.post_bind_group = post::make_scene_bind_group(
                &self.device,
                &self.post,
                &self.scene_view,
                &self.linear_sampler,
            );
            self.write_globals();
        }
    }

    /// Swap the ornament placeholder for the decoded sprite image.
    pub fn set_ornament_texture(&mut self, pixels: &ImagePixels) {
        let (_tex, view) = helpers::upload_rgba_texture(
            &self.device,
            &self.queue,
            "ornament_tex",
            pixels.width,
            pixels.height,
            &pixels.data,
        );
        self.ornament_view = view;
        self.rebuild_quad_bind_group();
    }

    fn rebuild_quad_bind_group(&mut self) {
        self.quads.bind_group = quads::make_bind_group(
            &self.device,
            &self.quads.bgl,
            &self.quads.globals_buffer,
            &self.linear_sampler,
            &self.atlas_view,
            &self.ornament_view,
        );
    }

    fn pack_instances(&self, draws: &SceneDraws) -> Vec<QuadInstance> {
        let mut out =
            Vec::with_capacity(draws.borders.len() + draws.ornaments.len() + draws.labels.len());
        for b in &draws.borders {
            out.push(QuadInstance {
                pos_rot_kind: [b.center.x, b.center.y, 0.0, quads::KIND_BORDER],
                size_res: [b.size.x, b.size.y, b.rect_px.x, b.rect_px.y],
                color: [b.color[0], b.color[1], b.color[2], b.opacity],
                uv_rect: [0.0, 0.0, 1.0, 1.0],
                border: [BORDER_WIDTH_PX, 0.0, 0.0, 0.0],
            });
        }
        for o in &draws.ornaments {
            out.push(QuadInstance {
                pos_rot_kind: [o.center.x, o.center.y, o.rotation, quads::KIND_ORNAMENT],
                size_res: [o.size.x, o.size.y, 0.0, 0.0],
                color: [o.shade, o.shade, o.shade, o.opacity],
                uv_rect: [0.0, 0.0, 1.0, 1.0],
                border: [0.0; 4],
            });
        }
        for l in &draws.labels {
            let entry = match self.atlas.entry(&l.spec.text, l.spec.font_px) {
                Some(e) => e,
                None => continue,
            };
            out.push(QuadInstance {
                pos_rot_kind: [l.center.x, l.center.y, 0.0, quads::KIND_LABEL],
                size_res: [l.size.x, l.size.y, entry.px.x, entry.px.y],
                color: [l.color[0], l.color[1], l.color[2], l.opacity],
                uv_rect: entry.uv_rect,
                border: [0.0; 4],
            });
        }
        out
    }

    pub fn render(
        &mut self,
        draws: &SceneDraws,
        strength: f32,
        aberration: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        for l in &draws.labels {
            if let Err(e) = self.atlas.ensure(&l.spec.text, l.spec.font_px) {
                log::error!("label atlas: {e}");
            }
        }
        // A reset during the pass above dropped entries ensured earlier in
        // the same frame; one more pass restores the full working set.
        if self.atlas.take_was_reset() {
            for l in &draws.labels {
                if let Err(e) = self.atlas.ensure(&l.spec.text, l.spec.font_px) {
                    log::error!("label atlas: {e}");
                }
            }
            if self.atlas.take_was_reset() {
                log::warn!("visible labels exceed the atlas; some skipped this frame");
            }
        }
        if self.atlas.take_dirty() {
            match self.atlas.pixels() {
                Ok(pixels) => helpers::write_rgba_texture(
                    &self.queue,
                    &self.atlas_texture,
                    LABEL_ATLAS_SIZE,
                    LABEL_ATLAS_SIZE,
                    &pixels,
                ),
                Err(e) => log::error!("label atlas readback: {e}"),
            }
        }

        let instances = self.pack_instances(draws);
        self.quads.ensure_capacity(&self.device, instances.len());
        if !instances.is_empty() {
            self.queue.write_buffer(
                &self.quads.instance_buffer,
                0,
                bytemuck::cast_slice(&instances),
            );
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
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
                    view: &self.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if !instances.is_empty() {
                rpass.set_pipeline(&self.quads.pipeline);
                rpass.set_bind_group(0, &self.quads.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.quads.instance_buffer.slice(..));
                rpass.draw(0..6, 0..instances.len() as u32);
            }
        }

        let uniforms = post::PostUniforms {
            resolution: [self.width as f32, self.height as f32],
            strength,
            aberration,
        };
        self.queue
            .write_buffer(&self.post.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("composite_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.post.composite_pipeline);
            rpass.set_bind_group(0, &self.post_bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
