//! Starward -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices; each slice updates
//!      the screen stack (menus, gameplay, pause popup) exactly once
//!   3. Screens emit quads and text into a `SpriteBatch`
//!   4. Stream the batch into GPU buffers, replay its draw calls, composite
//!      the egui debug overlay
//!
//! Input edges are cleared after every consumed step, never on zero-step
//! frames, so a key press can neither be lost nor double-fire across the
//! steps of a single frame.

mod audio;
mod enemy;
mod gameplay;
mod laser;
mod menu;
mod player;
#[cfg(test)]
mod replay;
mod screen;
mod sprites;
mod starfield;
mod tuning;

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use audio::AudioBank;
use menu::MainMenuScreen;
use screen::{ScreenStack, UpdateCtx};
use sw_core::geom::Rect;
use sw_core::input::{InputState, Key};
use sw_core::time::TimeState;
use sw_devtools::{DebugOverlay, OverlayStats};
use sw_platform::window::PlatformConfig;
use sw_render::{Camera2D, GlyphFont, GpuContext, SpriteBatch, SpritePipeline, SpriteVertex, Texture};
use tuning::{load_tuning_from_path, TUNING_PATH};

/// The playfield the game simulates against, independent of window size.
const VIRTUAL_WIDTH: f32 = 960.0;
const VIRTUAL_HEIGHT: f32 = 540.0;

struct GpuSpriteTexture {
    bind_group: wgpu::BindGroup,
}

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,
    font: GlyphFont,
    audio: AudioBank,
    stack: ScreenStack,
    batch: SpriteBatch,
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    paused: bool,
    single_step_requested: bool,

    // --- Per-frame GPU mesh state ---------------------------------------
    // The sprite mesh is rebuilt on the CPU each frame, then streamed into
    // these buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new();
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);
        let font = GlyphFont::new();

        // Master volume comes from the same tuning file gameplay uses; the
        // bank itself is shared across every screen for the whole run.
        let master_volume = match load_tuning_from_path(std::path::Path::new(TUNING_PATH)) {
            Ok(tuning) => tuning.audio.master_volume,
            Err(e) => {
                log::warn!("Using default master volume: {e}");
                tuning::GameTuning::default().audio.master_volume
            }
        };
        let audio = AudioBank::new(master_volume);

        let mut textures = HashMap::new();
        for key in [
            sprites::SHIP,
            sprites::ENEMY,
            sprites::LASER,
            sprites::STAR,
            sprites::WHITE,
        ] {
            textures.insert(
                Arc::from(key),
                load_sprite_texture(&gpu.device, &gpu.queue, &sprite_pipeline, key),
            );
        }
        let (glyph_pixels, glyph_w, glyph_h) = font.bake_atlas();
        let glyph_texture = Texture::from_rgba8(
            &gpu.device,
            &gpu.queue,
            &glyph_pixels,
            glyph_w,
            glyph_h,
            "glyph_atlas",
        );
        let glyph_bind_group =
            sprite_pipeline.create_texture_bind_group(&gpu.device, &glyph_texture);
        textures.insert(
            Arc::from(GlyphFont::TEXTURE_KEY),
            GpuSpriteTexture {
                bind_group: glyph_bind_group,
            },
        );

        // The projection never changes: the virtual playfield is constant
        // and window resizes only alter the surface.
        let camera_uniform = Camera2D::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT).build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut stack = ScreenStack::new();
        stack.push(Box::new(MainMenuScreen::new()));

        Self {
            window,
            gpu,
            time,
            input,
            sprite_pipeline,
            debug_overlay,
            font,
            audio,
            stack,
            batch: SpriteBatch::new(),
            textures,
            paused: false,
            single_step_requested: false,
            vertex_buffer,
            index_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 1,
            mesh_index_capacity: 1,
        }
    }

    fn playfield(&self) -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(VIRTUAL_WIDTH, VIRTUAL_HEIGHT))
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    fn upload_batch(&mut self) {
        self.ensure_mesh_capacity(self.batch.vertices.len(), self.batch.indices.len());
        if !self.batch.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.batch.vertices),
            );
        }
        if !self.batch.indices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(&self.batch.indices),
            );
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = sw_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                let playfield = state.playfield();
                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::F3) {
                        state.debug_overlay.toggle();
                    }

                    if state.paused && !state.single_step_requested {
                        // Edges were still visible to this (skipped) step.
                        state.input.end_frame();
                        break;
                    }
                    state.single_step_requested = false;

                    let ctx = UpdateCtx {
                        dt: state.time.fixed_dt as f32,
                        input: &state.input,
                        audio: &state.audio,
                        playfield,
                    };
                    state.stack.update(&ctx);

                    // This step consumed the current edges; clear them so the
                    // next step in the same frame does not see them again.
                    state.input.end_frame();

                    if state.stack.exit_requested() || state.stack.is_empty() {
                        log::info!("Exit requested, shutting down.");
                        event_loop.exit();
                        return;
                    }
                }

                // Build and upload this frame's sprite mesh.
                state.batch.clear();
                let (batch, stack, font) = (&mut state.batch, &state.stack, &state.font);
                stack.draw(batch, font, playfield);
                state.upload_batch();

                let sim = state.stack.sim_stats().unwrap_or_default();
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.time,
                        Some(OverlayStats {
                            draw_calls: state.batch.draw_calls.len() as u32,
                            sprite_count: state.batch.quad_count() as u32,
                            enemy_count: sim.enemy_count,
                            wave_size: sim.wave_size,
                            laser_count: sim.laser_count,
                            score: sim.score,
                            paused: state.paused,
                        }),
                    );

                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }

                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Game Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color {
                                    r: 0.008,
                                    g: 0.011,
                                    b: 0.035,
                                    a: 1.0,
                                }),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in &state.batch.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        } else {
                            log::warn!("Draw call references unknown texture '{}'", draw.texture_key);
                        }
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Load a sprite texture: a PNG at `assets/sprites/<key>.png` overrides the
/// built-in art. Internal keys (double underscore) never touch disk.
fn load_sprite_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    key: &str,
) -> GpuSpriteTexture {
    let texture = if !key.starts_with("__") {
        let path = sprites::override_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::info!("Sprite override: {}", path.display());
                Some(Texture::from_bytes(device, queue, &bytes, key))
            }
            Err(_) => None,
        }
    } else {
        None
    };

    let texture = texture.unwrap_or_else(|| {
        let art = sprites::builtin_art(key).expect("builtin sprite art");
        Texture::from_rgba8(device, queue, &art.pixels, art.width, art.height, key)
    });

    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    GpuSpriteTexture { bind_group }
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyP => Some(Key::P),
        KeyCode::KeyR => Some(Key::R),
        KeyCode::F3 => Some(Key::F3),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starward starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
