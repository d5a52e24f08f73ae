//! winit host loop for the gallery
//!
//! Creates the window and GPU context on resume, forwards input, and runs
//! one update + render per redraw.

use anyhow::Context;
use gallery_render::{GalleryRenderer, RenderContext, RendererConfig};
use gallery_runtime::{actions, GameClock, InputState};
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowId};

use crate::config::GalleryConfig;
use crate::gallery::Gallery;

pub struct PlayerApp {
    config: GalleryConfig,
    clock: GameClock,
    input: InputState,

    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    renderer: Option<GalleryRenderer>,
    gallery: Option<Gallery>,

    shown_score: Option<u32>,
    error: Option<anyhow::Error>,
}

impl PlayerApp {
    pub fn new(config: GalleryConfig) -> Self {
        Self {
            config,
            clock: GameClock::new(),
            input: InputState::new(),
            window: None,
            context: None,
            renderer: None,
            gallery: None,
            shown_score: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let context = pollster::block_on(RenderContext::new(window.clone(), self.config.window.vsync))
            .context("Failed to initialize GPU")?;

        let renderer = GalleryRenderer::new(
            &context,
            &RendererConfig {
                lighting: self.config.lighting.clone(),
                shadow: self.config.shadow.clone(),
                refraction_scale: self.config.glass.refraction_scale,
                particle_capacity: self.config.emitter.max_particles,
            },
        );

        let gallery = Gallery::new(
            &self.config,
            renderer.resources(),
            context.width(),
            context.height(),
        )
        .context("Failed to build scene")?;

        self.window = Some(window);
        self.context = Some(context);
        self.renderer = Some(renderer);
        self.gallery = Some(gallery);
        Ok(())
    }

    fn tick(&mut self) {
        let time = self.clock.tick();
        if let Some(gallery) = &mut self.gallery {
            gallery.update(&self.input, time);
        }
        self.input.end_frame();
    }

    fn render(&mut self) {
        let (Some(gallery), Some(renderer), Some(context)) =
            (&mut self.gallery, &mut self.renderer, &mut self.context)
        else {
            return;
        };

        let frame = gallery.frame();
        if let Err(e) = renderer.render(context, frame.camera, &frame.plan, frame.particle_vertices) {
            tracing::error!("render failed: {e}");
        }
    }

    fn update_title(&mut self) {
        let (Some(window), Some(gallery)) = (&self.window, &self.gallery) else {
            return;
        };
        let score = gallery.score();
        if self.shown_score != Some(score) {
            window.set_title(&format!("{} - Score: {}", self.config.window.title, score));
            self.shown_score = Some(score);
        }
    }
}

impl ApplicationHandler for PlayerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.initialize(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                let resized = self
                    .context
                    .as_mut()
                    .is_some_and(|c| c.resize(new_size.width, new_size.height));
                if resized {
                    if let Some(gallery) = &mut self.gallery {
                        gallery.resize(new_size.width, new_size.height);
                    }
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(new_size.width, new_size.height);
                    }
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.input.process_key_down(key_code),
                        ElementState::Released => self.input.process_key_up(key_code),
                    }
                }
                if self.input.is_action_pressed(actions::QUIT) {
                    event_loop.exit();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.input.process_mouse_move(position.x, position.y);
            }

            WindowEvent::CursorLeft { .. } => {
                self.input.reset_cursor();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let btn = match button {
                    MouseButton::Left => 0,
                    MouseButton::Right => 1,
                    MouseButton::Middle => 2,
                    _ => return,
                };
                match state {
                    ElementState::Pressed => self.input.process_mouse_button_down(btn),
                    ElementState::Released => self.input.process_mouse_button_up(btn),
                }
            }

            WindowEvent::RedrawRequested => {
                self.tick();
                self.render();
                self.update_title();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
