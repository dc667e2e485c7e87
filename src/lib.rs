// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod animation;
pub mod appliance;
pub mod canvas;
pub mod color;
pub mod config;
pub mod controller;
pub mod engine;
pub mod persistence;
pub mod scene;
pub mod scheduler;
pub mod status;
pub mod ui;

// External crate imports
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::time::Instant;

// Window management imports
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::WindowBuilder;

pub use appliance::{AnimationFamily, Appliance, Registry, UnknownApplianceError};
pub use color::Color;
pub use config::PanelConfig;
pub use controller::Controller;
pub use engine::AnimationEngine;
pub use persistence::{PersistenceError, StateStore};

use canvas::Canvas;
use ui::Layout;

// ============================================================================
// PUBLIC INTERFACE
// ============================================================================

/// The appliance control panel window.
pub struct Panel {
    config: PanelConfig,
}

impl Panel {
    pub fn new(config: PanelConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    pub fn show(&self) -> Result<(), Box<dyn std::error::Error>> {
        let font = self.config.load_font();
        let mut controller = Controller::new(&self.config);
        controller.engine_mut().set_font(font.clone());
        controller.load(Instant::now());

        self.run_window(controller, font)
    }

    // ========================================================================
    // EVENT LOOP
    // ========================================================================

    fn run_window(
        &self,
        mut controller: Controller,
        font: Option<rusttype::Font<'static>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let logical_width = self.config.window_width;
        let logical_height = self.config.window_height;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(
                logical_width as f64,
                logical_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        // The buffer stays at the logical size; pixels scales it onto the
        // physical surface.
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(
            logical_width as u32,
            logical_height as u32,
            surface_texture,
        )?;

        let layout = Layout::new(&self.config);
        let mut cursor: Option<(i32, i32)> = None;

        tracing::info!(
            width = logical_width,
            height = logical_height,
            state_file = %self.config.state_file.display(),
            "panel started"
        );

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        tracing::error!(error = %err, "failed to resize surface");
                        window_target.exit();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = pixels
                        .window_pos_to_pixel((position.x as f32, position.y as f32))
                        .ok()
                        .map(|(x, y)| (x as i32, y as i32));
                }
                WindowEvent::CursorLeft { .. } => {
                    cursor = None;
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    if let Some(target) = cursor.and_then(|(x, y)| layout.hit(x, y)) {
                        ui::dispatch(&mut controller, target, Instant::now());
                        window_clone.request_redraw();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state != ElementState::Pressed || event.repeat {
                        return;
                    }
                    if let Key::Character(text) = &event.logical_key {
                        if let Some(target) = ui::key_target(text.as_str()) {
                            ui::dispatch(&mut controller, target, Instant::now());
                            window_clone.request_redraw();
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let frame = pixels.frame_mut();
                    let mut canvas = Canvas::new(frame, logical_width, logical_height);
                    ui::render_panel(
                        &mut canvas,
                        &layout,
                        &controller,
                        &self.config,
                        font.as_ref(),
                    );
                    if let Err(err) = pixels.render() {
                        tracing::error!(error = %err, "failed to present frame");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if controller.poll(Instant::now()) > 0 {
                    window_clone.request_redraw();
                }
                match controller.next_deadline() {
                    Some(deadline) => {
                        window_target.set_control_flow(ControlFlow::WaitUntil(deadline))
                    }
                    None => window_target.set_control_flow(ControlFlow::Wait),
                }
            }
            _ => {}
        })?;

        Ok(())
    }
}
