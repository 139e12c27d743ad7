//! Tesserwave - Audio-reactive 4D polytope visualizer
//!
//! A rotating tesseract drawn as a 2D wireframe: the spectrum of whatever
//! the microphone hears drives rotation, intensity, and world transitions.

mod cli;

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use clap::Parser;

use cli::Args;
use tesserwave::audio::AudioCapture;
use tesserwave::engine::Engine;
use tesserwave::params::{RenderConfig, SpectrumConfig};
use tesserwave::rendering::RenderSystem;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Simulation systems
    engine: Engine,
    capture: Option<AudioCapture>,

    // Configuration
    render_config: RenderConfig,
    spectrum_config: SpectrumConfig,
    transition_ms: f64,
    world_cycle: Vec<String>,
    world_index: usize,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Self {
        let render_config = RenderConfig::default();
        let spectrum_config = SpectrumConfig::default();

        let engine = Engine::new(
            render_config.window_width,
            render_config.window_height,
            &args.world,
            args.parse_pattern(),
            spectrum_config.clone(),
            args.seed,
        );

        let world_cycle = engine.world_names();
        let world_index = world_cycle
            .iter()
            .position(|name| name == &args.world)
            .unwrap_or(0);

        Self {
            window: None,
            render_system: None,
            engine,
            capture: None,
            render_config,
            spectrum_config,
            transition_ms: args.transition_ms,
            world_cycle,
            world_index,
            start_time: Instant::now(),
        }
    }

    /// Jump to the next registered world
    fn cycle_world(&mut self) {
        self.world_index = (self.world_index + 1) % self.world_cycle.len();
        let name = self.world_cycle[self.world_index].clone();
        println!("World: {}", name);
        self.engine.activate_world(&name, self.transition_ms);
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Tesserwave - Audio-Reactive Hypercube")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window))).unwrap();

        // Initialize audio capture; without a device the engine runs on
        // synthetic idle levels
        let capture = match AudioCapture::new(self.spectrum_config.clone()) {
            Ok(capture) => Some(capture),
            Err(e) => {
                eprintln!("Audio capture unavailable ({}), running on idle levels", e);
                None
            }
        };

        println!("\nTesserwave is running!");
        println!("Space cycles worlds, 1/2/3 switch patterns, ESC quits\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
        self.capture = capture;
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.engine.dispose();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.engine.resize(size.width, size.height);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => {
                    self.engine.dispose();
                    event_loop.exit();
                }
                KeyCode::Space => self.cycle_world(),
                KeyCode::Digit1 => self.engine.set_pattern("tesseract"),
                KeyCode::Digit2 => self.engine.set_pattern("hypertetrahedra"),
                KeyCode::Digit3 => self.engine.set_pattern("tesseract_fold"),
                _ => {}
            },
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref mut render_system) = self.render_system else {
            return;
        };

        let now_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;

        // Latest spectrum snapshot; empty until capture warms up
        let spectrum = self
            .capture
            .as_ref()
            .map(|c| c.spectrum())
            .unwrap_or_default();

        let output = self.engine.tick(now_ms, &spectrum);

        render_system.update_segments(&output.segments, &output.params);
        render_system.update_uniforms(&output.params, (now_ms / 1000.0) as f32);

        if let Err(e) = render_system.render() {
            eprintln!("Render error: {:?}", e);
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Tesserwave - audio-reactive 4D polytope visualizer");
    println!("Initializing systems...\n");

    let mut app = App::new(&args);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
