use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::animation::AnimationState;
use crate::bike_pass::BikePass;
use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::gpu::{GpuContext, ViewerError};
use crate::input::Input;
use crate::scene::{DrawInstruction, Rig};

/// Open a window and run the bike until it is closed.
///
/// Each redraw runs one frame tick: input snapshot, camera keys, animation
/// and composition, render, then the per-frame input reset.
///
/// # Example
/// ```no_run
/// flatpack::run(flatpack::ViewerConfig::new().title("Bike").size(1280, 720))?;
/// # Ok::<(), flatpack::ViewerError>(())
/// ```
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FlatpackApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        FlatpackApp::Failed(e) => Err(e),
        _ => Ok(()),
    }
}

/// Label shown for the flatpack key: what pressing it will do next.
pub fn flatpack_label(state: &AnimationState) -> &'static str {
    if state.flat_pack_active && !state.unpacking {
        "Unpack"
    } else {
        "Flatpack"
    }
}

/// Counts frames and reports the rate once per second.
#[derive(Debug)]
struct FpsCounter {
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    /// Records a frame; returns the frame count once a full second has passed.
    fn frame(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) >= Duration::from_secs(1) {
            let fps = self.frames;
            self.frames = 0;
            self.window_start = now;
            Some(fps)
        } else {
            None
        }
    }
}

enum FlatpackApp {
    Pending {
        config: ViewerConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        pass: BikePass,
        rig: Rig,
        camera: Camera,
        input: Input,
        fps: FpsCounter,
        last_fps: u32,
        title: String,
    },
    Failed(ViewerError),
}

impl FlatpackApp {
    fn start(config: &ViewerConfig, event_loop: &ActiveEventLoop) -> Result<Self, ViewerError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let rig = Rig::new();
        let pass = BikePass::new(
            &gpu,
            rig.library(),
            &config.textures,
            config.light.clone(),
            config.clear_color,
        );

        tracing::info!(
            width = gpu.width(),
            height = gpu.height(),
            meshes = rig.library().len(),
            "viewer started"
        );

        Ok(FlatpackApp::Running {
            window,
            gpu,
            pass,
            rig,
            camera: Camera::from_config(&config.camera),
            input: Input::new(),
            fps: FpsCounter::new(Instant::now()),
            last_fps: 0,
            title: config.window.title.clone(),
        })
    }
}

impl ApplicationHandler for FlatpackApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let FlatpackApp::Pending { config } = self {
            *self = match FlatpackApp::start(config, event_loop) {
                Ok(running) => running,
                Err(e) => {
                    tracing::error!("failed to start viewer: {e}");
                    event_loop.exit();
                    FlatpackApp::Failed(e)
                }
            };
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let FlatpackApp::Running {
            window,
            gpu,
            pass,
            rig,
            camera,
            input,
            fps,
            last_fps,
            title,
        } = self
        else {
            return;
        };

        input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let snapshot = input.snapshot();
                camera.handle_keys(&snapshot);

                match rig.tick(&snapshot) {
                    Ok(draws) => render_frame(gpu, pass, camera, draws),
                    Err(e) => tracing::error!("composition failed, skipping frame: {e}"),
                }

                if let Some(rate) = fps.frame(Instant::now()) {
                    tracing::debug!(fps = rate, "frame rate");
                    *last_fps = rate;
                }
                window.set_title(&format!(
                    "{title} | {last_fps} fps | F: {}",
                    flatpack_label(rig.state())
                ));

                input.begin_frame();
                window.request_redraw();
            }
            _ => {}
        }
    }
}

fn render_frame(gpu: &GpuContext, pass: &mut BikePass, camera: &Camera, draws: &[DrawInstruction]) {
    let output = match gpu.surface.get_current_texture() {
        Ok(output) => output,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.reconfigure();
            return;
        }
        Err(e) => {
            tracing::warn!("skipping frame: {}", ViewerError::from(e));
            return;
        }
    };
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Bike Encoder"),
        });

    pass.render(gpu, &mut encoder, &view, camera, draws);

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names_the_next_action() {
        let mut state = AnimationState::default();
        assert_eq!(flatpack_label(&state), "Flatpack");

        state.flat_pack_active = true;
        assert_eq!(flatpack_label(&state), "Unpack");

        state.unpacking = true;
        assert_eq!(flatpack_label(&state), "Flatpack");
    }

    #[test]
    fn fps_reports_once_per_second() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);
        for i in 1..60 {
            assert_eq!(counter.frame(start + Duration::from_millis(i * 16)), None);
        }
        assert_eq!(counter.frame(start + Duration::from_secs(1)), Some(60));
        assert_eq!(counter.frame(start + Duration::from_millis(1100)), None);
    }
}
