// ============================================================================
// WINDOWED DISPLAY
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::error::GaugeError;
use crate::geometry::DisplaySize;
use crate::raster::Canvas;
use crate::{Gauge, GaugeCommand};

/// Pixel buffer dimensions for a display box, never zero.
fn buffer_size(display: DisplaySize) -> (u32, u32) {
    (
        display.width.ceil().max(1.0) as u32,
        display.height.ceil().max(1.0) as u32,
    )
}

impl Gauge {
    /// Opens a window showing the gauge in its current state. Blocks until the
    /// window is closed.
    pub fn show(&mut self, title: &str, font: Option<Font<'static>>) -> Result<(), GaugeError> {
        self.run_window(title, font, None)
    }

    /// Like [`Gauge::show`], applying commands from `receiver` before each frame.
    pub fn show_with_commands(
        &mut self,
        title: &str,
        font: Option<Font<'static>>,
        receiver: Receiver<GaugeCommand>,
    ) -> Result<(), GaugeError> {
        self.run_window(title, font, Some(receiver))
    }

    fn run_window(
        &mut self,
        title: &str,
        font: Option<Font<'static>>,
        receiver: Option<Receiver<GaugeCommand>>,
    ) -> Result<(), GaugeError> {
        if font.is_none() {
            log::warn!("no font loaded; tick labels and the readout will not be drawn");
        }

        let (mut fb_width, mut fb_height) = buffer_size(self.display_size());

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(fb_width as f64, fb_height as f64))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(fb_width, fb_height, surface_texture)?;
        log::info!("showing \"{title}\" at {fb_width}x{fb_height}");

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.theme.max_framerate);
        let mut last_frame = Instant::now();

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::warn!("could not resize surface: {err}");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(receiver) = &receiver {
                            while let Ok(command) = receiver.try_recv() {
                                if let Err(err) = self.apply(command) {
                                    log::warn!("ignoring gauge command: {err}");
                                }
                            }
                        }

                        let changes = self.take_changes();
                        if changes.sweep || changes.viewport {
                            let (width, height) = buffer_size(self.display_size());
                            if (width, height) != (fb_width, fb_height) {
                                match pixels.resize_buffer(width, height) {
                                    Ok(()) => {
                                        fb_width = width;
                                        fb_height = height;
                                        let _ = window_clone.request_inner_size(
                                            LogicalSize::new(width as f64, height as f64),
                                        );
                                    }
                                    Err(err) => log::warn!("could not resize frame buffer: {err}"),
                                }
                            }
                        }

                        let scene = self.scene();
                        let mut canvas =
                            Canvas::new(pixels.frame_mut(), fb_width as usize, fb_height as usize);
                        canvas.clear(self.config.theme.background);
                        canvas.draw(&scene, font.as_ref());
                        if let Err(err) = pixels.render() {
                            log::error!("render failed: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
