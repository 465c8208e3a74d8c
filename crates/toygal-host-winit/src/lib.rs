//! Host glue (policy layer).
//!
//! Owns the winit window and the glutin surface/context pair, and hands the
//! viewer a ready [`glow::Context`]. Stays separate from the runtime so the
//! runtime remains embed-friendly (offscreen hosts, tests, other windowing
//! stacks).

use std::num::NonZeroU32;

use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use raw_window_handle::HasRawWindowHandle;
use winit::event_loop::EventLoop;
use winit::window::WindowBuilder;

pub use toygal_runtime_glow::EngineError;

/// A window with a current GL context and a loaded function table.
pub struct GlWindow {
    pub window: winit::window::Window,
    pub gl_surface: glutin::surface::Surface<glutin::surface::WindowSurface>,
    pub gl_context: glutin::context::PossiblyCurrentContext,
    pub gl: glow::Context,
}

impl GlWindow {
    /// Build the window, pick a config (most MSAA samples wins), create and
    /// current the context, load GL.
    pub fn new(
        event_loop: &EventLoop<()>,
        title: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, EngineError> {
        let window_builder = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(winit::dpi::LogicalSize::new(width as f64, height as f64));

        let template = glutin::config::ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_depth_size(0)
            .with_stencil_size(0)
            .with_transparency(false);

        let display_builder =
            glutin_winit::DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .unwrap()
            })
            .map_err(|e| EngineError::GlCreate(format!("DisplayBuilder.build: {e}")))?;

        let window = window
            .ok_or_else(|| EngineError::GlCreate("DisplayBuilder did not create a window".into()))?;
        let gl_display = gl_config.display();

        let raw_window_handle = window.raw_window_handle();

        let context_attributes = glutin::context::ContextAttributesBuilder::new()
            .with_profile(glutin::context::GlProfile::Core)
            .build(Some(raw_window_handle));

        let fallback_context_attributes = glutin::context::ContextAttributesBuilder::new()
            .with_profile(glutin::context::GlProfile::Core)
            .build(None);

        let not_current_gl_context = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .or_else(|_| gl_display.create_context(&gl_config, &fallback_context_attributes))
                .map_err(|e| EngineError::GlCreate(format!("create_context: {e}")))?
        };

        let (w, h) = {
            let s = window.inner_size();
            (s.width.max(1), s.height.max(1))
        };

        let attrs =
            glutin::surface::SurfaceAttributesBuilder::<glutin::surface::WindowSurface>::new()
                .build(
                    raw_window_handle,
                    NonZeroU32::new(w).unwrap(),
                    NonZeroU32::new(h).unwrap(),
                );

        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &attrs)
                .map_err(|e| EngineError::GlCreate(format!("create_window_surface: {e}")))?
        };

        let gl_context = not_current_gl_context
            .make_current(&gl_surface)
            .map_err(|e| EngineError::GlCreate(format!("make_current: {e}")))?;

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                gl_display.get_proc_address(std::ffi::CString::new(s).unwrap().as_c_str())
                    as *const _
            })
        };

        Ok(Self {
            window,
            gl_surface,
            gl_context,
            gl,
        })
    }

    /// Resize the swapchain surface after a window resize event.
    pub fn resize_surface(&self, width: u32, height: u32) {
        let w = width.max(1);
        let h = height.max(1);
        self.gl_surface.resize(
            &self.gl_context,
            NonZeroU32::new(w).unwrap(),
            NonZeroU32::new(h).unwrap(),
        );
    }

    /// Current drawable size, clamped to at least 1x1.
    pub fn inner_size(&self) -> (i32, i32) {
        let s = self.window.inner_size();
        (s.width.max(1) as i32, s.height.max(1) as i32)
    }

    pub fn swap_buffers(&self) -> Result<(), EngineError> {
        self.gl_surface
            .swap_buffers(&self.gl_context)
            .map_err(|e| EngineError::GlCreate(format!("swap_buffers: {e}")))
    }
}
