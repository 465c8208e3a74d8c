//! Smallest possible host: show one built-in entry until the window closes.

use std::time::Instant;

use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use toygal_core::FrameState;
use toygal_gallery::entries::MetaBlobs;
use toygal_host_winit::GlWindow;
use toygal_runtime_glow::{blit_to_screen, EntryInstance};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let event_loop = EventLoop::new();
    let host = GlWindow::new(&event_loop, "toygal: single pass", 960, 540)?;
    let (w, h) = host.inner_size();

    let mut instance = unsafe { EntryInstance::new(&host.gl, &MetaBlobs, w, h, None)? };
    let mut fs = FrameState::new(w, h);
    let mut last_frame = Instant::now();
    tracing::info!(key = instance.key(), "rendering");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => {
                    host.resize_surface(size.width, size.height);
                    fs.set_size(size.width.max(1) as i32, size.height.max(1) as i32);
                }
                _ => {}
            },

            Event::MainEventsCleared => host.window.request_redraw(),

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                fs.advance(now.duration_since(last_frame).as_secs_f32());
                last_frame = now;

                let (dst_w, dst_h) = host.inner_size();
                match unsafe { instance.render(&host.gl, &fs) } {
                    Ok(out) => unsafe { blit_to_screen(&host.gl, &out, dst_w, dst_h) },
                    Err(e) => {
                        tracing::error!(error = %e, "render failed");
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                }

                if let Err(e) = host.swap_buffers() {
                    tracing::error!(error = %e, "swap_buffers failed");
                    *control_flow = ControlFlow::Exit;
                }
            }

            _ => {}
        }
    });
}
