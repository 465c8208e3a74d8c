//! Gallery viewer.
//!
//! Left/Right cycles entries, Escape quits. An optional first argument names
//! a JSON viewer config (window size, starting entry, assets root).

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context};
use winit::event::{ElementState, Event, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use toygal_core::{load_viewer_config, FrameState, ViewerConfig};
use toygal_host_winit::GlWindow;
use toygal_runtime_glow::{blit_to_screen, EntryInstance};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => load_viewer_config(&path).with_context(|| format!("loading {path}"))?,
        None => ViewerConfig::default(),
    };

    let gallery = toygal_gallery::builtin_gallery()?;
    let keys: Vec<String> = gallery
        .ordered()
        .iter()
        .map(|e| e.key().to_string())
        .collect();
    if keys.is_empty() {
        return Err(anyhow!("gallery has no presentable entries"));
    }

    let mut current = match &cfg.start_entry {
        Some(k) => keys
            .iter()
            .position(|key| key == k)
            .ok_or_else(|| anyhow!("start_entry '{k}' is not in the gallery"))?,
        None => 0,
    };

    let event_loop = EventLoop::new();
    let host = GlWindow::new(&event_loop, "toygal viewer", cfg.width, cfg.height)?;
    let (w, h) = host.inner_size();

    let assets_root = cfg.assets_root.clone();
    let entry = gallery.get(&keys[current]).unwrap();
    let mut instance = unsafe {
        EntryInstance::new(&host.gl, entry, w, h, assets_root.as_deref())?
    };
    tracing::info!(key = %keys[current], "showing entry");

    let mut fs = FrameState::new(w, h);
    let mut last_frame = Instant::now();
    let mut mouse = MouseTracker::default();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                WindowEvent::Resized(size) => {
                    host.resize_surface(size.width, size.height);
                    fs.set_size(size.width.max(1) as i32, size.height.max(1) as i32);
                    host.window.request_redraw();
                }

                WindowEvent::CursorMoved { position, .. } => {
                    // GL origin is bottom-left.
                    mouse.move_to(
                        position.x as f32,
                        fs.height as f32 - position.y as f32,
                        &mut fs.mouse,
                    );
                }

                WindowEvent::MouseInput { state, button, .. } => {
                    if button == MouseButton::Left {
                        if state == ElementState::Pressed {
                            mouse.press(&mut fs.mouse);
                        } else {
                            mouse.release(&mut fs.mouse);
                        }
                    }
                }

                WindowEvent::KeyboardInput { input, .. } => {
                    if input.state != ElementState::Pressed {
                        return;
                    }
                    let step: i64 = match input.virtual_keycode {
                        Some(VirtualKeyCode::Escape) => {
                            *control_flow = ControlFlow::Exit;
                            return;
                        }
                        Some(VirtualKeyCode::Right) => 1,
                        Some(VirtualKeyCode::Left) => -1,
                        _ => return,
                    };

                    let next =
                        (current as i64 + step).rem_euclid(keys.len() as i64) as usize;
                    let entry = gallery.get(&keys[next]).unwrap();
                    match unsafe {
                        EntryInstance::new(&host.gl, entry, fs.width, fs.height, assets_root.as_deref())
                    } {
                        Ok(new_instance) => {
                            unsafe { instance.destroy(&host.gl) };
                            instance = new_instance;
                            current = next;
                            fs = FrameState::new(fs.width, fs.height);
                            last_frame = Instant::now();
                            tracing::info!(key = %keys[current], "showing entry");
                        }
                        Err(e) => {
                            tracing::error!(key = %keys[next], error = %e, "entry failed to load; keeping current");
                        }
                    }
                }

                _ => {}
            },

            Event::MainEventsCleared => host.window.request_redraw(),

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                fs.advance(dt);
                fs.date = wall_clock_date();

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

/// Folds cursor and left-button events into the `iMouse` vector.
///
/// The cursor is cached on every move so a press anchors `zw` at the
/// position the click actually landed, not wherever the last drag ended.
/// `xy` only follows the cursor while the button is held; on release the
/// `zw` signs flip negative, which is how shaders tell drag from idle.
#[derive(Debug, Default)]
struct MouseTracker {
    cursor: [f32; 2],
    down: bool,
}

impl MouseTracker {
    fn move_to(&mut self, x: f32, y: f32, mouse: &mut [f32; 4]) {
        self.cursor = [x, y];
        if self.down {
            mouse[0] = x;
            mouse[1] = y;
        }
    }

    fn press(&mut self, mouse: &mut [f32; 4]) {
        self.down = true;
        mouse[0] = self.cursor[0];
        mouse[1] = self.cursor[1];
        mouse[2] = self.cursor[0];
        mouse[3] = self.cursor[1];
    }

    fn release(&mut self, mouse: &mut [f32; 4]) {
        self.down = false;
        mouse[2] = -mouse[2].abs();
        mouse[3] = -mouse[3].abs();
    }
}

/// UTC `iDate` from the system clock.
fn wall_clock_date() -> [f32; 4] {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    civil_date(secs)
}

/// `[year, month - 1, day, seconds-of-day]` for a unix timestamp, matching
/// the `FrameState::date` layout. The month slot is zero-based.
fn civil_date(secs: i64) -> [f32; 4] {
    let days = secs.div_euclid(86_400);
    let second_of_day = secs.rem_euclid(86_400);

    // Civil-from-days (proleptic Gregorian).
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = if m <= 2 { y + 1 } else { y };

    [y as f32, (m - 1) as f32, d as f32, second_of_day as f32]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_slots_follow_month_zero_convention() {
        assert_eq!(civil_date(0), [1970.0, 0.0, 1.0, 0.0]);

        // 2000-02-29T12:00:00Z, a leap day. February is month0 1.
        let leap = civil_date(951_825_600);
        assert_eq!(leap, [2000.0, 1.0, 29.0, 43_200.0]);

        // 2026-08-29T00:00:10Z. August is month0 7.
        let aug = civil_date(1_787_961_610);
        assert_eq!(aug[0], 2026.0);
        assert_eq!(aug[1], 7.0);
        assert_eq!(aug[2], 29.0);
        assert_eq!(aug[3], 10.0);
    }

    #[test]
    fn click_anchors_at_the_cursor_not_the_previous_drag() {
        let mut tracker = MouseTracker::default();
        let mut mouse = [0.0f32; 4];

        // A full drag somewhere else first.
        tracker.move_to(10.0, 20.0, &mut mouse);
        tracker.press(&mut mouse);
        tracker.move_to(30.0, 40.0, &mut mouse);
        tracker.release(&mut mouse);

        // Hover to a new spot without the button held, then click.
        tracker.move_to(100.0, 200.0, &mut mouse);
        tracker.press(&mut mouse);
        assert_eq!(mouse, [100.0, 200.0, 100.0, 200.0]);
    }

    #[test]
    fn cursor_only_writes_position_while_dragging() {
        let mut tracker = MouseTracker::default();
        let mut mouse = [0.0f32; 4];

        tracker.move_to(5.0, 6.0, &mut mouse);
        assert_eq!(mouse, [0.0; 4]);

        tracker.press(&mut mouse);
        tracker.move_to(7.0, 8.0, &mut mouse);
        assert_eq!(mouse[0], 7.0);
        assert_eq!(mouse[1], 8.0);
        assert_eq!(mouse[2], 5.0);
        assert_eq!(mouse[3], 6.0);
    }

    #[test]
    fn release_flips_the_click_anchor_negative() {
        let mut tracker = MouseTracker::default();
        let mut mouse = [0.0f32; 4];

        tracker.move_to(12.0, 34.0, &mut mouse);
        tracker.press(&mut mouse);
        tracker.release(&mut mouse);
        assert_eq!(mouse[2], -12.0);
        assert_eq!(mouse[3], -34.0);
    }
}
