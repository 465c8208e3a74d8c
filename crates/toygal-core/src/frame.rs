//! Per-frame uniform state.

/// The standard per-frame values the host supplies before each draw.
///
/// Entries never own this; the host recomputes it every frame and the runtime
/// uploads it into whichever standard uniforms the linked program kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub width: i32,
    pub height: i32,
    /// Seconds since the instance started.
    pub time: f32,
    /// Seconds since the previous frame.
    pub time_delta: f32,
    pub frame: u64,
    /// Smoothed frames per second.
    pub frame_rate: f32,
    /// Shadertoy mouse semantics: `xy` = position while the button is down,
    /// `zw` = position at the last click, signs of `zw` encode down/clicked.
    pub mouse: [f32; 4],
    /// `(year, month - 1, day, seconds of day)`.
    pub date: [f32; 4],
    pub channel_time: [f32; 4],
    pub channel_resolution: [[f32; 3]; 4],
}

impl FrameState {
    /// A deterministic zero state (frame 0, t = 0). Tests rely on this being
    /// reproducible.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            time: 0.0,
            time_delta: 0.0,
            frame: 0,
            frame_rate: 0.0,
            mouse: [0.0; 4],
            date: [0.0; 4],
            channel_time: [0.0; 4],
            channel_resolution: [[0.0; 3]; 4],
        }
    }

    /// Advance to the next frame given the measured delta, updating time,
    /// frame counter, and the smoothed frame rate.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.time += dt;
        self.time_delta = dt;
        self.frame += 1;
        if dt > 0.0 {
            let inst = 1.0 / dt;
            self.frame_rate = if self.frame_rate > 0.0 {
                self.frame_rate * 0.95 + inst * 0.05
            } else {
                inst
            };
        }
        self.channel_time = [self.time; 4];
    }

    pub fn set_size(&mut self, width: i32, height: i32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn resolution(&self) -> [f32; 3] {
        [self.width as f32, self.height as f32, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_state_is_deterministic() {
        assert_eq!(FrameState::new(640, 360), FrameState::new(640, 360));
    }

    #[test]
    fn advance_accumulates_time_and_frames() {
        let mut f = FrameState::new(640, 360);
        f.advance(1.0 / 60.0);
        f.advance(1.0 / 60.0);
        assert_eq!(f.frame, 2);
        assert!((f.time - 2.0 / 60.0).abs() < 1e-6);
        assert!((f.time_delta - 1.0 / 60.0).abs() < 1e-6);
        assert!(f.frame_rate > 0.0);
        assert_eq!(f.channel_time, [f.time; 4]);
    }

    #[test]
    fn degenerate_sizes_clamp_to_one() {
        let f = FrameState::new(0, -3);
        assert_eq!((f.width, f.height), (1, 1));
    }
}
