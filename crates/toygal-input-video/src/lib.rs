//! Video channel decoding.
//!
//! A `type: 2` channel streams a video file into a texture. Decoding is
//! delegated to an external ffmpeg process writing raw RGBA to a pipe; a
//! background thread keeps only the latest frame, and the runtime polls it
//! non-blockingly each render. This is the single concurrency concern in the
//! whole gallery, and it stops cleanly on Drop.

use serde::{Deserialize, Serialize};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA, row-major, tightly packed, already vertically flipped for GL.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    /// Input file path.
    pub file: String,

    /// Decoded output width (pixels).
    #[serde(default = "default_width")]
    pub width: u32,

    /// Decoded output height (pixels).
    #[serde(default = "default_height")]
    pub height: u32,

    /// Nominal fps, used by hosts to map timeline time to frame indices.
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Restart decoding when the stream ends.
    #[serde(default = "default_loop", rename = "loop")]
    pub looped: bool,

    /// Optional explicit ffmpeg binary path.
    #[serde(default)]
    pub ffmpeg_path: Option<String>,
}

fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    360
}
fn default_fps() -> u32 {
    30
}
fn default_loop() -> bool {
    true
}

#[derive(thiserror::Error, Debug)]
pub enum VideoError {
    #[error("failed to spawn ffmpeg: {0}")]
    Spawn(#[from] io::Error),

    #[error("no frame available yet")]
    NoFrameYet,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub struct VideoDecoder {
    cfg: VideoConfig,
    latest: Arc<Mutex<Option<VideoFrame>>>,
    stop: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
}

impl std::fmt::Debug for VideoDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoDecoder")
            .field("cfg", &self.cfg)
            .field("worker", &"<reader thread>")
            .finish()
    }
}

impl VideoDecoder {
    pub fn from_config(cfg: VideoConfig) -> Result<Self, VideoError> {
        if cfg.file.trim().is_empty() {
            return Err(VideoError::InvalidConfig("file is empty".into()));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(VideoError::InvalidConfig("width/height must be > 0".into()));
        }
        if cfg.fps == 0 {
            return Err(VideoError::InvalidConfig("fps must be > 0".into()));
        }

        let latest = Arc::new(Mutex::new(None));
        let stop = Arc::new(AtomicBool::new(false));

        let cfg_for_thread = cfg.clone();
        let latest_for_thread = Arc::clone(&latest);
        let stop_for_thread = Arc::clone(&stop);

        let worker = thread::spawn(move || {
            decode_loop(cfg_for_thread, latest_for_thread, stop_for_thread);
        });

        Ok(Self {
            cfg,
            latest,
            stop,
            worker: Some(worker),
        })
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| VideoError::InvalidConfig(format!("read json: {e}")))?;
        let cfg: VideoConfig = serde_json::from_str(&text)
            .map_err(|e| VideoError::InvalidConfig(format!("parse json: {e}")))?;
        Self::from_config(cfg)
    }

    pub fn config(&self) -> &VideoConfig {
        &self.cfg
    }

    /// Non-blocking: the latest available frame, or NoFrameYet.
    pub fn poll_rgba(&mut self) -> Result<VideoFrame, VideoError> {
        let guard = self.latest.lock().unwrap();
        guard.as_ref().cloned().ok_or(VideoError::NoFrameYet)
    }
}

impl Drop for VideoDecoder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

// ---------------- internal ----------------

fn decode_loop(cfg: VideoConfig, latest: Arc<Mutex<Option<VideoFrame>>>, stop: Arc<AtomicBool>) {
    let frame_len = (cfg.width as usize) * (cfg.height as usize) * 4;
    let mut buf = vec![0u8; frame_len];
    let mut logged_spawn_error = false;

    while !stop.load(Ordering::SeqCst) {
        let ffmpeg = resolve_ffmpeg_path(cfg.ffmpeg_path.as_deref());

        let mut child = match spawn_ffmpeg(&ffmpeg, &cfg) {
            Ok(c) => {
                logged_spawn_error = false;
                c
            }
            Err(e) => {
                if !logged_spawn_error {
                    eprintln!("toygal-input-video: failed to spawn ffmpeg at {ffmpeg:?}: {e}");
                    logged_spawn_error = true;
                }

                if !cfg.looped {
                    return;
                }

                // Backoff before retrying so a missing binary doesn't busy-loop.
                thread::sleep(Duration::from_millis(500));
                continue;
            }
        };

        let mut stdout = child.stdout.take().expect("ffmpeg stdout piped");

        loop {
            if stop.load(Ordering::SeqCst) {
                let _ = child.kill();
                let _ = child.wait();
                return;
            }

            match stdout.read_exact(&mut buf) {
                Ok(()) => {
                    let frame = VideoFrame {
                        width: cfg.width,
                        height: cfg.height,
                        bytes: buf.clone(),
                    };
                    *latest.lock().unwrap() = Some(frame);
                }
                Err(_eof) => {
                    // Stream ended. Respawn for looped playback, otherwise
                    // leave the last frame in place and exit the worker.
                    let _ = child.kill();
                    let _ = child.wait();

                    if cfg.looped {
                        break;
                    }
                    return;
                }
            }
        }
    }
}

/// Spawn ffmpeg configured to:
/// - read the input at (approx) real-time speed (`-re`), trusting source timestamps
/// - scale to cfg.width x cfg.height
/// - flip vertically so the RGBA rows match GL's bottom-left origin
fn spawn_ffmpeg(ffmpeg: &Path, cfg: &VideoConfig) -> io::Result<Child> {
    let mut cmd = Command::new(ffmpeg);

    cmd.arg("-hide_banner").arg("-loglevel").arg("error");
    cmd.arg("-re");

    if cfg.looped {
        cmd.arg("-stream_loop").arg("-1");
    }

    cmd.arg("-i")
        .arg(&cfg.file)
        .arg("-vf")
        .arg(format!("scale={}:{},vflip", cfg.width, cfg.height))
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-f")
        .arg("rawvideo")
        .arg("pipe:1")
        .stdout(Stdio::piped())
        .stderr(Stdio::null());

    cmd.spawn()
}

/// Resolution order: explicit config path, `TOYGAL_FFMPEG`, then `ffmpeg` on
/// PATH.
fn resolve_ffmpeg_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }
    if let Some(p) = std::env::var_os("TOYGAL_FFMPEG") {
        return PathBuf::from(p);
    }
    PathBuf::from("ffmpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply() {
        let cfg: VideoConfig = serde_json::from_str(r#"{ "file": "clip.mp4" }"#).unwrap();
        assert_eq!((cfg.width, cfg.height, cfg.fps), (640, 360, 30));
        assert!(cfg.looped);
        assert!(cfg.ffmpeg_path.is_none());
    }

    #[test]
    fn invalid_configs_are_rejected_before_spawning() {
        let bad = |json: &str| {
            let cfg: VideoConfig = serde_json::from_str(json).unwrap();
            VideoDecoder::from_config(cfg).err()
        };

        assert!(matches!(
            bad(r#"{ "file": "  " }"#),
            Some(VideoError::InvalidConfig(_))
        ));
        assert!(matches!(
            bad(r#"{ "file": "clip.mp4", "width": 0 }"#),
            Some(VideoError::InvalidConfig(_))
        ));
        assert!(matches!(
            bad(r#"{ "file": "clip.mp4", "fps": 0 }"#),
            Some(VideoError::InvalidConfig(_))
        ));
    }
}
