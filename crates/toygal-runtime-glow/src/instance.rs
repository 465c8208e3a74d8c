//! Per-entry runtime instance.

use std::path::Path;

use glow::HasContext;

use toygal_core::template::{resolve_fragment, vertex_source};
use toygal_core::{
    validate_entry, BufferIndex, ChannelBinding, EngineError, EntryControls, FrameState,
    ShaderEntry, UniformData, UniformValue, VideoSource,
};
use toygal_input_video::{VideoConfig, VideoDecoder};

use crate::texture::{create_silent_texture, load_texture_file, upload_rgba};
use crate::{compile_program, create_render_target, FullscreenTriangle, PingPongTarget, RenderTarget};

/// Handles to the final image pass output for one frame (host blits or feeds
/// these onward; the instance still owns the GL objects).
#[derive(Debug, Clone, Copy)]
pub struct RenderedFrame {
    pub tex: glow::NativeTexture,
    pub fbo: glow::NativeFramebuffer,
    pub width: i32,
    pub height: i32,
}

/// One compiled buffer pass, in render order.
struct BufferPassState {
    index: BufferIndex,
    program: glow::NativeProgram,
    targets: PingPongTarget,
}

/// What a channel slot resolved to.
enum SlotBinding {
    Texture {
        tex: glow::NativeTexture,
        w: i32,
        h: i32,
    },
    Buffer {
        index: BufferIndex,
    },
    Video(VideoSlot),
    Silent {
        tex: glow::NativeTexture,
    },
}

struct VideoSlot {
    dec: VideoDecoder,
    tex: glow::NativeTexture,
    w: i32,
    h: i32,
    fps: f32,
    /// Last timeline frame index uploaded, derived from FrameState::time.
    last_frame_index: i64,
}

/// The live GPU-side realization of one gallery entry.
///
/// Construction resolves templates and channels into programs, textures and
/// offscreen targets; `render` draws every pass for one frame; `destroy`
/// frees every GL object. Dropping the instance also drops its controls
/// (panel teardown), so switching entries cannot leak either resource kind.
pub struct EntryInstance {
    key: String,
    fs_tri: FullscreenTriangle,
    image_program: glow::NativeProgram,
    image_target: RenderTarget,
    buffer_passes: Vec<BufferPassState>,
    slots: Vec<Option<SlotBinding>>,
    controls: Option<Box<dyn EntryControls>>,
}

impl EntryInstance {
    /// Resolve and compile an entry. `assets_root` anchors relative texture
    /// and audio paths.
    pub unsafe fn new(
        gl: &glow::Context,
        entry: &dyn ShaderEntry,
        width: i32,
        height: i32,
        assets_root: Option<&Path>,
    ) -> Result<Self, EngineError> {
        let issues = validate_entry(entry);
        if !issues.is_empty() {
            return Err(EngineError::Validation {
                key: entry.key().to_string(),
                issues,
            });
        }

        let version = entry.glsl_version();
        let precision = entry.precision();
        let common = entry.common();
        let vert = vertex_source(version);

        let fs_tri = FullscreenTriangle::new(gl)?;

        let image_frag = resolve_fragment(version, precision, common, entry.user_fragment());
        let image_program = compile_program(gl, vert, &image_frag)?;
        let image_target = create_render_target(gl, width, height)?;

        let channels = entry.channels();

        // Buffer passes: unique indices, compiled once, rendered in A→D order.
        let mut buffer_passes: Vec<BufferPassState> = Vec::new();
        for ch in &channels {
            if let ChannelBinding::Buffer { index, source } = ch {
                if buffer_passes.iter().any(|b| b.index == *index) {
                    continue;
                }
                let frag = resolve_fragment(version, precision, common, source);
                let program = compile_program(gl, vert, &frag)?;
                let targets = PingPongTarget::new(gl, width, height)?;
                buffer_passes.push(BufferPassState {
                    index: *index,
                    program,
                    targets,
                });
            }
        }
        buffer_passes.sort_by_key(|b| b.index);

        let mut slots: Vec<Option<SlotBinding>> = Vec::new();
        let mut logged_silent_audio = false;
        for ch in channels.iter().take(4) {
            let binding = match ch {
                ChannelBinding::Texture { path, filter, wrap } => {
                    let resolved = resolve_path(path, assets_root);
                    let (tex, w, h) = load_texture_file(gl, &resolved, *filter, *wrap)?;
                    SlotBinding::Texture { tex, w, h }
                }
                ChannelBinding::Buffer { index, .. } => SlotBinding::Buffer { index: *index },
                ChannelBinding::Video { source } => {
                    SlotBinding::Video(open_video_slot(gl, source)?)
                }
                ChannelBinding::Audio { path } => {
                    if !logged_silent_audio {
                        eprintln!(
                            "toygal-runtime-glow: entry '{}' requests audio channel {}; binding silent texture",
                            entry.key(),
                            path.display()
                        );
                        logged_silent_audio = true;
                    }
                    SlotBinding::Silent {
                        tex: create_silent_texture(gl)?,
                    }
                }
            };
            slots.push(Some(binding));
        }
        while slots.len() < 4 {
            slots.push(None);
        }

        Ok(Self {
            key: entry.key().to_string(),
            fs_tri,
            image_program,
            image_target,
            buffer_passes,
            slots,
            controls: entry.init(),
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Render every pass for one frame: buffer passes in declared order,
    /// then the image pass. Returns the image pass output.
    pub unsafe fn render(
        &mut self,
        gl: &glow::Context,
        frame: &FrameState,
    ) -> Result<RenderedFrame, EngineError> {
        self.ensure_sizes(gl, frame.width, frame.height)?;
        self.poll_video_slots(gl, frame);

        // One controls snapshot per frame, shared by every pass.
        let custom: Vec<UniformValue> = match &mut self.controls {
            Some(c) => c.frame(),
            None => Vec::new(),
        };

        let mut fs = *frame;
        for (slot, binding) in self.slots.iter().enumerate() {
            fs.channel_resolution[slot] = match binding {
                Some(SlotBinding::Texture { w, h, .. }) => [*w as f32, *h as f32, 1.0],
                Some(SlotBinding::Buffer { .. }) => fs.resolution(),
                Some(SlotBinding::Video(v)) => [v.w as f32, v.h as f32, 1.0],
                Some(SlotBinding::Silent { .. }) => [1.0, 1.0, 1.0],
                None => [0.0, 0.0, 0.0],
            };
        }

        gl.disable(glow::DEPTH_TEST);

        for i in 0..self.buffer_passes.len() {
            let program = self.buffer_passes[i].program;
            let tgt = self.buffer_passes[i].targets.next_target();
            let (fbo, w, h) = (tgt.fbo, tgt.w, tgt.h);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
            gl.viewport(0, 0, w, h);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(Some(program));
            set_standard_uniforms(gl, program, &fs);
            self.bind_channel_slots(gl, program);
            for v in &custom {
                apply_uniform_value(gl, program, v);
            }
            self.fs_tri.draw(gl);

            // Swap immediately so later passes sample this frame's output
            // while self/later references keep seeing the previous frame.
            self.buffer_passes[i].targets.swap();
        }

        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(self.image_target.fbo));
        gl.viewport(0, 0, self.image_target.w, self.image_target.h);
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);

        gl.use_program(Some(self.image_program));
        set_standard_uniforms(gl, self.image_program, &fs);
        self.bind_channel_slots(gl, self.image_program);
        for v in &custom {
            apply_uniform_value(gl, self.image_program, v);
        }
        self.fs_tri.draw(gl);

        gl.use_program(None);
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);

        Ok(RenderedFrame {
            tex: self.image_target.tex,
            fbo: self.image_target.fbo,
            width: self.image_target.w,
            height: self.image_target.h,
        })
    }

    /// Explicitly free every GL object this instance owns.
    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_program(self.image_program);
        self.image_target.destroy(gl);
        for bp in &mut self.buffer_passes {
            gl.delete_program(bp.program);
            bp.targets.destroy(gl);
        }
        self.buffer_passes.clear();
        for slot in self.slots.iter_mut() {
            match slot.take() {
                Some(SlotBinding::Texture { tex, .. })
                | Some(SlotBinding::Silent { tex }) => gl.delete_texture(tex),
                Some(SlotBinding::Video(v)) => {
                    gl.delete_texture(v.tex);
                    // `v.dec` drops here, joining the ffmpeg reader thread.
                }
                Some(SlotBinding::Buffer { .. }) | None => {}
            }
        }
        self.fs_tri.destroy(gl);
        // Controls drop with self (panel teardown).
    }

    unsafe fn ensure_sizes(
        &mut self,
        gl: &glow::Context,
        width: i32,
        height: i32,
    ) -> Result<(), EngineError> {
        if self.image_target.w != width || self.image_target.h != height {
            self.image_target.resize(gl, width, height);
        }
        for bp in &mut self.buffer_passes {
            bp.targets.ensure_size(gl, width, height)?;
        }
        Ok(())
    }

    /// Upload new video frames when the timeline has advanced past the last
    /// uploaded frame index. Paused time keeps the texture frozen.
    unsafe fn poll_video_slots(&mut self, gl: &glow::Context, frame: &FrameState) {
        for slot in self.slots.iter_mut().flatten() {
            let SlotBinding::Video(v) = slot else {
                continue;
            };

            let timeline_index = if v.fps > 0.0 {
                (frame.time.max(0.0) * v.fps).floor() as i64
            } else {
                -1
            };
            if timeline_index >= 0 && timeline_index <= v.last_frame_index {
                continue;
            }

            if let Ok(vf) = v.dec.poll_rgba() {
                if vf.width as i32 != v.w || vf.height as i32 != v.h {
                    // Resolution changed (rare). Reallocate the texture.
                    gl.delete_texture(v.tex);
                    v.w = vf.width as i32;
                    v.h = vf.height as i32;
                    v.tex = match crate::texture::create_color_texture(gl, v.w, v.h) {
                        Ok(t) => t,
                        Err(e) => {
                            eprintln!("toygal-runtime-glow: video texture realloc failed: {e}");
                            continue;
                        }
                    };
                }
                upload_rgba(gl, v.tex, v.w, v.h, &vf.bytes);
                v.last_frame_index = timeline_index.max(0);
            }
        }
    }

    /// Bind slot textures to TEXTURE0..3 and point `iChannelN` at them.
    unsafe fn bind_channel_slots(&self, gl: &glow::Context, program: glow::NativeProgram) {
        for (slot, binding) in self.slots.iter().enumerate() {
            let tex = match binding {
                Some(SlotBinding::Texture { tex, .. }) => *tex,
                Some(SlotBinding::Silent { tex }) => *tex,
                Some(SlotBinding::Video(v)) => v.tex,
                Some(SlotBinding::Buffer { index }) => {
                    match self.buffer_passes.iter().find(|b| b.index == *index) {
                        Some(b) => b.targets.prev_tex(),
                        None => continue,
                    }
                }
                None => continue,
            };

            gl.active_texture(glow::TEXTURE0 + slot as u32);
            gl.bind_texture(glow::TEXTURE_2D, Some(tex));
            if let Some(loc) = gl.get_uniform_location(program, &format!("iChannel{slot}")) {
                gl.uniform_1_i32(Some(&loc), slot as i32);
            }
        }
        gl.active_texture(glow::TEXTURE0);
    }
}

fn resolve_path(path: &Path, assets_root: Option<&Path>) -> std::path::PathBuf {
    match assets_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

unsafe fn open_video_slot(gl: &glow::Context, source: &VideoSource) -> Result<VideoSlot, EngineError> {
    let cfg = VideoConfig {
        file: source.file.clone(),
        width: source.width,
        height: source.height,
        fps: source.fps,
        looped: source.looped,
        ffmpeg_path: None,
    };
    let dec = VideoDecoder::from_config(cfg)
        .map_err(|e| EngineError::Other(format!("video channel: {e}")))?;

    let w = source.width as i32;
    let h = source.height as i32;
    let tex = crate::texture::create_color_texture(gl, w, h)?;
    let fps = source.fps.max(1) as f32;

    Ok(VideoSlot {
        dec,
        tex,
        w,
        h,
        fps,
        last_frame_index: -1,
    })
}

/// Upload the Shadertoy-standard uniforms. Every lookup is by name and
/// skipped when the linker pruned the uniform, so entries that ignore parts
/// of the surface (or all four samplers) cost nothing and fail nothing.
unsafe fn set_standard_uniforms(gl: &glow::Context, program: glow::NativeProgram, fs: &FrameState) {
    if let Some(loc) = gl.get_uniform_location(program, "iResolution") {
        let r = fs.resolution();
        gl.uniform_3_f32(Some(&loc), r[0], r[1], r[2]);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iTime") {
        gl.uniform_1_f32(Some(&loc), fs.time);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iTimeDelta") {
        gl.uniform_1_f32(Some(&loc), fs.time_delta);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iFrame") {
        gl.uniform_1_i32(Some(&loc), fs.frame as i32);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iFrameRate") {
        gl.uniform_1_f32(Some(&loc), fs.frame_rate);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iMouse") {
        gl.uniform_4_f32(
            Some(&loc),
            fs.mouse[0],
            fs.mouse[1],
            fs.mouse[2],
            fs.mouse[3],
        );
    }
    if let Some(loc) = gl.get_uniform_location(program, "iDate") {
        gl.uniform_4_f32(Some(&loc), fs.date[0], fs.date[1], fs.date[2], fs.date[3]);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iChannelTime") {
        gl.uniform_1_f32_slice(Some(&loc), &fs.channel_time);
    }
    if let Some(loc) = gl.get_uniform_location(program, "iChannelResolution") {
        let flat: [f32; 12] = bytemuck::cast(fs.channel_resolution);
        gl.uniform_3_f32_slice(Some(&loc), &flat);
    }
}

/// Upload one custom (control panel) uniform, skipping pruned names.
unsafe fn apply_uniform_value(gl: &glow::Context, program: glow::NativeProgram, v: &UniformValue) {
    let Some(loc) = gl.get_uniform_location(program, &v.name) else {
        return;
    };
    match v.data {
        UniformData::Float(x) => gl.uniform_1_f32(Some(&loc), x),
        UniformData::Int(x) => gl.uniform_1_i32(Some(&loc), x),
        UniformData::Bool(b) => gl.uniform_1_i32(Some(&loc), b as i32),
        UniformData::Vec2([x, y]) => gl.uniform_2_f32(Some(&loc), x, y),
        UniformData::Vec3([x, y, z]) => gl.uniform_3_f32(Some(&loc), x, y, z),
        UniformData::Vec4([x, y, z, w]) => gl.uniform_4_f32(Some(&loc), x, y, z, w),
    }
}
