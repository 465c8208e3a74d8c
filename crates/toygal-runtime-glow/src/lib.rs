//! toygal runtime (glow/OpenGL backend)
//
// This crate is the gallery's "driver": it resolves an entry's templates and
// channel descriptors into GL programs, textures, and offscreen buffer
// passes, and renders them in declared order once per frame. It does NOT
// contain windowing, file-watching policy, or control-plane transport; the
// host owns the GL context lifecycle and per-frame timing.
#![allow(clippy::missing_safety_doc)]

use glow::HasContext;

pub use toygal_core::EngineError;

mod instance;
mod texture;

pub use instance::{EntryInstance, RenderedFrame};
pub use texture::{create_color_texture, load_texture_file, upload_rgba};

/// Offscreen render target (FBO + RGBA8 color texture).
#[derive(Debug)]
pub struct RenderTarget {
    pub fbo: glow::NativeFramebuffer,
    pub tex: glow::NativeTexture,
    pub w: i32,
    pub h: i32,
}

impl RenderTarget {
    /// Resize the render target (realloc texture storage). Keeps the same
    /// FBO/texture ids.
    pub unsafe fn resize(&mut self, gl: &glow::Context, w: i32, h: i32) {
        self.w = w.max(1);
        self.h = h.max(1);
        gl.bind_texture(glow::TEXTURE_2D, Some(self.tex));
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            self.w,
            self.h,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            None,
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_framebuffer(self.fbo);
        gl.delete_texture(self.tex);
    }
}

pub unsafe fn create_render_target(
    gl: &glow::Context,
    w: i32,
    h: i32,
) -> Result<RenderTarget, EngineError> {
    let fbo = gl
        .create_framebuffer()
        .map_err(|e| EngineError::GlCreate(format!("create_framebuffer failed: {e:?}")))?;
    let tex = create_color_texture(gl, w.max(1), h.max(1))?;

    gl.bind_framebuffer(glow::FRAMEBUFFER, Some(fbo));
    gl.framebuffer_texture_2d(
        glow::FRAMEBUFFER,
        glow::COLOR_ATTACHMENT0,
        glow::TEXTURE_2D,
        Some(tex),
        0,
    );

    let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
    if status != glow::FRAMEBUFFER_COMPLETE {
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.delete_framebuffer(fbo);
        gl.delete_texture(tex);
        return Err(EngineError::GlCreate(format!(
            "framebuffer incomplete: 0x{status:x}"
        )));
    }

    gl.bind_framebuffer(glow::FRAMEBUFFER, None);

    Ok(RenderTarget {
        fbo,
        tex,
        w: w.max(1),
        h: h.max(1),
    })
}

/// A ping-pong render target pair backing one buffer pass.
///
/// Semantics:
/// - `prev_tex()` is the texture dependent passes sample
/// - `next_target()` is the FBO the pass renders into this frame
/// - `swap()` runs right after the pass's draw, so for later passes in the
///   same frame `prev_tex()` is this frame's fresh output, while a pass
///   sampling its own (or a later) buffer sees the previous frame.
#[derive(Debug)]
pub struct PingPongTarget {
    a: RenderTarget,
    b: RenderTarget,
    a_is_prev: bool,
}

impl PingPongTarget {
    pub unsafe fn new(gl: &glow::Context, width: i32, height: i32) -> Result<Self, EngineError> {
        let a = create_render_target(gl, width, height)?;
        let b = create_render_target(gl, width, height)?;

        // Clear to black so first-frame feedback sampling is defined.
        for rt in [&a, &b] {
            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(rt.fbo));
            gl.viewport(0, 0, rt.w, rt.h);
            gl.clear_color(0.0, 0.0, 0.0, 1.0);
            gl.clear(glow::COLOR_BUFFER_BIT);
        }
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);

        Ok(Self {
            a,
            b,
            a_is_prev: true,
        })
    }

    pub fn size(&self) -> (i32, i32) {
        (self.a.w, self.a.h)
    }

    pub fn prev_tex(&self) -> glow::NativeTexture {
        if self.a_is_prev {
            self.a.tex
        } else {
            self.b.tex
        }
    }

    pub fn next_target(&self) -> &RenderTarget {
        if self.a_is_prev {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn swap(&mut self) {
        self.a_is_prev = !self.a_is_prev;
    }

    /// Recreate both targets at a new size (cleared to black).
    pub unsafe fn ensure_size(
        &mut self,
        gl: &glow::Context,
        width: i32,
        height: i32,
    ) -> Result<(), EngineError> {
        if self.a.w == width && self.a.h == height {
            return Ok(());
        }
        self.a.destroy(gl);
        self.b.destroy(gl);
        *self = Self::new(gl, width, height)?;
        Ok(())
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        self.a.destroy(gl);
        self.b.destroy(gl);
    }
}

pub unsafe fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::NativeProgram, EngineError> {
    let vs = gl
        .create_shader(glow::VERTEX_SHADER)
        .map_err(|e| EngineError::GlCreate(format!("create_shader(VS) failed: {e:?}")))?;
    gl.shader_source(vs, vert_src);
    gl.compile_shader(vs);
    if !gl.get_shader_compile_status(vs) {
        let log = gl.get_shader_info_log(vs);
        gl.delete_shader(vs);
        return Err(EngineError::VertexCompile(log));
    }

    let fs = gl
        .create_shader(glow::FRAGMENT_SHADER)
        .map_err(|e| EngineError::GlCreate(format!("create_shader(FS) failed: {e:?}")))?;
    gl.shader_source(fs, frag_src);
    gl.compile_shader(fs);
    if !gl.get_shader_compile_status(fs) {
        let log = gl.get_shader_info_log(fs);
        gl.delete_shader(vs);
        gl.delete_shader(fs);
        return Err(EngineError::FragmentCompile(log));
    }

    let program = gl
        .create_program()
        .map_err(|e| EngineError::GlCreate(format!("create_program failed: {e:?}")))?;
    gl.attach_shader(program, vs);
    gl.attach_shader(program, fs);
    gl.link_program(program);

    gl.detach_shader(program, vs);
    gl.detach_shader(program, fs);
    gl.delete_shader(vs);
    gl.delete_shader(fs);

    if !gl.get_program_link_status(program) {
        let log = gl.get_program_info_log(program);
        gl.delete_program(program);
        return Err(EngineError::Link(log));
    }

    Ok(program)
}

/// Fullscreen draw helper: one oversized triangle, position at attribute 0,
/// uv at attribute 1.
#[derive(Debug)]
pub struct FullscreenTriangle {
    vao: glow::NativeVertexArray,
    vbo: glow::NativeBuffer,
}

impl FullscreenTriangle {
    pub unsafe fn new(gl: &glow::Context) -> Result<Self, EngineError> {
        let verts: [f32; 12] = [
            -1.0, -1.0, 0.0, 0.0, 3.0, -1.0, 2.0, 0.0, -1.0, 3.0, 0.0, 2.0,
        ];

        let vao = gl
            .create_vertex_array()
            .map_err(|e| EngineError::GlCreate(format!("create_vertex_array: {e}")))?;
        let vbo = gl
            .create_buffer()
            .map_err(|e| EngineError::GlCreate(format!("create_buffer: {e}")))?;

        gl.bind_vertex_array(Some(vao));
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            bytemuck::cast_slice(&verts),
            glow::STATIC_DRAW,
        );

        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, 4 * 4, 0);

        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, 4 * 4, 2 * 4);

        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        gl.bind_vertex_array(None);

        Ok(Self { vao, vbo })
    }

    pub unsafe fn draw(&self, gl: &glow::Context) {
        gl.bind_vertex_array(Some(self.vao));
        gl.draw_arrays(glow::TRIANGLES, 0, 3);
        gl.bind_vertex_array(None);
    }

    pub unsafe fn destroy(&mut self, gl: &glow::Context) {
        gl.delete_vertex_array(self.vao);
        gl.delete_buffer(self.vbo);
    }
}

/// Blit a rendered frame into the default framebuffer (screen preview).
pub unsafe fn blit_to_screen(gl: &glow::Context, out: &RenderedFrame, dst_w: i32, dst_h: i32) {
    gl.bind_framebuffer(glow::READ_FRAMEBUFFER, Some(out.fbo));
    gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);

    gl.blit_framebuffer(
        0,
        0,
        out.width,
        out.height,
        0,
        0,
        dst_w,
        dst_h,
        glow::COLOR_BUFFER_BIT,
        glow::LINEAR,
    );

    gl.bind_framebuffer(glow::READ_FRAMEBUFFER, None);
    gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, None);
}
