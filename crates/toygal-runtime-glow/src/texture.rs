//! Texture creation and upload helpers.

use std::path::Path;

use glow::HasContext;

use toygal_core::{EngineError, TexFilter, TexWrap};

fn gl_filter(f: TexFilter) -> i32 {
    match f {
        TexFilter::Nearest => glow::NEAREST as i32,
        TexFilter::Linear => glow::LINEAR as i32,
    }
}

fn gl_wrap(w: TexWrap) -> i32 {
    match w {
        TexWrap::Clamp => glow::CLAMP_TO_EDGE as i32,
        TexWrap::Repeat => glow::REPEAT as i32,
    }
}

/// Allocate an RGBA8 texture with linear/clamp sampling (render-target and
/// video-upload default).
pub unsafe fn create_color_texture(
    gl: &glow::Context,
    w: i32,
    h: i32,
) -> Result<glow::NativeTexture, EngineError> {
    create_texture(gl, w, h, TexFilter::Linear, TexWrap::Clamp, None)
}

unsafe fn create_texture(
    gl: &glow::Context,
    w: i32,
    h: i32,
    filter: TexFilter,
    wrap: TexWrap,
    pixels: Option<&[u8]>,
) -> Result<glow::NativeTexture, EngineError> {
    let tex = gl
        .create_texture()
        .map_err(|e| EngineError::GlCreate(format!("create_texture failed: {e:?}")))?;

    gl.bind_texture(glow::TEXTURE_2D, Some(tex));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, gl_filter(filter));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, gl_filter(filter));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, gl_wrap(wrap));
    gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, gl_wrap(wrap));
    gl.tex_image_2d(
        glow::TEXTURE_2D,
        0,
        glow::RGBA8 as i32,
        w,
        h,
        0,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        pixels,
    );
    gl.bind_texture(glow::TEXTURE_2D, None);

    Ok(tex)
}

/// Replace the contents of an existing RGBA8 texture.
pub unsafe fn upload_rgba(
    gl: &glow::Context,
    tex: glow::NativeTexture,
    w: i32,
    h: i32,
    bytes: &[u8],
) {
    gl.bind_texture(glow::TEXTURE_2D, Some(tex));
    gl.tex_sub_image_2d(
        glow::TEXTURE_2D,
        0,
        0,
        0,
        w,
        h,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        glow::PixelUnpackData::Slice(bytes),
    );
    gl.bind_texture(glow::TEXTURE_2D, None);
}

/// Load a static image channel from disk.
///
/// The image is decoded to RGBA8 and flipped vertically so `vec2(0)` in UV
/// space lands on the image's bottom-left, matching GL (and Shadertoy)
/// conventions.
pub unsafe fn load_texture_file(
    gl: &glow::Context,
    path: &Path,
    filter: TexFilter,
    wrap: TexWrap,
) -> Result<(glow::NativeTexture, i32, i32), EngineError> {
    let img = image::open(path)
        .map_err(|e| EngineError::TextureLoad {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?
        .flipv()
        .into_rgba8();

    let (w, h) = (img.width() as i32, img.height() as i32);
    let tex = create_texture(gl, w, h, filter, wrap, Some(img.as_raw()))?;
    Ok((tex, w, h))
}

/// 1x1 opaque black texture, bound for channel kinds the runtime has no live
/// source for (audio).
pub unsafe fn create_silent_texture(
    gl: &glow::Context,
) -> Result<glow::NativeTexture, EngineError> {
    create_texture(
        gl,
        1,
        1,
        TexFilter::Nearest,
        TexWrap::Clamp,
        Some(&[0, 0, 0, 255]),
    )
}
