//! GLSL template substitution.
//!
//! The templates below are the whole "mechanism" of the gallery: a fixed
//! vertex/fragment scaffold declaring the Shadertoy-compatible uniform surface,
//! with three placeholder tokens spliced out by plain `str::replace`. No
//! parsing, no escaping, no validation; malformed GLSL surfaces later as a
//! compile error from the backend, which is where that responsibility lives.

/// Which GLSL dialect an entry targets.
///
/// `Legacy` is the WebGL1-style surface (`gl_FragColor`, `texture2D`),
/// shimmed onto a `#version 330 core` scaffold with preprocessor defines so
/// it compiles on the same core-profile context as `Modern` (core contexts
/// reject `#version`-less 1.10 sources, and 1.10 has no precision
/// statements). `Modern` is `#version 330 core` with a declared `out vec4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlslVersion {
    Legacy,
    #[default]
    Modern,
}

/// Float precision qualifier spliced into `{PRECISION}`.
///
/// Desktop GLSL 1.30+ accepts and ignores precision statements, so the same
/// token works in both dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    Lowp,
    #[default]
    Mediump,
    Highp,
}

impl Precision {
    pub fn qualifier(self) -> &'static str {
        match self {
            Precision::Lowp => "lowp",
            Precision::Mediump => "mediump",
            Precision::Highp => "highp",
        }
    }
}

pub const TOKEN_PRECISION: &str = "{PRECISION}";
pub const TOKEN_COMMON: &str = "{COMMON}";
pub const TOKEN_USER_FRAGMENT: &str = "{USER_FRAGMENT}";

/// Pass-through vertex shader, legacy dialect. Same core-profile version as
/// the modern one; only the fragment surfaces differ.
pub const VERTEX_LEGACY: &str = r#"#version 330 core
layout (location = 0) in vec2 a_pos;
void main() {
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Pass-through vertex shader, modern dialect. Attribute layout matches the
/// fullscreen-triangle vertex buffer (position at location 0, uv at 1).
pub const VERTEX_MODERN: &str = r#"#version 330 core
layout (location = 0) in vec2 a_pos;
layout (location = 1) in vec2 a_uv;
void main() {
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

// The uniform block in both scaffolds is the one load-bearing protocol in the
// gallery: it must match the Shadertoy surface bit-exactly so shader bodies
// can be carried over unmodified.
pub const FRAGMENT_LEGACY: &str = r#"#version 330 core
precision {PRECISION} float;
precision {PRECISION} int;
#define texture2D texture
#define textureCube texture
out vec4 toygalFragColor;
#define gl_FragColor toygalFragColor
uniform vec3  iResolution;
uniform float iTime;
uniform vec4  iDate;
uniform vec4  iMouse;
uniform float iFrameRate;
uniform int   iFrame;
uniform float iChannelTime[4];
uniform float iTimeDelta;
uniform sampler2D iChannel0;
uniform sampler2D iChannel1;
uniform sampler2D iChannel2;
uniform sampler2D iChannel3;
uniform vec3  iChannelResolution[4];
{COMMON}
{USER_FRAGMENT}
void main() {
    vec4 color = vec4(0.0, 0.0, 0.0, 1.0);
    mainImage(color, gl_FragCoord.xy);
    gl_FragColor = color;
}
"#;

pub const FRAGMENT_MODERN: &str = r#"#version 330 core
precision {PRECISION} float;
precision {PRECISION} int;
out vec4 outColor;
uniform vec3  iResolution;
uniform float iTime;
uniform vec4  iDate;
uniform vec4  iMouse;
uniform float iFrameRate;
uniform int   iFrame;
uniform float iChannelTime[4];
uniform float iTimeDelta;
uniform sampler2D iChannel0;
uniform sampler2D iChannel1;
uniform sampler2D iChannel2;
uniform sampler2D iChannel3;
uniform vec3  iChannelResolution[4];
{COMMON}
{USER_FRAGMENT}
void main() {
    vec4 color = vec4(0.0, 0.0, 0.0, 1.0);
    mainImage(color, gl_FragCoord.xy);
    outColor = color;
}
"#;

/// The vertex shader matching a fragment dialect. No tokens to substitute.
pub fn vertex_source(version: GlslVersion) -> &'static str {
    match version {
        GlslVersion::Legacy => VERTEX_LEGACY,
        GlslVersion::Modern => VERTEX_MODERN,
    }
}

/// Splice `{PRECISION}`, `{COMMON}` and `{USER_FRAGMENT}` into the fragment
/// scaffold for the requested dialect.
///
/// `user_fragment` must define `void mainImage(out vec4, in vec2)`; this
/// function does not check that (see [`crate::gallery::validate_entry`] for
/// the substring-level check the registry runs).
pub fn resolve_fragment(
    version: GlslVersion,
    precision: Precision,
    common: Option<&str>,
    user_fragment: &str,
) -> String {
    let scaffold = match version {
        GlslVersion::Legacy => FRAGMENT_LEGACY,
        GlslVersion::Modern => FRAGMENT_MODERN,
    };

    scaffold
        .replace(TOKEN_PRECISION, precision.qualifier())
        .replace(TOKEN_COMMON, common.unwrap_or(""))
        .replace(TOKEN_USER_FRAGMENT, user_fragment)
}

/// The smallest fragment body that satisfies the `mainImage` convention.
/// Used by tests and compile witnesses.
pub const MINIMAL_USER_FRAGMENT: &str =
    "void mainImage(out vec4 fragColor, in vec2 fragCoord) { fragColor = vec4(1.0); }\n";
