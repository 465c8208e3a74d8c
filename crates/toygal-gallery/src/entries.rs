//! The built-in entries.
//!
//! Each entry is a zero-sized strategy type; the GLSL lives in consts next
//! to it. Bodies follow the `mainImage(out vec4, in vec2)` convention and
//! are written against the scaffold's uniform surface only.

use std::path::PathBuf;

use toygal_controls::Panel;
use toygal_core::{
    BufferIndex, ChannelBinding, EntryControls, GlslVersion, Precision, ShaderEntry, TexFilter,
    TexWrap, VideoSource,
};

// ---------------------------------------------------------------------------
// tldSRj: plain raymarch, no channels, no controls.

const TLDSRJ_FRAG: &str = r#"
float sdSphere(vec3 p, float r) { return length(p) - r; }

float map(vec3 p) {
    vec3 q = p;
    q.x += sin(iTime * 0.7) * 0.8;
    q.y += cos(iTime * 0.9) * 0.5;
    float a = sdSphere(q, 0.6);
    float b = sdSphere(p - vec3(0.0, -0.2, 0.0), 0.45);
    float k = 0.4;
    float h = clamp(0.5 + 0.5 * (b - a) / k, 0.0, 1.0);
    return mix(b, a, h) - k * h * (1.0 - h);
}

void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = (2.0 * fragCoord - iResolution.xy) / iResolution.y;
    vec3 ro = vec3(0.0, 0.0, -2.5);
    vec3 rd = normalize(vec3(uv, 1.6));

    float t = 0.0;
    float d = 0.0;
    for (int i = 0; i < 64; i++) {
        d = map(ro + rd * t);
        if (d < 0.001 || t > 8.0) break;
        t += d;
    }

    vec3 col = vec3(0.02, 0.02, 0.05);
    if (d < 0.001) {
        vec3 p = ro + rd * t;
        vec2 e = vec2(0.002, 0.0);
        vec3 n = normalize(vec3(
            map(p + e.xyy) - map(p - e.xyy),
            map(p + e.yxy) - map(p - e.yxy),
            map(p + e.yyx) - map(p - e.yyx)));
        float dif = max(dot(n, normalize(vec3(0.6, 0.8, -0.4))), 0.0);
        col = vec3(0.2, 0.5, 0.9) * dif + vec3(0.05);
    }
    fragColor = vec4(col, 1.0);
}
"#;

pub struct MetaBlobs;

impl ShaderEntry for MetaBlobs {
    fn key(&self) -> &str {
        "tldSRj"
    }
    fn name(&self) -> &str {
        "Meta blobs"
    }
    fn user_fragment(&self) -> &str {
        TLDSRJ_FRAG
    }
    fn tags(&self) -> &[&str] {
        &["raymarch", "3d"]
    }
    fn sort_key(&self) -> u32 {
        0
    }
}

// ---------------------------------------------------------------------------
// ldfyzl: hashed circle field with a control panel (radius slider, hash
// doubling toggle).

const LDFYZL_FRAG: &str = r#"
uniform float u_max_radius;
uniform bool u_double_hash;

vec2 hash2(vec2 p) {
    p = vec2(dot(p, vec2(127.1, 311.7)), dot(p, vec2(269.5, 183.3)));
    vec2 h = fract(sin(p) * 43758.5453);
    if (u_double_hash) {
        h = fract(sin(h * 6.2831 + p) * 43758.5453);
    }
    return h;
}

void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.y * 8.0;
    vec2 cell = floor(uv);
    vec3 col = vec3(0.0);

    for (int y = -1; y <= 1; y++)
    for (int x = -1; x <= 1; x++) {
        vec2 n = cell + vec2(float(x), float(y));
        vec2 h = hash2(n);
        vec2 c = n + 0.5 + 0.35 * sin(iTime + 6.2831 * h);
        float r = u_max_radius * (0.3 + 0.7 * h.x);
        float d = length(uv - c);
        float glow = smoothstep(r, r * 0.5, d);
        col += glow * (0.5 + 0.5 * cos(6.2831 * h.y + vec3(0.0, 2.1, 4.2)));
    }

    fragColor = vec4(col, 1.0);
}
"#;

pub struct CircleField;

impl ShaderEntry for CircleField {
    fn key(&self) -> &str {
        "ldfyzl"
    }
    fn name(&self) -> &str {
        "Circle field"
    }
    fn user_fragment(&self) -> &str {
        LDFYZL_FRAG
    }
    fn tags(&self) -> &[&str] {
        &["2d", "hash", "controls"]
    }
    fn sort_key(&self) -> u32 {
        1
    }
    fn init(&self) -> Option<Box<dyn EntryControls>> {
        Some(Box::new(
            Panel::new("Circle field")
                .slider("u_max_radius", 0.4, 0.05, 1.0, 0.01)
                .toggle("u_double_hash", false),
        ))
    }
}

// ---------------------------------------------------------------------------
// XdlGzH: legacy-dialect plasma, high precision.

const XDLGZH_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    float v = 0.0;
    v += sin((uv.x * 10.0) + iTime);
    v += sin((uv.y * 8.0) + iTime * 1.3);
    v += sin((uv.x + uv.y) * 9.0 + iTime * 0.7);
    v += sin(length(uv - 0.5) * 14.0 - iTime * 1.7);
    v *= 0.25;
    vec3 col = 0.5 + 0.5 * cos(6.2831 * (v + vec3(0.0, 0.33, 0.67)));
    fragColor = vec4(col, 1.0);
}
"#;

pub struct LegacyPlasma;

impl ShaderEntry for LegacyPlasma {
    fn key(&self) -> &str {
        "XdlGzH"
    }
    fn name(&self) -> &str {
        "Plasma (legacy dialect)"
    }
    fn user_fragment(&self) -> &str {
        XDLGZH_FRAG
    }
    fn tags(&self) -> &[&str] {
        &["2d", "plasma", "legacy"]
    }
    fn sort_key(&self) -> u32 {
        2
    }
    fn glsl_version(&self) -> GlslVersion {
        GlslVersion::Legacy
    }
    fn precision(&self) -> Precision {
        Precision::Highp
    }
}

// ---------------------------------------------------------------------------
// MdsGDN: single self-feedback buffer. Buffer A samples its own previous
// frame through channel 0 and decays it; the image pass just presents A.

const MDSGDN_BUFFER_A: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec3 prev = texture(iChannel0, uv).rgb;

    vec2 seed = 0.5 + 0.35 * vec2(sin(iTime * 1.1), cos(iTime * 0.8));
    float d = length(uv - seed);
    vec3 ink = smoothstep(0.04, 0.0, d) * vec3(1.0, 0.6, 0.2);

    fragColor = vec4(prev * 0.97 + ink, 1.0);
}
"#;

const MDSGDN_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    fragColor = vec4(texture(iChannel0, uv).rgb, 1.0);
}
"#;

pub struct FeedbackTrails;

impl ShaderEntry for FeedbackTrails {
    fn key(&self) -> &str {
        "MdsGDN"
    }
    fn name(&self) -> &str {
        "Feedback trails"
    }
    fn user_fragment(&self) -> &str {
        MDSGDN_FRAG
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![ChannelBinding::Buffer {
            index: BufferIndex::A,
            source: MDSGDN_BUFFER_A.to_string(),
        }]
    }
    fn tags(&self) -> &[&str] {
        &["feedback", "multipass"]
    }
    fn sort_key(&self) -> u32 {
        3
    }
}

// ---------------------------------------------------------------------------
// lsXGzH: two-stage chain. A draws a pattern, B box-blurs A, the image pass
// grades B. Channel table: 0 = Buffer A, 1 = Buffer B.

const LSXGZH_BUFFER_A: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec2 g = fract(uv * 12.0 + vec2(iTime * 0.3, 0.0)) - 0.5;
    float lines = smoothstep(0.06, 0.02, abs(g.x)) + smoothstep(0.06, 0.02, abs(g.y));
    fragColor = vec4(vec3(lines), 1.0);
}
"#;

const LSXGZH_BUFFER_B: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 px = 1.0 / iResolution.xy;
    vec3 acc = vec3(0.0);
    for (int y = -2; y <= 2; y++)
    for (int x = -2; x <= 2; x++) {
        acc += texture(iChannel0, (fragCoord + vec2(float(x), float(y))) * px).rgb;
    }
    fragColor = vec4(acc / 25.0, 1.0);
}
"#;

const LSXGZH_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec3 soft = texture(iChannel1, uv).rgb;
    vec3 col = soft * (0.6 + 0.4 * cos(iTime + uv.xyx * 3.0 + vec3(0.0, 2.0, 4.0)));
    fragColor = vec4(col, 1.0);
}
"#;

pub struct BlurChain;

impl ShaderEntry for BlurChain {
    fn key(&self) -> &str {
        "lsXGzH"
    }
    fn name(&self) -> &str {
        "Blur chain"
    }
    fn user_fragment(&self) -> &str {
        LSXGZH_FRAG
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![
            ChannelBinding::Buffer {
                index: BufferIndex::A,
                source: LSXGZH_BUFFER_A.to_string(),
            },
            ChannelBinding::Buffer {
                index: BufferIndex::B,
                source: LSXGZH_BUFFER_B.to_string(),
            },
        ]
    }
    fn tags(&self) -> &[&str] {
        &["multipass", "blur"]
    }
    fn sort_key(&self) -> u32 {
        4
    }
}

// ---------------------------------------------------------------------------
// 4sfGzS: shared helper block, spliced ahead of both the buffer pass and the
// image pass.

const SFGZS_COMMON: &str = r#"
mat2 rot(float a) { return mat2(cos(a), -sin(a), sin(a), cos(a)); }

vec3 palette(float t) {
    return 0.5 + 0.5 * cos(6.2831 * (t + vec3(0.0, 0.1, 0.2)));
}
"#;

const SFGZS_BUFFER_A: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = (2.0 * fragCoord - iResolution.xy) / iResolution.y;
    vec3 col = vec3(0.0);
    for (int i = 0; i < 4; i++) {
        uv = rot(iTime * 0.1 + float(i)) * uv;
        float d = abs(length(uv) - 0.5 - 0.1 * float(i));
        col += palette(float(i) * 0.25 + iTime * 0.05) * smoothstep(0.02, 0.0, d);
    }
    fragColor = vec4(col, 1.0);
}
"#;

const SFGZS_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec3 rings = texture(iChannel0, uv).rgb;
    vec3 wash = palette(uv.y * 0.3 + iTime * 0.02) * 0.15;
    fragColor = vec4(rings + wash, 1.0);
}
"#;

pub struct RingPalette;

impl ShaderEntry for RingPalette {
    fn key(&self) -> &str {
        "4sfGzS"
    }
    fn name(&self) -> &str {
        "Ring palette"
    }
    fn user_fragment(&self) -> &str {
        SFGZS_FRAG
    }
    fn common(&self) -> Option<&str> {
        Some(SFGZS_COMMON)
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![ChannelBinding::Buffer {
            index: BufferIndex::A,
            source: SFGZS_BUFFER_A.to_string(),
        }]
    }
    fn tags(&self) -> &[&str] {
        &["2d", "common", "multipass"]
    }
    fn sort_key(&self) -> u32 {
        5
    }
}

// ---------------------------------------------------------------------------
// Xds3Rj: static texture channel, warped over time.

const XDS3RJ_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec2 warp = 0.02 * vec2(sin(uv.y * 20.0 + iTime), cos(uv.x * 20.0 + iTime));
    vec3 tex = texture(iChannel0, uv + warp).rgb;
    fragColor = vec4(tex, 1.0);
}
"#;

pub struct TextureWarp;

impl ShaderEntry for TextureWarp {
    fn key(&self) -> &str {
        "Xds3Rj"
    }
    fn name(&self) -> &str {
        "Texture warp"
    }
    fn user_fragment(&self) -> &str {
        XDS3RJ_FRAG
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![ChannelBinding::Texture {
            path: PathBuf::from("textures/noise.png"),
            filter: TexFilter::Linear,
            wrap: TexWrap::Repeat,
        }]
    }
    fn tags(&self) -> &[&str] {
        &["texture"]
    }
    fn sort_key(&self) -> u32 {
        6
    }
}

// ---------------------------------------------------------------------------
// Mdf3zr: video-backed channel. Hidden from the default rotation because it
// needs ffmpeg and a media file on disk.

const MDF3ZR_FRAG: &str = r#"
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    vec3 v = texture(iChannel0, uv).rgb;
    float luma = dot(v, vec3(0.2126, 0.7152, 0.0722));
    fragColor = vec4(mix(v, vec3(luma), 0.5 + 0.5 * sin(iTime * 0.5)), 1.0);
}
"#;

pub struct VideoDesaturate;

impl ShaderEntry for VideoDesaturate {
    fn key(&self) -> &str {
        "Mdf3zr"
    }
    fn name(&self) -> &str {
        "Video desaturate"
    }
    fn user_fragment(&self) -> &str {
        MDF3ZR_FRAG
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![ChannelBinding::Video {
            source: VideoSource {
                file: "media/loop.mp4".to_string(),
                width: 640,
                height: 360,
                fps: 30,
                looped: true,
            },
        }]
    }
    fn tags(&self) -> &[&str] {
        &["video"]
    }
    fn ignored(&self) -> bool {
        true
    }
    fn sort_key(&self) -> u32 {
        7
    }
}
