//! The gallery entry contract.
//!
//! An entry is a strategy object: two required identity methods, the GLSL
//! body, and a set of optional capabilities with default no-op
//! implementations. Entries never touch GL; they only describe themselves.

use crate::channel::ChannelBinding;
use crate::template::{GlslVersion, Precision};

/// One shader program descriptor in the gallery.
///
/// Implementations are constructed once at gallery build time and are
/// immutable thereafter; per-entry mutable state lives in the runtime
/// instance and in the [`EntryControls`] object returned by [`init`].
///
/// [`init`]: ShaderEntry::init
pub trait ShaderEntry {
    /// Unique id across the gallery (e.g. the Shadertoy id the body came from).
    fn key(&self) -> &str;

    /// Display title.
    fn name(&self) -> &str;

    /// GLSL source of the image pass. Must define
    /// `void mainImage(out vec4 fragColor, in vec2 fragCoord)`.
    fn user_fragment(&self) -> &str;

    /// Shared GLSL helper code prepended before every pass of this entry.
    fn common(&self) -> Option<&str> {
        None
    }

    /// Input bindings for channels 0..=3, in slot order. At most 4.
    fn channels(&self) -> Vec<ChannelBinding> {
        Vec::new()
    }

    fn tags(&self) -> &[&str] {
        &[]
    }

    /// Gallery ordering; entries without an explicit position sort last,
    /// then alphabetically by key.
    fn sort_key(&self) -> u32 {
        u32::MAX
    }

    /// Excluded from [`crate::Gallery::ordered`] when true. Presentation
    /// concern only; the entry is still registered and addressable by key.
    fn ignored(&self) -> bool {
        false
    }

    fn glsl_version(&self) -> GlslVersion {
        GlslVersion::Modern
    }

    fn precision(&self) -> Precision {
        Precision::Mediump
    }

    /// Build the per-instance control surface (custom uniforms), if any.
    ///
    /// The returned object owns its resources and teardown is `Drop`, so a
    /// second instance can never leak the first one's panel.
    fn init(&self) -> Option<Box<dyn EntryControls>> {
        None
    }
}

/// Per-instance control surface: yields the custom uniform values to upload
/// before each draw.
pub trait EntryControls {
    /// Snapshot the current control values. Calling this repeatedly without
    /// intervening control input returns the same values; it must never fail.
    fn frame(&mut self) -> Vec<UniformValue>;
}

/// A named custom uniform value produced by [`EntryControls::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct UniformValue {
    pub name: String,
    pub data: UniformData,
}

impl UniformValue {
    pub fn new(name: impl Into<String>, data: UniformData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformData {
    Float(f32),
    Int(i32),
    /// Uploaded as `1` / `0` to an int or float uniform.
    Bool(bool),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl ShaderEntry for Bare {
        fn key(&self) -> &str {
            "bare"
        }
        fn name(&self) -> &str {
            "Bare minimum"
        }
        fn user_fragment(&self) -> &str {
            crate::template::MINIMAL_USER_FRAGMENT
        }
    }

    #[test]
    fn defaults_cover_every_optional_capability() {
        let e = Bare;
        assert!(e.common().is_none());
        assert!(e.channels().is_empty());
        assert!(e.tags().is_empty());
        assert_eq!(e.sort_key(), u32::MAX);
        assert!(!e.ignored());
        assert_eq!(e.glsl_version(), GlslVersion::Modern);
        assert_eq!(e.precision(), Precision::Mediump);
        assert!(e.init().is_none());
    }
}
