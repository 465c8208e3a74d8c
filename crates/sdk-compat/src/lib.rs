//! Compile-only compatibility crate.
//!
//! This crate exists to ensure the public SDK surface remains usable by third-party
//! consumers. It is not shipped or run; it must only build.

use toygal_controls::Panel;
use toygal_core::template::{resolve_fragment, vertex_source, MINIMAL_USER_FRAGMENT};
use toygal_core::{
    BufferIndex, ChannelBinding, EntryControls, FrameState, Gallery, GlslVersion, Precision,
    ShaderEntry, ViewerConfig,
};

struct WitnessEntry;

impl ShaderEntry for WitnessEntry {
    fn key(&self) -> &str {
        "witness"
    }
    fn name(&self) -> &str {
        "Witness"
    }
    fn user_fragment(&self) -> &str {
        MINIMAL_USER_FRAGMENT
    }
    fn channels(&self) -> Vec<ChannelBinding> {
        vec![ChannelBinding::Buffer {
            index: BufferIndex::A,
            source: MINIMAL_USER_FRAGMENT.to_string(),
        }]
    }
    fn init(&self) -> Option<Box<dyn EntryControls>> {
        Some(Box::new(Panel::new("w").slider("u_x", 0.5, 0.0, 1.0, 0.01)))
    }
}

#[allow(dead_code)]
pub fn _compile_witness() {
    // Template surface: both dialects resolve from public APIs alone.
    let _vert = vertex_source(GlslVersion::Legacy);
    let _frag = resolve_fragment(
        GlslVersion::Modern,
        Precision::Mediump,
        Some("float k() { return 1.0; }"),
        MINIMAL_USER_FRAGMENT,
    );

    // Registry must remain constructible with third-party entry types.
    let mut g = Gallery::new();
    let _ = g.register(Box::new(WitnessEntry));
    let _ = g.get("witness");
    let _ = g.ordered();

    // Per-frame state and controls snapshots use only public constructors.
    // Avoid `Default` here: the SDK surface may prefer explicit constructors.
    let mut fs = FrameState::new(960, 540);
    fs.advance(1.0 / 60.0);

    let mut controls: Box<dyn EntryControls> =
        Box::new(Panel::new("w").toggle("u_flag", true));
    let _values = controls.frame();

    // Builtin gallery and viewer config stay reachable for embedders.
    let _builtin = toygal_gallery::builtin_gallery();
    let _cfg = ViewerConfig::default();
}
