//! The built-in gallery.
//!
//! Registration order is arbitrary; presentation order comes from each
//! entry's `sort_key`. Adding an entry means implementing [`ShaderEntry`]
//! in [`entries`] and listing it in [`builtin_gallery`].

#![forbid(unsafe_code)]

pub mod entries;

use toygal_core::{EngineError, Gallery};

/// Build and validate the full built-in gallery.
pub fn builtin_gallery() -> Result<Gallery, EngineError> {
    let mut g = Gallery::new();
    g.register(Box::new(entries::MetaBlobs))?;
    g.register(Box::new(entries::CircleField))?;
    g.register(Box::new(entries::LegacyPlasma))?;
    g.register(Box::new(entries::FeedbackTrails))?;
    g.register(Box::new(entries::BlurChain))?;
    g.register(Box::new(entries::RingPalette))?;
    g.register(Box::new(entries::TextureWarp))?;
    g.register(Box::new(entries::VideoDesaturate))?;
    let issues = g.validate();
    if !issues.is_empty() {
        return Err(EngineError::Other(format!(
            "builtin gallery failed validation: {}",
            issues.join("; ")
        )));
    }
    Ok(g)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toygal_core::{ChannelBinding, GlslVersion, Precision, ShaderEntry};

    #[test]
    fn builtin_gallery_builds_and_validates() {
        let g = builtin_gallery().expect("builtin gallery must validate");
        assert_eq!(g.len(), 8);
    }

    #[test]
    fn presentation_order_follows_sort_keys() {
        let g = builtin_gallery().unwrap();
        let keys: Vec<&str> = g.ordered().iter().map(|e| e.key()).collect();
        assert_eq!(
            keys,
            vec!["tldSRj", "ldfyzl", "XdlGzH", "MdsGDN", "lsXGzH", "4sfGzS", "Xds3Rj"]
        );
    }

    #[test]
    fn ignored_entry_is_still_addressable_by_key() {
        let g = builtin_gallery().unwrap();
        assert!(g.get("Mdf3zr").is_some());
        assert!(g.ordered().iter().all(|e| e.key() != "Mdf3zr"));
    }

    #[test]
    fn legacy_entry_carries_dialect_and_precision() {
        let e = entries::LegacyPlasma;
        assert_eq!(e.glsl_version(), GlslVersion::Legacy);
        assert_eq!(e.precision(), Precision::Highp);
    }

    #[test]
    fn circle_field_exposes_its_control_panel() {
        let e = entries::CircleField;
        let mut controls = e.init().expect("ldfyzl has a panel");
        let values = controls.frame();
        let names: Vec<&str> = values.iter().map(|v| v.name.as_str()).collect();
        assert!(names.contains(&"u_max_radius"));
        assert!(names.contains(&"u_double_hash"));
    }

    #[test]
    fn blur_chain_declares_buffers_in_slot_order() {
        let e = entries::BlurChain;
        let chs = e.channels();
        assert_eq!(chs.len(), 2);
        assert_eq!(chs[0].type_id(), 1);
        assert_eq!(chs[1].type_id(), 1);
        let ChannelBinding::Buffer { index, .. } = &chs[0] else {
            panic!("slot 0 is a buffer");
        };
        assert_eq!(index.index(), 0);
    }

    #[test]
    fn feedback_entry_samples_its_own_buffer() {
        let e = entries::FeedbackTrails;
        let chs = e.channels();
        let ChannelBinding::Buffer { source, .. } = &chs[0] else {
            panic!("slot 0 is a buffer");
        };
        assert!(source.contains("iChannel0"));
        assert!(source.contains("mainImage"));
    }
}
