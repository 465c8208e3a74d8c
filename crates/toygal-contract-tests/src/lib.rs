#![forbid(unsafe_code)]

mod determinism;

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use toygal_controls::{Panel, PanelConfig, ParamKind};
    use toygal_core::{
        load_viewer_config, validate_entry, ChannelBinding, EngineError, Gallery, ShaderEntry,
    };

    // ---- Golden fixtures (JSON contracts) ----
    const CHANNELS_SHOWCASE_JSON: &str = include_str!("../fixtures/channels_showcase.json");
    const CHANNELS_BAD_KIND_JSON: &str = include_str!("../fixtures/channels_bad_kind.json");
    const VIEWER_BUILTIN_JSON: &str = include_str!("../fixtures/viewer_builtin.json");
    const VIEWER_ZERO_SIZE_JSON: &str = include_str!("../fixtures/viewer_zero_size.json");
    const PANEL_CIRCLES_JSON: &str = include_str!("../fixtures/panel_circles.json");

    fn write_temp_fixture(name: &str, contents: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        p.push(format!("toygal_contract_tests_{name}_{ts}.json"));
        fs::write(&p, contents).expect("write fixture");
        p
    }

    #[test]
    fn golden_channels_showcase_covers_every_kind() {
        let chs: Vec<ChannelBinding> =
            serde_json::from_str(CHANNELS_SHOWCASE_JSON).expect("channels_showcase.json parses");

        let ids: Vec<u8> = chs.iter().map(|c| c.type_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3], "one binding of each kind, in order");

        let ChannelBinding::Video { source } = &chs[2] else {
            panic!("slot 2 is the video binding");
        };
        assert_eq!(source.width, 640);
        assert!(source.looped, "'loop' key maps onto looped");
    }

    #[test]
    fn golden_channels_unknown_kind_is_rejected() {
        let err = serde_json::from_str::<Vec<ChannelBinding>>(CHANNELS_BAD_KIND_JSON)
            .expect_err("channels_bad_kind.json must fail (unknown kind tag)");

        // Keep this stable but not overly strict.
        let msg = err.to_string().to_lowercase();
        assert!(
            msg.contains("unknown") || msg.contains("variant"),
            "expected error to mention the unknown variant, got: {err}"
        );
    }

    #[test]
    fn channel_bindings_round_trip_through_json() {
        let chs: Vec<ChannelBinding> = serde_json::from_str(CHANNELS_SHOWCASE_JSON).unwrap();
        let json = serde_json::to_string(&chs).unwrap();
        let back: Vec<ChannelBinding> = serde_json::from_str(&json).unwrap();
        assert_eq!(chs, back);
    }

    #[test]
    fn golden_viewer_config_parses() {
        let path = write_temp_fixture("viewer_builtin", VIEWER_BUILTIN_JSON);

        let cfg = load_viewer_config(&path).expect("viewer_builtin.json should parse");
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.start_entry.as_deref(), Some("tldSRj"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_viewer_zero_size_is_rejected() {
        let path = write_temp_fixture("viewer_zero_size", VIEWER_ZERO_SIZE_JSON);

        let err = load_viewer_config(&path)
            .expect_err("viewer_zero_size.json must fail (width == 0)");

        assert!(
            matches!(err, EngineError::InvalidConfig { .. }),
            "expected InvalidConfig, got: {err}"
        );

        let _ = fs::remove_file(path);
    }

    #[test]
    fn golden_panel_config_builds_a_working_panel() {
        let cfg: PanelConfig =
            serde_json::from_str(PANEL_CIRCLES_JSON).expect("panel_circles.json parses");

        let panel = Panel::from_config(&cfg);
        match panel.get("u_max_radius") {
            Some(ParamKind::Slider { value, .. }) => assert!((value - 0.4).abs() < 1e-6),
            other => panic!("u_max_radius should be a slider, got {other:?}"),
        }
        assert!(matches!(
            panel.get("u_double_hash"),
            Some(ParamKind::Toggle { value: false })
        ));
    }

    // ---- Registry contracts ----

    struct StubEntry {
        key: &'static str,
        fragment: &'static str,
        channels: Vec<ChannelBinding>,
    }

    impl ShaderEntry for StubEntry {
        fn key(&self) -> &str {
            self.key
        }
        fn name(&self) -> &str {
            self.key
        }
        fn user_fragment(&self) -> &str {
            self.fragment
        }
        fn channels(&self) -> Vec<ChannelBinding> {
            self.channels.clone()
        }
    }

    fn stub(key: &'static str) -> StubEntry {
        StubEntry {
            key,
            fragment: toygal_core::template::MINIMAL_USER_FRAGMENT,
            channels: Vec::new(),
        }
    }

    #[test]
    fn registry_rejects_duplicate_keys() {
        let mut g = Gallery::new();
        g.register(Box::new(stub("abc123"))).unwrap();

        let err = g
            .register(Box::new(stub("abc123")))
            .expect_err("second registration of the same key must fail");
        assert!(
            matches!(err, EngineError::DuplicateKey(ref k) if k == "abc123"),
            "expected DuplicateKey(abc123), got: {err}"
        );
    }

    #[test]
    fn validation_rejects_buffer_source_without_main_image() {
        let entry = StubEntry {
            key: "badbuf",
            fragment: toygal_core::template::MINIMAL_USER_FRAGMENT,
            channels: vec![ChannelBinding::Buffer {
                index: toygal_core::BufferIndex::A,
                source: "void notMain() {}".to_string(),
            }],
        };

        let issues = validate_entry(&entry);
        assert!(
            issues.iter().any(|i| i.contains("mainImage")),
            "expected a mainImage issue, got: {issues:?}"
        );
    }

    #[test]
    fn validation_rejects_more_than_four_channels() {
        let noise = || ChannelBinding::Texture {
            path: PathBuf::from("n.png"),
            filter: Default::default(),
            wrap: Default::default(),
        };
        let entry = StubEntry {
            key: "toomany",
            fragment: toygal_core::template::MINIMAL_USER_FRAGMENT,
            channels: vec![noise(), noise(), noise(), noise(), noise()],
        };

        let issues = validate_entry(&entry);
        assert!(!issues.is_empty(), "five channels must be flagged");
    }

    #[test]
    fn builtin_gallery_passes_registry_validation() {
        let g = toygal_gallery::builtin_gallery().expect("builtin gallery validates");
        for e in g.ordered() {
            assert!(
                validate_entry(e).is_empty(),
                "entry '{}' should have no issues",
                e.key()
            );
        }
    }

    // ---- Controls contracts ----

    #[test]
    fn panel_snapshots_are_stable_without_input() {
        let entry = toygal_gallery::entries::CircleField;
        let mut controls = entry.init().expect("circle field has controls");

        let a = controls.frame();
        let b = controls.frame();
        assert_eq!(a, b, "no input between frames means identical snapshots");
    }
}
