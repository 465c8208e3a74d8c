//! Gallery registry.

use std::collections::HashMap;

use crate::entry::ShaderEntry;
use crate::error::EngineError;
use crate::ChannelBinding;

/// All registered entries, keyed by [`ShaderEntry::key`].
///
/// Keys are unique: a collision would make two entries indistinguishable to
/// anything addressing the gallery by key, so `register` rejects it up front.
#[derive(Default)]
pub struct Gallery {
    entries: Vec<Box<dyn ShaderEntry>>,
    by_key: HashMap<String, usize>,
}

impl std::fmt::Debug for Gallery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gallery")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: Box<dyn ShaderEntry>) -> Result<(), EngineError> {
        let key = entry.key().to_string();
        if key.is_empty() {
            return Err(EngineError::other("register: entry key is empty"));
        }
        if self.by_key.contains_key(&key) {
            return Err(EngineError::DuplicateKey(key));
        }
        self.by_key.insert(key, self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&dyn ShaderEntry> {
        self.by_key.get(key).map(|&i| self.entries[i].as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key())
    }

    /// Non-ignored entries in presentation order: `(sort_key, key)` ascending.
    pub fn ordered(&self) -> Vec<&dyn ShaderEntry> {
        let mut out: Vec<&dyn ShaderEntry> = self
            .entries
            .iter()
            .map(|e| e.as_ref())
            .filter(|e| !e.ignored())
            .collect();
        out.sort_by(|a, b| (a.sort_key(), a.key()).cmp(&(b.sort_key(), b.key())));
        out
    }

    /// Run [`validate_entry`] over every entry, prefixing issues with the key.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        for e in &self.entries {
            for issue in validate_entry(e.as_ref()) {
                issues.push(format!("{}: {}", e.key(), issue));
            }
        }
        issues
    }
}

/// Structural checks over one entry.
///
/// Deliberately shallow: GLSL stays an opaque blob here, so "defines
/// mainImage" is a substring check, not a parse. Real compile errors belong
/// to the GPU driver.
pub fn validate_entry(entry: &dyn ShaderEntry) -> Vec<String> {
    let mut issues = Vec::new();

    if entry.key().is_empty() {
        issues.push("key is empty".to_string());
    }
    if !entry.user_fragment().contains("mainImage") {
        issues.push("user fragment does not define mainImage".to_string());
    }

    let channels = entry.channels();
    if channels.len() > 4 {
        issues.push(format!(
            "declares {} channels; at most 4 are addressable",
            channels.len()
        ));
    }

    let mut seen_sources: HashMap<usize, &str> = HashMap::new();
    for (slot, ch) in channels.iter().enumerate() {
        if let ChannelBinding::Buffer { index, source } = ch {
            if !source.contains("mainImage") {
                issues.push(format!(
                    "channel {slot}: {} source does not define mainImage",
                    index.label()
                ));
            }
            match seen_sources.get(&index.index()) {
                Some(prev) if *prev != source.as_str() => {
                    issues.push(format!(
                        "channel {slot}: {} declared twice with different sources",
                        index.label()
                    ));
                }
                _ => {
                    seen_sources.insert(index.index(), source.as_str());
                }
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::BufferIndex;
    use crate::template::MINIMAL_USER_FRAGMENT;

    struct Fake {
        key: &'static str,
        sort: u32,
        ignored: bool,
        channels: Vec<ChannelBinding>,
    }

    impl Fake {
        fn new(key: &'static str) -> Self {
            Self {
                key,
                sort: u32::MAX,
                ignored: false,
                channels: Vec::new(),
            }
        }
    }

    impl ShaderEntry for Fake {
        fn key(&self) -> &str {
            self.key
        }
        fn name(&self) -> &str {
            self.key
        }
        fn user_fragment(&self) -> &str {
            MINIMAL_USER_FRAGMENT
        }
        fn channels(&self) -> Vec<ChannelBinding> {
            self.channels.clone()
        }
        fn sort_key(&self) -> u32 {
            self.sort
        }
        fn ignored(&self) -> bool {
            self.ignored
        }
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let mut g = Gallery::new();
        g.register(Box::new(Fake::new("abc"))).unwrap();
        let err = g.register(Box::new(Fake::new("abc"))).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKey(k) if k == "abc"));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn ordered_sorts_by_sort_key_then_key_and_skips_ignored() {
        let mut g = Gallery::new();
        let mut a = Fake::new("zzz");
        a.sort = 1;
        let b = Fake::new("bbb");
        let c = Fake::new("aaa");
        let mut hidden = Fake::new("hid");
        hidden.ignored = true;

        for e in [a, b, c, hidden] {
            g.register(Box::new(e)).unwrap();
        }

        let keys: Vec<&str> = g.ordered().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["zzz", "aaa", "bbb"]);
    }

    #[test]
    fn buffer_pass_without_main_image_is_flagged() {
        let mut e = Fake::new("buf");
        e.channels = vec![ChannelBinding::Buffer {
            index: BufferIndex::A,
            source: "void notMain() {}".to_string(),
        }];
        let issues = validate_entry(&e);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("Buffer A"), "{issues:?}");
    }

    #[test]
    fn conflicting_buffer_declarations_are_flagged() {
        let mut e = Fake::new("conflict");
        e.channels = vec![
            ChannelBinding::Buffer {
                index: BufferIndex::A,
                source: MINIMAL_USER_FRAGMENT.to_string(),
            },
            ChannelBinding::Buffer {
                index: BufferIndex::A,
                source: format!("// variant\n{MINIMAL_USER_FRAGMENT}"),
            },
        ];
        let issues = validate_entry(&e);
        assert!(issues.iter().any(|i| i.contains("declared twice")), "{issues:?}");
    }

    #[test]
    fn same_buffer_referenced_twice_with_same_source_is_fine() {
        let mut e = Fake::new("dup-ref");
        let src = MINIMAL_USER_FRAGMENT.to_string();
        e.channels = vec![
            ChannelBinding::Buffer {
                index: BufferIndex::A,
                source: src.clone(),
            },
            ChannelBinding::Buffer {
                index: BufferIndex::A,
                source: src,
            },
        ];
        assert!(validate_entry(&e).is_empty());
    }
}
