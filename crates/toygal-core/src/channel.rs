//! Channel descriptors.
//!
//! A channel binds one of the four `iChannelN` samplers to a texture source.
//! The descriptor is plain data; resolution into GL textures and offscreen
//! passes happens in the runtime backend.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Offscreen buffer slot. Buffer passes render once per frame in `A → B → C
/// → D` order, before the image pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BufferIndex {
    A,
    B,
    C,
    D,
}

impl BufferIndex {
    pub const ALL: [BufferIndex; 4] = [
        BufferIndex::A,
        BufferIndex::B,
        BufferIndex::C,
        BufferIndex::D,
    ];

    pub fn index(self) -> usize {
        match self {
            BufferIndex::A => 0,
            BufferIndex::B => 1,
            BufferIndex::C => 2,
            BufferIndex::D => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            BufferIndex::A => "Buffer A",
            BufferIndex::B => "Buffer B",
            BufferIndex::C => "Buffer C",
            BufferIndex::D => "Buffer D",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexFilter {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TexWrap {
    #[default]
    Clamp,
    Repeat,
}

/// Video channel source. Mirrors `toygal-input-video`'s decoder config; kept
/// here as plain data so the contract crate stays decoder-free.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub file: String,
    #[serde(default = "VideoSource::default_width")]
    pub width: u32,
    #[serde(default = "VideoSource::default_height")]
    pub height: u32,
    #[serde(default = "VideoSource::default_fps")]
    pub fps: u32,
    #[serde(default = "VideoSource::default_looped", rename = "loop")]
    pub looped: bool,
}

impl VideoSource {
    fn default_width() -> u32 {
        640
    }
    fn default_height() -> u32 {
        360
    }
    fn default_fps() -> u32 {
        30
    }
    fn default_looped() -> bool {
        true
    }
}

/// Tagged union over the four channel source kinds.
///
/// The JSON tag is the kind name; [`ChannelBinding::type_id`] exposes the
/// numeric discriminants (0 = texture, 1 = buffer pass, 2 = video, 3 =
/// audio) for anything that speaks the numeric wire convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChannelBinding {
    /// Static image loaded from disk.
    Texture {
        path: PathBuf,
        #[serde(default)]
        filter: TexFilter,
        #[serde(default)]
        wrap: TexWrap,
    },

    /// Offscreen render-to-texture pass whose output feeds this channel.
    ///
    /// `source` is the pass's own GLSL body and must define `mainImage`.
    /// All passes of an entry share the entry's channel table; a pass that
    /// references its own buffer index samples its previous-frame output
    /// (single-frame-lagged feedback).
    Buffer { index: BufferIndex, source: String },

    /// Video file decoded in the background and streamed into a texture.
    Video { source: VideoSource },

    /// Audio-reactive source. Accepted by the data model; the glow runtime
    /// currently binds a silent placeholder texture for it.
    Audio { path: PathBuf },
}

impl ChannelBinding {
    /// Numeric channel-descriptor discriminant.
    pub fn type_id(&self) -> u8 {
        match self {
            ChannelBinding::Texture { .. } => 0,
            ChannelBinding::Buffer { .. } => 1,
            ChannelBinding::Video { .. } => 2,
            ChannelBinding::Audio { .. } => 3,
        }
    }

    pub fn is_buffer(&self) -> bool {
        matches!(self, ChannelBinding::Buffer { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_ids_match_the_wire_convention() {
        let tex = ChannelBinding::Texture {
            path: PathBuf::from("noise.png"),
            filter: TexFilter::default(),
            wrap: TexWrap::default(),
        };
        let buf = ChannelBinding::Buffer {
            index: BufferIndex::A,
            source: String::new(),
        };
        let vid = ChannelBinding::Video {
            source: VideoSource {
                file: "clip.mp4".into(),
                width: 640,
                height: 360,
                fps: 30,
                looped: true,
            },
        };
        let aud = ChannelBinding::Audio {
            path: PathBuf::from("track.mp3"),
        };

        assert_eq!(tex.type_id(), 0);
        assert_eq!(buf.type_id(), 1);
        assert_eq!(vid.type_id(), 2);
        assert_eq!(aud.type_id(), 3);
    }

    #[test]
    fn buffer_index_order_is_render_order() {
        let mut shuffled = vec![BufferIndex::C, BufferIndex::A, BufferIndex::D, BufferIndex::B];
        shuffled.sort();
        assert_eq!(shuffled, BufferIndex::ALL.to_vec());
        for (i, b) in BufferIndex::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
            assert_eq!(BufferIndex::from_index(i), Some(*b));
        }
    }

    #[test]
    fn channel_json_round_trips_with_kind_tag() {
        let tex = ChannelBinding::Texture {
            path: PathBuf::from("gray_noise.png"),
            filter: TexFilter::Nearest,
            wrap: TexWrap::Repeat,
        };
        let json = serde_json::to_string(&tex).unwrap();
        assert!(json.contains(r#""type":"texture""#), "{json}");

        let back: ChannelBinding = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tex);
    }

    #[test]
    fn video_source_defaults_apply() {
        let v: VideoSource = serde_json::from_str(r#"{ "file": "clip.mp4" }"#).unwrap();
        assert_eq!(v.width, 640);
        assert_eq!(v.height, 360);
        assert_eq!(v.fps, 30);
        assert!(v.looped);
    }
}
