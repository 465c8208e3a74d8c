#![forbid(unsafe_code)]

//! toygal contract crate.
//!
//! Everything in here is **contract-only**: no GL handles, no windowing, no OS
//! policy. It defines the Shadertoy-compatible template mechanism, the gallery
//! entry trait, channel descriptors, per-frame uniform state, and the gallery
//! registry. Backends (`toygal-runtime-glow`) realize these contracts.
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod channel;
pub mod config;
pub mod entry;
pub mod error;
pub mod frame;
pub mod gallery;
pub mod template;

pub use channel::{BufferIndex, ChannelBinding, TexFilter, TexWrap, VideoSource};
pub use config::{load_viewer_config, ViewerConfig};
pub use entry::{EntryControls, ShaderEntry, UniformData, UniformValue};
pub use error::EngineError;
pub use frame::FrameState;
pub use gallery::{validate_entry, Gallery};
pub use template::{GlslVersion, Precision};
