//! Equalizer Master core engine.
//!
//! The library behind the Equalizer Master desktop controller for
//! [Equalizer APO]. It owns everything that is not UI: rendering a parameter
//! snapshot into the APO config text ([`generator`]), keeping the config
//! file on disk in sync with rapid UI changes through a coalescing
//! single-writer pipeline ([`pipeline`]), genre preset curves ([`presets`]),
//! and JSON persistence of settings, session state, and user presets
//! ([`storage`]).
//!
//! The UI layer plugs in through three seams: a [`StatusSink`] receiving
//! idle/saving/synced/error transitions, a [`TargetPathProvider`] supplying
//! the currently selected config path, and the [`Storage`] collaborator for
//! restore-on-startup. The actual audio filtering is done by Equalizer APO
//! itself; this crate only produces the file it watches.
//!
//! [Equalizer APO]: https://equalizerapo.com

pub mod error;
pub mod generator;
pub mod pipeline;
pub mod presets;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use generator::generate_config;
pub use pipeline::{ConfigWriter, FsWriter, StatusSink, SyncPipeline, TargetPathProvider};
pub use presets::{apply_genre_preset, genre_curve, interpolate, CurvePoint, GENRES};
pub use storage::{Settings, SettingsStore, Storage, UserPreset};
pub use types::{default_bands, AudioSnapshot, Band, SyncStatus, BAND_COUNT};
