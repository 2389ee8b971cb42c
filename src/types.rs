//! Core audio types and application state records.
//!
//! This module defines the fundamental data structures used throughout the
//! Equalizer Master core: graphic-EQ bands, the audio parameter snapshot
//! submitted to the sync pipeline, and the sync status events reported back
//! to the UI layer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// =============================================================================
// Constants
// =============================================================================

/// Number of graphic-EQ bands.
pub const BAND_COUNT: usize = 100;

/// Number of bands covering the low range (the rest cover the high range).
const LOW_BAND_COUNT: usize = 60;

/// Lower bound of the low band range in Hz.
const LOW_RANGE_MIN_HZ: f32 = 10.0;

/// Split frequency between the low and high band ranges in Hz.
const RANGE_SPLIT_HZ: f32 = 1000.0;

/// Upper bound of the high band range in Hz.
const HIGH_RANGE_MAX_HZ: f32 = 20000.0;

/// Lower bound of the per-band gain range in dB (UI slider limit).
pub const BAND_GAIN_MIN_DB: f32 = -12.0;

/// Upper bound of the per-band gain range in dB (UI slider limit).
pub const BAND_GAIN_MAX_DB: f32 = 12.0;

// =============================================================================
// Graphic-EQ Bands
// =============================================================================

/// A single graphic-EQ band.
///
/// The frequency is stored as a display label (`"10Hz"`, `"1.5kHz"`) fixed
/// when the band table is generated; only the gain changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Stable band index (0-based, matches position in the band table)
    pub id: usize,
    /// Frequency label, e.g. `"30Hz"` or `"1.5kHz"`
    pub frequency: String,
    /// Gain in dB, UI-constrained to [-12, 12]
    pub gain: f32,
}

impl Band {
    /// Returns the band frequency in Hz, parsed from the display label.
    ///
    /// Accepts integer-Hz labels (`"100Hz"`) and kHz labels with an optional
    /// fractional part (`"1.5kHz"`, `"2kHz"`), case-insensitive. Unparseable
    /// labels degrade to 0 Hz with a logged warning rather than a panic.
    pub fn frequency_hz(&self) -> f32 {
        match parse_frequency_label(&self.frequency) {
            Some(hz) => hz,
            None => {
                log::warn!("unparseable band frequency label: {:?}", self.frequency);
                0.0
            }
        }
    }
}

/// Parses a frequency label into Hz.
///
/// Returns `None` when the numeric part does not parse.
pub fn parse_frequency_label(label: &str) -> Option<f32> {
    let lowered = label.trim().to_ascii_lowercase();
    let stripped = lowered.strip_suffix("hz").unwrap_or(&lowered);
    match stripped.strip_suffix('k') {
        Some(kilo) => kilo.parse::<f32>().ok().map(|v| v * 1000.0),
        None => stripped.parse::<f32>().ok(),
    }
}

/// Returns the center frequency in Hz for a band index.
///
/// Bands 0-59 span 10 Hz - 1 kHz linearly; bands 60-99 span 1 kHz - 20 kHz
/// linearly, giving low frequencies more resolution on screen.
fn band_frequency(index: usize) -> f32 {
    if index < LOW_BAND_COUNT {
        let progress = index as f32 / LOW_BAND_COUNT as f32;
        LOW_RANGE_MIN_HZ + progress * (RANGE_SPLIT_HZ - LOW_RANGE_MIN_HZ)
    } else {
        let progress = (index - LOW_BAND_COUNT) as f32 / (BAND_COUNT - LOW_BAND_COUNT) as f32;
        RANGE_SPLIT_HZ + progress * (HIGH_RANGE_MAX_HZ - RANGE_SPLIT_HZ)
    }
}

/// Formats a frequency in Hz as a band label.
///
/// Below 1 kHz the value is rounded to an integer (`"984Hz"`); at or above
/// 1 kHz it is expressed in kHz rounded to one decimal, with a trailing `.0`
/// dropped (`"1kHz"`, `"19.5kHz"`).
fn format_frequency_label(freq: f32) -> String {
    if freq >= RANGE_SPLIT_HZ {
        let kilo = (freq / 1000.0 * 10.0).round() / 10.0;
        if kilo.fract() == 0.0 {
            format!("{}kHz", kilo as i32)
        } else {
            format!("{:.1}kHz", kilo)
        }
    } else {
        format!("{}Hz", freq.round() as i32)
    }
}

/// Creates the default 100-band table with all gains flat at 0 dB.
pub fn default_bands() -> Vec<Band> {
    (0..BAND_COUNT)
        .map(|id| Band {
            id,
            frequency: format_frequency_label(band_frequency(id)),
            gain: 0.0,
        })
        .collect()
}

// =============================================================================
// Audio Snapshot
// =============================================================================

/// A self-contained snapshot of every audio parameter the UI exposes.
///
/// One snapshot is submitted to the sync pipeline per UI change and is
/// immutable once submitted. Serialization uses camelCase field names so the
/// on-disk records (`last-state.json`, `presets.json`) stay compatible with
/// earlier releases, with per-field defaults so partial records still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSnapshot {
    /// The 100 graphic-EQ bands, in ascending frequency order
    #[serde(default = "default_bands")]
    pub bands: Vec<Band>,
    /// Bass boost knob, 0-100 % (maps onto a 100 Hz low-shelf filter)
    #[serde(default)]
    pub bass_boost: f32,
    /// Subwoofer knob, 0-100 % (maps onto a 50 Hz peaking filter)
    #[serde(default = "default_subwoofer_gain")]
    pub subwoofer_gain: f32,
    /// Master volume, 0-100 % (logarithmic preamp term)
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// Preamp knob, 0-100 % (linear -12..+12 dB term, 50 = 0 dB)
    #[serde(default = "default_preamp_gain")]
    pub preamp_gain: f32,
    /// When true, directives are written commented-out for inspection
    #[serde(default)]
    pub is_bypass: bool,
}

/// Returns `50.0` as the default subwoofer knob position.
fn default_subwoofer_gain() -> f32 {
    50.0
}

/// Returns `80.0` as the default master volume.
fn default_volume() -> f32 {
    80.0
}

/// Returns `50.0` (center, 0 dB) as the default preamp knob position.
fn default_preamp_gain() -> f32 {
    50.0
}

impl Default for AudioSnapshot {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            bass_boost: 0.0,
            subwoofer_gain: default_subwoofer_gain(),
            volume: default_volume(),
            preamp_gain: default_preamp_gain(),
            is_bypass: false,
        }
    }
}

// =============================================================================
// Sync Status
// =============================================================================

/// Status event emitted by the sync pipeline after each state transition.
///
/// Serialized with a lowercase `status` tag so the UI receives the same
/// payload shape as the original `eq-sync-status` messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncStatus {
    /// Nothing in flight, nothing pending
    Idle,
    /// A write to `filepath` has been dispatched
    Saving { filepath: PathBuf },
    /// The last write completed at `timestamp` (unix millis)
    Synced { timestamp: u64, filepath: PathBuf },
    /// The last submission or write failed
    Error { error: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_table_has_100_bands() {
        let bands = default_bands();
        assert_eq!(bands.len(), BAND_COUNT);
        assert!(bands.iter().all(|b| b.gain == 0.0));
        assert_eq!(bands[0].frequency, "10Hz");
        assert_eq!(bands[60].frequency, "1kHz");
    }

    #[test]
    fn band_frequencies_are_monotonic() {
        let bands = default_bands();
        for pair in bands.windows(2) {
            assert!(
                pair[0].frequency_hz() < pair[1].frequency_hz(),
                "{} should be below {}",
                pair[0].frequency,
                pair[1].frequency
            );
        }
    }

    #[test]
    fn every_generated_label_parses_back() {
        for band in default_bands() {
            let hz = parse_frequency_label(&band.frequency)
                .unwrap_or_else(|| panic!("label {:?} did not parse", band.frequency));
            assert!(hz >= 10.0);
            assert!(hz <= 20000.0);
        }
    }

    #[test]
    fn parse_frequency_label_formats() {
        assert_eq!(parse_frequency_label("100Hz"), Some(100.0));
        assert_eq!(parse_frequency_label("1.5kHz"), Some(1500.0));
        assert_eq!(parse_frequency_label("2kHz"), Some(2000.0));
        assert_eq!(parse_frequency_label("1.5k"), Some(1500.0));
        assert_eq!(parse_frequency_label("20KHZ"), Some(20000.0));
        assert_eq!(parse_frequency_label("garbage"), None);
    }

    #[test]
    fn snapshot_defaults_match_ui_defaults() {
        let snapshot = AudioSnapshot::default();
        assert_eq!(snapshot.bass_boost, 0.0);
        assert_eq!(snapshot.subwoofer_gain, 50.0);
        assert_eq!(snapshot.volume, 80.0);
        assert_eq!(snapshot.preamp_gain, 50.0);
        assert!(!snapshot.is_bypass);
    }

    #[test]
    fn partial_legacy_snapshot_record_loads() {
        // Older releases persisted records without every knob present.
        let snapshot: AudioSnapshot = serde_json::from_str(r#"{"volume": 55}"#).unwrap();
        assert_eq!(snapshot.volume, 55.0);
        assert_eq!(snapshot.preamp_gain, 50.0);
        assert_eq!(snapshot.bands.len(), BAND_COUNT);
    }

    #[test]
    fn sync_status_serializes_with_status_tag() {
        let status = SyncStatus::Saving {
            filepath: PathBuf::from("config.txt"),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "saving");
        assert_eq!(json["filepath"], "config.txt");
    }
}
