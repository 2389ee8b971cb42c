//! Equalizer APO config rendering.
//!
//! Pure transformation from an [`AudioSnapshot`] to the line-oriented text
//! format Equalizer APO reads. No I/O here; the sync pipeline decides when
//! and where the rendered text lands on disk.

use crate::types::AudioSnapshot;

// =============================================================================
// Constants
// =============================================================================

/// Prefix applied to every directive line while bypass is active.
///
/// Equalizer APO treats `#` lines as comments, so the intended values stay
/// visible in the file for diagnostics without being applied.
const BYPASS_PREFIX: &str = "# [BYPASS] ";

/// Preamp floor substituted when the volume is at or below zero.
const VOLUME_FLOOR_DB: f32 = -100.0;

/// Full span of the preamp knob in dB (0-100 % maps onto -12..+12 dB).
const PREAMP_RANGE_DB: f32 = 24.0;

/// Offset subtracted so the knob center (50 %) lands on 0 dB.
const PREAMP_OFFSET_DB: f32 = 12.0;

/// Low-shelf gain in dB at a 100 % bass boost.
const BASS_MAX_GAIN_DB: f32 = 12.0;

/// Peaking-filter gain in dB at a 100 % subwoofer knob.
const SUBWOOFER_MAX_GAIN_DB: f32 = 15.0;

// =============================================================================
// Rendering
// =============================================================================

/// Renders a snapshot into Equalizer APO config text.
///
/// Deterministic and side-effect-free: an identical snapshot always yields a
/// byte-identical string. Values are not validated or clamped here; the
/// caller owns range enforcement.
pub fn generate_config(snapshot: &AudioSnapshot) -> String {
    let mut lines: Vec<String> = vec![
        String::from("# Equalizer Master Configuration"),
        String::from("# Generated automatically. Do not edit manually."),
        String::new(),
    ];

    let prefix = if snapshot.is_bypass { BYPASS_PREFIX } else { "" };

    // Preamp: logarithmic volume term plus linear knob term, uncapped.
    // Large negative totals are fine; large positive totals may clip and
    // Equalizer APO accepts them as-is.
    let total_preamp = volume_db(snapshot.volume) + preamp_boost_db(snapshot.preamp_gain);
    lines.push(format!("{}Preamp: {:.2} dB", prefix, total_preamp));
    lines.push(String::new());

    if snapshot.bass_boost > 0.0 {
        let gain = snapshot.bass_boost / 100.0 * BASS_MAX_GAIN_DB;
        lines.push(String::from("# Bass Boost"));
        lines.push(format!(
            "{}Filter: ON LS Fc 100 Hz Gain {:.1} dB Q 1.0",
            prefix, gain
        ));
        lines.push(String::new());
    }

    if snapshot.subwoofer_gain > 0.0 {
        let gain = snapshot.subwoofer_gain / 100.0 * SUBWOOFER_MAX_GAIN_DB;
        lines.push(String::from("# Subwoofer Boost"));
        lines.push(format!(
            "{}Filter: ON PK Fc 50 Hz Gain {:.1} dB Q 2.0",
            prefix, gain
        ));
        lines.push(String::new());
    }

    let entries: Vec<String> = snapshot
        .bands
        .iter()
        .map(|band| {
            format!(
                "{} {:.2}",
                format_frequency(band.frequency_hz()),
                band.gain
            )
        })
        .collect();
    lines.push(format!("{}GraphicEQ: {}", prefix, entries.join("; ")));

    lines.join("\n")
}

/// Converts the 0-100 % master volume into dB.
///
/// Zero and negative volumes substitute the -100 dB floor instead of
/// evaluating `log10` outside its domain.
fn volume_db(volume: f32) -> f32 {
    if volume > 0.0 {
        20.0 * (volume / 100.0).log10()
    } else {
        VOLUME_FLOOR_DB
    }
}

/// Converts the 0-100 % preamp knob into its -12..+12 dB boost term.
fn preamp_boost_db(preamp_gain: f32) -> f32 {
    preamp_gain / 100.0 * PREAMP_RANGE_DB - PREAMP_OFFSET_DB
}

/// Formats a frequency in Hz as a plain number, without a trailing `.0`.
fn format_frequency(freq: f32) -> String {
    if freq.fract() == 0.0 {
        format!("{}", freq as i64)
    } else {
        format!("{}", freq)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{default_bands, Band};

    fn snapshot(volume: f32, preamp: f32, bass: f32, sub: f32) -> AudioSnapshot {
        AudioSnapshot {
            bands: default_bands(),
            bass_boost: bass,
            subwoofer_gain: sub,
            volume,
            preamp_gain: preamp,
            is_bypass: false,
        }
    }

    fn preamp_line(config: &str) -> &str {
        config
            .lines()
            .find(|l| l.contains("Preamp:"))
            .expect("config should contain a preamp line")
    }

    // =========================================================================
    // Preamp Tests
    // =========================================================================

    #[test]
    fn zero_volume_uses_floor_not_log_of_zero() {
        let config = generate_config(&snapshot(0.0, 50.0, 0.0, 0.0));
        assert_eq!(preamp_line(&config), "Preamp: -100.00 dB");
    }

    #[test]
    fn zero_volume_still_adds_knob_term() {
        let config = generate_config(&snapshot(0.0, 0.0, 0.0, 0.0));
        assert_eq!(preamp_line(&config), "Preamp: -112.00 dB");
    }

    #[test]
    fn preamp_knob_is_linear_around_center() {
        assert_eq!(preamp_boost_db(0.0), -12.0);
        assert_eq!(preamp_boost_db(50.0), 0.0);
        assert_eq!(preamp_boost_db(75.0), 6.0);
        assert_eq!(preamp_boost_db(100.0), 12.0);
    }

    #[test]
    fn full_volume_centered_knob_is_unity() {
        let config = generate_config(&snapshot(100.0, 50.0, 0.0, 0.0));
        assert_eq!(preamp_line(&config), "Preamp: 0.00 dB");
    }

    // =========================================================================
    // Bass / Subwoofer Filter Tests
    // =========================================================================

    #[test]
    fn bass_boost_zero_emits_no_filter() {
        let config = generate_config(&snapshot(80.0, 50.0, 0.0, 0.0));
        assert!(!config.contains("Bass Boost"));
        assert!(!config.contains("Filter:"));
    }

    #[test]
    fn bass_boost_full_scale_is_12_db() {
        let config = generate_config(&snapshot(80.0, 50.0, 100.0, 0.0));
        assert!(config.contains("# Bass Boost"));
        assert!(config.contains("Filter: ON LS Fc 100 Hz Gain 12.0 dB Q 1.0"));
    }

    #[test]
    fn subwoofer_zero_emits_no_filter() {
        let config = generate_config(&snapshot(80.0, 50.0, 50.0, 0.0));
        assert!(!config.contains("Subwoofer"));
        assert!(!config.contains("Fc 50 Hz"));
    }

    #[test]
    fn subwoofer_full_scale_is_15_db() {
        let config = generate_config(&snapshot(80.0, 50.0, 0.0, 100.0));
        assert!(config.contains("# Subwoofer Boost"));
        assert!(config.contains("Filter: ON PK Fc 50 Hz Gain 15.0 dB Q 2.0"));
    }

    #[test]
    fn half_scale_knobs_scale_proportionally() {
        let config = generate_config(&snapshot(80.0, 50.0, 50.0, 50.0));
        assert!(config.contains("Filter: ON LS Fc 100 Hz Gain 6.0 dB Q 1.0"));
        assert!(config.contains("Filter: ON PK Fc 50 Hz Gain 7.5 dB Q 2.0"));
    }

    // =========================================================================
    // GraphicEQ Tests
    // =========================================================================

    #[test]
    fn graphic_eq_has_one_entry_per_band_in_order() {
        let mut snap = snapshot(80.0, 50.0, 0.0, 0.0);
        for (i, band) in snap.bands.iter_mut().enumerate() {
            band.gain = (i as f32 % 5.0) - 2.0;
        }
        let config = generate_config(&snap);

        let line = config
            .lines()
            .find(|l| l.starts_with("GraphicEQ:"))
            .unwrap();
        let entries: Vec<&str> = line["GraphicEQ: ".len()..].split("; ").collect();
        assert_eq!(entries.len(), 100);

        // First and last entries reflect input order, not a re-sort.
        assert!(entries[0].starts_with("10 "));
        assert!(entries[99].ends_with(&format!("{:.2}", (99.0_f32 % 5.0) - 2.0)));
    }

    #[test]
    fn khz_labels_expand_to_plain_hz() {
        let mut snap = snapshot(80.0, 50.0, 0.0, 0.0);
        snap.bands = vec![Band {
            id: 0,
            frequency: String::from("1.5kHz"),
            gain: -3.25,
        }];
        let config = generate_config(&snap);
        assert!(config.contains("GraphicEQ: 1500 -3.25"));
    }

    // =========================================================================
    // Bypass and Determinism Tests
    // =========================================================================

    #[test]
    fn bypass_prefixes_every_directive_line() {
        let mut snap = snapshot(80.0, 50.0, 40.0, 60.0);
        snap.is_bypass = true;
        let config = generate_config(&snap);

        for line in config.lines() {
            if line.contains("Preamp:") || line.contains("Filter:") || line.contains("GraphicEQ:") {
                assert!(
                    line.starts_with("# [BYPASS] "),
                    "directive not commented out: {}",
                    line
                );
            }
        }
        // Header stays a plain comment block.
        assert!(config.starts_with("# Equalizer Master Configuration"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let mut snap = snapshot(63.0, 72.0, 15.0, 85.0);
        for band in snap.bands.iter_mut() {
            band.gain = 1.75;
        }
        assert_eq!(generate_config(&snap), generate_config(&snap.clone()));
    }

    #[test]
    fn end_to_end_example_matches_known_output() {
        // volume 80 => 20*log10(0.8) ~ -1.9382 => rendered as -1.94
        let mut snap = snapshot(80.0, 50.0, 0.0, 0.0);
        snap.bands = (0..100)
            .map(|id| Band {
                id,
                frequency: String::from("10Hz"),
                gain: 0.0,
            })
            .collect();
        let config = generate_config(&snap);

        assert_eq!(preamp_line(&config), "Preamp: -1.94 dB");
        assert!(!config.contains("Filter:"));
        let line = config
            .lines()
            .find(|l| l.starts_with("GraphicEQ:"))
            .unwrap();
        assert_eq!(line["GraphicEQ: ".len()..].split("; ").count(), 100);
        assert!(line.contains("10 0.00"));
    }
}
