//! Built-in genre presets.
//!
//! Each genre is a small set of `(frequency Hz, gain dB)` control points;
//! applying one maps the curve onto the 100-band table through
//! piecewise-linear interpolation, with flat extrapolation outside the
//! control range. The curve content is product data, not algorithm.

use crate::error::{Error, Result};
use crate::types::Band;

/// One control point of a genre curve: `(frequency_hz, gain_db)`.
pub type CurvePoint = (f32, f32);

/// Names of all built-in genre presets, in menu order.
pub const GENRES: &[&str] = &[
    "Rock",
    "Pop",
    "Dangdut",
    "Jazz",
    "Classical",
    "Acoustic",
    "Bass Booster",
    "Bass Reducer",
    "Electronic",
    "Hip-Hop",
    "Spoken Word",
    "Loudness",
    "Vocal Booster",
    "Gaming",
    "Cinema",
    "Flat",
];

/// Returns the control points for a genre, or `None` for unknown names.
pub fn genre_curve(genre: &str) -> Option<&'static [CurvePoint]> {
    let points: &'static [CurvePoint] = match genre {
        // V-shape: boosted lows, scooped mids, boosted highs
        "Rock" => &[
            (20.0, 5.0),
            (60.0, 7.0),
            (150.0, 3.0),
            (500.0, -4.0),
            (1000.0, -4.0),
            (3000.0, 2.0),
            (8000.0, 6.0),
            (16000.0, 7.0),
        ],
        // W-shape: punchy bass, clear vocals, softened presence region
        "Pop" => &[
            (30.0, 3.0),
            (100.0, 4.0),
            (250.0, 3.0),
            (1000.0, 0.0),
            (3000.0, -2.0),
            (6000.0, -1.0),
            (12000.0, 4.0),
            (18000.0, 4.0),
        ],
        // Kick drum around 60-100 Hz plus the 4 kHz "tak" transient
        "Dangdut" => &[
            (30.0, 5.0),
            (60.0, 8.0),
            (105.0, 8.0),
            (250.0, 3.0),
            (500.0, -1.0),
            (800.0, -3.0),
            (2500.0, 2.0),
            (4000.0, 6.0),
            (6000.0, 4.0),
            (10000.0, 2.0),
            (16000.0, 3.0),
        ],
        // Warm, relaxed highs
        "Jazz" => &[
            (30.0, 3.0),
            (150.0, 3.0),
            (500.0, 1.0),
            (1000.0, 0.0),
            (2500.0, -2.0),
            (5000.0, -1.0),
            (10000.0, -2.0),
            (20000.0, -4.0),
        ],
        // Gentle arch with a mid focus
        "Classical" => &[
            (30.0, 0.0),
            (200.0, 1.0),
            (1000.0, 2.0),
            (5000.0, 1.0),
            (15000.0, -1.0),
        ],
        "Acoustic" => &[
            (50.0, 1.0),
            (200.0, 2.0),
            (1000.0, 3.0),
            (4000.0, 4.0),
            (10000.0, 2.0),
        ],
        "Bass Booster" => &[
            (30.0, 6.0),
            (60.0, 9.0),
            (100.0, 6.0),
            (250.0, 2.0),
            (500.0, 0.0),
        ],
        "Bass Reducer" => &[(30.0, -8.0), (80.0, -5.0), (200.0, -2.0), (500.0, 0.0)],
        "Electronic" => &[
            (30.0, 5.0),
            (80.0, 6.0),
            (200.0, 1.0),
            (1000.0, -2.0),
            (5000.0, 3.0),
            (12000.0, 5.0),
        ],
        "Hip-Hop" => &[
            (40.0, 7.0),
            (80.0, 5.0),
            (250.0, 1.0),
            (1000.0, -2.0),
            (4000.0, 2.0),
            (10000.0, 3.0),
        ],
        "Spoken Word" => &[
            (60.0, -6.0),
            (200.0, -2.0),
            (500.0, 2.0),
            (1000.0, 4.0),
            (3000.0, 4.0),
            (8000.0, -2.0),
        ],
        "Loudness" => &[
            (30.0, 7.0),
            (100.0, 4.0),
            (500.0, -2.0),
            (2000.0, 0.0),
            (8000.0, 5.0),
            (16000.0, 8.0),
        ],
        "Vocal Booster" => &[
            (200.0, -3.0),
            (500.0, 2.0),
            (1000.0, 5.0),
            (3000.0, 5.0),
            (8000.0, 2.0),
        ],
        "Gaming" => &[
            (40.0, 5.0),
            (100.0, 3.0),
            (500.0, -3.0),
            (2000.0, 4.0),
            (6000.0, 6.0),
            (12000.0, 5.0),
        ],
        "Cinema" => &[
            (30.0, 5.0),
            (80.0, 4.0),
            (300.0, -2.0),
            (1000.0, 0.0),
            (5000.0, 3.0),
            (12000.0, 6.0),
        ],
        "Flat" => &[(0.0, 0.0), (20000.0, 0.0)],
        _ => return None,
    };
    Some(points)
}

/// Evaluates a curve at `freq` Hz.
///
/// Frequencies below the first control point take the first point's gain,
/// frequencies above the last take the last point's gain, and anything in
/// between is linearly interpolated over the bracketing segment. Control
/// points are assumed sorted by frequency.
pub fn interpolate(freq: f32, points: &[CurvePoint]) -> f32 {
    let Some((&first, &last)) = points.first().zip(points.last()) else {
        return 0.0;
    };
    if freq <= first.0 {
        return first.1;
    }
    if freq >= last.0 {
        return last.1;
    }

    for segment in points.windows(2) {
        let (p1, p2) = (segment[0], segment[1]);
        if freq >= p1.0 && freq <= p2.0 {
            let ratio = (freq - p1.0) / (p2.0 - p1.0);
            return p1.1 + ratio * (p2.1 - p1.1);
        }
    }
    0.0
}

/// Maps a genre curve onto a band table.
///
/// Returns a new band vector with interpolated gains; band identities and
/// labels are untouched. Unknown genre names fail with
/// [`Error::UnknownPreset`] rather than silently applying a flat curve;
/// "Flat" is itself a listed preset.
pub fn apply_genre_preset(genre: &str, bands: &[Band]) -> Result<Vec<Band>> {
    let points = genre_curve(genre).ok_or_else(|| Error::UnknownPreset(genre.to_string()))?;

    Ok(bands
        .iter()
        .map(|band| Band {
            id: band.id,
            frequency: band.frequency.clone(),
            gain: interpolate(band.frequency_hz(), points),
        })
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================
