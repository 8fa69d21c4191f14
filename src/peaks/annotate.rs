use serde::{Deserialize, Serialize};

use crate::config::{AnnotationMode, DEFAULT_OFFSET_STEP};
use crate::data::model::Curve;

// ---------------------------------------------------------------------------
// Annotation records
// ---------------------------------------------------------------------------

/// Which selection policy produced an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakMode {
    Guess,
    Auto,
}

/// One labelled minimum, as written to the peak summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Source file basename.
    pub file: String,
    pub mode: PeakMode,
    /// The configured target wavenumber (guess mode only).
    #[serde(rename = "guess_cm-1")]
    pub guess: Option<f64>,
    /// Wavenumber of the selected minimum.
    #[serde(rename = "peak_cm-1")]
    pub peak_wavenumber: f64,
    /// Transmittance at the selected minimum (without stacking offset).
    pub transmittance: f64,
}

/// Marker and label placement for one annotation on the stacked figure.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakMarker {
    pub x: f64,
    /// Transmittance shifted by the curve's stacking offset.
    pub y: f64,
    /// Label sits slightly above the marker, scaled with the offset step.
    pub label_y: f64,
    /// Wavenumber rounded to the nearest integer.
    pub label: String,
}

/// Gap between a marker and its text label at the default offset step.
const LABEL_GAP: f64 = 0.01;

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Select which detected minima of `curve` get labelled, according to the
/// configured mode, and emit one annotation plus one plot marker per
/// selection.
///
/// Guess mode maps every guess to its nearest detected minimum (several
/// guesses may share one); a curve without minima yields nothing. Auto mode
/// keeps the `peaks_per_curve` deepest minima, ties broken by detection
/// order.
pub fn annotate_curve(
    curve: &Curve,
    minima: &[usize],
    offset: f64,
    offset_step: f64,
    mode: &AnnotationMode,
) -> (Vec<Annotation>, Vec<PeakMarker>) {
    let mut annotations = Vec::new();
    let mut markers = Vec::new();

    match mode {
        AnnotationMode::Guess(guesses) => {
            for &guess in guesses {
                if let Some(idx) = nearest_minimum(&curve.wavenumber, minima, guess) {
                    push_selection(
                        curve,
                        idx,
                        offset,
                        offset_step,
                        PeakMode::Guess,
                        Some(guess),
                        &mut annotations,
                        &mut markers,
                    );
                }
            }
        }
        AnnotationMode::Auto { peaks_per_curve } => {
            for idx in deepest_minima(&curve.transmittance, minima, *peaks_per_curve) {
                push_selection(
                    curve,
                    idx,
                    offset,
                    offset_step,
                    PeakMode::Auto,
                    None,
                    &mut annotations,
                    &mut markers,
                );
            }
        }
    }

    (annotations, markers)
}

/// The detected minimum whose wavenumber is closest to `guess`; the
/// first-detected one wins ties. `None` when no minima were detected.
fn nearest_minimum(wavenumber: &[f64], minima: &[usize], guess: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &idx in minima {
        let dist = (wavenumber[idx] - guess).abs();
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// The `limit` deepest minima by `1 - transmittance`, descending. The sort
/// is stable, so equal depths keep detection order.
fn deepest_minima(transmittance: &[f64], minima: &[usize], limit: usize) -> Vec<usize> {
    let mut ranked = minima.to_vec();
    ranked.sort_by(|&a, &b| (1.0 - transmittance[b]).total_cmp(&(1.0 - transmittance[a])));
    ranked.truncate(limit);
    ranked
}

#[allow(clippy::too_many_arguments)]
fn push_selection(
    curve: &Curve,
    idx: usize,
    offset: f64,
    offset_step: f64,
    mode: PeakMode,
    guess: Option<f64>,
    annotations: &mut Vec<Annotation>,
    markers: &mut Vec<PeakMarker>,
) {
    let wn = curve.wavenumber[idx];
    let tr = curve.transmittance[idx];

    annotations.push(Annotation {
        file: curve.name.clone(),
        mode,
        guess,
        peak_wavenumber: wn,
        transmittance: tr,
    });
    // The label gap grows with the offset step but never shrinks below the
    // gap used at the default step.
    markers.push(PeakMarker {
        x: wn,
        y: tr + offset,
        label_y: tr + offset + LABEL_GAP * (offset_step / DEFAULT_OFFSET_STEP).max(1.0),
        label: format!("{wn:.0}"),
    });
}
