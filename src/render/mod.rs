//! Presentation layer: the stacked figure, written straight to PNG.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::color::generate_palette;
use crate::data::model::CurveSet;
use crate::peaks::annotate::PeakMarker;

/// Figure dimensions in pixels.
const FIGURE_SIZE: (u32, u32) = (2000, 1200);

// ---------------------------------------------------------------------------
// Stacking geometry
// ---------------------------------------------------------------------------

/// Vertical offset of curve `index` (0-based) out of `total`, so the first
/// curve in filename order is drawn on top.
pub fn stack_offset(index: usize, total: usize, step: f64) -> f64 {
    total.saturating_sub(index + 1) as f64 * step
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// Render all curves, stacked by their offsets, with the annotator's markers
/// and labels overlaid, and save the figure to `out_path`.
///
/// The wavenumber axis runs high-to-low, as FTIR spectra are conventionally
/// read.
pub fn render_figure(
    curves: &CurveSet,
    markers: &[PeakMarker],
    offset_step: f64,
    out_path: &Path,
) -> Result<()> {
    let n = curves.len();
    let (x_range, y_range) = axis_ranges(curves, offset_step);

    let root = BitMapBackend::new(out_path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .with_context(|| format!("preparing {}", out_path.display()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("FTIR Spectra (stacked)", ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        // Reversed range so wavenumbers decrease left-to-right.
        .build_cartesian_2d(x_range.1..x_range.0, y_range.0..y_range.1)
        .context("building chart axes")?;

    chart
        .configure_mesh()
        .x_desc("Wavenumber (cm⁻¹)")
        .y_desc(format!("Transmittance (stacked, Δ={offset_step})"))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .draw()
        .context("drawing chart mesh")?;

    let colors = generate_palette(n);
    for (i, curve) in curves.iter().enumerate() {
        let offset = stack_offset(i, n, offset_step);
        let color = colors[i];
        chart
            .draw_series(LineSeries::new(
                curve
                    .wavenumber
                    .iter()
                    .zip(curve.transmittance.iter())
                    .map(|(&wn, &tr)| (wn, tr + offset)),
                &color,
            ))
            .with_context(|| format!("drawing {}", curve.name))?
            .label(format!("{} (offset +{offset:.3})", curve.name))
            .legend(move |(x, y)| PathElement::new([(x, y), (x + 20, y)], color));
    }

    chart
        .draw_series(
            markers
                .iter()
                .map(|m| Cross::new((m.x, m.y), 6, BLACK.stroke_width(2))),
        )
        .context("drawing peak markers")?;
    chart
        .draw_series(markers.iter().map(|m| {
            Text::new(m.label.clone(), (m.x, m.label_y), ("sans-serif", 16))
        }))
        .context("drawing peak labels")?;

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .context("drawing legend")?;

    root.present()
        .with_context(|| format!("saving {}", out_path.display()))?;
    Ok(())
}

/// Axis bounds covering every shifted curve, padded so markers and labels
/// stay inside the plot area.
fn axis_ranges(curves: &CurveSet, offset_step: f64) -> ((f64, f64), (f64, f64)) {
    let n = curves.len();
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for (i, curve) in curves.iter().enumerate() {
        let offset = stack_offset(i, n, offset_step);
        for &wn in &curve.wavenumber {
            x_min = x_min.min(wn);
            x_max = x_max.max(wn);
        }
        for &tr in &curve.transmittance {
            y_min = y_min.min(tr + offset);
            y_max = y_max.max(tr + offset);
        }
    }

    if !x_min.is_finite() {
        // No samples at all; the loader rejects this earlier, but keep the
        // figure well-formed regardless.
        return ((0.0, 1.0), (0.0, 1.0));
    }
    if x_min == x_max {
        x_min -= 1.0;
        x_max += 1.0;
    }

    let y_pad = 0.05 * (y_max - y_min).max(offset_step.abs()).max(1e-6);
    ((x_min, x_max), (y_min - y_pad, y_max + y_pad))
}
