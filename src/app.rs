use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::Config;
use crate::data::loader;
use crate::data::model::CurveSet;
use crate::peaks::annotate::{annotate_curve, Annotation, PeakMarker};
use crate::peaks::detect::find_minima;
use crate::render::{render_figure, stack_offset};
use crate::summary::write_summary;

/// Fixed output locations, relative to the working directory.
pub const OUT_DIR: &str = "results/plots";
pub const PLOT_FILE: &str = "ftir_stacked.png";
pub const SUMMARY_FILE: &str = "ftir_peaks_summary.csv";

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Annotations plus their plot-side markers, accumulated over all curves.
#[derive(Debug, Default)]
pub struct AnalysisProducts {
    pub annotations: Vec<Annotation>,
    pub markers: Vec<PeakMarker>,
}

/// One full batch run: load every spectrum, detect and annotate minima,
/// render the stacked figure, persist the peak summary.
pub fn run(config: &Config) -> Result<()> {
    let curves = loader::load_directory(&config.input_dir)?;
    let products = analyze(&curves, config);

    let out_dir = Path::new(OUT_DIR);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let plot_path = out_dir.join(PLOT_FILE);
    render_figure(&curves, &products.markers, config.offset_step, &plot_path)?;
    info!("saved plot: {}", plot_path.display());

    if products.annotations.is_empty() {
        info!("no peaks annotated; skipping summary");
    } else {
        let summary_path = out_dir.join(SUMMARY_FILE);
        write_summary(&summary_path, &products.annotations)?;
        info!("saved peak summary: {}", summary_path.display());
    }
    Ok(())
}

/// Run detection and annotation over every curve, in load order.
pub fn analyze(curves: &CurveSet, config: &Config) -> AnalysisProducts {
    let n = curves.len();
    let mut products = AnalysisProducts::default();

    for (i, curve) in curves.iter().enumerate() {
        let offset = stack_offset(i, n, config.offset_step);
        let minima = find_minima(&curve.transmittance, config.prominence);
        debug!("{}: {} minima detected", curve.name, minima.len());

        let (annotations, markers) =
            annotate_curve(curve, &minima, offset, config.offset_step, &config.mode);
        products.annotations.extend(annotations);
        products.markers.extend(markers);
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnotationMode;
    use crate::peaks::annotate::PeakMode;
    use std::io::Write as _;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ftir_stack_app_{tag}"));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    fn config(input_dir: PathBuf, mode: AnnotationMode) -> Config {
        Config {
            input_dir,
            offset_step: 0.175,
            prominence: 0.01,
            mode,
        }
    }

    #[test]
    fn test_auto_mode_single_dip_scenario() {
        let dir = scratch_dir("auto");
        write_file(&dir, "sample.csv", "4000,0.95\n3500,0.40\n3000,0.92\n");

        let curves = loader::load_directory(&dir).unwrap();
        let cfg = config(dir, AnnotationMode::Auto { peaks_per_curve: 1 });
        let products = analyze(&curves, &cfg);

        assert_eq!(products.annotations.len(), 1);
        let a = &products.annotations[0];
        assert_eq!(a.file, "sample.csv");
        assert_eq!(a.mode, PeakMode::Auto);
        assert_eq!(a.peak_wavenumber, 3500.0);
        assert_eq!(a.transmittance, 0.40);
        assert_eq!(products.markers.len(), 1);
    }

    #[test]
    fn test_guess_mode_maps_each_guess_to_nearest_minimum() {
        let dir = scratch_dir("guess");
        write_file(&dir, "sample.csv", "4000,0.95\n3500,0.40\n3000,0.92\n");

        let curves = loader::load_directory(&dir).unwrap();
        let cfg = config(dir, AnnotationMode::Guess(vec![3500.0, 1650.0]));
        let products = analyze(&curves, &cfg);

        // The only detected minimum serves both guesses.
        assert_eq!(products.annotations.len(), 2);
        assert!(products
            .annotations
            .iter()
            .all(|a| a.peak_wavenumber == 3500.0 && a.mode == PeakMode::Guess));
        assert_eq!(products.annotations[0].guess, Some(3500.0));
        assert_eq!(products.annotations[1].guess, Some(1650.0));
    }

    #[test]
    fn test_guess_mode_curve_without_minima_yields_nothing() {
        let dir = scratch_dir("guess_flat");
        write_file(&dir, "flat.csv", "4000,0.95\n3500,0.95\n3000,0.95\n");

        let curves = loader::load_directory(&dir).unwrap();
        let cfg = config(dir, AnnotationMode::Guess(vec![3500.0, 1650.0]));
        let products = analyze(&curves, &cfg);
        assert!(products.annotations.is_empty());
    }

    #[test]
    fn test_offsets_stack_first_curve_on_top() {
        let dir = scratch_dir("stack");
        write_file(&dir, "a.csv", "4000,0.95\n3500,0.40\n3000,0.92\n");
        write_file(&dir, "b.csv", "4000,0.95\n3500,0.40\n3000,0.92\n");

        let curves = loader::load_directory(&dir).unwrap();
        let cfg = config(dir, AnnotationMode::Auto { peaks_per_curve: 1 });
        let products = analyze(&curves, &cfg);

        // a.csv is drawn one step above b.csv, and its marker rides along.
        assert_eq!(products.markers.len(), 2);
        assert!((products.markers[0].y - (0.40 + 0.175)).abs() < 1e-12);
        assert!((products.markers[1].y - 0.40).abs() < 1e-12);
    }

    #[test]
    fn test_auto_mode_depths_non_increasing() {
        let dir = scratch_dir("depths");
        write_file(
            &dir,
            "two_dips.csv",
            "4000,0.95\n3500,0.70\n3200,0.90\n2900,0.40\n2600,0.93\n",
        );

        let curves = loader::load_directory(&dir).unwrap();
        let cfg = config(dir, AnnotationMode::Auto { peaks_per_curve: 5 });
        let products = analyze(&curves, &cfg);

        assert_eq!(products.annotations.len(), 2);
        let depths: Vec<f64> = products
            .annotations
            .iter()
            .map(|a| 1.0 - a.transmittance)
            .collect();
        assert!(depths.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(products.annotations[0].peak_wavenumber, 2900.0);
    }
}
