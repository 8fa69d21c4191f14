use std::path::Path;

use anyhow::{Context, Result};

use crate::peaks::annotate::Annotation;

// ---------------------------------------------------------------------------
// Peak summary CSV
// ---------------------------------------------------------------------------

/// Serialize every annotation of the run, in emission order, to `path`.
///
/// An empty list writes nothing at all (no empty file). An existing file is
/// overwritten.
pub fn write_summary(path: &Path, annotations: &[Annotation]) -> Result<()> {
    if annotations.is_empty() {
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for annotation in annotations {
        writer
            .serialize(annotation)
            .context("serializing annotation")?;
    }
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peaks::annotate::PeakMode;
    use std::path::PathBuf;

    fn read_back(path: &Path) -> Vec<Annotation> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().map(|r| r.unwrap()).collect()
    }

    fn scratch_file(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("ftir_stack_summary");
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(format!("{tag}.csv"))
    }

    #[test]
    fn test_round_trip_preserves_records_and_order() {
        let annotations = vec![
            Annotation {
                file: "a.csv".into(),
                mode: PeakMode::Guess,
                guess: Some(3400.0),
                peak_wavenumber: 3500.0,
                transmittance: 0.40,
            },
            Annotation {
                file: "a.csv".into(),
                mode: PeakMode::Auto,
                guess: None,
                peak_wavenumber: 2900.0,
                transmittance: 0.70,
            },
        ];

        let path = scratch_file("round_trip");
        write_summary(&path, &annotations).unwrap();
        assert_eq!(read_back(&path), annotations);
    }

    #[test]
    fn test_empty_list_writes_no_file() {
        let path = scratch_file("empty");
        let _ = std::fs::remove_file(&path);
        write_summary(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_header_columns() {
        let annotations = vec![Annotation {
            file: "a.csv".into(),
            mode: PeakMode::Auto,
            guess: None,
            peak_wavenumber: 3500.0,
            transmittance: 0.40,
        }];
        let path = scratch_file("header");
        write_summary(&path, &annotations).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("file,mode,guess_cm-1,peak_cm-1,transmittance"));
    }
}
