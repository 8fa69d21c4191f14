use std::path::PathBuf;

use log::debug;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Vertical distance between stacked curves.
pub const DEFAULT_OFFSET_STEP: f64 = 0.175;
/// Minimum topographic prominence (on `1 - transmittance`) for a minimum.
pub const DEFAULT_PROMINENCE: f64 = 0.001;
/// Number of minima annotated per curve when no target guesses are given.
pub const DEFAULT_PEAKS_PER_CURVE: i64 = 5;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("INPUT_DIR is not set")]
    MissingInputDir,
    #[error("{var}: cannot parse '{value}' as a number")]
    InvalidNumber { var: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// Annotation mode
// ---------------------------------------------------------------------------

/// How minima are selected for labelling, decided once at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationMode {
    /// Label the detected minimum nearest to each target wavenumber.
    Guess(Vec<f64>),
    /// Label the deepest `peaks_per_curve` minima of every curve.
    Auto { peaks_per_curve: usize },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Run parameters, resolved once from the environment and immutable after.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned (recursively) for `*.csv` spectra.
    pub input_dir: PathBuf,
    /// Vertical offset between consecutive curves.
    pub offset_step: f64,
    /// Prominence threshold for the minima detector.
    pub prominence: f64,
    /// Guess or auto annotation.
    pub mode: AnnotationMode,
}

impl Config {
    /// Read all parameters from environment variables.
    ///
    /// `INPUT_DIR` is required; everything else falls back to its default.
    /// Malformed `TARGET_GUESSES` tokens are dropped silently (auto mode is
    /// used if none survive), but a malformed numeric variable is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let input_dir = std::env::var("INPUT_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingInputDir)?;

        let offset_step = env_f64("OFFSET_STEP", DEFAULT_OFFSET_STEP)?;
        let prominence = env_f64("PEAK_PROMINENCE", DEFAULT_PROMINENCE)?;
        let peaks_per_curve = env_i64("PEAKS_PER_CURVE", DEFAULT_PEAKS_PER_CURVE)?;

        let guesses_raw = std::env::var("TARGET_GUESSES").ok();
        let mode = resolve_mode(guesses_raw.as_deref(), peaks_per_curve);

        Ok(Config {
            input_dir: PathBuf::from(input_dir),
            offset_step,
            prominence,
            mode,
        })
    }
}

/// Pick the annotation mode: guesses win when at least one token parses,
/// otherwise fall back to auto. `peaks_per_curve <= 0` is kept as zero so a
/// run still renders the figure without annotations.
pub fn resolve_mode(guesses_raw: Option<&str>, peaks_per_curve: i64) -> AnnotationMode {
    if let Some(raw) = guesses_raw {
        let guesses = parse_guesses(raw);
        if !guesses.is_empty() {
            return AnnotationMode::Guess(guesses);
        }
    }
    AnnotationMode::Auto {
        peaks_per_curve: peaks_per_curve.max(0) as usize,
    }
}

/// Split a guess list on commas, semicolons and whitespace; tokens that do
/// not parse as floats are dropped.
pub fn parse_guesses(raw: &str) -> Vec<f64> {
    raw.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|tok| !tok.is_empty())
        .filter_map(|tok| match tok.parse::<f64>() {
            Ok(v) => Some(v),
            Err(_) => {
                debug!("ignoring malformed guess token '{tok}'");
                None
            }
        })
        .collect()
}

fn env_f64(var: &'static str, default: f64) -> Result<f64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_i64(var: &'static str, default: i64) -> Result<i64, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_guesses_mixed_delimiters() {
        assert_eq!(
            parse_guesses("3500, 1650;1000  720"),
            vec![3500.0, 1650.0, 1000.0, 720.0]
        );
    }

    #[test]
    fn test_parse_guesses_drops_malformed_tokens() {
        assert_eq!(parse_guesses("3500, abc, 1650"), vec![3500.0, 1650.0]);
    }

    #[test]
    fn test_parse_guesses_empty_and_delimiters_only() {
        assert!(parse_guesses("").is_empty());
        assert!(parse_guesses(" ,; ,  ;").is_empty());
    }

    #[test]
    fn test_resolve_mode_guesses_win() {
        let mode = resolve_mode(Some("3500 1650"), 5);
        assert_eq!(mode, AnnotationMode::Guess(vec![3500.0, 1650.0]));
    }

    #[test]
    fn test_resolve_mode_falls_back_to_auto() {
        assert_eq!(
            resolve_mode(None, 5),
            AnnotationMode::Auto { peaks_per_curve: 5 }
        );
        // A guess list with no parseable token behaves like an unset one.
        assert_eq!(
            resolve_mode(Some(" ,; not-a-number"), 3),
            AnnotationMode::Auto { peaks_per_curve: 3 }
        );
    }

    #[test]
    fn test_resolve_mode_clamps_negative_peak_count() {
        assert_eq!(
            resolve_mode(None, -2),
            AnnotationMode::Auto { peaks_per_curve: 0 }
        );
    }

    #[test]
    fn test_from_env_reads_all_variables() {
        std::env::set_var("INPUT_DIR", "/tmp/spectra");
        std::env::set_var("OFFSET_STEP", "0.25");
        std::env::set_var("PEAK_PROMINENCE", "0.01");
        std::env::set_var("PEAKS_PER_CURVE", "3");
        std::env::remove_var("TARGET_GUESSES");

        let config = Config::from_env().unwrap();
        assert_eq!(config.input_dir, PathBuf::from("/tmp/spectra"));
        assert_eq!(config.offset_step, 0.25);
        assert_eq!(config.prominence, 0.01);
        assert_eq!(config.mode, AnnotationMode::Auto { peaks_per_curve: 3 });

        std::env::remove_var("INPUT_DIR");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::MissingInputDir)
        ));

        std::env::remove_var("OFFSET_STEP");
        std::env::remove_var("PEAK_PROMINENCE");
        std::env::remove_var("PEAKS_PER_CURVE");
    }
}
