// ---------------------------------------------------------------------------
// Curve – one loaded spectrum
// ---------------------------------------------------------------------------

/// A single spectrum loaded from one CSV file.
///
/// Both axes have equal length, contain only finite values, and are ordered
/// by descending wavenumber (the usual FTIR presentation).
#[derive(Debug, Clone)]
pub struct Curve {
    /// Source file basename, used for legends and the peak summary.
    pub name: String,
    /// Wavenumber axis (x), cm⁻¹, descending.
    pub wavenumber: Vec<f64>,
    /// Transmittance axis (y) – same length as `wavenumber`.
    pub transmittance: Vec<f64>,
}

impl Curve {
    /// Build a curve from raw `(wavenumber, transmittance)` rows, sorting
    /// them by descending wavenumber. The sort is stable so duplicate
    /// wavenumbers keep their file order.
    pub fn from_rows(name: impl Into<String>, mut rows: Vec<(f64, f64)>) -> Self {
        rows.sort_by(|a, b| b.0.total_cmp(&a.0));
        let (wavenumber, transmittance) = rows.into_iter().unzip();
        Curve {
            name: name.into(),
            wavenumber,
            transmittance,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wavenumber.len()
    }

    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.wavenumber.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CurveSet – the complete loaded collection
// ---------------------------------------------------------------------------

/// All curves of one run, in load order (filename-sorted).
#[derive(Debug, Clone, Default)]
pub struct CurveSet {
    pub curves: Vec<Curve>,
}

impl CurveSet {
    pub fn from_curves(curves: Vec<Curve>) -> Self {
        CurveSet { curves }
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Curve> {
        self.curves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_sorts_descending() {
        let curve = Curve::from_rows("a.csv", vec![(3000.0, 0.92), (4000.0, 0.95), (3500.0, 0.40)]);
        assert_eq!(curve.wavenumber, vec![4000.0, 3500.0, 3000.0]);
        assert_eq!(curve.transmittance, vec![0.95, 0.40, 0.92]);
    }

    #[test]
    fn test_from_rows_stable_on_duplicate_wavenumbers() {
        let curve = Curve::from_rows("a.csv", vec![(3500.0, 0.1), (3500.0, 0.2)]);
        assert_eq!(curve.transmittance, vec![0.1, 0.2]);
    }

    #[test]
    fn test_curve_set_len() {
        let set = CurveSet::from_curves(vec![Curve::from_rows("a.csv", vec![(1.0, 1.0)])]);
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
        assert!(CurveSet::default().is_empty());
    }
}
