//! Analysis layer: absorption-minima detection and annotation selection.
//!
//! Detection runs on the inverted signal `1 - transmittance`, so an
//! absorption dip becomes a peak whose topographic prominence can be
//! measured. Annotation then picks which detected minima get a marker and a
//! label, either by nearest-match to target wavenumbers or by depth ranking.

pub mod annotate;
pub mod detect;
