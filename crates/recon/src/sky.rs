//! Celestial coordinates and great-circle separation.

use serde::Serialize;

const ARCSEC_PER_DEGREE: f64 = 3600.0;

/// ICRS position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub ra_deg: f64,
    pub dec_deg: f64,
}

impl Coordinate {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self { ra_deg, dec_deg }
    }

    /// Great-circle separation in arc-seconds.
    ///
    /// Uses the Vincenty form of the spherical law, which stays well
    /// conditioned for the sub-arcsecond separations this crate cares about
    /// as well as near the poles.
    pub fn separation_arcsec(&self, other: &Coordinate) -> f64 {
        let (ra1, dec1) = (self.ra_deg.to_radians(), self.dec_deg.to_radians());
        let (ra2, dec2) = (other.ra_deg.to_radians(), other.dec_deg.to_radians());
        let d_ra = ra2 - ra1;

        let (sin_d1, cos_d1) = dec1.sin_cos();
        let (sin_d2, cos_d2) = dec2.sin_cos();
        let (sin_dra, cos_dra) = d_ra.sin_cos();

        let a = cos_d2 * sin_dra;
        let b = cos_d1 * sin_d2 - sin_d1 * cos_d2 * cos_dra;
        let num = a.hypot(b);
        let den = sin_d1 * sin_d2 + cos_d1 * cos_d2 * cos_dra;

        num.atan2(den).to_degrees() * ARCSEC_PER_DEGREE
    }
}
