//! Equatorial ↔ galactic coordinate conversion (J2000).
//!
//! A pure rotation between the ICRS equatorial frame and the IAU
//! galactic frame, accurate to the precision of the adopted pole
//! constants (well below an arcsecond — far below the pixel scale of
//! the count maps these coordinates index).

use vela_core::{Result, VelaError};

/// J2000 right ascension of the north galactic pole, degrees.
const POLE_RA: f64 = 192.85948;

/// J2000 declination of the north galactic pole, degrees.
const POLE_DEC: f64 = 27.12825;

/// Galactic longitude of the north celestial pole, degrees.
const POLE_L: f64 = 122.93192;

/// Wrap an angle in degrees to [0, 360).
fn normalize_deg(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

// ── Equatorial ─────────────────────────────────────────────────────────────

/// An equatorial (ICRS) position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equatorial {
    /// Right ascension, [0, 360).
    pub ra: f64,
    /// Declination, [−90, 90].
    pub dec: f64,
}

impl Equatorial {
    /// Create a position; `ra` is wrapped into [0, 360).
    ///
    /// # Errors
    ///
    /// Returns an error if `dec` is outside [−90, 90].
    pub fn new(ra: f64, dec: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&dec) {
            return Err(VelaError::InvalidInput(
                "Equatorial: dec must be in [-90, 90]".into(),
            ));
        }
        Ok(Self {
            ra: normalize_deg(ra),
            dec,
        })
    }

    /// Rotate into the galactic frame.
    pub fn to_galactic(&self) -> Galactic {
        let ra = self.ra.to_radians();
        let dec = self.dec.to_radians();
        let pole_ra = POLE_RA.to_radians();
        let pole_dec = POLE_DEC.to_radians();

        let d_ra = ra - pole_ra;
        let sin_b = dec.sin() * pole_dec.sin() + dec.cos() * pole_dec.cos() * d_ra.cos();
        let y = dec.cos() * d_ra.sin();
        let x = dec.sin() * pole_dec.cos() - dec.cos() * pole_dec.sin() * d_ra.cos();
        let l = POLE_L.to_radians() - y.atan2(x);

        Galactic {
            l: normalize_deg(l.to_degrees()),
            b: sin_b.asin().to_degrees(),
        }
    }
}

// ── Galactic ───────────────────────────────────────────────────────────────

/// A galactic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Galactic {
    /// Galactic longitude, [0, 360).
    pub l: f64,
    /// Galactic latitude, [−90, 90].
    pub b: f64,
}

impl Galactic {
    /// Create a position; `l` is wrapped into [0, 360).
    ///
    /// # Errors
    ///
    /// Returns an error if `b` is outside [−90, 90].
    pub fn new(l: f64, b: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&b) {
            return Err(VelaError::InvalidInput(
                "Galactic: b must be in [-90, 90]".into(),
            ));
        }
        Ok(Self {
            l: normalize_deg(l),
            b,
        })
    }

    /// Rotate into the equatorial (ICRS) frame.
    pub fn to_equatorial(&self) -> Equatorial {
        let l = self.l.to_radians();
        let b = self.b.to_radians();
        let pole_ra = POLE_RA.to_radians();
        let pole_dec = POLE_DEC.to_radians();

        let d_l = POLE_L.to_radians() - l;
        let sin_dec = b.sin() * pole_dec.sin() + b.cos() * pole_dec.cos() * d_l.cos();
        let y = b.cos() * d_l.sin();
        let x = b.sin() * pole_dec.cos() - b.cos() * pole_dec.sin() * d_l.cos();
        let ra = pole_ra + y.atan2(x);

        Equatorial {
            ra: normalize_deg(ra.to_degrees()),
            dec: sin_dec.asin().to_degrees(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // Precision of the adopted pole constants, in degrees
    const POLE_TOL: f64 = 2e-3;

    #[test]
    fn galactic_center_position() {
        // Sgr A*: RA 266.417, Dec −29.0079 ↔ l 359.944, b −0.0463
        let eq = Equatorial::new(266.417, -29.0079).unwrap();
        let gal = eq.to_galactic();
        assert!((gal.l - 359.94426).abs() < POLE_TOL, "l={}", gal.l);
        assert!((gal.b - (-0.04634)).abs() < POLE_TOL, "b={}", gal.b);
    }

    #[test]
    fn crab_nebula_position() {
        // RA 83.633, Dec 22.0145 ↔ l 184.558, b −5.784
        let eq = Equatorial::new(83.633, 22.0145).unwrap();
        let gal = eq.to_galactic();
        assert!((gal.l - 184.5575).abs() < 0.01, "l={}", gal.l);
        assert!((gal.b - (-5.7844)).abs() < 0.01, "b={}", gal.b);
    }

    #[test]
    fn galactic_pole_maps_to_pole_constants() {
        let gal = Galactic::new(0.0, 90.0).unwrap();
        let eq = gal.to_equatorial();
        assert!((eq.ra - 192.85948).abs() < 1e-6, "ra={}", eq.ra);
        assert!((eq.dec - 27.12825).abs() < 1e-6, "dec={}", eq.dec);
    }

    #[test]
    fn round_trip_is_identity() {
        for &(ra, dec) in &[
            (266.417, -29.0079),
            (0.0, 0.0),
            (83.633, 22.0145),
            (180.0, -45.0),
            (359.9, 89.5),
        ] {
            let eq = Equatorial::new(ra, dec).unwrap();
            let back = eq.to_galactic().to_equatorial();
            assert!((back.ra - eq.ra).abs() < 1e-9, "ra {} -> {}", eq.ra, back.ra);
            assert!(
                (back.dec - eq.dec).abs() < 1e-9,
                "dec {} -> {}",
                eq.dec,
                back.dec,
            );
        }
    }

    #[test]
    fn longitude_is_normalized() {
        let eq = Equatorial::new(-90.0, 10.0).unwrap();
        assert_eq!(eq.ra, 270.0);
        let gal = Galactic::new(370.0, 0.0).unwrap();
        assert_eq!(gal.l, 10.0);
    }

    #[test]
    fn latitude_is_validated() {
        assert!(Equatorial::new(0.0, 91.0).is_err());
        assert!(Equatorial::new(0.0, -91.0).is_err());
        assert!(Galactic::new(0.0, 100.0).is_err());
    }
}
