/// Constants for P528 calculations

pub const PI: f64 = 3.14159265358979323846;
pub const D2R: f64 = 0.0174532925; // PI/180

// Speed of light (km/s) scaled so that lambda (km) = VOF_L_KM / f (MHz)
pub const VOF_L_KM: f64 = 0.2997925;

/// Read-only physical configuration for one process.
///
/// Fixed at construction and passed by reference into every stage, so
/// concurrent computations share nothing mutable.
#[derive(Debug, Clone, Copy)]
pub struct Constants {
    pub n_s: f64,            // surface refractivity (N-Units)
    pub a_0: f64,            // actual Earth radius (km)
    pub a_e: f64,            // effective Earth radius (km)
    pub t_eo: f64,           // effective thickness of the oxygen absorbing layer (km)
    pub t_ow: f64,           // effective thickness of the water vapor absorbing layer (km)
    pub epsilon_r: f64,      // relative dielectric constant of average ground
    pub sigma: f64,          // ground conductivity (S/m)
    pub los_iterations: u32, // iteration cap for the distance-matching search
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            n_s: 301.0,
            a_0: 6370.0,
            a_e: 8493.0,
            t_eo: 3.25,
            t_ow: 1.36,
            epsilon_r: 15.0,
            sigma: 0.005,
            los_iterations: 25,
        }
    }
}

// Surface refractivity used when re-tracing the terminal horizons for the
// long-term variability calculation. P.528-4 Annex II Section X.
pub const N_S_VARIABILITY: f64 = 329.0;

// Distance tolerance (km) of the grazing-angle search and the step used to
// walk the diffraction-onset distance forward.
pub const D_TOLERANCE: f64 = 0.001;

/// Clamps an inverse-trig argument into [-1, 1].
///
/// Floating point accumulation can push cosines marginally outside the
/// domain; every acos/asin in the method goes through this.
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    x.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_unit_restores_domain() {
        assert_eq!(clamp_unit(1.0 + 1e-14), 1.0);
        assert_eq!(clamp_unit(-1.0 - 1e-14), -1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
