use crate::error::{P528Error, P528Result};

/// Validated input for one path computation
#[derive(Debug, Clone, Copy)]
pub struct PathRequest {
    pub h_r1: f64, // real height of the low terminal (km)
    pub h_r2: f64, // real height of the high terminal (km)
    pub f: f64,    // frequency (MHz)
    pub q: f64,    // time percentage (0.0 - 1.0, exclusive)
    pub d: f64,    // path distance (km)
}

impl PathRequest {
    /// Build a request, normalizing terminal order and rejecting inputs the
    /// method is not defined for.
    pub fn new(h_r1: f64, h_r2: f64, f: f64, q: f64, d: f64) -> P528Result<Self> {
        if !h_r1.is_finite() || !h_r2.is_finite() || h_r1 < 0.0 || h_r2 < 0.0 {
            return Err(P528Error::InvalidInput(format!(
                "terminal heights must be finite and >= 0 km (got {h_r1}, {h_r2})"
            )));
        }
        if !f.is_finite() || f <= 0.0 {
            return Err(P528Error::InvalidInput(format!(
                "frequency must be > 0 MHz (got {f})"
            )));
        }
        if !q.is_finite() || q <= 0.0 || q >= 1.0 {
            return Err(P528Error::InvalidInput(format!(
                "time percentage must lie in (0, 1) (got {q})"
            )));
        }
        if !d.is_finite() || d < 0.0 {
            return Err(P528Error::InvalidInput(format!(
                "path distance must be >= 0 km (got {d})"
            )));
        }

        // The method assumes terminal 1 is the lower one; it is symmetric in
        // the terminals, so swap rather than reject.
        let (h_r1, h_r2) = if h_r1 <= h_r2 { (h_r1, h_r2) } else { (h_r2, h_r1) };

        Ok(PathRequest { h_r1, h_r2, f, q, d })
    }
}

/// Per-terminal effective geometry from P.528-4 Annex II Section IV
#[derive(Debug, Clone, Copy)]
pub struct TerminalGeometry {
    pub d: f64,       // arc distance to the smooth Earth horizon (km)
    pub theta: f64,   // incidence angle of the grazing ray at the terminal (rad)
    pub h: f64,       // effective (adjusted) terminal height (km)
    pub delta_h: f64, // terminal height correction (km)
}

/// Request-scoped accumulator threaded through the pipeline stages.
///
/// Owned by a single computation and never shared across requests; each
/// prediction allocates its own copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathState {
    pub d_ml: f64,  // maximum line-of-sight distance (km)
    pub d_d: f64,   // distance predicted to have zero diffraction loss (km)
    pub d_0: f64,   // distance at which diffraction begins to affect the ray (km)
    pub a_d0: f64,  // diffraction-region loss anchor at d_0 (dB)
    pub a_dml: f64, // smooth Earth diffraction loss at d_ML (dB)
    pub r_tg: f64,  // effective ground-reflection coefficient
    pub a_y: f64,   // conditional variability adjustment (dB)
}

/// Ray geometry evaluated at one grazing angle (Annex II Section VII)
#[derive(Debug, Clone, Copy)]
pub struct RayOpticsSample {
    pub a_a: f64,      // effective Earth radius at this ray angle (km)
    pub d1: f64,       // horizontal distance below terminal 1 (km)
    pub d2: f64,       // horizontal distance below terminal 2 (km)
    pub r_0: f64,      // direct ray length (km)
    pub r_12: f64,     // total reflected ray length (km)
    pub delta_r: f64,  // direct/reflected path length difference (km)
    pub d: f64,        // resulting ground distance (km)
    pub theta_h1: f64, // ray incidence angle relative to the horizontal at terminal 1 (rad)
    pub theta_h2: f64, // ray incidence angle relative to the horizontal at terminal 2 (rad)
    pub z_1: f64,      // ray-adjusted radius of terminal 1 (km)
    pub z_2: f64,      // ray-adjusted radius of terminal 2 (km)
}

/// Predicted loss, positive dB, split into the Annex II components
#[derive(Debug, Clone, Copy)]
pub struct AttenuationResult {
    pub total: f64,         // total predicted loss (dB)
    pub free_space: f64,    // free space loss (dB)
    pub absorption: f64,    // oxygen and water vapor absorption loss (dB)
    pub line_of_sight: f64, // two-ray interference / diffraction-blend loss (dB)
    pub variability: f64,   // long-term and multipath variability loss (dB)
    pub converged: bool,    // distance-matching search met its tolerance
}
