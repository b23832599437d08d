//! Line-of-sight propagation loss prediction per Rec. ITU-R P.528-4 Annex II.
//!
//! The engine predicts the loss between two terminals above a smooth,
//! refractive Earth as a function of frequency, terminal heights, path
//! distance and time availability. Transhorizon paths are out of scope and
//! reported as an explicit unsupported regime.

pub mod absorption;
pub mod constants;
pub mod effective_ray_length;
pub mod error;
pub mod ground_reflection;
pub mod line_of_sight;
pub mod long_term_variability;
pub mod los_path_loss;
pub mod nakagami_rice;
pub mod path_data;
pub mod ray_optics;
pub mod ray_trace;
pub mod smooth_earth_diffraction;
pub mod sweep;
pub mod terminal_geometry;
pub mod variability_loss;

pub use constants::Constants;
pub use error::{P528Error, P528Result};
pub use path_data::{AttenuationResult, PathRequest};

use path_data::PathState;
use smooth_earth_diffraction::smooth_earth_diffraction;
use terminal_geometry::terminal_geometry;

/// Predict the line-of-sight propagation loss with the default physical
/// constants.
///
/// # Parameters
/// - `f_ghz`: frequency (GHz)
/// - `h_r1_km`: height of the low terminal above ground (km)
/// - `h_r2_km`: height of the high terminal above ground (km)
/// - `q`: time availability, 0 < q < 1
/// - `d_km`: great circle path distance (km)
///
/// # Returns
/// The predicted loss split into its components, or the typed failure for
/// invalid, transhorizon, or degenerate requests.
pub fn compute_line_of_sight_loss(
    f_ghz: f64,
    h_r1_km: f64,
    h_r2_km: f64,
    q: f64,
    d_km: f64,
) -> P528Result<AttenuationResult> {
    compute_line_of_sight_loss_with(f_ghz, h_r1_km, h_r2_km, q, d_km, &Constants::default())
}

/// Predict the line-of-sight propagation loss against an explicit constant
/// set, P.528-4 Annex II Section III.
pub fn compute_line_of_sight_loss_with(
    f_ghz: f64,
    h_r1_km: f64,
    h_r2_km: f64,
    q: f64,
    d_km: f64,
    consts: &Constants,
) -> P528Result<AttenuationResult> {
    // MHz internally, per the recommendation's unit conventions
    let path = PathRequest::new(h_r1_km, h_r2_km, f_ghz * 1000.0, q, d_km)?;

    // Geometric properties of each terminal
    let lt = terminal_geometry(path.h_r1, consts);
    let ht = terminal_geometry(path.h_r2, consts);

    // A terminal without a horizon (height zero) degenerates the diffraction
    // anchors and the grazing-angle table through log10(0).
    if lt.d <= 0.0 || ht.d <= 0.0 {
        return Err(P528Error::DegenerateGeometry(
            "a terminal at height zero has no smooth Earth horizon".into(),
        ));
    }

    let mut state = PathState {
        d_ml: lt.d + ht.d,
        ..PathState::default()
    };

    // Regime selection happens once per request; the transhorizon modes are
    // explicitly unsupported rather than extrapolated.
    if path.d >= state.d_ml {
        return Err(P528Error::UnsupportedRegime {
            distance_km: path.d,
            d_ml_km: state.d_ml,
        });
    }

    // Anchor the diffraction-region loss line from two smooth Earth
    // diffraction evaluations beyond the horizon (gain convention, negated).
    let c = f64::cbrt(consts.a_e * consts.a_e / path.f);
    let d_3 = state.d_ml + 0.5 * c;
    let d_4 = state.d_ml + 1.5 * c;

    let a_d3 = -smooth_earth_diffraction(&lt, &ht, path.f, d_3);
    let a_d4 = -smooth_earth_diffraction(&lt, &ht, path.f, d_4);

    let m_d = (a_d4 - a_d3) / (d_4 - d_3);
    if !m_d.is_finite() || m_d == 0.0 {
        return Err(P528Error::DegenerateGeometry(
            "diffraction anchor slope degenerated".into(),
        ));
    }

    state.a_d0 = a_d4 - m_d * d_4;
    state.a_dml = m_d * state.d_ml + state.a_d0;
    state.d_d = -(state.a_d0 / m_d);

    line_of_sight::compute(&path, &lt, &ht, &mut state, consts)
}
