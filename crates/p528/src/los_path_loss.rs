use crate::constants::*;
use crate::ground_reflection::ground_reflection;
use crate::path_data::{PathState, RayOpticsSample};

/// Line-of-sight loss (dB, gain convention) at grazing angle `psi`,
/// P.528-4 Annex II Section VIII.
///
/// `d_eval` is the ground distance the loss is evaluated at. Beyond the
/// diffraction-onset distance the loss is the linear blend between the
/// `A_d0`/`A_dML` anchors; otherwise it is the two-ray interference loss,
/// which also records the effective reflection coefficient `R_Tg` on the
/// path state for the variability stage.
pub fn los_path_loss(
    psi: f64,
    psi_limit: f64,
    optics: &RayOpticsSample,
    state: &mut PathState,
    d_eval: f64,
    f: f64,
    consts: &Constants,
) -> f64 {
    // Diffraction-dominated blend region
    if d_eval > state.d_0 {
        return ((d_eval - state.d_0) * (state.a_dml - state.a_d0) / (state.d_ml - state.d_0))
            + state.a_d0;
    }

    // Below psi_limit the path difference is under a half wavelength and the
    // specular reflection no longer produces an interference pattern.
    if psi < psi_limit {
        return 0.0;
    }

    let lambda = VOF_L_KM / f;

    let gr = ground_reflection(psi, f, consts);

    // Divergence factor for the curvature of the reflecting surface
    let r_1 = optics.d1 / f64::cos(psi);
    let r_2 = optics.d2 / f64::cos(psi);
    let r_r = (r_1 * r_2) / optics.r_12;

    let s = f64::sin(psi);
    let d_v = 1.0
        / f64::sqrt(
            1.0 + (2.0 * r_r * (1.0 + s * s)) / (optics.a_a * s)
                + f64::powi(2.0 * r_r / optics.a_a, 2),
        );

    // Ray length factor
    let f_r = f64::min(optics.r_0 / optics.r_12, 1.0);

    state.r_tg = gr.r_g * d_v * f_r;

    // Two-ray interference: path difference in wavelengths plus the
    // reflection phase
    let phi_tg = (2.0 * PI * optics.delta_r / lambda) + gr.phi_g;
    let r = state.r_tg * f64::cos(phi_tg) - state.r_tg * f64::sin(phi_tg);

    let w_rl = f64::min(f64::abs(1.0 + r), 1.0);
    // The 1e-4 floor keeps destructive-interference nulls off -infinity.
    let w_r0 = w_rl * w_rl + 0.0001;

    10.0 * f64::log10(w_r0)
}
