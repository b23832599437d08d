use crate::constants::*;
use crate::long_term_variability::long_term_variability;
use crate::nakagami_rice::{k_factor_from_y_99, nakagami_rice};
use crate::path_data::{PathRequest, PathState, RayOpticsSample, TerminalGeometry};

/// Total variability contribution (dB, gain convention) at the requested
/// time fraction, P.528-4 Annex II Section XIII.
///
/// Combines the climatic long-term fading with the tropospheric-multipath
/// short-term fading as independent deviations about the long-term median:
/// Y_total = Y_e(0.5) -/+ sqrt((Y_e(q) - Y_e(0.5))^2 + Y_pi^2). At q = 0.5
/// both deviation terms vanish and the median long-term value is returned
/// unchanged.
pub fn variability_loss(
    a_t: f64,
    lt: &TerminalGeometry,
    ht: &TerminalGeometry,
    path: &PathRequest,
    state: &mut PathState,
    optics: &RayOpticsSample,
    r_ew: f64,
    consts: &Constants,
) -> f64 {
    // Elevation-angle weighting from the ray's horizon angle at terminal 1
    let f_theta_h = if optics.theta_h1 <= 0.0 {
        1.0
    } else if optics.theta_h1 >= 1.0 {
        0.0
    } else {
        f64::max(
            0.5 - 0.3183 * f64::atan(20.0 * f64::log10(32.0 * optics.theta_h1)),
            0.0,
        )
    };

    // Long-term variability at the requested fraction and at the median
    let y_e_q = long_term_variability(lt, ht, path, state, path.q, f_theta_h, a_t, consts);
    let y_e_05 = long_term_variability(lt, ht, path, state, 0.5, f_theta_h, a_t, consts);

    let lambda = VOF_L_KM / path.f;

    // Coupling of the specular reflection into the multipath term
    let f_a_y = if state.a_y <= 0.0 {
        1.0
    } else if state.a_y >= 9.0 {
        0.1
    } else {
        (1.1 + 0.9 * f64::cos(PI * state.a_y / 9.0)) / 2.0
    };

    let f_delta_r = if optics.delta_r >= lambda / 2.0 {
        1.0
    } else if optics.delta_r <= lambda / 6.0 {
        0.1
    } else {
        0.5 * (1.1 - 0.9 * f64::cos((3.0 * PI / lambda) * (optics.delta_r - lambda / 6.0)))
    };

    let r_s = state.r_tg * f_delta_r * f_a_y;

    // Scattered power from the Y_pi(0.99) statistic of the water vapor ray
    let w_a = if r_ew <= 0.0 {
        0.0001
    } else {
        let y_pi_99 = 10.0 * f64::log10(path.f * f64::powi(r_ew, 3)) - 84.26;
        let k = k_factor_from_y_99(y_pi_99);
        f64::powf(10.0, 0.1 * k)
    };

    let w_r = r_s * r_s + 0.01 * 0.01;
    let w = w_r + w_a;

    let k_los = if w <= 0.0 {
        -40.0
    } else {
        f64::max(10.0 * f64::log10(w), -40.0)
    };

    // Short-term (tropospheric multipath) deviation
    let y_pi = nakagami_rice(k_los, path.q);

    // Independent-deviation combination about the long-term median
    let y_total_05 = y_e_05;
    let y = f64::sqrt(f64::powi(y_e_q - y_e_05, 2) + y_pi * y_pi);

    if path.q < 0.50 {
        y_total_05 + y
    } else {
        y_total_05 - y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray_optics::ray_optics;
    use crate::terminal_geometry::terminal_geometry;
    use approx::assert_abs_diff_eq;

    fn setup(q: f64) -> (PathRequest, TerminalGeometry, TerminalGeometry, RayOpticsSample, Constants) {
        let consts = Constants::default();
        let path = PathRequest::new(0.36, 0.50, 5000.0, q, 60.0).unwrap();
        let lt = terminal_geometry(path.h_r1, &consts);
        let ht = terminal_geometry(path.h_r2, &consts);
        let optics = ray_optics(0.01, &path, &lt, &ht, &consts);
        (path, lt, ht, optics, consts)
    }

    #[test]
    fn median_request_reduces_to_the_long_term_median() {
        let (path, lt, ht, optics, consts) = setup(0.5);
        let mut state = PathState::default();
        state.r_tg = 0.5;
        let y_total = variability_loss(0.0, &lt, &ht, &path, &mut state, &optics, 5.0, &consts);

        let mut check = PathState::default();
        let f_theta_h = if optics.theta_h1 <= 0.0 {
            1.0
        } else {
            f64::max(
                0.5 - 0.3183 * f64::atan(20.0 * f64::log10(32.0 * optics.theta_h1)),
                0.0,
            )
        };
        let y_e_05 = long_term_variability(&lt, &ht, &path, &mut check, 0.5, f_theta_h, 0.0, &consts);
        assert_abs_diff_eq!(y_total, y_e_05, epsilon = 1e-12);
    }

    #[test]
    fn variability_brackets_the_median_symmetrically_in_sign() {
        let (_, lt, ht, optics, consts) = setup(0.5);
        let mut state = PathState::default();
        let path_hi = PathRequest::new(0.36, 0.50, 5000.0, 0.99, 60.0).unwrap();
        let path_lo = PathRequest::new(0.36, 0.50, 5000.0, 0.01, 60.0).unwrap();
        let path_med = PathRequest::new(0.36, 0.50, 5000.0, 0.5, 60.0).unwrap();

        let y_hi = variability_loss(0.0, &lt, &ht, &path_hi, &mut state, &optics, 5.0, &consts);
        let y_lo = variability_loss(0.0, &lt, &ht, &path_lo, &mut state, &optics, 5.0, &consts);
        let y_med = variability_loss(0.0, &lt, &ht, &path_med, &mut state, &optics, 5.0, &consts);

        assert!(y_hi < y_med, "high availability must fade deeper");
        assert!(y_lo > y_med, "low availability must sit above the median");
    }

    #[test]
    fn zero_water_vapor_ray_still_produces_finite_variability() {
        let (path, lt, ht, optics, consts) = setup(0.99);
        let mut state = PathState::default();
        let y = variability_loss(0.0, &lt, &ht, &path, &mut state, &optics, 0.0, &consts);
        assert!(y.is_finite());
    }
}
