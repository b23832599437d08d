use crate::constants::*;
use crate::path_data::{PathRequest, PathState, TerminalGeometry};
use crate::ray_trace::ray_trace;

// Table 4: scale factor c_q of the 10% deviation for q < 0.10
const TABLE_4: [(f64, f64); 4] = [(0.01, 1.9507), (0.02, 1.7166), (0.05, 1.3265), (0.10, 1.0000)];

// Table 5: correction ordinate c_Y(q) (dB) for q < 0.10
const TABLE_5: [(f64, f64); 4] = [(0.01, -5.00), (0.02, -4.50), (0.05, -3.70), (0.10, 0.00)];

/// Linear interpolation through a small (abscissa, ordinate) table, clamped
/// to the end ordinates outside the tabulated range.
fn interpolate_rows(table: &[(f64, f64)], x: f64) -> f64 {
    if x < table[0].0 {
        return table[0].1;
    }
    let mut i = 1;
    while x > table[i].0 && i < table.len() - 1 {
        i += 1;
    }
    if x == table[i].0 {
        return table[i].1;
    }
    if x < table[i].0 {
        return ((table[i].1 - table[i - 1].1) * (x - table[i - 1].0))
            / (table[i].0 - table[i - 1].0)
            + table[i - 1].1;
    }
    table[table.len() - 1].1
}

/// Inverse complementary cumulative normal, the rational-polynomial
/// approximation of P.528-4 Annex II Section X. Defined on (0, 0.5] and
/// extended above 0.5 by symmetry.
fn inverse_complementary_cumulative_normal(q: f64) -> f64 {
    const C_0: f64 = 2.515516;
    const C_1: f64 = 0.802853;
    const C_2: f64 = 0.010328;
    const D_1: f64 = 1.432788;
    const D_2: f64 = 0.189269;
    const D_3: f64 = 0.001308;

    let x = if q > 0.5 { 1.0 - q } else { q };

    let t_x = f64::sqrt(-2.0 * f64::ln(x));
    let zeta_x = ((C_2 * t_x + C_1) * t_x + C_0) / (((D_3 * t_x + D_2) * t_x + D_1) * t_x + 1.0);
    let q_q = t_x - zeta_x;

    if q > 0.5 {
        -q_q
    } else {
        q_q
    }
}

/// Long-term (climatic) power-fading variability at time fraction `q`,
/// P.528-4 Annex II Section X.
///
/// `f_theta_h` is the elevation-angle weighting from the variability stage
/// and `a_t` the line-of-sight loss the variability rides on. Updates the
/// conditional adjustment `A_Y` on the path state.
pub fn long_term_variability(
    lt: &TerminalGeometry,
    ht: &TerminalGeometry,
    path: &PathRequest,
    state: &mut PathState,
    q: f64,
    f_theta_h: f64,
    a_t: f64,
    consts: &Constants,
) -> f64 {
    // Smooth Earth horizons of the effective heights, re-traced with the
    // variability surface refractivity
    let d_lq_1 = ray_trace(lt.h, N_S_VARIABILITY, consts).d_r;
    let d_lq_2 = ray_trace(ht.h, N_S_VARIABILITY, consts).d_r;

    // Effective distance between the terminals
    let d_qs = 60.0 * f64::cbrt(100.0 / path.f);
    let d_lq = d_lq_1 + d_lq_2;
    let d_q = d_lq + d_qs;
    let d_e = if path.d <= d_q {
        (130.0 * path.d) / d_q
    } else {
        130.0 + path.d - d_q
    };

    // Frequency-dependent scale factors of the decile deviations
    let (g_01, g_09) = if path.f <= 1600.0 {
        (
            0.21 * f64::sin(5.22 * f64::log10(path.f / 200.0)) + 1.28,
            0.18 * f64::sin(5.22 * f64::log10(path.f / 200.0)) + 1.23,
        )
    } else {
        (1.05, 1.05)
    };

    // Fitted exponential-decay curves for the median and the 10%/90%
    // deviations as functions of effective distance
    let f_2v = 3.9 * f64::exp(-1.56e-11 * f64::powf(d_e, 4.08));
    let f_2y1 = 5.4 + (10.0 - 5.4) * f64::exp(-1.57e-6 * f64::powf(d_e, 2.31));
    let f_2y9 = 3.2 + (8.2 - 3.2) * f64::exp(-3.75e-8 * f64::powf(d_e, 2.88));

    let v = (1.59e-5 * f64::powf(d_e, 2.32) - f_2v) * f64::exp(-2.77e-8 * f64::powf(d_e, 3.25)) + f_2v;
    let y_1 = (5.24e-4 * f64::powf(d_e, 1.97) - f_2y1) * f64::exp(-4.70e-7 * f64::powf(d_e, 2.90)) + f_2y1;
    let y_9 = (2.93e-4 * f64::powf(d_e, 2.00) - f_2y9) * f64::exp(-1.02e-7 * f64::powf(d_e, 3.15)) + f_2y9;

    // Variability associated with long-term power fading at q
    let y_q = if q == 0.50 {
        v
    } else if q > 0.50 {
        let z_09 = inverse_complementary_cumulative_normal(0.9);
        let z_q = inverse_complementary_cumulative_normal(q);
        let c_q = z_q / z_09;
        c_q * (-y_9 * g_09) + v
    } else if q >= 0.10 {
        let z_01 = inverse_complementary_cumulative_normal(0.1);
        let z_q = inverse_complementary_cumulative_normal(q);
        let c_q = z_q / z_01;
        c_q * (y_1 * g_01) + v
    } else {
        // Corrected tail behavior below the 10% point
        let c_q = interpolate_rows(&TABLE_4, q);
        c_q * (y_1 * g_01) + v
    };

    // Long-term power fading at q = 0.10
    let y_01 = (y_1 * g_01) + v;

    let y_el_q = f_theta_h * y_q;
    let y_el_01 = f_theta_h * y_01;

    let a_yi = y_el_01 - a_t - 3.0;
    state.a_y = f64::max(a_yi, 0.0);

    if q >= 0.10 {
        return y_el_q - state.a_y;
    }

    // Corrections for q < 0.10
    let y_temp = y_el_q - state.a_y - a_t;
    let c_yq = interpolate_rows(&TABLE_5, q);

    if y_temp > -c_yq {
        -c_yq + a_t
    } else {
        y_temp + a_t
    }
}
