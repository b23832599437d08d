use crate::constants::*;

/// Output of the atmospheric ray trace from P.528-4 Annex II Section V
#[derive(Debug, Clone, Copy)]
pub struct RayTraceData {
    pub d_r: f64,     // arc distance to the smooth Earth horizon (km)
    pub theta_r: f64, // incidence angle of the grazing ray at the terminal (rad)
}

// Heights of the atmospheric layer boundaries (km)
const ATMOS_LAYERS: [f64; 25] = [
    0.0, 0.01, 0.02, 0.05, 0.10, 0.20, 0.305, 0.50, 0.70, 1.00, 1.524, 2.00, 3.048, 5.00, 7.00,
    10.00, 20.00, 30.48, 50.00, 70.00, 90.00, 110.00, 225.00, 350.00, 475.00,
];

/// Ray trace to the smooth Earth horizon for a terminal at height `h_r` (km).
///
/// Integrates through the exponential refractivity profile layer by layer,
/// applying Snell's law in spherical-shell form at each boundary and
/// accumulating the ray bending from the log-log linearization of the
/// refractive-index gradient. `n_s` is the surface refractivity (N-Units).
pub fn ray_trace(h_r: f64, n_s: f64, consts: &Constants) -> RayTraceData {
    // A terminal on the surface has no horizon geometry to trace.
    if h_r <= 0.0 {
        return RayTraceData { d_r: 0.0, theta_r: 0.0 };
    }

    // Scale factor of the refractivity profile, P.528-4 eqns (13)-(14)
    let delta_n = -7.32 * f64::exp(0.005577 * n_s);
    let c_e = f64::log10(n_s / (n_s + delta_n));

    let refractive_index = |h: f64| 1.0 + n_s * f64::exp(-c_e * h) * 1e-6;

    let mut theta = 0.0;
    let mut tau_sum = 0.0; // accumulated atmospheric bending (rad)

    let mut r_low = consts.a_0 + ATMOS_LAYERS[0];
    let mut n_low = refractive_index(ATMOS_LAYERS[0]);

    let mut i = 0;
    while ATMOS_LAYERS[i] < h_r && i < ATMOS_LAYERS.len() - 1 {
        let (r_high, n_high) = if ATMOS_LAYERS[i + 1] > h_r {
            // The terminal lies inside this layer; cut the boundary to h_r.
            (consts.a_0 + h_r, refractive_index(h_r))
        } else {
            (consts.a_0 + ATMOS_LAYERS[i + 1], refractive_index(ATMOS_LAYERS[i + 1]))
        };

        let theta_high =
            f64::acos(clamp_unit((r_low * n_low) / (r_high * n_high) * f64::cos(theta)));

        // A terminal sitting essentially on a boundary produces a zero-length
        // layer whose log-ratio bending term would divide by zero; the
        // sliver's bending contribution is zero.
        if r_high - r_low > 1e-12 {
            let a = f64::log10(n_high / n_low) / f64::log10(r_high / r_low);
            tau_sum += (theta_high - theta) * (-a / (a + 1.0));
        }

        theta = theta_high;
        r_low = r_high;
        n_low = n_high;
        i += 1;
    }

    // Above the top tabulated layer the refractivity is taken as constant and
    // the ray gets one final Snell step.
    let top = ATMOS_LAYERS[ATMOS_LAYERS.len() - 1];
    if h_r > top {
        theta = f64::acos(clamp_unit(
            (consts.a_0 + top) * n_low / (consts.a_0 + h_r) * f64::cos(theta),
        ));
    }

    RayTraceData {
        d_r: (theta + tau_sum) * consts.a_0,
        theta_r: theta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_is_exactly_zero() {
        let consts = Constants::default();
        let trace = ray_trace(0.0, consts.n_s, &consts);
        assert_eq!(trace.d_r, 0.0);
        assert_eq!(trace.theta_r, 0.0);
    }

    #[test]
    fn horizon_distance_grows_with_height() {
        let consts = Constants::default();
        let mut prev = 0.0;
        for h in [0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 100.0, 400.0, 600.0] {
            let trace = ray_trace(h, consts.n_s, &consts);
            assert!(trace.d_r > prev, "d_r not increasing at h = {h}");
            assert!(trace.theta_r > 0.0);
            prev = trace.d_r;
        }
    }

    #[test]
    fn horizon_distance_is_near_the_effective_earth_estimate() {
        // For low terminals the traced arc should sit close to the
        // sqrt(2 a_e h) flat-Earth horizon estimate.
        let consts = Constants::default();
        let trace = ray_trace(0.36, consts.n_s, &consts);
        let flat = f64::sqrt(2.0 * consts.a_e * 0.36);
        assert!((trace.d_r - flat).abs() / flat < 0.15, "d_r = {}", trace.d_r);
    }

    #[test]
    fn boundary_height_does_not_divide_by_zero() {
        let consts = Constants::default();
        for h in [0.01, 0.305, 0.50, 475.0, 475.0 + 1e-13] {
            let trace = ray_trace(h, consts.n_s, &consts);
            assert!(trace.d_r.is_finite() && trace.theta_r.is_finite());
        }
    }

    #[test]
    fn terminal_above_atmosphere_gets_the_constant_refractivity_step() {
        let consts = Constants::default();
        let below = ray_trace(474.0, consts.n_s, &consts);
        let above = ray_trace(600.0, consts.n_s, &consts);
        assert!(above.d_r > below.d_r);
        assert!(above.theta_r > below.theta_r);
    }
}
