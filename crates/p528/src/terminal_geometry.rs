use crate::constants::*;
use crate::path_data::TerminalGeometry;
use crate::ray_trace::ray_trace;

/// Compute the effective geometry of one terminal, P.528-4 Annex II Section IV.
///
/// The traced arc distance is converted into an effective height via a
/// flat-Earth parabola for small arc/radius ratios or the exact secant
/// formula otherwise. Two corrections follow: if the effective height
/// overestimates the real height, the horizon distance reverts to the
/// flat-Earth form; if the resulting height correction is not positive, both
/// the angle and the distance are recomputed flat-Earth from the real height.
pub fn terminal_geometry(h_r: f64, consts: &Constants) -> TerminalGeometry {
    let trace = ray_trace(h_r, consts.n_s, consts);
    let d_r = trace.d_r;
    let theta_r = trace.theta_r;

    // Effective height from the arc distance
    let phi = d_r / consts.a_e;
    let h_e = if phi <= 0.1 {
        d_r * d_r / (2.0 * consts.a_e)
    } else {
        consts.a_e / f64::cos(phi) - consts.a_e
    };

    // Account for overestimation
    let (h, mut d) = if h_e <= h_r {
        (h_e, d_r)
    } else {
        (h_r, f64::sqrt(2.0 * consts.a_e * h_r))
    };
    let mut theta = theta_r;

    let delta_h = h_r - h;
    if delta_h <= 0.0 {
        theta = f64::sqrt(2.0 * h_r / consts.a_e);
        d = f64::sqrt(2.0 * h_r * consts.a_e);
    }

    TerminalGeometry { d, theta, h, delta_h }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_terminal_collapses_to_zero() {
        let g = terminal_geometry(0.0, &Constants::default());
        assert_eq!(g.d, 0.0);
        assert_eq!(g.theta, 0.0);
        assert_eq!(g.h, 0.0);
        assert_eq!(g.delta_h, 0.0);
    }

    #[test]
    fn arc_distance_is_monotone_in_height() {
        let consts = Constants::default();
        let mut prev = -1.0;
        for i in 0..=500 {
            let h = i as f64 * 0.01;
            let g = terminal_geometry(h, &consts);
            assert!(
                g.d >= prev - 1e-9,
                "horizon distance decreased at h = {h}: {} < {prev}",
                g.d
            );
            prev = g.d;
        }
    }

    #[test]
    fn effective_height_never_exceeds_real_height() {
        let consts = Constants::default();
        for h in [0.002, 0.05, 0.36, 0.50, 2.0, 10.0, 30.0] {
            let g = terminal_geometry(h, &consts);
            assert!(g.h <= h + 1e-12);
            assert!(g.delta_h >= 0.0);
            assert!(g.d > 0.0);
            assert!(g.theta > 0.0);
        }
    }
}
