use crate::constants::*;
use crate::path_data::{PathRequest, RayOpticsSample, TerminalGeometry};

// Above this grazing angle (rad) the tangent correction to the terminal
// heights is dropped, P.528-4 Annex II Section VII.
const PSI_TANGENT_LIMIT: f64 = 1.56;

/// Evaluate the ray geometry for a hypothetical ray leaving both terminals
/// at grazing angle `psi`, P.528-4 Annex II Section VII.
///
/// This is the inner kernel of the line-of-sight method: it is called once
/// per table sample and once per iteration of the distance-matching search,
/// and is a pure function of its inputs.
pub fn ray_optics(
    psi: f64,
    path: &PathRequest,
    lt: &TerminalGeometry,
    ht: &TerminalGeometry,
    consts: &Constants,
) -> RayOpticsSample {
    // Effective Earth radius for a ray at this angle, eqn (62)
    let z = consts.a_0 / consts.a_e - 1.0;
    let k_a = 1.0 / (1.0 + z * f64::cos(psi));
    let a_a = consts.a_0 * k_a;

    // Terminal height corrections re-scaled to this radius
    let delta_h_a1 = lt.delta_h * (a_a - consts.a_0) / (consts.a_e - consts.a_0);
    let delta_h_a2 = ht.delta_h * (a_a - consts.a_0) / (consts.a_e - consts.a_0);

    let h_1 = path.h_r1 - delta_h_a1;
    let h_2 = path.h_r2 - delta_h_a2;

    let z_1 = a_a + h_1;
    let z_2 = a_a + h_2;

    let theta_1 = f64::acos(clamp_unit(a_a * f64::cos(psi) / z_1)) - psi;
    let theta_2 = f64::acos(clamp_unit(a_a * f64::cos(psi) / z_2)) - psi;

    let d1 = z_1 * f64::sin(theta_1);
    let d2 = z_2 * f64::sin(theta_2);

    // Tangent correction of the heights at low grazing angles
    let (h_prime_1, h_prime_2) = if psi > PSI_TANGENT_LIMIT {
        (h_1, h_2)
    } else {
        (d1 * f64::tan(psi), d2 * f64::tan(psi))
    };

    let d = f64::max(a_a * (theta_1 + theta_2), 0.0);

    // Ray lengths of the direct and reflected paths. At psi = pi/2 both
    // horizontal distances vanish and the direct ray is purely vertical.
    let (alpha, r_0) = if d1 + d2 > 0.0 {
        let alpha = f64::atan((h_prime_2 - h_prime_1) / (d1 + d2));
        (alpha, (d1 + d2) / f64::cos(alpha))
    } else {
        (0.0, f64::abs(h_2 - h_1))
    };
    let r_12 = (d1 + d2) / f64::cos(psi);

    let delta_r = if r_0 + r_12 > 0.0 {
        4.0 * h_prime_1 * h_prime_2 / (r_0 + r_12)
    } else {
        2.0 * h_prime_1
    };

    RayOpticsSample {
        a_a,
        d1,
        d2,
        r_0,
        r_12,
        delta_r,
        d,
        theta_h1: alpha - theta_1,
        theta_h2: -(alpha + theta_2),
        z_1,
        z_2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_geometry::terminal_geometry;

    fn setup() -> (PathRequest, TerminalGeometry, TerminalGeometry, Constants) {
        let consts = Constants::default();
        let path = PathRequest::new(0.36, 0.50, 5000.0, 0.99, 60.0).unwrap();
        let lt = terminal_geometry(path.h_r1, &consts);
        let ht = terminal_geometry(path.h_r2, &consts);
        (path, lt, ht, consts)
    }

    #[test]
    fn distance_decreases_as_grazing_angle_grows() {
        let (path, lt, ht, consts) = setup();
        let mut prev = f64::INFINITY;
        for i in 1..=80 {
            let psi = i as f64 * 0.015;
            let o = ray_optics(psi, &path, &lt, &ht, &consts);
            assert!(o.d <= prev + 1e-9, "d grew at psi = {psi}");
            assert!(o.d >= 0.0);
            prev = o.d;
        }
    }

    #[test]
    fn path_length_difference_grows_with_grazing_angle() {
        let (path, lt, ht, consts) = setup();
        let near = ray_optics(0.001, &path, &lt, &ht, &consts);
        let steep = ray_optics(0.8, &path, &lt, &ht, &consts);
        assert!(steep.delta_r > near.delta_r);
        assert!(near.delta_r >= 0.0);
    }

    #[test]
    fn near_vertical_sample_stays_finite() {
        let (path, lt, ht, consts) = setup();
        for psi in [1.55, 1.5607, PI / 2.0] {
            let o = ray_optics(psi, &path, &lt, &ht, &consts);
            assert!(o.d.is_finite());
            assert!(o.delta_r.is_finite());
            assert!(o.r_0.is_finite() && o.r_12.is_finite());
        }
    }

    #[test]
    fn sample_is_deterministic() {
        let (path, lt, ht, consts) = setup();
        let a = ray_optics(0.3, &path, &lt, &ht, &consts);
        let b = ray_optics(0.3, &path, &lt, &ht, &consts);
        assert_eq!(a.d, b.d);
        assert_eq!(a.delta_r, b.delta_r);
    }
}
