use crate::constants::*;
use crate::path_data::RayOpticsSample;

/// Portion of the ray's geometric path lying within an absorbing layer of
/// effective thickness `t_e` km above an Earth of radius `a` km,
/// P.528-4 Annex II Section XII.
///
/// Three regimes: the whole path sits below the layer top; the layer top is
/// below the lower terminal (the ray chord may graze or miss the layer
/// entirely); and the general case solved with the law of sines.
pub fn effective_ray_length(a: f64, t_e: f64, optics: &RayOpticsSample) -> f64 {
    // Angle at terminal 1 between the ray and the radial through it
    let alpha = PI / 2.0 + optics.theta_h1;
    let z_t = a + t_e;

    if optics.z_2 <= z_t {
        return optics.r_0;
    }

    if z_t <= optics.z_1 {
        let z_c = optics.z_1 * f64::sin(alpha);
        if z_t <= z_c {
            // The ray's closest approach stays above the layer.
            return 0.0;
        }
        return 2.0 * z_t * f64::sin(f64::acos(clamp_unit(z_c / z_t)));
    }

    let a_q = f64::asin(clamp_unit(optics.z_1 * f64::sin(alpha) / z_t));
    let a_e = PI - alpha - a_q;

    if f64::abs(a_e) < 1e-12 || f64::abs(f64::sin(a_q)) < 1e-12 {
        return z_t - optics.z_1;
    }
    optics.z_1 * f64::sin(a_e) / f64::sin(a_q)
}
