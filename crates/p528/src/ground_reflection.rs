use crate::constants::*;

/// Complex Fresnel reflection coefficient in magnitude/phase form,
/// P.528-4 Annex II Section IX
#[derive(Debug, Clone, Copy)]
pub struct GroundReflectionData {
    pub r_g: f64,   // magnitude of the reflection coefficient
    pub phi_g: f64, // phase of the reflection coefficient (rad)
}

/// Fresnel reflection coefficient of average ground for horizontal
/// polarization at grazing angle `psi` and frequency `f` (MHz).
///
/// The complex permittivity term is decomposed into real arithmetic: no
/// complex types are involved.
pub fn ground_reflection(psi: f64, f: f64, consts: &Constants) -> GroundReflectionData {
    let x = 18000.0 * consts.sigma / f;
    let y = consts.epsilon_r - f64::powi(f64::cos(psi), 2);
    let t = f64::sqrt(y * y + x * x);

    let p = f64::sqrt(0.5 * t);
    let q = x / (2.0 * p);
    let b = 1.0 / (p * p + q * q);
    let a = 2.0 * p / (p * p + q * q);

    let s = f64::sin(psi);
    let r_g = f64::sqrt(((1.0 + b * s * s) - a * s) / ((1.0 + b * s * s) + a * s));
    let phi_g = f64::atan2(-q, s - p) - f64::atan2(q, s + p);

    GroundReflectionData { r_g, phi_g }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_stays_in_unit_interval() {
        let consts = Constants::default();
        for psi in [0.001, 0.01, 0.1, 0.5, 1.0, 1.5] {
            for f in [100.0, 1000.0, 5000.0, 17000.0] {
                let gr = ground_reflection(psi, f, &consts);
                assert!(gr.r_g > 0.0 && gr.r_g <= 1.0, "R_g = {} at psi {psi}", gr.r_g);
                assert!(gr.phi_g.is_finite());
            }
        }
    }

    #[test]
    fn grazing_incidence_reflects_almost_totally_out_of_phase() {
        // At vanishing grazing angles horizontal polarization approaches
        // R = -1: unit magnitude, phase near -pi.
        let consts = Constants::default();
        let gr = ground_reflection(1e-6, 5000.0, &consts);
        assert!(gr.r_g > 0.999);
        assert!((gr.phi_g + PI).abs() < 0.01, "phi_g = {}", gr.phi_g);
    }

    #[test]
    fn magnitude_decreases_toward_steeper_incidence() {
        let consts = Constants::default();
        let shallow = ground_reflection(0.01, 5000.0, &consts);
        let steep = ground_reflection(1.0, 5000.0, &consts);
        assert!(steep.r_g < shallow.r_g);
    }
}
