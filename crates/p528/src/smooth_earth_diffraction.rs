use crate::path_data::TerminalGeometry;

/// Smooth Earth diffraction attenuation (dB below free space, positive) at
/// distance `d_0` km, P.528-4 Annex II Section X.
///
/// Used only to anchor the diffraction-region loss line; the line-of-sight
/// method evaluates it at two distances beyond the horizon and interpolates.
pub fn smooth_earth_diffraction(
    lt: &TerminalGeometry,
    ht: &TerminalGeometry,
    f: f64,
    d_0: f64,
) -> f64 {
    // Normalized distances for the path and each terminal
    let scale = 1.607 * f64::cbrt(f);
    let x = [scale * d_0, scale * lt.d, scale * ht.d];

    // Distance-dependent term
    let g = |x: f64| 0.05751 * x - 10.0 * f64::log10(x);

    // Height functions for the two terminals
    let mut f_x = [0.0; 2];
    for i in 1..3 {
        let y = 40.0 * f64::log10(x[i]) - 117.0;
        f_x[i - 1] = if x[i] >= 2000.0 {
            g(x[i])
        } else if x[i] >= 200.0 {
            let w = 0.0134 * x[i] * f64::exp(-0.005 * x[i]);
            w * y + (1.0 - w) * g(x[i])
        } else {
            y
        };
    }

    g(x[0]) - f_x[0] - f_x[1] - 20.0
}
