//! Parallel batch evaluation.
//!
//! The engine is a stateless pipeline: every request allocates its own path
//! state and grazing-angle table, so independent requests parallelize with
//! no locking. Only the immutable constants are shared.

use rayon::prelude::*;

use crate::constants::Constants;
use crate::error::P528Result;
use crate::path_data::AttenuationResult;

/// Evaluate a batch of (frequency GHz, low height km, high height km, q,
/// distance km) requests in parallel, preserving input order.
pub fn compute_batch(
    requests: &[(f64, f64, f64, f64, f64)],
    consts: &Constants,
) -> Vec<P528Result<AttenuationResult>> {
    requests
        .par_iter()
        .map(|&(f_ghz, h_r1, h_r2, q, d)| {
            crate::compute_line_of_sight_loss_with(f_ghz, h_r1, h_r2, q, d, consts)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_matches_sequential_evaluation() {
        let consts = Constants::default();
        let requests: Vec<(f64, f64, f64, f64, f64)> = (1..20)
            .map(|i| (5.0, 0.36, 0.50, 0.99, 3.0 * i as f64))
            .collect();

        let batch = compute_batch(&requests, &consts);
        assert_eq!(batch.len(), requests.len());

        for (&(f, h1, h2, q, d), result) in requests.iter().zip(batch.iter()) {
            let sequential =
                crate::compute_line_of_sight_loss_with(f, h1, h2, q, d, &consts).unwrap();
            let parallel = result.as_ref().unwrap();
            assert_eq!(parallel.total, sequential.total, "divergence at d = {d}");
        }
    }

    #[test]
    fn batch_reports_per_request_failures() {
        let consts = Constants::default();
        let requests = [
            (5.0, 0.36, 0.50, 0.99, 60.0),  // line of sight
            (5.0, 0.36, 0.50, 0.99, 500.0), // transhorizon
            (5.0, 0.0, 0.0, 0.99, 0.0),     // degenerate
        ];
        let batch = compute_batch(&requests, &consts);
        assert!(batch[0].is_ok());
        assert!(batch[1].is_err());
        assert!(batch[2].is_err());
    }
}
