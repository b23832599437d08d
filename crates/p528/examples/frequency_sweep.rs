use p528::constants::Constants;
use p528::sweep::compute_batch;

fn main() {
    println!("P528 Line-of-Sight Propagation Prediction - Frequency Sweep");
    println!("===========================================================");

    // Sweep 0.1 - 20 GHz at a fixed short-path geometry. Each request is
    // independent, so the batch evaluates in parallel.
    let consts = Constants::default();
    let requests: Vec<(f64, f64, f64, f64, f64)> = (1..=200)
        .map(|i| (i as f64 * 0.1, 0.30, 0.50, 0.99, 1.0))
        .collect();

    let results = compute_batch(&requests, &consts);

    println!("\n  f (GHz)   total (dB)   free space   variability");
    for ((f_ghz, ..), result) in requests.iter().zip(results.iter()).step_by(10) {
        match result {
            Ok(r) => println!(
                "  {f_ghz:7.1}   {:10.2}   {:10.2}   {:11.2}",
                r.total, r.free_space, r.variability
            ),
            Err(e) => println!("  {f_ghz:7.1}   failed: {e}"),
        }
    }
}
