use p528::*;

fn main() {
    println!("P528 Line-of-Sight Propagation Prediction - Simple Example");
    println!("==========================================================");

    // A 5 GHz radar link between a 360 m mast and an aircraft at 500 m,
    // predicted for 99% time availability over a 60 km path.
    let f_ghz = 5.0;
    let h_low = 0.36;
    let h_high = 0.50;
    let q = 0.99;
    let d = 60.0;

    match compute_line_of_sight_loss(f_ghz, h_low, h_high, q, d) {
        Ok(result) => {
            println!("\nPath: {h_low} km / {h_high} km terminals, {d} km apart");
            println!("Frequency: {f_ghz} GHz, availability: {:.0}%", q * 100.0);
            println!();
            println!("Loss components:");
            println!("  Free space:     {:8.2} dB", result.free_space);
            println!("  Absorption:     {:8.2} dB", result.absorption);
            println!("  Line of sight:  {:8.2} dB", result.line_of_sight);
            println!("  Variability:    {:8.2} dB", result.variability);
            println!("  Total:          {:8.2} dB", result.total);
            if !result.converged {
                println!("  (distance search did not fully converge)");
            }
        }
        Err(e) => println!("prediction failed: {e}"),
    }
}
