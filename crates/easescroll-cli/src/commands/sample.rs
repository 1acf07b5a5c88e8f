use anyhow::{bail, Result};

use easescroll_core::TimingCurve;

pub fn run(curve: TimingCurve, steps: usize) -> Result<()> {
    let rows = sample_curve(curve, steps)?;

    println!("{}\n", curve);
    println!("{:>8}  {:>10}", "t", "progress");
    for (t, y) in rows {
        let bar_len = (y.clamp(0.0, 1.5) * 40.0).round() as usize;
        println!("{:>8.3}  {:>10.6}  {}", t, y, "#".repeat(bar_len));
    }

    Ok(())
}

/// Evaluate `curve` at `steps + 1` evenly spaced times from 0 to 1
pub fn sample_curve(curve: TimingCurve, steps: usize) -> Result<Vec<(f64, f64)>> {
    if steps == 0 {
        bail!("--steps must be at least 1");
    }
    Ok((0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            (t, curve.evaluate(t))
        })
        .collect())
}
