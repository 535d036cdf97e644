//! Writes `sample_surface.csv` (or the path given as the first argument):
//! two gaussian hills on a 40×30 lattice with noise, random gaps, a
//! duplicated (x, y) pair and a few malformed rows.

use anyhow::{Context, Result};

fn gaussian2(x: f64, y: f64, (mx, my, sigma, amplitude): (f64, f64, f64, f64)) -> f64 {
    amplitude * (-((x - mx).powi(2) + (y - my).powi(2)) / (2.0 * sigma.powi(2))).exp()
}

/// Seeded splitmix64 stream; enough for repeatable noise and gaps.
struct Noise(u64);

impl Noise {
    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 53) as f64
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_surface.csv".to_string());
    let mut rng = Noise(42);

    let hills = [(-1.0, 0.5, 0.8, 3.0), (1.5, -0.5, 1.1, 2.0)];
    let xs: Vec<f64> = (0..40).map(|i| -4.0 + i as f64 * 0.2).collect();
    let ys: Vec<f64> = (0..30).map(|j| -3.0 + j as f64 * 0.2).collect();

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["station", "easting", "northing", "elevation"])?;

    let mut written = 0;
    for (j, &y) in ys.iter().enumerate() {
        for (i, &x) in xs.iter().enumerate() {
            // ~3% of lattice points are left out and show up as holes.
            if rng.next_f64() < 0.03 {
                continue;
            }
            let z: f64 = hills.iter().map(|&h| gaussian2(x, y, h)).sum::<f64>()
                + (rng.next_f64() - 0.5) * 0.05;
            writer.write_record([
                format!("S{j:02}{i:02}"),
                format!("{x:.1}"),
                format!("{y:.1}"),
                format!("{z:.4}"),
            ])?;
            written += 1;
        }
    }

    // Re-measured point: the later value replaces the first one.
    writer.write_record(["S0000", "-4.0", "-3.0", "0.5000"])?;
    // Malformed rows, skipped by the viewer.
    writer.write_record(["broken", "n/a", "0.0", "1.0"])?;
    writer.write_record(["short", "1.0"])?;
    writer.flush()?;

    println!("Wrote {written} samples (+3 edge-case rows) to {output_path}");
    Ok(())
}
