use std::path::Path;

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Transmittance spectrum with Gaussian absorption dips on a flat baseline.
fn generate_spectrum(
    wavenumbers: &[f64],
    dips: &[(f64, f64, f64)],
    noise_level: f64,
    rng: &mut SimpleRng,
) -> Vec<f64> {
    wavenumbers
        .iter()
        .map(|&wn| {
            let absorption: f64 = dips
                .iter()
                .map(|&(mu, sigma, depth)| gaussian(wn, mu, sigma, depth))
                .sum();
            (0.96 - absorption + rng.gauss(0.0, noise_level)).clamp(0.01, 1.0)
        })
        .collect()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Wavenumbers: 4000 → 402, step 2
    let wavenumbers: Vec<f64> = (0..1800).map(|i| 4000.0 - i as f64 * 2.0).collect();

    // (center cm⁻¹, width, depth) per sample – loosely modelled on common
    // O-H / C-H / C=O bands.
    let sample_dips: Vec<(&str, Vec<(f64, f64, f64)>)> = vec![
        (
            "sample_a",
            vec![(3350.0, 120.0, 0.45), (2920.0, 35.0, 0.30), (1710.0, 25.0, 0.55)],
        ),
        (
            "sample_b",
            vec![(3300.0, 100.0, 0.25), (2850.0, 40.0, 0.40), (1650.0, 30.0, 0.35)],
        ),
        (
            "sample_c",
            vec![(3500.0, 90.0, 0.50), (1730.0, 20.0, 0.60), (1050.0, 45.0, 0.40)],
        ),
    ];

    let out_dir = Path::new("sample_data");
    std::fs::create_dir_all(out_dir).expect("Failed to create sample_data directory");

    for (name, dips) in &sample_dips {
        let transmittance = generate_spectrum(&wavenumbers, dips, 0.003, &mut rng);

        let path = out_dir.join(format!("{name}.csv"));
        let mut writer = csv::Writer::from_path(&path).expect("Failed to create output file");
        writer
            .write_record(["wavenumber", "transmittance"])
            .expect("Failed to write header");
        for (&wn, &tr) in wavenumbers.iter().zip(transmittance.iter()) {
            writer
                .write_record([format!("{wn:.1}"), format!("{tr:.5}")])
                .expect("Failed to write row");
        }
        writer.flush().expect("Failed to flush output file");
        println!("Wrote {} rows to {}", wavenumbers.len(), path.display());
    }
}
