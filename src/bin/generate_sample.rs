use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic cyclic compression recording in the rig's native
/// export format (tab-separated, comma decimals, no header).
#[derive(Parser)]
struct Args {
    /// Output file.
    #[arg(long, default_value = "sample_recording.txt")]
    output: PathBuf,

    /// Number of load cycles.
    #[arg(long, default_value_t = 5)]
    cycles: usize,

    /// Random seed for the measurement noise.
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const SAMPLE_RATE_HZ: f64 = 10.0;
const LEAD_IN_S: f64 = 3.0;
const CYCLE_S: f64 = 40.0;
const PEAK_LOAD_N: f64 = 10_000.0;
const PRELOAD_N: f64 = 150.0;
/// Specimen stiffness (N/mm) at zero load; it stiffens with compression.
const STIFFNESS_N_MM: f64 = 2500.0;
const HARDENING_PER_MM: f64 = 0.35;
/// Fraction of the peak displacement lost on unloading.
const HYSTERESIS: f64 = 0.08;

/// Displacement under load for a mildly hardening elastomer bearing.
fn displacement_for(force: f64) -> f64 {
    // F = k·d·(1 + h·d) solved for d.
    let a = STIFFNESS_N_MM * HARDENING_PER_MM;
    let b = STIFFNESS_N_MM;
    (-b + (b * b + 4.0 * a * force.max(0.0)).sqrt()) / (2.0 * a)
}

/// One (force, displacement) pair at `t` seconds into a cycle.
fn cycle_point(t: f64) -> (f64, f64) {
    let phase = t / CYCLE_S;
    let half = phase < 0.5;
    let ramp = if half {
        2.0 * phase
    } else {
        2.0 * (1.0 - phase)
    };
    let force = PRELOAD_N + (PEAK_LOAD_N - PRELOAD_N) * ramp;
    let mut d = displacement_for(force);
    if !half {
        d += HYSTERESIS * displacement_for(PEAK_LOAD_N) * ramp * (1.0 - ramp) * 4.0;
    }
    (force, d)
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

fn comma_decimal(value: f64, precision: usize) -> String {
    format!("{value:.precision$}").replace('.', ",")
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let dt = 1.0 / SAMPLE_RATE_HZ;
    let lead_in = (LEAD_IN_S * SAMPLE_RATE_HZ) as usize;
    let per_cycle = (CYCLE_S * SAMPLE_RATE_HZ) as usize;
    let total = lead_in + args.cycles * per_cycle;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    for i in 0..total {
        let t = i as f64 * dt;
        let (force, displacement) = if i < lead_in {
            (0.0, 0.0)
        } else {
            cycle_point(((i - lead_in) % per_cycle) as f64 * dt)
        };
        let force = force + rng.gauss(0.0, 3.0);
        let displacement = displacement + rng.gauss(0.0, 0.0005);
        let aux = 20.0 + rng.gauss(0.0, 0.05);

        writer.write_record([
            comma_decimal(force, 2),
            comma_decimal(aux, 3),
            comma_decimal(displacement, 5),
            comma_decimal(t, 2),
        ])?;
    }
    writer.flush()?;

    println!(
        "Wrote {total} samples ({} cycles) to {}",
        args.cycles,
        args.output.display()
    );
    Ok(())
}
