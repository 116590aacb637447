//! Writes a synthetic NFHS-shaped CSV for trying the dashboard without the
//! real survey file. Some cells carry footnote markers or `NA` on purpose.

use anyhow::{Context, Result};

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const REGIONS: &[&str] = &[
    "India",
    "Andhra Pradesh",
    "Assam",
    "Bihar",
    "Delhi",
    "Gujarat",
    "Kerala",
    "Maharashtra",
    "Punjab",
    "Tamil Nadu",
    "Uttar Pradesh",
    "West Bengal",
];

const AREAS: &[&str] = &["Total", "Urban", "Rural"];

const SURVEYS: &[&str] = &["NFHS-3", "NFHS-4"];

/// (indicator, NFHS-3 range, gain per wave)
const INDICATORS: &[(&str, (f64, f64), f64)] = &[
    ("Women who are literate (%)", (40.0, 90.0), 8.0),
    ("Sex ratio of the total population (females per 1,000 males)", (900.0, 1080.0), 10.0),
    ("Households with electricity (%)", (50.0, 99.0), 10.0),
    ("Children age 12-23 months fully immunized (%)", (25.0, 75.0), 12.0),
    ("All women age 15-49 years who are anaemic (%)", (35.0, 70.0), -3.0),
];

/// Decorate a value the way the survey tables do.
fn render_cell(value: f64, rng: &mut SimpleRng) -> String {
    let roll = rng.next_f64();
    if roll < 0.04 {
        "NA".to_string()
    } else if roll < 0.10 {
        format!("({value:.1})")
    } else if roll < 0.14 {
        format!("{value:.1}*")
    } else {
        format!("{value:.1}")
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_nfhs.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut header = vec!["India/States/UTs", "Area", "Survey"];
    header.extend(INDICATORS.iter().map(|(name, _, _)| *name));
    writer.write_record(&header).context("writing header")?;

    let mut rows = 0usize;
    for region in REGIONS {
        let baselines: Vec<f64> = INDICATORS
            .iter()
            .map(|(_, (lo, hi), _)| rng.uniform(*lo, *hi))
            .collect();

        for area in AREAS {
            let area_shift = match *area {
                "Urban" => 1.08,
                "Rural" => 0.95,
                _ => 1.0,
            };
            for (wave, survey) in SURVEYS.iter().enumerate() {
                let mut record = vec![region.to_string(), area.to_string(), survey.to_string()];
                for ((_, _, gain), base) in INDICATORS.iter().zip(&baselines) {
                    let value = base * area_shift + gain * wave as f64 + rng.uniform(-1.5, 1.5);
                    record.push(render_cell(value.max(0.0), &mut rng));
                }
                writer.write_record(&record).context("writing record")?;
                rows += 1;
            }
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {rows} records ({} indicators each) to {output_path}",
        INDICATORS.len()
    );
    Ok(())
}
