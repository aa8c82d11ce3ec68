use rand::Rng;
use tracing::debug;

use crate::models::Sample;

pub const SAMPLE_COUNT: u32 = 10;
pub const INPUT_STEP: u32 = 100;
pub const NOISE_CEILING: f64 = 10.0;
pub const MIN_EXECUTION_TIME: f64 = 0.1;

const DEFAULT_TOKEN: &str = "O(n)";

/// Closed set of growth curves the chart knows how to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthKind {
    Constant,
    Logarithmic,
    Linear,
    Linearithmic,
    Quadratic,
    Exponential,
}

impl GrowthKind {
    pub const ALL: [GrowthKind; 6] = [
        GrowthKind::Constant,
        GrowthKind::Logarithmic,
        GrowthKind::Linear,
        GrowthKind::Linearithmic,
        GrowthKind::Quadratic,
        GrowthKind::Exponential,
    ];

    pub fn notation(self) -> &'static str {
        match self {
            GrowthKind::Constant => "O(1)",
            GrowthKind::Logarithmic => "O(log n)",
            GrowthKind::Linear => "O(n)",
            GrowthKind::Linearithmic => "O(n log n)",
            GrowthKind::Quadratic => "O(n^2)",
            GrowthKind::Exponential => "O(2^n)",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.notation() == token)
    }

    /// Resolves a full label such as `"O(n^2) - Quadratic"`.
    ///
    /// The token before the first space decides. Notations that contain a
    /// space themselves are matched as a label prefix when the token is
    /// unrecognized. Anything else is linear.
    pub fn from_label(label: &str) -> Self {
        let token = leading_token(label);
        if let Some(kind) = Self::from_token(token) {
            return kind;
        }

        let trimmed = label.trim_start();
        let spaced = [GrowthKind::Linearithmic, GrowthKind::Logarithmic];
        if let Some(kind) = spaced
            .into_iter()
            .find(|kind| trimmed.starts_with(kind.notation()))
        {
            return kind;
        }

        debug!("Unrecognized complexity token {:?}, using linear growth", token);
        GrowthKind::Linear
    }

    /// Unscaled magnitude for input size `n`.
    pub fn magnitude(self, n: f64) -> f64 {
        match self {
            GrowthKind::Constant => 1.0,
            GrowthKind::Logarithmic => n.log2(),
            GrowthKind::Linear => n * 0.01,
            GrowthKind::Linearithmic => n * n.log2() * 0.001,
            GrowthKind::Quadratic => n * n * 0.000_01,
            GrowthKind::Exponential => 2f64.powf(n / 100.0),
        }
    }
}

/// Text before the first space, or `O(n)` when there is none.
pub fn leading_token(label: &str) -> &str {
    label.split_whitespace().next().unwrap_or(DEFAULT_TOKEN)
}

/// Ten noisy samples for the curve named by `label`.
///
/// Execution times are intentionally approximate: they stand in for real
/// benchmarking and change on every call.
pub fn generate_samples(label: &str) -> Vec<Sample> {
    let mut rng = rand::rng();
    generate_samples_with(label, &mut rng)
}

pub fn generate_samples_with<R: Rng + ?Sized>(label: &str, rng: &mut R) -> Vec<Sample> {
    let kind = GrowthKind::from_label(label);
    debug!("Generating samples for {:?} as {:?}", label, kind);

    (1..=SAMPLE_COUNT)
        .map(|i| {
            let input_size = i * INPUT_STEP;
            let noise = rng.random_range(0.0..NOISE_CEILING);
            let raw = (kind.magnitude(f64::from(input_size)) + noise).max(MIN_EXECUTION_TIME);
            Sample {
                input_size,
                execution_time: round_to_hundredths(raw),
            }
        })
        .collect()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const LABELS: [&str; 8] = [
        "O(1)",
        "O(log n)",
        "O(n)",
        "O(n log n)",
        "O(n^2)",
        "O(2^n)",
        "O(n!)",
        "",
    ];

    #[test]
    fn every_label_yields_ten_increasing_sizes() {
        let expected: Vec<u32> = (1..=10).map(|i| i * 100).collect();
        for label in LABELS {
            let samples = generate_samples(label);
            let sizes: Vec<u32> = samples.iter().map(|s| s.input_size).collect();
            assert_eq!(sizes, expected, "label {label:?}");
        }
    }

    #[test]
    fn execution_time_never_drops_below_floor() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            for label in LABELS {
                for sample in generate_samples_with(label, &mut rng) {
                    assert!(sample.execution_time >= MIN_EXECUTION_TIME);
                }
            }
        }
    }

    #[test]
    fn token_is_text_before_first_space() {
        assert_eq!(leading_token("O(n^2) - Quadratic"), "O(n^2)");
        assert_eq!(leading_token("O(1)"), "O(1)");
        assert_eq!(leading_token(""), "O(n)");
        assert_eq!(leading_token("   "), "O(n)");
    }

    #[test]
    fn labels_map_to_growth_kinds() {
        assert_eq!(GrowthKind::from_label("O(1)"), GrowthKind::Constant);
        assert_eq!(GrowthKind::from_label("O(n^2) - Quadratic"), GrowthKind::Quadratic);
        assert_eq!(GrowthKind::from_label("O(2^n)"), GrowthKind::Exponential);
        assert_eq!(GrowthKind::from_label("O(log n)"), GrowthKind::Logarithmic);
        assert_eq!(
            GrowthKind::from_label("O(n log n) - Linearithmic"),
            GrowthKind::Linearithmic
        );
        assert_eq!(GrowthKind::from_label("O(n!)"), GrowthKind::Linear);
        assert_eq!(GrowthKind::from_label("garbage"), GrowthKind::Linear);
        assert_eq!(GrowthKind::from_label(""), GrowthKind::Linear);
    }

    #[test]
    fn quadratic_label_lands_in_expected_band() {
        assert!((GrowthKind::Quadratic.magnitude(1000.0) - 10.0).abs() < 1e-9);
        for _ in 0..200 {
            let samples = generate_samples("O(n^2) - Quadratic");
            let last = samples.last().unwrap();
            assert_eq!(last.input_size, 1000);
            assert!(
                (10.0..=20.0).contains(&last.execution_time),
                "got {}",
                last.execution_time
            );
        }
    }

    #[test]
    fn constant_label_stays_within_noise_band() {
        for _ in 0..200 {
            for sample in generate_samples("O(1)") {
                assert!(
                    (1.0..=11.0).contains(&sample.execution_time),
                    "got {}",
                    sample.execution_time
                );
            }
        }
    }

    #[test]
    fn seeded_runs_repeat_and_times_are_rounded() {
        let first = generate_samples_with("O(n)", &mut StdRng::seed_from_u64(42));
        let second = generate_samples_with("O(n)", &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
        for sample in first {
            let scaled = sample.execution_time * 100.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn unseeded_runs_keep_sizes_but_vary_times() {
        let runs: Vec<Vec<Sample>> = (0..5).map(|_| generate_samples("O(n)")).collect();
        for run in &runs[1..] {
            let sizes: Vec<u32> = run.iter().map(|s| s.input_size).collect();
            let first_sizes: Vec<u32> = runs[0].iter().map(|s| s.input_size).collect();
            assert_eq!(sizes, first_sizes);
        }
        assert!(runs[1..].iter().any(|run| run != &runs[0]));
    }
}
