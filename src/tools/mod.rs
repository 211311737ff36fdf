/// Convert a level in dB into its linear energy ratio, 10^(L/10).
/// Negative infinity maps to zero energy.
pub fn level_to_energy(level: f64) -> f64 {
    10f64.powf(level / 10.0)
}

/// Convert a linear energy ratio back to dB, 10·log10(E).
/// Zero energy maps to negative infinity.
pub fn energy_to_level(energy: f64) -> f64 {
    10.0 * energy.log10()
}

/// Decibel addition of any number of levels: 10·log10(Σ 10^(L/10)).
/// Returns negative infinity for an empty input.
pub fn level_sum<I>(levels: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    energy_to_level(levels.into_iter().map(level_to_energy).sum())
}

/// Energy average of levels: 10·log10(mean(10^(L/10))).
/// Returns `None` for an empty input.
pub fn level_mean<I>(levels: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (count, energy) = levels
        .into_iter()
        .fold((0usize, 0.0), |(count, energy), level| {
            (count + 1, energy + level_to_energy(level))
        });
    if count == 0 {
        None
    } else {
        Some(energy_to_level(energy / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_relative_eq, assert_ulps_eq};
    use proptest::prelude::prop;
    use test_strategy::proptest;

    #[test]
    fn two_equal_sources_add_three_db() {
        assert_relative_eq!(
            level_sum([80.0, 80.0]),
            80.0 + 10.0 * 2f64.log10(),
            epsilon = 1e-12
        );
        assert_relative_eq!(level_sum([80.0, 80.0]), 83.0103, epsilon = 1e-4);
    }

    #[test]
    fn silent_source_does_not_contribute() {
        assert_ulps_eq!(level_sum([62.0, f64::NEG_INFINITY]), 62.0);
        assert_eq!(level_sum(std::iter::empty()), f64::NEG_INFINITY);
    }

    #[test]
    fn mean_of_nothing_is_none() {
        assert_eq!(level_mean(std::iter::empty()), None);
    }

    #[proptest]
    fn level_sum_pairwise_vs_bulk(
        #[strategy(prop::collection::vec(-50f64..150f64, 1..50))] levels: Vec<f64>,
    ) {
        let pairwise = levels
            .iter()
            .copied()
            .reduce(|a, b| level_sum([a, b]))
            .unwrap();
        assert_relative_eq!(pairwise, level_sum(levels), max_relative = 1e-9);
    }

    #[proptest]
    fn level_mean_is_bounded_by_extremes(
        #[strategy(prop::collection::vec(0f64..120f64, 1..30))] levels: Vec<f64>,
    ) {
        let min = levels.iter().copied().fold(f64::INFINITY, f64::min);
        let max = levels.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = level_mean(levels).unwrap();
        assert!(mean >= min - 1e-9);
        assert!(mean <= max + 1e-9);
    }
}
