use crate::models::{ClassifiedTeam, Dimension, SummaryStat, TeamLabel};

const LABEL_ORDER: [TeamLabel; 4] = [
    TeamLabel::HighPerforming,
    TeamLabel::Struggling,
    TeamLabel::Isolated,
    TeamLabel::Balanced,
];

/// Per-label dispersion over the raw dimension scores: mean, population
/// standard deviation, and Gini inequality index. Labels without teams are
/// absent from the output; rows come out in a fixed label-then-dimension
/// order.
pub fn summarize(classified: &[ClassifiedTeam]) -> Vec<SummaryStat> {
    let mut stats = Vec::new();

    for label in LABEL_ORDER {
        let members: Vec<&ClassifiedTeam> =
            classified.iter().filter(|team| team.label == label).collect();
        if members.is_empty() {
            continue;
        }

        for dimension in Dimension::ALL {
            let values: Vec<f64> = members
                .iter()
                .map(|team| team.score.dimension(dimension))
                .collect();
            stats.push(SummaryStat {
                label,
                dimension,
                mean: mean(&values),
                std_dev: population_std(&values),
                gini: gini(&values),
            });
        }
    }

    stats
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}

fn population_std(values: &[f64]) -> f64 {
    let m = mean(values);
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len().max(1) as f64;
    variance.sqrt()
}

/// Gini index over non-negative values via the sorted-index formula
/// G = 2*sum(i*a[i]) / (n*S) - (n+1)/n with 1-based i over the ascending
/// sort. Undefined (None) when the values sum to zero.
pub fn gini(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len() as f64;
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(index, value)| (index + 1) as f64 * value)
        .sum();

    Some(2.0 * weighted / (n * total) - (n + 1.0) / n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamScore;

    fn classified(team: &str, label: TeamLabel, values: [f64; 3]) -> ClassifiedTeam {
        ClassifiedTeam {
            score: TeamScore {
                team: team.to_string(),
                conflict: values[0],
                collaboration: values[1],
                commitment: values[2],
            },
            cluster: 0,
            label,
        }
    }

    #[test]
    fn identical_values_have_zero_gini() {
        let value = gini(&[3.0, 3.0, 3.0]).unwrap();
        assert!(value.abs() < 1e-9);
    }

    #[test]
    fn gini_is_scale_invariant() {
        let base = [1.0, 2.0, 5.0, 8.0];
        let scaled: Vec<f64> = base.iter().map(|v| v * 7.5).collect();
        let a = gini(&base).unwrap();
        let b = gini(&scaled).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn zero_sum_gini_is_undefined() {
        assert_eq!(gini(&[0.0, 0.0]), None);
        assert_eq!(gini(&[]), None);
    }

    #[test]
    fn population_std_divides_by_n() {
        // Sample std of [2, 4] would be sqrt(2); population std is 1.
        assert!((population_std(&[2.0, 4.0]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn labels_without_teams_are_absent() {
        let teams = vec![
            classified("Alpha", TeamLabel::Balanced, [3.0, 3.0, 3.0]),
            classified("Beta", TeamLabel::Balanced, [2.0, 4.0, 3.0]),
        ];
        let stats = summarize(&teams);

        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.label == TeamLabel::Balanced));
    }

    #[test]
    fn summary_covers_each_dimension_per_label() {
        let teams = vec![
            classified("Alpha", TeamLabel::HighPerforming, [1.0, 5.0, 5.0]),
            classified("Beta", TeamLabel::Struggling, [4.0, 2.0, 2.0]),
        ];
        let stats = summarize(&teams);

        assert_eq!(stats.len(), 6);
        assert_eq!(stats[0].label, TeamLabel::HighPerforming);
        assert_eq!(stats[0].dimension, Dimension::Conflict);
        assert!((stats[0].mean - 1.0).abs() < 1e-9);
        assert!(stats[0].std_dev.abs() < 1e-9);
        assert!(stats[0].gini.unwrap().abs() < 1e-9);
    }
}
