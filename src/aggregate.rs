use std::collections::HashMap;

use crate::models::{Dimension, RawResponse, TeamScore};
use crate::survey::QuestionGroups;

/// Aggregation output plus the coverage counters callers print so consumers
/// can judge how much data was excluded.
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub scores: Vec<TeamScore>,
    /// Individual answer cells that were blank or unparseable.
    pub missing_values: usize,
    /// Teams dropped because at least one dimension had no answers at all.
    pub dropped_teams: usize,
}

/// Reduce respondent rows to one score row per team.
///
/// Two-stage mean: first the per-question mean over the team's respondents,
/// then the mean of those question means within each group. Each question
/// contributes equally to its dimension no matter how many respondents
/// answered it, which is not the same as a flat mean over all answers.
/// The commitment score is polarity-corrected onto the same higher-is-better
/// scale as the other dimensions.
pub fn aggregate(responses: &[RawResponse], groups: &QuestionGroups) -> AggregateOutcome {
    let mut by_team: HashMap<&str, Vec<&RawResponse>> = HashMap::new();
    for response in responses {
        by_team.entry(&response.team).or_default().push(response);
    }

    let mut missing_values = 0usize;
    let mut dropped_teams = 0usize;
    let mut scores = Vec::with_capacity(by_team.len());

    for (team, rows) in by_team {
        let mut dimension_means = [0.0f64; 3];
        let mut complete = true;

        for (slot, dimension) in Dimension::ALL.into_iter().enumerate() {
            let mut question_means = Vec::new();
            for question in groups.questions(dimension) {
                let mut total = 0.0;
                let mut count = 0usize;
                for row in &rows {
                    match row.answers.get(question) {
                        Some(Some(value)) => {
                            total += value;
                            count += 1;
                        }
                        _ => missing_values += 1,
                    }
                }
                // A question nobody on the team answered drops out of the
                // mean-of-means rather than poisoning it.
                if count > 0 {
                    question_means.push(total / count as f64);
                }
            }

            if question_means.is_empty() {
                complete = false;
                break;
            }
            dimension_means[slot] =
                question_means.iter().sum::<f64>() / question_means.len() as f64;
        }

        if !complete {
            dropped_teams += 1;
            continue;
        }

        scores.push(TeamScore {
            team: team.to_string(),
            conflict: dimension_means[0],
            collaboration: dimension_means[1],
            commitment: (groups.max_scale + 1.0) - dimension_means[2],
        });
    }

    scores.sort_by(|a, b| a.team.cmp(&b.team));
    AggregateOutcome {
        scores,
        missing_values,
        dropped_teams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> QuestionGroups {
        QuestionGroups {
            conflict: vec!["c1".to_string(), "c2".to_string()],
            collaboration: vec!["b1".to_string()],
            commitment: vec!["m1".to_string()],
            max_scale: 5.0,
        }
    }

    fn response(team: &str, cells: &[(&str, Option<f64>)]) -> RawResponse {
        RawResponse {
            team: team.to_string(),
            answers: cells
                .iter()
                .map(|(q, v)| (q.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn mean_of_means_weights_questions_equally() {
        // c1 answered twice (4, 2 -> mean 3), c2 answered once (1).
        // Mean of question means is 2.0; a flat mean over all answers
        // would be (4 + 2 + 1) / 3 = 2.33.
        let responses = vec![
            response(
                "Alpha",
                &[
                    ("c1", Some(4.0)),
                    ("c2", Some(1.0)),
                    ("b1", Some(3.0)),
                    ("m1", Some(3.0)),
                ],
            ),
            response(
                "Alpha",
                &[
                    ("c1", Some(2.0)),
                    ("c2", None),
                    ("b1", Some(3.0)),
                    ("m1", Some(3.0)),
                ],
            ),
        ];

        let outcome = aggregate(&responses, &groups());
        assert_eq!(outcome.scores.len(), 1);
        assert!((outcome.scores[0].conflict - 2.0).abs() < 1e-9);
        assert_eq!(outcome.missing_values, 1);
    }

    #[test]
    fn commitment_is_polarity_corrected() {
        let responses = vec![response(
            "Alpha",
            &[
                ("c1", Some(2.0)),
                ("c2", Some(2.0)),
                ("b1", Some(4.0)),
                ("m1", Some(2.0)),
            ],
        )];

        let outcome = aggregate(&responses, &groups());
        // Raw commitment mean 2.0 on a 5-point scale inverts to 4.0.
        assert!((outcome.scores[0].commitment - 4.0).abs() < 1e-9);
    }

    #[test]
    fn team_with_no_dimension_data_is_dropped() {
        let responses = vec![
            response(
                "Alpha",
                &[
                    ("c1", Some(3.0)),
                    ("c2", Some(3.0)),
                    ("b1", Some(3.0)),
                    ("m1", Some(3.0)),
                ],
            ),
            // Beta never answered any commitment item.
            response(
                "Beta",
                &[
                    ("c1", Some(3.0)),
                    ("c2", Some(3.0)),
                    ("b1", Some(3.0)),
                    ("m1", None),
                ],
            ),
        ];

        let outcome = aggregate(&responses, &groups());
        assert_eq!(outcome.scores.len(), 1);
        assert_eq!(outcome.scores[0].team, "Alpha");
        assert_eq!(outcome.dropped_teams, 1);
    }

    #[test]
    fn absent_team_never_fabricates_a_row() {
        let outcome = aggregate(&[], &groups());
        assert!(outcome.scores.is_empty());
        assert_eq!(outcome.dropped_teams, 0);
    }
}
