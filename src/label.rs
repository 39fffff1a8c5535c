use anyhow::bail;

use crate::models::{ClassifiedTeam, ClusterAssignment, TeamLabel, TeamScore};

/// Cluster count and label set are one coupled configuration: the "Isolated"
/// category only exists in the four-cluster deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterScheme {
    Three,
    Four,
}

impl ClusterScheme {
    pub fn from_cluster_count(k: usize) -> anyhow::Result<Self> {
        match k {
            3 => Ok(ClusterScheme::Three),
            4 => Ok(ClusterScheme::Four),
            other => bail!("unsupported cluster count {other}: expected 3 or 4"),
        }
    }

    pub fn cluster_count(&self) -> usize {
        match self {
            ClusterScheme::Three => 3,
            ClusterScheme::Four => 4,
        }
    }
}

/// Unweighted mean of each dimension across every team, the baseline each
/// cluster is compared against. Re-derived per run.
pub fn global_means(scores: &[TeamScore]) -> [f64; 3] {
    let n = scores.len().max(1) as f64;
    let mut means = [0.0f64; 3];
    for score in scores {
        for (slot, value) in score.as_vector().into_iter().enumerate() {
            means[slot] += value;
        }
    }
    for mean in &mut means {
        *mean /= n;
    }
    means
}

/// Ordered decision rule mapping a cluster's mean vector to a category.
/// The final arm is the fallback, so the function is total over any input.
pub fn label_cluster(
    cluster_means: [f64; 3],
    global: [f64; 3],
    scheme: ClusterScheme,
) -> TeamLabel {
    let [conflict, collaboration, commitment] = cluster_means;
    let [global_conflict, global_collaboration, global_commitment] = global;

    if collaboration > global_collaboration
        && commitment > global_commitment
        && conflict < global_conflict
    {
        TeamLabel::HighPerforming
    } else if conflict > global_conflict
        && collaboration < global_collaboration
        && commitment < global_commitment
    {
        TeamLabel::Struggling
    } else if scheme == ClusterScheme::Four
        && conflict < global_conflict
        && collaboration < global_collaboration
        && commitment > global_commitment
    {
        TeamLabel::Isolated
    } else {
        TeamLabel::Balanced
    }
}

/// Attach a semantic label to every team. Cluster means are taken over the
/// raw (non-standardized) dimension scores; every cluster id below the
/// scheme's count receives a label, and all members of a cluster share it.
pub fn classify(
    scores: &[TeamScore],
    assignments: &[ClusterAssignment],
    scheme: ClusterScheme,
) -> Vec<ClassifiedTeam> {
    let k = scheme.cluster_count();
    let global = global_means(scores);

    let mut sums = vec![[0.0f64; 3]; k];
    let mut counts = vec![0usize; k];
    for (score, assignment) in scores.iter().zip(assignments) {
        let cluster = assignment.cluster;
        for (slot, value) in score.as_vector().into_iter().enumerate() {
            sums[cluster][slot] += value;
        }
        counts[cluster] += 1;
    }

    let labels: Vec<TeamLabel> = (0..k)
        .map(|cluster| {
            // A cluster that ended up empty sits exactly on the baseline and
            // falls through to the default arm.
            let means = if counts[cluster] == 0 {
                global
            } else {
                let mut means = sums[cluster];
                for slot in 0..3 {
                    means[slot] /= counts[cluster] as f64;
                }
                means
            };
            label_cluster(means, global, scheme)
        })
        .collect();

    scores
        .iter()
        .zip(assignments)
        .map(|(score, assignment)| ClassifiedTeam {
            score: score.clone(),
            cluster: assignment.cluster,
            label: labels[assignment.cluster],
        })
        .collect()
}
