use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ClusterAssignment, TeamScore};

const MAX_ITERATIONS: usize = 300;

/// Per-dimension standardization parameters, fit once over the run's full
/// team population and immutable afterwards. Every later transform of the same
/// run must go through this struct rather than re-fitting.
#[derive(Debug, Clone)]
pub struct Standardization {
    pub means: [f64; 3],
    pub stds: [f64; 3],
}

impl Standardization {
    pub fn fit(scores: &[TeamScore]) -> Self {
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

        let mut stds = [0.0f64; 3];
        for score in scores {
            for (slot, value) in score.as_vector().into_iter().enumerate() {
                stds[slot] += (value - means[slot]).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / n).sqrt();
        }

        Standardization { means, stds }
    }

    /// Zero variance in a dimension standardizes to zero for every team
    /// instead of dividing by zero.
    pub fn transform(&self, score: &TeamScore) -> [f64; 3] {
        let mut point = score.as_vector();
        for slot in 0..3 {
            point[slot] = if self.stds[slot] == 0.0 {
                0.0
            } else {
                (point[slot] - self.means[slot]) / self.stds[slot]
            };
        }
        point
    }
}

/// Lloyd's k-means over the standardized team vectors, k-means++ seeding from
/// a fixed seed so identical input always yields identical memberships.
/// Cluster ids carry no meaning on their own; the labeler assigns that.
pub fn assign_clusters(
    scores: &[TeamScore],
    standardization: &Standardization,
    k: usize,
    seed: u64,
) -> Vec<ClusterAssignment> {
    let points: Vec<[f64; 3]> = scores
        .iter()
        .map(|score| standardization.transform(score))
        .collect();
    let assignments = kmeans(&points, k, seed);

    scores
        .iter()
        .zip(assignments)
        .map(|(score, cluster)| ClusterAssignment {
            team: score.team.clone(),
            cluster,
        })
        .collect()
}

fn squared_distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum()
}

fn nearest_centroid(point: &[f64; 3], centroids: &[[f64; 3]]) -> usize {
    let mut best = 0usize;
    let mut best_distance = squared_distance(point, &centroids[0]);
    for (index, centroid) in centroids.iter().enumerate().skip(1) {
        let distance = squared_distance(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = index;
        }
    }
    best
}

fn seed_centroids(points: &[[f64; 3]], k: usize, rng: &mut StdRng) -> Vec<[f64; 3]> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())]);

    while centroids.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|point| {
                centroids
                    .iter()
                    .map(|centroid| squared_distance(point, centroid))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();

        // Every remaining point coincides with a centroid; fill from the
        // point list so we still end up with k centroids.
        if total == 0.0 {
            centroids.push(points[centroids.len() % points.len()]);
            continue;
        }

        let mut target = rng.random::<f64>() * total;
        let mut chosen = points.len() - 1;
        for (index, weight) in weights.iter().enumerate() {
            target -= weight;
            if target <= 0.0 {
                chosen = index;
                break;
            }
        }
        centroids.push(points[chosen]);
    }

    centroids
}

fn kmeans(points: &[[f64; 3]], k: usize, seed: u64) -> Vec<usize> {
    if points.is_empty() {
        return Vec::new();
    }
    let k = k.min(points.len());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids = seed_centroids(points, k, &mut rng);
    let mut assignments = vec![0usize; points.len()];

    for _ in 0..MAX_ITERATIONS {
        let next: Vec<usize> = points
            .iter()
            .map(|point| nearest_centroid(point, &centroids))
            .collect();

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (point, &cluster) in points.iter().zip(&next) {
            for slot in 0..3 {
                sums[cluster][slot] += point[slot];
            }
            counts[cluster] += 1;
        }
        for cluster in 0..k {
            // An emptied cluster keeps its previous centroid.
            if counts[cluster] > 0 {
                for slot in 0..3 {
                    centroids[cluster][slot] = sums[cluster][slot] / counts[cluster] as f64;
                }
            }
        }

        let converged = next == assignments;
        assignments = next;
        if converged {
            break;
        }
    }

    assignments
}
