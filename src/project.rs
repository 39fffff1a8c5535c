use crate::cluster::Standardization;
use crate::models::{ClassifiedTeam, ProjectedTeam, TeamScore};

/// Project classified teams onto the two principal components of the
/// standardized score space for plotting. This path re-standardizes from the
/// raw scores on its own; it is decoupled from the clustering decision and
/// carries no classification authority.
pub fn project(classified: &[ClassifiedTeam]) -> Vec<ProjectedTeam> {
    let scores: Vec<TeamScore> = classified.iter().map(|c| c.score.clone()).collect();
    let standardization = Standardization::fit(&scores);
    let points: Vec<[f64; 3]> = scores
        .iter()
        .map(|score| standardization.transform(score))
        .collect();

    let components = principal_components(&points);

    classified
        .iter()
        .zip(points)
        .map(|(team, point)| ProjectedTeam {
            team: team.score.team.clone(),
            pc1: dot(&point, &components[0]),
            pc2: dot(&point, &components[1]),
            label: team.label.to_string(),
        })
        .collect()
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Top two orthonormal directions of maximum variance, ordered by explained
/// variance. Sign convention: each component is flipped so its
/// largest-magnitude coordinate is positive, keeping output stable across
/// runs.
fn principal_components(points: &[[f64; 3]]) -> [[f64; 3]; 2] {
    let covariance = covariance_matrix(points);
    let (eigenvalues, eigenvectors) = jacobi_eigen(covariance);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigenvalues[b]
            .partial_cmp(&eigenvalues[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut components = [[0.0f64; 3]; 2];
    for (slot, &column) in order.iter().take(2).enumerate() {
        let mut component = [
            eigenvectors[0][column],
            eigenvectors[1][column],
            eigenvectors[2][column],
        ];
        let largest = component
            .iter()
            .fold(0.0f64, |acc, &v| if v.abs() > acc.abs() { v } else { acc });
        if largest < 0.0 {
            for value in &mut component {
                *value = -*value;
            }
        }
        components[slot] = component;
    }
    components
}

fn covariance_matrix(points: &[[f64; 3]]) -> [[f64; 3]; 3] {
    let n = points.len().max(1) as f64;
    let mut means = [0.0f64; 3];
    for point in points {
        for slot in 0..3 {
            means[slot] += point[slot];
        }
    }
    for mean in &mut means {
        *mean /= n;
    }

    let mut covariance = [[0.0f64; 3]; 3];
    for point in points {
        for row in 0..3 {
            for col in 0..3 {
                covariance[row][col] += (point[row] - means[row]) * (point[col] - means[col]);
            }
        }
    }
    for row in covariance.iter_mut() {
        for value in row.iter_mut() {
            *value /= n;
        }
    }
    covariance
}

/// Eigen-decomposition of a symmetric 3x3 matrix by cyclic Jacobi rotations.
/// Returns (eigenvalues, eigenvectors), eigenvector j in column j.
fn jacobi_eigen(mut a: [[f64; 3]; 3]) -> ([f64; 3], [[f64; 3]; 3]) {
    let mut v = [[0.0f64; 3]; 3];
    for (index, row) in v.iter_mut().enumerate() {
        row[index] = 1.0;
    }

    for _ in 0..50 {
        // Largest off-diagonal element picks the rotation plane.
        let mut p = 0usize;
        let mut q = 1usize;
        let mut largest = 0.0f64;
        for row in 0..3 {
            for col in (row + 1)..3 {
                if a[row][col].abs() > largest {
                    largest = a[row][col].abs();
                    p = row;
                    q = col;
                }
            }
        }
        if largest < 1e-12 {
            break;
        }

        let phi = 0.5 * (2.0 * a[p][q]).atan2(a[p][p] - a[q][q]);
        let c = phi.cos();
        let s = phi.sin();

        let app = a[p][p];
        let aqq = a[q][q];
        let apq = a[p][q];
        a[p][p] = c * c * app + 2.0 * s * c * apq + s * s * aqq;
        a[q][q] = s * s * app - 2.0 * s * c * apq + c * c * aqq;
        a[p][q] = 0.0;
        a[q][p] = 0.0;
        for r in 0..3 {
            if r != p && r != q {
                let arp = a[r][p];
                let arq = a[r][q];
                a[r][p] = c * arp + s * arq;
                a[p][r] = a[r][p];
                a[r][q] = c * arq - s * arp;
                a[q][r] = a[r][q];
            }
        }

        for row in v.iter_mut() {
            let vp = row[p];
            let vq = row[q];
            row[p] = c * vp + s * vq;
            row[q] = c * vq - s * vp;
        }
    }

    ([a[0][0], a[1][1], a[2][2]], v)
}
