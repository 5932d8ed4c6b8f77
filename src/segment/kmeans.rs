//! Seeded k-means clustering.
//!
//! Lloyd iterations with a greedy k-means++ style initialization. The whole
//! procedure is deterministic: the seed rotates which row each restart uses
//! as its first centroid, later centroids are chosen greedily by potential
//! reduction, and every tie breaks toward the lower index. The same rows,
//! k, and seed therefore always produce the same partition.

/// Number of candidate rows examined per centroid step.
const INIT_CANDIDATES: usize = 8;

/// K-means clustering with a fixed seed.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    seed: u64,
    n_init: usize,
    max_iter: usize,
}

impl KMeans {
    /// Create a clusterer for `k` clusters. `n_init` and `max_iter` follow
    /// the usual defaults (10 restarts, 100 iterations).
    pub fn new(k: usize, seed: u64) -> Self {
        Self {
            k,
            seed,
            n_init: 10,
            max_iter: 100,
        }
    }

    /// Cluster the rows, returning one label in `0..k` per row.
    ///
    /// Requires `1 <= k <= rows.len()`; every cluster ends up non-empty.
    pub fn fit(&self, rows: &[Vec<f64>]) -> Vec<usize> {
        assert!(self.k >= 1 && self.k <= rows.len());

        if self.k == rows.len() {
            // One row per cluster; nothing to iterate on.
            return (0..rows.len()).collect();
        }

        let mut best_labels: Option<Vec<usize>> = None;
        let mut best_inertia = f64::INFINITY;

        for restart in 0..self.n_init {
            let first = (self.seed as usize + restart) % rows.len();
            let (labels, inertia) = self.run_once(rows, first);
            if inertia < best_inertia {
                best_inertia = inertia;
                best_labels = Some(labels);
            }
        }

        best_labels.expect("at least one k-means restart runs")
    }

    fn run_once(&self, rows: &[Vec<f64>], first: usize) -> (Vec<usize>, f64) {
        let mut centroids = init_centroids(rows, self.k, first);
        let mut labels = vec![usize::MAX; rows.len()];

        for _ in 0..self.max_iter {
            let mut new_labels = assign(rows, &centroids);

            // Refill empty clusters with the row farthest from its current
            // centroid so every cluster stays populated.
            for cluster in 0..self.k {
                if !new_labels.contains(&cluster) {
                    let farthest = (0..rows.len())
                        .max_by(|&a, &b| {
                            let da = sq_dist(&rows[a], &centroids[new_labels[a]]);
                            let db = sq_dist(&rows[b], &centroids[new_labels[b]]);
                            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                        })
                        .expect("rows are non-empty");
                    new_labels[farthest] = cluster;
                }
            }

            let converged = new_labels == labels;
            labels = new_labels;
            centroids = recompute(rows, &labels, self.k, &centroids);
            if converged {
                break;
            }
        }

        let inertia = labels
            .iter()
            .enumerate()
            .map(|(i, &label)| sq_dist(&rows[i], &centroids[label]))
            .sum();

        (labels, inertia)
    }
}

/// Greedy k-means++ initialization: the first centroid is given, each later
/// one is the candidate that shrinks the total potential the most.
/// Candidates are the rows farthest from the chosen set.
fn init_centroids(rows: &[Vec<f64>], k: usize, first: usize) -> Vec<Vec<f64>> {
    let mut chosen: Vec<usize> = vec![first];

    // Squared distance from each row to its nearest chosen centroid.
    let mut nearest: Vec<f64> = rows.iter().map(|row| sq_dist(row, &rows[first])).collect();

    while chosen.len() < k {
        let mut candidates: Vec<usize> = (0..rows.len())
            .filter(|i| !chosen.contains(i))
            .collect();
        candidates.sort_by(|&a, &b| {
            nearest[b]
                .partial_cmp(&nearest[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });
        candidates.truncate(INIT_CANDIDATES);

        let mut pick = candidates[0];
        let mut pick_potential = f64::INFINITY;
        for &candidate in &candidates {
            let potential: f64 = rows
                .iter()
                .zip(&nearest)
                .map(|(row, &d)| d.min(sq_dist(row, &rows[candidate])))
                .sum();
            if potential < pick_potential {
                pick_potential = potential;
                pick = candidate;
            }
        }

        for (i, row) in rows.iter().enumerate() {
            nearest[i] = nearest[i].min(sq_dist(row, &rows[pick]));
        }
        chosen.push(pick);
    }

    chosen.into_iter().map(|i| rows[i].clone()).collect()
}

/// Assign each row to its nearest centroid, lowest index on ties.
fn assign(rows: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    rows.iter()
        .map(|row| {
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (i, centroid) in centroids.iter().enumerate() {
                let d = sq_dist(row, centroid);
                if d < best_dist {
                    best_dist = d;
                    best = i;
                }
            }
            best
        })
        .collect()
}

/// Mean of each cluster's members; clusters left empty keep their previous
/// centroid.
fn recompute(
    rows: &[Vec<f64>],
    labels: &[usize],
    k: usize,
    previous: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let dim = rows[0].len();
    let mut sums = vec![vec![0.0; dim]; k];
    let mut counts = vec![0usize; k];

    for (row, &label) in rows.iter().zip(labels) {
        counts[label] += 1;
        for (s, x) in sums[label].iter_mut().zip(row) {
            *s += x;
        }
    }

    sums.into_iter()
        .zip(counts)
        .enumerate()
        .map(|(i, (sum, count))| {
            if count == 0 {
                previous[i].clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}

fn sq_dist(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f64>> {
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.0, 0.1, 0.9],
        ]
    }

    #[test]
    fn test_separates_two_blobs() {
        let labels = KMeans::new(2, 42).fit(&two_blobs());

        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[0], labels[2]);
    }

    #[test]
    fn test_deterministic_across_calls() {
        let rows = two_blobs();
        let a = KMeans::new(2, 42).fit(&rows);
        let b = KMeans::new(2, 42).fit(&rows);
        assert_eq!(a, b);
    }

    #[test]
    fn test_seed_changes_are_still_valid_partitions() {
        let rows = two_blobs();
        for seed in [0, 1, 7, 42, 1234] {
            let labels = KMeans::new(2, seed).fit(&rows);
            assert_eq!(labels.len(), rows.len());
            assert!(labels.contains(&0));
            assert!(labels.contains(&1));
        }
    }

    #[test]
    fn test_k_equals_n_gives_singletons() {
        let rows = two_blobs();
        let labels = KMeans::new(4, 42).fit(&rows);

        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_cluster() {
        let labels = KMeans::new(1, 42).fit(&two_blobs());
        assert_eq!(labels, vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_every_cluster_nonempty_with_duplicate_rows() {
        let rows = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let labels = KMeans::new(2, 42).fit(&rows);

        assert!(labels.contains(&0));
        assert!(labels.contains(&1));
    }
}
