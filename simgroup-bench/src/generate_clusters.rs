use fxhash::FxHashMap;
use rand::distributions::{Distribution, Uniform};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::info;

const ALPHABET: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J',
    'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ',
];

pub struct GeneratedCluster {
    pub id: usize,
    pub points: FxHashMap<u32, String>,

    // The string every point of the cluster was derived from
    pub centroid: String,
}

/// DifferenceMode indicates whether the typos in the same cluster are in the same or
/// different character positions.
///
/// When DifferenceMode is SameIndices we choose num_changes random positions
/// once per generated cluster, and replace the characters at those positions
/// in every cluster string.
///
/// When DifferenceMode is DiffIndices we choose random positions for every cluster string.
#[derive(Debug, PartialOrd, PartialEq)]
pub enum DifferenceMode {
    SameIndices,
    DiffIndices,
}

pub struct ClusterGenerator {
    pub cluster_size: usize,
    pub string_len: usize,
    pub num_clusters: usize,
    pub num_changes: usize,
    pub mode: DifferenceMode,
    pub seed: u64,
}

impl ClusterGenerator {
    pub fn new(cluster_size: usize, string_len: usize, num_clusters: usize,
               num_changes: usize, mode: DifferenceMode, seed: u64) -> Self {
        ClusterGenerator {
            cluster_size,
            string_len,
            num_clusters,
            num_changes,
            mode,
            seed,
        }
    }

    pub fn generate(&self) -> Vec<GeneratedCluster> {
        let point_id_seq = AtomicU32::new(0);
        info!(clusters = self.num_clusters, size = self.cluster_size, changes = self.num_changes, "generating clusters");
        (0..self.num_clusters)
            .into_par_iter()
            .map(|i| self.generate_cluster(&point_id_seq, i))
            .collect()
    }

    fn generate_cluster(&self, point_id_sequence: &AtomicU32, cluster_id: usize) -> GeneratedCluster {
        let mut rng = Pcg64::seed_from_u64(self.seed ^ (cluster_id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        let chars = Uniform::new(0, ALPHABET.len());
        let positions = Uniform::new(0, self.string_len);
        let centroid: Vec<char> = chars.sample_iter(&mut rng).take(self.string_len).map(|c| ALPHABET[c]).collect();
        let fixed_positions: Vec<usize> = positions.sample_iter(&mut rng).take(self.num_changes).collect();

        let mut points = FxHashMap::default();
        for _ in 0..self.cluster_size {
            let mut point = centroid.clone();
            for j in 0..self.num_changes {
                let position = match self.mode {
                    DifferenceMode::SameIndices => fixed_positions[j],
                    DifferenceMode::DiffIndices => positions.sample(&mut rng),
                };
                point[position] = ALPHABET[rng.sample(chars)];
            }
            points.insert(
                point_id_sequence.fetch_add(1, Ordering::Relaxed),
                point.into_iter().collect(),
            );
        }

        GeneratedCluster {
            id: cluster_id,
            points,
            centroid: centroid.into_iter().collect(),
        }
    }
}
