mod generate_clusters;
mod metrics;

use std::time::Instant;

use fnv::FnvHashMap;
use fxhash::FxHashSet;
use itertools::Itertools;
use simgroup::clustering::Representative;
use simgroup::{Corpus, GrouperConfig, Result, StringGrouper};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::generate_clusters::*;
use crate::metrics::Metrics;

/// Flattens the generated clusters into one corpus. Returns the corpus and
/// the point id behind every position.
fn build_corpus(generated_clusters: &[GeneratedCluster]) -> (Corpus, Vec<u32>) {
    let mut ids = Vec::new();
    let mut strings = Vec::new();
    for cluster in generated_clusters {
        for (id, point) in cluster.points.iter().sorted_by_key(|(id, _)| **id) {
            ids.push(*id);
            strings.push(point.clone());
        }
    }
    (Corpus::new(strings), ids)
}

fn run_grouping(generated_clusters: &[GeneratedCluster], min_similarity: f64) -> Result<()> {
    let (corpus, ids) = build_corpus(generated_clusters);
    let config = GrouperConfig::builder().min_similarity(min_similarity).build()?;
    let grouper = StringGrouper::with_config(corpus, None, config);

    let now = Instant::now();
    let grouper = grouper.fitted()?;
    let elapsed = now.elapsed();

    let labels: Vec<usize> = grouper
        .representatives()?
        .into_iter()
        .map(|representative| match representative {
            Representative::Left(i) | Representative::Right(i) => i,
        })
        .collect();
    let mut members: FnvHashMap<usize, FxHashSet<u32>> = FnvHashMap::default();
    for (position, label) in labels.iter().enumerate() {
        members.entry(*label).or_default().insert(ids[position]);
    }
    let position_of: FnvHashMap<u32, usize> = ids.iter().enumerate().map(|(p, id)| (*id, p)).collect();

    let mut metrics = Metrics::new();
    let empty = FxHashSet::default();
    for generated_cluster in generated_clusters {
        let reference: FxHashSet<u32> = generated_cluster.points.keys().copied().collect();
        let majority = reference
            .iter()
            .filter_map(|id| position_of.get(id))
            .map(|position| labels[*position])
            .counts()
            .into_iter()
            .max_by_key(|(label, count)| (*count, std::cmp::Reverse(*label)))
            .map(|(label, _)| label);
        let found = majority.and_then(|label| members.get(&label)).unwrap_or(&empty);
        metrics.update_metrics(found, &reference);
    }
    info!(
        min_similarity,
        millis = elapsed.as_millis() as u64,
        groups = members.len(),
        matches = grouper.match_records()?.len(),
        "grouped corpus"
    );
    println!("min_similarity {} {:?}", min_similarity, metrics.get_result());
    Ok(())
}

fn run_matching(generated_clusters: &[GeneratedCluster], min_similarity: f64) -> Result<()> {
    let master = Corpus::new(generated_clusters.iter().map(|cluster| cluster.centroid.clone()));
    let (duplicates, ids) = build_corpus(generated_clusters);
    let cluster_of: FnvHashMap<u32, usize> = generated_clusters
        .iter()
        .flat_map(|cluster| cluster.points.keys().map(move |id| (*id, cluster.id)))
        .collect();
    let config = GrouperConfig::builder().min_similarity(min_similarity).build()?;

    let now = Instant::now();
    let grouper = StringGrouper::with_config(master, Some(duplicates), config).fitted()?;
    let elapsed = now.elapsed();

    let representatives = grouper.representatives()?;
    let correct = representatives
        .iter()
        .zip(ids.iter())
        .filter(|(representative, id)| match representative {
            Representative::Left(master) => cluster_of.get(*id) == Some(master),
            Representative::Right(_) => false,
        })
        .count();
    info!(min_similarity, millis = elapsed.as_millis() as u64, "matched duplicates against centroids");
    println!(
        "min_similarity {} matched to own centroid {:.4}",
        min_similarity,
        correct as f64 / representatives.len().max(1) as f64
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let generator = ClusterGenerator::new(20, 40, 500, 3, DifferenceMode::DiffIndices, 42);
    let generated_clusters = generator.generate();
    println!("Generated {} clusters", generated_clusters.len());

    for min_similarity in [0.5, 0.6, 0.7, 0.8] {
        run_grouping(&generated_clusters, min_similarity)?;
        run_matching(&generated_clusters, min_similarity)?;
    }

    let generator = ClusterGenerator::new(20, 40, 500, 3, DifferenceMode::SameIndices, 7);
    let generated_clusters = generator.generate();
    run_grouping(&generated_clusters, 0.6)?;
    Ok(())
}
