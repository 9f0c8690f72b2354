use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::models::catalog::{Cluster, ClusterMembership};
use crate::models::ids::{ClusterId, CourseId};

/// Clusters the student is most likely aiming at, inferred once per request.
#[derive(Debug, Clone, Default)]
pub struct InferredClusters {
    ids: HashSet<ClusterId>,
    /// One entry per (top course, cluster) pair, so repeats are kept.
    explanation: Vec<Cluster>,
}

impl InferredClusters {
    pub fn contains(&self, cluster: ClusterId) -> bool {
        self.ids.contains(&cluster)
    }

    /// True when any of `clusters` is in the inferred set.
    pub fn intersects(&self, clusters: &[Cluster]) -> bool {
        clusters.iter().any(|c| self.contains(c.id))
    }

    pub fn into_explanation(self) -> Vec<Cluster> {
        self.explanation
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Takes the `top_n` courses of `pool` by role score (ties by ascending course id)
/// and unions their cluster memberships.
pub fn infer_goal_clusters(
    pool: &[CourseId],
    role_scores: &HashMap<CourseId, f64>,
    membership: &ClusterMembership,
    top_n: usize,
) -> InferredClusters {
    let score = |c: &CourseId| role_scores.get(c).copied().unwrap_or(0.0);

    let mut ranked: Vec<CourseId> = pool.to_vec();
    ranked.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b))
    });

    let mut inferred = InferredClusters::default();
    for course in ranked.into_iter().take(top_n) {
        for cluster in membership.get(&course).into_iter().flatten() {
            inferred.ids.insert(cluster.id);
            inferred.explanation.push(cluster.clone());
        }
    }
    inferred
}
