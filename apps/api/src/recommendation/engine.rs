//! Recommendation engine: ties the pipeline together.
//!
//! Pipeline: gather → vectors → prerequisite split → role scores → cluster
//! inference → per-candidate scoring → rank and assemble.
//! Everything after gathering is synchronous and pure over the snapshot.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::catalog::{Cluster, Skill, StudentRecord};
use crate::models::ids::{CareerGoalId, CourseId, SkillId, StudentId};
use crate::recommendation::clusters::infer_goal_clusters;
use crate::recommendation::prerequisites::{filter_prerequisites, BlockedCourse};
use crate::recommendation::scoring::{
    affinity_score, review_prior, role_scores, smoothed_quality, soft_readiness,
    technical_coverage, ComponentScores, SkillMatch,
};
use crate::recommendation::source::{
    gather_snapshot, gather_snapshot_for, CatalogSource, Snapshot,
};
use crate::recommendation::vectors::CourseVectors;
use crate::recommendation::weights::ScoringConfig;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// One ranked course with every sub-score and the evidence behind it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CourseRecommendation {
    pub course_id: CourseId,
    pub name: String,
    pub final_score: f64,
    pub s_role: f64,
    pub s_affinity: f64,
    pub soft_readiness: f64,
    pub s_cluster: u8,
    pub q_smoothed: f64,
    pub avg_score_raw: Option<f64>,
    pub review_count: u32,
    pub matched_technical_skills: Vec<SkillMatch>,
    pub missing_technical_skills: Vec<SkillId>,
    pub course_clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub soft_readiness: f64,
    pub inferred_goal_clusters: Vec<Cluster>,
    pub recommendations: Vec<CourseRecommendation>,
    pub blocked_courses: Vec<BlockedCourse>,
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Gathers a snapshot from `source` and scores it.
///
/// Fails only when `k` is zero or the student does not resolve.
pub async fn recommend(
    source: &dyn CatalogSource,
    student_id: StudentId,
    career_goal_id: CareerGoalId,
    k: usize,
    enforce_prereqs: bool,
    config: &ScoringConfig,
) -> Result<RecommendationResult, AppError> {
    validate_k(k)?;

    let snapshot = gather_snapshot(source, student_id, career_goal_id).await?;
    Ok(score_snapshot(&snapshot, career_goal_id, k, enforce_prereqs, config))
}

/// Like [`recommend`] for a student record the caller has already resolved.
pub async fn recommend_for_student(
    source: &dyn CatalogSource,
    student: StudentRecord,
    career_goal_id: CareerGoalId,
    k: usize,
    enforce_prereqs: bool,
    config: &ScoringConfig,
) -> Result<RecommendationResult, AppError> {
    validate_k(k)?;

    let snapshot = gather_snapshot_for(source, student, career_goal_id).await?;
    Ok(score_snapshot(&snapshot, career_goal_id, k, enforce_prereqs, config))
}

fn score_snapshot(
    snapshot: &Snapshot,
    career_goal_id: CareerGoalId,
    k: usize,
    enforce_prereqs: bool,
    config: &ScoringConfig,
) -> RecommendationResult {
    let result = recommend_from_snapshot(snapshot, k, enforce_prereqs, config);

    info!(
        student_id = %snapshot.student.id,
        career_goal_id = %career_goal_id,
        returned = result.recommendations.len(),
        blocked = result.blocked_courses.len(),
        "Computed course recommendations"
    );

    result
}

/// Rejects `k == 0`; a request must ask for at least one course.
pub fn validate_k(k: usize) -> Result<(), AppError> {
    if k == 0 {
        return Err(AppError::UnprocessableEntity(
            "k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Scores every eligible candidate in `snapshot` and returns the top `k`.
pub fn recommend_from_snapshot(
    snapshot: &Snapshot,
    k: usize,
    enforce_prereqs: bool,
    config: &ScoringConfig,
) -> RecommendationResult {
    let student = &snapshot.student;
    let completed = &student.completed_courses;
    let required_tech = &snapshot.requirements.technical;

    let vectors = CourseVectors::build(&snapshot.skills, &snapshot.courses, &snapshot.course_skills);

    // Candidates: every course not yet completed, in ascending id order.
    let candidates: Vec<CourseId> = snapshot
        .courses
        .iter()
        .map(|c| c.id)
        .filter(|id| !completed.contains(id))
        .collect();
    let split = filter_prerequisites(
        &candidates,
        &snapshot.prerequisites,
        completed,
        enforce_prereqs,
    );

    // Role scores over all courses; blocked courses stay out of the inference pool.
    let all_courses: Vec<CourseId> = snapshot.courses.iter().map(|c| c.id).collect();
    let role = role_scores(&vectors, all_courses.iter().copied(), required_tech);
    let blocked: HashSet<CourseId> = split.blocked.iter().map(|b| b.course_id).collect();
    let pool: Vec<CourseId> = all_courses
        .into_iter()
        .filter(|id| !blocked.contains(id))
        .collect();
    let inferred = infer_goal_clusters(&pool, &role, &snapshot.clusters, config.top_n_role);

    let readiness = soft_readiness(&snapshot.requirements.human, &student.human_skills);
    let prior = review_prior(snapshot.reviews.global_mean);
    let completed_vectors: Vec<&[f64]> = completed.iter().filter_map(|&c| vectors.get(c)).collect();

    debug!(
        candidates = candidates.len(),
        eligible = split.eligible.len(),
        blocked = split.blocked.len(),
        inferred_clusters = inferred.len(),
        soft_readiness = readiness,
        "Scoring eligible candidates"
    );

    let names: HashMap<CourseId, &str> = snapshot
        .courses
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();
    let skill_names: HashMap<SkillId, &Skill> =
        snapshot.skills.iter().map(|s| (s.id, s)).collect();

    let mut scored: Vec<CourseRecommendation> = split
        .eligible
        .iter()
        .map(|&course_id| {
            let course_clusters = snapshot
                .clusters
                .get(&course_id)
                .cloned()
                .unwrap_or_default();
            let stats = snapshot.reviews.per_course.get(&course_id);

            let components = ComponentScores {
                role: role.get(&course_id).copied().unwrap_or(0.0),
                affinity: vectors
                    .get(course_id)
                    .map(|v| affinity_score(v, &completed_vectors, config.top_k_similar))
                    .unwrap_or(0.0),
                readiness,
                cluster: u8::from(inferred.intersects(&course_clusters)),
                quality: smoothed_quality(stats, prior, config.prior_m),
            };
            let coverage = technical_coverage(&vectors, course_id, required_tech, &skill_names);

            CourseRecommendation {
                course_id,
                name: names.get(&course_id).copied().unwrap_or_default().to_string(),
                final_score: components.combine(&config.weights),
                s_role: components.role,
                s_affinity: components.affinity,
                soft_readiness: components.readiness,
                s_cluster: components.cluster,
                q_smoothed: components.quality,
                avg_score_raw: stats.filter(|s| s.count > 0).and_then(|s| s.mean),
                review_count: stats.map(|s| s.count).unwrap_or(0),
                matched_technical_skills: coverage.matched,
                missing_technical_skills: coverage.missing,
                course_clusters,
            }
        })
        .collect();

    rank(&mut scored);
    scored.truncate(k);

    RecommendationResult {
        soft_readiness: readiness,
        inferred_goal_clusters: inferred.into_explanation(),
        recommendations: scored,
        blocked_courses: split.blocked,
    }
}

/// Final score descending; equal scores fall back to ascending course id.
fn rank(recommendations: &mut [CourseRecommendation]) {
    recommendations.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.course_id.cmp(&b.course_id))
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
