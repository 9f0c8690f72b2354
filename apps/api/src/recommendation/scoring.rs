//! Component scores and their weighted blend.
//!
//! final = W1·role + W2·affinity + W3·readiness + W4·cluster + W5·quality

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::catalog::{CourseReviewStats, Skill};
use crate::models::ids::{CourseId, SkillId};
use crate::recommendation::vectors::{cosine_similarity, CourseVectors};
use crate::recommendation::weights::ScoringWeights;

/// Used as the review prior when the store holds no reviews at all.
const DEFAULT_PRIOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub role: f64,
    pub affinity: f64,
    pub readiness: f64,
    pub cluster: u8,
    pub quality: f64,
}

impl ComponentScores {
    pub fn combine(&self, weights: &ScoringWeights) -> f64 {
        weights.role * self.role
            + weights.affinity * self.affinity
            + weights.readiness * self.readiness
            + weights.cluster * f64::from(self.cluster)
            + weights.quality * self.quality
    }
}

/// Mean relevance of `course` over the required technical skills.
pub fn role_score(vectors: &CourseVectors, course: CourseId, required: &BTreeSet<SkillId>) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let total: f64 = required
        .iter()
        .map(|&skill| vectors.relevance(course, skill))
        .sum();
    total / required.len() as f64
}

/// Role score for every course in `courses`.
pub fn role_scores(
    vectors: &CourseVectors,
    courses: impl IntoIterator<Item = CourseId>,
    required: &BTreeSet<SkillId>,
) -> HashMap<CourseId, f64> {
    courses
        .into_iter()
        .map(|c| (c, role_score(vectors, c, required)))
        .collect()
}

/// Fraction of the goal's human skills the student already has. Computed once per student.
pub fn soft_readiness(required: &BTreeSet<SkillId>, possessed: &BTreeSet<SkillId>) -> f64 {
    if required.is_empty() {
        return 1.0;
    }
    let missing = required.difference(possessed).count();
    1.0 - missing as f64 / required.len() as f64
}

/// Average of the `top_k` highest cosine similarities between the candidate
/// and the student's completed courses.
pub fn affinity_score(candidate: &[f64], completed: &[&[f64]], top_k: usize) -> f64 {
    if completed.is_empty() {
        return 0.0;
    }
    let mut sims: Vec<f64> = completed
        .iter()
        .map(|v| cosine_similarity(candidate, v))
        .collect();
    sims.sort_by(|a, b| b.total_cmp(a));
    sims.truncate(top_k);

    if sims.is_empty() {
        return 0.0;
    }
    sims.iter().sum::<f64>() / sims.len() as f64
}

/// Global review mean normalised to [0, 1]; 0.5 when no reviews exist.
pub fn review_prior(global_mean: Option<f64>) -> f64 {
    global_mean.map(|m| m / 10.0).unwrap_or(DEFAULT_PRIOR)
}

/// Bayesian-smoothed review quality: (m·C + n·q_raw) / (m + n).
/// A course without reviews collapses to the prior exactly.
pub fn smoothed_quality(stats: Option<&CourseReviewStats>, prior: f64, prior_m: f64) -> f64 {
    let (n, q_raw) = match stats {
        Some(s) if s.count > 0 => (f64::from(s.count), s.mean.map(|m| m / 10.0).unwrap_or(prior)),
        _ => return prior,
    };
    let denom = prior_m + n;
    if denom <= 0.0 {
        return prior;
    }
    (prior_m * prior + n * q_raw) / denom
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillMatch {
    pub skill_id: SkillId,
    pub name: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnicalSkillCoverage {
    pub matched: Vec<SkillMatch>,
    pub missing: Vec<SkillId>,
}

/// Splits the required technical skills into those the course teaches
/// (positive relevance) and those it does not.
pub fn technical_coverage(
    vectors: &CourseVectors,
    course: CourseId,
    required: &BTreeSet<SkillId>,
    skill_names: &HashMap<SkillId, &Skill>,
) -> TechnicalSkillCoverage {
    let mut coverage = TechnicalSkillCoverage::default();
    for &skill_id in required {
        let relevance = vectors.relevance(course, skill_id);
        if relevance > 0.0 {
            coverage.matched.push(SkillMatch {
                skill_id,
                name: skill_names
                    .get(&skill_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                relevance_score: relevance,
            });
        } else {
            coverage.missing.push(skill_id);
        }
    }
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{Course, CourseSkill, SkillType};

    const EPS: f64 = 1e-9;

    fn skill(id: i64, name: &str) -> Skill {
        Skill {
            id: SkillId(id),
            name: name.to_string(),
            skill_type: SkillType::Technical,
        }
    }

    fn set(raw: &[i64]) -> BTreeSet<SkillId> {
        raw.iter().copied().map(SkillId).collect()
    }

    fn vectors_with(rows: &[(i64, i64, f64)]) -> CourseVectors {
        let skills = [skill(1, "A"), skill(2, "B"), skill(3, "C")];
        let courses: Vec<Course> = (1..=3)
            .map(|id| Course {
                id: CourseId(id),
                name: format!("course-{id}"),
            })
            .collect();
        let rows: Vec<CourseSkill> = rows
            .iter()
            .map(|&(c, s, r)| CourseSkill {
                course_id: CourseId(c),
                skill_id: SkillId(s),
                relevance: Some(r),
            })
            .collect();
        CourseVectors::build(&skills, &courses, &rows)
    }

    #[test]
    fn test_role_score_averages_required_skills() {
        let vectors = vectors_with(&[(1, 1, 0.8)]);
        let score = role_score(&vectors, CourseId(1), &set(&[1, 2]));
        assert!((score - 0.4).abs() < EPS, "Score was {score}");
    }

    #[test]
    fn test_role_score_empty_requirements_is_zero() {
        let vectors = vectors_with(&[(1, 1, 0.8)]);
        assert_eq!(role_score(&vectors, CourseId(1), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_role_score_unknown_skill_counts_as_zero() {
        let vectors = vectors_with(&[(1, 1, 1.0)]);
        let score = role_score(&vectors, CourseId(1), &set(&[1, 99]));
        assert!((score - 0.5).abs() < EPS);
    }

    #[test]
    fn test_soft_readiness() {
        assert_eq!(soft_readiness(&BTreeSet::new(), &set(&[1])), 1.0);
        assert_eq!(soft_readiness(&BTreeSet::new(), &BTreeSet::new()), 1.0);
        assert!((soft_readiness(&set(&[1, 2, 3, 4]), &set(&[2, 4, 9])) - 0.5).abs() < EPS);
        assert_eq!(soft_readiness(&set(&[1]), &BTreeSet::new()), 0.0);
    }

    #[test]
    fn test_affinity_no_completed_is_zero() {
        assert_eq!(affinity_score(&[1.0, 0.0], &[], 3), 0.0);
    }

    #[test]
    fn test_affinity_averages_top_k() {
        let candidate = [1.0, 0.0];
        let same: &[f64] = &[2.0, 0.0];
        let orthogonal: &[f64] = &[0.0, 1.0];
        let zero: &[f64] = &[0.0, 0.0];
        // sims: 1.0, 0.0, 0.0 → top 1 = 1.0, top 2 = 0.5
        assert!((affinity_score(&candidate, &[orthogonal, same, zero], 1) - 1.0).abs() < EPS);
        assert!((affinity_score(&candidate, &[orthogonal, same, zero], 2) - 0.5).abs() < EPS);
    }

    #[test]
    fn test_affinity_top_k_zero_is_zero() {
        let other: &[f64] = &[1.0];
        assert_eq!(affinity_score(&[1.0], &[other], 0), 0.0);
    }

    #[test]
    fn test_review_prior_defaults_to_half() {
        assert_eq!(review_prior(None), 0.5);
        assert!((review_prior(Some(7.0)) - 0.7).abs() < EPS);
    }

    #[test]
    fn test_smoothed_quality_no_reviews_is_prior() {
        let prior = review_prior(Some(7.0));
        assert_eq!(smoothed_quality(None, prior, 5.0), prior);
        let empty = CourseReviewStats {
            count: 0,
            mean: None,
        };
        assert_eq!(smoothed_quality(Some(&empty), prior, 5.0), prior);
    }

    #[test]
    fn test_smoothed_quality_blends_with_prior() {
        // (5·0.5 + 5·0.9) / 10 = 0.7
        let stats = CourseReviewStats {
            count: 5,
            mean: Some(9.0),
        };
        let q = smoothed_quality(Some(&stats), 0.5, 5.0);
        assert!((q - 0.7).abs() < EPS, "Quality was {q}");
    }

    #[test]
    fn test_smoothed_quality_zero_prior_strength() {
        let stats = CourseReviewStats {
            count: 2,
            mean: Some(6.0),
        };
        assert!((smoothed_quality(Some(&stats), 0.5, 0.0) - 0.6).abs() < EPS);
    }

    #[test]
    fn test_combine_uses_weights() {
        let scores = ComponentScores {
            role: 1.0,
            affinity: 1.0,
            readiness: 1.0,
            cluster: 1,
            quality: 1.0,
        };
        let w = ScoringWeights::default();
        assert!((scores.combine(&w) - w.sum()).abs() < EPS);

        let zero = ComponentScores {
            role: 0.0,
            affinity: 0.0,
            readiness: 0.0,
            cluster: 0,
            quality: 0.0,
        };
        assert_eq!(zero.combine(&w), 0.0);
    }

    #[test]
    fn test_technical_coverage_matched_and_missing() {
        let vectors = vectors_with(&[(1, 1, 0.8), (1, 2, 0.0)]);
        let skills = [skill(1, "A"), skill(2, "B")];
        let names: HashMap<SkillId, &Skill> = skills.iter().map(|s| (s.id, s)).collect();
        let coverage = technical_coverage(&vectors, CourseId(1), &set(&[1, 2]), &names);
        assert_eq!(
            coverage.matched,
            vec![SkillMatch {
                skill_id: SkillId(1),
                name: "A".to_string(),
                relevance_score: 0.8,
            }]
        );
        assert_eq!(coverage.missing, vec![SkillId(2)]);
    }
}
