//! In-memory `CatalogSource` backing the unit and router tests.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::catalog::{
    CareerGoalRequirements, Cluster, ClusterMembership, Course, CourseReviewStats, CourseSkill,
    PrerequisiteMap, ReviewStats, Skill, SkillType, StudentRecord,
};
use crate::models::ids::{CareerGoalId, ClusterId, CourseId, SkillId, StudentId};
use crate::recommendation::source::CatalogSource;

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    students: HashMap<StudentId, StudentRecord>,
    courses: Vec<Course>,
    skills: Vec<Skill>,
    course_skills: Vec<CourseSkill>,
    goals: HashMap<CareerGoalId, CareerGoalRequirements>,
    clusters: ClusterMembership,
    reviews: BTreeMap<CourseId, Vec<f64>>,
    prerequisites: PrerequisiteMap,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_course(mut self, id: i64, name: &str) -> Self {
        self.courses.push(Course {
            id: CourseId(id),
            name: name.to_string(),
        });
        self
    }

    pub fn with_technical_skill(self, id: i64, name: &str) -> Self {
        self.with_skill(id, name, SkillType::Technical)
    }

    pub fn with_human_skill(self, id: i64, name: &str) -> Self {
        self.with_skill(id, name, SkillType::Human)
    }

    fn with_skill(mut self, id: i64, name: &str, skill_type: SkillType) -> Self {
        self.skills.push(Skill {
            id: SkillId(id),
            name: name.to_string(),
            skill_type,
        });
        self
    }

    pub fn with_relevance(mut self, course: i64, skill: i64, relevance: f64) -> Self {
        self.course_skills.push(CourseSkill {
            course_id: CourseId(course),
            skill_id: SkillId(skill),
            relevance: Some(relevance),
        });
        self
    }

    pub fn with_student(
        mut self,
        id: i64,
        career_goal: Option<i64>,
        completed: &[i64],
        human_skills: &[i64],
    ) -> Self {
        self.students.insert(
            StudentId(id),
            StudentRecord {
                id: StudentId(id),
                completed_courses: completed.iter().copied().map(CourseId).collect(),
                human_skills: human_skills.iter().copied().map(SkillId).collect(),
                career_goal_id: career_goal.map(CareerGoalId),
            },
        );
        self
    }

    pub fn with_goal(mut self, id: i64, technical: &[i64], human: &[i64]) -> Self {
        self.goals.insert(
            CareerGoalId(id),
            CareerGoalRequirements {
                technical: technical.iter().copied().map(SkillId).collect(),
                human: human.iter().copied().map(SkillId).collect(),
            },
        );
        self
    }

    pub fn with_cluster(mut self, course: i64, cluster: i64, name: &str) -> Self {
        self.clusters
            .entry(CourseId(course))
            .or_default()
            .push(Cluster {
                id: ClusterId(cluster),
                name: name.to_string(),
            });
        self
    }

    /// Adds individual review `final_score`s (0–10) for a course.
    pub fn with_reviews(mut self, course: i64, scores: &[f64]) -> Self {
        self.reviews
            .entry(CourseId(course))
            .or_default()
            .extend_from_slice(scores);
        self
    }

    pub fn with_prerequisite(mut self, course: i64, required: i64) -> Self {
        self.prerequisites
            .entry(CourseId(course))
            .or_default()
            .insert(CourseId(required));
        self
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn student(&self, id: StudentId) -> Result<Option<StudentRecord>, AppError> {
        Ok(self.students.get(&id).cloned())
    }

    async fn courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.courses.clone())
    }

    async fn skills(&self) -> Result<Vec<Skill>, AppError> {
        Ok(self.skills.clone())
    }

    async fn course_skills(&self) -> Result<Vec<CourseSkill>, AppError> {
        Ok(self.course_skills.clone())
    }

    async fn career_goal_requirements(
        &self,
        goal: CareerGoalId,
    ) -> Result<CareerGoalRequirements, AppError> {
        Ok(self.goals.get(&goal).cloned().unwrap_or_default())
    }

    async fn course_clusters(&self) -> Result<ClusterMembership, AppError> {
        Ok(self.clusters.clone())
    }

    async fn review_stats(&self) -> Result<ReviewStats, AppError> {
        let mut stats = ReviewStats::default();
        let mut total = 0.0;
        let mut count = 0usize;

        for (&course, scores) in &self.reviews {
            if scores.is_empty() {
                continue;
            }
            let sum: f64 = scores.iter().sum();
            total += sum;
            count += scores.len();
            stats.per_course.insert(
                course,
                CourseReviewStats {
                    count: scores.len() as u32,
                    mean: Some(sum / scores.len() as f64),
                },
            );
        }

        stats.global_mean = (count > 0).then(|| total / count as f64);
        Ok(stats)
    }

    async fn prerequisites(&self) -> Result<PrerequisiteMap, AppError> {
        Ok(self.prerequisites.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_review_stats_aggregate() {
        let catalog = InMemoryCatalog::new()
            .with_reviews(1, &[8.0, 6.0])
            .with_reviews(2, &[10.0]);
        let stats = catalog.review_stats().await.unwrap();

        let first = stats.per_course[&CourseId(1)];
        assert_eq!(first.count, 2);
        assert_eq!(first.mean, Some(7.0));
        assert_eq!(stats.global_mean, Some(8.0));
    }

    #[tokio::test]
    async fn test_review_stats_empty_has_no_global_mean() {
        let stats = InMemoryCatalog::new().review_stats().await.unwrap();
        assert!(stats.per_course.is_empty());
        assert_eq!(stats.global_mean, None);
    }

    #[tokio::test]
    async fn test_unknown_goal_defaults_to_empty() {
        let reqs = InMemoryCatalog::new()
            .career_goal_requirements(CareerGoalId(5))
            .await
            .unwrap();
        assert!(reqs.technical.is_empty() && reqs.human.is_empty());
    }
}
