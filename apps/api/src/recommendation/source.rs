//! Data gathering, one upfront batch fetch per request.
//!
//! `CatalogSource` is the read-only collaborator the engine pulls from. Every
//! query runs before scoring starts, so the scorer is a pure function over the
//! resulting `Snapshot`.

use std::collections::{BTreeSet, HashSet};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::models::catalog::{
    CareerGoalRequirements, ClusterMembership, Course, CourseSkill, PrerequisiteMap, ReviewStats,
    Skill, StudentRecord,
};
use crate::models::ids::{CareerGoalId, CourseId, SkillId, StudentId};

/// Read-only queries the engine needs. Implementations must be safe to call
/// from concurrent requests.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn student(&self, id: StudentId) -> Result<Option<StudentRecord>, AppError>;

    async fn courses(&self) -> Result<Vec<Course>, AppError>;

    async fn skills(&self) -> Result<Vec<Skill>, AppError>;

    async fn course_skills(&self) -> Result<Vec<CourseSkill>, AppError>;

    /// Unknown goals resolve to empty requirement sets, not an error.
    async fn career_goal_requirements(
        &self,
        goal: CareerGoalId,
    ) -> Result<CareerGoalRequirements, AppError>;

    async fn course_clusters(&self) -> Result<ClusterMembership, AppError>;

    async fn review_stats(&self) -> Result<ReviewStats, AppError>;

    async fn prerequisites(&self) -> Result<PrerequisiteMap, AppError>;
}

/// Everything one recommendation needs, fetched in a single pass.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub student: StudentRecord,
    /// Sorted by ascending course id.
    pub courses: Vec<Course>,
    pub skills: Vec<Skill>,
    pub course_skills: Vec<CourseSkill>,
    pub requirements: CareerGoalRequirements,
    pub clusters: ClusterMembership,
    pub reviews: ReviewStats,
    pub prerequisites: PrerequisiteMap,
}

/// Fetches the full snapshot for one request.
///
/// Fails with `NotFound` when the student does not resolve. Completed-course and
/// human-skill ids that are not in the catalog are dropped.
pub async fn gather_snapshot(
    source: &dyn CatalogSource,
    student_id: StudentId,
    career_goal_id: CareerGoalId,
) -> Result<Snapshot, AppError> {
    let student = fetch_student(source, student_id).await?;
    gather_snapshot_for(source, student, career_goal_id).await
}

pub async fn fetch_student(
    source: &dyn CatalogSource,
    student_id: StudentId,
) -> Result<StudentRecord, AppError> {
    source
        .student(student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))
}

/// Same as [`gather_snapshot`] for a student record the caller already holds.
pub async fn gather_snapshot_for(
    source: &dyn CatalogSource,
    student: StudentRecord,
    career_goal_id: CareerGoalId,
) -> Result<Snapshot, AppError> {
    let student_id = student.id;

    let mut courses = source.courses().await?;
    courses.sort_by_key(|c| c.id);
    courses.dedup_by_key(|c| c.id);

    let skills = source.skills().await?;
    let course_skills = source.course_skills().await?;
    let requirements = source.career_goal_requirements(career_goal_id).await?;
    let clusters = source.course_clusters().await?;
    let reviews = source.review_stats().await?;
    let prerequisites = source.prerequisites().await?;

    let student = normalize_student(student, &courses, &skills);

    debug!(
        student_id = %student_id,
        career_goal_id = %career_goal_id,
        courses = courses.len(),
        skills = skills.len(),
        relevance_rows = course_skills.len(),
        completed = student.completed_courses.len(),
        "Gathered recommendation snapshot"
    );

    Ok(Snapshot {
        student,
        courses,
        skills,
        course_skills,
        requirements,
        clusters,
        reviews,
        prerequisites,
    })
}

fn normalize_student(mut student: StudentRecord, courses: &[Course], skills: &[Skill]) -> StudentRecord {
    let known_courses: HashSet<CourseId> = courses.iter().map(|c| c.id).collect();
    let known_skills: HashSet<SkillId> = skills.iter().map(|s| s.id).collect();

    student.completed_courses = student
        .completed_courses
        .into_iter()
        .filter(|c| known_courses.contains(c))
        .collect::<BTreeSet<_>>();
    student.human_skills = student
        .human_skills
        .into_iter()
        .filter(|s| known_skills.contains(s))
        .collect::<BTreeSet<_>>();
    student
}
