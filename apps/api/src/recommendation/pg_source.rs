use std::collections::BTreeSet;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;
use crate::models::catalog::{
    CareerGoalRequirements, Cluster, ClusterMembership, Course, CourseReviewStats, CourseSkill,
    PrerequisiteMap, ReviewStats, Skill, SkillType, StudentRecord,
};
use crate::models::ids::{CareerGoalId, ClusterId, CourseId, SkillId, StudentId};
use crate::recommendation::source::CatalogSource;

/// `CatalogSource` backed by the application's Postgres schema.
#[derive(Clone)]
pub struct PgCatalogSource {
    pool: PgPool,
}

impl PgCatalogSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StudentRow {
    id: i64,
    career_goal_id: Option<i64>,
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct SkillRow {
    id: i64,
    name: String,
    #[sqlx(rename = "type")]
    skill_type: String,
}

#[derive(Debug, FromRow)]
struct CourseSkillRow {
    course_id: i64,
    skill_id: i64,
    relevance_score: Option<f64>,
}

#[derive(Debug, FromRow)]
struct CourseClusterRow {
    course_id: i64,
    cluster_id: i64,
    name: String,
}

#[derive(Debug, FromRow)]
struct ReviewStatsRow {
    course_id: i64,
    n: i64,
    avg: Option<f64>,
}

#[derive(Debug, FromRow)]
struct PrerequisiteRow {
    course_id: i64,
    required_course_id: i64,
}

#[async_trait]
impl CatalogSource for PgCatalogSource {
    async fn student(&self, id: StudentId) -> Result<Option<StudentRecord>, AppError> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT id, career_goal_id FROM students WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let completed: Vec<i64> = sqlx::query_scalar(
            "SELECT course_id FROM student_courses_taken WHERE student_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let human: Vec<i64> = sqlx::query_scalar(
            "SELECT skill_id FROM student_human_skills WHERE student_id = $1",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(StudentRecord {
            id: StudentId(row.id),
            completed_courses: completed.into_iter().map(CourseId).collect(),
            human_skills: human.into_iter().map(SkillId).collect(),
            career_goal_id: row.career_goal_id.map(CareerGoalId),
        }))
    }

    async fn courses(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query_as::<_, CourseRow>("SELECT id, name FROM courses ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Course {
                id: CourseId(r.id),
                name: r.name,
            })
            .collect())
    }

    async fn skills(&self) -> Result<Vec<Skill>, AppError> {
        let rows =
            sqlx::query_as::<_, SkillRow>("SELECT id, name, type FROM skills ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| Skill {
                id: SkillId(r.id),
                name: r.name,
                skill_type: SkillType::from_column(&r.skill_type),
            })
            .collect())
    }

    async fn course_skills(&self) -> Result<Vec<CourseSkill>, AppError> {
        let rows = sqlx::query_as::<_, CourseSkillRow>(
            "SELECT course_id, skill_id, relevance_score FROM course_skills",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| CourseSkill {
                course_id: CourseId(r.course_id),
                skill_id: SkillId(r.skill_id),
                relevance: r.relevance_score,
            })
            .collect())
    }

    async fn career_goal_requirements(
        &self,
        goal: CareerGoalId,
    ) -> Result<CareerGoalRequirements, AppError> {
        let technical: Vec<i64> = sqlx::query_scalar(
            "SELECT skill_id FROM career_goal_technical_skills WHERE career_goal_id = $1",
        )
        .bind(goal.0)
        .fetch_all(&self.pool)
        .await?;

        let human: Vec<i64> = sqlx::query_scalar(
            "SELECT skill_id FROM career_goal_human_skills WHERE career_goal_id = $1",
        )
        .bind(goal.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(CareerGoalRequirements {
            technical: technical.into_iter().map(SkillId).collect::<BTreeSet<_>>(),
            human: human.into_iter().map(SkillId).collect::<BTreeSet<_>>(),
        })
    }

    async fn course_clusters(&self) -> Result<ClusterMembership, AppError> {
        let rows = sqlx::query_as::<_, CourseClusterRow>(
            r#"
            SELECT cc.course_id, cc.cluster_id, c.name
            FROM course_clusters cc
            JOIN clusters c ON c.id = cc.cluster_id
            ORDER BY cc.course_id, cc.cluster_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut membership = ClusterMembership::new();
        for row in rows {
            membership
                .entry(CourseId(row.course_id))
                .or_default()
                .push(Cluster {
                    id: ClusterId(row.cluster_id),
                    name: row.name,
                });
        }
        Ok(membership)
    }

    async fn review_stats(&self) -> Result<ReviewStats, AppError> {
        let rows = sqlx::query_as::<_, ReviewStatsRow>(
            r#"
            SELECT course_id, COUNT(*) AS n, AVG(final_score)::float8 AS avg
            FROM course_reviews
            GROUP BY course_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let global_mean: Option<f64> =
            sqlx::query_scalar("SELECT AVG(final_score)::float8 FROM course_reviews")
                .fetch_one(&self.pool)
                .await?;

        let mut stats = ReviewStats {
            global_mean,
            ..ReviewStats::default()
        };
        for row in rows {
            let count = u32::try_from(row.n)
                .with_context(|| format!("review count {} out of range", row.n))?;
            stats.per_course.insert(
                CourseId(row.course_id),
                CourseReviewStats {
                    count,
                    mean: row.avg,
                },
            );
        }
        Ok(stats)
    }

    async fn prerequisites(&self) -> Result<PrerequisiteMap, AppError> {
        let rows = sqlx::query_as::<_, PrerequisiteRow>(
            "SELECT course_id, required_course_id FROM course_prerequisites",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut map = PrerequisiteMap::new();
        for row in rows {
            map.entry(CourseId(row.course_id))
                .or_default()
                .insert(CourseId(row.required_course_id));
        }
        Ok(map)
    }
}
