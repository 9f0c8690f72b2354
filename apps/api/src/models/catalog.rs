use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::ids::{CareerGoalId, ClusterId, CourseId, SkillId, StudentId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Technical,
    Human,
}

impl SkillType {
    /// Maps the `skills.type` column. Anything other than `human` is technical.
    pub fn from_column(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("human") {
            SkillType::Human
        } else {
            SkillType::Technical
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub skill_type: SkillType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
}

/// One row of the course↔skill relevance table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CourseSkill {
    pub course_id: CourseId,
    pub skill_id: SkillId,
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
}

/// Skills a career goal asks for. An unknown goal resolves to two empty sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CareerGoalRequirements {
    pub technical: BTreeSet<SkillId>,
    pub human: BTreeSet<SkillId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: StudentId,
    pub completed_courses: BTreeSet<CourseId>,
    pub human_skills: BTreeSet<SkillId>,
    pub career_goal_id: Option<CareerGoalId>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CourseReviewStats {
    pub count: u32,
    /// Mean `final_score` on the 0–10 scale.
    pub mean: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewStats {
    pub per_course: HashMap<CourseId, CourseReviewStats>,
    /// Mean over every review in the store, 0–10 scale. `None` when there are no reviews.
    pub global_mean: Option<f64>,
}

/// course → courses that must be completed first
pub type PrerequisiteMap = HashMap<CourseId, BTreeSet<CourseId>>;

/// course → clusters it belongs to
pub type ClusterMembership = HashMap<CourseId, Vec<Cluster>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_type_from_column() {
        assert_eq!(SkillType::from_column("human"), SkillType::Human);
        assert_eq!(SkillType::from_column("Human"), SkillType::Human);
        assert_eq!(SkillType::from_column("technical"), SkillType::Technical);
        assert_eq!(SkillType::from_column(""), SkillType::Technical);
    }
}
