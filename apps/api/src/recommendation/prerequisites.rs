use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::catalog::PrerequisiteMap;
use crate::models::ids::CourseId;

/// A candidate held back because the student lacks some of its prerequisites.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockedCourse {
    pub course_id: CourseId,
    pub missing_prereqs: Vec<CourseId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteSplit {
    pub eligible: Vec<CourseId>,
    pub blocked: Vec<BlockedCourse>,
}

#[cfg(test)]
impl PrerequisiteSplit {
    pub fn is_blocked(&self, course: CourseId) -> bool {
        self.blocked.iter().any(|b| b.course_id == course)
    }
}

/// Splits candidates into eligible and blocked sets.
///
/// With `enforce` off every candidate is eligible and nothing is blocked.
/// Otherwise a candidate is blocked when `required - completed` is non-empty;
/// a course with no prerequisite entry is always eligible.
pub fn filter_prerequisites(
    candidates: &[CourseId],
    prerequisites: &PrerequisiteMap,
    completed: &BTreeSet<CourseId>,
    enforce: bool,
) -> PrerequisiteSplit {
    if !enforce {
        return PrerequisiteSplit {
            eligible: candidates.to_vec(),
            blocked: Vec::new(),
        };
    }

    let mut split = PrerequisiteSplit::default();
    for &course in candidates {
        let missing: Vec<CourseId> = prerequisites
            .get(&course)
            .map(|required| required.difference(completed).copied().collect())
            .unwrap_or_default();

        if missing.is_empty() {
            split.eligible.push(course);
        } else {
            split.blocked.push(BlockedCourse {
                course_id: course,
                missing_prereqs: missing,
            });
        }
    }
    split
}
