//! Dense per-course skill vectors over a shared skill index.
//!
//! The index is rebuilt for every request from the full skill catalog, ordered by
//! ascending skill id, so two snapshots with the same catalog always produce the
//! same vectors no matter what order the rows arrived in.

use std::collections::HashMap;

use crate::models::catalog::{Course, CourseSkill, Skill};
use crate::models::ids::{CourseId, SkillId};

/// Maps each known skill to its position in every course vector.
#[derive(Debug, Clone, Default)]
pub struct SkillIndex {
    positions: HashMap<SkillId, usize>,
}

impl SkillIndex {
    pub fn from_catalog(skills: &[Skill]) -> Self {
        let mut ids: Vec<SkillId> = skills.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();

        let positions = ids.into_iter().enumerate().map(|(i, id)| (id, i)).collect();
        Self { positions }
    }

    pub fn position(&self, skill: SkillId) -> Option<usize> {
        self.positions.get(&skill).copied()
    }

    /// Vector dimensionality: number of distinct skills in the catalog.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CourseVectors {
    index: SkillIndex,
    vectors: HashMap<CourseId, Vec<f64>>,
}

impl CourseVectors {
    /// Builds one zero-initialised vector per catalog course and writes each
    /// relevance row into it. Rows naming a skill or course outside the catalog
    /// are skipped; a missing relevance counts as 0.0.
    pub fn build(skills: &[Skill], courses: &[Course], rows: &[CourseSkill]) -> Self {
        let index = SkillIndex::from_catalog(skills);
        let dim = index.len();

        let mut vectors: HashMap<CourseId, Vec<f64>> =
            courses.iter().map(|c| (c.id, vec![0.0; dim])).collect();

        for row in rows {
            let Some(pos) = index.position(row.skill_id) else {
                continue;
            };
            if let Some(vector) = vectors.get_mut(&row.course_id) {
                vector[pos] = row.relevance.unwrap_or(0.0);
            }
        }

        Self { index, vectors }
    }

    pub fn get(&self, course: CourseId) -> Option<&[f64]> {
        self.vectors.get(&course).map(Vec::as_slice)
    }

    /// Relevance of `skill` for `course`; 0.0 when either is unknown.
    pub fn relevance(&self, course: CourseId, skill: SkillId) -> f64 {
        match (self.get(course), self.index.position(skill)) {
            (Some(vector), Some(pos)) => vector[pos],
            _ => 0.0,
        }
    }
}

/// Cosine similarity; 0.0 whenever either side has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}
