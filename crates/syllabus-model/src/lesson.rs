//! Parsed lesson records.

use crate::id::{ConceptId, LessonId};
use crate::order::LessonOrder;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonStatus {
    Draft,
    Review,
    Ready,
}

/// A self-check attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LessonCheck {
    Quiz {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },
    Unit {
        entry: String,
        tests: String,
    },
}

/// A "see also" link to another lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crosslink {
    pub to: LessonId,
    #[serde(default)]
    pub why: String,
}

/// Catalog metadata the consistency checks never look at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LessonExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub est_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<LessonCheck>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crosslinks: Vec<Crosslink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LessonStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<String>,
}

/// One lesson file after metadata decoding.
///
/// List fields keep the author's order; an absent or malformed field is an empty list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub id: LessonId,
    /// Path of the lesson file relative to the corpus root, `/`-separated.
    pub source: String,
    pub title: String,
    pub topic: String,
    pub level: u32,
    pub order: Option<LessonOrder>,
    pub prereqs: Vec<LessonId>,
    pub tags: Vec<String>,
    pub concepts_introduced: Vec<ConceptId>,
    pub concepts_reused: Vec<ConceptId>,
    pub canonical_for: Vec<ConceptId>,
    #[serde(default)]
    pub extras: LessonExtras,
    #[serde(default, skip_serializing)]
    pub body: String,
}

impl LessonRecord {
    /// Minimal record with every list empty; used by tests and as the loader's starting point.
    pub fn new(id: LessonId, source: impl Into<String>) -> Self {
        Self {
            title: id.to_string(),
            id,
            source: source.into(),
            topic: String::new(),
            level: 1,
            order: None,
            prereqs: Vec::new(),
            tags: Vec::new(),
            concepts_introduced: Vec::new(),
            concepts_reused: Vec::new(),
            canonical_for: Vec::new(),
            extras: LessonExtras::default(),
            body: String::new(),
        }
    }

    /// Distinct concepts this lesson claims to own (`concepts_introduced` ∪ `canonical_for`),
    /// in first-mention order.
    pub fn ownership_claims(&self) -> Vec<&ConceptId> {
        dedup_in_order(self.concepts_introduced.iter().chain(&self.canonical_for))
    }

    /// Distinct concepts referenced from any of the three concept lists, in first-mention order.
    pub fn referenced_concepts(&self) -> Vec<&ConceptId> {
        dedup_in_order(
            self.concepts_introduced
                .iter()
                .chain(&self.canonical_for)
                .chain(&self.concepts_reused),
        )
    }

    /// Distinct reused concepts, in first-mention order.
    pub fn reused_concepts(&self) -> Vec<&ConceptId> {
        dedup_in_order(self.concepts_reused.iter())
    }
}

fn dedup_in_order<'a>(ids: impl Iterator<Item = &'a ConceptId>) -> Vec<&'a ConceptId> {
    let mut seen = BTreeSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

/// Catalog ordering: level, then lesson order (unordered lessons last), then title, then id.
pub fn compare_lessons(a: &LessonRecord, b: &LessonRecord) -> Ordering {
    a.level
        .cmp(&b.level)
        .then_with(|| match (&a.order, &b.order) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}
