//! The concept registry (`curriculum.json`).

use crate::id::{ConceptId, LessonId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One registered concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub id: ConceptId,
    /// Lesson the registry names as the authoritative place this concept is taught.
    /// A blank value means none is declared.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_undeclared"
    )]
    pub canonical_lesson: Option<LessonId>,
}

fn blank_as_undeclared<'de, D>(deserializer: D) -> Result<Option<LessonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| LessonId::parse(&s).ok()))
}

/// On-disk shape of the registry document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryDocument {
    #[serde(default)]
    pub concepts: Vec<Concept>,
}

/// Concepts indexed by id, iterable in document order.
///
/// When the document lists an id more than once the first entry wins; later ones are kept
/// in [`ConceptRegistry::duplicates`] so callers can report them.
#[derive(Debug, Clone, Default)]
pub struct ConceptRegistry {
    concepts: Vec<Concept>,
    index: HashMap<ConceptId, usize>,
    duplicates: Vec<ConceptId>,
}

impl ConceptRegistry {
    pub fn new(entries: impl IntoIterator<Item = Concept>) -> Self {
        let mut registry = Self::default();
        for concept in entries {
            if registry.index.contains_key(&concept.id) {
                registry.duplicates.push(concept.id);
                continue;
            }
            registry
                .index
                .insert(concept.id.clone(), registry.concepts.len());
            registry.concepts.push(concept);
        }
        registry
    }

    pub fn from_document(doc: RegistryDocument) -> Self {
        Self::new(doc.concepts)
    }

    pub fn get(&self, id: &str) -> Option<&Concept> {
        self.index.get(id).map(|&i| &self.concepts[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Registry-declared canonical lesson for a concept, if any.
    pub fn canonical_lesson(&self, id: &str) -> Option<&LessonId> {
        self.get(id).and_then(|c| c.canonical_lesson.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// `(concept, canonical lesson)` for every concept that declares one, in document order.
    pub fn declared_canonicals(&self) -> impl Iterator<Item = (&ConceptId, &LessonId)> {
        self.concepts
            .iter()
            .filter_map(|c| c.canonical_lesson.as_ref().map(|l| (&c.id, l)))
    }

    /// Ids listed more than once in the source document (in order of the repeated entry).
    pub fn duplicates(&self) -> &[ConceptId] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}
