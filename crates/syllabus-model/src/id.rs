//! Lesson and concept identifiers.
//!
//! Both explicit ids (front matter / registry) and path-inferred ids go through the same
//! canonicalization, so an id written by hand and an id derived from the directory layout
//! compare equal exactly when they denote the same lesson.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Separator used when flattening directory segments into a lesson id.
pub const PATH_ID_SEPARATOR: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} id is empty")]
    Empty { kind: &'static str },
}

/// Trim surrounding whitespace. No case folding: ids must match exactly.
fn canonicalize(raw: &str, kind: &'static str) -> Result<String, IdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }
    Ok(trimmed.to_string())
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self, IdError> {
                canonicalize(raw, $kind).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(raw: String) -> Result<Self, Self::Error> {
                Self::parse(&raw)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = IdError;

            fn try_from(raw: &str) -> Result<Self, Self::Error> {
                Self::parse(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a lesson (explicit `id:` or inferred from its directory).
    LessonId,
    "lesson"
);

string_id!(
    /// Identifier of a concept in the registry.
    ConceptId,
    "concept"
);

impl LessonId {
    /// Infer a lesson id from the path of the lesson file relative to the corpus root.
    ///
    /// `arrays/l2-core-apis/lesson.md` becomes `arrays-l2-core-apis`. Both `/` and `\`
    /// separate segments. A lesson file sitting directly at the corpus root is named
    /// after the file stem (`lesson`).
    pub fn infer_from_relative_path(relative: &str, lesson_file_name: &str) -> LessonId {
        let normalized = relative.replace('\\', "/");
        let mut segments: Vec<&str> = normalized
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        if segments.last() == Some(&lesson_file_name) {
            segments.pop();
        }

        let joined = segments.join(PATH_ID_SEPARATOR);
        let fallback = lesson_file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .filter(|stem| !stem.is_empty())
            .unwrap_or(lesson_file_name);

        LessonId::parse(&joined)
            .or_else(|_| LessonId::parse(fallback))
            .unwrap_or_else(|_| LessonId("lesson".to_string()))
    }
}
