//! Typed decoding of lesson front matter.
//!
//! Decoding never fails as a whole. Every field is read independently; a field with the
//! wrong shape is recorded as a [`MetadataIssue`] and replaced by its default, so one bad
//! lesson still takes part in every downstream check.

use crate::frontmatter::{split_front_matter, FrontMatter};
use crate::LoadOptions;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;
use syllabus_model::{
    ConceptId, LessonExtras, LessonId, LessonOrder, LessonRecord, OrderParseError,
};
use thiserror::Error;

static LEVEL_SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)l(\d)-").expect("level segment regex"));

/// Problems found while reading one lesson's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetadataIssue {
    #[error("no front matter block")]
    MissingFrontMatter,
    #[error("front matter block is never closed with `---`")]
    UnterminatedFrontMatter,
    #[error("front matter is not valid YAML: {message}")]
    InvalidYaml { message: String },
    #[error("front matter is not a key/value mapping")]
    NotAMapping,
    #[error("field `{field}` should be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("field `lesson`: {message}")]
    InvalidOrder { message: String },
    #[error("file could not be read: {message}")]
    Unreadable { message: String },
}

impl From<OrderParseError> for MetadataIssue {
    fn from(err: OrderParseError) -> Self {
        MetadataIssue::InvalidOrder {
            message: err.to_string(),
        }
    }
}

/// Metadata fields that have a derived fallback when the author leaves them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredField {
    Id,
    Title,
    Topic,
    Level,
}

/// A lesson record plus what the decoder had to absorb to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedLesson {
    pub record: LessonRecord,
    pub issues: Vec<MetadataIssue>,
    pub inferred: Vec<InferredField>,
}

impl LoadedLesson {
    /// Wrap a hand-built record (no issues, nothing inferred).
    pub fn from_record(record: LessonRecord) -> Self {
        Self {
            record,
            issues: Vec::new(),
            inferred: Vec::new(),
        }
    }
}

/// Decode one lesson document. `relative_path` is `/`-separated and relative to the corpus root.
pub fn decode_lesson(relative_path: &str, text: &str, options: &LoadOptions) -> LoadedLesson {
    let mut issues = Vec::new();

    let (fields, body) = match split_front_matter(text) {
        FrontMatter::Present { yaml, body } => (parse_yaml_mapping(yaml, &mut issues), body),
        FrontMatter::Absent { body } => {
            issues.push(MetadataIssue::MissingFrontMatter);
            (Map::new(), body)
        }
        FrontMatter::Unterminated { body } => {
            issues.push(MetadataIssue::UnterminatedFrontMatter);
            (Map::new(), body)
        }
    };

    let mut decoded = decode_fields(relative_path, &fields, options, issues);
    decoded.record.body = body.to_string();
    decoded
}

/// Record for a lesson file that exists but could not be read.
pub fn unreadable_lesson(relative_path: &str, message: String, options: &LoadOptions) -> LoadedLesson {
    decode_fields(
        relative_path,
        &Map::new(),
        options,
        vec![MetadataIssue::Unreadable { message }],
    )
}

fn parse_yaml_mapping(yaml: &str, issues: &mut Vec<MetadataIssue>) -> Map<String, Value> {
    if yaml.trim().is_empty() {
        return Map::new();
    }

    let value: serde_yaml::Value = match serde_yaml::from_str(yaml) {
        Ok(v) => v,
        Err(err) => {
            issues.push(MetadataIssue::InvalidYaml {
                message: err.to_string(),
            });
            return Map::new();
        }
    };

    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(_) => {
            issues.push(MetadataIssue::NotAMapping);
            Map::new()
        }
        Err(err) => {
            issues.push(MetadataIssue::InvalidYaml {
                message: err.to_string(),
            });
            Map::new()
        }
    }
}

fn decode_fields(
    relative_path: &str,
    fields: &Map<String, Value>,
    options: &LoadOptions,
    issues: Vec<MetadataIssue>,
) -> LoadedLesson {
    let mut reader = FieldReader {
        fields,
        issues,
        inferred: Vec::new(),
    };

    let id = reader
        .string("id", "a non-empty string")
        .and_then(|raw| match LessonId::parse(&raw) {
            Ok(id) => Some(id),
            Err(_) => {
                reader.invalid("id", "a non-empty string");
                None
            }
        })
        .unwrap_or_else(|| {
            reader.inferred.push(InferredField::Id);
            LessonId::infer_from_relative_path(relative_path, &options.lesson_file_name)
        });

    let title = reader.string("title", "a string").unwrap_or_else(|| {
        reader.inferred.push(InferredField::Title);
        id.to_string()
    });

    let topic = reader.string("topic", "a string").unwrap_or_else(|| {
        reader.inferred.push(InferredField::Topic);
        topic_from_path(relative_path, &options.lesson_file_name)
    });

    let level = reader.level().unwrap_or_else(|| {
        reader.inferred.push(InferredField::Level);
        level_from_path(relative_path)
    });

    let order = reader.order();

    let mut record = LessonRecord::new(id, relative_path);
    record.title = title;
    record.topic = topic;
    record.level = level;
    record.order = order;
    record.prereqs = reader.id_list("prereqs", |s| LessonId::parse(s).ok());
    record.tags = reader.id_list("tags", |s| Some(s.to_string()));
    record.concepts_introduced = reader.id_list("concepts_introduced", |s| ConceptId::parse(s).ok());
    record.concepts_reused = reader.id_list("concepts_reused", |s| ConceptId::parse(s).ok());
    record.canonical_for = reader.id_list("canonical_for", |s| ConceptId::parse(s).ok());
    record.extras = LessonExtras {
        est_minutes: reader.typed("est_minutes", "a whole number of minutes"),
        checks: reader
            .typed("checks", "a list of `{type: quiz}` / `{type: unit, entry, tests}` entries")
            .unwrap_or_default(),
        outcomes: reader.id_list("outcomes", |s| Some(s.to_string())),
        crosslinks: reader
            .typed("crosslinks", "a list of `{to, why}` entries")
            .unwrap_or_default(),
        status: reader.typed("status", "one of draft, review, ready"),
        owner: reader.string("owner", "a string"),
        last_reviewed: reader.string("last_reviewed", "a string"),
    };

    LoadedLesson {
        record,
        issues: reader.issues,
        inferred: reader.inferred,
    }
}

struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    issues: Vec<MetadataIssue>,
    inferred: Vec<InferredField>,
}

impl<'a> FieldReader<'a> {
    fn invalid(&mut self, field: &'static str, expected: &'static str) {
        self.issues
            .push(MetadataIssue::InvalidField { field, expected });
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn string(&mut self, field: &'static str, expected: &'static str) -> Option<String> {
        let value = self.present(field)?;
        let scalar = scalar_string(value);
        if scalar.is_none() {
            self.invalid(field, expected);
        }
        scalar
    }

    fn typed<T: DeserializeOwned>(&mut self, field: &'static str, expected: &'static str) -> Option<T> {
        let value = self.present(field)?.clone();
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(_) => {
                self.invalid(field, expected);
                None
            }
        }
    }

    /// A list of non-empty scalars. Bad entries are dropped (and reported); a non-list value
    /// becomes an empty list.
    fn id_list<T>(&mut self, field: &'static str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
        let Some(value) = self.present(field) else {
            return Vec::new();
        };
        let Value::Array(items) = value else {
            self.invalid(field, "a list of strings");
            return Vec::new();
        };

        let mut out = Vec::with_capacity(items.len());
        let mut bad_entry = false;
        for item in items {
            match scalar_string(item).as_deref().and_then(&parse) {
                Some(v) => out.push(v),
                None => bad_entry = true,
            }
        }
        if bad_entry {
            self.invalid(field, "a list of non-empty strings");
        }
        out
    }

    fn level(&mut self) -> Option<u32> {
        let parsed = match self.present("level")? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.invalid("level", "a non-negative whole number");
        }
        parsed
    }

    fn order(&mut self) -> Option<LessonOrder> {
        let raw = match self.present("lesson")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                self.invalid("lesson", "a number or dotted string like \"1.2\"");
                return None;
            }
        };
        match raw.parse::<LessonOrder>() {
            Ok(order) => Some(order),
            Err(err) => {
                self.issues.push(err.into());
                None
            }
        }
    }
}

/// Strings as written; numbers and booleans in their YAML spelling (`id: 42` is `"42"`).
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First directory under the corpus root, or `general` for a root-level lesson.
fn topic_from_path(relative_path: &str, lesson_file_name: &str) -> String {
    relative_path
        .split('/')
        .filter(|s| !s.is_empty())
        .find(|s| *s != lesson_file_name)
        .unwrap_or("general")
        .to_string()
}

/// Digit from an `l<digit>-...` directory (`arrays/l2-core-apis` → 2), else 1.
fn level_from_path(relative_path: &str) -> u32 {
    LEVEL_SEGMENT_RE
        .captures(relative_path)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(1)
}
