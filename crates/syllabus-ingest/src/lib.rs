//! Lesson corpus and concept registry loading for Syllabus
//!
//! Reads from disk, never writes:
//! - `lesson.md` files found at any depth under a lessons root (YAML front matter + markdown body),
//! - the concept registry document (`curriculum.json`, or YAML),
//! - quiz sections inside lesson bodies (for the catalog).
//!
//! Per-lesson problems are absorbed into [`MetadataIssue`]s; only a missing lessons root or
//! an unusable registry is an `Err`.

use serde::{Deserialize, Serialize};

pub mod corpus;
pub mod frontmatter;
pub mod metadata;
pub mod quiz;
pub mod registry;

pub use corpus::{discover_lesson_files, load_corpus, CorpusError, LessonCorpus};
pub use frontmatter::{split_front_matter, FrontMatter};
pub use metadata::{decode_lesson, InferredField, LoadedLesson, MetadataIssue};
pub use quiz::{extract_quiz_section, parse_quiz, Quiz, QuizOption, QuizQuestion, QuizSplit};
pub use registry::{load_registry, parse_registry, RegistryError, RegistryFormat};

/// Default name of the file that marks a lesson directory.
pub const DEFAULT_LESSON_FILE_NAME: &str = "lesson.md";

/// Options controlling lesson discovery and decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// File name that marks a lesson (exact match).
    pub lesson_file_name: String,
    /// Directory names to skip (exact match).
    pub exclude_dir_names: Vec<String>,
    pub follow_links: bool,
    /// Larger lesson files are recorded as unreadable (bytes).
    pub max_file_bytes: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            lesson_file_name: DEFAULT_LESSON_FILE_NAME.to_string(),
            exclude_dir_names: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                "dist".to_string(),
            ],
            follow_links: false,
            max_file_bytes: 1024 * 1024,
        }
    }
}
