//! Lesson corpus discovery and loading.

use crate::metadata::{decode_lesson, unreadable_lesson, LoadedLesson};
use crate::LoadOptions;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use syllabus_model::LessonRecord;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Missing lessons directory at {}", .0.display())]
    MissingRoot(PathBuf),
    #[error("lessons path {} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Every lesson found under one root, sorted by lesson id (ties broken by source path).
#[derive(Debug, Clone, Default)]
pub struct LessonCorpus {
    root: PathBuf,
    lessons: Vec<LoadedLesson>,
}

impl LessonCorpus {
    pub fn new(root: impl Into<PathBuf>, mut lessons: Vec<LoadedLesson>) -> Self {
        lessons.sort_by(|a, b| {
            a.record
                .id
                .cmp(&b.record.id)
                .then_with(|| a.record.source.cmp(&b.record.source))
        });
        Self {
            root: root.into(),
            lessons,
        }
    }

    /// In-memory corpus from already-built records.
    pub fn from_records(records: impl IntoIterator<Item = LessonRecord>) -> Self {
        Self::new(
            PathBuf::new(),
            records.into_iter().map(LoadedLesson::from_record).collect(),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lessons(&self) -> &[LoadedLesson] {
        &self.lessons
    }

    pub fn records(&self) -> impl Iterator<Item = &LessonRecord> {
        self.lessons.iter().map(|l| &l.record)
    }

    /// First lesson with this id.
    pub fn get(&self, id: &str) -> Option<&LessonRecord> {
        self.records().find(|r| r.id.as_str() == id)
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

/// Find every file named `options.lesson_file_name` under `root`, at any depth, sorted.
pub fn discover_lesson_files(root: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.exists() {
        return Err(CorpusError::MissingRoot(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(CorpusError::NotADirectory(root.to_path_buf()));
    }

    let exclude_dirs: BTreeSet<&str> = options.exclude_dir_names.iter().map(String::as_str).collect();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !exclude_dirs.contains(name.as_ref())
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name() == options.lesson_file_name.as_str() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Load every lesson under `root`.
///
/// Only a missing or non-directory root is an error. A file that cannot be read still
/// yields a record (id inferred from its path) carrying an `Unreadable` issue.
pub fn load_corpus(root: &Path, options: &LoadOptions) -> Result<LessonCorpus, CorpusError> {
    let files = discover_lesson_files(root, options)?;

    let mut lessons = Vec::with_capacity(files.len());
    for path in &files {
        let relative = relative_source(root, path);
        let loaded = match read_lesson_text(path, options.max_file_bytes) {
            Ok(text) => decode_lesson(&relative, &text, options),
            Err(message) => {
                tracing::warn!(path = %path.display(), error = %message, "lesson file unreadable");
                unreadable_lesson(&relative, message, options)
            }
        };

        if !loaded.issues.is_empty() {
            tracing::warn!(
                lesson = %loaded.record.id,
                path = %relative,
                issues = loaded.issues.len(),
                "lesson metadata defaulted"
            );
        }
        tracing::debug!(
            lesson = %loaded.record.id,
            path = %relative,
            inferred = ?loaded.inferred,
            "loaded lesson"
        );
        lessons.push(loaded);
    }

    tracing::info!(root = %root.display(), lessons = lessons.len(), "lesson corpus loaded");
    Ok(LessonCorpus::new(root, lessons))
}

fn read_lesson_text(path: &Path, max_file_bytes: u64) -> Result<String, String> {
    let metadata = std::fs::metadata(path).map_err(|e| e.to_string())?;
    if metadata.len() > max_file_bytes {
        return Err(format!(
            "file is {} bytes, larger than the {max_file_bytes} byte limit",
            metadata.len()
        ));
    }
    std::fs::read_to_string(path).map_err(|e| e.to_string())
}

/// `/`-separated path of `path` relative to `root`.
fn relative_source(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
