//! `syllabus list`: the lesson catalog grouped by topic.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use syllabus_ingest::{
    extract_quiz_section, load_corpus, parse_quiz, InferredField, LessonCorpus, LoadedLesson,
};
use syllabus_model::{compare_lessons, LessonRecord, LessonStatus};

use crate::config::Settings;

pub const CATALOG_VERSION: &str = "catalog_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogV1 {
    pub version: String,
    pub lessons_dir: String,
    pub lesson_count: usize,
    /// Lessons per level, after filtering.
    pub levels: BTreeMap<u32, usize>,
    pub topics: Vec<CatalogTopicV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogTopicV1 {
    pub topic: String,
    pub lessons: Vec<CatalogLessonV1>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogLessonV1 {
    pub id: String,
    pub title: String,
    pub level: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    pub source: String,
    pub quiz_questions: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LessonStatus>,
    /// Fields derived from the path because the front matter left them out.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inferred: Vec<InferredField>,
}

#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub topic: Option<String>,
    pub level: Option<u32>,
}

impl CatalogFilter {
    fn accepts(&self, lesson: &LessonRecord) -> bool {
        self.topic.as_deref().map_or(true, |t| lesson.topic == t)
            && self.level.map_or(true, |l| lesson.level == l)
    }
}

pub fn build_catalog(corpus: &LessonCorpus, filter: &CatalogFilter) -> CatalogV1 {
    let mut by_topic: BTreeMap<&str, Vec<&LoadedLesson>> = BTreeMap::new();
    for lesson in corpus.lessons().iter().filter(|l| filter.accepts(&l.record)) {
        by_topic.entry(lesson.record.topic.as_str()).or_default().push(lesson);
    }

    let mut levels: BTreeMap<u32, usize> = BTreeMap::new();
    let mut lesson_count = 0;
    let topics = by_topic
        .into_iter()
        .map(|(topic, mut lessons)| {
            lessons.sort_by(|a, b| compare_lessons(&a.record, &b.record));
            for lesson in &lessons {
                *levels.entry(lesson.record.level).or_default() += 1;
            }
            lesson_count += lessons.len();
            CatalogTopicV1 {
                topic: topic.to_string(),
                lessons: lessons.into_iter().map(catalog_entry).collect(),
            }
        })
        .collect();

    CatalogV1 {
        version: CATALOG_VERSION.to_string(),
        lessons_dir: corpus.root().display().to_string(),
        lesson_count,
        levels,
        topics,
    }
}

fn catalog_entry(loaded: &LoadedLesson) -> CatalogLessonV1 {
    let lesson = &loaded.record;
    let quiz_questions = extract_quiz_section(&lesson.body)
        .section
        .and_then(|section| parse_quiz(&section, lesson.id.as_str()))
        .map(|quiz| quiz.questions.len())
        .unwrap_or(0);

    CatalogLessonV1 {
        id: lesson.id.to_string(),
        title: lesson.title.clone(),
        level: lesson.level,
        order: lesson.order.map(|o| o.to_string()),
        source: lesson.source.clone(),
        quiz_questions,
        tags: lesson.tags.clone(),
        status: lesson.extras.status,
        inferred: loaded.inferred.clone(),
    }
}

pub fn cmd_list(settings: &Settings, filter: &CatalogFilter, format: &str) -> Result<()> {
    let corpus = load_corpus(&settings.lessons_dir, &settings.load)?;
    let catalog = build_catalog(&corpus, filter);

    let format = format.trim().to_ascii_lowercase();
    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&catalog)?,
        "text" => render_catalog_text(&catalog),
        other => return Err(anyhow!("unknown --format `{other}` (expected json|text)")),
    };
    println!("{rendered}");
    Ok(())
}

pub fn render_catalog_text(c: &CatalogV1) -> String {
    let mut out = String::new();
    let levels: Vec<String> = c
        .levels
        .iter()
        .map(|(level, n)| format!("L{level}={n}"))
        .collect();
    out.push_str(&format!("lessons: {}", c.lesson_count));
    if !levels.is_empty() {
        out.push_str(&format!("  ({})", levels.join(" ")));
    }
    out.push('\n');

    if c.topics.is_empty() {
        out.push_str("  (no lessons)\n");
        return out;
    }

    for topic in &c.topics {
        out.push_str(&format!("\n{} ({})\n", topic.topic, topic.lessons.len()));
        for l in &topic.lessons {
            let order = l.order.as_deref().unwrap_or("-");
            let mut line = format!("  L{} {:<6} {}  {}", l.level, order, l.id, l.title);
            if l.quiz_questions > 0 {
                line.push_str(&format!("  [quiz: {}]", l.quiz_questions));
            }
            out.push_str(&line);
            out.push('\n');
        }
    }
    out
}
