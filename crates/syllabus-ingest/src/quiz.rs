//! Quiz sections embedded in lesson bodies.
//!
//! A quiz lives under a `## Quiz` heading and runs until the next `##` heading:
//!
//! ```text
//! ## Quiz
//!
//! 1. Which loop always runs at least once?
//! A) while ❌
//! B) do-while ✅
//!
//! 2. Pick every immutable type.
//! * str ✅
//! * list ❌
//! * tuple ✅
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static QUIZ_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^##\s+quiz").expect("quiz heading regex"));
static SECTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+").expect("section heading regex"));
static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.\s+(.*)$").expect("question regex"));
static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---\s*$").expect("rule regex"));
static LETTERED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z])\)\s+(.+?)(?:\s*(✅|❌))?\s*$").expect("lettered option regex")
});
static BULLETED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\*\s+(.+?)(?:\s*(✅|❌))?\s*$").expect("bulleted option regex")
});

const CORRECT_MARK: &str = "✅";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub key: String,
    pub text: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// `q1`, `q2`, ... in document order.
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl QuizQuestion {
    pub fn is_multi_select(&self) -> bool {
        self.options.iter().filter(|o| o.correct).count() > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: String,
    pub questions: Vec<QuizQuestion>,
}

/// A located quiz section and the body with that section cut out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSplit {
    pub section: Option<String>,
    pub stripped: String,
}

pub fn extract_quiz_section(markdown: &str) -> QuizSplit {
    let lines: Vec<&str> = markdown.lines().collect();
    let Some(start) = lines
        .iter()
        .position(|l| QUIZ_HEADING_RE.is_match(l.trim()))
    else {
        return QuizSplit {
            section: None,
            stripped: markdown.to_string(),
        };
    };

    let end = lines[start + 1..]
        .iter()
        .position(|l| SECTION_HEADING_RE.is_match(l.trim()))
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    let stripped: Vec<&str> = lines[..start].iter().chain(&lines[end..]).copied().collect();
    QuizSplit {
        section: Some(lines[start..end].join("\n")),
        stripped: stripped.join("\n"),
    }
}

/// Parse a section returned by [`extract_quiz_section`]. `None` when no question has both a
/// prompt and at least one option.
pub fn parse_quiz(section: &str, quiz_id: &str) -> Option<Quiz> {
    let lines: Vec<&str> = section.lines().collect();
    let work = match lines
        .iter()
        .position(|l| SECTION_HEADING_RE.is_match(l.trim()))
    {
        Some(heading) => &lines[heading + 1..],
        None => &lines[..],
    };

    let mut questions = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for &line in work {
        if let Some(caps) = QUESTION_RE.captures(line) {
            flush(current.take(), &mut questions);
            current = Some((caps[2].trim().to_string(), Vec::new()));
            continue;
        }
        let Some((_, option_lines)) = current.as_mut() else {
            continue;
        };
        if RULE_RE.is_match(line) || SECTION_HEADING_RE.is_match(line.trim()) {
            break;
        }
        option_lines.push(line);
    }
    flush(current.take(), &mut questions);

    if questions.is_empty() {
        return None;
    }
    Some(Quiz {
        id: quiz_id.to_string(),
        questions,
    })
}

fn flush(current: Option<(String, Vec<&str>)>, questions: &mut Vec<QuizQuestion>) {
    let Some((prompt, option_lines)) = current else {
        return;
    };
    let options = parse_options(&option_lines);
    if prompt.is_empty() || options.is_empty() {
        return;
    }
    questions.push(QuizQuestion {
        id: format!("q{}", questions.len() + 1),
        prompt,
        options,
    });
}

fn parse_options(lines: &[&str]) -> Vec<QuizOption> {
    let mut options: Vec<QuizOption> = Vec::new();
    for raw in lines {
        let line = raw.trim();
        if line.is_empty() || line.starts_with("```") {
            continue;
        }

        if let Some(caps) = LETTERED_RE.captures(line) {
            options.push(QuizOption {
                key: caps[1].to_string(),
                text: caps[2].trim().to_string(),
                correct: caps.get(3).map(|m| m.as_str()) == Some(CORRECT_MARK),
            });
            continue;
        }

        if let Some(caps) = BULLETED_RE.captures(line) {
            let key = char::from(b'A' + (options.len() % 26) as u8).to_string();
            options.push(QuizOption {
                key,
                text: caps[1].trim().to_string(),
                correct: caps.get(2).map(|m| m.as_str()) == Some(CORRECT_MARK),
            });
        }
    }
    options
}
