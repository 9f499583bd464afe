//! Lesson ordering tokens (`lesson: 3`, `lesson: "1.2"`, `lesson: "2.10.1"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderParseError {
    #[error("empty lesson order")]
    Empty,
    #[error("lesson order component `{component}` in `{raw}` is not a non-negative integer")]
    NotNumeric { raw: String, component: String },
}

/// Position of a lesson within its level, compared component-wise.
///
/// Components beyond `major.minor.patch` are ignored.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct LessonOrder {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl LessonOrder {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for LessonOrder {
    type Err = OrderParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OrderParseError::Empty);
        }

        let mut parts = [0u32; 3];
        for (i, component) in trimmed.split('.').enumerate() {
            let value = component
                .trim()
                .parse::<u32>()
                .map_err(|_| OrderParseError::NotNumeric {
                    raw: trimmed.to_string(),
                    component: component.to_string(),
                })?;
            if i < parts.len() {
                parts[i] = value;
            }
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for LessonOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.minor, self.patch) {
            (0, 0) => write!(f, "{}", self.major),
            (minor, 0) => write!(f, "{}.{}", self.major, minor),
            (minor, patch) => write!(f, "{}.{}.{}", self.major, minor, patch),
        }
    }
}
