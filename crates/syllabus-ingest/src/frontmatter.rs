//! Splitting a lesson document into its YAML front matter and markdown body.

/// Result of looking for a `---` delimited block at the top of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatter<'a> {
    /// The document does not start with `---`.
    Absent { body: &'a str },
    /// An opening `---` with no closing delimiter; the whole text is treated as body.
    Unterminated { body: &'a str },
    Present { yaml: &'a str, body: &'a str },
}

impl<'a> FrontMatter<'a> {
    pub fn body(&self) -> &'a str {
        match *self {
            FrontMatter::Absent { body }
            | FrontMatter::Unterminated { body }
            | FrontMatter::Present { body, .. } => body,
        }
    }
}

/// Split `text` at the front-matter delimiters.
///
/// The first line must be `---` (a leading BOM is tolerated); the block ends at the next
/// line that is exactly `---` or `...`.
pub fn split_front_matter(text: &str) -> FrontMatter<'_> {
    let content = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = content.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return FrontMatter::Absent { body: content };
    };
    if first.trim_end() != "---" {
        return FrontMatter::Absent { body: content };
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return FrontMatter::Present {
                yaml: &content[yaml_start..offset],
                body: &content[offset + line.len()..],
            };
        }
        offset += line.len();
    }

    FrontMatter::Unterminated { body: content }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_yaml_and_body() {
        let text = "---\nid: a\ntitle: A\n---\n# Heading\nBody\n";
        let FrontMatter::Present { yaml, body } = split_front_matter(text) else {
            panic!("expected front matter");
        };
        assert_eq!(yaml, "id: a\ntitle: A\n");
        assert_eq!(body, "# Heading\nBody\n");
    }

    #[test]
    fn tolerates_bom_and_crlf() {
        let text = "\u{feff}---\r\nid: a\r\n---\r\nBody";
        let FrontMatter::Present { yaml, body } = split_front_matter(text) else {
            panic!("expected front matter");
        };
        assert_eq!(yaml, "id: a\r\n");
        assert_eq!(body, "Body");
    }

    #[test]
    fn empty_block_is_present_but_empty() {
        assert_eq!(
            split_front_matter("---\n---\nBody"),
            FrontMatter::Present {
                yaml: "",
                body: "Body"
            }
        );
    }

    #[test]
    fn missing_opening_delimiter() {
        let text = "# Title\n---\nid: a\n---\n";
        assert_eq!(split_front_matter(text), FrontMatter::Absent { body: text });
    }

    #[test]
    fn missing_closing_delimiter() {
        let text = "---\nid: a\n# Title\n";
        assert_eq!(
            split_front_matter(text),
            FrontMatter::Unterminated { body: text }
        );
    }

    #[test]
    fn dots_close_the_block() {
        let FrontMatter::Present { yaml, body } = split_front_matter("---\nid: a\n...\nrest")
        else {
            panic!("expected front matter");
        };
        assert_eq!(yaml, "id: a\n");
        assert_eq!(body, "rest");
    }
}
