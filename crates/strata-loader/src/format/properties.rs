use crate::document::Document;
use crate::error::LoadError;
use crate::format::{ConfigFormat, DocumentParser};
use indexmap::IndexMap;
use strata_core::{Origin, OriginTrackedValue};

/// Parser for line-oriented `key=value` documents.
///
/// Accepts `=` or `:` as the separator, `#` and `!` comment lines,
/// and trims whitespace around keys and values. Values stay strings;
/// a properties file is always a single document. Each value records
/// the 0-based line and the column of its first non-blank character.
pub struct PropertiesParser;

impl DocumentParser for PropertiesParser {
    fn parse(&self, input: &str, source_name: &str) -> Result<Vec<Document>, LoadError> {
        let mut entries = IndexMap::new();

        for (line_num, line) in input.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(['=', ':']) else {
                return Err(LoadError::parse_at(
                    source_name,
                    line_num,
                    0,
                    "missing '=' or ':' separator",
                ));
            };

            let value = value.trim();
            let column = value_column(line, value);
            entries.insert(
                key.trim().to_string(),
                OriginTrackedValue::new(value, Origin::new(source_name, line_num, column)),
            );
        }

        let document = Document::from_entries(entries, ConfigFormat::Properties, source_name, 0)?;
        Ok(vec![document])
    }
}

/// 0-based column of the value's first character in the original
/// line. Empty values report the column after the separator.
fn value_column(line: &str, value: &str) -> usize {
    if value.is_empty() {
        line.find(['=', ':']).map_or(0, |i| i + 1)
    } else {
        line.rfind(value).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Document {
        PropertiesParser
            .parse(input, "test.properties")
            .unwrap()
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn test_parse_properties() {
        let doc = parse(
            "# Server config\n\
             server.port=8080\n\
             server.host: localhost\n\
             app.name = Test App\n",
        );

        assert_eq!(doc.entries.len(), 3);
        assert_eq!(doc.entries["server.port"].render(), "8080");
        assert_eq!(doc.entries["server.host"].render(), "localhost");
        assert_eq!(doc.entries["app.name"].render(), "Test App");
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let doc = parse("\n# comment\n! also a comment\n\nkey=value\n");
        assert_eq!(doc.entries.len(), 1);
    }

    #[test]
    fn test_origin_positions() {
        let doc = parse("# header\nthe.key=the-value\n");

        let origin = doc.entries["the.key"].origin.as_ref().unwrap();
        assert_eq!(origin.source, "test.properties");
        assert_eq!(origin.line, 1);
        assert_eq!(origin.column, 8);
    }

    #[test]
    fn test_empty_value_is_present() {
        let doc = parse("empty=\n");
        assert_eq!(doc.entries["empty"].render(), "");
    }

    #[test]
    fn test_missing_separator_fails() {
        let err = PropertiesParser
            .parse("no separator here\n", "bad.properties")
            .unwrap_err();

        assert!(err.is_parse());
        assert!(err.to_string().contains("bad.properties"));
        assert!(err.to_string().contains("line 0"));
    }

    #[test]
    fn test_profile_directives_extracted() {
        let doc = parse("profiles.active=myprofile\nother.property=x\n");

        assert_eq!(doc.active.len(), 1);
        assert_eq!(doc.active[0].as_str(), "myprofile");
        assert!(!doc.entries.contains_key("profiles.active"));
    }
}
