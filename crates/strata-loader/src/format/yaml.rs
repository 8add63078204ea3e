use crate::document::Document;
use crate::error::LoadError;
use crate::format::{ConfigFormat, DocumentParser};
use indexmap::IndexMap;
use strata_core::{ConfigValue, Origin, OriginTrackedValue};
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Parser for the structured indented mapping format.
///
/// Works directly on the parser's event stream so every scalar value
/// records the 0-based line/column of its start mark. Nested mappings
/// flatten to dotted keys, sequences flatten to `key[index]` entries,
/// and `---` separates documents. Mapping keys are read as plain
/// strings and never origin-tracked; only values are wrapped.
///
/// Plain scalars resolve to typed values (null/bool/int/float per the
/// core schema, no timestamp resolution); quoted and block scalars
/// stay strings. Aliases and complex mapping keys are parse errors.
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(&self, input: &str, source_name: &str) -> Result<Vec<Document>, LoadError> {
        let mut builder = EventBuilder::new(source_name);
        let mut parser = Parser::new_from_str(input);

        parser.load(&mut builder, true).map_err(|err| {
            let marker = *err.marker();
            LoadError::parse_at(
                source_name,
                marker.line().saturating_sub(1),
                marker.col(),
                err.to_string(),
            )
        })?;

        if let Some(error) = builder.error {
            return Err(error);
        }

        builder
            .documents
            .into_iter()
            .enumerate()
            .map(|(index, entries)| {
                Document::from_entries(entries, ConfigFormat::Yaml, source_name, index)
            })
            .collect()
    }
}

/// One step of the flattened key path.
enum Segment {
    Key(String),
    Index(usize),
}

/// Open container being built.
enum Ctx {
    Mapping {
        pending_key: Option<String>,
        owns_segment: bool,
    },
    Sequence {
        next_index: usize,
        owns_segment: bool,
    },
}

struct EventBuilder<'a> {
    source_name: &'a str,
    documents: Vec<IndexMap<String, OriginTrackedValue>>,
    current: IndexMap<String, OriginTrackedValue>,
    stack: Vec<Ctx>,
    path: Vec<Segment>,
    error: Option<LoadError>,
}

impl<'a> EventBuilder<'a> {
    fn new(source_name: &'a str) -> Self {
        Self {
            source_name,
            documents: Vec::new(),
            current: IndexMap::new(),
            stack: Vec::new(),
            path: Vec::new(),
            error: None,
        }
    }

    fn fail(&mut self, marker: Marker, reason: &str) {
        if self.error.is_none() {
            self.error = Some(LoadError::parse_at(
                self.source_name,
                marker.line().saturating_sub(1),
                marker.col(),
                reason,
            ));
        }
    }

    /// Joins the open path with a leaf segment into a flat dotted key.
    fn flat_key(&self, leaf: &Segment) -> String {
        let mut key = String::new();
        for segment in self.path.iter().chain(std::iter::once(leaf)) {
            match segment {
                Segment::Key(name) => {
                    if !key.is_empty() {
                        key.push('.');
                    }
                    key.push_str(name);
                },
                Segment::Index(i) => {
                    key.push('[');
                    key.push_str(&i.to_string());
                    key.push(']');
                },
            }
        }
        key
    }

    fn insert_scalar(&mut self, leaf: Segment, value: ConfigValue, marker: Marker) {
        let key = self.flat_key(&leaf);
        let origin = Origin::new(
            self.source_name,
            marker.line().saturating_sub(1),
            marker.col(),
        );
        self.current.insert(key, OriginTrackedValue::new(value, origin));
    }

    /// Handles the start of a nested container.
    fn open_container(&mut self, marker: Marker, is_mapping: bool) {
        let segment: Result<Option<Segment>, &'static str> = match self.stack.last_mut() {
            None => {
                if is_mapping {
                    Ok(None)
                } else {
                    Err("document root must be a mapping")
                }
            },
            Some(Ctx::Mapping { pending_key, .. }) => match pending_key.take() {
                Some(key) => Ok(Some(Segment::Key(key))),
                None => Err("complex mapping keys are not supported"),
            },
            Some(Ctx::Sequence { next_index, .. }) => {
                let index = *next_index;
                *next_index += 1;
                Ok(Some(Segment::Index(index)))
            },
        };

        match segment {
            Err(reason) => self.fail(marker, reason),
            Ok(segment) => {
                let owns_segment = segment.is_some();
                if let Some(segment) = segment {
                    self.path.push(segment);
                }
                self.stack.push(if is_mapping {
                    Ctx::Mapping {
                        pending_key: None,
                        owns_segment,
                    }
                } else {
                    Ctx::Sequence {
                        next_index: 0,
                        owns_segment,
                    }
                });
            },
        }
    }

    fn close_container(&mut self) {
        let owns_segment = match self.stack.pop() {
            Some(Ctx::Mapping { owns_segment, .. }) => owns_segment,
            Some(Ctx::Sequence { owns_segment, .. }) => owns_segment,
            None => false,
        };
        if owns_segment {
            self.path.pop();
        }
    }

    fn scalar(&mut self, text: String, style: TScalarStyle, tag: Option<&Tag>, marker: Marker) {
        let leaf = match self.stack.last_mut() {
            None => {
                // Root-level scalar: an empty document is fine,
                // anything else is not a mapping.
                if !matches!(scalar_value(&text, style, tag), ConfigValue::Null) {
                    self.fail(marker, "document root must be a mapping");
                }
                return;
            },
            Some(Ctx::Mapping { pending_key, .. }) => match pending_key.take() {
                None => {
                    // Key position: read as a plain string, untracked.
                    *pending_key = Some(text);
                    return;
                },
                Some(key) => Segment::Key(key),
            },
            Some(Ctx::Sequence { next_index, .. }) => {
                let index = *next_index;
                *next_index += 1;
                Segment::Index(index)
            },
        };

        let value = scalar_value(&text, style, tag);
        self.insert_scalar(leaf, value, marker);
    }
}

impl MarkedEventReceiver for EventBuilder<'_> {
    fn on_event(&mut self, event: Event, marker: Marker) {
        if self.error.is_some() {
            return;
        }

        match event {
            Event::StreamStart | Event::StreamEnd | Event::Nothing => {},
            Event::DocumentStart => {
                self.current = IndexMap::new();
                self.stack.clear();
                self.path.clear();
            },
            Event::DocumentEnd => {
                let entries = std::mem::take(&mut self.current);
                if !entries.is_empty() {
                    self.documents.push(entries);
                }
            },
            Event::MappingStart(_, _) => self.open_container(marker, true),
            Event::MappingEnd => self.close_container(),
            Event::SequenceStart(_, _) => self.open_container(marker, false),
            Event::SequenceEnd => self.close_container(),
            Event::Scalar(text, style, _, tag) => self.scalar(text, style, tag.as_ref(), marker),
            Event::Alias(_) => self.fail(marker, "aliases are not supported"),
        }
    }
}

/// Resolves a scalar to its typed value.
///
/// Quoted and block scalars are always strings. Plain scalars follow
/// the core schema: null, booleans, integers, floats, else string.
/// Explicit tags force the tagged type.
fn scalar_value(text: &str, style: TScalarStyle, tag: Option<&Tag>) -> ConfigValue {
    if let Some(tag) = tag {
        return tagged_value(text, tag);
    }
    if style != TScalarStyle::Plain {
        return ConfigValue::String(text.to_string());
    }
    plain_value(text)
}

fn tagged_value(text: &str, tag: &Tag) -> ConfigValue {
    match tag.suffix.as_str() {
        "str" => ConfigValue::String(text.to_string()),
        "null" => ConfigValue::Null,
        "bool" | "int" | "float" => plain_value(text),
        _ => ConfigValue::String(text.to_string()),
    }
}

fn plain_value(text: &str) -> ConfigValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return ConfigValue::Null,
        "true" | "True" | "TRUE" => return ConfigValue::Bool(true),
        "false" | "False" | "FALSE" => return ConfigValue::Bool(false),
        _ => {},
    }
    if let Ok(i) = text.parse::<i64>() {
        return ConfigValue::Integer(i);
    }
    if let Ok(f) = text.parse::<f64>() {
        return ConfigValue::Float(f.into());
    }
    ConfigValue::String(text.to_string())
}
