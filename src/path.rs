//! Field name parser and nested value lookup
//!
//! Supports:
//! - address.street (dot notation)
//! - user[password] (bracket notation)
//! - letters[1], letters.1 (sequence index)
//! - items[] (append marker: resolves on `items` as a whole)
//!
//! Malformed bracket nesting (`foo[bar`, `foo]`, `a[b[c]]`, `a[b]c`) is not
//! an error: the whole field name becomes one literal key.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::model::Node;

/// A parsed field name segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping or attribute access: .field or [field]
    Key(String),
    /// Sequence index access: [0] or .0
    Index(usize),
    /// Empty brackets: []
    Append,
}

/// A parsed field name
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the path has nothing to look up (`""`, `"[]"`)
    pub fn is_empty(&self) -> bool {
        !self
            .segments
            .iter()
            .any(|s| matches!(s, Segment::Key(_) | Segment::Index(_)))
    }

    /// Flattened dotted key used for old input and request lookups
    ///
    /// - "person[name]" → "person.name"
    /// - "size[multi][]" → "size.multi"
    pub fn dotted_key(&self) -> String {
        let mut key = String::new();
        for segment in &self.segments {
            let part = match segment {
                Segment::Key(k) => k.clone(),
                Segment::Index(i) => i.to_string(),
                Segment::Append => continue,
            };
            if !key.is_empty() {
                key.push('.');
            }
            key.push_str(&part);
        }
        key
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted_key())
    }
}

/// Parse a field name into segments
///
/// Examples:
/// - "address.street" → [Key("address"), Key("street")]
/// - "letters[1]" → [Key("letters"), Index(1)]
/// - "items[]" → [Key("items"), Append]
/// - "foo[bar" → [Key("foo[bar")]
pub fn parse(name: &str) -> Path {
    match split_parts(name) {
        Some(parts) => Path::new(parts.into_iter().map(to_segment).collect()),
        None => {
            tracing::warn!(field = name, "malformed brackets, using literal key");
            Path::new(vec![Segment::Key(name.to_string())])
        }
    }
}

/// Raw part of a field name before classification
enum Part<'n> {
    Text(&'n str),
    Brackets,
}

/// Split a field name on dots and bracket pairs
///
/// Returns None for malformed nesting.
fn split_parts(name: &str) -> Option<Vec<Part<'_>>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut chars = name.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '.' => {
                push_dotted(&mut parts, &name[start..i]);
                start = i + 1;
            }
            '[' => {
                push_dotted(&mut parts, &name[start..i]);
                let open = i + 1;
                let close = loop {
                    match chars.next() {
                        Some((j, ']')) => break j,
                        Some((_, '[')) | None => return None,
                        Some(_) => {}
                    }
                };
                let inner = &name[open..close];
                if inner.is_empty() {
                    parts.push(Part::Brackets);
                } else {
                    for piece in inner.split('.') {
                        push_dotted(&mut parts, piece);
                    }
                }
                // A closing bracket must be followed by another pair, a dot or the end
                match chars.peek() {
                    None | Some((_, '[')) => {}
                    Some((_, '.')) => {
                        chars.next();
                    }
                    Some(_) => return None,
                }
                start = chars.peek().map(|(j, _)| *j).unwrap_or(name.len());
            }
            ']' => return None,
            _ => {}
        }
    }

    push_dotted(&mut parts, &name[start..]);
    Some(parts)
}

fn push_dotted<'n>(parts: &mut Vec<Part<'n>>, text: &'n str) {
    // Empty dot parts ("a..b") carry nothing to look up
    if !text.is_empty() {
        parts.push(Part::Text(text));
    }
}

fn to_segment(part: Part<'_>) -> Segment {
    match part {
        Part::Brackets => Segment::Append,
        // "007" stays a key so its spelling survives lookups and dotted_key
        Part::Text(text) if is_canonical_index(text) => match text.parse() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Key(text.to_string()),
        },
        Part::Text(text) => Segment::Key(text.to_string()),
    }
}

fn is_canonical_index(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit()) && (text == "0" || !text.starts_with('0'))
}

/// Walk path segments from a root node
///
/// Returns None the moment a segment is missing or the current node cannot
/// answer it. `Append` segments are no-ops.
pub fn resolve<'a>(path: &Path, root: Node<'a>) -> Option<Node<'a>> {
    if path.is_empty() {
        return None;
    }

    let mut current = root;

    for segment in path.segments() {
        current = match segment {
            Segment::Key(key) => current.key(key)?,
            Segment::Index(idx) => current.index(*idx)?,
            Segment::Append => continue,
        };
    }

    Some(current)
}

/// Field names kept in the parse cache; past this, names are parsed each time
const MAX_CACHED_PATHS: usize = 4096;

/// Global cache of parsed field names
static PATH_CACHE: Lazy<DashMap<String, Arc<Path>>> = Lazy::new(DashMap::new);

/// Parse with caching (field names repeat across renders)
///
/// The cache holds at most `MAX_CACHED_PATHS` names and never evicts.
pub fn parse_cached(name: &str) -> Arc<Path> {
    parse_into(&PATH_CACHE, name, MAX_CACHED_PATHS)
}

fn parse_into(cache: &DashMap<String, Arc<Path>>, name: &str, limit: usize) -> Arc<Path> {
    if let Some(cached) = cache.get(name) {
        return Arc::clone(&cached);
    }

    let path = Arc::new(parse(name));
    if cache.len() < limit {
        cache.insert(name.to_string(), Arc::clone(&path));
    }
    path
}
