use std::collections::BTreeMap;

/// Delimiter line for the metadata header block.
const FENCE: &str = "---";

/// A parsed metadata value: a bare scalar or a `[...]` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

/// Flat key/value metadata parsed from a document's header block.
///
/// This is intentionally not a YAML parser. Each line is split on the first
/// `:`; a value wrapped in `[...]` becomes a list split on `,`; surrounding
/// quote characters are stripped. Lines without a `:` are skipped.
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    fields: BTreeMap<String, Value>,
}

impl FrontMatter {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Scalar value for `key`, if present and scalar.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Scalar(s)) => Some(s),
            _ => None,
        }
    }

    /// List value for `key`. A scalar containing commas is treated as a
    /// comma-separated list, so `tags: a, b` and `tags: [a, b]` read the
    /// same way.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.fields.get(key)? {
            Value::List(items) => Some(items.clone()),
            Value::Scalar(s) => Some(split_list(s)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split raw document text into its metadata header and body.
///
/// The header is a block opened and closed by a `---` line at the very start
/// of the text. If the opening fence is absent, or it never closes, the
/// whole text is the body and the metadata is empty, never partial.
pub fn split(text: &str) -> (FrontMatter, &str) {
    let Some(rest) = strip_opening_fence(text) else {
        return (FrontMatter::default(), text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if is_fence(line) {
            let header = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (parse_header(header), body);
        }
        offset += line.len();
    }

    // Unterminated fence: treat the whole file as body.
    (FrontMatter::default(), text)
}

fn strip_opening_fence(text: &str) -> Option<&str> {
    let first_line = text.split_inclusive('\n').next()?;
    is_fence(first_line).then(|| &text[first_line.len()..])
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches(['\n', '\r']) == FENCE
}

fn parse_header(header: &str) -> FrontMatter {
    let mut fields = BTreeMap::new();

    for line in header.lines() {
        // Malformed lines (no `:`) are skipped, not errors.
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        fields.insert(key.to_string(), parse_value(value.trim()));
    }

    FrontMatter { fields }
}

fn parse_value(raw: &str) -> Value {
    if let Some(inner) = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
    {
        Value::List(split_list(inner))
    } else {
        Value::Scalar(strip_quotes(raw).to_string())
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches(['"', '\''])
}
