//! MHD plain-text header parsing.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A single header field value.
///
/// A value containing anything besides digits, spaces and decimal points is
/// kept verbatim as text. Everything else is tokenized on spaces and parsed
/// as floats: exactly one number is stored as a scalar, any other count as a
/// list.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    Scalar(f64),
    List(Vec<f64>),
    Text(String),
}

/// Parsed contents of an MHD header file.
///
/// Field names are case-folded to lowercase. The header also records the
/// path it was parsed from.
#[derive(Clone, Debug)]
pub struct MhdHeader {
    path: PathBuf,
    fields: HashMap<String, HeaderValue>,
}

impl MhdHeader {
    /// Reads and parses the header file at `path`.
    ///
    /// Malformed lines are skipped with a diagnostic and never abort the
    /// parse; a file without a single parseable line yields an empty header,
    /// which callers must treat as a failed load.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        let mut fields = HashMap::new();
        for line in contents.lines() {
            if line.is_empty() {
                continue;
            }

            let key = leading_word(line);
            if key.is_empty() {
                log::debug!("skipping header line without a key token: {line:?}");
                continue;
            }

            let Some(value) = value_after_equals(&line[key.len()..]) else {
                log::warn!("no value found for header key `{key}`");
                continue;
            };

            let key = key.to_ascii_lowercase();
            match classify_value(value) {
                Some(parsed) => {
                    fields.insert(key, parsed);
                }
                None => log::warn!("dropping header key `{key}`: unparseable number in {value:?}"),
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            fields,
        })
    }

    /// Path of the header file this was parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when not a single field was parsed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.fields.get(key)
    }

    /// The field's value, if it parsed as a single number.
    pub fn scalar(&self, key: &str) -> Option<f64> {
        match self.fields.get(key) {
            Some(HeaderValue::Scalar(n)) => Some(*n),
            _ => None,
        }
    }

    /// The field's value, if it parsed as a list of numbers.
    pub fn list(&self, key: &str) -> Option<&[f64]> {
        match self.fields.get(key) {
            Some(HeaderValue::List(numbers)) => Some(numbers),
            _ => None,
        }
    }

    /// The field's value, if it was kept as raw text.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(HeaderValue::Text(s)) => Some(s),
            _ => None,
        }
    }
}

/// Leading run of word characters (letters, digits, underscore).
fn leading_word(line: &str) -> &str {
    line.find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .map_or(line, |end| &line[..end])
}

/// Everything after an `=` sign, surrounding spaces stripped. `None` when
/// the line carries no `=`-separated value.
fn value_after_equals(rest: &str) -> Option<&str> {
    rest.trim_start().strip_prefix('=').map(str::trim)
}

fn classify_value(value: &str) -> Option<HeaderValue> {
    if value
        .chars()
        .any(|c| !c.is_ascii_digit() && c != ' ' && c != '.')
    {
        return Some(HeaderValue::Text(value.to_string()));
    }

    let mut numbers = Vec::new();
    for token in value.split(' ').filter(|token| !token.is_empty()) {
        numbers.push(token.parse::<f64>().ok()?);
    }

    Some(if numbers.len() == 1 {
        HeaderValue::Scalar(numbers[0])
    } else {
        HeaderValue::List(numbers)
    })
}
