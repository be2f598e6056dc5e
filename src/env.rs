//! Environment substitution for configuration values
//!
//! Doxyfile values may reference caller-supplied variables with the
//! `$(NAME)` syntax. Expansion is a single pass over the original text:
//! substituted values are never rescanned, so a self-referential
//! environment cannot loop.

use indexmap::IndexMap;
use std::borrow::Cow;

/// Caller-supplied variable mapping used for `$(NAME)` expansion
///
/// This is distinct from the process environment; the orchestration layer
/// decides what goes in here. Unresolved names expand to the empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Environment {
    vars: IndexMap<String, String>,
}

impl Environment {
    /// Creates an empty environment
    pub fn new() -> Self {
        Self {
            vars: IndexMap::new(),
        }
    }

    /// Sets a variable, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Looks up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Number of variables in the environment
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if the environment holds no variables
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Environment {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.vars
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

/// Variable names match `[0-9A-Za-z_-]+`
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

/// Finds the next well-formed `$(NAME)` reference at or after `from`
///
/// Returns the byte range of the whole reference and the name inside it.
/// Malformed references (`$()`, `$(x!`, unclosed `$(`) are skipped over and
/// left in the text verbatim.
fn next_reference(input: &str, mut from: usize) -> Option<(usize, usize, &str)> {
    let bytes = input.as_bytes();
    while let Some(offset) = input[from..].find("$(") {
        let start = from + offset;
        let name_start = start + 2;
        let mut name_end = name_start;
        while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
            name_end += 1;
        }
        if name_end > name_start && bytes.get(name_end) == Some(&b')') {
            return Some((start, name_end + 1, &input[name_start..name_end]));
        }
        from = start + 1;
    }
    None
}

/// Expands every `$(NAME)` reference in `input` against `env`
///
/// Single, non-recursive pass: the replacement text is copied through
/// without being scanned for further references. Names missing from the
/// environment expand to the empty string. Returns a borrowed `Cow` when
/// the input contains no references.
pub fn expand<'a>(input: &'a str, env: &Environment) -> Cow<'a, str> {
    let Some((start, end, name)) = next_reference(input, 0) else {
        return Cow::Borrowed(input);
    };

    let mut result = String::with_capacity(input.len());
    result.push_str(&input[..start]);
    result.push_str(env.get(name).unwrap_or(""));
    let mut pos = end;

    while let Some((start, end, name)) = next_reference(input, pos) {
        result.push_str(&input[pos..start]);
        result.push_str(env.get(name).unwrap_or(""));
        pos = end;
    }
    result.push_str(&input[pos..]);
    Cow::Owned(result)
}
