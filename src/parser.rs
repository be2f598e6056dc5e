//! Recursive-descent parser for Doxyfile statements
//!
//! The parser drives the [`Lexer`] one statement at a time and mutates a
//! shared [`ConfigMap`]. Meta-directives (`@INCLUDE`, `@INCLUDE_PATH`)
//! control the parse itself: `@INCLUDE` resolves its argument against the
//! current file's directory followed by the accumulated search path and
//! runs a nested parse over the resolved file, sharing the same map and
//! [`IncludeContext`].
//!
//! All errors propagate: a failed statement aborts the whole top-level
//! parse, and the caller decides whether a missing configuration is fatal.

use crate::config::{Config, ConfigMap, ValueList};
use crate::env::{Environment, expand};
use crate::error::{DoxyfileError, ParseError};
use crate::lexer::{Lexer, Operator};
use std::fs;
use std::path::{Path, PathBuf};

/// Parses a configuration file and returns the normalized configuration
///
/// Equivalent to [`parse_file_with_search_path`] with an empty search path.
pub fn parse_file(path: impl AsRef<Path>, env: &Environment) -> Result<Config, DoxyfileError> {
    parse_file_with_search_path(path, env, Vec::new())
}

/// Parses a configuration file with an initial `@INCLUDE` search path
///
/// The search path seeds the [`IncludeContext`]; `@INCLUDE_PATH` directives
/// encountered during the parse extend it in declaration order.
pub fn parse_file_with_search_path(
    path: impl AsRef<Path>,
    env: &Environment,
    search_path: Vec<PathBuf>,
) -> Result<Config, DoxyfileError> {
    let mut context = IncludeContext::with_search_path(search_path);
    let mut items = ConfigMap::new();
    parse_into(path.as_ref(), env, &mut context, &mut items)?;
    Ok(items.normalize())
}

/// Parses configuration text held in memory
///
/// `@INCLUDE` arguments resolve relative to the process's current directory
/// (plus any `@INCLUDE_PATH` entries seen so far). Diagnostics use the
/// pseudo-path `<string>`.
pub fn parse_str(source: &str, env: &Environment) -> Result<Config, DoxyfileError> {
    let mut context = IncludeContext::new();
    let mut items = ConfigMap::new();
    let mut parser = Parser::new(source, "<string>", env);
    parser.parse(&mut context, &mut items)?;
    Ok(items.normalize())
}

/// Reads and parses one file into the shared accumulation state
fn parse_into(
    path: &Path,
    env: &Environment,
    context: &mut IncludeContext,
    items: &mut ConfigMap,
) -> Result<(), DoxyfileError> {
    let source = fs::read_to_string(path).map_err(|source| DoxyfileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    context.enter(path);
    let result = Parser::new(&source, path, env).parse(context, items);
    context.leave();
    result
}

/// Include-resolution state threaded through nested parses
///
/// Holds the `@INCLUDE_PATH` search directories, mutated forward through
/// recursion so that later includes see earlier entries, and the stack of
/// files currently being parsed for cycle detection.
#[derive(Debug, Default, Clone)]
pub struct IncludeContext {
    search_path: Vec<PathBuf>,
    active: Vec<PathBuf>,
}

impl IncludeContext {
    /// Creates a context with an empty search path
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context seeded with `search_path`
    pub fn with_search_path(search_path: Vec<PathBuf>) -> Self {
        Self {
            search_path,
            active: Vec::new(),
        }
    }

    /// The accumulated search directories, in declaration order
    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    /// Appends directories contributed by an `@INCLUDE_PATH` directive
    pub fn push_search_dirs(&mut self, dirs: impl IntoIterator<Item = PathBuf>) {
        self.search_path.extend(dirs);
    }

    /// Marks `path` as being parsed
    pub(crate) fn enter(&mut self, path: &Path) {
        self.active.push(canonical(path));
    }

    /// Unmarks the most recently entered file
    pub(crate) fn leave(&mut self) {
        self.active.pop();
    }

    /// Returns true if `path` is on the active parse stack
    pub(crate) fn is_active(&self, path: &Path) -> bool {
        let canonical = canonical(path);
        self.active.contains(&canonical)
    }
}

/// Canonicalizes for cycle comparison; unresolvable paths compare as-is
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Parser over one configuration file
///
/// Construct one per file; nested `@INCLUDE` parses get their own instance
/// over the included file while sharing the [`ConfigMap`] and
/// [`IncludeContext`] passed to [`parse`](Parser::parse).
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    path: PathBuf,
    /// Directory of the file being parsed; first include candidate
    dir: PathBuf,
    env: &'a Environment,
}

impl<'a> Parser<'a> {
    /// Creates a parser over `source`, attributed to `path` in diagnostics
    pub fn new(source: &'a str, path: impl Into<PathBuf>, env: &'a Environment) -> Self {
        let path = path.into();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self {
            lexer: Lexer::new(source),
            path,
            dir,
            env,
        }
    }

    /// Wraps a grammar error with this file's path
    fn fail(&self, source: ParseError) -> DoxyfileError {
        DoxyfileError::Parse {
            path: self.path.clone(),
            source,
        }
    }

    /// Parses every statement of the file into `items`
    ///
    /// Per statement: variable name, operator, substituted value list, then
    /// dispatch — meta-directives mutate the parse state, everything else
    /// is a key assignment (`=` replaces, `+=` appends). Terminates
    /// normally when the lexer runs out of variable names.
    pub fn parse(
        &mut self,
        context: &mut IncludeContext,
        items: &mut ConfigMap,
    ) -> Result<(), DoxyfileError> {
        loop {
            let name = match self.lexer.var() {
                Ok(Some(name)) => name,
                Ok(None) => return Ok(()),
                Err(e) => return Err(self.fail(e.into())),
            };
            let line = self.lexer.line();
            let Some(op) = self.lexer.op() else {
                return Err(self.fail(ParseError::MissingOperator {
                    variable: name.to_string(),
                    line,
                }));
            };
            let mut values = ValueList::new();
            loop {
                match self.lexer.next_value() {
                    Ok(Some(value)) => values.push(expand(&value, self.env).into_owned()),
                    Ok(None) => break,
                    Err(e) => return Err(self.fail(e.into())),
                }
            }
            if values.is_empty() {
                return Err(self.fail(ParseError::MissingValue {
                    variable: name.to_string(),
                    line,
                }));
            }
            if let Some(directive) = name.strip_prefix('@') {
                self.meta(directive, line, values, context, items)?;
            } else {
                match op {
                    Operator::Assign => items.assign(name, values),
                    Operator::Append => items.append(name, values),
                }
            }
        }
    }

    /// Dispatches a meta-directive by name
    fn meta(
        &mut self,
        directive: &str,
        line: usize,
        values: ValueList,
        context: &mut IncludeContext,
        items: &mut ConfigMap,
    ) -> Result<(), DoxyfileError> {
        match directive {
            "INCLUDE" => self.include(line, values, context, items),
            "INCLUDE_PATH" => {
                context.push_search_dirs(values.into_iter().map(PathBuf::from));
                Ok(())
            }
            _ => Err(self.fail(ParseError::UnknownDirective {
                directive: format!("@{directive}"),
                line,
            })),
        }
    }

    /// Resolves and parses an `@INCLUDE` target
    ///
    /// Candidate directories: this file's directory, then the search path
    /// in declaration order; the first directory containing the file wins.
    /// The resolved path is recorded under the `@INCLUDE` key before the
    /// nested parse runs, so the final configuration lists included files
    /// in inclusion order.
    fn include(
        &mut self,
        line: usize,
        values: ValueList,
        context: &mut IncludeContext,
        items: &mut ConfigMap,
    ) -> Result<(), DoxyfileError> {
        if values.len() != 1 {
            return Err(self.fail(ParseError::IncludeArity {
                count: values.len(),
                line,
            }));
        }
        let file = &values[0];
        let mut candidates = Vec::with_capacity(context.search_path().len() + 1);
        candidates.push(self.dir.join(file));
        candidates.extend(context.search_path().iter().map(|dir| dir.join(file)));

        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            if context.is_active(&candidate) {
                return Err(self.fail(ParseError::IncludeCycle {
                    path: candidate,
                    line,
                }));
            }
            items.append(
                "@INCLUDE",
                ValueList::from_iter([candidate.to_string_lossy().into_owned()]),
            );
            return parse_into(&candidate, self.env, context, items);
        }

        Err(self.fail(ParseError::IncludeNotFound {
            file: file.clone(),
            line,
        }))
    }
}
