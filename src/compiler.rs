//! Script compiler for the automate macro language.
//!
//! The top-level entry points are [`compile_str`], [`compile`] and
//! [`compile_file`]; [`Compiler`] compiles against a custom [`Catalog`].

use crate::catalog::Catalog;
use crate::command::{MacroCommand, PrepareScope};
use crate::commands::Label;
use crate::error::{CatalogError, CompileError, PrepareError};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Lines whose first non-space character is this are comments.
pub const COMMENT_PREFIX: char = '#';

/// One compiled script line.
pub struct Instruction {
    /// 1-based source line number.
    pub line: usize,
    /// Parameters after preparation (jump targets are already resolved).
    pub parameters: Vec<String>,
    pub command: Box<dyn MacroCommand>,
}

impl Instruction {
    pub fn name(&self) -> &'static str {
        self.command.name()
    }
}

impl std::fmt::Debug for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instruction")
            .field("line", &self.line)
            .field("name", &self.name())
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A fully validated script, ready for [`Engine::start`](crate::Engine::start).
///
/// Instructions are in source order. Blank and comment lines are not
/// instructions but still count towards line numbers.
#[derive(Debug, Default)]
pub struct CompiledScript {
    instructions: Vec<Instruction>,
    labels: BTreeMap<String, usize>,
    line_count: usize,
}

impl CompiledScript {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of source lines, including blank and comment lines.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// `Label` names mapped to their 0-based instruction index.
    pub fn labels(&self) -> &BTreeMap<String, usize> {
        &self.labels
    }

    /// Index of the first instruction at or after 1-based `line`.
    ///
    /// Jumping to a blank or comment line therefore continues with the next
    /// real instruction, and a line past the end yields `len()`.
    pub fn index_for_line(&self, line: usize) -> usize {
        self.instructions.partition_point(|i| i.line < line)
    }
}

/// A non-blank, non-comment source line split into name and parameters.
#[derive(Debug, Clone)]
pub(crate) struct SourceLine {
    pub(crate) line: usize,
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
}

/// Read-only view of the tokenized script used during preparation.
#[derive(Debug, Default)]
pub(crate) struct ScriptSource {
    lines: Vec<SourceLine>,
    line_count: usize,
}

impl ScriptSource {
    pub(crate) fn line_count(&self) -> usize {
        self.line_count
    }

    /// Linear search for a jump target; returns the 0-based source line index.
    pub(crate) fn find_target(&self, name: &str, from_line: usize) -> Option<usize> {
        let label = self.lines.iter().find(|l| {
            l.name.eq_ignore_ascii_case(Label::NAME)
                && l.params.first().is_some_and(|p| p == name)
        });
        let keyword = || {
            self.lines
                .iter()
                .find(|l| l.line != from_line && l.name.eq_ignore_ascii_case(name))
        };
        label.or_else(keyword).map(|l| l.line - 1)
    }
}

/// Compiles script text against a [`Catalog`].
#[derive(Debug, Clone, Copy)]
pub struct Compiler<'c> {
    catalog: &'c Catalog,
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl<'c> Compiler<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Compile a sequence of lines. Line `i` of the input is script line `i + 1`.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown command, malformed parameter or unresolved
    /// jump target; nothing is returned for a script that fails.
    pub fn compile<S: AsRef<str>>(&self, lines: &[S]) -> Result<CompiledScript, CompileError> {
        let source = split_source(lines)?;

        let mut instructions = Vec::with_capacity(source.lines.len());
        let mut labels = BTreeMap::new();

        for src in &source.lines {
            let descriptor = self.catalog.lookup(&src.name).map_err(|e| match e {
                CatalogError::UnknownCommand(name) | CatalogError::DuplicateCommand(name) => {
                    CompileError::UnknownCommand {
                        name,
                        line: src.line,
                    }
                }
            })?;

            if !descriptor.arity.accepts(src.params.len()) {
                return Err(CompileError::InvalidParameters {
                    command: descriptor.name.to_string(),
                    line: src.line,
                    reason: format!(
                        "expected {}, got {}",
                        descriptor.arity.describe(),
                        src.params.len()
                    ),
                });
            }

            let mut command = (descriptor.factory)();
            let mut parameters = src.params.clone();
            let mut scope = PrepareScope {
                line: src.line,
                parameters: &mut parameters,
                source: &source,
            };
            command.prepare(&mut scope).map_err(|e| match e {
                PrepareError::InvalidParameters(reason) => CompileError::InvalidParameters {
                    command: descriptor.name.to_string(),
                    line: src.line,
                    reason,
                },
                PrepareError::UnresolvedTarget(name) => CompileError::UnresolvedTarget {
                    name,
                    line: src.line,
                },
            })?;

            if command.name() == Label::NAME {
                if let Some(name) = parameters.first() {
                    labels.entry(name.clone()).or_insert(instructions.len());
                }
            }

            instructions.push(Instruction {
                line: src.line,
                parameters,
                command,
            });
        }

        debug!(
            instructions = instructions.len(),
            lines = source.line_count,
            "compiled script"
        );

        Ok(CompiledScript {
            instructions,
            labels,
            line_count: source.line_count,
        })
    }

    pub fn compile_str(&self, content: &str) -> Result<CompiledScript, CompileError> {
        let lines: Vec<&str> = content.lines().collect();
        self.compile(&lines)
    }
}

/// Compile a script from a string slice using the built-in catalog.
///
/// Blank lines and lines starting with `#` produce no instruction but keep
/// their line number. Inline comments (` # …`) are stripped while preserving
/// `#` characters inside quoted strings.
///
/// # Example
///
/// ```
/// use automate::compile_str;
///
/// let script = compile_str("MouseMove 10 20\n# click it\nMouseClick\n").unwrap();
/// assert_eq!(script.len(), 2);
/// assert_eq!(script.instructions()[1].line, 3);
/// ```
pub fn compile_str(content: &str) -> Result<CompiledScript, CompileError> {
    Compiler::default().compile_str(content)
}

/// Compile a sequence of lines using the built-in catalog.
pub fn compile<S: AsRef<str>>(lines: &[S]) -> Result<CompiledScript, CompileError> {
    Compiler::default().compile(lines)
}

/// Read a script file and compile it with [`compile_str`].
pub fn compile_file(path: impl AsRef<Path>) -> Result<CompiledScript, CompileError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_str(&content)
}

fn split_source<S: AsRef<str>>(lines: &[S]) -> Result<ScriptSource, CompileError> {
    let mut out = Vec::new();
    for (idx, raw) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let line = raw.as_ref().trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let line = strip_inline_comment(line);
        let (name, args) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let params = split_params(args).map_err(|reason| CompileError::InvalidParameters {
            command: name.to_string(),
            line: line_num,
            reason,
        })?;
        out.push(SourceLine {
            line: line_num,
            name: name.to_string(),
            params,
        });
    }
    Ok(ScriptSource {
        lines: out,
        line_count: lines.len(),
    })
}

/// Split an argument string on whitespace; a double-quoted span is one
/// parameter with its escapes processed.
pub(crate) fn split_params(args: &str) -> Result<Vec<String>, String> {
    let mut params = Vec::new();
    let mut chars = args.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch == '"' {
            chars.next();
            let mut escaped = false;
            let mut end = None;
            for (i, c) in chars.by_ref() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    end = Some(i);
                    break;
                }
            }
            let end = end.ok_or_else(|| "unclosed quote".to_string())?;
            params.push(parse_quoted_string(&args[start..=end])?);
            continue;
        }

        let mut end = args.len();
        while let Some(&(i, c)) = chars.peek() {
            if c.is_whitespace() {
                end = i;
                break;
            }
            chars.next();
        }
        params.push(args[start..end].to_string());
    }

    Ok(params)
}

/// Strip inline comments from a line, preserving `#` inside quoted strings.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if ch == COMMENT_PREFIX && !in_quotes {
            return line[..i].trim();
        }
    }
    line
}

/// Parse a duration: a bare integer is milliseconds; `500ms`, `1.5s` also work.
pub(crate) fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    if let Some(ms_str) = s.strip_suffix("ms") {
        let ms: u64 = ms_str
            .trim()
            .parse()
            .map_err(|_| format!("invalid milliseconds value: {s}"))?;
        Ok(Duration::from_millis(ms))
    } else if let Some(s_str) = s.strip_suffix('s') {
        let secs: f64 = s_str
            .trim()
            .parse()
            .map_err(|_| format!("invalid seconds value: {s}"))?;
        Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid seconds value: {s}"))
    } else {
        Err(format!("duration must be milliseconds or end with 's' or 'ms', got: {s}"))
    }
}

/// Parse a double-quoted string, processing `\n`, `\t`, `\"`, and `\\`.
pub(crate) fn parse_quoted_string(s: &str) -> Result<String, String> {
    let s = s.trim();
    if s.len() < 2 || !s.starts_with('"') || !s.ends_with('"') {
        return Err(format!("expected a double-quoted string, got: {s}"));
    }
    let mut out = String::with_capacity(s.len() - 2);
    let mut chars = s[1..s.len() - 1].chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1s").unwrap(), Duration::from_secs(1));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(
            parse_duration("1.5s").unwrap(),
            Duration::from_secs_f64(1.5)
        );
        assert!(parse_duration("5minutes").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_quoted_string() {
        assert_eq!(parse_quoted_string("\"hello\"").unwrap(), "hello");
        assert_eq!(
            parse_quoted_string("\"hello\\nworld\"").unwrap(),
            "hello\nworld"
        );
        assert_eq!(
            parse_quoted_string(r#""say \"hi\" \\o/""#).unwrap(),
            r#"say "hi" \o/"#
        );
        assert!(parse_quoted_string("\"").is_err());
    }

    #[test]
    fn test_split_params() {
        assert_eq!(split_params("10  20").unwrap(), vec!["10", "20"]);
        assert_eq!(
            split_params(r#""hello world" 50"#).unwrap(),
            vec!["hello world", "50"]
        );
        assert_eq!(split_params("").unwrap(), Vec::<String>::new());
        assert!(split_params(r#""unclosed"#).is_err());
    }

    #[test]
    fn test_strip_inline_comments() {
        assert_eq!(strip_inline_comment("Wait 100 # comment"), "Wait 100");
        assert_eq!(
            strip_inline_comment("KeyPressText \"#hashtag\""),
            "KeyPressText \"#hashtag\""
        );
        assert_eq!(
            strip_inline_comment("KeyPressText \"a#1\" # comment"),
            "KeyPressText \"a#1\""
        );
    }

    #[test]
    fn test_compile_keeps_line_numbers() {
        let script = compile_str("\nKeyPress A\n# note\n\nKeyPress B\n").unwrap();
        assert_eq!(script.len(), 2);
        assert_eq!(script.line_count(), 5);
        let lines: Vec<usize> = script.instructions().iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn test_compile_is_case_insensitive() {
        let script = compile_str("keypress a\nMOUSEMOVE 1 2\n").unwrap();
        assert_eq!(script.instructions()[0].name(), "KeyPress");
        assert_eq!(script.instructions()[1].name(), "MouseMove");
    }

    #[test]
    fn test_unknown_command_aborts_compile() {
        let err = compile_str("KeyPress A\nFly 1 2\n").unwrap_err();
        match err {
            CompileError::UnknownCommand { name, line } => {
                assert_eq!(name, "Fly");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_arity_mismatch() {
        let err = compile_str("MouseMove 10").unwrap_err();
        assert!(matches!(
            err,
            CompileError::InvalidParameters { line: 1, .. }
        ));
        assert!(err.to_string().contains("expected 2 parameters, got 1"), "got: {err}");
    }

    #[test]
    fn test_unclosed_quote() {
        let err = compile_str("KeyPressText \"oops").unwrap_err();
        assert!(err.to_string().contains("unclosed quote"), "got: {err}");
    }

    #[test]
    fn test_call_resolves_numeric_line() {
        let script = compile_str("KeyPress A\nKeyPress B\nCall 1\n").unwrap();
        assert_eq!(script.instructions()[2].parameters, vec!["1"]);
    }

    #[test]
    fn test_call_resolves_keyword_to_line_number() {
        let text = "Wait 10\nMouseMove 5 5\nMouseClick\nCall MouseMove\n";
        let first = compile_str(text).unwrap();
        let second = compile_str(text).unwrap();
        // MouseMove is source index 1, so the target becomes line 2.
        assert_eq!(first.instructions()[3].parameters, vec!["2"]);
        assert_eq!(
            first.instructions()[3].parameters,
            second.instructions()[3].parameters
        );
    }

    #[test]
    fn test_call_prefers_label() {
        let text = "Wait 10\nLabel Wait\nKeyPress A\nCall Wait\n";
        let script = compile_str(text).unwrap();
        assert_eq!(script.instructions()[3].parameters, vec!["2"]);
        assert_eq!(script.labels().get("Wait"), Some(&1));
    }

    #[test]
    fn test_call_unresolved_target() {
        let err = compile_str("KeyPress A\nCall nowhere\n").unwrap_err();
        match err {
            CompileError::UnresolvedTarget { name, line } => {
                assert_eq!(name, "nowhere");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_call_line_outside_script_still_compiles() {
        let script = compile_str("KeyPress A\nCall 0\nCall 9\n").unwrap();
        assert_eq!(script.instructions()[1].parameters, vec!["0"]);
        assert_eq!(script.instructions()[2].parameters, vec!["9"]);
        assert_eq!(script.index_for_line(9), script.len());
    }

    #[test]
    fn test_index_for_line() {
        let script = compile_str("KeyPress A\n\n# c\nKeyPress B\n").unwrap();
        assert_eq!(script.index_for_line(1), 0);
        assert_eq!(script.index_for_line(2), 1);
        assert_eq!(script.index_for_line(4), 1);
        assert_eq!(script.index_for_line(5), 2);
    }

    #[test]
    fn test_compile_file_missing() {
        let err = compile_file("/nonexistent/automate/script.txt").unwrap_err();
        assert!(matches!(err, CompileError::Io { .. }));
    }
}
