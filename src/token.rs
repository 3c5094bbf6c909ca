//! Lexical classification of script text for syntax highlighting.
//!
//! The tokenizer never fails: anything it does not recognise becomes a
//! single-character [`TokenKind::Symbol`].

use crate::catalog::Catalog;

/// Token classes, in recognition priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Any other single character (`#`, `+`, `:`, …).
    Symbol,
    /// A double-quoted string, quotes included.
    Literal,
    /// A letter followed by letters or digits that is not a keyword.
    Identifier,
    /// Digits with an optional leading sign and an optional decimal part.
    Numeric,
    /// An identifier that exactly matches a command name.
    Keyword,
}

/// A classified slice of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the first character in the source.
    pub position: usize,
}

impl Token<'_> {
    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }
}

/// Keyword-aware tokenizer. Holds no state between calls other than the
/// keyword list.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    keywords: Vec<String>,
}

impl Tokenizer {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokenizer whose keywords are the built-in command names.
    pub fn builtin() -> Self {
        Self::new(Catalog::builtin().names())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Lazily tokenize `text`.
    pub fn tokenize<'k, 's>(&'k self, text: &'s str) -> Tokens<'k, 's> {
        Tokens {
            src: text,
            pos: 0,
            keywords: &self.keywords,
            sign_allowed: true,
        }
    }
}

/// Tokenize `text` against the built-in command names and collect the result.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let tokenizer = Tokenizer::builtin();
    tokenizer.tokenize(text).collect()
}

/// Iterator over the tokens of one source string.
#[derive(Debug, Clone)]
pub struct Tokens<'k, 's> {
    src: &'s str,
    pos: usize,
    keywords: &'k [String],
    /// Whether a `+`/`-` at the cursor may start a number: true at the start,
    /// after whitespace and after any symbol other than `+`.
    sign_allowed: bool,
}

impl<'s> Tokens<'_, 's> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn emit(&mut self, kind: TokenKind, len: usize) -> Token<'s> {
        let token = Token {
            kind,
            text: &self.src[self.pos..self.pos + len],
            position: self.pos,
        };
        self.pos += len;
        self.sign_allowed = kind == TokenKind::Symbol && token.text != "+";
        token
    }
}

impl<'s> Iterator for Tokens<'_, 's> {
    type Item = Token<'s>;

    fn next(&mut self) -> Option<Token<'s>> {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        if trimmed.len() < rest.len() {
            self.pos += rest.len() - trimmed.len();
            self.sign_allowed = true;
        }

        let first = trimmed.chars().next()?;

        if first.is_alphabetic() {
            let len = word_len(trimmed);
            let word = &trimmed[..len];
            let kind = if self.keywords.iter().any(|k| k == word) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return Some(self.emit(kind, len));
        }

        if let Some(len) = numeric_len(trimmed, self.sign_allowed) {
            return Some(self.emit(TokenKind::Numeric, len));
        }

        if first == '"' {
            return Some(self.emit(TokenKind::Literal, literal_len(trimmed)));
        }

        Some(self.emit(TokenKind::Symbol, first.len_utf8()))
    }
}

fn word_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !c.is_alphanumeric())
        .map_or(s.len(), |(i, _)| i)
}

/// Length of a numeric run at the start of `s`: `[+-]?digits(.digits)?`.
/// The sign is only taken when `signed` is set.
fn numeric_len(s: &str, signed: bool) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if signed && matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    let digits_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        i += 1;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
    }
    Some(i)
}

/// Length of a quoted literal at the start of `s`, closing quote included.
/// An unterminated literal extends to the end of the line.
fn literal_len(s: &str) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return i + 1;
        } else if c == '\n' {
            return i;
        }
    }
    s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds<'a>(tokens: &[Token<'a>]) -> Vec<(TokenKind, &'a str)> {
        tokens.iter().map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  \n\t ").is_empty());
    }

    #[test]
    fn test_classifies_a_line() {
        let tokens = tokenize("MouseMove 100 -20");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Keyword, "MouseMove"),
                (TokenKind::Numeric, "100"),
                (TokenKind::Numeric, "-20"),
            ]
        );
        assert_eq!(tokens[1].position, 10);
        assert_eq!(tokens[2].position, 14);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let tokens = tokenize("keypress KeyPress");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
    }

    #[test]
    fn test_literals_and_symbols() {
        let tokens = tokenize("KeyPressText \"a \\\" b\" # done");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Keyword, "KeyPressText"),
                (TokenKind::Literal, "\"a \\\" b\""),
                (TokenKind::Symbol, "#"),
                (TokenKind::Identifier, "done"),
            ]
        );
    }

    #[test]
    fn test_unterminated_literal_stops_at_newline() {
        let tokens = tokenize("\"open\nWait 5");
        assert_eq!(
            tokens[0],
            Token {
                kind: TokenKind::Literal,
                text: "\"open",
                position: 0,
            }
        );
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].position, 6);
    }

    #[test]
    fn test_numbers() {
        let tokens = tokenize("1.5 +3 - 7. x2");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Numeric, "1.5"),
                (TokenKind::Numeric, "+3"),
                (TokenKind::Symbol, "-"),
                (TokenKind::Numeric, "7"),
                (TokenKind::Symbol, "."),
                (TokenKind::Identifier, "x2"),
            ]
        );
    }

    #[test]
    fn test_ctrl_chord() {
        let tokens = tokenize("KeyPress Ctrl+C");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Keyword, "KeyPress"),
                (TokenKind::Identifier, "Ctrl"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Identifier, "C"),
            ]
        );
    }

    #[test]
    fn test_chord_with_digit_key() {
        let tokens = tokenize("KeyPress Ctrl+3");
        assert_eq!(
            kinds(&tokens),
            vec![
                (TokenKind::Keyword, "KeyPress"),
                (TokenKind::Identifier, "Ctrl"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Numeric, "3"),
            ]
        );
    }

    #[test]
    fn test_sign_context() {
        assert_eq!(
            kinds(&tokenize("2+3 (-4) ++5")),
            vec![
                (TokenKind::Numeric, "2"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Numeric, "3"),
                (TokenKind::Symbol, "("),
                (TokenKind::Numeric, "-4"),
                (TokenKind::Symbol, ")"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Symbol, "+"),
                (TokenKind::Numeric, "5"),
            ]
        );
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Label top\nKeyPress A\nCall top\n";
        let tokenizer = Tokenizer::builtin();
        let first: Vec<_> = tokenizer.tokenize(text).collect();
        let second: Vec<_> = tokenizer.tokenize(text).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|t| &text[t.position..t.end()] == t.text));
    }

    #[test]
    fn test_custom_keywords() {
        let tokenizer = Tokenizer::new(["Fly"]);
        let tokens: Vec<_> = tokenizer.tokenize("Fly KeyPress").collect();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
    }
}
