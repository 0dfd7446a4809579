//! SDL lexer with source position tracking
//!
//! Produces the token stream the recursive descent parser consumes. Every
//! token carries the 1-indexed line and column where it started, so syntax
//! errors can point at the offending token in the offending source.

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Int(i64),
    Float(f64),
    /// A string or block string literal, with escapes resolved.
    Str(String),
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl TokenKind {
    /// Short rendering for "expected X, found Y" messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Name(name) => format!("\"{}\"", name),
            TokenKind::Int(v) => format!("\"{}\"", v),
            TokenKind::Float(v) => format!("\"{}\"", v),
            TokenKind::Str(_) => "String".to_string(),
            TokenKind::Punct(c) => format!("\"{}\"", c),
            TokenKind::Eof => "<EOF>".to_string(),
        }
    }
}

const PUNCTUATORS: &str = "!&():=@[]{|}";

pub struct Lexer<'a> {
    locator: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(locator: &'a str, input: &'a str) -> Self {
        Self {
            locator,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Lex the whole source. The returned stream always ends with an `Eof`
    /// token carrying the position just past the last character.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LoadError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let Some(&c) = self.chars.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    column,
                });
                return Ok(tokens);
            };

            let kind = if c == '_' || c.is_ascii_alphabetic() {
                self.lex_name()
            } else if c == '-' || c.is_ascii_digit() {
                self.lex_number(line, column)?
            } else if c == '"' {
                self.lex_string(line, column)?
            } else if PUNCTUATORS.contains(c) {
                self.bump();
                TokenKind::Punct(c)
            } else {
                return Err(self.err(format!("unexpected character {:?}", c), line, column));
            };
            tokens.push(Token { kind, line, column });
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(&c) = self.chars.peek() {
            match c {
                // Commas are insignificant separators in SDL.
                ' ' | '\t' | '\r' | '\n' | ',' | '\u{feff}' => {
                    self.bump();
                }
                '#' => {
                    while let Some(&c) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn lex_name(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == '_' || c.is_ascii_alphanumeric() {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Name(name)
    }

    fn lex_number(&mut self, line: usize, column: usize) -> Result<TokenKind, LoadError> {
        let mut text = String::new();
        if self.chars.peek() == Some(&'-') {
            text.push('-');
            self.bump();
        }
        let mut is_float = false;
        while let Some(&c) = self.chars.peek() {
            match c {
                '0'..='9' => {
                    text.push(c);
                    self.bump();
                }
                '.' | 'e' | 'E' if !is_float || c != '.' => {
                    is_float = true;
                    text.push(c);
                    self.bump();
                    if matches!(c, 'e' | 'E') {
                        if let Some(&sign @ ('+' | '-')) = self.chars.peek() {
                            text.push(sign);
                            self.bump();
                        }
                    }
                }
                _ => break,
            }
        }
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| self.err(format!("invalid number {:?}", text), line, column))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| self.err(format!("invalid number {:?}", text), line, column))
        }
    }

    fn lex_string(&mut self, line: usize, column: usize) -> Result<TokenKind, LoadError> {
        self.bump(); // opening quote
        if self.chars.peek() == Some(&'"') {
            self.bump();
            if self.chars.peek() == Some(&'"') {
                self.bump();
                return self.lex_block_string(line, column);
            }
            // Empty string literal.
            return Ok(TokenKind::Str(String::new()));
        }

        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err("unterminated string", line, column));
            };
            match c {
                '"' => return Ok(TokenKind::Str(value)),
                '\n' => return Err(self.err("unterminated string", line, column)),
                '\\' => {
                    let Some(esc) = self.bump() else {
                        return Err(self.err("unterminated string", line, column));
                    };
                    match esc {
                        '"' => value.push('"'),
                        '\\' => value.push('\\'),
                        '/' => value.push('/'),
                        'b' => value.push('\u{0008}'),
                        'f' => value.push('\u{000c}'),
                        'n' => value.push('\n'),
                        'r' => value.push('\r'),
                        't' => value.push('\t'),
                        'u' => {
                            let mut code = String::new();
                            for _ in 0..4 {
                                match self.bump() {
                                    Some(h) if h.is_ascii_hexdigit() => code.push(h),
                                    _ => {
                                        return Err(self.err(
                                            "invalid unicode escape",
                                            line,
                                            column,
                                        ))
                                    }
                                }
                            }
                            let cp = u32::from_str_radix(&code, 16).expect("hex digits");
                            match char::from_u32(cp) {
                                Some(decoded) => value.push(decoded),
                                None => {
                                    return Err(self.err("invalid unicode escape", line, column))
                                }
                            }
                        }
                        other => {
                            return Err(self.err(
                                format!("invalid escape \\{}", other),
                                line,
                                column,
                            ))
                        }
                    }
                }
                _ => value.push(c),
            }
        }
    }

    fn lex_block_string(&mut self, line: usize, column: usize) -> Result<TokenKind, LoadError> {
        let mut raw = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.err("unterminated block string", line, column));
            };
            if c == '"' && self.chars.peek() == Some(&'"') {
                self.bump();
                if self.chars.peek() == Some(&'"') {
                    self.bump();
                    return Ok(TokenKind::Str(dedent_block_string(&raw)));
                }
                raw.push_str("\"\"");
                continue;
            }
            if c == '\\' && self.chars.peek() == Some(&'"') {
                // \""" keeps a literal triple quote inside a block string.
                let mut quotes = 0;
                while quotes < 3 && self.chars.peek() == Some(&'"') {
                    self.bump();
                    quotes += 1;
                }
                if quotes == 3 {
                    raw.push_str("\"\"\"");
                } else {
                    raw.push('\\');
                    for _ in 0..quotes {
                        raw.push('"');
                    }
                }
                continue;
            }
            raw.push(c);
        }
    }

    fn err(&self, message: impl Into<String>, line: usize, column: usize) -> LoadError {
        LoadError::Syntax {
            locator: self.locator.to_string(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// Strip the common indentation and surrounding blank lines from a block
/// string body.
fn dedent_block_string(raw: &str) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, l) in lines.iter().enumerate() {
        if i == 0 {
            out.push(l.to_string());
        } else {
            out.push(l.get(common_indent.min(l.len())..).unwrap_or("").to_string());
        }
    }
    while out.first().is_some_and(|l| l.trim().is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(input: &str) -> Vec<Token> {
        Lexer::new("test.graphql", input).tokenize().expect("lexes")
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_field_definition() {
        assert_eq!(
            kinds("name(limit: Int = 10): [String!]!"),
            vec![
                TokenKind::Name("name".into()),
                TokenKind::Punct('('),
                TokenKind::Name("limit".into()),
                TokenKind::Punct(':'),
                TokenKind::Name("Int".into()),
                TokenKind::Punct('='),
                TokenKind::Int(10),
                TokenKind::Punct(')'),
                TokenKind::Punct(':'),
                TokenKind::Punct('['),
                TokenKind::Name("String".into()),
                TokenKind::Punct('!'),
                TokenKind::Punct(']'),
                TokenKind::Punct('!'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = lex("type User {\n  id: ID\n}");
        let id = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Name("id".into()))
            .expect("id token");
        assert_eq!((id.line, id.column), (2, 3));
        let close = tokens
            .iter()
            .find(|t| t.kind == TokenKind::Punct('}'))
            .expect("close brace");
        assert_eq!((close.line, close.column), (3, 1));
    }

    #[test]
    fn skips_comments_and_commas() {
        assert_eq!(
            kinds("# heading\na, b # trailing\nc"),
            vec![
                TokenKind::Name("a".into()),
                TokenKind::Name("b".into()),
                TokenKind::Name("c".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_string_escapes() {
        assert_eq!(
            kinds(r#""a \"quoted\" value\n""#),
            vec![TokenKind::Str("a \"quoted\" value\n".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_block_strings_with_dedent() {
        let input = "\"\"\"\n  A description\n  over two lines\n\"\"\"";
        assert_eq!(
            kinds(input),
            vec![
                TokenKind::Str("A description\nover two lines".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_numbers() {
        assert_eq!(
            kinds("42 -7 3.25 1e3"),
            vec![
                TokenKind::Int(42),
                TokenKind::Int(-7),
                TokenKind::Float(3.25),
                TokenKind::Float(1000.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_is_positioned() {
        let err = Lexer::new("s.graphql", "scalar A\n\"oops")
            .tokenize()
            .expect_err("must fail");
        match err {
            LoadError::Syntax { line, column, .. } => assert_eq!((line, column), (2, 1)),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_stray_characters() {
        let err = Lexer::new("s.graphql", "type User %")
            .tokenize()
            .expect_err("must fail");
        assert!(err.to_string().contains("unexpected character"));
    }
}
