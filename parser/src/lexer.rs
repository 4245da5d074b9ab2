//! Lexer (tokenizer) for constraint expressions.

use crate::{ParseError, ParseResult, Span};

/// Token types.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords (case-insensitive)
    And,
    Or,
    Not,
    In,
    Matches,
    Null,
    True,
    False,

    // Literals
    Ident(String),
    Int(i64),
    Float(f64),
    String(String),

    // Single-character symbols
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pipe,

    // Comparisons; `=` lexes as `==`
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Eof,
}

/// Keyword spellings. `none` is accepted as another spelling of `null`.
const KEYWORDS: [(&str, TokenKind); 9] = [
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("not", TokenKind::Not),
    ("in", TokenKind::In),
    ("matches", TokenKind::Matches),
    ("null", TokenKind::Null),
    ("none", TokenKind::Null),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
];

const SYMBOLS: [(char, TokenKind); 12] = [
    ('(', TokenKind::LParen),
    (')', TokenKind::RParen),
    ('[', TokenKind::LBracket),
    (']', TokenKind::RBracket),
    (',', TokenKind::Comma),
    ('.', TokenKind::Dot),
    ('+', TokenKind::Plus),
    ('-', TokenKind::Minus),
    ('*', TokenKind::Star),
    ('/', TokenKind::Slash),
    ('%', TokenKind::Percent),
    ('|', TokenKind::Pipe),
];

fn keyword(word: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(word))
        .map(|(_, kind)| kind.clone())
}

fn symbol(c: char) -> Option<TokenKind> {
    SYMBOLS
        .iter()
        .find(|(sym, _)| *sym == c)
        .map(|(_, kind)| kind.clone())
}

impl TokenKind {
    /// How the token is named in error messages.
    pub fn name(&self) -> &'static str {
        if let Some((spelling, _)) = KEYWORDS.iter().find(|(_, kind)| kind == self) {
            return *spelling;
        }
        if let Some((sym, _)) = SYMBOLS.iter().find(|(_, kind)| kind == self) {
            return symbol_name(*sym);
        }
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer",
            TokenKind::Float(_) => "float",
            TokenKind::String(_) => "string",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Eof => "end of input",
            _ => "token",
        }
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| kind == self)
    }
}

fn symbol_name(sym: char) -> &'static str {
    match sym {
        '(' => "(",
        ')' => ")",
        '[' => "[",
        ']' => "]",
        ',' => ",",
        '.' => ".",
        '+' => "+",
        '-' => "-",
        '*' => "*",
        '/' => "/",
        '%' => "%",
        _ => "|",
    }
}

/// A token with its span.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A position in the input, recorded where a token starts.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}

/// Lexer state over a borrowed input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize all input; the last token is always `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span(&self, from: Mark) -> Span {
        Span::new(from.pos, self.pos, from.line, from.column)
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume characters while `pred` holds and return them.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &input[start..self.pos]
    }

    fn next_token(&mut self) -> ParseResult<Token> {
        self.eat_while(char::is_whitespace);
        let start = self.mark();

        let Some(c) = self.bump() else {
            return Ok(Token::new(TokenKind::Eof, self.span(start)));
        };

        let kind = match c {
            '=' => {
                self.bump_if('=');
                TokenKind::Eq
            }
            '<' if self.bump_if('=') => TokenKind::LtEq,
            '<' => TokenKind::Lt,
            '>' if self.bump_if('=') => TokenKind::GtEq,
            '>' => TokenKind::Gt,
            '!' if self.bump_if('=') => TokenKind::NotEq,
            '"' | '\'' => self.string(c, start)?,
            '_' | 'a'..='z' | 'A'..='Z' => self.word(start),
            '0'..='9' => self.number(start)?,
            _ => symbol(c).ok_or_else(|| {
                ParseError::new(format!("unexpected character '{}'", c), self.span(start))
            })?,
        };

        Ok(Token::new(kind, self.span(start)))
    }

    fn string(&mut self, quote: char, start: Mark) -> ParseResult<TokenKind> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(ParseError::new(
                        "unterminated string literal",
                        self.span(start),
                    ))
                }
                Some(c) if c == quote => return Ok(TokenKind::String(value)),
                Some('\\') => {
                    let escape = self.mark();
                    match self.bump() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some(c @ ('\\' | '"' | '\'')) => value.push(c),
                        // Unknown escapes stay as written, so "\d+" reaches the regex intact.
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                        None => {
                            return Err(ParseError::new(
                                "unterminated escape sequence",
                                self.span(escape),
                            ))
                        }
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn word(&mut self, start: Mark) -> TokenKind {
        self.eat_while(|c| c.is_alphanumeric() || c == '_');
        let text = &self.input[start.pos..self.pos];
        keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn number(&mut self, start: Mark) -> ParseResult<TokenKind> {
        let digit = |c: char| c.is_ascii_digit();
        self.eat_while(digit);

        // `1.x` is a field access on 1, not a float.
        let fraction = self.peek() == Some('.') && self.peek_second().is_some_and(digit);
        if fraction {
            self.bump();
            self.eat_while(digit);
        }

        let exponent = matches!(self.peek(), Some('e' | 'E'));
        if exponent {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.eat_while(digit).is_empty() {
                return Err(ParseError::new(
                    format!(
                        "invalid exponent in number literal '{}'",
                        &self.input[start.pos..self.pos]
                    ),
                    self.span(start),
                ));
            }
        }

        let text = &self.input[start.pos..self.pos];
        let invalid = |what: &str| {
            ParseError::new(format!("invalid {} literal '{}'", what, text), self.span(start))
        };
        if fraction || exponent {
            text.parse().map(TokenKind::Float).map_err(|_| invalid("float"))
        } else {
            text.parse().map(TokenKind::Int).map_err(|_| invalid("integer"))
        }
    }
}
