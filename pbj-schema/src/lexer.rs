//! Hand-rolled tokenizer for Protobuf 3 source.
//!
//! No `nom`/`pest`: just a `Tokenizer` that walks `char`s and tracks
//! `(line, col)` by hand.

use std::fmt;

/// A source location, 1-indexed in both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Loc {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    IntLit(u64),
    FloatLit(f64),
    StrLit(String),
    /// A single-character punctuation token: `{ } ( ) [ ] ; , . = < >`.
    Symbol(char),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenizerError {
    pub loc: Loc,
    pub message: String,
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.loc, self.message)
    }
}

pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// A `// <<<option.name = "value">>>` comment recognized above a
/// definition. `pbj.java_package` and `pbj.comparable` are
/// the only names the parser acts on; anything else is kept (the parser
/// emits a warning and ignores it).
#[derive(Debug, Clone, PartialEq)]
pub struct OptionComment {
    pub name: String,
    pub value: String,
    pub loc: Loc,
}

pub struct Tokenizer<'a> {
    chars: std::str::Chars<'a>,
    /// One character of lookahead, needed for e.g. `//` vs `/` or number
    /// parsing.
    lookahead: Option<char>,
    line: u32,
    col: u32,
    /// Option-comments seen so far that have not yet been claimed by a
    /// following definition, in source order.
    pending_option_comments: Vec<OptionComment>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Tokenizer<'a> {
        let mut chars = input.chars();
        let lookahead = chars.next();
        Tokenizer {
            chars,
            lookahead,
            line: 1,
            col: 1,
            pending_option_comments: Vec::new(),
        }
    }

    pub fn loc(&self) -> Loc {
        Loc {
            line: self.line,
            col: self.col,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.lookahead;
        self.lookahead = self.chars.next();
        if let Some(c) = c {
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.lookahead
    }

    /// Drain option-comments recorded on the line immediately above
    /// `loc.line`, in source order. Called by the parser right before it
    /// starts parsing a definition.
    pub fn take_option_comments_above(&mut self, loc: Loc) -> Vec<OptionComment> {
        let mut taken = Vec::new();
        let mut expected_line = loc.line;
        // Walk backwards through the pending list, accepting a
        // contiguous run of option-comments immediately above the
        // definition (so stacking multiple `// <<<...>>>` lines works).
        let mut keep = Vec::new();
        for comment in self.pending_option_comments.drain(..).rev() {
            if comment.loc.line + 1 == expected_line {
                expected_line = comment.loc.line;
                taken.push(comment);
            } else {
                keep.push(comment);
            }
        }
        keep.reverse();
        self.pending_option_comments = keep;
        taken.reverse();
        taken
    }

    fn skip_whitespace_and_comments(&mut self) -> TokenizerResult<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    let save_line = self.line;
                    let save_col = self.col;
                    self.advance();
                    match self.peek() {
                        Some('/') => {
                            self.advance();
                            let mut text = String::new();
                            while let Some(c) = self.peek() {
                                if c == '\n' {
                                    break;
                                }
                                text.push(c);
                                self.advance();
                            }
                            if let Some(comment) = parse_option_comment(&text) {
                                self.pending_option_comments.push(OptionComment {
                                    name: comment.0,
                                    value: comment.1,
                                    loc: Loc {
                                        line: save_line,
                                        col: save_col,
                                    },
                                });
                            }
                        }
                        Some('*') => {
                            self.advance();
                            loop {
                                match self.advance() {
                                    None => {
                                        return Err(TokenizerError {
                                            loc: Loc {
                                                line: save_line,
                                                col: save_col,
                                            },
                                            message: "unterminated block comment".to_owned(),
                                        })
                                    }
                                    Some('*') if self.peek() == Some('/') => {
                                        self.advance();
                                        break;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        _ => {
                            return Err(TokenizerError {
                                loc: Loc {
                                    line: save_line,
                                    col: save_col,
                                },
                                message: "stray `/`".to_owned(),
                            })
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    pub fn next_token(&mut self) -> TokenizerResult<(Token, Loc)> {
        self.skip_whitespace_and_comments()?;
        let loc = self.loc();
        match self.peek() {
            None => Ok((Token::Eof, loc)),
            Some(c) if c == '_' || c.is_ascii_alphabetic() => {
                let mut s = String::new();
                while let Some(c) = self.peek() {
                    if c == '_' || c == '.' || c.is_ascii_alphanumeric() {
                        s.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Ok((Token::Ident(s), loc))
            }
            Some(c) if c.is_ascii_digit() => self.next_number(loc),
            Some('"') | Some('\'') => self.next_string_literal(loc),
            Some(c) if "{}()[];,.=<>:".contains(c) => {
                self.advance();
                Ok((Token::Symbol(c), loc))
            }
            Some(c) => Err(TokenizerError {
                loc,
                message: format!("unexpected character `{}`", c),
            }),
        }
    }

    fn next_number(&mut self, loc: Loc) -> TokenizerResult<(Token, Loc)> {
        let mut s = String::new();
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == 'x' || c == 'X' || (c.is_ascii_hexdigit() && s.starts_with("0x")) {
                s.push(c);
                self.advance();
            } else if c == '.' && !is_float {
                is_float = true;
                s.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E') && !s.is_empty() {
                is_float = true;
                s.push(c);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.peek() {
                    s.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }
        if is_float {
            let v: f64 = s.parse().map_err(|_| TokenizerError {
                loc,
                message: format!("invalid float literal `{}`", s),
            })?;
            Ok((Token::FloatLit(v), loc))
        } else if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let v = u64::from_str_radix(hex, 16).map_err(|_| TokenizerError {
                loc,
                message: format!("invalid hex literal `{}`", s),
            })?;
            Ok((Token::IntLit(v), loc))
        } else {
            let v: u64 = s.parse().map_err(|_| TokenizerError {
                loc,
                message: format!("invalid integer literal `{}`", s),
            })?;
            Ok((Token::IntLit(v), loc))
        }
    }

    fn next_string_literal(&mut self, loc: Loc) -> TokenizerResult<(Token, Loc)> {
        let quote = self.advance().unwrap();
        let mut s = String::new();
        loop {
            match self.advance() {
                None => {
                    return Err(TokenizerError {
                        loc,
                        message: "unterminated string literal".to_owned(),
                    })
                }
                Some(c) if c == quote => return Ok((Token::StrLit(s), loc)),
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some('\\') => s.push('\\'),
                    Some(c) if c == quote => s.push(quote),
                    Some(c) => s.push(c),
                    None => {
                        return Err(TokenizerError {
                            loc,
                            message: "unterminated escape in string literal".to_owned(),
                        })
                    }
                },
                Some(c) => s.push(c),
            }
        }
    }
}

/// Recognizes `<<<option.name = "value">>>` once the leading `//` has
/// already been stripped. Returns `None` for an ordinary comment.
fn parse_option_comment(text: &str) -> Option<(String, String)> {
    let t = text.trim();
    let inner = t.strip_prefix("<<<")?.strip_suffix(">>>")?;
    let eq = inner.find('=')?;
    let name = inner[..eq].trim();
    let value = inner[eq + 1..].trim();
    let value = value.strip_prefix('"')?.strip_suffix('"')?;
    if name.is_empty() {
        return None;
    }
    Some((name.to_owned(), value.to_owned()))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tokenizes_identifiers_and_symbols() {
        let mut t = Tokenizer::new("message Foo { }");
        assert_eq!(t.next_token().unwrap().0, Token::Ident("message".to_owned()));
        assert_eq!(t.next_token().unwrap().0, Token::Ident("Foo".to_owned()));
        assert_eq!(t.next_token().unwrap().0, Token::Symbol('{'));
        assert_eq!(t.next_token().unwrap().0, Token::Symbol('}'));
        assert_eq!(t.next_token().unwrap().0, Token::Eof);
    }

    #[test]
    fn tokenizes_string_and_int_literals() {
        let mut t = Tokenizer::new(r#" "hello" 42 "#);
        assert_eq!(t.next_token().unwrap().0, Token::StrLit("hello".to_owned()));
        assert_eq!(t.next_token().unwrap().0, Token::IntLit(42));
    }

    #[test]
    fn skips_line_and_block_comments() {
        let mut t = Tokenizer::new("// a comment\n/* block */ foo");
        assert_eq!(t.next_token().unwrap().0, Token::Ident("foo".to_owned()));
    }

    #[test]
    fn recognizes_pbj_option_comment_above_the_next_token() {
        let mut t = Tokenizer::new("// <<<pbj.java_package = \"com.example\">>>\nmessage Foo {}");
        let (tok, loc) = t.next_token().unwrap();
        assert_eq!(tok, Token::Ident("message".to_owned()));
        let comments = t.take_option_comments_above(loc);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].name, "pbj.java_package");
        assert_eq!(comments[0].value, "com.example");
    }

    #[test]
    fn ignores_unrelated_comments() {
        let mut t = Tokenizer::new("// just a note\nmessage Foo {}");
        let (tok, loc) = t.next_token().unwrap();
        assert_eq!(tok, Token::Ident("message".to_owned()));
        assert!(t.take_option_comments_above(loc).is_empty());
    }
}
