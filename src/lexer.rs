use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Str(String),
    Num(i64),

    LBrace,   // {
    RBrace,   // }
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Colon,    // :
    Eq,       // =
    Question, // ?
    At,       // @
    AtAt,     // @@

    Eof,
}

#[derive(Debug, thiserror::Error)]
pub enum LexError {
    #[error("Unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some('/') => {
                    // Only `//` starts a comment; a lone slash falls through
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if lookahead.peek() == Some(&'/') {
                        while let Some(&c) = self.chars.peek() {
                            self.chars.next();
                            if c == '\n' {
                                break;
                            }
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    fn read_ident(&mut self, first: char) -> String {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s
    }

    fn read_string(&mut self) -> Result<String, LexError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    if let Some(c) = self.chars.next() {
                        match c {
                            'n' => s.push('\n'),
                            't' => s.push('\t'),
                            'r' => s.push('\r'),
                            _ => s.push(c),
                        }
                    }
                }
                Some(c) => s.push(c),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    fn read_number(&mut self, first: char) -> Result<i64, LexError> {
        let mut s = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        s.parse().map_err(|_| LexError::InvalidNumber(s))
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let c = match self.chars.next() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        let tok = match c {
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '=' => Token::Eq,
            '?' => Token::Question,
            '@' => {
                if self.chars.peek() == Some(&'@') {
                    self.chars.next();
                    Token::AtAt
                } else {
                    Token::At
                }
            }
            '"' => Token::Str(self.read_string()?),
            c if c.is_ascii_digit() => Token::Num(self.read_number(c)?),
            c if c.is_alphabetic() || c == '_' => Token::Ident(self.read_ident(c)),
            _ => return Err(LexError::UnexpectedChar(c)),
        };

        Ok(tok)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            if tok == Token::Eof {
                tokens.push(tok);
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let tokens = Lexer::new("model User { }").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("model".into()),
                Token::Ident("User".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_field_line() {
        let tokens = Lexer::new("title String?").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("title".into()),
                Token::Ident("String".into()),
                Token::Question,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_attribute_tokens() {
        let tokens = Lexer::new("@default(autoincrement())").tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::At,
                Token::Ident("default".into()),
                Token::LParen,
                Token::Ident("autoincrement".into()),
                Token::LParen,
                Token::RParen,
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_block_attribute_marker() {
        let tokens = Lexer::new("@@unique([a, b])").tokenize().unwrap();
        assert_eq!(tokens[0], Token::AtAt);
        assert_eq!(tokens[1], Token::Ident("unique".into()));
    }

    #[test]
    fn test_comments() {
        let input = "// comment\nmodel User { // inline\n}";
        let tokens = Lexer::new(input).tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("model".into()),
                Token::Ident("User".into()),
                Token::LBrace,
                Token::RBrace,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_string_value() {
        let tokens = Lexer::new(r#"provider = "postgresql""#).tokenize().unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Ident("provider".into()),
                Token::Eq,
                Token::Str("postgresql".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_unicode_ident() {
        let tokens = Lexer::new("model ユーザー { 名前 String }").tokenize().unwrap();
        assert_eq!(tokens[1], Token::Ident("ユーザー".into()));
        assert_eq!(tokens[3], Token::Ident("名前".into()));
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new("\"oops").tokenize().unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString));
    }
}
