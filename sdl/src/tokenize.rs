use std::{
    fmt::{self, Display, Formatter},
    io::{self, Read, Seek, SeekFrom},
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("a generic IO error: {0}")]
    Io(#[from] io::Error),

    #[error("unexpected character '{0}' on line {1}")]
    UnexpectedCharacter(char, usize),

    #[error("error parsing number on line {0}")]
    NumberParseError(usize),
}

/// A separator.
#[derive(Debug, Clone, PartialEq)]
pub enum Sep {
    BraceOpen,
    BraceClose,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A separator.
    Sep(Sep),

    /// The `=` between a key and its value.
    Assign,

    /// An identifier. Not escaped, quoted, etc.
    Identifier(String),

    /// A number. Decimals optional.
    Number(f64),
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sep(Sep::BraceOpen) => write!(f, "{{"),
            Self::Sep(Sep::BraceClose) => write!(f, "}}"),
            Self::Assign => write!(f, "="),
            Self::Identifier(ident) => write!(f, "{}", ident),
            Self::Number(num) => write!(f, "{}", num),
        }
    }
}

impl From<Sep> for Token {
    fn from(sep: Sep) -> Self {
        Self::Sep(sep)
    }
}

/// A token and the line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
}

pub struct Tokenizer<R: Read + Seek> {
    reader: R,
    line: usize,
}

impl<R: Read + Seek> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Tokenizer { reader, line: 1 }
    }

    /// Tokenize from the reader, converting to a `Result<Vec<Spanned>, TokenizeError>`.
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, TokenizeError> {
        let mut tokens = vec![];

        while let Some(c) = self.peek_next()? {
            let token = match c {
                '\n' => {
                    self.line += 1;
                    self.skip()?;
                    continue;
                }

                // whitespace: ignore
                _ if c.is_whitespace() => {
                    self.skip()?;
                    continue;
                }

                // comment: ignore the rest of the line
                '#' => {
                    self.read_while(|c| c != '\n')?;
                    continue;
                }

                // alphabetical characters: identifier
                'A'..='Z' | 'a'..='z' => Token::Identifier(self.read_identifier()?),

                // a number: number
                '0'..='9' | '.' | '-' => Token::Number(self.read_number()?),

                '=' => {
                    self.skip()?;
                    Token::Assign
                }
                '{' => {
                    self.skip()?;
                    Sep::BraceOpen.into()
                }
                '}' => {
                    self.skip()?;
                    Sep::BraceClose.into()
                }

                x => return Err(TokenizeError::UnexpectedCharacter(x, self.line)),
            };

            tokens.push(Spanned {
                token,
                line: self.line,
            });
        }

        Ok(tokens)
    }

    /// Read an identifier, which is just an alphanumeric bit of text.
    fn read_identifier(&mut self) -> Result<String, TokenizeError> {
        Ok(self
            .read_while(char::is_alphanumeric)?
            .into_iter()
            .collect())
    }

    /// Read a number, which is an f64. Decimal optional.
    fn read_number(&mut self) -> Result<f64, TokenizeError> {
        let negative = if let Some('-') = self.peek_next()? {
            self.skip()?;
            true
        } else {
            false
        };
        let mut pre_dec = String::new(); // chars before the .
        let mut post_dec = String::new(); // chars after the .
        let mut dec_seen = false;

        while let Some(c) = self.next()? {
            match c {
                '.' if dec_seen => return Err(TokenizeError::UnexpectedCharacter('.', self.line)),
                '.' => dec_seen = true,
                '0'..='9' => {
                    if dec_seen {
                        post_dec.push(c);
                    } else {
                        pre_dec.push(c);
                    }
                }
                _ => {
                    self.back()?;
                    break;
                }
            }
        }

        match (pre_dec.is_empty(), post_dec.is_empty()) {
            (true, true) => return Err(TokenizeError::NumberParseError(self.line)),
            (true, false) => pre_dec.push('0'),
            (false, true) => post_dec.push('0'),
            _ => (),
        }

        format!("{}.{}", pre_dec, post_dec)
            .parse()
            .map(|n: f64| if negative { -n } else { n })
            .map_err(|_| TokenizeError::NumberParseError(self.line))
    }

    /// Read the next character in the reader, or `None` at the end.
    fn next(&mut self) -> Result<Option<char>, io::Error> {
        let mut byte = [0u8];
        match self.reader.read_exact(&mut byte) {
            Ok(()) => Ok(Some(byte[0] as char)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Skips the next character in the reader.
    fn skip(&mut self) -> Result<(), io::Error> {
        self.reader.seek(SeekFrom::Current(1)).map(|_| ())
    }

    /// Goes back to the last character in the reader.
    fn back(&mut self) -> Result<(), io::Error> {
        self.reader.seek(SeekFrom::Current(-1)).map(|_| ())
    }

    /// Peeks ahead at the next character in the reader. This works by reading and then seeking back one on success.
    fn peek_next(&mut self) -> Result<Option<char>, io::Error> {
        let c = self.next()?;
        if c.is_some() {
            self.back()?;
        }
        Ok(c)
    }

    /// Reads characters until the predicate returns false, leaving that character unread.
    fn read_while<F>(&mut self, f: F) -> Result<Vec<char>, io::Error>
    where
        F: Fn(char) -> bool,
    {
        let mut v = vec![];

        while let Some(c) = self.next()? {
            if f(c) {
                v.push(c);
            } else {
                self.back()?;
                break;
            }
        }

        Ok(v)
    }
}
