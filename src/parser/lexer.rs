//! This module contains the tokenizer for signature text.
//!
//! # Implementation Note
//!
//! While it might make sense in the future to build a more robust lexer on
//! top of a parser-combinator library like [`nom`](https://docs.rs/nom), the
//! token set is small enough that a single hand-written pass is simpler.

use std::fmt::{Display, Formatter};

use crate::error::{
    container::Locatable,
    parsing::{Error, Result},
};

/// A single token of signature text.
///
/// Base-type words, the `indexed` keyword, and argument names all surface as
/// [`Token::Identifier`]; classifying them is the parser's job, as the same
/// word can be a keyword in one position and a name in another.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Token {
    /// A run of decimal digits.
    Number(usize),

    /// A word: a letter or underscore followed by any mix of letters, digits,
    /// and underscores. Width suffixes are part of the word, so `uint256`
    /// lexes as a single identifier.
    Identifier(String),

    /// The `(` punctuation.
    OpenParen,

    /// The `)` punctuation.
    CloseParen,

    /// The `[` punctuation.
    OpenBracket,

    /// The `]` punctuation.
    CloseBracket,

    /// The `,` punctuation.
    Comma,

    /// The `->` return arrow.
    Arrow,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Identifier(word) => write!(f, "{word}"),
            Self::OpenParen => write!(f, "("),
            Self::CloseParen => write!(f, ")"),
            Self::OpenBracket => write!(f, "["),
            Self::CloseBracket => write!(f, "]"),
            Self::Comma => write!(f, ","),
            Self::Arrow => write!(f, "->"),
        }
    }
}

/// A token together with the byte offset at which it starts in the signature
/// text. The offset feeds error messages, nothing else.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Lexeme {
    /// The token itself.
    pub token: Token,

    /// The byte offset of the first character of the token.
    pub offset: usize,
}

impl Lexeme {
    /// Constructs a new lexeme for `token` starting at `offset`.
    #[must_use]
    pub fn new(token: Token, offset: usize) -> Self {
        Self { token, offset }
    }
}

/// Tokenizes the signature text in `input`, skipping whitespace.
///
/// # Errors
///
/// When a character that can begin no token is encountered, or when a number
/// in the input does not fit in a machine word.
pub fn lex(input: &str) -> Result<Vec<Lexeme>> {
    let mut lexemes = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, character)) = chars.next() {
        match character {
            c if c.is_whitespace() => {}
            '(' => lexemes.push(Lexeme::new(Token::OpenParen, offset)),
            ')' => lexemes.push(Lexeme::new(Token::CloseParen, offset)),
            '[' => lexemes.push(Lexeme::new(Token::OpenBracket, offset)),
            ']' => lexemes.push(Lexeme::new(Token::CloseBracket, offset)),
            ',' => lexemes.push(Lexeme::new(Token::Comma, offset)),
            '-' => match chars.peek() {
                Some((_, '>')) => {
                    chars.next();
                    lexemes.push(Lexeme::new(Token::Arrow, offset));
                }
                _ => return Err(Error::InvalidCharacter('-').locate(offset)),
            },
            c if c.is_ascii_digit() => {
                let mut digits = String::from(c);
                while let Some((_, next)) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(*next);
                    chars.next();
                }

                let number = digits
                    .parse::<usize>()
                    .map_err(|_| Error::NumberTooLarge.locate(offset))?;
                lexemes.push(Lexeme::new(Token::Number(number), offset));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some((_, next)) = chars.peek() {
                    if !next.is_ascii_alphanumeric() && *next != '_' {
                        break;
                    }
                    word.push(*next);
                    chars.next();
                }
                lexemes.push(Lexeme::new(Token::Identifier(word), offset));
            }
            c => return Err(Error::InvalidCharacter(c).locate(offset)),
        }
    }

    Ok(lexemes)
}

#[cfg(test)]
mod test {
    use super::{lex, Token};
    use crate::error::parsing::Error;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input)
            .unwrap()
            .into_iter()
            .map(|lexeme| lexeme.token)
            .collect()
    }

    #[test]
    fn lexes_a_simple_signature() {
        assert_eq!(
            tokens("baz(uint32,bool)"),
            vec![
                Token::Identifier("baz".to_string()),
                Token::OpenParen,
                Token::Identifier("uint32".to_string()),
                Token::Comma,
                Token::Identifier("bool".to_string()),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn keeps_width_suffixes_inside_the_word() {
        assert_eq!(
            tokens("fixed128x19"),
            vec![Token::Identifier("fixed128x19".to_string())]
        );
    }

    #[test]
    fn lexes_array_suffixes_and_arrows() {
        assert_eq!(
            tokens("f(uint256[4][]) -> bool"),
            vec![
                Token::Identifier("f".to_string()),
                Token::OpenParen,
                Token::Identifier("uint256".to_string()),
                Token::OpenBracket,
                Token::Number(4),
                Token::CloseBracket,
                Token::OpenBracket,
                Token::CloseBracket,
                Token::CloseParen,
                Token::Arrow,
                Token::Identifier("bool".to_string()),
            ]
        );
    }

    #[test]
    fn skips_whitespace_between_tokens() {
        assert_eq!(
            tokens("  ( address   indexed from )"),
            vec![
                Token::OpenParen,
                Token::Identifier("address".to_string()),
                Token::Identifier("indexed".to_string()),
                Token::Identifier("from".to_string()),
                Token::CloseParen,
            ]
        );
    }

    #[test]
    fn reports_invalid_characters_with_their_offset() {
        let error = lex("foo(uint256!)").unwrap_err();
        assert_eq!(error.location, 11);
        assert_eq!(error.payload, Error::InvalidCharacter('!'));
    }

    #[test]
    fn rejects_a_lone_dash() {
        let error = lex("foo() - bar").unwrap_err();
        assert_eq!(error.payload, Error::InvalidCharacter('-'));
    }
}
