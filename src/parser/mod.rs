//! This module contains the parser that turns signature text into a
//! normalized descriptor.
//!
//! # Grammar
//!
//! ```text
//! selector   := [ name ] "(" arglist? ")" [ "->" arglist ]
//! type       := atomic { suffix }
//! atomic     := base-type | "(" arglist? ")"
//! base-type  := "uint"[digits] | "int"[digits] | "address" | "bool"
//!             | "bytes"[digits] | "string" | "function"
//!             | "fixed" digits "x" digits | "ufixed" digits "x" digits
//! suffix     := "[" [ digits ] "]"
//! arglist    := arg { "," arg }
//! arg        := type [ "indexed" ] [ name ]
//! ```
//!
//! `uint` and `int` without an explicit width are aliases for `uint256` and
//! `int256`.
//!
//! # Stack Safety
//!
//! Tuples nest to arbitrary depth, so the parser maintains an explicit stack
//! of partially-parsed tuples rather than descending the call stack. Input
//! depth can never overflow the machine stack.

pub mod lexer;

use lexer::{lex, Lexeme, Token};

use crate::{
    constant::{
        BYTE_SIZE_BITS,
        DEFAULT_INT_WIDTH_BITS,
        MAX_FIXED_BYTES_LENGTH,
        MAX_FIXED_EXPONENT,
        WORD_SIZE_BITS,
    },
    error::{
        container::Locatable,
        parsing::{Error, Result},
    },
    selector::{FunctionSelector, SelectorKind},
    types::{AbiType, Param},
};

/// Parses the signature text in `input` into a descriptor.
///
/// A leading name produces a [`SelectorKind::Function`] descriptor; a bare
/// `(…)` tuple produces a [`SelectorKind::Unnamed`] one. An argument list
/// after a `->` arrow becomes the outputs; a function written without an
/// arrow is declared as returning nothing, which is distinct from the
/// absent outputs of an unnamed tuple.
///
/// # Errors
///
/// When the input does not conform to the signature grammar. The error
/// carries the byte offset of the offending token.
pub fn parse_selector(input: &str) -> Result<FunctionSelector> {
    let mut parser = Parser::new(input)?;

    let name = parser.take_leading_name();
    parser.expect(&Token::OpenParen)?;
    let inputs = parser.parse_list(ListEnd::Paren, Decorations::Allowed)?;

    let kind = if name.is_some() {
        SelectorKind::Function
    } else {
        SelectorKind::Unnamed
    };

    let outputs = if parser.at_end() {
        if kind == SelectorKind::Function {
            Some(vec![])
        } else {
            None
        }
    } else {
        parser.expect(&Token::Arrow)?;
        Some(parser.parse_list(ListEnd::Eof, Decorations::Allowed)?)
    };

    Ok(FunctionSelector {
        name,
        kind,
        state_mutability: None,
        inputs,
        outputs,
    })
}

/// Parses the text in `input` as a single type, with no name and no
/// `indexed` marker.
///
/// This is the entry point used by the document loader for non-tuple
/// component types such as `uint256[4][]`.
///
/// # Errors
///
/// When the input is not exactly one well-formed type.
pub fn parse_type(input: &str) -> Result<AbiType> {
    let mut parser = Parser::new(input)?;
    let mut params = parser.parse_list(ListEnd::Eof, Decorations::Forbidden)?;

    if params.len() != 1 {
        return Err(Error::NotASingleType(params.len()).locate(0));
    }

    Ok(params.remove(0).tp)
}

/// How an argument list is terminated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ListEnd {
    /// The list is terminated by a `)` token, which the parser consumes.
    Paren,

    /// The list is terminated by the end of the input.
    Eof,
}

/// Whether arguments in a list may carry `indexed` markers and names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Decorations {
    Allowed,
    Forbidden,
}

/// The parser state: a token stream with a single position cursor.
struct Parser {
    lexemes:  Vec<Lexeme>,
    position: usize,
    end:      usize,
}

impl Parser {
    /// Tokenizes `input` and wraps the result in a parser.
    fn new(input: &str) -> Result<Self> {
        let lexemes = lex(input)?;
        Ok(Self {
            lexemes,
            position: 0,
            end: input.len(),
        })
    }

    /// Peeks at the next token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.lexemes.get(self.position).map(|lexeme| &lexeme.token)
    }

    /// Checks whether the whole input has been consumed.
    fn at_end(&self) -> bool {
        self.position == self.lexemes.len()
    }

    /// Consumes and returns the next lexeme.
    fn next_lexeme(&mut self) -> Result<Lexeme> {
        let lexeme = self
            .lexemes
            .get(self.position)
            .cloned()
            .ok_or_else(|| Error::UnexpectedEndOfInput.locate(self.end))?;
        self.position += 1;
        Ok(lexeme)
    }

    /// Consumes the next token, requiring it to equal `expected`.
    fn expect(&mut self, expected: &Token) -> Result<()> {
        let lexeme = self.next_lexeme()?;
        if &lexeme.token == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedToken(lexeme.token.to_string()).locate(lexeme.offset))
        }
    }

    /// Consumes a leading `name (` pair if one is present, returning the
    /// name. The open parenthesis is left in the stream.
    fn take_leading_name(&mut self) -> Option<String> {
        let Some(Token::Identifier(word)) = self.peek() else {
            return None;
        };
        let word = word.clone();

        match self.lexemes.get(self.position + 1).map(|l| &l.token) {
            Some(Token::OpenParen) => {
                self.position += 1;
                Some(word)
            }
            _ => None,
        }
    }

    /// Parses an argument list terminated as described by `end`.
    ///
    /// When called with [`ListEnd::Paren`] the opening parenthesis must
    /// already have been consumed.
    ///
    /// Nested tuples are tracked on an explicit stack of partially-completed
    /// frames: descending into `(` pushes a frame, and the matching `)` pops
    /// it and folds the frame into a tuple element of its parent.
    fn parse_list(&mut self, end: ListEnd, decorations: Decorations) -> Result<Vec<Param>> {
        // An immediately-terminated list is empty.
        match end {
            ListEnd::Paren => {
                if self.peek() == Some(&Token::CloseParen) {
                    self.position += 1;
                    return Ok(vec![]);
                }
            }
            ListEnd::Eof => {
                if self.at_end() {
                    return Err(Error::UnexpectedEndOfInput.locate(self.end));
                }
            }
        }

        let mut stack: Vec<Vec<Param>> = vec![Vec::new()];

        'element: loop {
            // Descend through `(` tokens to the start of the next element.
            let mut tp = loop {
                let lexeme = self.next_lexeme()?;
                match lexeme.token {
                    Token::OpenParen => {
                        if self.peek() == Some(&Token::CloseParen) {
                            self.position += 1;
                            break AbiType::Tuple { elements: vec![] };
                        }
                        stack.push(Vec::new());
                    }
                    Token::Identifier(word) => break base_type(&word, lexeme.offset)?,
                    token => {
                        return Err(Error::ExpectedType(token.to_string()).locate(lexeme.offset));
                    }
                }
            };

            // Decorate the element, then ascend through `)` tokens, folding
            // each completed frame into a tuple element of its parent.
            loop {
                let param = self.decorate(tp, decorations)?;
                let frame = stack.last_mut().expect("the frame stack is never empty");
                frame.push(param);

                if stack.len() == 1 && end == ListEnd::Eof {
                    if self.at_end() {
                        return Ok(stack.pop().expect("the frame stack is never empty"));
                    }
                    let lexeme = self.next_lexeme()?;
                    match lexeme.token {
                        Token::Comma => continue 'element,
                        token => {
                            return Err(
                                Error::UnexpectedToken(token.to_string()).locate(lexeme.offset)
                            );
                        }
                    }
                }

                let lexeme = self.next_lexeme()?;
                match lexeme.token {
                    Token::Comma => continue 'element,
                    Token::CloseParen => {
                        let elements = stack.pop().expect("the frame stack is never empty");
                        if stack.is_empty() {
                            return Ok(elements);
                        }
                        tp = AbiType::Tuple { elements };
                    }
                    token => {
                        return Err(Error::UnexpectedToken(token.to_string()).locate(lexeme.offset));
                    }
                }
            }
        }
    }

    /// Applies array suffixes and, where allowed, the `indexed` marker and
    /// the argument name to a just-parsed atomic type.
    fn decorate(&mut self, atomic: AbiType, decorations: Decorations) -> Result<Param> {
        let mut tp = atomic;

        while self.peek() == Some(&Token::OpenBracket) {
            self.position += 1;
            let lexeme = self.next_lexeme()?;
            match lexeme.token {
                Token::CloseBracket => tp = AbiType::dyn_array(tp),
                Token::Number(size) => {
                    self.expect(&Token::CloseBracket)?;
                    tp = AbiType::array(size, tp);
                }
                token => {
                    return Err(Error::UnexpectedToken(token.to_string()).locate(lexeme.offset));
                }
            }
        }

        let mut param = Param::new(tp);
        if decorations == Decorations::Forbidden {
            return Ok(param);
        }

        if matches!(self.peek(), Some(Token::Identifier(word)) if word == "indexed") {
            self.position += 1;
            param.indexed = true;
        }
        if let Some(Token::Identifier(word)) = self.peek() {
            param.name = Some(word.clone());
            self.position += 1;
        }

        Ok(param)
    }
}

/// Resolves a single identifier word in type position to a base type.
fn base_type(word: &str, offset: usize) -> Result<AbiType> {
    let tp = match word {
        "uint" => AbiType::uint(DEFAULT_INT_WIDTH_BITS),
        "int" => AbiType::int(DEFAULT_INT_WIDTH_BITS),
        "address" => AbiType::Address,
        "bool" => AbiType::Bool,
        "bytes" => AbiType::DynBytes,
        "string" => AbiType::String,
        "function" => AbiType::Function,
        _ => {
            if let Some(rest) = word.strip_prefix("uint") {
                AbiType::uint(int_width(word, rest, offset)?)
            } else if let Some(rest) = word.strip_prefix("int") {
                AbiType::int(int_width(word, rest, offset)?)
            } else if let Some(rest) = word.strip_prefix("bytes") {
                AbiType::bytes(bytes_length(word, rest, offset)?)
            } else if let Some(rest) = word.strip_prefix("ufixed") {
                let (m, n) = fixed_shape(word, rest, offset)?;
                AbiType::UFixed { m, n }
            } else if let Some(rest) = word.strip_prefix("fixed") {
                let (m, n) = fixed_shape(word, rest, offset)?;
                AbiType::Fixed { m, n }
            } else {
                return Err(Error::ExpectedType(word.to_string()).locate(offset));
            }
        }
    };

    Ok(tp)
}

/// Parses the digit suffix of a word, distinguishing "not a digit suffix at
/// all" (`None`) from an unrepresentably large number.
fn digit_suffix(suffix: &str, offset: usize) -> Result<Option<usize>> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(None);
    }
    let number = suffix
        .parse::<usize>()
        .map_err(|_| Error::NumberTooLarge.locate(offset))?;
    Ok(Some(number))
}

/// Parses and validates an integer width suffix.
fn int_width(word: &str, suffix: &str, offset: usize) -> Result<usize> {
    let Some(size) = digit_suffix(suffix, offset)? else {
        return Err(Error::ExpectedType(word.to_string()).locate(offset));
    };
    if size == 0 || size > WORD_SIZE_BITS || size % BYTE_SIZE_BITS != 0 {
        return Err(Error::InvalidIntWidth(size).locate(offset));
    }
    Ok(size)
}

/// Parses and validates a fixed byte-string length suffix.
fn bytes_length(word: &str, suffix: &str, offset: usize) -> Result<usize> {
    let Some(length) = digit_suffix(suffix, offset)? else {
        return Err(Error::ExpectedType(word.to_string()).locate(offset));
    };
    if length == 0 || length > MAX_FIXED_BYTES_LENGTH {
        return Err(Error::InvalidBytesLength(length).locate(offset));
    }
    Ok(length)
}

/// Parses and validates the `<m>x<n>` shape suffix of a fixed-point type.
fn fixed_shape(word: &str, suffix: &str, offset: usize) -> Result<(usize, usize)> {
    let shape = suffix.split_once('x').and_then(|(m, n)| {
        match (digit_suffix(m, offset), digit_suffix(n, offset)) {
            (Ok(Some(m)), Ok(Some(n))) => Some((m, n)),
            _ => None,
        }
    });
    let Some((m, n)) = shape else {
        return Err(Error::ExpectedType(word.to_string()).locate(offset));
    };

    let m_valid = m != 0 && m <= WORD_SIZE_BITS && m % BYTE_SIZE_BITS == 0;
    let n_valid = n != 0 && n <= MAX_FIXED_EXPONENT;
    if !m_valid || !n_valid {
        return Err(Error::InvalidFixedShape { m, n }.locate(offset));
    }
    Ok((m, n))
}
