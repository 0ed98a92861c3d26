//! Parse Micheline text into a generic tree.
//!
//! Grammar, loosely:
//!
//! ```text
//! toplevel := item (';' item)* ';'?
//! item     := IDENT ANNOT* atom* | atom
//! atom     := INT | STRING | BYTES | IDENT | '(' item ')' | '{' (item (';' item)* ';'?)? '}'
//! ```
//!
//! A top-level text with a `;` is a sequence, so script files parse without
//! outer braces.

use crate::int::Int;
use crate::lexer::{Lexer, Token};
use crate::node::Micheline;
use thiserror::Error;

/// Deepest nesting of parentheses and braces the parser accepts.
pub const MAX_NESTING: usize = 512;

/// Why a Micheline text was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("invalid token at line {line}: '{text}'")]
    InvalidToken { text: String, line: usize },

    #[error("nesting deeper than {0} levels")]
    TooDeep(usize),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Recursive descent over a pre-lexed token list.
pub struct Parser {
    tokens: Vec<(Token, usize)>,
    position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).collect(),
            position: 0,
        }
    }

    /// Parse a whole text
    pub fn parse(source: &str) -> Result<Micheline> {
        Self::new(source).parse_toplevel()
    }

    fn parse_toplevel(&mut self) -> Result<Micheline> {
        let mut items = Vec::new();
        let mut separated = false;

        while !self.is_at_end() {
            items.push(self.parse_item(0)?);
            if self.is_at_end() {
                break;
            }
            self.expect(Token::Semicolon, "';'")?;
            separated = true;
        }

        match items.len() {
            0 => Err(ParseError::UnexpectedEof {
                expected: "expression".to_string(),
            }),
            1 if !separated => Ok(items.remove(0)),
            _ => Ok(Micheline::Sequence(items)),
        }
    }

    /// An application with arguments, or a single atom
    fn parse_item(&mut self, depth: usize) -> Result<Micheline> {
        match self.peek() {
            Some(Token::Ident(_)) => self.parse_application(depth),
            _ => self.parse_atom(depth),
        }
    }

    fn parse_application(&mut self, depth: usize) -> Result<Micheline> {
        let prim = match self.advance() {
            Some((Token::Ident(name), _)) => name,
            other => return Err(self.unexpected(other, "primitive")),
        };

        let mut annots = Vec::new();
        while let Some(Token::Annot(annot)) = self.peek() {
            annots.push(annot.clone());
            self.position += 1;
        }

        let mut args = Vec::new();
        while self.starts_atom() {
            args.push(self.parse_atom(depth)?);
        }

        Ok(Micheline::prim_annotated(prim, args, annots))
    }

    fn parse_atom(&mut self, depth: usize) -> Result<Micheline> {
        if depth >= MAX_NESTING {
            return Err(ParseError::TooDeep(MAX_NESTING));
        }

        match self.advance() {
            Some((Token::Int(text), line)) => match text.parse::<Int>() {
                Ok(n) => Ok(Micheline::int(n)),
                Err(_) => Err(ParseError::InvalidToken { text, line }),
            },
            Some((Token::String(s), _)) => Ok(Micheline::string(s)),
            Some((Token::Bytes(b), _)) => Ok(Micheline::bytes(b)),
            Some((Token::Ident(name), _)) => Ok(Micheline::prim(name)),
            Some((Token::LParen, _)) => {
                let item = self.parse_item(depth + 1)?;
                self.expect(Token::RParen, "')'")?;
                Ok(item)
            }
            Some((Token::LBrace, _)) => self.parse_sequence(depth + 1),
            other => Err(self.unexpected(other, "expression")),
        }
    }

    /// Items up to the closing brace; the opening one is already consumed
    fn parse_sequence(&mut self, depth: usize) -> Result<Micheline> {
        let mut items = Vec::new();
        loop {
            if self.peek() == Some(&Token::RBrace) {
                self.position += 1;
                return Ok(Micheline::Sequence(items));
            }

            items.push(self.parse_item(depth)?);

            match self.peek() {
                Some(Token::Semicolon) => self.position += 1,
                Some(Token::RBrace) => {}
                _ => {
                    let next = self.advance();
                    return Err(self.unexpected(next, "';' or '}'"));
                }
            }
        }
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self.peek(),
            Some(
                Token::Int(_)
                    | Token::String(_)
                    | Token::Bytes(_)
                    | Token::Ident(_)
                    | Token::LParen
                    | Token::LBrace
                    | Token::Invalid(_)
            )
        )
    }

    /// Consume `expected` or report what stood in its place.
    fn expect(&mut self, expected: Token, description: &str) -> Result<()> {
        match self.advance() {
            Some((token, _)) if token == expected => Ok(()),
            other => Err(self.unexpected(other, description)),
        }
    }

    fn unexpected(&self, found: Option<(Token, usize)>, expected: &str) -> ParseError {
        match found {
            Some((Token::Invalid(text), line)) => ParseError::InvalidToken { text, line },
            Some((token, line)) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", token),
                line,
            },
            None => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
        }
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|(token, _)| token)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }
}

/// Parse a Micheline expression or `;`-separated top-level sequence.
pub fn parse_expression(source: &str) -> Result<Micheline> {
    Parser::parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse_expression("42").unwrap(), Micheline::int(42));
        assert_eq!(parse_expression("\"tz\"").unwrap(), Micheline::string("tz"));
        assert_eq!(parse_expression("0x01").unwrap(), Micheline::bytes(vec![1]));
    }

    #[test]
    fn test_parse_application() {
        let node = parse_expression("Pair 1 (Some \"a\") Unit").unwrap();
        assert_eq!(
            node,
            Micheline::prim_with(
                "Pair",
                vec![
                    Micheline::int(1),
                    Micheline::prim_with("Some", vec![Micheline::string("a")]),
                    Micheline::prim("Unit"),
                ]
            )
        );
    }

    #[test]
    fn test_parse_annotations() {
        let node = parse_expression("pair %p (int :i %a) nat").unwrap();
        let app = node.as_primitive_application().unwrap();
        assert_eq!(app.annots, vec!["%p"]);
        assert_eq!(
            app.args[0],
            Micheline::prim_annotated("int", vec![], vec![":i".into(), "%a".into()])
        );
    }

    #[test]
    fn test_parse_sequences() {
        assert_eq!(parse_expression("{}").unwrap(), Micheline::sequence(vec![]));

        let node = parse_expression("{ DUP ; DIP { DROP ; } ; }").unwrap();
        assert_eq!(
            node,
            Micheline::sequence(vec![
                Micheline::prim("DUP"),
                Micheline::prim_with(
                    "DIP",
                    vec![Micheline::sequence(vec![Micheline::prim("DROP")])]
                ),
            ])
        );
    }

    #[test]
    fn test_parse_script_file() {
        let source = r#"
            # a trivial contract
            parameter unit ;
            storage unit ;
            code { CDR ; NIL operation ; PAIR }
        "#;
        let node = parse_expression(source).unwrap();
        let items = node.as_sequence().unwrap();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_primitive_application("parameter"));
        assert!(items[2].is_primitive_application("code"));
    }

    #[test]
    fn test_single_item_with_semicolon_is_sequence() {
        assert_eq!(
            parse_expression("DROP ;").unwrap(),
            Micheline::sequence(vec![Micheline::prim("DROP")])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_expression(""),
            Err(ParseError::UnexpectedEof {
                expected: "expression".to_string()
            })
        );
        assert!(matches!(
            parse_expression("{ DROP"),
            Err(ParseError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse_expression("Pair 1\n2 )"),
            Err(ParseError::UnexpectedToken { line: 2, .. })
        ));
        assert!(matches!(
            parse_expression("Pair ! 1"),
            Err(ParseError::InvalidToken { .. })
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}{}", "{ ".repeat(MAX_NESTING + 1), "}".repeat(MAX_NESTING + 1));
        assert_eq!(parse_expression(&deep), Err(ParseError::TooDeep(MAX_NESTING)));

        let ok = format!("{}{}", "{ ".repeat(100), "}".repeat(100));
        assert_eq!(parse_expression(&ok).unwrap().depth(), 100);
    }
}
