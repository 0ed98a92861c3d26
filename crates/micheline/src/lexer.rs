//! Tokenization of Micheline text.
//!
//! Tokens are produced by a logos-derived lexer; comments are skipped.

use logos::Logos;

/// A lexeme of Micheline source. Whitespace and comments never reach the parser.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    // Integers keep their digits; bytes and strings arrive decoded.
    #[regex(r"-?[0-9]+", |lex| lex.slice().to_string())]
    Int(String),

    #[regex(r"0x[0-9a-fA-F]*", parse_bytes)]
    Bytes(Vec<u8>),

    #[regex(r#""([^"\\\n]|\\[^\n])*""#, parse_string)]
    String(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[:@%][A-Za-z0-9_.%@]*", |lex| lex.slice().to_string())]
    Annot(String),

    // `#` line comments and `/* */` block comments.
    #[regex(r"#[^\n]*", logos::skip)]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    BlockComment,

    /// Text that does not form a token. Never produced by logos itself.
    Invalid(String),
}

/// Parse the hex digits after `0x`
fn parse_bytes(lex: &mut logos::Lexer<Token>) -> Option<Vec<u8>> {
    hex::decode(&lex.slice()[2..]).ok()
}

/// Strip the quotes and resolve escape sequences
fn parse_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            '"' => '"',
            '\\' => '\\',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'b' => '\u{8}',
            _ => return None,
        });
    }
    Some(out)
}

/// Yields tokens paired with the line they start on.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
    source: &'source str,
    line: usize,
    line_scanned_to: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
            source,
            line: 1,
            line_scanned_to: 0,
        }
    }

    /// Byte range of the last token returned.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.inner.span()
    }

    /// Advance the line counter to `pos`. Tokens arrive in order, so only the
    /// text since the previous token is scanned.
    fn line_at_pos(&mut self, pos: usize) -> usize {
        self.line += self.source[self.line_scanned_to..pos]
            .bytes()
            .filter(|&b| b == b'\n')
            .count();
        self.line_scanned_to = pos;
        self.line
    }
}

impl<'source> Iterator for Lexer<'source> {
    type Item = (Token, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.inner.next()?;
        let span = self.inner.span();
        let line = self.line_at_pos(span.start);

        let token = token.unwrap_or_else(|_| Token::Invalid(self.inner.slice().to_string()));
        Some((token, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        Lexer::new(source).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_tokenize_application() {
        assert_eq!(
            tokens("PUSH @x nat 42"),
            vec![
                Token::Ident("PUSH".to_string()),
                Token::Annot("@x".to_string()),
                Token::Ident("nat".to_string()),
                Token::Int("42".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_delimiters() {
        assert_eq!(
            tokens("{ (Unit) ; }"),
            vec![
                Token::LBrace,
                Token::LParen,
                Token::Ident("Unit".to_string()),
                Token::RParen,
                Token::Semicolon,
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_tokenize_literals() {
        assert_eq!(
            tokens(r#"-7 0x00FF 0x "a\"b\n""#),
            vec![
                Token::Int("-7".to_string()),
                Token::Bytes(vec![0x00, 0xff]),
                Token::Bytes(vec![]),
                Token::String("a\"b\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_odd_hex_is_invalid() {
        assert!(matches!(tokens("0xabc")[0], Token::Invalid(_)));
    }

    #[test]
    fn test_skip_comments() {
        let source = "DROP # remove top\n/* multi\n line ** */ SWAP";
        assert_eq!(
            tokens(source),
            vec![Token::Ident("DROP".to_string()), Token::Ident("SWAP".to_string())]
        );
    }

    #[test]
    fn test_field_annotations() {
        assert_eq!(
            tokens("%default %@ :t"),
            vec![
                Token::Annot("%default".to_string()),
                Token::Annot("%@".to_string()),
                Token::Annot(":t".to_string()),
            ]
        );
    }

    #[test]
    fn test_line_tracking() {
        let source = "parameter unit ;\nstorage unit ;\n\ncode {}";
        let lines: Vec<_> = Lexer::new(source).map(|(_, line)| line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 2, 2, 4, 4, 4]);
    }
}
