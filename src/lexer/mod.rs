//! Lexer for arithmetic expressions
//!
//! Whitespace is insignificant anywhere in an expression: it is removed
//! before matching, so `1 2` reads as `12`. Token spans still point into the
//! text the user typed.

mod tokens;

pub use tokens::{Token, TokenKind};

use crate::common::Span;
use crate::diagnostics::ExprError;
use logos::Logos;

/// Tokenize an expression
pub fn lex(source: &str) -> Result<Vec<Token>, ExprError> {
    let (compact, origin) = strip_whitespace(source);
    if compact.is_empty() {
        return Err(ExprError::EmptyExpression);
    }

    let to_source = |span: std::ops::Range<usize>| -> Span {
        Span::new(origin[span.start], origin[span.end - 1] + 1)
    };

    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(&compact);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        match result {
            Ok(kind) => tokens.push(Token {
                kind,
                span: to_source(range.clone()),
                text: compact[range].to_string(),
            }),
            Err(()) => {
                let ch = compact[range.start..].chars().next().unwrap_or_default();
                let span = to_source(range.start..range.start + ch.len_utf8());
                return Err(ExprError::UnexpectedCharacter {
                    text: ch.to_string(),
                    span: span.into(),
                });
            }
        }
    }

    tracing::trace!(count = tokens.len(), "lexed expression {:?}", source);
    Ok(tokens)
}

/// Check whether `text` is a single well-formed variable name
pub fn is_identifier(text: &str) -> bool {
    let mut lexer = TokenKind::lexer(text);
    matches!(lexer.next(), Some(Ok(TokenKind::Ident)))
        && lexer.span() == (0..text.len())
        && lexer.next().is_none()
}

/// Remove whitespace, remembering where each remaining byte came from
fn strip_whitespace(source: &str) -> (String, Vec<usize>) {
    let mut compact = String::with_capacity(source.len());
    let mut origin = Vec::with_capacity(source.len());
    for (offset, ch) in source.char_indices() {
        if ch.is_whitespace() {
            continue;
        }
        compact.push(ch);
        origin.extend((0..ch.len_utf8()).map(|i| offset + i));
    }
    (compact, origin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_whitespace_tracks_origin() {
        let (compact, origin) = strip_whitespace(" a +\t1");
        assert_eq!(compact, "a+1");
        assert_eq!(origin, vec![1, 3, 5]);
    }

    #[test]
    fn test_spans_point_into_source() {
        let tokens = lex("  foo  * 12").unwrap();
        assert_eq!(tokens[0].span, Span::new(2, 5));
        assert_eq!(tokens[1].span, Span::new(7, 8));
        assert_eq!(tokens[2].span, Span::new(9, 11));
    }

    #[test]
    fn test_unexpected_character_span() {
        let err = lex("1 + $").unwrap_err();
        match err {
            ExprError::UnexpectedCharacter { text, span } => {
                assert_eq!(text, "$");
                assert_eq!(span.offset(), 4);
                assert_eq!(span.len(), 1);
            }
            other => panic!("expected UnexpectedCharacter, got {:?}", other),
        }
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_tmp1"));
        assert!(is_identifier("Total_2"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
        assert!(!is_identifier("é"));
    }
}
