// Invariants of both tokenizers over random input.

use glyph_front::{Syntax, TokenType, tokenize};
use proptest::prelude::*;

fn any_syntax() -> impl Strategy<Value = Syntax> {
    prop_oneof![Just(Syntax::Compact), Just(Syntax::Expanded)]
}

/// Tokenizing never panics, whatever the input.
#[test]
fn prop_tokenize_never_panics() {
    proptest!(|(source in "\\PC{0,400}", syntax in any_syntax())| {
        let _ = tokenize(&source, syntax);
    });
}

#[test]
fn prop_tokenize_is_deterministic() {
    proptest!(|(source in "\\PC{0,300}", syntax in any_syntax())| {
        prop_assert_eq!(tokenize(&source, syntax), tokenize(&source, syntax));
    });
}

/// Success always ends in exactly one EOF, and spans move forward.
#[test]
fn prop_stream_shape() {
    proptest!(|(source in "[a-z0-9 $@>:!.,(){}\\[\\]+*/=<\n\"-]{0,200}", syntax in any_syntax())| {
        if let Ok(tokens) = tokenize(&source, syntax) {
            let eofs = tokens.iter().filter(|t| t.kind == TokenType::Eof).count();
            prop_assert_eq!(eofs, 1);
            prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenType::Eof));
            for pair in tokens.windows(2) {
                prop_assert!(pair[0].span.end <= pair[1].span.start);
                prop_assert!(pair[0].span.start <= pair[0].span.end);
            }
            for tok in &tokens {
                prop_assert!(tok.line >= 1 && tok.column >= 1);
                prop_assert!(tok.span.end <= source.len());
            }
        }
    });
}

/// The literal of an identifier or number token is exactly its source text.
#[test]
fn prop_word_literals_match_source() {
    proptest!(|(source in "[a-z_][a-z0-9_]{0,8}( [0-9]{1,5}(\\.[0-9]{1,3})?)?")| {
        let tokens = tokenize(&source, Syntax::Compact).unwrap();
        for tok in tokens.iter().filter(|t| matches!(t.kind, TokenType::Ident | TokenType::Integer | TokenType::Float)) {
            prop_assert_eq!(tok.literal.as_str(), &source[tok.span.start..tok.span.end]);
        }
    });
}

/// Identifier literals tokenize back to themselves.
#[test]
fn prop_identifier_retokenizes() {
    proptest!(|(word in "[a-zA-Z_][a-zA-Z0-9_]{0,12}")| {
        let tokens = tokenize(&word, Syntax::Compact).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].literal.as_str(), word.as_str());
        let again = tokenize(&tokens[0].literal, Syntax::Compact).unwrap();
        prop_assert_eq!(&again[0], &tokens[0]);
    });
}

/// Expanded and compact agree on every word that is not a dialect keyword.
#[test]
fn prop_dialects_agree_off_keywords() {
    let keywords = [
        "route", "type", "let", "return", "middleware", "inject", "expects", "validate", "handle", "cron",
        "command", "queue", "func",
    ];
    proptest!(|(words in prop::collection::vec("[a-z]{1,8}", 1..10))| {
        let source = words.join(" ");
        prop_assume!(words.iter().all(|w| !keywords.contains(&w.as_str())));
        prop_assert_eq!(tokenize(&source, Syntax::Compact), tokenize(&source, Syntax::Expanded));
    });
}
