//! Fixed hint tables. Unmatched cases yield no hint.

use crate::lexer::token::TokenType;

pub const TYPE_HINT: &str = "Valid types are: int, str, bool, float, or custom type names";
pub const ROUTE_HINT: &str = "Routes should follow the pattern: @ route /path [METHOD] -> ReturnType";
pub const HTTP_METHOD_HINT: &str = "Valid HTTP methods are: GET, POST, PUT, DELETE, PATCH";
pub const TOP_LEVEL_HINT: &str = "Top-level items must start with ':', '@', '!', '*', '~', or '&'";
pub const WS_EVENT_HINT: &str = "Valid events are: connect, message, disconnect, error";
pub const EXPRESSION_HINT: &str = "Expected a valid expression (number, string, variable, or function call)";
pub const IDENT_HINT: &str =
    "Identifiers must start with a letter or underscore, followed by letters, digits, or underscores";
pub const STATEMENT_HINT: &str = "Statements must start with '$' (for variable assignment) or '>' (for return)";
pub const UNTERMINATED_STRING_HINT: &str = "Make sure to close the string with a matching quote";

/// Hint for an `expect` failure, keyed on what the grammar wanted and what it got.
pub fn expect_hint(expected: TokenType, found: TokenType) -> Option<&'static str> {
    use TokenType as T;
    let hint = match (expected, found) {
        (T::LBrace, T::Newline) => "Did you forget to add an opening brace '{'?",
        (T::LBrace, T::Arrow) => "Type definitions and routes require a body enclosed in braces { }",
        (T::RBrace, T::Eof) => "Missing closing brace '}'. Check if all opened braces are properly closed",
        (T::Slash, T::Ident) => "Route paths must start with '/'",
        (T::LParen, T::Newline) => "Did you forget to add an opening parenthesis '('?",
        (T::RParen, T::Eof) => {
            "Missing closing parenthesis ')'. Check if all opened parentheses are properly closed"
        }
        (T::Newline, T::Arrow) => {
            "The '->' symbol is used for return types. If you want to define a route body, use braces { } after the path"
        }
        _ => return None,
    };
    Some(hint)
}

/// Hint for a character the tokenizers cannot start a token with.
pub fn illegal_char_hint(ch: char) -> &'static str {
    match ch {
        ';' => "GLYPH uses newlines for statement separation, not semicolons",
        '`' => "Use double quotes (\") or single quotes (') for strings",
        c if !c.is_ascii() => "GLYPH source code must use ASCII characters only",
        _ => "This character is not valid in GLYPH syntax",
    }
}
