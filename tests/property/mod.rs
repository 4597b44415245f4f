// Property-based tests for the GLYPH front end.
//
// Run all properties:
//   cargo test --test property_tests
//
// Run with more cases (default is 256):
//   PROPTEST_CASES=1000 cargo test --test property_tests

mod lexer_properties;
mod parser_properties;
