//! Stylesheet parsing.
//!
//! Produces [`Rule`]s whose selectors are already in matchable form; see
//! [`crate::selector`].

mod css_parser;

pub use css_parser::{
    CSSParser, Declaration, ParseError, Rule, Stylesheet, parse_declarations, parse_stylesheet,
};
