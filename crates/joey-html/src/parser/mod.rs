//! Markup parser: scanning, tag splitting, and tree construction.

mod attributes;
mod builder;

pub use attributes::{TagToken, parse_tag};
pub use builder::{
    HEAD_TAGS, HTMLParser, ParseError, ParseIssue, VOID_TAGS, format_tree, print_tree,
};
