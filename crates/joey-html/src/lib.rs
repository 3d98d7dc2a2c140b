//! Markup parser for the Joey renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **Single-pass scanner** over tags, text, and character references
//!   - Raw-text `script`/`style` bodies, comments, and `<!DOCTYPE>` skipping
//!   - Quote-aware attribute splitting
//! - **Tree construction** on a stack of unfinished elements
//!   - Implicit `html`, `head`, and `body` so every document has the
//!     `html > (head, body)` skeleton
//!   - Void elements, unmatched end tags ignored
//!
//! # Not Yet Implemented
//!
//! - Insertion modes beyond the head/body split
//! - Table parsing, foster parenting, and the adoption agency algorithm

/// Character reference table and decoding.
pub mod entities;
/// Scanner and tree builder.
pub mod parser;

pub use parser::{HTMLParser, ParseError, ParseIssue, format_tree, print_tree};

use joey_dom::DomTree;

/// Parse a complete document.
///
/// # Errors
///
/// Returns [`ParseError::EmptyDocument`] if the input contains no content.
pub fn parse(html: &str) -> Result<DomTree, ParseError> {
    HTMLParser::new(html).run()
}
