//! Recursive-descent stylesheet parser.
//!
//! The grammar is deliberately small:
//!
//! ```text
//! stylesheet  := rule*
//! rule        := selector '{' declarations '}'
//! selector    := word+
//! declarations:= (word ':' word ';')*
//! ```
//!
//! A word is a run of alphanumerics plus `#`, `-`, `.`, and `%`. Anything
//! else is a parse error, recovered from by skipping to the next `;` (inside
//! a block) or past the next `}` (at rule level).

use thiserror::Error;

use joey_common::warning::warn_once;

use crate::selector::{CSSSelector, parse_selector};

/// Characters of context captured into a [`ParseError`].
const CONTEXT_LEN: usize = 10;

/// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The property name, lowercased.
    pub name: String,
    /// The value word, as written.
    pub value: String,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
///
/// A CSS style rule (selector + declarations).
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Which elements the rule applies to.
    pub selector: CSSSelector,
    /// Declarations in source order; later ones win on collision.
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Cascade weight of the rule's selector.
    #[must_use]
    pub fn priority(&self) -> u32 {
        self.selector.priority()
    }
}

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// A parsed CSS stylesheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// Rules in source order.
    pub rules: Vec<Rule>,
}

/// A syntax error the parser recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Expected {expected} at index {index} but found: {context}")]
pub struct ParseError {
    /// What the parser was looking for (`word`, `:`, `;`, `{`, `}`).
    pub expected: String,
    /// Character offset of the failure.
    pub index: usize,
    /// Source text around the failure.
    pub context: String,
}

/// Stylesheet parser over one source string.
pub struct CSSParser {
    source: Vec<char>,
    position: usize,
    errors: Vec<ParseError>,
}

impl CSSParser {
    /// Create a parser for `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            position: 0,
            errors: Vec::new(),
        }
    }

    /// Errors recovered from so far.
    #[must_use]
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    ///
    /// Parse every rule. A malformed rule is skipped up to and including the
    /// next `}`; the rules around it are kept.
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut rules = Vec::new();

        loop {
            self.whitespace();
            if self.at_end() {
                break;
            }
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    self.recover(err);
                    if self.ignore_until(&['}']) == Some('}') {
                        self.position += 1;
                        self.whitespace();
                    } else {
                        break;
                    }
                }
            }
        }

        Stylesheet { rules }
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// Parse the inside of a `{ }` block (or a `style` attribute), stopping at
    /// `}` or end of input. A malformed declaration is skipped up to the next
    /// `;`.
    pub fn parse_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        self.whitespace();

        while !self.at_end() && self.peek() != Some('}') {
            match self.declaration() {
                Ok(declaration) => {
                    declarations.push(declaration);
                    self.whitespace();
                    // The last declaration in a block may omit its `;`.
                    if self.peek() == Some('}') || self.at_end() {
                        break;
                    }
                    if let Err(err) = self.literal(';') {
                        self.recover(err);
                        if !self.skip_declaration() {
                            break;
                        }
                        continue;
                    }
                    self.whitespace();
                }
                Err(err) => {
                    self.recover(err);
                    if !self.skip_declaration() {
                        break;
                    }
                }
            }
        }

        declarations
    }

    fn rule(&mut self) -> Result<Rule, ParseError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        let declarations = self.parse_declarations();
        self.literal('}')?;
        self.whitespace();
        Ok(Rule {
            selector,
            declarations,
        })
    }

    /// Words up to `{`, each one a descendant of the previous.
    fn selector(&mut self) -> Result<CSSSelector, ParseError> {
        let mut selector = parse_selector(&self.word()?);
        self.whitespace();

        while !self.at_end() && self.peek() != Some('{') {
            let descendant = parse_selector(&self.word()?);
            selector = CSSSelector::Descendant(Box::new(selector), Box::new(descendant));
            self.whitespace();
        }
        Ok(selector)
    }

    fn declaration(&mut self) -> Result<Declaration, ParseError> {
        let name = self.word()?.to_ascii_lowercase();
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok(Declaration { name, value })
    }

    /// Skip past the next `;`. Returns `false` when a `}` or end of input
    /// came first, which ends the block.
    fn skip_declaration(&mut self) -> bool {
        if self.ignore_until(&[';', '}']) == Some(';') {
            self.position += 1;
            self.whitespace();
            true
        } else {
            false
        }
    }

    fn word(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%') {
                self.position += 1;
            } else {
                break;
            }
        }
        if self.position == start {
            return Err(self.error("word"));
        }
        Ok(self.source[start..self.position].iter().collect())
    }

    fn literal(&mut self, expected: char) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.error(&expected.to_string()))
        }
    }

    /// Skip whitespace and `/* ... */` comments.
    fn whitespace(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.position += 1;
            }
            if self.peek() == Some('/') && self.source.get(self.position + 1) == Some(&'*') {
                self.position += 2;
                while !self.at_end()
                    && !(self.peek() == Some('*') && self.source.get(self.position + 1) == Some(&'/'))
                {
                    self.position += 1;
                }
                self.position = (self.position + 2).min(self.source.len());
            } else {
                break;
            }
        }
    }

    /// Advance to the first of `stops`, returning it, or to end of input.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.position += 1;
        }
        None
    }

    fn error(&self, expected: &str) -> ParseError {
        let start = self.position.saturating_sub(CONTEXT_LEN);
        let end = (start + CONTEXT_LEN).min(self.source.len());
        ParseError {
            expected: expected.to_string(),
            index: self.position,
            context: self.source[start..end].iter().collect(),
        }
    }

    fn recover(&mut self, err: ParseError) {
        warn_once("css", &err.to_string());
        self.errors.push(err);
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.position).copied()
    }

    fn at_end(&self) -> bool {
        self.position >= self.source.len()
    }
}

/// Parse a complete stylesheet.
#[must_use]
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    CSSParser::new(source).parse_stylesheet()
}

/// Parse a bare declaration list, as found in a `style` attribute.
#[must_use]
pub fn parse_declarations(source: &str) -> Vec<Declaration> {
    CSSParser::new(source).parse_declarations()
}
