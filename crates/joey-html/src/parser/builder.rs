use std::fmt::Write as _;

use thiserror::Error;

use joey_common::warning::warn_once;
use joey_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use super::attributes::{TagToken, parse_tag};
use crate::entities::{decode_reference, is_reference_char};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// They are attached to the tree but never become an unfinished element.
pub const VOID_TAGS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements that belong in `<head>`. Seeing one of these before any body
/// content implicitly opens `<head>` instead of `<body>`.
pub const HEAD_TAGS: [&str; 9] = [
    "base", "basefont", "bgsound", "noscript", "link", "meta", "title", "style", "script",
];

/// [§ 13.1.2.1 Restrictions on the contents of raw text elements](https://html.spec.whatwg.org/multipage/syntax.html#cdata-rcdata-restrictions)
///
/// The body of these elements is captured literally up to the matching end
/// tag: no tags, no character references.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

/// The elements every finished document is built around.
const SKELETON_TAGS: [&str; 3] = ["html", "head", "body"];

/// Failure that leaves nothing to render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input contained no tags and no text, so no root element was
    /// ever created.
    #[error("document is empty: no elements or text were found")]
    EmptyDocument,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "The handling of parse errors is well-defined": every issue here was
/// recovered from, and parsing continued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// What was wrong and what the parser did about it.
    pub message: String,
    /// Byte offset into the input where the problem was noticed.
    pub position: usize,
    /// `false` for tolerated oddities (e.g. an unterminated reference at
    /// end of input), `true` for markup the parser had to discard.
    pub is_error: bool,
}

/// Single-pass markup parser.
///
/// Scans the input one character at a time. Text accumulates until a `<`,
/// tags accumulate until a `>`, and each finished token is applied to the
/// stack of unfinished elements. Before every token, an implicit-tag pass
/// repairs the `html > (head, body)` skeleton.
pub struct HTMLParser<'a> {
    /// Markup being parsed.
    source: &'a str,

    /// Byte offset of the character being scanned.
    position: usize,

    /// Between `<` and `>`.
    in_tag: bool,

    /// Text of the current tag, without the angle brackets.
    tag_buffer: String,

    /// Between `&` and the end of the reference.
    in_entity: bool,

    /// Name (or `#number`) of the current character reference.
    entity_buffer: String,

    /// Pending character data, flushed as a text node at the next tag.
    text_buffer: String,

    /// Inside a `script`/`style` body: the lowercased end tag that ends it.
    raw_text_end: Option<String>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Elements whose end tag has not been seen yet. Each is already
    /// attached to its parent; closing just pops it.
    unfinished: Vec<NodeId>,

    /// Tree being built.
    tree: DomTree,

    /// Recoverable problems seen so far.
    issues: Vec<ParseIssue>,
}

impl<'a> HTMLParser<'a> {
    /// Create a parser over `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            in_tag: false,
            tag_buffer: String::new(),
            in_entity: false,
            entity_buffer: String::new(),
            text_buffer: String::new(),
            raw_text_end: None,
            unfinished: Vec::new(),
            tree: DomTree::new(),
            issues: Vec::new(),
        }
    }

    /// Run the parser and return the document tree.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyDocument`] if the input produced no nodes.
    pub fn run(self) -> Result<DomTree, ParseError> {
        self.run_with_issues().map(|(tree, _)| tree)
    }

    /// Run the parser, returning the tree together with every recovered
    /// parse issue.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyDocument`] if the input produced no nodes.
    pub fn run_with_issues(mut self) -> Result<(DomTree, Vec<ParseIssue>), ParseError> {
        for (position, c) in self.source.char_indices() {
            self.position = position;
            if self.raw_text_end.is_some() {
                self.consume_raw_text(c);
            } else {
                self.consume(c);
            }
        }
        self.position = self.source.len();
        self.finish()?;

        log::debug!(
            "parsed {} nodes with {} issues",
            self.tree.len(),
            self.issues.len()
        );
        Ok((self.tree, self.issues))
    }

    fn consume(&mut self, c: char) {
        if self.in_tag {
            self.consume_in_tag(c);
            return;
        }

        if self.in_entity {
            if is_reference_char(&self.entity_buffer, c) {
                self.entity_buffer.push(c);
                return;
            }
            self.in_entity = false;
            let name = std::mem::take(&mut self.entity_buffer);
            if c == ';' {
                if let Some(decoded) = decode_reference(&name) {
                    self.text_buffer.push_str(&decoded);
                } else {
                    self.parse_issue(&format!("unknown character reference &{name};"), false);
                    let _ = write!(self.text_buffer, "&{name};");
                }
                return;
            }
            // Not a reference after all: keep it literally and rescan `c`.
            self.text_buffer.push('&');
            self.text_buffer.push_str(&name);
        }

        match c {
            '<' => {
                self.flush_text();
                self.in_tag = true;
            }
            '&' => self.in_entity = true,
            _ => self.text_buffer.push(c),
        }
    }

    fn consume_in_tag(&mut self, c: char) {
        if c == '>' && !self.in_unterminated_comment() {
            self.in_tag = false;
            let text = std::mem::take(&mut self.tag_buffer);
            self.finish_tag(&text);
        } else {
            self.tag_buffer.push(c);
        }
    }

    /// [§ 13.2.5.43 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// A `>` inside `<!-- ... -->` does not end the comment; only `-->` does.
    fn in_unterminated_comment(&self) -> bool {
        self.tag_buffer.starts_with("!--")
            && (self.tag_buffer.len() < 5 || !self.tag_buffer.ends_with("--"))
    }

    fn consume_raw_text(&mut self, c: char) {
        self.text_buffer.push(c);
        let Some(end) = self.raw_text_end.clone() else {
            return;
        };
        let split = self.text_buffer.len().saturating_sub(end.len());
        let closed = self
            .text_buffer
            .get(split..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(&end));
        if closed {
            self.text_buffer.truncate(split);
            self.raw_text_end = None;
            self.flush_text();
            let name = end.trim_start_matches("</").trim_end_matches('>').to_string();
            self.close_element(&name);
        }
    }

    /// Apply one finished `<...>`.
    fn finish_tag(&mut self, text: &str) {
        // <!DOCTYPE>, <!-- -->, <?xml?>
        if text.starts_with('!') || text.starts_with('?') {
            return;
        }

        let Some(tag) = parse_tag(text) else {
            self.parse_issue(&format!("invalid tag <{text}> kept as text"), true);
            let _ = write!(self.text_buffer, "<{text}>");
            return;
        };

        if tag.is_closing {
            self.close_element(&tag.name);
        } else {
            self.open_element(tag);
        }
    }

    /// Emit pending character data as a text node. Whitespace-only runs
    /// produce nothing.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.text_buffer);
        if text.chars().all(|c| c.is_ascii_whitespace()) {
            return;
        }
        self.implicit_tags(None);
        let Some(&parent) = self.unfinished.last() else {
            return;
        };
        let node = self.tree.alloc(NodeType::Text(text));
        self.tree.append_child(parent, node);
    }

    /// Tag names on the stack of unfinished elements, outermost first.
    fn open_tags(&self) -> Vec<&str> {
        self.unfinished
            .iter()
            .filter_map(|&id| self.tree.tag_name(id))
            .collect()
    }

    /// Repair the document skeleton before handling `tag` (`None` for
    /// text, `"/name"` for end tags). Runs until nothing changes.
    fn implicit_tags(&mut self, tag: Option<&str>) {
        let is_head_tag = tag.is_some_and(|t| HEAD_TAGS.contains(&t));
        loop {
            let open = self.open_tags();
            let (empty, only_html) = (open.is_empty(), open == ["html"]);
            let in_head = open == ["html", "head"];

            if empty && tag != Some("html") {
                self.push_skeleton("html", AttributesMap::new());
            } else if only_html && !matches!(tag, Some("head" | "body" | "/html")) {
                let implied = if is_head_tag { "head" } else { "body" };
                self.push_skeleton(implied, AttributesMap::new());
            } else if in_head && tag != Some("/head") && !is_head_tag {
                let _ = self.unfinished.pop();
            } else {
                break;
            }
        }
    }

    fn open_element(&mut self, tag: TagToken) {
        self.implicit_tags(Some(&tag.name));

        if SKELETON_TAGS.contains(&tag.name.as_str()) {
            self.open_skeleton(tag);
            return;
        }

        let Some(&parent) = self.unfinished.last() else {
            return;
        };
        let is_void = VOID_TAGS.contains(&tag.name.as_str());
        if tag.self_closing && !is_void {
            self.parse_issue(&format!("self-closing syntax on non-void <{}> ignored", tag.name), false);
        }

        let raw_text_end = RAW_TEXT_TAGS
            .contains(&tag.name.as_str())
            .then(|| format!("</{}>", tag.name));
        let node = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag.name,
            attrs: tag.attrs,
        }));
        self.tree.append_child(parent, node);

        if !is_void {
            self.unfinished.push(node);
            self.raw_text_end = raw_text_end;
        }
    }

    /// Explicit `<html>`, `<head>`, or `<body>`.
    ///
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "A start tag whose tag name is "html": Parse error... for each
    /// attribute on the token, check to see if the attribute is already
    /// present on the top element of the stack of open elements. If it is
    /// not, add the attribute and its corresponding value to that element."
    fn open_skeleton(&mut self, tag: TagToken) {
        let Some(existing) = self.find_skeleton(&tag.name) else {
            self.push_skeleton(&tag.name, tag.attrs);
            return;
        };

        if self.can_reopen(&tag.name) {
            self.unfinished.push(existing);
        } else {
            self.parse_issue(&format!("duplicate <{}> ignored", tag.name), true);
        }

        if let Some(node) = self.tree.get_mut(existing)
            && let NodeType::Element(data) = &mut node.node_type
        {
            for (key, value) in tag.attrs {
                let _ = data.attrs.entry(key).or_insert(value);
            }
        }
    }

    /// Push `html`, `head`, or `body`, creating it only if the document
    /// does not have one yet.
    fn push_skeleton(&mut self, name: &str, attrs: AttributesMap) {
        if let Some(existing) = self.find_skeleton(name) {
            self.unfinished.push(existing);
            return;
        }

        if name == "body" && self.find_skeleton("head").is_none() {
            let _ = self.create_skeleton("head", AttributesMap::new());
        }
        let node = self.create_skeleton(name, attrs);
        self.unfinished.push(node);
    }

    /// Allocate a skeleton element and attach it where it belongs: `html` as
    /// the root, `head` and `body` under it with `head` first.
    fn create_skeleton(&mut self, name: &str, attrs: AttributesMap) -> NodeId {
        let node = self.tree.alloc(NodeType::Element(ElementData {
            tag_name: name.to_string(),
            attrs,
        }));

        match self.tree.root() {
            None => self.tree.set_root(node),
            Some(html) => {
                let body = self.tree.child_element(html, "body");
                match body {
                    Some(body) if name == "head" => self.tree.insert_before(html, node, body),
                    _ => self.tree.append_child(html, node),
                }
            }
        }
        node
    }

    fn find_skeleton(&self, name: &str) -> Option<NodeId> {
        let html = self.tree.root()?;
        if name == "html" {
            return Some(html);
        }
        self.tree.child_element(html, name)
    }

    /// An existing skeleton element may go back on the stack only at the
    /// level it lives at: `html` on an empty stack, `head`/`body` directly
    /// under `html`.
    fn can_reopen(&self, name: &str) -> bool {
        let open = self.open_tags();
        if name == "html" {
            open.is_empty()
        } else {
            open == ["html"]
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// "Any other end tag: ... If node is not in the stack of open elements,
    /// then this is a parse error; ignore the token."
    fn close_element(&mut self, name: &str) {
        self.implicit_tags(Some(&format!("/{name}")));

        if self.unfinished.is_empty() {
            self.parse_issue(&format!("</{name}> with no open elements ignored"), true);
            return;
        }

        let matching = self
            .unfinished
            .iter()
            .rposition(|&id| self.tree.tag_name(id) == Some(name));
        let Some(index) = matching else {
            self.parse_issue(&format!("unmatched </{name}> ignored"), true);
            return;
        };

        // The root stays open so trailing content still has a home.
        let keep = if name == "html" { 1 } else { index };
        let implied = self.unfinished.len().saturating_sub(keep + 1);
        if implied > 0 && name != "html" && name != "body" {
            self.parse_issue(
                &format!("</{name}> implicitly closed {implied} open element(s)"),
                false,
            );
        }
        self.unfinished.truncate(keep);
    }

    /// Flush pending state and guarantee the `html > (head, body)` skeleton.
    fn finish(&mut self) -> Result<(), ParseError> {
        if self.raw_text_end.take().is_some() {
            self.parse_issue("unterminated raw text element closed at end of input", true);
        }
        if self.in_tag {
            let text = std::mem::take(&mut self.tag_buffer);
            self.in_tag = false;
            self.parse_issue(&format!("unterminated tag <{text} dropped"), true);
        }
        if self.in_entity {
            self.in_entity = false;
            let name = std::mem::take(&mut self.entity_buffer);
            self.parse_issue(&format!("unterminated character reference &{name}"), false);
            self.text_buffer.push('&');
            self.text_buffer.push_str(&name);
        }
        self.flush_text();

        if self.tree.root().is_none() {
            return Err(ParseError::EmptyDocument);
        }

        // Every element is already attached to its parent.
        self.unfinished.clear();
        for name in ["head", "body"] {
            if self.find_skeleton(name).is_none() {
                let _ = self.create_skeleton(name, AttributesMap::new());
            }
        }
        Ok(())
    }

    fn parse_issue(&mut self, message: &str, is_error: bool) {
        warn_once("html", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            position: self.position,
            is_error,
        });
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
///
/// Attributes are sorted by name; spaces in text are shown as `·` and
/// newlines as `\n` so whitespace is visible.
#[must_use]
pub fn format_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_tree(tree, id, 0, &mut out);
    out
}

fn write_tree(tree: &DomTree, id: NodeId, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Element(data) => {
            let mut attrs: Vec<String> = data
                .attrs
                .iter()
                .map(|(k, v)| match v {
                    Some(v) => format!("{k}=\"{v}\""),
                    None => k.clone(),
                })
                .collect();
            attrs.sort();
            if attrs.is_empty() {
                let _ = writeln!(out, "{prefix}<{}>", data.tag_name);
            } else {
                let _ = writeln!(out, "{prefix}<{} {}>", data.tag_name, attrs.join(" "));
            }
        }
        NodeType::Text(data) => {
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            let _ = writeln!(out, "{prefix}\"{display}\"");
        }
    }
    for &child_id in tree.children(id) {
        write_tree(tree, child_id, indent + 1, out);
    }
}

/// Print the subtree at `id` to stdout. See [`format_tree`].
#[allow(clippy::print_stdout)]
pub fn print_tree(tree: &DomTree, id: NodeId) {
    print!("{}", format_tree(tree, id));
}
