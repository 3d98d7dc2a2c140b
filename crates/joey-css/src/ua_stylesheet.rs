//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! The default sheet is placed ahead of document sheets before the rules are
//! sorted, so at equal priority any document rule overrides it.

use std::sync::OnceLock;

use crate::parser::{Stylesheet, parse_stylesheet};

/// [WHATWG HTML § 15.3 Rendering — Suggested default style sheet](https://html.spec.whatwg.org/multipage/rendering.html#the-css-user-agent-style-sheet-and-presentational-hints)
///
/// Default rules for the elements the renderer styles. Values are single
/// words, so sizes are written as percentages of the parent size.
const UA_CSS: &str = r"
/* [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3) */
pre {
    background-color: gray;
    font-family: Courier;
}

/* [§ 15.3.4 Phrasing content](https://html.spec.whatwg.org/multipage/rendering.html#phrasing-content-3) */
/* Link color is left to the UA; blue is the convention. */
a {
    color: blue;
}

/* 'i, em { font-style: italic; }' */
i {
    font-style: italic;
}
em {
    font-style: italic;
}

/* 'b, strong { font-weight: bolder; }' */
b {
    font-weight: bold;
}
strong {
    font-weight: bold;
}

/* 'small { font-size: smaller; }' */
small {
    font-size: 90%;
}
big {
    font-size: 110%;
}

code {
    font-family: Courier;
}

/* [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings) */
/* 'h1 { ... font-weight: bold; font-size: 2.00em; }' */
h1 {
    font-size: 200%;
    font-weight: bold;
}

/* 'h2 { ... font-weight: bold; font-size: 1.50em; }' */
h2 {
    font-size: 150%;
    font-weight: bold;
}

/* 'h3 { ... font-weight: bold; font-size: 1.17em; }' */
h3 {
    font-size: 117%;
    font-weight: bold;
}
";

/// The parsed default stylesheet, built on first use.
pub fn ua_stylesheet() -> &'static Stylesheet {
    static UA: OnceLock<Stylesheet> = OnceLock::new();
    UA.get_or_init(|| {
        let sheet = parse_stylesheet(UA_CSS);
        log::debug!("default stylesheet: {} rules", sheet.rules.len());
        sheet
    })
}
