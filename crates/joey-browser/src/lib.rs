//! High-level browser API for the Joey renderer.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - fetch the document and its linked stylesheets
//!   through a [`DocumentSource`]
//! - **Style Computation** - default sheet, document sheets, inline styles
//! - **Layout and Paint** - the document box and its display list
//! - **Viewport** - resize, scroll, and visibility culling
//! - **Font Metrics** - fontdue-backed measurement behind a cache
//!
//! Pixel rasterization and windowing are left to the host that consumes
//! [`Browser::visible_commands`].
//!
//! # Pipeline
//!
//! ```text
//! fetch → parse → stylesheets → cascade → layout → paint
//!                                            ↑        ↑
//!                                         resize    (scroll only culls)
//! ```

pub mod config;
pub mod font_metrics;
pub mod stylesheets;
pub mod viewport;

pub use config::BrowserConfig;
pub use font_metrics::{FontError, FontdueFontMetrics};
pub use joey_css as css;
pub use joey_dom as dom;
pub use joey_html as html;
pub use stylesheets::{StyleSource, collect_style_sources, load_stylesheets};
pub use viewport::Viewport;

use std::time::Instant;

use thiserror::Error;

use joey_common::net::{DocumentSource, FetchError};
use joey_common::warning::clear_warnings;
use joey_css::{
    DisplayCommand, DisplayList, DocumentLayout, FontCache, FontMetrics, LayoutConfig, Painter,
    Rule, apply_styles, cascade_order, ua_stylesheet,
};
use joey_dom::DomTree;
use joey_html::ParseError;

/// Why a navigation failed.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document itself could not be retrieved.
    #[error("failed to fetch document: {0}")]
    Fetch(#[from] FetchError),
    /// The document produced no tree.
    #[error("failed to parse document: {0}")]
    Parse(#[from] ParseError),
}

/// A loaded document: its tree, its rules, and the current layout.
pub struct Page {
    /// Address the document was loaded from, if any.
    pub url: Option<String>,
    /// Styled document tree.
    pub tree: DomTree,
    /// Every rule applied, in cascade order.
    pub rules: Vec<Rule>,
    /// Layout for the current viewport width.
    pub layout: DocumentLayout,
    /// Paint output of `layout`.
    pub display_list: DisplayList,
}

impl Page {
    /// Total document height, margins included.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.layout.height
    }

    /// [§ 4.2.2 The title element](https://html.spec.whatwg.org/multipage/semantics.html#the-title-element)
    ///
    /// Text of the `<title>` in the document head, whitespace collapsed.
    #[must_use]
    pub fn title(&self) -> Option<String> {
        let head = self.tree.head()?;
        let title = self.tree.child_element(head, "title")?;
        let text = self.tree.text_content(title);
        let words: Vec<&str> = text.split_whitespace().collect();
        (!words.is_empty()).then(|| words.join(" "))
    }
}

/// Drives the pipeline for one window: navigation, resize, and scroll.
///
/// `S` supplies document and stylesheet text; `M` measures text and is
/// memoized for the life of the browser.
pub struct Browser<S, M> {
    source: S,
    fonts: FontCache<M>,
    layout_config: LayoutConfig,
    scroll_step: f32,
    viewport: Viewport,
    page: Option<Page>,
}

impl<S: DocumentSource, M: FontMetrics> Browser<S, M> {
    /// Create a browser with no page loaded.
    #[must_use]
    pub fn new(source: S, font_metrics: M, config: &BrowserConfig) -> Self {
        Self {
            source,
            fonts: FontCache::new(font_metrics),
            layout_config: config.layout_config(),
            scroll_step: config.scroll_step,
            viewport: Viewport::new(config.viewport_width, config.viewport_height),
            page: None,
        }
    }

    /// Navigate to `url`.
    ///
    /// Linked stylesheets that fail to load are skipped; only a failure to
    /// fetch or parse the document itself fails the navigation, in which
    /// case the previous page stays loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Fetch`] or [`LoadError::Parse`].
    pub fn load(&mut self, url: &str) -> Result<&Page, LoadError> {
        clear_warnings();
        let started = Instant::now();
        let text = self.source.fetch(url)?;
        log::debug!(
            "fetched {url}: {} bytes in {:?}",
            text.len(),
            started.elapsed()
        );
        self.navigate(&text, Some(url))
    }

    /// Load markup directly. Relative stylesheet links resolve against
    /// `base` when given.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] if the markup yields no tree.
    pub fn load_html(&mut self, html: &str, base: Option<&str>) -> Result<&Page, LoadError> {
        clear_warnings();
        self.navigate(html, base)
    }

    fn navigate(&mut self, html: &str, url: Option<&str>) -> Result<&Page, LoadError> {
        let started = Instant::now();
        let mut tree = joey_html::parse(html)?;
        log::debug!("parsed document in {:?}", started.elapsed());

        let sheets = load_stylesheets(&tree, url, &self.source);
        log::debug!("{} document stylesheets", sheets.len());
        let rules = cascade_order(std::iter::once(ua_stylesheet()).chain(&sheets));

        let started = Instant::now();
        apply_styles(&mut tree, &rules);
        log::debug!("styled document in {:?}", started.elapsed());

        let (layout, display_list) = self.render(&tree)?;
        self.viewport.scroll = 0.0;
        let page: &Page = self.page.insert(Page {
            url: url.map(str::to_string),
            tree,
            rules,
            layout,
            display_list,
        });
        Ok(page)
    }

    fn render(&self, tree: &DomTree) -> Result<(DocumentLayout, DisplayList), ParseError> {
        let started = Instant::now();
        let layout =
            DocumentLayout::layout(tree, self.viewport.width, &self.layout_config, &self.fonts)
                .ok_or(ParseError::EmptyDocument)?;
        let display_list = Painter::new(tree).paint(&layout);
        log::debug!(
            "laid out {} commands in {:?}",
            display_list.len(),
            started.elapsed()
        );
        Ok((layout, display_list))
    }

    /// Change the viewport size. The page is laid out again only when the
    /// width changes; returns whether it was.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.viewport.height = height;
        let width_changed = (width - self.viewport.width).abs() > f32::EPSILON;
        self.viewport.width = width;

        let rendered = if width_changed {
            self.page
                .as_ref()
                .and_then(|page| self.render(&page.tree).ok())
        } else {
            None
        };
        let relaid = rendered.is_some();
        if let (Some((layout, display_list)), Some(page)) = (rendered, self.page.as_mut()) {
            page.layout = layout;
            page.display_list = display_list;
        }

        let document_height = self.document_height();
        let _ = self.viewport.scroll_by(0.0, document_height);
        relaid
    }

    /// Scroll by `delta` pixels, clamped to the document. Returns the new
    /// offset.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        let document_height = self.document_height();
        self.viewport.scroll_by(delta, document_height)
    }

    /// Scroll down one step.
    pub fn scroll_down(&mut self) -> f32 {
        self.scroll_by(self.scroll_step)
    }

    /// Scroll up one step.
    pub fn scroll_up(&mut self) -> f32 {
        self.scroll_by(-self.scroll_step)
    }

    /// Commands that intersect the viewport, in painting order.
    pub fn visible_commands(&self) -> impl Iterator<Item = &DisplayCommand> {
        let viewport = self.viewport;
        self.page
            .iter()
            .flat_map(|page| page.display_list.iter())
            .filter(move |command| viewport.is_visible(command))
    }

    /// The loaded page, if any.
    #[must_use]
    pub const fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Height of the loaded document, or zero.
    #[must_use]
    pub fn document_height(&self) -> f32 {
        self.page.as_ref().map_or(0.0, Page::height)
    }

    /// The memoizing metrics wrapper.
    #[must_use]
    pub const fn fonts(&self) -> &FontCache<M> {
        &self.fonts
    }
}
