//! Joey CLI - headless front end for the Joey renderer
//!
//! Loads a document, runs style, layout, and paint, and prints what a window
//! of the configured size would show.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use owo_colors::OwoColorize;

use joey_browser::{Browser, BrowserConfig, FontdueFontMetrics, Page};
use joey_common::net::NetworkSource;
use joey_common::warning::warning_count;
use joey_css::{ApproximateFontMetrics, DisplayCommand, FontKey, FontMetrics, LineMetrics, Rule};
use joey_html::format_tree;

/// Joey - render HTML to a display list and inspect every stage on the way
#[derive(Parser, Debug)]
#[command(name = "joey")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the commands visible in an 800x600 window
    joey ./index.html

    # Fetch over HTTP and dump the layout tree
    joey --layout https://example.com

    # Parse inline HTML and show everything
    joey --tree --rules --layout --display-list --html '<h1>Test</h1>'

    # Scroll down 300px in a narrow window
    joey --width 400 --scroll 300 ./index.html

    # Machine-readable display list
    joey --json ./index.html
"#)]
struct Cli {
    /// Path or URL of the document to load
    #[arg(value_name = "FILE|URL")]
    input: Option<String>,

    /// Parse HTML string directly instead of a file or URL
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// JSON config file; command-line flags override its values
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Font file used to measure text
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<f32>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<f32>,

    /// Scroll offset applied before culling
    #[arg(long, default_value = "0")]
    scroll: f32,

    /// Print the document tree
    #[arg(long)]
    tree: bool,

    /// Print every rule in cascade order
    #[arg(long)]
    rules: bool,

    /// Print the layout tree with geometry
    #[arg(long)]
    layout: bool,

    /// Print the whole display list, not just the visible part
    #[arg(long)]
    display_list: bool,

    /// Print the whole display list as JSON and nothing else
    #[arg(long)]
    json: bool,

    /// Log pipeline timings
    #[arg(short, long)]
    verbose: bool,
}

/// Text measurement chosen at startup.
enum Metrics {
    Fontdue(FontdueFontMetrics),
    Approximate(ApproximateFontMetrics),
}

impl FontMetrics for Metrics {
    fn measure(&self, text: &str, font: &FontKey) -> f32 {
        match self {
            Self::Fontdue(metrics) => metrics.measure(text, font),
            Self::Approximate(metrics) => metrics.measure(text, font),
        }
    }

    fn line_metrics(&self, font: &FontKey) -> LineMetrics {
        match self {
            Self::Fontdue(metrics) => metrics.line_metrics(font),
            Self::Approximate(metrics) => metrics.line_metrics(font),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = load_config(&cli)?;
    let metrics = load_metrics(&config)?;
    let source = NetworkSource::new()?;
    let mut browser = Browser::new(source, metrics, &config);

    if let Some(ref html) = cli.html {
        let _ = browser.load_html(html, None)?;
    } else if let Some(ref input) = cli.input {
        let _ = browser
            .load(input)
            .with_context(|| format!("failed to load '{input}'"))?;
    } else {
        bail!("nothing to render: pass a file, a URL, or --html");
    }
    let _ = browser.scroll_by(cli.scroll);

    let Some(page) = browser.page() else {
        bail!("no page loaded");
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&page.display_list)?);
        return Ok(());
    }

    print_summary(page);

    if cli.tree
        && let Some(root) = page.tree.root()
    {
        print_header("Document Tree");
        print!("{}", format_tree(&page.tree, root));
    }

    if cli.rules {
        print_header(&format!("Rules ({})", page.rules.len()));
        for rule in &page.rules {
            println!("  {}", format_rule(rule));
        }
    }

    if cli.layout {
        print_header("Layout Tree");
        print!("{}", page.layout.format(&page.tree));
    }

    if cli.display_list {
        print_header(&format!("Display List ({})", page.display_list.len()));
        for command in &page.display_list {
            println!("  {}", format_command(command));
        }
    }

    let viewport = browser.viewport();
    print_header(&format!(
        "Visible ({}x{} at scroll {})",
        viewport.width, viewport.height, viewport.scroll
    ));
    for command in browser.visible_commands() {
        println!("  {}", format_command(command));
    }

    let warnings = warning_count();
    if warnings > 0 {
        println!(
            "\n{}",
            format!("{warnings} unsupported feature(s) skipped; run with -v for details").yellow()
        );
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<BrowserConfig> {
    let mut config = match cli.config {
        Some(ref path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            BrowserConfig::from_json(&text)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => BrowserConfig::default(),
    };

    if let Some(width) = cli.width {
        config.viewport_width = width;
    }
    if let Some(height) = cli.height {
        config.viewport_height = height;
    }
    if let Some(ref font) = cli.font {
        config.font_path = Some(font.clone());
    }
    Ok(config)
}

/// An explicit font must load; otherwise try system fonts and fall back to
/// fixed-ratio estimates.
fn load_metrics(config: &BrowserConfig) -> Result<Metrics> {
    if let Some(ref path) = config.font_path {
        let metrics = FontdueFontMetrics::from_path(path)?;
        return Ok(Metrics::Fontdue(metrics));
    }
    Ok(FontdueFontMetrics::system().map_or_else(
        || {
            log::warn!("no system font found; using approximate text metrics");
            Metrics::Approximate(ApproximateFontMetrics)
        },
        Metrics::Fontdue,
    ))
}

fn print_header(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
}

fn print_summary(page: &Page) {
    print_header("Page");
    println!("  url:      {}", page.url.as_deref().unwrap_or("(inline)"));
    if let Some(title) = page.title() {
        println!("  title:    {title}");
    }
    println!("  rules:    {}", page.rules.len());
    println!("  height:   {:.1}", page.height());
    println!("  commands: {}", page.display_list.len());
}

fn format_rule(rule: &Rule) -> String {
    let declarations: Vec<String> = rule
        .declarations
        .iter()
        .map(|declaration| format!("{}: {};", declaration.name, declaration.value))
        .collect();
    format!(
        "{} {{ {} }} {}",
        rule.selector,
        declarations.join(" "),
        format!("/* priority {} */", rule.priority()).dimmed()
    )
}

fn format_command(command: &DisplayCommand) -> String {
    match command {
        DisplayCommand::Rect {
            top,
            left,
            bottom,
            right,
            color,
        } => format!(
            "{} ({left:.1}, {top:.1})-({right:.1}, {bottom:.1}) {color}",
            "rect".cyan()
        ),
        DisplayCommand::Text {
            top,
            left,
            bottom,
            text,
            font,
            color,
        } => format!(
            "{} ({left:.1}, {top:.1})-{bottom:.1} {} [{} {}pt {} {}] {color}",
            "text".green(),
            format!("{text:?}").bold(),
            font.family,
            font.size,
            font.weight,
            font.slant
        ),
    }
}
