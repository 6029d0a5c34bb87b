//! MarkTree CLI - Parse text into a node forest with a bundled grammar
//!
//! Usage:
//!   marktree [OPTIONS] [FILE]
//!
//! Reads standard input when no file (or `-`) is given.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser as ClapParser, ValueEnum};
use marktree_core::code::{code_rules, CodeRules};
use marktree_core::markdown::{markdown_rules_with_classes, simple_markdown_rules};
use marktree_core::node::{forest_text, Node};
use marktree_core::{Parser, RuleError, RuleSet, Style};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Debug, ClapParser)]
#[command(name = "marktree", version, about = "Parse markdown-like text into a node tree")]
struct Cli {
    /// Input file; standard input when omitted or `-`
    file: Option<PathBuf>,

    /// Grammar used to parse the input
    #[arg(short, long, value_enum, default_value_t = Grammar::Markdown)]
    grammar: Grammar,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Print only the concatenated text of the forest
    #[arg(long, conflicts_with = "format")]
    plain: bool,

    /// Simple grammar: leave text between markup to the parser's fallback
    #[arg(long)]
    no_text_rule: bool,

    /// Log every rule tried at every position (needs -vvv to show)
    #[arg(long)]
    trace_rules: bool,

    /// More output per occurrence: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Grammar {
    /// Inline formatting only
    Simple,
    /// Headers, lists and inline formatting
    Markdown,
    /// Inline formatting with code blocks and highlighting
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tree,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read standard input: {0}")]
    Stdin(#[source] io::Error),
    #[error("failed to build grammar: {0}")]
    Grammar(#[from] RuleError),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = read_input(cli.file.as_ref())?;
    let rules = build_grammar(cli.grammar, !cli.no_text_rule)?;
    info!(grammar = ?cli.grammar, rules = rules.len(), "grammar ready");

    let parser = Parser::with_rules(rules).with_debugging(cli.trace_rules);
    let forest = parser.parse(&input, ());
    debug!(roots = forest.len(), "parsed input");

    let output = if cli.plain {
        forest_text(&forest)
    } else {
        match cli.format {
            OutputFormat::Json => serde_json::to_string_pretty(&forest)?,
            OutputFormat::Tree => render_tree(&forest),
        }
    };
    println!("{}", output);
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String, CliError> {
    match file {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })
        }
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(CliError::Stdin)?;
            Ok(input)
        }
    }
}

fn build_grammar(grammar: Grammar, text_rule: bool) -> Result<RuleSet<()>, RuleError> {
    match grammar {
        Grammar::Simple => simple_markdown_rules(text_rule),
        Grammar::Markdown => markdown_rules_with_classes(resolve_class),
        Grammar::Code => code_rules(&CodeRules::with_default_languages()?),
    }
}

/// Styles for `Title {class ...}` header lines; other names pass through as
/// named classes, empty ones are dropped.
fn resolve_class(name: &str) -> Option<Style> {
    match name {
        "" => None,
        "bold" => Some(Style::Bold),
        "italic" => Some(Style::Italic),
        "underline" => Some(Style::Underline),
        "strike" => Some(Style::Strikethrough),
        other => Some(Style::Class(other.to_string())),
    }
}

// =============================================================================
// Tree Output
// =============================================================================

fn render_tree(forest: &[Node]) -> String {
    let mut lines = vec![format!("Nodes: {}", forest.len())];
    for (i, node) in forest.iter().enumerate() {
        lines.push(format!("[{}] {}", i + 1, describe_node(node)));
        render_children(&mut lines, node.children(), 1);
    }
    lines.join("\n")
}

fn render_children(lines: &mut Vec<String>, children: &[Node], indent: usize) {
    let prefix = "  ".repeat(indent);
    for node in children {
        lines.push(format!("{}{}", prefix, describe_node(node)));
        render_children(lines, node.children(), indent + 1);
    }
}

fn describe_node(node: &Node) -> String {
    match node {
        Node::Text(text) => format!("Text {}", preview(&text.content)),
        Node::Style(styled) => format!("Style {}", describe_styles(&styled.styles)),
        Node::ListItem(_) => "ListItem".to_string(),
        Node::Code(code) => format!(
            "Code (lang: {}) {}",
            code.language.as_deref().unwrap_or("none"),
            preview(&code.body)
        ),
    }
}

fn describe_styles(styles: &[Style]) -> String {
    let names: Vec<String> = styles
        .iter()
        .map(|style| match style {
            Style::Heading(level) => format!("heading({})", level),
            Style::Class(name) => format!("class({})", name),
            other => format!("{:?}", other).to_lowercase(),
        })
        .collect();
    format!("[{}]", names.join(", "))
}

fn preview(content: &str) -> String {
    let shown: String = content.chars().take(60).collect();
    let ellipsis = if content.chars().count() > 60 { "..." } else { "" };
    format!("\"{}{}\"", shown.replace('\n', "\\n"), ellipsis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_args_defaults_and_values() {
        let cli = Cli::try_parse_from(["marktree"]).unwrap();
        assert_eq!(cli.grammar, Grammar::Markdown);
        assert_eq!(cli.format, OutputFormat::Tree);
        assert!(cli.file.is_none());

        let cli =
            Cli::try_parse_from(["marktree", "-g", "code", "-f", "json", "-vv", "doc.md"]).unwrap();
        assert_eq!(cli.grammar, Grammar::Code);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.file, Some(PathBuf::from("doc.md")));

        assert!(Cli::try_parse_from(["marktree", "-g", "html"]).is_err());
    }

    #[test]
    fn test_every_grammar_builds() {
        for grammar in [Grammar::Simple, Grammar::Markdown, Grammar::Code] {
            assert!(!build_grammar(grammar, true).unwrap().is_empty());
        }
    }

    #[test]
    fn test_render_tree() {
        let rules = build_grammar(Grammar::Markdown, true).unwrap();
        let forest = Parser::with_rules(rules).parse("# Title\n* **item**", ());
        let tree = render_tree(&forest);
        assert_eq!(
            tree,
            "Nodes: 3\n\
             [1] Style [heading(1)]\n  \
             Text \"Title\"\n\
             [2] Text \"\\n\"\n\
             [3] ListItem\n  \
             Style [bold]\n    \
             Text \"item\""
        );
    }

    #[test]
    fn test_classed_header_uses_cli_classes() {
        let rules = build_grammar(Grammar::Markdown, true).unwrap();
        let forest = Parser::with_rules(rules).parse("Title {strike  wide}\n===", ());
        match &forest[..] {
            [Node::Style(class)] => assert_eq!(
                class.styles,
                vec![Style::Strikethrough, Style::Class("wide".to_string())]
            ),
            other => panic!("Expected one style node, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_reported() {
        let error = read_input(Some(&PathBuf::from("does/not/exist.md"))).unwrap_err();
        assert!(error.to_string().starts_with("failed to read 'does/not/exist.md'"));
    }

    #[test]
    fn test_preview_truncates_and_escapes() {
        assert_eq!(preview("a\nb"), "\"a\\nb\"");
        let long = "x".repeat(70);
        assert_eq!(preview(&long), format!("\"{}...\"", "x".repeat(60)));
    }
}
