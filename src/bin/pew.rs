//! Pew CLI - Dump source files or directories into a Markdown file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::{generate, Shell};
use pew::builder::{dump_files, Dump, Pew};
use pew::errors::{exit_code, PewError};
use pew::filter::Classifier;
use pew::output::{write_document, write_to, OutputError};
use pew::tokens::{count_tokens, Encoding};
use pew::tree::{format_number, RenderOptions};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "pew")]
#[command(about = "Dump source code files or directories into a Markdown file")]
#[command(version)]
struct Cli {
    /// Files to dump (mutually exclusive with --dir)
    #[arg(conflicts_with = "dir")]
    files: Vec<PathBuf>,

    /// Directory to dump
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Output Markdown file ("-" for stdout)
    #[arg(short, long, default_value = "source.md")]
    output: PathBuf,

    /// Disable default ignore patterns for directories like .git, node_modules, etc.
    #[arg(long)]
    no_default_ignores: bool,

    /// Extra ignore pattern, applied after .pewc (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Print the files that would be included instead of writing Markdown
    #[arg(long, requires = "dir", conflicts_with = "tree")]
    list: bool,

    /// Print the directory tree instead of writing Markdown
    #[arg(long, requires = "dir")]
    tree: bool,

    /// Print --list/--tree results and errors as JSON
    #[arg(long)]
    json: bool,

    /// Token encoding for the size estimate
    #[arg(long, default_value = "cl100k")]
    encoding: EncodingArg,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Clone, ValueEnum)]
enum EncodingArg {
    Cl100k,
    O200k,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Cl100k => Encoding::Cl100kBase,
            EncodingArg::O200k => Encoding::O200kBase,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init()
        .ok();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "pew", &mut io::stdout());
        return;
    }

    let json_output = cli.json;

    if let Err(e) = run(cli) {
        if json_output {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }

            let payload = ErrorOutput {
                error: e.to_string(),
            };

            let json = serde_json::to_string(&payload)
                .unwrap_or_else(|_| "{\"error\":\"serialization failed\"}".to_string());
            eprintln!("{json}");
        } else {
            eprintln!("error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> Result<(), PewError> {
    let encoding: Encoding = cli.encoding.into();

    let Some(dir) = cli.dir else {
        let document = dump_files(&cli.files, &Classifier::default())?;
        return emit(&cli.output, &document.markdown, encoding);
    };

    let dump = cli
        .ignore
        .into_iter()
        .fold(Pew::new(dir), |builder, pattern| builder.ignore(pattern))
        .default_ignores(!cli.no_default_ignores)
        .build()?;

    if cli.list {
        return run_list(&dump, cli.json);
    }
    if cli.tree {
        return run_tree(&dump, cli.json);
    }

    emit(&cli.output, &dump.markdown(), encoding)
}

// --- Document output ---

fn emit(output: &Path, markdown: &str, encoding: Encoding) -> Result<(), PewError> {
    if output == Path::new("-") {
        write_to(io::stdout().lock(), markdown)?;
        return Ok(());
    }

    write_document(output, markdown)?;
    let tokens = count_tokens(markdown, encoding);
    println!(
        "Successfully wrote Markdown to {} (~{} tokens, {})",
        output.display(),
        format_number(tokens),
        encoding
    );
    Ok(())
}

// --- List mode ---

fn run_list(dump: &Dump, json: bool) -> Result<(), PewError> {
    if json {
        println!("{}", dump.manifest().to_json()?);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    for path in dump.output.relative_files() {
        writeln!(out, "{}", path.display()).map_err(write_error)?;
    }
    for skip in &dump.output.skipped {
        log::info!("skipped {}: {}", skip.path.display(), skip.reason);
    }
    out.flush().map_err(write_error)?;
    Ok(())
}

// --- Tree mode ---

fn run_tree(dump: &Dump, json: bool) -> Result<(), PewError> {
    if json {
        let manifest = dump.manifest();
        let json = serde_json::to_string_pretty(&manifest.tree).map_err(OutputError::from)?;
        println!("{json}");
    } else {
        print!("{}", dump.tree_text(&RenderOptions::with_metadata()));
    }
    Ok(())
}

fn write_error(source: io::Error) -> PewError {
    PewError::Output(OutputError::Write {
        path: PathBuf::from("-"),
        source,
    })
}
