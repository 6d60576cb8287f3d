use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use docmark::{Catalog, Config, Error, MenuEntry};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "docmark.toml";

#[derive(Parser)]
#[command(name = "docmark")]
#[command(about = "Parse lightweight Markdown and render it to PDF, Typst or JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file
    Render {
        /// Input Markdown file
        input: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the pages and sections of a page catalog
    Pages {
        /// Page catalog (JSON array of pages)
        catalog: PathBuf,

        /// Path of the page currently shown
        #[arg(long, default_value = "/")]
        current: String,

        /// Anchor of the section currently shown
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Render the file behind a catalog page
    Open {
        /// Page catalog (JSON array of pages)
        catalog: PathBuf,

        /// Page path to open
        path: String,

        /// Section anchor to open at
        #[arg(long)]
        anchor: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (defaults to input name with the format's extension, `-` for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// Config file (defaults to ./docmark.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Pdf,
    Typst,
    Json,
    Markdown,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Typst => "typ",
            Format::Json => "json",
            // Never the input's own extension
            Format::Markdown => "out.md",
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    match cli.command {
        Command::Render { input, output } => {
            if let Some(written) = render_file(&input, &output)? {
                println!("Created {}", written.display());
            }
            Ok(())
        }
        Command::Pages {
            catalog,
            current,
            anchor,
        } => {
            let catalog = Catalog::load(&catalog)?;
            print_pages(&catalog, &current, anchor.as_deref());
            Ok(())
        }
        Command::Open {
            catalog: catalog_path,
            path,
            anchor,
            output,
        } => {
            let catalog = Catalog::load(&catalog_path)?;
            let selection = catalog.select(&path, anchor.as_deref())?;
            let file = catalog
                .resolve_file(&selection.path)
                .ok_or_else(|| Error::UnknownPage(selection.path.clone()))?;
            debug!(?selection, file, "opening page");

            // Page files are relative to the catalog
            let base = catalog_path.parent().unwrap_or(Path::new(""));
            match render_file(&base.join(file), &output)? {
                Some(written) => {
                    println!("Created {}", written.display());
                    println!("Selected {selection}");
                }
                // stdout carries the document
                None => eprintln!("Selected {selection}"),
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, Error> {
    match path {
        Some(path) => Config::load(path),
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

fn render(markdown: &str, format: Format, config: &Config) -> Result<Vec<u8>, Error> {
    Ok(match format {
        Format::Pdf => docmark::markdown_to_pdf_with_config(markdown, config)?,
        Format::Typst => docmark::markdown_to_typst_with_config(markdown, config).into_bytes(),
        Format::Json => docmark::markdown_to_json(markdown)?.into_bytes(),
        Format::Markdown => docmark::blocks_to_markdown(&docmark::parse(markdown)).into_bytes(),
    })
}

/// Render `input`, returning the written path, or `None` when written to stdout.
fn render_file(input: &Path, args: &OutputArgs) -> Result<Option<PathBuf>, Error> {
    let markdown = fs::read_to_string(input).map_err(|source| Error::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let config = load_config(args.config.as_deref())?;
    debug!(?config, "using config");

    let bytes = render(&markdown, args.format, &config)?;

    match &args.output {
        Some(path) if path.as_os_str() == "-" => {
            io::stdout()
                .write_all(&bytes)
                .map_err(|source| Error::Io {
                    path: path.clone(),
                    source,
                })?;
            Ok(None)
        }
        output => {
            let output = output
                .clone()
                .unwrap_or_else(|| input.with_extension(args.format.extension()));

            fs::write(&output, bytes).map_err(|source| Error::Io {
                path: output.clone(),
                source,
            })?;

            Ok(Some(output))
        }
    }
}

fn print_pages(catalog: &Catalog, current: &str, anchor: Option<&str>) {
    if catalog.is_empty() {
        println!("No pages");
        return;
    }

    println!("{}", catalog.display_text(current, anchor));
    for entry in catalog.entries(current, anchor) {
        let marker = if entry.is_current() { '*' } else { ' ' };
        match entry {
            MenuEntry::Page { page, .. } => println!("{marker} {}  {}", page.path, page.title),
            MenuEntry::Section { section, .. } => {
                println!("{marker}     {}  {}", section.anchor, section.title)
            }
        }
    }
}
