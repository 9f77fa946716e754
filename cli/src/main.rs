//! rapper-rdf CLI: parse RDF documents into quads
//!
//! Reads a local file, standard input or an HTTP(S) URL and prints the parsed
//! quads as N-Quads, plain values, JSON or a table.

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use rapper_rdf::{Backend, Format, Parser, ParserConfig, Quad, Quads, RapperCommand};
use reqwest::header::ACCEPT;
use std::path::{Path, PathBuf};

const RDF_ACCEPT: &str = "text/turtle, application/n-triples, application/n-quads, \
                          application/trig, application/rdf+xml;q=0.9, */*;q=0.1";

#[derive(ClapParser)]
#[command(name = "rapper-rdf", version, about = "Parse RDF documents into quads")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "RAPPER_RDF_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Nquads,
    Values,
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Rapper,
    Native,
    Auto,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Rapper => Backend::Rapper,
            BackendArg::Native => Backend::Native,
            BackendArg::Auto => Backend::Auto,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a document and print its quads
    Parse {
        /// File path, `-` for standard input, or an http(s) URL
        #[arg(default_value = "-")]
        input: String,

        /// Input format; guessed from the file extension when omitted
        #[arg(long, short = 'f')]
        format: Option<String>,

        /// Base URI for relative IRIs
        #[arg(long, short = 'b')]
        base: Option<String>,

        /// Parsing backend
        #[arg(long)]
        backend: Option<BackendArg>,

        /// Directory for temporary input files
        #[arg(long)]
        tmp_dir: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'o', default_value = "nquads")]
        output: OutputFormat,
    },
    /// List accepted input formats
    Formats,
    /// Check whether the rapper executable can be run
    Check,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Parse {
            input,
            format,
            base,
            backend,
            tmp_dir,
            output,
        } => {
            let config = override_config(config, &input, format, base, backend, tmp_dir)?;
            run_parse(&config, &input, output)
        }
        Commands::Formats => run_formats(),
        Commands::Check => run_check(&config),
    });

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
    let config = match path {
        Some(path) => ParserConfig::from_yaml_file(path)?,
        None => ParserConfig::default(),
    };
    Ok(config.apply_env()?)
}

fn override_config(
    mut config: ParserConfig,
    input: &str,
    format: Option<String>,
    base: Option<String>,
    backend: Option<BackendArg>,
    tmp_dir: Option<PathBuf>,
) -> Result<ParserConfig> {
    if let Some(format) = format {
        config.format = format.parse()?;
    } else if !is_url(input) && input != "-" {
        if let Some(guessed) = Format::guess_from_path(input) {
            config.format = guessed;
        }
    }
    if base.is_some() {
        config.base_uri = base;
    }
    if let Some(backend) = backend {
        config.backend = backend.into();
    }
    if tmp_dir.is_some() {
        config.temp_dir = tmp_dir;
    }
    Ok(config)
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn open_quads(parser: &Parser, input: &str) -> Result<Quads> {
    if input == "-" {
        return Ok(parser.parse_stream(std::io::stdin())?);
    }

    if is_url(input) {
        let response = reqwest::blocking::Client::new()
            .get(input)
            .header(ACCEPT, RDF_ACCEPT)
            .send()
            .with_context(|| format!("failed to fetch {}", input))?
            .error_for_status()?;
        return Ok(parser.parse_response(response)?);
    }

    Ok(parser.parse(Path::new(input))?)
}

fn run_parse(config: &ParserConfig, input: &str, output: OutputFormat) -> Result<()> {
    let parser = Parser::from_config(config)?;
    let quads = open_quads(&parser, input)?;

    match output {
        OutputFormat::Nquads => {
            for quad in quads {
                println!("{}", quad?);
            }
        }
        OutputFormat::Values => {
            for quad in quads {
                println!("{}", quad?.value_string());
            }
        }
        OutputFormat::Json => {
            let quads = quads.collect_quads()?;
            let rows: Vec<serde_json::Value> = quads.iter().map(quad_to_json).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            let quads = quads.collect_quads()?;
            if quads.is_empty() {
                println!("(no quads)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Subject", "Predicate", "Object", "Graph"]);
            for quad in &quads {
                table.add_row(vec![
                    quad.subject.to_string(),
                    quad.predicate.to_string(),
                    quad.object.to_string(),
                    quad.graph.as_ref().map(|g| g.to_string()).unwrap_or_default(),
                ]);
            }

            println!("{}", table);
            println!("{} quad(s)", quads.len());
        }
    }

    Ok(())
}

fn quad_to_json(quad: &Quad) -> serde_json::Value {
    serde_json::json!({
        "subject": quad.subject.to_string(),
        "predicate": quad.predicate.to_string(),
        "object": quad.object.to_string(),
        "graph": quad.graph.as_ref().map(|g| g.to_string()),
    })
}

fn run_formats() -> Result<()> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Format", "rapper -i", "Native parser"]);

    for format in Format::ALL {
        let native = format
            .native_syntax()
            .map(|syntax| format!("{:?}", syntax))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            format.as_str().to_string(),
            format.rapper_syntax().to_string(),
            native,
        ]);
    }

    println!("{}", table);
    Ok(())
}

fn run_check(config: &ParserConfig) -> Result<()> {
    let command = RapperCommand::new(&config.rapper_bin);
    let version = command
        .version()
        .with_context(|| format!("{} is not usable", command.program().display()))?;

    println!("rapper:  {}", command.program().display());
    println!("version: {}", version);
    Ok(())
}
