//! Plot Designer CLI
//!
//! Usage:
//!   plot-designer [OPTIONS] <COMMAND>
//!
//! Commands:
//!   resolve    Solve a design with the built-in resolver
//!   sync       Solve a design through the layout service
//!   describe   Print constraints and constants in readable form
//!   constrain  Add a constraint written as text
//!   export     Convert a JSON design to a base64 blob
//!   import     Convert a base64 blob to a JSON design
//!
//! Designs are read from FILE or stdin, as JSON or as a base64 blob.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use plot_designer::sync::transfer::{encode, read_design};
use plot_designer::{
    parse_constraint, Action, DesignError, DesignerConfig, LayoutPayload, Session,
};

#[derive(Parser)]
#[command(name = "plot-designer")]
#[command(about = "Constraint-based layout of plot elements")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a design with the built-in resolver and print the result
    Resolve {
        /// Design file (reads from stdin if not provided)
        input: Option<PathBuf>,
        /// Add an element of this kind, or `constant`
        #[arg(long, conflicts_with = "delete")]
        add: Option<String>,
        /// Delete the element with this id
        #[arg(long)]
        delete: Option<String>,
    },
    /// Solve a design through the layout service and print the result
    Sync {
        input: Option<PathBuf>,
        /// Resolver endpoint, overriding the configuration
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print constraint and constant descriptions
    Describe { input: Option<PathBuf> },
    /// Add a constraint such as `axis-1.x = spacing + axis-0.right`
    Constrain {
        expr: String,
        input: Option<PathBuf>,
    },
    /// Print a design as a base64 blob
    Export { input: Option<PathBuf> },
    /// Print a base64 blob as a JSON design
    Import { input: Option<PathBuf> },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => match DesignerConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => DesignerConfig::default(),
    };

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(command: Command, config: &DesignerConfig) -> Result<(), DesignError> {
    match command {
        Command::Resolve { input, add, delete } => {
            let action = match (add, delete) {
                (Some(kind), _) => Action::add(kind),
                (None, Some(id)) => Action::delete(id),
                (None, None) => Action::Resync,
            };
            let response = plot_designer::resolve(&read_input(input.as_deref()), action)?;
            print_json(&response);
        }
        Command::Sync { input, endpoint } => {
            let mut payload = read_design(&read_input(input.as_deref()))?;
            config.apply_canvas(&mut payload);
            let resolver = match endpoint {
                Some(endpoint) => config.clone().with_endpoint(endpoint).http_resolver(),
                None => config.http_resolver(),
            };
            let mut session = Session::from_payload(payload);
            if let Some(cache) = config.cache() {
                session = session.with_cache(cache);
            }
            block_on(session.submit(&resolver, Action::Resync))?;
            print_json(&session.build_payload());
        }
        Command::Describe { input } => {
            let session = Session::from_payload(read_design(&read_input(input.as_deref()))?);
            for line in session.constraint_descriptions() {
                println!("{}", line);
            }
            for line in session.constant_descriptions() {
                println!("{}", line);
            }
        }
        Command::Constrain { expr, input } => {
            if let Err(errors) = parse_constraint(&expr) {
                for error in &errors {
                    eprint!("{}", error.format(&expr, "constraint"));
                }
                return Err(DesignError::Parse(errors));
            }
            let payload = plot_designer::constrain(&read_input(input.as_deref()), &expr)?;
            print_json(&payload);
        }
        Command::Export { input } => {
            let payload = read_design(&read_input(input.as_deref()))?;
            println!("{}", encode(&payload)?);
        }
        Command::Import { input } => {
            let payload: LayoutPayload = read_design(&read_input(input.as_deref()))?;
            print_json(&payload);
        }
    }
    Ok(())
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime.block_on(future),
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            process::exit(1);
        }
    }
}

fn read_input(path: Option<&Path>) -> String {
    match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    process::exit(1);
                }
            }
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error writing JSON: {}", e);
            process::exit(1);
        }
    }
}
