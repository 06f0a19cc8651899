//! The tmst command-line interface.
//!
//! Thin plumbing over the library: read a template, run the compiler, render
//! diagnostics through miette. No document parsing happens here.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Parser, Subcommand};
use miette::Report;

use crate::compiler;

#[derive(Parser)]
#[command(
    name = "tmst",
    version,
    about = "Template pattern compiler for HTML-like documents"
)]
pub struct TmstArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate a template file (`-` reads stdin).
    Check { file: PathBuf },
    /// Print the compiled matcher tree as JSON (`-` reads stdin).
    Inspect {
        file: PathBuf,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

/// The main entry point for the CLI.
pub fn run() {
    let args = TmstArgs::parse();

    let result = match args.command {
        Command::Check { file } => handle_check(&file),
        Command::Inspect { file, pretty } => handle_inspect(&file, pretty),
    };

    if let Err(report) = result {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

fn read_template(path: &Path) -> Result<String, Report> {
    if path.as_os_str() == "-" {
        let mut template = String::new();
        std::io::stdin()
            .read_to_string(&mut template)
            .map_err(|e| Report::msg(format!("cannot read stdin: {e}")))?;
        return Ok(template);
    }
    fs::read_to_string(path)
        .map_err(|e| Report::msg(format!("cannot read {}: {e}", path.display())))
}

fn handle_check(path: &Path) -> Result<(), Report> {
    let template = read_template(path)?;
    let root = compiler::compile(&template).map_err(Report::new)?;
    println!("template ok: {} pattern(s)", root.children.len());
    Ok(())
}

fn handle_inspect(path: &Path, pretty: bool) -> Result<(), Report> {
    let template = read_template(path)?;
    let root = compiler::compile(&template).map_err(Report::new)?;
    let json = if pretty {
        serde_json::to_string_pretty(&root)
    } else {
        serde_json::to_string(&root)
    }
    .map_err(|e| Report::msg(e.to_string()))?;
    println!("{json}");
    Ok(())
}
