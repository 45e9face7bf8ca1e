//! Print the OpenAPI document as JSON for client generators.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::path::PathBuf;

use backend::doc::ApiDoc;
use clap::Parser;
use color_eyre::eyre::Context;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "openapi-dump",
    about = "Write the REST API OpenAPI document as JSON",
    version
)]
struct CliArgs {
    /// Destination file. Prints to stdout when omitted.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
    /// Emit single-line JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();

    let doc = ApiDoc::openapi();
    let json = if args.compact {
        doc.to_json()?
    } else {
        doc.to_pretty_json()?
    };

    match args.output {
        Some(path) => fs::write(&path, json)
            .wrap_err_with(|| format!("write OpenAPI document to '{}'", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
