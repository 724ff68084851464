use std::path::PathBuf;

use clap::{Parser, Subcommand};
use wm_core::{Viewport, parser::parse_map_with_skips};
use wm_render::{RevealPlan, render_svg};

#[derive(Parser)]
#[command(name = "wardley", about = "Render Wardley map notation to SVG")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a map file and write it as an SVG image
    Generate {
        /// Map notation file
        input: PathBuf,

        /// Output file
        #[arg(long, short = 'o', default_value = "wardley-map.svg")]
        output: PathBuf,

        /// Canvas width in pixels
        #[arg(long, short = 'w', default_value_t = 1400.0)]
        width: f64,

        /// Canvas height in pixels
        #[arg(long, short = 'H', default_value_t = 1000.0)]
        height: f64,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("canvas must be larger than its margins, got {width}x{height}")]
    Canvas { width: f64, height: f64 },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Generate {
            input,
            output,
            width,
            height,
        } => {
            let viewport = viewport(width, height)?;
            let text = std::fs::read_to_string(&input).map_err(|source| CliError::Read {
                path: input.clone(),
                source,
            })?;
            let svg = generate(&text, viewport);
            std::fs::write(&output, svg).map_err(|source| CliError::Write {
                path: output.clone(),
                source,
            })?;
            println!("Wrote {}", output.display());
            Ok(())
        }
    }
}

fn viewport(width: f64, height: f64) -> Result<Viewport, CliError> {
    Viewport::try_new(width, height).ok_or(CliError::Canvas { width, height })
}

/// Render `text` in full, warning about every line the parser ignored.
fn generate(text: &str, viewport: Viewport) -> String {
    let (map, skipped) = parse_map_with_skips(text);
    for line in &skipped {
        log::warn!("line {} ignored ({:?}): {}", line.line, line.reason, line.text);
    }
    log::info!(
        "{} components, {} connections, {} notes",
        map.components.len(),
        map.connections.len(),
        map.notes.len()
    );
    render_svg(&map, &viewport, &RevealPlan::Full)
}
