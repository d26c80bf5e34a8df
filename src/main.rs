use std::path::PathBuf;

use clap::Parser;
use mindmd::{AnchorMode, Options};

#[derive(Parser)]
#[command(
    name = "mindmd",
    about = "Rebuild a Markdown heading outline from an exported mind-map page"
)]
struct Cli {
    /// Exported mind-map HTML or SVG file
    input: PathBuf,

    /// Markdown file to write
    output: PathBuf,

    /// Node points that connector endpoints are matched against
    #[arg(long, value_enum, default_value_t = AnchorMode::Origin)]
    anchor: AnchorMode,

    /// Maximum number of `#` markers per heading
    #[arg(long, value_name = "N")]
    max_level: Option<usize>,

    /// Do not print the conversion report
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        anchor: cli.anchor,
        max_level: cli.max_level,
    };

    match mindmd::convert_file(&cli.input, &cli.output, &options) {
        Ok(report) => {
            if !cli.quiet {
                println!("{report}");
            }
            println!("wrote outline to {}", cli.output.display());
        }
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
