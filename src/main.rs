use std::io::Read;

use anyhow::Context;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "meta-debug",
    about = "Detect performance patterns in AI prose",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// Free-text annotation echoed into the report
    #[arg(long, default_value = "")]
    context: String,

    /// Emit the ranked matches as JSON instead of the composed report
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        emit(&input, &cli)?;
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {path}"))?;
            emit(&text, &cli)?;
        }
    }
    Ok(())
}

fn emit(text: &str, cli: &Cli) -> anyhow::Result<()> {
    let matches = meta_debug::analyze(text, &cli.context);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        println!("{}", meta_debug::compose(&matches, text, &cli.context));
    }
    Ok(())
}
