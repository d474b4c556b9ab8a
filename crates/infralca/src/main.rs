use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use infralca::{ExportConfig, Exporter, Pass};

#[derive(Parser)]
#[command(name = "infralca")]
#[command(
    about = "Convert the InfraLCA workbook into LCAx EPD and product files",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// InfraLCA workbook (.xlsx or .xlsm)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Directory receiving `epds/` and `products/`
    #[arg(value_hint = clap::ValueHint::DirPath)]
    output: PathBuf,

    /// TOML file overriding sheet, window and edition settings
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Run a single pass. Products need the EPDs of an earlier run.
    #[arg(long)]
    only: Option<OnlyPass>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OnlyPass {
    Epds,
    Products,
}

impl From<OnlyPass> for Pass {
    fn from(value: OnlyPass) -> Self {
        match value {
            OnlyPass::Epds => Pass::Epds,
            OnlyPass::Products => Pass::Products,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default level depends on --debug (overridden by RUST_LOG)
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::Builder::from_env(env).init();

    let config = match &cli.config {
        Some(path) => ExportConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ExportConfig::default(),
    };
    config.validate()?;

    let exporter = Exporter::new(&config, &cli.output);

    match cli.only.map(Pass::from) {
        None => {
            let summary = exporter.export_workbook(&cli.input)?;
            print_summary(Pass::Epds, &summary.epds);
            print_summary(Pass::Products, &summary.products);
        }
        Some(pass) => {
            let rows = infralca::read_rows(&cli.input, &config)
                .with_context(|| format!("Failed to read {}", cli.input.display()))?;
            let summary = exporter.export(&rows, pass)?;
            print_summary(pass, &summary);
        }
    }

    Ok(())
}

fn print_summary(pass: Pass, summary: &infralca::PassSummary) {
    println!("{} {pass}: {summary}", "Exported".green().bold());
}
