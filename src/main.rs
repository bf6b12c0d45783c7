use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use component_analyzer::{Config, Framework, ProjectAnalyzer};

#[derive(Parser)]
#[command(name = "component-analyzer")]
#[command(about = "Tree-sitter based component inventory for React, Vue and Svelte projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Analyze a project and report its component inventory")]
    Analyze {
        #[arg(short, long, help = "Config file (TOML); overrides --root")]
        config: Option<PathBuf>,
        #[arg(short, long, default_value = ".", help = "Project root to analyze")]
        root: PathBuf,
        #[arg(long, help = "Write the full report as JSON to this path")]
        output_json: Option<PathBuf>,
        #[arg(
            long,
            value_delimiter = ',',
            help = "Restrict analysis to these frameworks (react,vue,svelte)"
        )]
        frameworks: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            config,
            root,
            output_json,
            frameworks,
        } => analyze_project(config, root, output_json, frameworks),
    }
}

fn analyze_project(
    config_path: Option<PathBuf>,
    root: PathBuf,
    output_json: Option<PathBuf>,
    frameworks: Vec<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::from_file(&path.to_string_lossy())?,
        None => Config::from_project_root(&root),
    };
    if !frameworks.is_empty() {
        config.analysis.frameworks = frameworks
            .iter()
            .map(|name| parse_framework(name))
            .collect::<Result<_>>()?;
    }

    eprintln!("🔍 Analyzing {}", config.project.root.display());
    let mut analyzer = ProjectAnalyzer::with_config(config)?;
    let report = analyzer.analyze()?;

    println!("Components: {}", report.summary.total_components);
    for (framework, count) in &report.summary.by_framework {
        println!("  {}: {}", framework, count);
    }
    println!("Props: {}", report.summary.total_props);
    println!("Variants: {}", report.summary.total_variants);
    println!("Usages: {}", report.summary.total_usages);

    if !report.warnings.is_empty() {
        eprintln!("⚠️  {} file(s) skipped", report.warnings.len());
    }
    if !report.errors.is_empty() {
        eprintln!("❌ {} file(s) failed:", report.errors.len());
        for error in report.errors.iter().take(10) {
            eprintln!("  {} - {}", error.file_path, error.message);
        }
        if report.errors.len() > 10 {
            eprintln!("  ... and {} more", report.errors.len() - 10);
        }
    }

    if let Some(output_path) = output_json {
        std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        eprintln!("💾 Report written to {:?}", output_path);
    }

    Ok(())
}

fn parse_framework(name: &str) -> Result<Framework> {
    match name.to_ascii_lowercase().as_str() {
        "react" => Ok(Framework::React),
        "vue" => Ok(Framework::Vue),
        "svelte" => Ok(Framework::Svelte),
        other => anyhow::bail!("Unknown framework: {}", other),
    }
}
