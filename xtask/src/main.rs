use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use urchat_push_worker::WorkerConfig;

const WORKER_CRATE: &str = "worker";
const WORKER_CONFIG: &str = "worker/config/worker.toml";
const GLUE_SCRIPT: &str = "worker/js/firebase-messaging-sw.js";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "URChat push worker task runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the worker to wasm (wasm-pack, no-modules target)
    Build {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: String,

        /// Debug build
        #[arg(long)]
        dev: bool,
    },

    /// Build, then assemble a deployable service worker directory
    Bundle {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: String,
    },

    /// Run all Rust tests
    Test,

    /// Run clippy linter
    Clippy,

    /// Remove build output
    Clean {
        /// Output directory
        #[arg(short, long, default_value = "dist")]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { out, dev } => build(&out, dev),
        Commands::Bundle { out } => bundle(&out),
        Commands::Test => test(),
        Commands::Clippy => clippy(),
        Commands::Clean { out } => clean(&out),
    }
}

fn build(out: &str, dev: bool) -> Result<()> {
    println!("🔨 Building {} to wasm...", WORKER_CRATE);

    // wasm-pack resolves --out-dir relative to the crate
    let pkg_dir = Path::new("..")
        .join(out)
        .join("pkg")
        .to_string_lossy()
        .into_owned();

    let mut args = vec![
        "build",
        WORKER_CRATE,
        "--target",
        "no-modules",
        "--no-typescript",
        "--out-dir",
        pkg_dir.as_str(),
    ];
    args.push(if dev { "--dev" } else { "--release" });

    run_cmd("wasm-pack", &args)?;
    Ok(())
}

fn bundle(out: &str) -> Result<()> {
    build(out, false)?;

    println!("📦 Assembling service worker in {}/", out);

    let glue_target = Path::new(out).join("firebase-messaging-sw.js");
    fs::copy(GLUE_SCRIPT, &glue_target)
        .with_context(|| format!("Failed to copy {}", GLUE_SCRIPT))?;
    println!("  ✅ {}", glue_target.display());

    let content = fs::read_to_string(WORKER_CONFIG)
        .with_context(|| format!("Failed to read config file: {}", WORKER_CONFIG))?;
    let config = WorkerConfig::from_toml(&content)?;

    let config_target = Path::new(out).join("firebase-config.js");
    fs::write(&config_target, messaging_config_script(&config)?)
        .with_context(|| format!("Failed to write {}", config_target.display()))?;
    println!("  ✅ {}", config_target.display());

    if config.messaging.is_none() {
        println!("  ⚠️  No [messaging] section in {}", WORKER_CONFIG);
        println!("     Background messages will only arrive through raw push events");
    }

    println!("\n✅ Bundle ready. Serve {}/ at the site root.", out);
    Ok(())
}

/// Script that exposes the messaging SDK settings to the glue
fn messaging_config_script(config: &WorkerConfig) -> Result<String> {
    let json = match &config.messaging {
        Some(messaging) => serde_json::to_string_pretty(messaging)
            .context("Failed to serialize [messaging] config")?,
        None => "null".to_string(),
    };
    Ok(format!(
        "// Generated by `cargo xtask bundle` from {}\nself.MESSAGING_CONFIG = {};\n",
        WORKER_CONFIG, json
    ))
}

fn test() -> Result<()> {
    println!("🧪 Running all tests...");
    run_cmd("cargo", &["test", "--workspace"])?;
    Ok(())
}

fn clippy() -> Result<()> {
    println!("🔍 Running clippy on workspace (warnings as errors)...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ],
    )?;

    println!("🔍 Running clippy for wasm32...");
    run_cmd(
        "cargo",
        &[
            "clippy",
            "-p",
            "urchat-push-worker",
            "--target",
            "wasm32-unknown-unknown",
            "--",
            "-D",
            "warnings",
        ],
    )?;
    Ok(())
}

fn clean(out: &str) -> Result<()> {
    println!("🧹 Removing {}/", out);
    // Ignore error if it doesn't exist
    let _ = fs::remove_dir_all(out);
    Ok(())
}

// Helper functions
fn run_cmd(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to run: {} {}", program, args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("Command failed: {} {}", program, args.join(" "));
    }

    Ok(())
}
