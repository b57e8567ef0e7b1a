use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for spincube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and the shader check
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test,
    /// Compile and link the shipped shaders with the offline backend
    Shaders,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            cargo("clippy", &clippy_args())?;
            cargo("test", &["test", "--workspace"])?;
            cargo("shader check", &shader_args())?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo("clippy", &clippy_args())?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Shaders => cargo("shader check", &shader_args())?,
    }

    Ok(())
}

fn clippy_args() -> [&'static str; 6] {
    ["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]
}

fn shader_args() -> [&'static str; 6] {
    ["run", "-q", "-p", "spincube-cli", "--", "check-shaders"]
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}
