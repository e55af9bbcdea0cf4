use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(author, version, about = "dirclip project automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest across the workspace
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Formatting check, clippy with warnings denied, then nextest
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Ci => {
            run_cargo(&["fmt", "--all", "--check"])?;
            run_cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
            run_nextest(None, false)?;
        }
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut args = vec!["nextest".to_owned(), "run".to_owned(), "--workspace".to_owned()];
    if let Some(profile) = profile {
        args.push("--profile".into());
        args.push(profile);
    }
    if release {
        args.push("--release".into());
    }
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    run_cargo(&args)
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
