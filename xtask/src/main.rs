use std::process::{Command, ExitCode};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask", about = "Build tasks for unitrun")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo fmt --check
    Fmt,
    /// Run cargo check
    Check,
    /// Run cargo clippy
    Clippy,
    /// Run cargo test
    Test,
    /// Run cargo doc
    Doc,
    /// Run all CI checks (fmt, check, clippy, test, doc, smoke run)
    Ci,
    /// Run the unitrun CLI against the bundled example units
    Example {
        /// Arguments to pass to unitrun (default: ExampleTest)
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:?}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Fmt => cmd_fmt(),
        Commands::Check => cmd_check(),
        Commands::Clippy => cmd_clippy(),
        Commands::Test => cmd_test(),
        Commands::Doc => cmd_doc(),
        Commands::Ci => cmd_ci(),
        Commands::Example { args } => cmd_example(&args),
    }
}

fn cmd_fmt() -> Result<()> {
    cargo(&["fmt", "--all", "--check"])
}

fn cmd_check() -> Result<()> {
    cargo(&["check", "--workspace", "--all-targets"])
}

fn cmd_clippy() -> Result<()> {
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
}

fn cmd_test() -> Result<()> {
    cargo(&["test", "--workspace"])
}

fn cmd_doc() -> Result<()> {
    cargo(&["doc", "--workspace", "--no-deps"])
}

fn cmd_ci() -> Result<()> {
    cmd_fmt()?;
    cmd_check()?;
    cmd_clippy()?;
    cmd_test()?;
    cmd_doc()?;
    // ExampleTest fails on purpose; CounterTest must stay clean.
    cmd_example(&["CounterTest".to_string()])?;
    Ok(())
}

fn cmd_example(args: &[String]) -> Result<()> {
    let mut cmd_args = vec!["run", "-p", "unitrun", "--"];
    if args.is_empty() {
        cmd_args.push("ExampleTest");
    } else {
        cmd_args.extend(args.iter().map(String::as_str));
    }
    cargo(&cmd_args)
}

fn cargo(args: &[&str]) -> Result<()> {
    exec("cargo", args)
}

fn exec(program: &str, args: &[&str]) -> Result<()> {
    let cmd_line = format!("{program} {}", args.join(" "));
    eprintln!("$ {cmd_line}");

    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("Failed to execute: {cmd_line}"))?;

    if !status.success() {
        let code_info = match status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        bail!("{cmd_line}: {code_info}");
    }
    Ok(())
}
