//! Build automation tasks for the kusto-auth workspace.
//!
//! Run with `cargo xtask <command>`.
//!
//! ## Available Commands
//!
//! - `ci`: Run all CI checks (format, lint, test)
//! - `fmt`: Check/apply code formatting
//! - `clippy`: Run clippy lints
//! - `test`: Run all tests
//! - `live`: Run the ignored tests against a real Azure tenant
//! - `doc`: Generate documentation
//! - `fuzz`: Run one fuzz target, or all of them in turn (requires
//!   cargo-fuzz + nightly)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for kusto-auth")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all checks (format, lint, test)
    Ci,
    /// Run cargo fmt (--check by default, --fix to apply)
    Fmt {
        /// Apply formatting fixes
        #[arg(long)]
        fix: bool,
    },
    /// Run clippy with the Azure backend enabled
    Clippy {
        /// Apply clippy suggestions
        #[arg(long)]
        fix: bool,
    },
    /// Run all tests
    Test {
        /// Test a specific package
        #[arg(short, long)]
        package: Option<String>,
    },
    /// Run ignored tests that need Azure credentials in the environment
    Live,
    /// Generate documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Run fuzz tests (requires cargo-fuzz + nightly)
    Fuzz {
        /// Fuzz target to run; every target when omitted
        target: Option<String>,
        /// Maximum runtime per target in seconds
        #[arg(long, default_value = "60")]
        max_time: u64,
        /// List available fuzz targets
        #[arg(long)]
        list: bool,
    },
}

/// Targets declared in `fuzz/Cargo.toml`.
const FUZZ_TARGETS: [&str; 3] = ["sanitize_message", "parse_auth_method", "resolve_credential"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    // Change to workspace root
    sh.change_dir(workspace_root()?);

    match cli.command {
        Command::Ci => {
            println!("Running CI checks...");
            fmt(&sh, false)?;
            clippy(&sh, false)?;
            test(&sh, None)?;
            println!("\n✅ All CI checks passed!");
        }
        Command::Fmt { fix } => fmt(&sh, fix)?,
        Command::Clippy { fix } => clippy(&sh, fix)?,
        Command::Test { package } => test(&sh, package.as_deref())?,
        Command::Live => live(&sh)?,
        Command::Doc { open } => doc(&sh, open)?,
        Command::Fuzz {
            target,
            max_time,
            list,
        } => fuzz(&sh, target.as_deref(), max_time, list)?,
    }

    Ok(())
}

fn workspace_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}

fn fmt(sh: &Shell, fix: bool) -> Result<()> {
    let check: &[&str] = if fix { &[] } else { &["--", "--check"] };
    println!("Running cargo fmt{}...", if fix { "" } else { " --check" });
    cmd!(sh, "cargo fmt --all {check...}").run()?;
    println!("✅ Formatting {}.", if fix { "applied" } else { "check passed" });
    Ok(())
}

fn clippy(sh: &Shell, fix: bool) -> Result<()> {
    // cert-auth pulls in openssl, so the default lint run stops at azure-identity
    if fix {
        println!("Applying clippy suggestions...");
        cmd!(
            sh,
            "cargo clippy --workspace --features kusto-auth/azure-identity --all-targets --fix --allow-dirty"
        )
        .run()?;
        println!("✅ Clippy suggestions applied.");
    } else {
        println!("Running clippy...");
        cmd!(
            sh,
            "cargo clippy --workspace --features kusto-auth/azure-identity --all-targets -- -D warnings"
        )
        .run()?;
        println!("✅ Clippy check passed.");
    }
    Ok(())
}

fn test(sh: &Shell, package: Option<&str>) -> Result<()> {
    println!("Running tests...");

    let mut args = vec!["--workspace"];
    if let Some(pkg) = package {
        args = vec!["-p", pkg];
    }

    cmd!(sh, "cargo test {args...}").run()?;
    println!("✅ All tests passed.");
    Ok(())
}

fn live(sh: &Shell) -> Result<()> {
    if std::env::var_os("AZURE_TENANT_ID").is_none() {
        println!("⚠️  AZURE_TENANT_ID is not set; only Azure CLI tests can succeed.");
    }

    println!("Running live Azure tests...");
    cmd!(
        sh,
        "cargo test -p kusto-auth --features azure-identity -- --ignored"
    )
    .run()?;
    println!("✅ Live tests passed.");
    Ok(())
}

fn doc(sh: &Shell, open: bool) -> Result<()> {
    println!("Generating documentation...");
    let open: &[&str] = if open { &["--open"] } else { &[] };
    cmd!(
        sh,
        "cargo doc --workspace --features kusto-auth/azure-identity --no-deps {open...}"
    )
    .run()?;
    println!("✅ Documentation generated.");
    Ok(())
}

fn fuzz(sh: &Shell, target: Option<&str>, max_time: u64, list: bool) -> Result<()> {
    if list {
        println!("Available fuzz targets:");
        for name in FUZZ_TARGETS {
            println!("  - {name}");
        }
        return Ok(());
    }

    let targets: Vec<&str> = match target {
        Some(name) if FUZZ_TARGETS.contains(&name) => vec![name],
        Some(name) => bail!(
            "Unknown fuzz target: {name}. Available: {}",
            FUZZ_TARGETS.join(", ")
        ),
        None => FUZZ_TARGETS.to_vec(),
    };

    // cargo-fuzz requires nightly and must run from the fuzz workspace
    let _dir = sh.push_dir("fuzz");
    let max_time = max_time.to_string();
    for target in targets {
        println!("Fuzzing {target} for {max_time} seconds...");
        cmd!(
            sh,
            "cargo +nightly fuzz run {target} -- -max_total_time={max_time}"
        )
        .run()?;
    }
    println!("✅ Fuzzing finished without crashes.");
    Ok(())
}
