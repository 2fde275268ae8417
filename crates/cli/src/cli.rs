use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Workspace root [default: $WORKSPACE_FOLDER]
    #[clap(short = 'w', long)]
    pub workspace: Option<PathBuf>,
    /// Deployment tier: dev, prod, anything else is stg [default: $ENV]
    #[clap(short = 'e', long)]
    pub env: Option<String>,
    /// App config path [default: <workspace>/cmd/app/app_config.json]
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Substitute "None" for a missing Name or Version instead of failing
    #[clap(long)]
    pub lenient: bool,
    /// Extra linker symbol, e.g. -D main.commit=abc123
    #[clap(short = 'D', long = "define", value_parser = parse_define)]
    pub defines: Vec<(String, String)>,
    /// Compiler driver
    #[clap(long)]
    pub toolchain: Option<String>,
}

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Build the versioned release executable
    Build {
        #[command(flatten)]
        target: Target,
        /// Print the command without running it
        #[clap(short = 'n', long)]
        dry_run: bool,
        /// Do not play the completion sound
        #[clap(short, long)]
        quiet: bool,
        /// Rebuild when sources change
        #[clap(long)]
        watch: bool,
    },

    /// Show the resolved app, environment and build command
    Info {
        #[command(flatten)]
        target: Target,
    },
}

/// appbuild Command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

fn parse_define(s: &str) -> Result<(String, String), String> {
    let (symbol, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=VALUE, got '{s}'"))?;
    if symbol.is_empty() {
        return Err(format!("empty symbol in '{s}'"));
    }
    Ok((symbol.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_define() {
        assert_eq!(
            parse_define("main.commit=abc=1").unwrap(),
            ("main.commit".to_string(), "abc=1".to_string())
        );
        assert!(parse_define("main.commit").is_err());
        assert!(parse_define("=x").is_err());
    }

    #[test]
    fn test_build_args() {
        let cli = Cli::try_parse_from([
            "appbuild", "build", "-w", "/ws", "-e", "dev", "-D", "main.a=1", "--dry-run",
        ])
        .unwrap();
        match cli.cmd {
            Commands::Build {
                target,
                dry_run,
                quiet,
                watch,
            } => {
                assert_eq!(target.workspace, Some(PathBuf::from("/ws")));
                assert_eq!(target.env.as_deref(), Some("dev"));
                assert_eq!(target.defines, vec![("main.a".to_string(), "1".to_string())]);
                assert!(dry_run);
                assert!(!quiet);
                assert!(!watch);
            }
            Commands::Info { .. } => panic!("expected build"),
        }
    }
}
