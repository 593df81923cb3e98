//! # schemactl
//!
//! Command line schema builder. Schemas live in a session file (`.json`
//! or `.toml`); edits are given as intent lines, either from a script or
//! typed into an interactive shell that redraws the live output after
//! every change.

#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use schemakit::{DocumentStore, Session};

mod shell;
mod view;

#[derive(Parser, Debug)]
#[command(version, about = "Build record schemas with a live serialized view")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a session holding one blank schema.
    New {
        file: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the serialized schemas of a session.
    Render { file: PathBuf },
    /// Apply a script of intents to a session and save it.
    Apply {
        file: PathBuf,
        script: PathBuf,
        /// Print the result without saving.
        #[arg(long)]
        dry_run: bool,
    },
    /// Edit a session interactively.
    Shell { file: PathBuf },
    /// Check a JSON data file against one schema of a session.
    Validate {
        file: PathBuf,
        /// Name of the schema to check against.
        schema: String,
        data: PathBuf,
    },
    /// Print the JSON Schema of the session file format.
    JsonSchema,
}

fn init_logger(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn load_store(file: &PathBuf) -> anyhow::Result<DocumentStore> {
    let session =
        Session::load(file).with_context(|| format!("Failed to load {}", file.display()))?;
    Ok(DocumentStore::from(session))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.debug);

    match cli.command {
        Commands::New { file, force } => {
            if file.exists() && !force {
                bail!("{} already exists, use --force to overwrite", file.display());
            }
            Session::default()
                .save(&file)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            println!("{} {}", "created".green().bold(), file.display());
        }
        Commands::Render { file } => {
            let store = load_store(&file)?;
            println!("{}", store.render());
        }
        Commands::Apply {
            file,
            script,
            dry_run,
        } => {
            let mut store = load_store(&file)?;
            let content = tokio::fs::read_to_string(&script)
                .await
                .with_context(|| format!("Failed to read {}", script.display()))?;
            let applied = store.apply_script(&content).map_err(|(line, e)| {
                anyhow::anyhow!("{}:{line}: {e}", script.display())
            })?;
            info!("applied {applied} intents from {}", script.display());
            for dangling in store.dangling_refs() {
                warn!(
                    "schema {} field {} refers to missing schema `{}`",
                    dangling.schema, dangling.path, dangling.target
                );
            }
            if !dry_run {
                if let Some(backup) = Session::from(&store)
                    .save(&file)
                    .with_context(|| format!("Failed to write {}", file.display()))?
                {
                    debug!("previous session kept at {}", backup.display());
                }
            }
            println!("{}", store.render());
        }
        Commands::Shell { file } => {
            let store = load_store(&file)?;
            let mut shell = shell::Shell::new(store, file);
            shell.run(tokio::io::stdin(), tokio::io::stdout()).await?;
        }
        Commands::Validate { file, schema, data } => {
            let store = load_store(&file)?;
            let content = tokio::fs::read_to_string(&data)
                .await
                .with_context(|| format!("Failed to read {}", data.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", data.display()))?;
            schemakit::validate(store.schemas(), &schema, &value)
                .with_context(|| format!("{} does not match `{schema}`", data.display()))?;
            println!("{} {}", "valid".green().bold(), data.display());
        }
        Commands::JsonSchema => {
            let schema = schemars::schema_for!(Session);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_args() {
        let cli = Cli::parse_from(["schemactl", "--debug", "apply", "s.toml", "edit.txt", "--dry-run"]);
        assert!(cli.debug);
        match cli.command {
            Commands::Apply {
                file,
                script,
                dry_run,
            } => {
                assert_eq!(file, PathBuf::from("s.toml"));
                assert_eq!(script, PathBuf::from("edit.txt"));
                assert!(dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_validate_args() {
        let cli = Cli::parse_from(["schemactl", "validate", "s.json", "Person", "ada.json"]);
        match cli.command {
            Commands::Validate { file, schema, data } => {
                assert_eq!(file, PathBuf::from("s.json"));
                assert_eq!(schema, "Person");
                assert_eq!(data, PathBuf::from("ada.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["schemactl", "validate", "s.json"]).is_err());
    }

    #[test]
    fn test_session_json_schema_names_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(Session)).unwrap();
        let text = schema.to_string();
        assert!(text.contains("schemaRef"));
        assert!(text.contains("items_type"));
    }
}
