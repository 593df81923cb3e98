//! Interactive editing loop.

use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use schemakit::{DocumentStore, Intent, Session};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use crate::view;

/// What a line typed into the shell asks for.
#[derive(Debug, PartialEq)]
pub enum Command {
    Edit(Intent),
    Save,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
intents:
  add-schema | rename-schema <i> <name> | remove-schema <i> | select <i>
  set <path> <property> <value>     (value `-` unsets)
  set-ref <path> <schema>
  add-field [type] [parent path] | remove-field <path>
commands:
  show | save | help | quit";

impl std::str::FromStr for Command {
    type Err = schemakit::IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Ok(match line.trim() {
            "save" | "w" => Command::Save,
            "show" | "" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => Command::Edit(other.parse()?),
        })
    }
}

/// Shell state: the store being edited and where it is saved.
pub struct Shell {
    pub store: DocumentStore,
    pub path: PathBuf,
    pub dirty: bool,
}

impl Shell {
    pub fn new(store: DocumentStore, path: PathBuf) -> Self {
        Self {
            store,
            path,
            dirty: false,
        }
    }

    fn save(&mut self) -> anyhow::Result<()> {
        Session::from(&self.store)
            .save(&self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.dirty = false;
        info!("saved {}", self.path.display());
        Ok(())
    }

    /// Read lines from `input` until `quit` or end of input, redrawing
    /// the screen on `output` after every edit.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> anyhow::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        output
            .write_all(view::screen(&self.store).as_bytes())
            .await?;
        let mut lines = BufReader::new(input).lines();
        loop {
            output.write_all(b"> ").await?;
            output.flush().await?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = match line.parse::<Command>() {
                Ok(Command::Edit(intent)) => {
                    self.store.apply(intent);
                    self.dirty = true;
                    view::screen(&self.store)
                }
                Ok(Command::Show) => view::screen(&self.store),
                Ok(Command::Save) => {
                    self.save()?;
                    format!("saved {}\n", self.path.display())
                }
                Ok(Command::Help) => format!("{HELP}\n"),
                Ok(Command::Quit) => break,
                Err(e) => format!("{} {e}\n", "error:".red().bold()),
            };
            output.write_all(text.as_bytes()).await?;
        }
        if self.dirty {
            warn!("unsaved changes to {} discarded", self.path.display());
        }
        Ok(())
    }
}
