use super::edit::literal_from_arg;
use super::read_markup;
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use jsxed_editor::{EditSession, Mutation};
use jsxed_store::{ComponentStore, DebouncedWriter, FileStore};
use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Stored component to edit
    #[arg(required_unless_present = "from")]
    pub id: Option<String>,

    /// Store a new component from this markup file and edit it
    #[arg(long, conflicts_with = "id")]
    pub from: Option<String>,

    /// Component store (overrides config)
    #[arg(long, env = "JSXED_STORE")]
    pub store: Option<String>,
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SessionCommand {
    Pick(String),
    Text(String),
    Style { key: String, value: Option<String> },
    Attr { name: String, value: String },
    Show,
    Panel,
    Rerender,
    Help,
    Quit,
    Empty,
}

impl SessionCommand {
    pub(crate) fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        Ok(match word {
            "" => SessionCommand::Empty,
            "pick" if !rest.is_empty() => SessionCommand::Pick(rest.to_string()),
            "text" => SessionCommand::Text(rest.to_string()),
            "style" => {
                let (key, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                SessionCommand::Style {
                    key: key.to_string(),
                    value: Some(value.trim().to_string()).filter(|v| !v.is_empty()),
                }
            }
            "attr" => {
                let (name, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("Usage: attr <name> <value>"))?;
                SessionCommand::Attr {
                    name: name.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "show" => SessionCommand::Show,
            "panel" => SessionCommand::Panel,
            "rerender" => SessionCommand::Rerender,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(anyhow!("Unknown command `{}` (try `help`)", other)),
        })
    }
}

const HELP: &str = "\
pick <id>            select the element with this identifier
text <value>         replace the picked element's text
style <key> [value]  set a style property, no value removes it
attr <name> <value>  set an attribute
show                 print the committed markup
panel                print the edit panel of the picked element
rerender             tag the committed markup again
quit                 save and leave";

pub fn session(args: SessionArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let store_path = config.store_path(cwd, args.store.as_deref());
    let store: Arc<dyn ComponentStore> = Arc::new(FileStore::new(store_path));

    let id = match (&args.id, &args.from) {
        (_, Some(file)) => {
            let (_, source) = read_markup(file, cwd)?;
            let id = store.create(&source)?;
            println!("{} Stored component {}", "✓".green(), id.bright_blue().bold());
            id
        }
        (Some(id), None) => id.clone(),
        (None, None) => return Err(anyhow!("A component id or --from file is required")),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    let stdin = std::io::stdin();
    runtime.block_on(run_session(
        store,
        &id,
        config.debounce(),
        stdin.lock(),
        std::io::stdout(),
    ))
}

/// Drive an editing session over a stored component from line input
///
/// Every committed change is saved through a debounced writer; the last
/// pending save is awaited before returning.
pub(crate) async fn run_session(
    store: Arc<dyn ComponentStore>,
    id: &str,
    debounce: Duration,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    let markup = store
        .read(id)?
        .ok_or_else(|| anyhow!("No stored component with id {}", id))?;
    let mut session = EditSession::load(&markup)?;

    let writer = DebouncedWriter::with_delay(store, debounce);
    let pending: Rc<RefCell<Option<JoinHandle<()>>>> = Rc::new(RefCell::new(None));
    session.on_change({
        let writer = writer.clone();
        let pending = pending.clone();
        let id = id.to_string();
        move |text| {
            *pending.borrow_mut() = Some(writer.schedule(&id, text.to_string()));
        }
    });

    writeln!(
        output,
        "{} {} elements, type `help` for commands",
        "Editing".bright_blue().bold(),
        session.mapping().len()
    )?;

    for line in input.lines() {
        let command = match SessionCommand::parse(&line?) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{} {}", "✗".red(), err)?;
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        if let Err(err) = run_command(&mut session, command, &mut output) {
            writeln!(output, "{} {}", "✗".red(), err)?;
        }
    }

    let last = pending.borrow_mut().take();
    if let Some(handle) = last {
        handle.await?;
    }
    tracing::debug!(id, status = ?writer.status(id), "session closed");
    Ok(())
}

fn run_command(
    session: &mut EditSession,
    command: SessionCommand,
    output: &mut impl Write,
) -> Result<()> {
    let mutation = match command {
        SessionCommand::Pick(marker) => {
            match session.pick(&marker) {
                Some(_) => writeln!(output, "{} picked {}", "✓".green(), marker)?,
                None => writeln!(output, "{} no element {}", "✗".red(), marker)?,
            }
            return Ok(());
        }
        SessionCommand::Text(text) => Mutation::SetText { text },
        SessionCommand::Style { key, value } => Mutation::SetStyle {
            property: key,
            value,
        },
        SessionCommand::Attr { name, value } => Mutation::SetAttribute {
            name,
            value: literal_from_arg(&value),
        },
        SessionCommand::Show => {
            writeln!(output, "{}", session.markup_text())?;
            return Ok(());
        }
        SessionCommand::Panel => {
            match session.panel() {
                Some(panel) => writeln!(output, "{}", serde_json::to_string_pretty(&panel)?)?,
                None => writeln!(output, "{}", "Nothing picked".dimmed())?,
            }
            return Ok(());
        }
        SessionCommand::Rerender => {
            let tagged = session.rerender()?;
            writeln!(output, "{}", tagged)?;
            return Ok(());
        }
        SessionCommand::Help => {
            writeln!(output, "{}", HELP)?;
            return Ok(());
        }
        SessionCommand::Quit | SessionCommand::Empty => return Ok(()),
    };

    match session.apply(mutation)? {
        Some(_) => writeln!(output, "{} updated", "✓".green())?,
        None => writeln!(output, "{}", "No change (pick an element first)".dimmed())?,
    }
    Ok(())
}
