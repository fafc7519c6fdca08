use super::tag::mapped_elements;
use super::{read_markup, report};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use jsxed_editor::{tag_and_map, EditPanel, EditSession, EditorError};

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Markup file to inspect
    pub file: String,

    /// Element identifier to show the edit panel for
    #[arg(long)]
    pub id: Option<u32>,
}

pub fn inspect(args: InspectArgs, cwd: &str) -> Result<()> {
    let (path, source) = read_markup(&args.file, cwd)?;

    let Some(id) = args.id else {
        let tagged = tag_and_map(&source).map_err(|e| report(EditorError::from(e), &path, &source))?;
        println!("{}", "Elements".bright_blue().bold());
        for element in mapped_elements(&tagged) {
            println!("  {} <{}>", element.id.to_string().dimmed(), element.name);
        }
        return Ok(());
    };

    let panel = panel_for(&source, id).map_err(|e| report(e, &path, &source))?;
    let panel = panel.ok_or_else(|| anyhow!("No element with identifier {}", id))?;
    println!("{}", serde_json::to_string_pretty(&panel)?);
    Ok(())
}

pub(crate) fn panel_for(source: &str, id: u32) -> Result<Option<EditPanel>, EditorError> {
    let mut session = EditSession::load(source)?;
    session.pick(&id.to_string());
    Ok(session.panel())
}
