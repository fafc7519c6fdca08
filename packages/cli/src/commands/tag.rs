use super::{read_markup, report};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use jsxed_editor::{strip_markers, tag_and_map, EditorError};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct TagArgs {
    /// Markup file to tag
    pub file: String,

    /// Remove identifier markers instead of adding them
    #[arg(long)]
    pub strip: bool,

    /// Print the identifier mapping as JSON
    #[arg(long)]
    pub mapping: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct MappedElement {
    pub id: u32,
    pub name: String,
}

pub fn tag(args: TagArgs, cwd: &str) -> Result<()> {
    let (path, source) = read_markup(&args.file, cwd)?;

    if args.strip {
        let stripped = strip_markers(&source).map_err(|e| report(e.into(), &path, &source))?;
        println!("{}", stripped);
        return Ok(());
    }

    let tagged = tag_and_map(&source).map_err(|e| report(EditorError::from(e), &path, &source))?;

    if args.mapping {
        let elements = mapped_elements(&tagged);
        println!("{}", serde_json::to_string_pretty(&elements)?);
        return Ok(());
    }

    println!("{}", tagged.tagged_markup);
    eprintln!(
        "{} Tagged {} elements",
        "✓".green(),
        tagged.mapping.len().to_string().bright_blue().bold()
    );
    Ok(())
}

pub(crate) fn mapped_elements(tagged: &jsxed_editor::Tagged) -> Vec<MappedElement> {
    tagged
        .mapping
        .iter()
        .map(|(id, node)| MappedElement {
            id,
            name: tagged.tree.element_name(node).unwrap_or_default().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_elements_in_document_order() {
        let tagged = tag_and_map("<main><h1>A</h1><ul>{xs.map(x => <li>{x}</li>)}</ul></main>").unwrap();
        let names: Vec<_> = mapped_elements(&tagged)
            .into_iter()
            .map(|e| (e.id, e.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (0, "main".to_string()),
                (1, "h1".to_string()),
                (2, "ul".to_string()),
                (3, "li".to_string()),
            ]
        );
    }

    #[test]
    fn test_tag_reads_relative_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("card.jsx"), "<div><p>Hi</p></div>").unwrap();

        let args = TagArgs {
            file: "card.jsx".to_string(),
            strip: false,
            mapping: true,
        };
        assert!(tag(args, dir.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_tag_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.jsx"), "<div><span></div>").unwrap();

        let args = TagArgs {
            file: "bad.jsx".to_string(),
            strip: false,
            mapping: false,
        };
        assert!(tag(args, dir.path().to_str().unwrap()).is_err());
    }
}
