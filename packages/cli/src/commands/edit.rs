use super::{read_markup, report};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use jsxed_editor::{EditSession, LiteralValue, Mutation};

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Markup file to edit
    pub file: String,

    /// Identifier of the element to edit
    #[arg(long)]
    pub id: u32,

    /// Replace the element's text
    #[arg(long)]
    pub text: Option<String>,

    /// Set a style property (`key=value`, empty value removes it)
    #[arg(long = "style", value_name = "KEY=VALUE")]
    pub styles: Vec<String>,

    /// Set an attribute (`name=value`)
    #[arg(long = "attr", value_name = "NAME=VALUE")]
    pub attributes: Vec<String>,

    /// Write the result back to the file instead of stdout
    #[arg(short, long)]
    pub in_place: bool,
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let (path, source) = read_markup(&args.file, cwd)?;
    let mutations = mutations_from(&args)?;

    let output = apply_edits(&source, args.id, mutations).map_err(|e| match e.downcast() {
        Ok(editor) => report(editor, &path, &source),
        Err(other) => other,
    })?;

    if args.in_place {
        std::fs::write(&path, &output)?;
        println!("{} Updated {}", "✓".green(), path.display());
    } else {
        println!("{}", output);
    }
    Ok(())
}

/// Mutation requests in argument order: text, then styles, then attributes
pub(crate) fn mutations_from(args: &EditArgs) -> Result<Vec<Mutation>> {
    let mut mutations = Vec::new();

    if let Some(text) = &args.text {
        mutations.push(Mutation::SetText { text: text.clone() });
    }
    for style in &args.styles {
        let (property, value) = split_pair(style)?;
        mutations.push(Mutation::SetStyle {
            property: property.to_string(),
            value: Some(value.to_string()).filter(|v| !v.is_empty()),
        });
    }
    for attribute in &args.attributes {
        let (name, value) = split_pair(attribute)?;
        mutations.push(Mutation::SetAttribute {
            name: name.to_string(),
            value: literal_from_arg(value),
        });
    }
    Ok(mutations)
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .ok_or_else(|| anyhow!("Expected KEY=VALUE, got `{}`", pair))
}

/// `true`, `false`, `null` and numbers become their literal, anything else
/// a string
pub(crate) fn literal_from_arg(value: &str) -> LiteralValue {
    match value {
        "true" => LiteralValue::Boolean(true),
        "false" => LiteralValue::Boolean(false),
        "null" => LiteralValue::Null,
        _ => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => LiteralValue::Number(number),
            _ => LiteralValue::from(value),
        },
    }
}

/// Apply `mutations` to element `id` and return the committed markup with
/// markers intact
pub(crate) fn apply_edits(source: &str, id: u32, mutations: Vec<Mutation>) -> Result<String> {
    let mut session = EditSession::load(source)?;
    if session.pick(&id.to_string()).is_none() {
        return Err(anyhow!("No element with identifier {}", id));
    }

    for mutation in mutations {
        session.apply(mutation)?;
    }
    Ok(session.markup_text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsxed_editor::strip_markers;

    fn args(id: u32) -> EditArgs {
        EditArgs {
            file: "card.jsx".to_string(),
            id,
            text: None,
            styles: Vec::new(),
            attributes: Vec::new(),
            in_place: false,
        }
    }

    #[test]
    fn test_literal_from_arg() {
        assert_eq!(literal_from_arg("true"), LiteralValue::Boolean(true));
        assert_eq!(literal_from_arg("null"), LiteralValue::Null);
        assert_eq!(literal_from_arg("12"), LiteralValue::Number(12.0));
        assert_eq!(literal_from_arg("12px"), LiteralValue::from("12px"));
    }

    #[test]
    fn test_mutations_from_args() {
        let mut args = args(0);
        args.text = Some("Hi".to_string());
        args.styles = vec!["color=red".to_string(), "margin=".to_string()];
        args.attributes = vec!["title=Card".to_string()];

        let mutations = mutations_from(&args).unwrap();
        assert_eq!(mutations.len(), 4);
        assert!(matches!(
            &mutations[2],
            Mutation::SetStyle { property, value: None } if property == "margin"
        ));
    }

    #[test]
    fn test_malformed_pair_rejected() {
        let mut args = args(0);
        args.styles = vec!["color".to_string()];
        assert!(mutations_from(&args).is_err());
    }

    #[test]
    fn test_apply_edits() {
        let output = apply_edits(
            "<div><p>Old</p></div>",
            1,
            vec![
                Mutation::SetText {
                    text: "New".to_string(),
                },
                Mutation::SetStyle {
                    property: "color".to_string(),
                    value: Some("blue".to_string()),
                },
            ],
        )
        .unwrap();

        assert_eq!(
            strip_markers(&output).unwrap(),
            r#"<div><p style={{ color: "blue" }}>New</p></div>"#
        );
    }

    #[test]
    fn test_apply_edits_unknown_identifier() {
        assert!(apply_edits("<div />", 4, Vec::new()).is_err());
    }

    #[test]
    fn test_edit_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("card.jsx");
        std::fs::write(&file, "<section>Hello</section>").unwrap();

        let mut args = args(0);
        args.text = Some("Bye".to_string());
        args.in_place = true;
        edit(args, dir.path().to_str().unwrap()).unwrap();

        let written = std::fs::read_to_string(&file).unwrap();
        assert_eq!(strip_markers(&written).unwrap(), "<section>Bye</section>");
    }
}
