// FICHIER : src/console/parser.rs

//! Analyse des lignes de commande `base.collection.methode(arguments)`.
//!
//! Les arguments sont découpés sur les virgules de premier niveau (balance
//! des accolades et crochets), puis lus comme JSON positionnel ou comme
//! paramètre nommé (`projection=`, `multi=`). Un argument illisible est
//! journalisé et ignoré, la commande continue.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::{DbError, Result};

fn command_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)\.(\w+)\.(\w+)\((.*)\)$").expect("motif commande"))
}

#[derive(Debug)]
pub struct Command {
    pub database: String,
    pub collection: String,
    pub method: String,
    pub args: ParsedArgs,
}

/// Arguments résolus : premier (requête ou document), second (opérateurs ou
/// projection), drapeau multi.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    pub first: Value,
    pub second: Value,
    pub has_second: bool,
    pub multi: bool,
}

pub fn parse_command(line: &str) -> Result<Command> {
    let caps = command_pattern().captures(line).ok_or_else(|| {
        DbError::ArgumentShape("syntaxe attendue : base.collection.methode(arguments)".to_string())
    })?;

    let args = parse_arguments(&split_arguments(&caps[4]));
    Ok(Command {
        database: caps[1].to_string(),
        collection: caps[2].to_string(),
        method: caps[3].to_string(),
        args,
    })
}

/// Découpe la liste d'arguments sur les virgules hors objets/tableaux.
pub fn split_arguments(raw: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut buffer = String::new();
    let mut braces = 0i32;
    let mut brackets = 0i32;

    for c in raw.chars() {
        match c {
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
        if c == ',' && braces == 0 && brackets == 0 {
            let trimmed = buffer.trim();
            if !trimmed.is_empty() {
                args.push(trimmed.to_string());
            }
            buffer.clear();
        } else {
            buffer.push(c);
        }
    }

    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        args.push(trimmed.to_string());
    }
    args
}

fn parse_arguments(raw_args: &[String]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();

    for (position, arg) in raw_args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("projection=") {
            match serde_json::from_str(value) {
                Ok(projection) => {
                    parsed.second = projection;
                    parsed.has_second = true;
                }
                Err(err) => warn!("Projection JSON invalide : {err}"),
            }
            continue;
        }

        if arg.contains("multi=") {
            parsed.multi = arg.contains("True") || arg.contains("true");
            continue;
        }

        match serde_json::from_str::<Value>(arg) {
            Ok(value) => match position {
                0 => parsed.first = value,
                1 => {
                    parsed.second = value;
                    parsed.has_second = true;
                }
                _ => warn!("Argument surnuméraire ignoré (position {})", position + 1),
            },
            Err(err) => warn!("JSON invalide à l'argument {} : {err}", position + 1),
        }
    }
    parsed
}
