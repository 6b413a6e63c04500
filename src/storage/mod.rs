// FICHIER : src/storage/mod.rs

//! Couche disque : chunks JSON numérotés par collection.

pub mod chunk;

pub use chunk::{ChunkMap, ChunkStore};

use serde::Serialize;

/// Rendu JSON lisible, indentation 4 espaces (format des chunks et de la
/// sortie console).
pub fn pretty_json(value: &impl Serialize) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
