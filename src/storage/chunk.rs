// FICHIER : src/storage/chunk.rs

//! Magasin de chunks : un dossier de fichiers `<N>.json` dont les clés de
//! premier niveau sont les identifiants de documents. Seul le chunk de
//! numéro maximal reçoit les insertions ; il déborde vers `N+1` quand il
//! atteint `tuples_limit`. Les chunks ne sont jamais renumérotés ni
//! compactés.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::error::{DbError, Result};
use crate::storage::pretty_json;

/// Contenu d'un chunk : id → document, ordre d'insertion préservé.
pub type ChunkMap = serde_json::Map<String, Value>;

fn chunk_file_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\.json$").expect("motif nom de chunk"))
}

#[derive(Debug)]
pub struct ChunkStore {
    dir: PathBuf,
    tuples_limit: usize,
}

impl ChunkStore {
    pub fn new(dir: PathBuf, tuples_limit: u32) -> Self {
        Self {
            dir,
            tuples_limit: tuples_limit as usize,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn chunk_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("{index}.json"))
    }

    /// Numéros de chunks présents sur disque, triés. Dossier absent ou sans
    /// fichier conforme : `[1]`, sans rien créer. Les fichiers étrangers
    /// sont ignorés avec un avertissement.
    pub fn chunk_indices(&self) -> Vec<u32> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return vec![1],
        };

        let mut indices = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let parsed = chunk_file_pattern()
                .captures(name)
                .and_then(|caps| caps[1].parse::<u32>().ok());
            match parsed {
                Some(index) => indices.push(index),
                None => warn!(
                    "Fichier ignoré dans {} : {name}",
                    self.dir.display()
                ),
            }
        }

        if indices.is_empty() {
            indices.push(1);
        }
        indices.sort_unstable();
        indices
    }

    /// Charge un chunk. Fichier absent, vide ou illisible : carte vide (le
    /// scan continue, l'échec de parse est journalisé).
    pub fn load_chunk(&self, index: u32) -> ChunkMap {
        let path = self.chunk_path(index);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(_) => return ChunkMap::new(),
        };
        if raw.trim().is_empty() {
            return ChunkMap::new();
        }

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!(
                    "Chunk {} sans objet racine, traité comme vide",
                    path.display()
                );
                ChunkMap::new()
            }
            Err(err) => {
                warn!(
                    "Chunk {} illisible ({err}), traité comme vide",
                    path.display()
                );
                ChunkMap::new()
            }
        }
    }

    /// Réécrit un chunk entier (écriture + fermeture, pas de fsync : un
    /// seul écrivain à la fois).
    pub fn save_chunk(&self, index: u32, chunk: &ChunkMap) -> Result<()> {
        let path = self.chunk_path(index);
        let payload = pretty_json(chunk)?;
        fs::write(&path, payload).map_err(|source| DbError::ChunkIo { path, source })
    }

    /// Ajoute un document dans le chunk de queue ; ouvre le chunk suivant
    /// quand la queue a atteint `tuples_limit`.
    pub fn append_document(&self, id: &str, document: Value) -> Result<()> {
        let indices = self.chunk_indices();
        let mut tail = indices.last().copied().unwrap_or(1);
        let mut chunk = self.load_chunk(tail);

        if chunk.len() >= self.tuples_limit {
            tail += 1;
            chunk = ChunkMap::new();
        }

        chunk.insert(id.to_string(), document);
        self.save_chunk(tail, &chunk)
    }
}

// =========================================================================
// TESTS UNITAIRES
// =========================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn store_in(dir: &Path, limit: u32) -> ChunkStore {
        ChunkStore::new(dir.to_path_buf(), limit)
    }

    #[test]
    fn test_indices_fallback_without_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absente");
        let store = store_in(&missing, 5);
        assert_eq!(store.chunk_indices(), vec![1]);
        // Le dossier n'est pas créé par la lecture
        assert!(!missing.exists());
    }

    #[test]
    fn test_indices_sorted_and_strays_ignored() {
        let dir = tempdir().unwrap();
        for name in ["3.json", "1.json", "10.json", "notes.txt", "x.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        let store = store_in(dir.path(), 5);
        assert_eq!(store.chunk_indices(), vec![1, 3, 10]);
    }

    #[test]
    fn test_load_missing_empty_or_corrupt_chunk() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 5);
        assert!(store.load_chunk(1).is_empty());

        fs::write(dir.path().join("1.json"), "").unwrap();
        assert!(store.load_chunk(1).is_empty());

        fs::write(dir.path().join("2.json"), "{ cassé").unwrap();
        assert!(store.load_chunk(2).is_empty());

        fs::write(dir.path().join("3.json"), "[1, 2]").unwrap();
        assert!(store.load_chunk(3).is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 5);

        let mut chunk = ChunkMap::new();
        chunk.insert("a".into(), json!({"_id": "a", "n": 1}));
        chunk.insert("b".into(), json!({"_id": "b", "n": 2}));
        store.save_chunk(1, &chunk).unwrap();

        let loaded = store.load_chunk(1);
        assert_eq!(loaded, chunk);
        // Ordre d'insertion préservé
        let keys: Vec<&String> = loaded.keys().collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_append_rolls_over_at_limit() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 2);

        store.append_document("d1", json!({"_id": "d1"})).unwrap();
        store.append_document("d2", json!({"_id": "d2"})).unwrap();
        store.append_document("d3", json!({"_id": "d3"})).unwrap();

        assert_eq!(store.chunk_indices(), vec![1, 2]);
        let first = store.load_chunk(1);
        assert_eq!(first.len(), 2);
        assert!(first.contains_key("d1") && first.contains_key("d2"));
        let second = store.load_chunk(2);
        assert_eq!(second.len(), 1);
        assert!(second.contains_key("d3"));
    }

    #[test]
    fn test_append_targets_highest_chunk_only() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 2);

        // Chunk 1 plein, chunk 3 creux : l'insertion va en queue (3)
        fs::write(
            dir.path().join("1.json"),
            pretty_json(&json!({"a": {"_id": "a"}, "b": {"_id": "b"}})).unwrap(),
        )
        .unwrap();
        fs::write(dir.path().join("3.json"), "{}").unwrap();

        store.append_document("c", json!({"_id": "c"})).unwrap();
        assert!(store.load_chunk(3).contains_key("c"));
        assert_eq!(store.load_chunk(1).len(), 2);
    }

    #[test]
    fn test_chunks_written_with_four_space_indent() {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path(), 5);
        let mut chunk = ChunkMap::new();
        chunk.insert("a".into(), json!({"_id": "a"}));
        store.save_chunk(1, &chunk).unwrap();

        let raw = fs::read_to_string(dir.path().join("1.json")).unwrap();
        assert!(raw.contains("\n    \"a\""));
    }
}
