// FICHIER : src/database.rs

//! Registre des collections : la base possède le dossier de données, le
//! plafond par chunk et le schéma de chaque collection déclarée.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::collections::Collection;
use crate::config::DbConfig;
use crate::error::{DbError, Result};

#[derive(Debug)]
pub struct Database {
    name: String,
    collections: IndexMap<String, Collection>,
}

impl Database {
    /// Matérialise la base dans le dossier courant.
    pub fn open(config: &DbConfig) -> Result<Self> {
        Self::open_in(config, Path::new("."))
    }

    /// Matérialise la base sous `parent` : dossier `<parent>/<name>`, puis
    /// une collection par entrée de `structure` (chacune avec son premier
    /// chunk vide).
    pub fn open_in(config: &DbConfig, parent: &Path) -> Result<Self> {
        let root = parent.join(&config.name);
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }

        let mut collections = IndexMap::new();
        for (col_name, schema) in &config.structure {
            let collection = Collection::open(
                col_name,
                root.join(col_name),
                config.tuples_limit,
                schema.clone(),
            )?;
            collections.insert(col_name.clone(), collection);
        }

        Ok(Self {
            name: config.name.clone(),
            collections,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| DbError::UnknownCollection(name.to_string()))
    }

    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
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

    fn sample_config() -> DbConfig {
        let structure = json!({
            "users": {"name": "str", "age": "int"},
            "products": {"name": "str"}
        });
        DbConfig {
            name: "base".to_string(),
            tuples_limit: 3,
            structure: structure.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_open_materializes_declared_collections() {
        let dir = tempdir().unwrap();
        let db = Database::open_in(&sample_config(), dir.path()).unwrap();

        let names: Vec<&str> = db.collection_names().collect();
        assert_eq!(names, ["users", "products"]);
        assert!(dir.path().join("base/users/1.json").exists());
        assert!(dir.path().join("base/products/1.json").exists());
    }

    #[test]
    fn test_unknown_collection_lookup() {
        let dir = tempdir().unwrap();
        let db = Database::open_in(&sample_config(), dir.path()).unwrap();

        assert!(db.collection("users").is_ok());
        assert!(matches!(
            db.collection("ghosts"),
            Err(DbError::UnknownCollection(_))
        ));
    }

    #[test]
    fn test_roundtrip_through_database() {
        let dir = tempdir().unwrap();
        let db = Database::open_in(&sample_config(), dir.path()).unwrap();

        let users = db.collection("users").unwrap();
        let id = users.insert(json!({"name": "Ada", "age": 36})).unwrap();

        let found = users
            .find_one(&json!({"_id": id}), &serde_json::Value::Null)
            .expect("document persisté");
        assert_eq!(found["name"], "Ada");
    }
}
