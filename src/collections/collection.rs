// FICHIER : src/collections/collection.rs

//! Une collection : un dossier de chunks, un schéma, et les opérations
//! CRUD par balayage. Le disque est la seule source de vérité, aucun cache
//! mémoire. Ordre de balayage : chunks par numéro croissant, documents dans
//! l'ordre d'insertion du chunk.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tracing::warn;

use crate::error::{DbError, Result};
use crate::ident;
use crate::query::projection::project_document;
use crate::query::update::apply_update;
use crate::query::match_document;
use crate::schema::validate_document;
use crate::storage::ChunkStore;

#[derive(Debug)]
pub struct Collection {
    name: String,
    schema: Value,
    store: ChunkStore,
}

impl Collection {
    /// Matérialise la collection : dossier créé au besoin, avec un premier
    /// chunk vide `1.json`.
    pub fn open(name: &str, dir: PathBuf, tuples_limit: u32, schema: Value) -> Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            fs::write(dir.join("1.json"), "{}")?;
        }
        Ok(Self {
            name: name.to_string(),
            schema,
            store: ChunkStore::new(dir, tuples_limit),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insère un document : validation de schéma d'abord (aucune écriture
    /// en cas de refus), `_id` assigné s'il manque, jamais réassigné.
    /// Renvoie l'identifiant.
    ///
    /// Les mises à jour ultérieures ne re-valident pas : un `$set` peut
    /// introduire une valeur que l'insertion aurait refusée.
    pub fn insert(&self, mut document: Value) -> Result<String> {
        if !document.is_object() {
            return Err(DbError::ArgumentShape(
                "un document objet est attendu".to_string(),
            ));
        }
        if !validate_document(&document, &self.schema) {
            return Err(DbError::SchemaMismatch(self.name.clone()));
        }

        let id = match document.get("_id").and_then(Value::as_str) {
            Some(existing) => existing.to_string(),
            None => ident::new_id(),
        };
        if let Some(fields) = document.as_object_mut() {
            fields.insert("_id".to_string(), Value::String(id.clone()));
        }

        self.store.append_document(&id, document)?;
        Ok(id)
    }

    /// Comme `insert`, mais refuse un tableau.
    pub fn insert_one(&self, document: Value) -> Result<String> {
        if document.is_array() {
            return Err(DbError::ArgumentShape(
                "un seul document est attendu".to_string(),
            ));
        }
        self.insert(document)
    }

    /// Insertion par lot : chaque élément passe par `insert`, un élément
    /// refusé n'arrête pas les suivants. Renvoie les identifiants insérés.
    pub fn insert_many(&self, documents: Value) -> Result<Vec<String>> {
        let Value::Array(items) = documents else {
            return Err(DbError::ArgumentShape(
                "insert_many attend un tableau de documents".to_string(),
            ));
        };

        let mut ids = Vec::new();
        for item in items {
            match self.insert(item) {
                Ok(id) => ids.push(id),
                Err(err) => warn!("Document du lot refusé : {err}"),
            }
        }
        Ok(ids)
    }

    /// Tous les documents satisfaisant `query`, projetés, dans l'ordre de
    /// balayage.
    pub fn find(&self, query: &Value, projection: &Value) -> Vec<Value> {
        self.scan(query, projection, false)
    }

    /// Premier document satisfaisant `query` dans l'ordre de balayage.
    pub fn find_one(&self, query: &Value, projection: &Value) -> Option<Value> {
        self.scan(query, projection, true).into_iter().next()
    }

    fn scan(&self, query: &Value, projection: &Value, first_only: bool) -> Vec<Value> {
        let mut results = Vec::new();
        for index in self.store.chunk_indices() {
            let chunk = self.store.load_chunk(index);
            for document in chunk.values() {
                if !match_document(document, query) {
                    continue;
                }
                results.push(project_document(document, projection));
                if first_only {
                    return results;
                }
            }
        }
        results
    }

    /// Applique `ops` sur chaque document correspondant ; s'arrête après le
    /// premier sans `multi`. Chaque chunk modifié n'est réécrit qu'une
    /// fois. Renvoie le nombre de documents touchés.
    pub fn update(&self, query: &Value, ops: &Value, multi: bool) -> Result<usize> {
        let mut touched = 0usize;

        for index in self.store.chunk_indices() {
            let mut chunk = self.store.load_chunk(index);
            let mut dirty = false;

            for document in chunk.values_mut() {
                if !match_document(document, query) {
                    continue;
                }
                if apply_update(document, ops, &self.schema) {
                    dirty = true;
                }
                touched += 1;
                if !multi {
                    break;
                }
            }

            if dirty {
                self.store.save_chunk(index, &chunk)?;
            }
            if !multi && touched > 0 {
                break;
            }
        }
        Ok(touched)
    }

    /// Supprime les documents correspondants ; s'arrête après le premier
    /// sans `multi`. Renvoie le nombre de suppressions. Les chunks ne sont
    /// jamais renumérotés ni fusionnés après suppression.
    pub fn remove(&self, query: &Value, multi: bool) -> Result<usize> {
        let mut removed = 0usize;

        for index in self.store.chunk_indices() {
            let mut chunk = self.store.load_chunk(index);

            let mut doomed = Vec::new();
            for (id, document) in &chunk {
                if match_document(document, query) {
                    doomed.push(id.clone());
                    if !multi {
                        break;
                    }
                }
            }

            if !doomed.is_empty() {
                for id in &doomed {
                    // shift_remove : l'ordre des documents restants tient
                    chunk.shift_remove(id);
                }
                removed += doomed.len();
                self.store.save_chunk(index, &chunk)?;
            }
            if !multi && removed > 0 {
                break;
            }
        }
        Ok(removed)
    }
}
