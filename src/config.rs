// FICHIER : src/config.rs

//! Configuration de la base : nom (aussi dossier de données), plafond
//! d'entrées par chunk, et descripteurs de schéma par collection.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::info;

use crate::error::{DbError, Result};
use crate::storage::pretty_json;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub name: String,
    pub tuples_limit: u32,
    /// collection → sous-schéma (descripteur brut)
    #[serde(default)]
    pub structure: Map<String, Value>,
}

impl DbConfig {
    /// Charge la configuration ; si le fichier manque, écrit le schéma par
    /// défaut puis le relit.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(
                "Configuration absente, écriture du schéma par défaut dans {}",
                path.display()
            );
            let rendered = pretty_json(&Self::default_config())?;
            fs::write(path, rendered)?;
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            DbError::Config(format!("schéma illisible dans {} : {err}", path.display()))
        })?;

        if config.tuples_limit == 0 {
            return Err(DbError::Config(
                "tuples_limit doit être strictement positif".to_string(),
            ));
        }
        Ok(config)
    }

    /// Deux collections de démonstration, dont une structure doublement
    /// imbriquée.
    fn default_config() -> Self {
        let structure = json!({
            "users": {
                "name": "str",
                "age": "int",
                "status": "str",
                "score": "int",
                "hunted": "timestamp"
            },
            "products": {
                "name": "str",
                "specs": {
                    "cpu": "str",
                    "ram": "int",
                    "screen": {
                        "size": "int",
                        "type": "str"
                    }
                }
            }
        });

        Self {
            name: "MyDatabase".to_string(),
            tuples_limit: 5,
            structure: structure.as_object().cloned().unwrap_or_default(),
        }
    }
}
