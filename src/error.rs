// FICHIER : src/error.rs

use std::io;
use std::path::PathBuf;

/// Type de résultat standard du moteur.
pub type Result<T> = std::result::Result<T, DbError>;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] io::Error),

    #[error("Document non conforme au schéma de la collection '{0}'")]
    SchemaMismatch(String),

    #[error("Horodatage invalide : '{0}' (forme attendue YYYY-MM-DDTHH:MM:SS)")]
    TimestampFormat(String),

    #[error("Mise à jour incompatible sur le champ '{field}' : {reason}")]
    UpdateTypeMismatch { field: String, reason: String },

    #[error("Échec d'écriture du chunk {path:?} : {source}")]
    ChunkIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Argument invalide : {0}")]
    ArgumentShape(String),

    #[error("Collection inconnue : '{0}'")]
    UnknownCollection(String),

    #[error("Base de données inconnue : '{0}'")]
    UnknownDatabase(String),

    #[error("Méthode inconnue : '{0}'")]
    UnknownMethod(String),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),
}
