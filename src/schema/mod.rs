// FICHIER : src/schema/mod.rs

//! Validation des documents contre le schéma déclaré de la collection.
//!
//! Le schéma est un descripteur récursif : champ → étiquette de type
//! (`int`, `str`/`string`, `timestamp`) ou sous-schéma imbriqué. Schéma
//! ouvert dans les deux sens : seuls les champs présents à la fois dans le
//! document et dans le schéma sont contrôlés.

use serde_json::Value;

use crate::timestamp::Timestamp;

/// Vérifie récursivement `doc` contre le descripteur `schema`.
/// La validation n'est appliquée qu'à l'insertion.
pub fn validate_document(doc: &Value, schema: &Value) -> bool {
    let Some(fields) = schema.as_object() else {
        return true; // descripteur inexploitable : rien à contrôler
    };

    for (key, node) in fields {
        // Champ absent du document : optionnel, accepté
        let Some(value) = doc.get(key) else {
            continue;
        };

        match node {
            // Sous-schéma : la valeur doit être un objet, puis récursion
            Value::Object(_) => {
                if !value.is_object() || !validate_document(value, node) {
                    return false;
                }
            }
            Value::String(tag) => {
                if !check_type(value, tag) {
                    return false;
                }
            }
            // Descripteur inconnu, ignoré
            _ => {}
        }
    }
    true
}

fn check_type(value: &Value, tag: &str) -> bool {
    match tag {
        // Entier strict : ni flottant, ni booléen
        "int" => value.is_i64() || value.is_u64(),
        "str" | "string" => value.is_string(),
        "timestamp" => value
            .as_str()
            .is_some_and(|raw| Timestamp::parse(raw).is_ok()),
        // Étiquette non reconnue : acceptée
        _ => true,
    }
}
