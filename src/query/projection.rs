// FICHIER : src/query/projection.rs

//! Restriction d'un document aux champs demandés.

use serde_json::{Map, Value};

/// Applique `projection` sur `doc`.
///
/// Projection absente ou vide : document entier. Tableau de noms : les
/// champs listés, dans l'ordre de la projection, quand ils existent. Objet :
/// chaque clé dont la valeur est vraie (1/true) et qui existe dans le
/// document. `_id` ne sort que s'il est explicitement demandé.
pub fn project_document(doc: &Value, projection: &Value) -> Value {
    let Some(fields) = doc.as_object() else {
        return doc.clone();
    };

    match projection {
        Value::Array(names) if !names.is_empty() => {
            let mut out = Map::new();
            for name in names {
                let Some(key) = name.as_str() else { continue };
                if let Some(value) = fields.get(key) {
                    out.insert(key.to_string(), value.clone());
                }
            }
            Value::Object(out)
        }
        Value::Object(flags) if !flags.is_empty() => {
            let mut out = Map::new();
            for (key, flag) in flags {
                if !is_requested(flag) {
                    continue;
                }
                if let Some(value) = fields.get(key) {
                    out.insert(key.clone(), value.clone());
                }
            }
            Value::Object(out)
        }
        _ => doc.clone(),
    }
}

fn is_requested(flag: &Value) -> bool {
    match flag {
        Value::Bool(wanted) => *wanted,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}
