// FICHIER : src/query/update.rs

//! Application des opérateurs de mise à jour : `$set`, puis `$inc`, puis
//! `$push`. Un opérateur en échec est journalisé et sauté ; les suivants
//! s'appliquent quand même. `_id` n'est jamais réassigné.

use serde_json::Value;
use tracing::warn;

use crate::error::{DbError, Result};
use crate::timestamp::Timestamp;

/// Applique `ops` sur `doc` en place. `schema` est le descripteur de la
/// collection : il pilote le `$inc` typé (champ `timestamp` → arithmétique
/// en secondes). Renvoie vrai si le document a changé.
pub fn apply_update(doc: &mut Value, ops: &Value, schema: &Value) -> bool {
    let mut changed = false;

    if let Some(assignments) = ops.get("$set").and_then(Value::as_object) {
        for (field, value) in assignments {
            if field == "_id" {
                warn!("$set sur _id refusé : l'identifiant est immuable");
                continue;
            }
            if let Some(fields) = doc.as_object_mut() {
                fields.insert(field.clone(), value.clone());
                changed = true;
            }
        }
    }

    if let Some(increments) = ops.get("$inc").and_then(Value::as_object) {
        for (field, delta) in increments {
            if field == "_id" {
                warn!("$inc sur _id refusé : l'identifiant est immuable");
                continue;
            }
            match apply_inc(doc, field, delta, schema) {
                Ok(()) => changed = true,
                Err(err) => warn!("$inc sauté : {err}"),
            }
        }
    }

    if let Some(pushes) = ops.get("$push").and_then(Value::as_object) {
        for (field, item) in pushes {
            if field == "_id" {
                warn!("$push sur _id refusé : l'identifiant est immuable");
                continue;
            }
            match apply_push(doc, field, item) {
                Ok(()) => changed = true,
                Err(err) => warn!("$push sauté : {err}"),
            }
        }
    }

    changed
}

fn mismatch(field: &str, reason: &str) -> DbError {
    DbError::UpdateTypeMismatch {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn apply_inc(doc: &mut Value, field: &str, delta: &Value, schema: &Value) -> Result<()> {
    let delta = delta
        .as_i64()
        .ok_or_else(|| mismatch(field, "l'incrément doit être un entier"))?;

    let current = doc
        .get(field)
        .ok_or_else(|| mismatch(field, "champ absent du document"))?;

    // Dispatch de type via le schéma de la collection
    let field_type = schema.get(field).and_then(Value::as_str).unwrap_or("");

    let next = if field_type == "timestamp" {
        let raw = current
            .as_str()
            .ok_or_else(|| mismatch(field, "un horodatage est attendu"))?;
        let mut ts = Timestamp::parse(raw)?;
        ts.add_seconds(delta);
        Value::String(ts.to_string())
    } else {
        let n = current
            .as_i64()
            .ok_or_else(|| mismatch(field, "un entier est attendu"))?;
        Value::from(n + delta)
    };

    if let Some(fields) = doc.as_object_mut() {
        fields.insert(field.to_string(), next);
    }
    Ok(())
}

fn apply_push(doc: &mut Value, field: &str, item: &Value) -> Result<()> {
    let Some(fields) = doc.as_object_mut() else {
        return Err(mismatch(field, "le document n'est pas un objet"));
    };

    // Champ absent : on démarre un tableau vide
    let slot = fields
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));

    match slot.as_array_mut() {
        Some(items) => {
            items.push(item.clone());
            Ok(())
        }
        None => Err(mismatch(field, "le champ n'est pas un tableau")),
    }
}
