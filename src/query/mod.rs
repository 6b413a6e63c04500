// FICHIER : src/query/mod.rs

//! Interprétation des requêtes à opérateurs (style MongoDB).
//!
//! Une requête est un objet JSON lu comme un ET de clauses. Les opérateurs
//! logiques `$and` / `$or` ne sont reconnus qu'à la racine ; partout
//! ailleurs une clause `champ: condition` s'évalue sur `doc[champ]`, un
//! champ absent valant null. L'évaluation est pure : ni le document ni la
//! requête ne sont modifiés.

pub mod projection;
pub mod update;

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

/// Vrai quand `doc` satisfait `query`. La requête vide (ou null, pour un
/// appel sans argument) accepte tout document.
pub fn match_document(doc: &Value, query: &Value) -> bool {
    let clauses = match query.as_object() {
        Some(clauses) => clauses,
        None => return query.is_null(),
    };
    if clauses.is_empty() {
        return true;
    }

    // Opérateurs logiques de tête : ils court-circuitent le reste
    if let Some(subs) = clauses.get("$and").and_then(Value::as_array) {
        return subs.iter().all(|sub| match_document(doc, sub));
    }
    if let Some(subs) = clauses.get("$or").and_then(Value::as_array) {
        return subs.iter().any(|sub| match_document(doc, sub));
    }

    for (field, condition) in clauses {
        if field.starts_with('$') {
            continue;
        }
        let value = doc.get(field).unwrap_or(&Value::Null);
        if !check_condition(value, condition) {
            return false;
        }
    }
    true
}

/// Évalue une condition de champ.
pub fn check_condition(value: &Value, condition: &Value) -> bool {
    let Some(cond_map) = condition.as_object() else {
        // Condition scalaire : égalité structurelle
        return value == condition;
    };

    let has_operators = cond_map.keys().any(|key| key.starts_with('$'));
    if !has_operators {
        // Objet sans opérateur : requête sur document imbriqué
        if value.is_object() {
            return match_document(value, condition);
        }
        return value == condition;
    }

    // Carte d'opérateurs : tous doivent tenir
    for (op, arg) in cond_map {
        let holds = match op.as_str() {
            "$eq" => value == arg,
            "$ne" => value != arg,
            "$gt" => matches!(compare_values(value, arg), Some(Ordering::Greater)),
            "$lt" => matches!(compare_values(value, arg), Some(Ordering::Less)),
            "$gte" => matches!(
                compare_values(value, arg),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            "$lte" => matches!(
                compare_values(value, arg),
                Some(Ordering::Less | Ordering::Equal)
            ),
            "$in" => arg
                .as_array()
                .is_some_and(|items| items.iter().any(|item| item == value)),
            "$not" => !check_condition(value, arg),
            unknown => {
                debug!("Opérateur non reconnu, accepté par défaut : {unknown}");
                true
            }
        };
        if !holds {
            return false;
        }
    }
    true
}

/// Ordre des valeurs pour `$gt`/`$lt`/`$gte`/`$lte`. `None` quand la valeur
/// de gauche est nulle : un champ absent ne satisfait aucune comparaison
/// ordonnée.
pub fn compare_values(value: &Value, other: &Value) -> Option<Ordering> {
    if value.is_null() {
        return None;
    }
    Some(compare_json_values(value, other))
}

/// Ordre total sur les valeurs : nombres en numérique, chaînes en
/// lexicographique, booléens false < true, tableaux élément par élément
/// puis par longueur, objets par paires d'entrées. Deux genres différents
/// se départagent par rang : null < bool < nombre < chaîne < tableau <
/// objet.
fn compare_json_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(i), Some(j)) = (x.as_i64(), y.as_i64()) {
                i.cmp(&j)
            } else {
                let fx = x.as_f64().unwrap_or_default();
                let fy = y.as_f64().unwrap_or_default();
                fx.partial_cmp(&fy).unwrap_or(Ordering::Equal)
            }
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (xi, yi) in x.iter().zip(y) {
                let ord = compare_json_values(xi, yi);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Object(x), Value::Object(y)) => {
            for ((xk, xv), (yk, yv)) in x.iter().zip(y) {
                let ord = xk.cmp(yk);
                if ord != Ordering::Equal {
                    return ord;
                }
                let ord = compare_json_values(xv, yv);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
