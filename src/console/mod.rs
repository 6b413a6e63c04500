// FICHIER : src/console/mod.rs

//! Boucle interactive : une commande par ligne, exécutée jusqu'au bout
//! avant la lecture suivante. Sortie sur EOF ou `exit`.

pub mod parser;

use std::io::{self, BufRead, Write};

use serde_json::Value;
use tracing::{error, info};

use crate::database::Database;
use crate::error::{DbError, Result};
use crate::storage::pretty_json;

use parser::parse_command;

pub fn run(db: &Database) -> Result<()> {
    println!("Base initialisée : {}", db.name());
    println!(
        "Entrez vos commandes (ex. {}.users.find({{}})). 'exit' pour quitter.",
        db.name()
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let trimmed = line.trim();
        if trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }

        // Une commande en échec n'arrête pas la session
        if let Err(err) = execute(db, trimmed) {
            error!("{err}");
        }
    }
    Ok(())
}

/// Résout la commande et l'exécute sur la collection visée. Les résultats
/// vont sur stdout, indentation 4 espaces.
pub fn execute(db: &Database, line: &str) -> Result<()> {
    let cmd = parse_command(line)?;

    if cmd.database != db.name() {
        return Err(DbError::UnknownDatabase(cmd.database));
    }
    let collection = db.collection(&cmd.collection)?;
    let args = cmd.args;

    match cmd.method.as_str() {
        "find" => {
            let results = collection.find(&args.first, &args.second);
            println!("{}", pretty_json(&Value::Array(results))?);
        }
        "find_one" => match collection.find_one(&args.first, &args.second) {
            Some(doc) => println!("{}", pretty_json(&doc)?),
            None => println!("null"),
        },
        "insert" => {
            if args.first.is_null() {
                return Err(DbError::ArgumentShape(
                    "insert requiert un document".to_string(),
                ));
            }
            let id = collection.insert(args.first)?;
            println!("Inserted ID: {id}");
        }
        "insert_one" => {
            if args.first.is_null() {
                return Err(DbError::ArgumentShape(
                    "insert_one requiert un document".to_string(),
                ));
            }
            let id = collection.insert_one(args.first)?;
            println!("Inserted ID: {id}");
        }
        "insert_many" => {
            let ids = collection.insert_many(args.first)?;
            info!("{} document(s) inséré(s)", ids.len());
        }
        "update" | "update_one" | "update_many" => {
            if args.first.is_null() || !args.has_second {
                return Err(DbError::ArgumentShape(
                    "update requiert une requête et des opérateurs".to_string(),
                ));
            }
            let multi = match cmd.method.as_str() {
                "update_one" => false,
                "update_many" => true,
                _ => args.multi,
            };
            let touched = collection.update(&args.first, &args.second, multi)?;
            info!("{touched} document(s) mis à jour");
        }
        "delete_one" => {
            let removed = collection.remove(&args.first, false)?;
            info!("{removed} document(s) supprimé(s)");
        }
        "delete_many" => {
            let removed = collection.remove(&args.first, true)?;
            info!("{removed} document(s) supprimé(s)");
        }
        other => return Err(DbError::UnknownMethod(other.to_string())),
    }
    Ok(())
}

// =========================================================================
// TESTS UNITAIRES
// =========================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;
    use serde_json::json;
    use tempfile::tempdir;

    fn open_db(dir: &std::path::Path) -> Database {
        let structure = json!({"users": {"name": "str", "age": "int"}});
        let config = DbConfig {
            name: "testdb".to_string(),
            tuples_limit: 2,
            structure: structure.as_object().cloned().unwrap_or_default(),
        };
        Database::open_in(&config, dir).unwrap()
    }

    fn line(db: &Database, rest: &str) -> String {
        format!("{}.{rest}", db.name())
    }

    #[test]
    fn test_insert_update_delete_through_console() {
        let dir = tempdir().unwrap();
        let db = open_db(dir.path());

        execute(&db, &line(&db, r#"users.insert({"name": "Ada", "age": 36})"#)).unwrap();
        execute(&db, &line(&db, r#"users.insert({"name": "Bob", "age": 20})"#)).unwrap();

        let users = db.collection("users").unwrap();
        assert_eq!(users.find(&json!({}), &Value::Null).len(), 2);

        execute(
            &db,
            &line(&db, r#"users.update({"name": "Ada"}, {"$set": {"age": 37}})"#),
        )
        .unwrap();
        let ada = users.find_one(&json!({"name": "Ada"}), &Value::Null).unwrap();
        assert_eq!(ada["age"], 37);

        execute(&db, &line(&db, r#"users.delete_many({})"#)).unwrap();
        assert!(users.find(&json!({}), &Value::Null).is_empty());
    }

    #[test]
    fn test_update_many_flag_forms() {
        let dir = tempdir().unwrap();
        let db = open_db(dir.path());
        let users = db.collection("users").unwrap();
        for i in 0..3 {
            users.insert(json!({"name": format!("u{i}"), "age": i})).unwrap();
        }

        // multi=True sur update générique
        execute(
            &db,
            &line(&db, r#"users.update({}, {"$set": {"name": "x"}}, multi=True)"#),
        )
        .unwrap();
        assert_eq!(users.find(&json!({"name": "x"}), &Value::Null).len(), 3);

        // update_one ne touche que le premier
        execute(
            &db,
            &line(&db, r#"users.update_one({}, {"$set": {"name": "y"}})"#),
        )
        .unwrap();
        assert_eq!(users.find(&json!({"name": "y"}), &Value::Null).len(), 1);
    }

    #[test]
    fn test_wrong_database_and_method() {
        let dir = tempdir().unwrap();
        let db = open_db(dir.path());

        assert!(matches!(
            execute(&db, "autre.users.find({})"),
            Err(DbError::UnknownDatabase(_))
        ));
        assert!(matches!(
            execute(&db, &line(&db, "users.explode({})")),
            Err(DbError::UnknownMethod(_))
        ));
        assert!(matches!(
            execute(&db, &line(&db, "ghosts.find({})")),
            Err(DbError::UnknownCollection(_))
        ));
    }

    #[test]
    fn test_insert_requires_document() {
        let dir = tempdir().unwrap();
        let db = open_db(dir.path());
        assert!(matches!(
            execute(&db, &line(&db, "users.insert()")),
            Err(DbError::ArgumentShape(_))
        ));
        assert!(matches!(
            execute(&db, &line(&db, "users.update({})")),
            Err(DbError::ArgumentShape(_))
        ));
    }
}
