// FICHIER : src/ident.rs

use chrono::Utc;

/// Identifiant de document : nanosecondes epoch + suffixe aléatoire.
/// Unique sur la durée de vie du processus ; les collisions ne sont pas
/// détectées.
pub fn new_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let salt: u32 = rand::random();
    format!("{nanos}_{salt}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_id_shape() {
        let id = new_id();
        let (left, right) = id.split_once('_').expect("séparateur _");
        assert!(left.parse::<i64>().is_ok());
        assert!(right.parse::<u32>().is_ok());
    }

    #[test]
    fn test_new_id_uniqueness() {
        let ids: HashSet<String> = (0..500).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 500);
    }
}
