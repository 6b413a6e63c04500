// FICHIER : src/logger.rs

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Sécurité pour éviter la double initialisation, critique lors de
/// l'exécution parallèle des tests unitaires.
static INIT: Once = Once::new();

/// Initialise le logging global : sortie console compacte sur stderr.
/// Le niveau se pilote via RUST_LOG (défaut : info).
pub fn init_logging() {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        // stderr : stdout est réservé aux résultats des commandes
        let _ = tracing_subscriber::fmt()
            .compact()
            .with_target(false)
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
