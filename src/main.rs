// FICHIER : src/main.rs

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use jsondb::config::DbConfig;
use jsondb::database::Database;
use jsondb::{console, logger};

#[derive(Parser, Debug)]
#[command(
    name = "jsondb",
    about = "Base documentaire JSON : schémas, chunks, requêtes à opérateurs"
)]
struct Cli {
    /// Fichier de configuration du schéma (créé avec des valeurs par défaut
    /// s'il manque)
    #[arg(long, default_value = "schema.json")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logger::init_logging();

    let cli = Cli::parse();
    let config = DbConfig::load_or_default(&cli.config)
        .with_context(|| format!("Chargement de {}", cli.config.display()))?;
    let db = Database::open(&config).context("Initialisation de la base")?;

    console::run(&db)?;
    Ok(())
}
