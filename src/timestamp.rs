// FICHIER : src/timestamp.rs

//! Horodatage logique au format canonique `YYYY-MM-DDTHH:MM:SS`.
//! Stocké dans les documents comme chaîne ; arithmétique à la seconde.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{DbError, Result};

fn canonical_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("motif horodatage")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
    second: i64,
}

impl Timestamp {
    /// Analyse stricte : exactement la forme canonique à 19 caractères
    /// ET une date logiquement valide.
    pub fn parse(raw: &str) -> Result<Self> {
        if !canonical_pattern().is_match(raw) {
            return Err(DbError::TimestampFormat(raw.to_string()));
        }

        // Les positions sont garanties par la regex
        let field = |range: std::ops::Range<usize>| {
            raw[range]
                .parse::<i64>()
                .map_err(|_| DbError::TimestampFormat(raw.to_string()))
        };

        let ts = Self {
            year: field(0..4)?,
            month: field(5..7)?,
            day: field(8..10)?,
            hour: field(11..13)?,
            minute: field(14..16)?,
            second: field(17..19)?,
        };

        if !ts.validate() {
            return Err(DbError::TimestampFormat(raw.to_string()));
        }
        Ok(ts)
    }

    fn is_leap(year: i64) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    fn days_in_month(month: i64, year: i64) -> i64 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if Self::is_leap(year) => 29,
            2 => 28,
            _ => 0,
        }
    }

    /// Validité logique de la date (règle grégorienne pour février).
    pub fn validate(&self) -> bool {
        if self.month < 1 || self.month > 12 {
            return false;
        }
        if self.day < 1 || self.day > Self::days_in_month(self.month, self.year) {
            return false;
        }
        if self.hour < 0 || self.hour > 23 {
            return false;
        }
        if self.minute < 0 || self.minute > 59 {
            return false;
        }
        if self.second < 0 || self.second > 59 {
            return false;
        }
        true
    }

    /// Décale l'horodatage de `delta` secondes, signées.
    /// Les retenues cascadent secondes → minutes → heures → jours, puis les
    /// jours traversent les mois (et les années) via `days_in_month`.
    pub fn add_seconds(&mut self, delta: i64) {
        self.second += delta;

        while self.second >= 60 {
            self.second -= 60;
            self.minute += 1;
        }
        while self.second < 0 {
            self.second += 60;
            self.minute -= 1;
        }
        while self.minute >= 60 {
            self.minute -= 60;
            self.hour += 1;
        }
        while self.minute < 0 {
            self.minute += 60;
            self.hour -= 1;
        }
        while self.hour >= 24 {
            self.hour -= 24;
            self.day += 1;
        }
        while self.hour < 0 {
            self.hour += 24;
            self.day -= 1;
        }

        // Normalisation des jours : emprunt vers le mois précédent,
        // report vers le mois suivant
        loop {
            if self.day < 1 {
                self.month -= 1;
                if self.month < 1 {
                    self.month = 12;
                    self.year -= 1;
                }
                self.day += Self::days_in_month(self.month, self.year);
            } else {
                let dim = Self::days_in_month(self.month, self.year);
                if self.day <= dim {
                    break;
                }
                self.day -= dim;
                self.month += 1;
                if self.month > 12 {
                    self.month = 1;
                    self.year += 1;
                }
            }
        }
    }
}

impl fmt::Display for Timestamp {
    /// Forme canonique, zéro-paddée.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
