use rusqlite::params;

use rumor_core::{PREFERENCE_TYPE_KEYWORD, Preference};

use crate::error::{Result, StoreError};
use crate::store::Store;

impl Store {
    /// All keyword preferences in a table, ordered by keyword.
    pub fn preferences(&self, table: &str) -> Result<Vec<Preference>> {
        let mut stmt = self.conn().prepare(
            "SELECT preference_key, preference_weight FROM preferences
             WHERE table_name = ?1 AND preference_type = ?2
             ORDER BY preference_key",
        )?;
        let preferences: Vec<Preference> = stmt
            .query_map(params![table, PREFERENCE_TYPE_KEYWORD], |row| {
                Ok(Preference {
                    keyword: row.get(0)?,
                    weight: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<_, _>>()?;

        tracing::info!("Found {} keywords", preferences.len());
        Ok(preferences)
    }

    /// Insert or replace a keyword's weight. Weights must be positive.
    pub fn put_preference(&self, table: &str, preference: &Preference) -> Result<()> {
        if !(preference.weight > 0.0 && preference.weight.is_finite()) {
            return Err(StoreError::InvalidData(format!(
                "weight for '{}' must be positive, got {}",
                preference.keyword, preference.weight
            )));
        }
        if preference.keyword.is_empty() {
            return Err(StoreError::InvalidData("empty keyword".to_string()));
        }
        self.conn().execute(
            "INSERT OR REPLACE INTO preferences
                (table_name, preference_type, preference_key, preference_weight)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                table,
                PREFERENCE_TYPE_KEYWORD,
                preference.keyword,
                preference.weight
            ],
        )?;
        Ok(())
    }
}
