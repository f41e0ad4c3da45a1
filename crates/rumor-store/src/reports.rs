use rusqlite::params;

use rumor_core::Report;

use crate::error::Result;
use crate::store::Store;

impl Store {
    pub fn put_report(&self, table: &str, report: &Report) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO reports (table_name, id, created_at, body)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                table,
                report.id.to_string(),
                report.created_at as i64,
                report.to_json()?
            ],
        )?;
        Ok(())
    }

    /// Reports with `from <= created_at < to`, oldest first.
    pub fn reports_between(&self, table: &str, from: u64, to: u64) -> Result<Vec<Report>> {
        let mut stmt = self.conn().prepare(
            "SELECT body FROM reports
             WHERE table_name = ?1 AND created_at >= ?2 AND created_at < ?3
             ORDER BY created_at",
        )?;
        let bodies: Vec<String> = stmt
            .query_map(params![table, from as i64, to as i64], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;

        let mut reports = Vec::with_capacity(bodies.len());
        for body in bodies {
            reports.push(Report::from_json(&body)?);
        }
        Ok(reports)
    }
}
