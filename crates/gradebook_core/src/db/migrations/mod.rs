//! Schema versioning for the gradebook store.
//!
//! Each step is an embedded SQL script tagged with the `user_version` it
//! leaves behind. Pending steps run inside one transaction, so a database is
//! either fully upgraded or untouched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "assessments",
    sql: include_str!("0001_init.sql"),
}];

/// Version range covered by one `migrate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationReport {
    pub from_version: u32,
    pub to_version: u32,
}

impl MigrationReport {
    /// Number of schema steps that ran.
    pub fn applied(&self) -> u32 {
        self.to_version - self.from_version
    }
}

/// Highest schema version this build understands.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings the connection's schema up to `latest_version()`.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
pub(crate) fn migrate(conn: &mut Connection) -> DbResult<MigrationReport> {
    let from_version = schema_version(conn)?;
    let to_version = latest_version();
    if from_version > to_version {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: to_version,
        });
    }

    let pending = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version);
    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok step={} version={}",
            step.name, step.version
        );
    }
    tx.commit()?;

    Ok(MigrationReport {
        from_version,
        to_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_steps_are_contiguous_from_one() {
        for (index, step) in SCHEMA_STEPS.iter().enumerate() {
            assert_eq!(step.version as usize, index + 1, "step {}", step.name);
        }
    }

    #[test]
    fn migrate_reports_applied_steps_once() {
        let mut conn = Connection::open_in_memory().unwrap();

        let first = migrate(&mut conn).unwrap();
        assert_eq!(first.from_version, 0);
        assert_eq!(first.applied(), latest_version());

        let second = migrate(&mut conn).unwrap();
        assert_eq!(second.applied(), 0);
        assert_eq!(schema_version(&conn).unwrap(), latest_version());
    }
}
