//! Assessment repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `assessments` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Listing order is `due_date ASC, id ASC`.

use crate::db::DbError;
use crate::model::assessment::{
    Assessment, AssessmentId, AssessmentValidationError, NewAssessment,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ASSESSMENT_SELECT_SQL: &str = "SELECT
    id,
    title,
    weight_pct,
    due_date,
    score_pct
FROM assessments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for assessment persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AssessmentValidationError),
    Db(DbError),
    NotFound(AssessmentId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "assessment not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted assessment data: {message}")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<AssessmentValidationError> for RepoError {
    fn from(value: AssessmentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Record-store interface for assessments.
pub trait AssessmentRepository {
    /// Inserts a new record and returns it with its assigned id.
    fn create_assessment(&self, input: &NewAssessment) -> RepoResult<Assessment>;
    /// Replaces every mutable field of an existing record.
    fn update_assessment(&self, assessment: &Assessment) -> RepoResult<()>;
    fn get_assessment(&self, id: AssessmentId) -> RepoResult<Option<Assessment>>;
    /// Lists all records ordered by due date.
    fn list_assessments(&self) -> RepoResult<Vec<Assessment>>;
    /// Permanently removes one record.
    fn delete_assessment(&self, id: AssessmentId) -> RepoResult<()>;
}

/// SQLite-backed assessment repository.
pub struct SqliteAssessmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAssessmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'assessments'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists == 0 {
            return Err(RepoError::MissingRequiredTable("assessments"));
        }
        Ok(Self { conn })
    }
}

impl AssessmentRepository for SqliteAssessmentRepository<'_> {
    fn create_assessment(&self, input: &NewAssessment) -> RepoResult<Assessment> {
        let input = input.normalized()?;

        self.conn.execute(
            "INSERT INTO assessments (
                title,
                weight_pct,
                due_date,
                score_pct
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                input.title.as_str(),
                input.weight_pct,
                input.due_date,
                input.score_pct,
            ],
        )?;

        Ok(Assessment {
            id: self.conn.last_insert_rowid(),
            title: input.title,
            weight_pct: input.weight_pct,
            due_date: input.due_date,
            score_pct: input.score_pct,
        })
    }

    fn update_assessment(&self, assessment: &Assessment) -> RepoResult<()> {
        assessment.validate()?;

        let changed = self.conn.execute(
            "UPDATE assessments
             SET
                title = ?1,
                weight_pct = ?2,
                due_date = ?3,
                score_pct = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                assessment.title.trim(),
                assessment.weight_pct,
                assessment.due_date,
                assessment.score_pct,
                assessment.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(assessment.id));
        }

        Ok(())
    }

    fn get_assessment(&self, id: AssessmentId) -> RepoResult<Option<Assessment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSESSMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let row = stmt
            .query_row([id], |row| Ok(read_row(row)))
            .optional()?;
        row.transpose()
    }

    fn list_assessments(&self) -> RepoResult<Vec<Assessment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSESSMENT_SELECT_SQL} ORDER BY due_date ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut assessments = Vec::new();

        while let Some(row) = rows.next()? {
            assessments.push(read_row(row)?);
        }

        Ok(assessments)
    }

    fn delete_assessment(&self, id: AssessmentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assessments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn read_row(row: &Row<'_>) -> RepoResult<Assessment> {
    let id: AssessmentId = row.get("id")?;
    let due_text: String = row.get("due_date")?;
    let due_date = due_text.parse().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid due_date `{due_text}` in assessments.due_date (id {id})"
        ))
    })?;

    let assessment = Assessment {
        id,
        title: row.get("title")?,
        weight_pct: row.get("weight_pct")?,
        due_date,
        score_pct: row.get("score_pct")?,
    };
    assessment
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("row {id}: {err}")))?;
    Ok(assessment)
}
