use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::config;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Case, CasePatch, CasePayload, DistrictCount, NewCase};

/// The two case-tracking programs served by this API. Each has its own table
/// and its own visibility rule; everything else is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    /// Community health worker cases
    Chw,
    /// Health surveillance officer cases
    Hso,
}

impl Program {
    pub fn parse(s: &str) -> Option<Program> {
        match s {
            "chw" => Some(Program::Chw),
            "hso" => Some(Program::Hso),
            _ => None,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Program::Chw => "chw_cases",
            Program::Hso => "hso_cases",
        }
    }

    /// Visibility rule for read and write operations. CHW cases are visible
    /// to every authenticated user; HSO cases only to their owner. The
    /// by-district aggregation is owner-scoped for both programs regardless
    /// of this rule.
    pub fn scope(self) -> VisibilityScope {
        match self {
            Program::Chw => VisibilityScope::Unrestricted,
            Program::Hso => VisibilityScope::OwnerOnly,
        }
    }
}

/// Which cases an actor may read and mutate. A pure query constraint: either
/// the identity, or an extra `created_by = actor` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    Unrestricted,
    OwnerOnly,
}

impl VisibilityScope {
    /// SQL fragment restricting a statement to the actor's own rows, with
    /// `bind` as the 1-based placeholder index the caller will bind the
    /// actor id at. Empty when unrestricted.
    fn owner_clause(self, bind: usize) -> String {
        match self {
            VisibilityScope::Unrestricted => String::new(),
            VisibilityScope::OwnerOnly => format!(" AND created_by = ${}", bind),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("Validation failed")]
    Validation { field_errors: HashMap<String, String> },

    #[error("Case not found: {0}")]
    NotFound(Uuid),

    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Resource manager for one program's cases. Actor identity is an explicit
/// parameter on every operation; there is no ambient request state here.
pub struct CaseService {
    program: Program,
    pool: PgPool,
}

impl CaseService {
    pub async fn new(program: Program) -> Result<Self, CaseError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { program, pool })
    }

    /// All cases visible to the actor, newest first.
    pub async fn list(&self, actor: Uuid) -> Result<Vec<Case>, CaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE TRUE{} ORDER BY created_at DESC",
            self.program.table(),
            self.program.scope().owner_clause(1)
        );

        let mut query = sqlx::query_as::<_, Case>(&sql);
        if self.program.scope() == VisibilityScope::OwnerOnly {
            query = query.bind(actor);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Validate and persist a new case. The stored owner is always `actor`;
    /// a caller-supplied owner never reaches this layer (see CasePayload).
    pub async fn create(&self, actor: Uuid, payload: CasePayload) -> Result<Case, CaseError> {
        let input = payload
            .into_new_case(&config::config().cases.districts)
            .map_err(|field_errors| CaseError::Validation { field_errors })?;

        let sql = format!(
            "INSERT INTO \"{}\" (district, summary, notes, created_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
            self.program.table()
        );

        let case = sqlx::query_as::<_, Case>(&sql)
            .bind(&input.district)
            .bind(&input.summary)
            .bind(&input.notes)
            .bind(actor)
            .fetch_one(&self.pool)
            .await?;

        Ok(case)
    }

    pub async fn retrieve(&self, actor: Uuid, id: Uuid) -> Result<Case, CaseError> {
        let sql = format!(
            "SELECT * FROM \"{}\" WHERE id = $1{}",
            self.program.table(),
            self.program.scope().owner_clause(2)
        );

        let mut query = sqlx::query_as::<_, Case>(&sql).bind(id);
        if self.program.scope() == VisibilityScope::OwnerOnly {
            query = query.bind(actor);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    /// Full update: replaces district, summary and notes. Never touches id,
    /// created_by or created_at.
    pub async fn update(&self, actor: Uuid, id: Uuid, payload: CasePayload) -> Result<Case, CaseError> {
        let input: NewCase = payload
            .into_new_case(&config::config().cases.districts)
            .map_err(|field_errors| CaseError::Validation { field_errors })?;

        let sql = format!(
            "UPDATE \"{}\" SET district = $1, summary = $2, notes = $3, updated_at = now() \
             WHERE id = $4{} RETURNING *",
            self.program.table(),
            self.program.scope().owner_clause(5)
        );

        let mut query = sqlx::query_as::<_, Case>(&sql)
            .bind(&input.district)
            .bind(&input.summary)
            .bind(&input.notes)
            .bind(id);
        if self.program.scope() == VisibilityScope::OwnerOnly {
            query = query.bind(actor);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    /// Partial update: only the supplied fields change.
    pub async fn patch(&self, actor: Uuid, id: Uuid, payload: CasePayload) -> Result<Case, CaseError> {
        let input: CasePatch = payload
            .into_patch(&config::config().cases.districts)
            .map_err(|field_errors| CaseError::Validation { field_errors })?;

        let sql = format!(
            "UPDATE \"{}\" SET district = COALESCE($1, district), \
             summary = COALESCE($2, summary), notes = COALESCE($3, notes), \
             updated_at = now() WHERE id = $4{} RETURNING *",
            self.program.table(),
            self.program.scope().owner_clause(5)
        );

        let mut query = sqlx::query_as::<_, Case>(&sql)
            .bind(&input.district)
            .bind(&input.summary)
            .bind(&input.notes)
            .bind(id);
        if self.program.scope() == VisibilityScope::OwnerOnly {
            query = query.bind(actor);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .ok_or(CaseError::NotFound(id))
    }

    /// Permanent delete under the program's visibility rule. A miss (absent
    /// or not owned) is NotFound either way, so existence is not leaked.
    pub async fn delete(&self, actor: Uuid, id: Uuid) -> Result<(), CaseError> {
        let sql = format!(
            "DELETE FROM \"{}\" WHERE id = $1{} RETURNING id",
            self.program.table(),
            self.program.scope().owner_clause(2)
        );

        let mut query = sqlx::query_as::<_, (Uuid,)>(&sql).bind(id);
        if self.program.scope() == VisibilityScope::OwnerOnly {
            query = query.bind(actor);
        }

        query
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or(CaseError::NotFound(id))
    }

    /// Count of the actor's own cases per district, ascending by district.
    /// Owner-scoped for both programs, including CHW.
    pub async fn count_by_district(&self, actor: Uuid) -> Result<Vec<DistrictCount>, CaseError> {
        let sql = format!(
            "SELECT district, COUNT(*) AS count FROM \"{}\" \
             WHERE created_by = $1 GROUP BY district ORDER BY district ASC",
            self.program.table()
        );

        let counts = sqlx::query_as::<_, DistrictCount>(&sql)
            .bind(actor)
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_programs() {
        assert_eq!(Program::parse("chw"), Some(Program::Chw));
        assert_eq!(Program::parse("hso"), Some(Program::Hso));
        assert_eq!(Program::parse("CHW"), None);
        assert_eq!(Program::parse("nurse"), None);
    }

    #[test]
    fn chw_reads_are_unrestricted_and_hso_owner_only() {
        assert_eq!(Program::Chw.scope(), VisibilityScope::Unrestricted);
        assert_eq!(Program::Hso.scope(), VisibilityScope::OwnerOnly);
    }

    #[test]
    fn tables_are_distinct_per_program() {
        assert_eq!(Program::Chw.table(), "chw_cases");
        assert_eq!(Program::Hso.table(), "hso_cases");
    }

    #[test]
    fn owner_clause_only_applies_when_scoped() {
        assert_eq!(VisibilityScope::Unrestricted.owner_clause(2), "");
        assert_eq!(VisibilityScope::OwnerOnly.owner_clause(2), " AND created_by = $2");
    }
}
