use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credential::errors::AuthError;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::DisplayName;
use crate::credential::models::Identity;
use crate::credential::models::Role;
use crate::credential::ports::CredentialRepository;

const IDENTITY_UNIQUE_CONSTRAINT: &str = "credentials_identity_key";

pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    identity: String,
    display_name: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = AuthError;

    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, e: String| {
            AuthError::StoreUnavailable(format!("stored {} is invalid: {}", field, e))
        };

        Ok(CredentialRecord {
            id: CredentialId(row.id),
            identity: Identity::new(&row.identity).map_err(|e| corrupt("identity", e.to_string()))?,
            display_name: DisplayName::new(&row.display_name)
                .map_err(|e| corrupt("display name", e.to_string()))?,
            password_hash: row.password_hash,
            role: Role::parse(&row.role).map_err(|e| corrupt("role", e.to_string()))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn create(&self, record: CredentialRecord) -> Result<CredentialRecord, AuthError> {
        // The unique constraint arbitrates concurrent registrations.
        sqlx::query(
            r#"
            INSERT INTO credentials (id, identity, display_name, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.0)
        .bind(record.identity.as_str())
        .bind(record.display_name.as_str())
        .bind(&record.password_hash)
        .bind(record.role.as_str())
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(IDENTITY_UNIQUE_CONSTRAINT)
                {
                    return AuthError::AlreadyExists(record.identity.to_string());
                }
            }
            AuthError::StoreUnavailable(e.to_string())
        })?;

        Ok(record)
    }

    async fn find_by_identity(
        &self,
        identity: &Identity,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, identity, display_name, password_hash, role, created_at, updated_at
            FROM credentials
            WHERE identity = $1
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::StoreUnavailable(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }
}
