use bookshelf_kernel::Migration;
use sqlx::PgPool;

use crate::DbError;

const BOOKKEEPING_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT        NOT NULL,
        id         TEXT        NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration that has not been recorded yet.
///
/// Each migration runs in its own transaction together with its bookkeeping row,
/// so a failed migration leaves no partial record. Returns the number applied;
/// zero means the schema was already current.
pub async fn ensure_schema(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> Result<usize, DbError> {
    sqlx::raw_sql(BOOKKEEPING_TABLE)
        .execute(pool)
        .await
        .map_err(|source| DbError::schema("schema_migrations", source))?;

    let mut applied = 0;

    for (module, migration) in migrations {
        let label = format!("{}/{}", module, migration.id);

        let already_applied: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2)",
        )
        .bind(module)
        .bind(migration.id)
        .fetch_one(pool)
        .await
        .map_err(|source| DbError::schema(label.clone(), source))?;

        if already_applied {
            tracing::debug!(migration = %label, "migration already applied");
            continue;
        }

        let mut tx = pool
            .begin()
            .await
            .map_err(|source| DbError::schema(label.clone(), source))?;

        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .map_err(|source| DbError::schema(label.clone(), source))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await
            .map_err(|source| DbError::schema(label.clone(), source))?;

        tx.commit()
            .await
            .map_err(|source| DbError::schema(label.clone(), source))?;

        tracing::info!(migration = %label, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
