use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;

/// Mark every outstanding code of a user as used.
pub async fn consume_open_codes_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
) -> anyhow::Result<u64> {
    let res = sqlx::query(
        r#"
        UPDATE password_reset_codes
           SET used_at = now()
         WHERE user_id = $1 AND used_at IS NULL
        "#,
    )
    .bind(user_id)
    .execute(&mut **tx)
    .await
    .context("consume open reset codes")?;
    Ok(res.rows_affected())
}

pub async fn insert_code_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    code_hash: &str,
    expires_at: OffsetDateTime,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO password_reset_codes (user_id, code_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(code_hash)
    .bind(expires_at)
    .execute(&mut **tx)
    .await
    .context("insert reset code")?;
    Ok(())
}

// ---- Queries ----

/// Unused, unexpired codes of a user as `(id, code_hash)`.
pub async fn list_live_codes(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<(i64, String)>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT id, code_hash
          FROM password_reset_codes
         WHERE user_id = $1 AND used_at IS NULL AND expires_at > now()
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list live reset codes")?;
    Ok(rows)
}

/// Consume one code; false if a concurrent request already did.
pub async fn consume_code(db: &PgPool, code_id: i64) -> anyhow::Result<bool> {
    let res = sqlx::query(
        r#"
        UPDATE password_reset_codes
           SET used_at = now()
         WHERE id = $1 AND used_at IS NULL
        "#,
    )
    .bind(code_id)
    .execute(db)
    .await
    .context("consume reset code")?;
    Ok(res.rows_affected() == 1)
}
