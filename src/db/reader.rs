use sqlx::AnyPool;

use crate::db::models::StoredRow;
use crate::error::{AppError, Result};

/// Every stored row, newest draw time first, then newest insertion first.
pub async fn fetch_rows(pool: &AnyPool) -> Result<Vec<StoredRow>> {
    let mut conn = pool.acquire().await.map_err(AppError::Query)?;

    sqlx::query_as::<_, StoredRow>(
        r#"
        SELECT titulo, hora, premio, resultado, grupo,
               CAST(data_insercao AS TEXT) AS inserted_at
        FROM resultados_loteria
        ORDER BY hora DESC, data_insercao DESC
        "#,
    )
    .fetch_all(&mut *conn)
    .await
    .map_err(AppError::Query)
}
