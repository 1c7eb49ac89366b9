use sqlx::{AnyConnection, AnyPool};
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::types::{ResultCard, SaveReport};

/// Persists scraped cards, skipping prize results already stored under the
/// same (title, time, prize).
///
/// Each `save` is one transaction: either every new row lands or none does.
/// The existence check is not atomic with the insert, so two writers running
/// at once could both insert the same key. Only one run happens per process.
pub struct ResultWriter {
    pool: AnyPool,
}

impl ResultWriter {
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, cards: &[ResultCard]) -> Result<SaveReport> {
        let mut tx = self.pool.begin().await.map_err(AppError::Transaction)?;

        match write_cards(&mut tx, cards).await {
            Ok(report) => {
                tx.commit().await.map_err(AppError::Transaction)?;
                info!(
                    inserted = report.inserted,
                    duplicates = report.duplicates,
                    "Results committed"
                );
                Ok(report)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    error!("Rollback failed: {rb}");
                }
                error!("Failed to save results, transaction rolled back: {e}");
                Err(AppError::Transaction(e))
            }
        }
    }
}

async fn write_cards(
    conn: &mut AnyConnection,
    cards: &[ResultCard],
) -> std::result::Result<SaveReport, sqlx::Error> {
    let mut report = SaveReport::default();

    for card in cards {
        for r in &card.results {
            let existing: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(1)
                FROM resultados_loteria
                WHERE titulo = $1 AND hora = $2 AND premio = $3
                "#,
            )
            .bind(card.title.as_str())
            .bind(card.time.as_str())
            .bind(r.prize.as_str())
            .fetch_one(&mut *conn)
            .await?;

            if existing > 0 {
                info!(
                    title = %card.title,
                    time = %card.time,
                    prize = %r.prize,
                    "Duplicate result skipped"
                );
                report.duplicates += 1;
                continue;
            }

            sqlx::query(
                r#"
                INSERT INTO resultados_loteria (titulo, hora, premio, resultado, grupo)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(card.title.as_str())
            .bind(card.time.as_str())
            .bind(r.prize.as_str())
            .bind(r.result.as_str())
            .bind(r.group.as_str())
            .execute(&mut *conn)
            .await?;
            report.inserted += 1;
        }
    }

    Ok(report)
}
