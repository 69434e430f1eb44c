use crate::database::{Database, to_i64, to_u64};
use crate::model::records::{RecordCounts, RecordKind};

/// Delete one record by its per-guild number.
pub async fn delete_record(
    db: &Database,
    guild_id: u64,
    kind: RecordKind,
    number: u64,
) -> anyhow::Result<bool> {
    let deleted = sqlx::query(&format!(
        "DELETE FROM {} WHERE guild_id = $1 AND {} = $2",
        kind.table(),
        kind.number_column()
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(number, "number")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(deleted > 0)
}

/// How many records an officer has filed in a guild.
pub async fn record_counts_for_officer(
    db: &Database,
    guild_id: u64,
    officer_id: u64,
) -> anyhow::Result<RecordCounts> {
    let (arrests, citations, incidents): (i64, i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM arrests WHERE guild_id = $1 AND arresting_officer_id = $2),
            (SELECT COUNT(*) FROM citations WHERE guild_id = $1 AND issuing_officer_id = $2),
            (SELECT COUNT(*) FROM incidents WHERE guild_id = $1 AND reporter_id = $2)",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(officer_id, "officer_id")?)
    .fetch_one(db.pool())
    .await?;

    Ok(RecordCounts {
        arrests: to_u64(arrests, "arrests")?,
        citations: to_u64(citations, "citations")?,
        incidents: to_u64(incidents, "incidents")?,
    })
}
