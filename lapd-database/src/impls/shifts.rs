use std::collections::HashMap;

use crate::database::{Database, to_i64, to_u64};
use crate::model::records::RecordKind;
use crate::model::shifts::{LeaderboardEntry, Shift, ShiftBreak, rank_leaderboard};

#[derive(sqlx::FromRow)]
struct ShiftRow {
    id: i64,
    guild_id: i64,
    user_id: i64,
    shift_type: String,
    started_at: i64,
    ended_at: Option<i64>,
    arrests: i32,
    citations: i32,
    incidents: i32,
}

#[derive(sqlx::FromRow)]
struct ShiftBreakRow {
    shift_id: i64,
    started_at: i64,
    ended_at: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct LeaderboardRow {
    user_id: i64,
    shift_count: i64,
    on_duty_ms: i64,
}

const SHIFT_COLUMNS: &str =
    "id, guild_id, user_id, shift_type, started_at, ended_at, arrests, citations, incidents";

/// Start a shift. Returns `None` if the member already has an active shift.
pub async fn start_shift(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    shift_type: &str,
    now_ms: u64,
) -> anyhow::Result<Option<Shift>> {
    let row: Option<ShiftRow> = sqlx::query_as(&format!(
        "INSERT INTO shifts (guild_id, user_id, shift_type, started_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (guild_id, user_id) WHERE ended_at IS NULL DO NOTHING
         RETURNING {SHIFT_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(shift_type)
    .bind(to_i64(now_ms, "now_ms")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(|row| to_shift(row, Vec::new())).transpose()
}

pub async fn get_active_shift(
    db: &Database,
    guild_id: u64,
    user_id: u64,
) -> anyhow::Result<Option<Shift>> {
    let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE guild_id = $1 AND user_id = $2 AND ended_at IS NULL"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .fetch_all(db.pool())
    .await?;

    Ok(attach_breaks(db, rows).await?.into_iter().next())
}

/// Open a break on an active shift. Returns `false` if the shift is not
/// active or already on break.
pub async fn start_break(db: &Database, shift_id: u64, now_ms: u64) -> anyhow::Result<bool> {
    let inserted = sqlx::query(
        "INSERT INTO shift_breaks (shift_id, started_at)
         SELECT id, $2 FROM shifts WHERE id = $1 AND ended_at IS NULL
         ON CONFLICT (shift_id) WHERE ended_at IS NULL DO NOTHING",
    )
    .bind(to_i64(shift_id, "shift_id")?)
    .bind(to_i64(now_ms, "now_ms")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(inserted > 0)
}

pub async fn end_break(db: &Database, shift_id: u64, now_ms: u64) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE shift_breaks SET ended_at = GREATEST($2, started_at)
         WHERE shift_id = $1 AND ended_at IS NULL",
    )
    .bind(to_i64(shift_id, "shift_id")?)
    .bind(to_i64(now_ms, "now_ms")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Close any open break and end the shift. Returns the finished shift, or
/// `None` if it had already ended.
pub async fn end_shift(db: &Database, shift_id: u64, now_ms: u64) -> anyhow::Result<Option<Shift>> {
    let shift_id_i64 = to_i64(shift_id, "shift_id")?;
    let now_i64 = to_i64(now_ms, "now_ms")?;
    let mut tx = db.pool().begin().await?;

    sqlx::query(
        "UPDATE shift_breaks SET ended_at = GREATEST($2, started_at)
         WHERE shift_id = $1 AND ended_at IS NULL",
    )
    .bind(shift_id_i64)
    .bind(now_i64)
    .execute(&mut *tx)
    .await?;

    let row: Option<ShiftRow> = sqlx::query_as(&format!(
        "UPDATE shifts SET ended_at = GREATEST($2, started_at)
         WHERE id = $1 AND ended_at IS NULL
         RETURNING {SHIFT_COLUMNS}"
    ))
    .bind(shift_id_i64)
    .bind(now_i64)
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;

    match row {
        Some(row) => Ok(attach_breaks(db, vec![row]).await?.into_iter().next()),
        None => Ok(None),
    }
}

/// Delete the member's active shift without recording it.
pub async fn void_active_shift(db: &Database, guild_id: u64, user_id: u64) -> anyhow::Result<bool> {
    let deleted = sqlx::query(
        "DELETE FROM shifts WHERE guild_id = $1 AND user_id = $2 AND ended_at IS NULL",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(deleted > 0)
}

pub async fn list_active_shifts(
    db: &Database,
    guild_id: u64,
    shift_type: Option<&str>,
) -> anyhow::Result<Vec<Shift>> {
    let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE guild_id = $1 AND ended_at IS NULL
           AND ($2::TEXT IS NULL OR LOWER(shift_type) = LOWER($2))
         ORDER BY started_at ASC"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(shift_type)
    .fetch_all(db.pool())
    .await?;

    attach_breaks(db, rows).await
}

/// Every shift of a member, newest first.
pub async fn list_member_shifts(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    shift_type: Option<&str>,
) -> anyhow::Result<Vec<Shift>> {
    let rows: Vec<ShiftRow> = sqlx::query_as(&format!(
        "SELECT {SHIFT_COLUMNS} FROM shifts
         WHERE guild_id = $1 AND user_id = $2
           AND ($3::TEXT IS NULL OR LOWER(shift_type) = LOWER($3))
         ORDER BY started_at DESC"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(shift_type)
    .fetch_all(db.pool())
    .await?;

    attach_breaks(db, rows).await
}

pub async fn wipe_member_shifts(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    shift_type: Option<&str>,
) -> anyhow::Result<u64> {
    let deleted = sqlx::query(
        "DELETE FROM shifts
         WHERE guild_id = $1 AND user_id = $2
           AND ($3::TEXT IS NULL OR LOWER(shift_type) = LOWER($3))",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(shift_type)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(deleted)
}

/// On-duty totals per member, reduced in the database.
///
/// Breaks are clipped to their shift and running shifts/breaks count up to
/// `now_ms`, the same arithmetic as [`Shift::on_duty_millis`].
pub async fn shift_leaderboard(
    db: &Database,
    guild_id: u64,
    shift_type: Option<&str>,
    now_ms: u64,
) -> anyhow::Result<Vec<LeaderboardEntry>> {
    let rows: Vec<LeaderboardRow> = sqlx::query_as(
        "WITH per_shift AS (
            SELECT
                s.user_id,
                GREATEST(COALESCE(s.ended_at, $3), s.started_at) AS shift_end,
                s.started_at,
                s.id
            FROM shifts s
            WHERE s.guild_id = $1
              AND ($2::TEXT IS NULL OR LOWER(s.shift_type) = LOWER($2))
        ),
        with_breaks AS (
            SELECT
                p.user_id,
                p.shift_end - p.started_at AS total_ms,
                COALESCE((
                    SELECT SUM(
                        GREATEST(
                            LEAST(COALESCE(b.ended_at, p.shift_end), p.shift_end),
                            c.clipped_start
                        ) - c.clipped_start
                    )
                    FROM shift_breaks b
                    CROSS JOIN LATERAL (
                        SELECT LEAST(GREATEST(b.started_at, p.started_at), p.shift_end)
                            AS clipped_start
                    ) c
                    WHERE b.shift_id = p.id
                ), 0) AS break_ms
            FROM per_shift p
        )
        SELECT
            user_id,
            COUNT(*)::BIGINT AS shift_count,
            COALESCE(SUM(GREATEST(total_ms - break_ms, 0)), 0)::BIGINT AS on_duty_ms
        FROM with_breaks
        GROUP BY user_id",
    )
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(shift_type)
    .bind(to_i64(now_ms, "now_ms")?)
    .fetch_all(db.pool())
    .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push(LeaderboardEntry {
            user_id: to_u64(row.user_id, "user_id")?,
            shift_count: to_u64(row.shift_count, "shift_count")?,
            on_duty_millis: to_u64(row.on_duty_ms.max(0), "on_duty_ms")?,
        });
    }

    rank_leaderboard(&mut entries);
    Ok(entries)
}

/// Credit a logged record to the officer's running shift, if any.
pub async fn credit_active_shift(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    kind: RecordKind,
) -> anyhow::Result<bool> {
    let column = match kind {
        RecordKind::Arrest => "arrests",
        RecordKind::Citation => "citations",
        RecordKind::Incident => "incidents",
    };

    let updated = sqlx::query(&format!(
        "UPDATE shifts SET {column} = {column} + 1
         WHERE guild_id = $1 AND user_id = $2 AND ended_at IS NULL"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

async fn attach_breaks(db: &Database, rows: Vec<ShiftRow>) -> anyhow::Result<Vec<Shift>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let break_rows: Vec<ShiftBreakRow> = sqlx::query_as(
        "SELECT shift_id, started_at, ended_at FROM shift_breaks
         WHERE shift_id = ANY($1)
         ORDER BY started_at ASC",
    )
    .bind(&ids)
    .fetch_all(db.pool())
    .await?;

    let mut grouped: HashMap<i64, Vec<ShiftBreak>> = HashMap::new();
    for row in break_rows {
        grouped.entry(row.shift_id).or_default().push(ShiftBreak {
            started_at: to_u64(row.started_at, "break started_at")?,
            ended_at: row
                .ended_at
                .map(|value| to_u64(value, "break ended_at"))
                .transpose()?,
        });
    }

    rows.into_iter()
        .map(|row| {
            let breaks = grouped.remove(&row.id).unwrap_or_default();
            to_shift(row, breaks)
        })
        .collect()
}

fn to_shift(row: ShiftRow, breaks: Vec<ShiftBreak>) -> anyhow::Result<Shift> {
    Ok(Shift {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        user_id: to_u64(row.user_id, "user_id")?,
        shift_type: row.shift_type,
        started_at: to_u64(row.started_at, "started_at")?,
        ended_at: row
            .ended_at
            .map(|value| to_u64(value, "ended_at"))
            .transpose()?,
        arrests: u32::try_from(row.arrests.max(0)).unwrap_or_default(),
        citations: u32::try_from(row.citations.max(0)).unwrap_or_default(),
        incidents: u32::try_from(row.incidents.max(0)).unwrap_or_default(),
        breaks,
    })
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use sqlx::postgres::PgPoolOptions;

    use super::{list_member_shifts, shift_leaderboard};
    use crate::database::{Database, MIGRATOR, to_i64};
    use crate::model::shifts::{LeaderboardEntry, ShiftTotals, rank_leaderboard};

    const MIN: u64 = 60_000;
    const BASE: u64 = 1_700_000_000_000;

    /// Runs only when `DATABASE_URL` points at a reachable Postgres.
    async fn test_database() -> Option<Database> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .ok()?;
        MIGRATOR.run(&pool).await.ok()?;
        Some(Database::new(pool))
    }

    async fn insert_shift(
        db: &Database,
        guild_id: u64,
        user_id: u64,
        started_at: u64,
        ended_at: Option<u64>,
        breaks: &[(u64, Option<u64>)],
    ) {
        let shift_id: i64 = sqlx::query_scalar(
            "INSERT INTO shifts (guild_id, user_id, shift_type, started_at, ended_at)
             VALUES ($1, $2, 'Patrol', $3, $4) RETURNING id",
        )
        .bind(to_i64(guild_id, "guild_id").unwrap())
        .bind(to_i64(user_id, "user_id").unwrap())
        .bind(to_i64(started_at, "started_at").unwrap())
        .bind(ended_at.map(|value| to_i64(value, "ended_at").unwrap()))
        .fetch_one(db.pool())
        .await
        .unwrap();

        for (break_start, break_end) in breaks {
            sqlx::query(
                "INSERT INTO shift_breaks (shift_id, started_at, ended_at) VALUES ($1, $2, $3)",
            )
            .bind(shift_id)
            .bind(to_i64(*break_start, "break_start").unwrap())
            .bind(break_end.map(|value| to_i64(value, "break_end").unwrap()))
            .execute(db.pool())
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn leaderboard_sql_matches_shift_fold() {
        let Some(db) = test_database().await else {
            return;
        };
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let guild_id = u64::try_from(nanos % u128::from(i64::MAX.unsigned_abs())).unwrap();
        let now = BASE + 1_000 * MIN;

        // Overlapping breaks, and a break running past the shift end.
        let overlapping = [
            (BASE + 10 * MIN, Some(BASE + 40 * MIN)),
            (BASE + 30 * MIN, Some(BASE + 50 * MIN)),
        ];
        insert_shift(&db, guild_id, 1, BASE, Some(BASE + 120 * MIN), &overlapping).await;
        let overrunning = [(BASE + 250 * MIN, Some(BASE + 300 * MIN))];
        let second_end = Some(BASE + 260 * MIN);
        insert_shift(&db, guild_id, 1, BASE + 200 * MIN, second_end, &overrunning).await;
        // Running shift with an open break and a break that began before the shift.
        let running = [(now - 100 * MIN, Some(now - 80 * MIN)), (now - 30 * MIN, None)];
        insert_shift(&db, guild_id, 2, now - 90 * MIN, None, &running).await;
        // Breaks covering the whole shift, and a break that ends before it starts.
        let covering = [
            (BASE - 10 * MIN, Some(BASE + 60 * MIN)),
            (BASE + 20 * MIN, Some(BASE + 10 * MIN)),
        ];
        insert_shift(&db, guild_id, 3, BASE, Some(BASE + 30 * MIN), &covering).await;

        let from_sql = shift_leaderboard(&db, guild_id, None, now).await.unwrap();

        let mut folded = Vec::new();
        for user_id in [1, 2, 3] {
            let shifts = list_member_shifts(&db, guild_id, user_id, None)
                .await
                .unwrap();
            let totals = ShiftTotals::from_shifts(&shifts, now);
            folded.push(LeaderboardEntry {
                user_id,
                shift_count: totals.shift_count,
                on_duty_millis: totals.on_duty_millis,
            });
        }
        rank_leaderboard(&mut folded);

        sqlx::query("DELETE FROM shifts WHERE guild_id = $1")
            .bind(to_i64(guild_id, "guild_id").unwrap())
            .execute(db.pool())
            .await
            .unwrap();

        assert_eq!(from_sql, folded);
        let ranked: Vec<_> = folded
            .iter()
            .map(|entry| (entry.user_id, entry.on_duty_millis))
            .collect();
        assert_eq!(ranked, vec![(1, 120 * MIN), (2, 50 * MIN), (3, 0)]);
    }
}
