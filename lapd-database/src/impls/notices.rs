use anyhow::Context as _;

use crate::database::{Database, to_i64, to_u64};
use crate::impls::now_unix_secs;
use crate::model::notices::{NewNotice, Notice, NoticeKind, NoticeStatus};

#[derive(sqlx::FromRow)]
struct NoticeRow {
    id: i64,
    guild_id: i64,
    user_id: i64,
    kind: String,
    status: String,
    reason: String,
    quota_reduction: Option<i32>,
    requested_at: i64,
    start_at: i64,
    end_at: i64,
    early_end_at: Option<i64>,
    reviewer_id: Option<i64>,
    review_note: Option<String>,
    reviewed_at: Option<i64>,
    start_processed: bool,
    end_processed: bool,
}

const NOTICE_COLUMNS: &str = "id, guild_id, user_id, kind, status, reason, quota_reduction, \
     requested_at, start_at, end_at, early_end_at, reviewer_id, review_note, reviewed_at, \
     start_processed, end_processed";

/// SQL expression for the effective end of a notice.
const EFFECTIVE_END: &str = "LEAST(end_at, COALESCE(early_end_at, end_at))";

/// Submit a notice request. Returns `None` when the member already has a
/// pending (still within its window) or unfinished approved notice of the same kind.
pub async fn create_notice(
    db: &Database,
    new_notice: NewNotice<'_>,
) -> anyhow::Result<Option<Notice>> {
    let guild_id_i64 = to_i64(new_notice.guild_id, "guild_id")?;
    let user_id_i64 = to_i64(new_notice.user_id, "user_id")?;
    let now = to_i64(now_unix_secs(), "now")?;
    let mut tx = db.begin_guild_locked(new_notice.guild_id).await?;

    let blocking: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM notices
         WHERE guild_id = $1 AND user_id = $2 AND kind = $3
           AND ((status = 'pending' AND end_at > $4)
               OR (status = 'approved' AND {EFFECTIVE_END} > $4))"
    ))
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(new_notice.kind.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    if blocking > 0 {
        return Ok(None);
    }

    let row: NoticeRow = sqlx::query_as(&format!(
        "INSERT INTO notices (
            guild_id,
            user_id,
            kind,
            status,
            reason,
            quota_reduction,
            requested_at,
            start_at,
            end_at
         ) VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $8)
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(guild_id_i64)
    .bind(user_id_i64)
    .bind(new_notice.kind.as_str())
    .bind(new_notice.reason.trim())
    .bind(new_notice.quota_reduction.map(i32::from))
    .bind(now)
    .bind(to_i64(new_notice.start_at, "start_at")?)
    .bind(to_i64(new_notice.end_at, "end_at")?)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    to_notice(row).map(Some)
}

pub async fn get_notice(
    db: &Database,
    guild_id: u64,
    notice_id: u64,
) -> anyhow::Result<Option<Notice>> {
    let row: Option<NoticeRow> = sqlx::query_as(&format!(
        "SELECT {NOTICE_COLUMNS} FROM notices WHERE guild_id = $1 AND id = $2"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(notice_id, "notice_id")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_notice).transpose()
}

/// A member's notices of one kind, newest first.
pub async fn list_member_notices(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    kind: NoticeKind,
) -> anyhow::Result<Vec<Notice>> {
    let rows: Vec<NoticeRow> = sqlx::query_as(&format!(
        "SELECT {NOTICE_COLUMNS} FROM notices
         WHERE guild_id = $1 AND user_id = $2 AND kind = $3
         ORDER BY requested_at DESC, id DESC"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(kind.as_str())
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_notice).collect()
}

pub async fn list_guild_notices(
    db: &Database,
    guild_id: u64,
    kind: NoticeKind,
    status: Option<NoticeStatus>,
    limit: u32,
) -> anyhow::Result<Vec<Notice>> {
    let rows: Vec<NoticeRow> = sqlx::query_as(&format!(
        "SELECT {NOTICE_COLUMNS} FROM notices
         WHERE guild_id = $1 AND kind = $2 AND ($3::TEXT IS NULL OR status = $3)
         ORDER BY requested_at DESC, id DESC
         LIMIT $4"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(kind.as_str())
    .bind(status.map(NoticeStatus::as_str))
    .bind(i64::from(limit.clamp(1, 200)))
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_notice).collect()
}

/// Notices of any kind that are running right now for a member.
pub async fn active_member_notices(
    db: &Database,
    guild_id: u64,
    user_id: u64,
    now: u64,
) -> anyhow::Result<Vec<Notice>> {
    let rows: Vec<NoticeRow> = sqlx::query_as(&format!(
        "SELECT {NOTICE_COLUMNS} FROM notices
         WHERE guild_id = $1 AND user_id = $2 AND status = 'approved'
           AND start_at <= $3 AND {EFFECTIVE_END} > $3
         ORDER BY start_at ASC"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .bind(to_i64(now, "now")?)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_notice).collect()
}

/// Withdraw one's own pending request.
pub async fn cancel_notice(
    db: &Database,
    guild_id: u64,
    notice_id: u64,
    user_id: u64,
) -> anyhow::Result<Option<Notice>> {
    let row: Option<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices SET status = 'cancelled'
         WHERE guild_id = $1 AND id = $2 AND user_id = $3 AND status = 'pending'
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(notice_id, "notice_id")?)
    .bind(to_i64(user_id, "user_id")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_notice).transpose()
}

/// End an approved notice now. The sweep job removes the role afterwards.
pub async fn end_notice_early(
    db: &Database,
    guild_id: u64,
    notice_id: u64,
    now: u64,
) -> anyhow::Result<Option<Notice>> {
    let row: Option<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices SET early_end_at = $3
         WHERE guild_id = $1 AND id = $2 AND status = 'approved' AND {EFFECTIVE_END} > $3
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(notice_id, "notice_id")?)
    .bind(to_i64(now, "now")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_notice).transpose()
}

/// Approve or deny a pending notice.
pub async fn review_notice(
    db: &Database,
    guild_id: u64,
    notice_id: u64,
    reviewer_id: u64,
    approve: bool,
    note: Option<&str>,
) -> anyhow::Result<Option<Notice>> {
    let status = if approve {
        NoticeStatus::Approved
    } else {
        NoticeStatus::Denied
    };

    let row: Option<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices
         SET status = $3, reviewer_id = $4, review_note = $5, reviewed_at = $6
         WHERE guild_id = $1 AND id = $2 AND status = 'pending'
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(notice_id, "notice_id")?)
    .bind(status.as_str())
    .bind(to_i64(reviewer_id, "reviewer_id")?)
    .bind(note)
    .bind(to_i64(now_unix_secs(), "now")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_notice).transpose()
}

/// Push back the end of an approved notice that has not ended yet.
pub async fn extend_notice(
    db: &Database,
    guild_id: u64,
    notice_id: u64,
    new_end_at: u64,
    now: u64,
) -> anyhow::Result<Option<Notice>> {
    let row: Option<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices SET end_at = $3
         WHERE guild_id = $1 AND id = $2 AND status = 'approved'
           AND early_end_at IS NULL AND end_processed = FALSE
           AND end_at > $4 AND $3 > end_at
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(guild_id, "guild_id")?)
    .bind(to_i64(notice_id, "notice_id")?)
    .bind(to_i64(new_end_at, "new_end_at")?)
    .bind(to_i64(now, "now")?)
    .fetch_optional(db.pool())
    .await?;

    row.map(to_notice).transpose()
}

/// Mark a notice's start as handled. Returns `false` if another worker got there first.
pub async fn mark_start_processed(db: &Database, notice_id: u64) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE notices SET start_processed = TRUE WHERE id = $1 AND start_processed = FALSE",
    )
    .bind(to_i64(notice_id, "notice_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Close out a notice that was approved after its window had already passed,
/// so the sweep never grants or removes its role. Returns `false` if a sweep
/// claimed it first.
pub async fn close_lapsed_notice(db: &Database, notice_id: u64) -> anyhow::Result<bool> {
    let updated = sqlx::query(
        "UPDATE notices SET start_processed = TRUE, end_processed = TRUE
         WHERE id = $1 AND end_processed = FALSE",
    )
    .bind(to_i64(notice_id, "notice_id")?)
    .execute(db.pool())
    .await?
    .rows_affected();

    Ok(updated > 0)
}

/// Atomically claim approved notices whose start time has arrived.
///
/// The flag flip and the selection happen in one statement so overlapping
/// sweeps never claim the same notice twice. Selects what
/// [`Notice::start_due`] accepts.
pub async fn claim_due_starts(db: &Database, now: u64) -> anyhow::Result<Vec<Notice>> {
    let rows: Vec<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices SET start_processed = TRUE
         WHERE status = 'approved' AND start_processed = FALSE AND end_processed = FALSE
           AND start_at <= $1 AND {EFFECTIVE_END} > $1
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(now, "now")?)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_notice).collect()
}

/// Atomically claim approved notices whose effective end has passed; the
/// SQL twin of [`Notice::expiry_due`].
pub async fn claim_due_expirations(db: &Database, now: u64) -> anyhow::Result<Vec<Notice>> {
    let rows: Vec<NoticeRow> = sqlx::query_as(&format!(
        "UPDATE notices SET end_processed = TRUE, start_processed = TRUE
         WHERE status = 'approved' AND end_processed = FALSE AND {EFFECTIVE_END} <= $1
         RETURNING {NOTICE_COLUMNS}"
    ))
    .bind(to_i64(now, "now")?)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(to_notice).collect()
}

/// Whether the member holds another running notice of the same kind, which
/// keeps the notice role in place.
pub async fn has_other_active_notice(
    db: &Database,
    notice: &Notice,
    now: u64,
) -> anyhow::Result<bool> {
    let exists: bool = sqlx::query_scalar(&format!(
        "SELECT EXISTS (
            SELECT 1 FROM notices
            WHERE guild_id = $1 AND user_id = $2 AND kind = $3 AND id <> $4
              AND status = 'approved' AND start_at <= $5 AND {EFFECTIVE_END} > $5
         )"
    ))
    .bind(to_i64(notice.guild_id, "guild_id")?)
    .bind(to_i64(notice.user_id, "user_id")?)
    .bind(notice.kind.as_str())
    .bind(to_i64(notice.id, "notice_id")?)
    .bind(to_i64(now, "now")?)
    .fetch_one(db.pool())
    .await?;

    Ok(exists)
}

fn to_notice(row: NoticeRow) -> anyhow::Result<Notice> {
    let optional =
        |value: Option<i64>, field: &'static str| value.map(|v| to_u64(v, field)).transpose();

    Ok(Notice {
        id: to_u64(row.id, "id")?,
        guild_id: to_u64(row.guild_id, "guild_id")?,
        user_id: to_u64(row.user_id, "user_id")?,
        kind: NoticeKind::parse(&row.kind)
            .with_context(|| format!("unknown notice kind `{}`", row.kind))?,
        status: NoticeStatus::parse(&row.status)
            .with_context(|| format!("unknown notice status `{}`", row.status))?,
        reason: row.reason,
        quota_reduction: row.quota_reduction.and_then(|quota| u8::try_from(quota).ok()),
        requested_at: to_u64(row.requested_at, "requested_at")?,
        start_at: to_u64(row.start_at, "start_at")?,
        end_at: to_u64(row.end_at, "end_at")?,
        early_end_at: optional(row.early_end_at, "early_end_at")?,
        reviewer_id: optional(row.reviewer_id, "reviewer_id")?,
        review_note: row.review_note,
        reviewed_at: optional(row.reviewed_at, "reviewed_at")?,
        start_processed: row.start_processed,
        end_processed: row.end_processed,
    })
}
