use anyhow::Context as _;
use sqlx::{PgPool, Postgres, Transaction, migrate::Migrator};

use crate::cache::CacheService;

/// Compile-time discovered SQLx migrations for the `lapd-database` crate.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Shared database handle passed across crates.
#[derive(Clone, Debug)]
pub struct Database {
    pool: PgPool,
    cache: CacheService,
}

impl Database {
    /// Create a database handle from an existing pool, without caching.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: CacheService::disabled("lapd:prod"),
        }
    }

    /// Create a database handle from an existing pool and cache service.
    pub fn with_cache(pool: PgPool, cache: CacheService) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    /// Open a transaction that holds the per-guild advisory lock until commit.
    ///
    /// Used wherever a per-guild sequence number is allocated.
    pub async fn begin_guild_locked(
        &self,
        guild_id: u64,
    ) -> anyhow::Result<Transaction<'static, Postgres>> {
        let guild_id_i64 = to_i64(guild_id, "guild_id")?;
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(guild_id_i64)
            .execute(&mut *tx)
            .await?;

        Ok(tx)
    }
}

/// Convert a Discord snowflake (or any unsigned id) into a `BIGINT` bind value.
pub fn to_i64(value: u64, field: &'static str) -> anyhow::Result<i64> {
    i64::try_from(value).with_context(|| format!("{field} out of i64 range"))
}

/// Convert a `BIGINT` row value back into an unsigned id.
pub fn to_u64(value: i64, field: &'static str) -> anyhow::Result<u64> {
    u64::try_from(value).with_context(|| format!("{field} row out of u64 range"))
}

pub fn to_i64_vec(values: &[u64], field: &'static str) -> anyhow::Result<Vec<i64>> {
    values.iter().map(|value| to_i64(*value, field)).collect()
}

pub fn to_u64_vec(values: Vec<i64>, field: &'static str) -> anyhow::Result<Vec<u64>> {
    values.into_iter().map(|value| to_u64(value, field)).collect()
}

#[cfg(test)]
mod tests {
    use super::{to_i64, to_u64, to_u64_vec};

    #[test]
    fn snowflake_conversions_reject_out_of_range() {
        assert_eq!(to_i64(42, "id").ok(), Some(42));
        assert!(to_i64(u64::MAX, "id").is_err());
        assert!(to_u64(-1, "id").is_err());
        assert_eq!(to_u64_vec(vec![1, 2], "ids").ok(), Some(vec![1, 2]));
    }
}
