mod events;
mod jobs;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use lapd_commands::checks::{command_check, post_command};
use lapd_core::cooldown::CooldownTracker;
use lapd_core::error::classify;
use lapd_core::{AppError, Data, Error};
use lapd_database::{CacheService, Database, MIGRATOR};
use lapd_roblox::RobloxClient;
use lapd_utils::embed::error_embed;

const DEFAULT_GUILD_DATA_GRACE_DAYS: u64 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        let target = metadata.target();

        let within_info_level = *metadata.level() <= tracing::Level::INFO;
        if !within_info_level {
            return false;
        }

        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let token = required_env("DISCORD_TOKEN")?;
    let database_url = required_env("DATABASE_URL")?;
    let guild_id = match env::var("DISCORD_GUILD_ID") {
        Ok(raw) if !raw.trim().is_empty() => Some(raw.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!("DISCORD_GUILD_ID `{}` is not a guild id", raw.trim()))
        })?),
        _ => None,
    };
    let developer_ids: Arc<[u64]> =
        parse_id_list(&env::var("DEVELOPER_IDS").unwrap_or_default()).into();
    let grace_days = env_u64("GUILD_DATA_GRACE_DAYS", DEFAULT_GUILD_DATA_GRACE_DAYS);

    let db_pool = PgPoolOptions::new()
        .max_connections(env_u64("DB_MAX_CONNECTIONS", 5).clamp(1, u64::from(u32::MAX)) as u32)
        .connect(&database_url)
        .await
        .map_err(|err| AppError::Database(err.to_string()))?;
    info!("PostgreSQL connection established.");

    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let redis_key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| "lapd:prod".to_string());

    let cache = if redis_enabled {
        match env::var("REDIS_URL") {
            Ok(redis_url) => match CacheService::redis(&redis_url, redis_key_prefix.clone()) {
                Ok(cache) => {
                    info!(key_prefix = %redis_key_prefix, "Redis cache enabled.");
                    cache
                }
                Err(err) => {
                    warn!(
                        ?err,
                        key_prefix = %redis_key_prefix,
                        "Failed to initialize Redis cache; continuing with DB-only mode."
                    );
                    CacheService::disabled(redis_key_prefix.clone())
                }
            },
            Err(_) => {
                warn!(
                    key_prefix = %redis_key_prefix,
                    "REDIS_ENABLED=true but REDIS_URL is missing; continuing with DB-only mode."
                );
                CacheService::disabled(redis_key_prefix.clone())
            }
        }
    } else {
        info!("Redis cache disabled (set REDIS_ENABLED=true to enable).");
        CacheService::disabled(redis_key_prefix.clone())
    };

    if cache.is_redis_enabled() {
        if let Err(err) = cache.ping().await {
            warn!(
                ?err,
                "Redis cache ping failed; cache operations will continue with fallback behavior."
            );
        } else {
            info!("Redis cache health check passed.");
        }
    }

    let roblox = RobloxClient::from_env_optional(cache.clone())?;
    if roblox.is_some() {
        info!("Roblox username validation enabled.");
    } else {
        info!("Roblox username validation disabled (ROBLOX_API_ENABLED=false).");
    }

    let db = Database::with_cache(db_pool, cache);

    let auto_run_migrations = env_bool("AUTO_RUN_MIGRATIONS", true);
    if auto_run_migrations {
        MIGRATOR.run(db.pool()).await?;
        info!("Database migrations applied.");
    } else {
        info!("Auto migrations disabled (set AUTO_RUN_MIGRATIONS=true to run at startup).");
    }

    let cooldowns = Arc::new(CooldownTracker::new());
    let data = Data {
        db: db.clone(),
        roblox,
        cooldowns: cooldowns.clone(),
        developer_ids,
        guild_data_grace: Duration::from_secs(grace_days.saturating_mul(86_400)),
    };

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: lapd_commands::commands(),
            command_check: Some(|ctx| Box::pin(command_check(ctx))),
            post_command: |ctx| Box::pin(post_command(ctx)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(lapd_utils::COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(
                    user = %ready.user.name,
                    guilds = ready.guilds.len(),
                    "LAPD Central is online."
                );

                match guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            serenity::GuildId::new(guild_id),
                        )
                        .await?;
                        info!(guild_id, "Commands registered in development guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Commands registered globally.");
                    }
                }

                Ok(data)
            })
        })
        .build();

    info!("LAPD Central is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let schedules = jobs::JobSchedules {
        notice_sweep: jobs::schedule_or_default(
            env::var("NOTICE_SWEEP_CRON").ok(),
            jobs::DEFAULT_NOTICE_SWEEP_CRON,
        ),
        guild_deletion: jobs::schedule_or_default(
            env::var("GUILD_DELETION_CRON").ok(),
            jobs::DEFAULT_GUILD_DELETION_CRON,
        ),
    };
    let max_cooldown = lapd_commands::COMMANDS
        .iter()
        .filter_map(|command| command.guards.cooldown)
        .max()
        .unwrap_or_default();
    let _scheduler = jobs::start(
        jobs::JobContext {
            http: client.http.clone(),
            db,
            cooldowns,
            max_cooldown,
        },
        &schedules,
    )
    .await?;

    client.start().await?;
    Ok(())
}

fn required_env(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} is not set", key)))
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Comma-separated user ids; entries that are not ids are skipped.
fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<u64>().ok())
        .collect()
}

async fn reply_error(ctx: poise::Context<'_, Data, Error>, title: &str, message: String) {
    let reply = poise::CreateReply::default()
        .ephemeral(true)
        .embed(error_embed(title, message));
    if let Err(err) = ctx.send(reply).await {
        debug!(?err, "failed to deliver error reply");
    }
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => match classify(&error) {
            Some(app_error) if !app_error.is_fatal() => {
                debug!(command = %ctx.command().qualified_name, %app_error, "command rejected");
                reply_error(ctx, app_error.title(), app_error.to_string()).await;
            }
            _ => {
                error!(?error, command = %ctx.command().qualified_name, "command error");
                reply_error(
                    ctx,
                    "Command Error",
                    "Something went wrong while running this command.".to_owned(),
                )
                .await;
            }
        },
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            match error.as_ref().and_then(classify) {
                Some(app_error) => reply_error(ctx, app_error.title(), app_error.to_string()).await,
                None => {
                    if let Some(error) = error.as_ref() {
                        error!(
                            ?error,
                            command = %ctx.command().qualified_name,
                            "command check error"
                        );
                    }
                    reply_error(
                        ctx,
                        "Command Error",
                        "This command could not be checked right now.".to_owned(),
                    )
                    .await;
                }
            }
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!("Usage: `!{}`", ctx.command().qualified_name);
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\n{}", input, usage)
            } else {
                format!("Missing required argument.\n{}", usage)
            };

            reply_error(ctx, "Invalid Input", description).await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    _ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::GuildCreate { guild, .. } => {
            events::guild_lifecycle::handle_guild_create(data, guild).await;
        }
        serenity::FullEvent::GuildDelete { incomplete, .. } => {
            events::guild_lifecycle::handle_guild_delete(data, incomplete).await;
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_id_list;

    #[test]
    fn developer_ids_skip_junk() {
        assert_eq!(parse_id_list("1, 2,abc,,3 "), vec![1, 2, 3]);
        assert!(parse_id_list("").is_empty());
    }
}
