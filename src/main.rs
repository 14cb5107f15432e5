use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use telegram_bot_db::{config::Config, database::create_pool, services::SchemaInitializer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().context("Failed to load configuration")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to the database")?;

    let report = SchemaInitializer::new(pool.clone(), config.schema.clone())
        .run()
        .await
        .context("Database initialization failed")?;

    log::info!(
        "Schema at revision {} ({} migration(s) applied this run)",
        report.revision,
        report.applied.len()
    );
    if let Some(seeded) = report.seeded {
        log::info!(
            "Sample data: {} inserted, {} already present",
            seeded.inserted,
            seeded.skipped
        );
    }

    pool.close().await.context("Failed to close the database pool")?;

    println!("Database initialized successfully!");
    Ok(())
}
