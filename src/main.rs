use anyhow::{anyhow, bail, Result};
use is_terminal::IsTerminal;
use oniongate::{registry, validators, zone, Config, SharedConfig};
use serde_json::json;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const COMMANDS: &str = "createdb | check <name> | register <name> <onion> | \
                        add-record <fqdn> <type> <value> | create-zone <zone>";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let mut args = std::env::args();
    let program_name = args.next().unwrap_or("oniongate".to_string());
    let args: Vec<String> = args.collect();
    let usage = || anyhow!("usage: {program_name} /path/to/config.json <{COMMANDS}>");

    let (config_file, command) = match args.as_slice() {
        [config_file, command @ ..] if !command.is_empty() => (config_file, command),
        _ => return Err(usage()),
    };
    let config = config_init(config_file)?;

    match command {
        [cmd] if cmd == "createdb" => {
            if config.store_path.is_none() {
                bail!("no store_path configured, nothing to create");
            }
            config.store().await?;
        }
        [cmd, name] if cmd == "check" => {
            let classification = validators::domain_name(name, &config.policy)?;
            println!("{}", json!(classification));
        }
        [cmd, name, onion] if cmd == "register" => {
            let store = config.store().await?;
            let domain =
                registry::register_domain(&config.policy, &mut *store.write().await, name, onion)
                    .await?;
            println!("{}", json!(domain));
        }
        [cmd, fqdn, record_type, value] if cmd == "add-record" => {
            let store = config.store().await?;
            let record = registry::add_record(
                &config.policy,
                &mut *store.write().await,
                fqdn,
                record_type,
                value,
            )
            .await?;
            println!("{}", json!(record));
        }
        [cmd, zone_name] if cmd == "create-zone" => {
            let store = config.store().await?;
            let contents = store.read().await.zone_contents(zone_name).await;
            if contents.is_empty() {
                tracing::warn!("no domains are registered in \"{zone_name}\"");
            }
            let serial = zone::zone_serial(OffsetDateTime::now_utc())?;
            print!("{}", zone::render_zone(&config, zone_name, &contents, serial)?);
        }
        _ => return Err(usage()),
    }
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal()),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oniongate=info".into()),
        )
        .init();
}

fn config_init(config_file: &str) -> Result<SharedConfig> {
    let config = Config::try_from_file(config_file)?;
    tracing::debug!("loaded config from {config_file}");
    Ok(Arc::new(config))
}
