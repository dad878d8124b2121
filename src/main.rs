use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{value_parser, Arg, ArgMatches, Command};
use log::LevelFilter;
use rocket::config::LogLevel;
use thiserror::Error;

mod actions;
mod cache;
mod client;
mod config;
mod endpoints;
mod error;
mod extract;
mod models;
mod routes;
mod service;
#[cfg(test)]
mod test_utils;
mod track_list_url;

use cache::ResponseCache;
use client::TransportError;
use config::{ConfigError, GatewayConfig};
use service::MusicService;

const DEFAULT_CONFIG_PATH: &str = "gateway.config.json";

#[derive(Debug, Error)]
enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Could not set up Yandex Music session: {0}")]
    Upstream(#[from] TransportError),
    #[error("Web server error: {0}")]
    Rocket(#[from] Box<rocket::Error>),
}

struct Args {
    config_path: PathBuf,
    address: Option<IpAddr>,
    port: Option<u16>,
}

fn cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("address")
                .long("address")
                .env("HOST")
                .value_parser(value_parser!(IpAddr)),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .env("PORT")
                .value_parser(value_parser!(u16)),
        )
}

fn parse_cli_args(matches: &ArgMatches) -> Args {
    Args {
        config_path: matches
            .get_one::<PathBuf>("config")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
        address: matches.get_one::<IpAddr>("address").copied(),
        port: matches.get_one::<u16>("port").copied(),
    }
}

fn init_logging() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn load_config(args: &Args) -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::load(&args.config_path)?;
    if let Some(address) = args.address {
        config.address = address;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    Ok(config)
}

async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    let service = Arc::new(MusicService::setup(&config)?);
    let cache = ResponseCache::new(&config);

    let rocket_config = rocket::Config {
        address: config.address,
        port: config.port,
        // pretty_env_logger owns the global logger
        log_level: LogLevel::Off,
        ..rocket::Config::default()
    };
    log::info!("Listening on {}:{}", config.address, config.port);
    let rocket = routes::mount(rocket::custom(rocket_config), Arc::clone(&service), cache)
        .launch()
        .await
        .map_err(Box::new)?;
    drop(rocket);

    match Arc::try_unwrap(service) {
        Ok(service) => service.terminate(),
        Err(_) => log::error!("Yandex Music session still in use at shutdown"),
    }
    Ok(())
}

#[rocket::main]
async fn main() {
    init_logging();
    let args = parse_cli_args(&cli().get_matches());
    let result = match load_config(&args) {
        Ok(config) => run(config).await,
        Err(err) => Err(err.into()),
    };
    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
