use std::error::Error;

use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::info;
use rozklad_proxy::{
    schedule::{
        models::{Args, Config},
        schedule_getter::RozkladClient,
    },
    server::{build_router, AppState},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config: Config = Figment::new()
        .merge(Json::file(&args.config_json_path))
        .merge(Env::prefixed("ROZKLAD_"))
        .extract()?;
    info!(
        "Read config.json from {}",
        std::path::absolute(&args.config_json_path)?.display()
    );
    let schedule_getter = RozkladClient::from_config(&config)?;

    /* Serve */
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    let router = build_router(AppState::new(schedule_getter, config));
    axum::serve(listener, router).await?;

    Ok(())
}
