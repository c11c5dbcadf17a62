use std::process;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::{PgPool, PgPoolOptions};

use taskdesk::auth::TokenIssuer;
use taskdesk::config::Config;
use taskdesk::routes;
use taskdesk::state::AppState;

/// Retries until the database accepts a connection or the attempts run out.
async fn connect_with_retry(config: &Config) -> Result<PgPool, sqlx::Error> {
    let attempts = config.db_connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        log::info!("connecting to database (attempt {}/{})", attempt, attempts);
        match PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(err) if attempt < attempts => {
                log::warn!("database not reachable yet: {}", err);
                tokio::time::sleep(Duration::from_secs(config.db_retry_delay_secs)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("invalid configuration: {}", err);
            process::exit(1);
        }
    };

    let pool = match connect_with_retry(&config).await {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("giving up on the database: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
        log::error!("failed to run migrations: {}", err);
        process::exit(1);
    }

    let state = web::Data::new(AppState::postgres(pool, config.bcrypt_cost));
    let issuer = web::Data::new(TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_hours));

    log::info!("starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(issuer.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
