use std::io;

use actix_cors::Cors;
use actix_web::{
    http::header,
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;

use uptask::routes::{self, health};
use uptask::{Config, Mailer};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    log::error!("{}: {}", context, err);
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    log::info!("database connected");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;

    let mailer = Mailer::from_config(&config).map_err(|e| startup_error("invalid mail settings", e))?;

    let bind = (config.server_host.clone(), config.server_port);
    log::info!("starting UpTask server at {}", config.server_url());

    let pool = web::Data::new(pool);
    let mailer = web::Data::new(mailer);
    let config = web::Data::new(config);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&config.frontend_url)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(pool.clone())
            .app_data(config.clone())
            .app_data(mailer.clone())
            .wrap(NormalizePath::trim())
            .wrap(cors)
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind(bind)?
    .run()
    .await
}
