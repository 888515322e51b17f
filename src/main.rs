#[macro_use]
extern crate diesel;

use std::io;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod password;
mod query;
mod schema;

use crate::config::Config;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // set up database connection pool
    let pool = db::build_pool(&config).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    db::initialize(&pool).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!(
        "starting HTTP server at http://{}:{} (database: {})",
        config.host,
        config.port,
        config.database_url
    );

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            // set up DB pool to be used with web::Data<Pool> extractor
            .app_data(web::Data::new(pool.clone()))
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
