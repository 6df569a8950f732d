extern crate actix_files;
extern crate actix_multipart;
extern crate actix_web;
extern crate anyhow;
extern crate bytes;
extern crate chrono;
extern crate default;
extern crate dotenv;
extern crate env_logger;
#[cfg(test)]
extern crate futures;
extern crate futures_util;
extern crate hex;
#[cfg(test)]
extern crate itertools;
extern crate jsonwebtoken;
extern crate log;
extern crate rand;
extern crate serde;
extern crate serde_json;
extern crate sha2;
extern crate sqlx;
extern crate thiserror;
extern crate tokio;
extern crate uuid;

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
mod impls;
mod middlewares;
pub mod response;

use actix_files::Files;
use actix_web::web::{get, post, resource, Data};
use actix_web::HttpServer;
use anyhow::bail;
use config::{AdminSeed, Config, DbConfig};
use database::postgres::PgSqlxManager;
use impls::uploaders::local_storage::LocalStorage;
use middlewares::session::Sessions;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::core::ports::repository::Manager;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match std::env::args().nth(1).as_deref() {
        Some("migrate") => migrate(&connect().await?).await,
        Some("seed") => seed(connect().await?).await,
        None | Some("serve") => {
            let config = Config::load()?;
            serve(config, connect().await?).await
        }
        Some(other) => bail!("unknown command {}, expected one of: migrate, seed, serve", other),
    }
}

async fn connect() -> anyhow::Result<PgPool> {
    let db = DbConfig::load()?;
    let pool = PgPoolOptions::new()
        .max_connections(db.max_connections)
        .connect_with(db.connect_options())
        .await?;
    Ok(pool)
}

async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    log::info!("migrations applied");
    Ok(())
}

async fn seed(pool: PgPool) -> anyhow::Result<()> {
    let admin = AdminSeed::load()?;
    let mut store = PgSqlxManager::new(pool).acquire().await?;
    crate::core::services::user::bootstrap_admin(&mut store, &admin).await?;
    Ok(())
}

async fn serve(config: Config, pool: PgPool) -> anyhow::Result<()> {
    let manager = PgSqlxManager::new(pool);
    let sessions = Sessions::new(config.session_secret.as_bytes(), config.session_ttl_hours);
    let storage = LocalStorage::new(&config.upload_path, config.max_photo_bytes)?;
    let upload_path = config.upload_path.clone();
    log::info!("listening on {}", config.bind_addr);
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(sessions.middleware())
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(manager.clone()))
            .app_data(Data::new(sessions.clone()))
            .app_data(Data::new(storage.clone()))
            .app_data(handlers::form_config())
            .app_data(handlers::path_config())
            .service(Files::new("/uploads", &upload_path))
            .route("/", get().to(handlers::index))
            .service(resource("/login").route(get().to(handlers::login_page)).route(post().to(handlers::login::<PgSqlxManager>)))
            .service(resource("/register").route(get().to(handlers::register_page)).route(post().to(handlers::register::<PgSqlxManager>)))
            .route("/logout", get().to(handlers::logout))
            .route("/profile", get().to(handlers::user::me::<PgSqlxManager>))
            .service(
                resource("/admin_dashboard")
                    .route(get().to(handlers::election::dashboard::<PgSqlxManager>))
                    .route(post().to(handlers::election::publish::<PgSqlxManager>)),
            )
            .route("/delete_election/{id}", get().to(handlers::election::delete::<PgSqlxManager, LocalStorage>))
            .service(
                resource("/add_candidate/{election_id}")
                    .route(get().to(handlers::candidate::list::<PgSqlxManager>))
                    .route(post().to(handlers::candidate::add::<PgSqlxManager>)),
            )
            .route("/admin/approvals", get().to(handlers::user::approvals::<PgSqlxManager>))
            .route("/approve_user/{id}", get().to(handlers::user::approve::<PgSqlxManager>))
            .route("/delete_user/{id}", get().to(handlers::user::reject::<PgSqlxManager>))
            .route("/student_dashboard", get().to(handlers::vote::dashboard::<PgSqlxManager>))
            .service(
                resource("/vote/{election_id}")
                    .route(get().to(handlers::vote::ballot_page::<PgSqlxManager>))
                    .route(post().to(handlers::vote::cast::<PgSqlxManager>)),
            )
            .route("/results/{election_id}", get().to(handlers::result::results::<PgSqlxManager>))
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;
    Ok(())
}
