use std::env;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::envelope::ApiResponse;
use crate::errors::ApiError;

mod claims;
mod envelope;
mod errors;
mod extractors;
mod helpers;
mod models;
mod routes;
mod schema;

pub fn establish_connection() -> Result<PgConnection, ApiError> {
    let database_url = env::var("DATABASE_URL").map_err(|_| {
        tracing::error!("DATABASE_URL must be set");
        ApiError::Internal
    })?;

    Ok(PgConnection::establish(&database_url)?)
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::message("Twinkle API is running"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let host = env::var("HOST").unwrap_or_else(|_| String::from("127.0.0.1"));
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(5000);

    tracing::info!(%host, port, "starting twinkle-api");

    HttpServer::new(|| {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                ApiError::InvalidInput(err.to_string()).into()
            }))
            .app_data(web::PathConfig::default().error_handler(|err, _| {
                ApiError::InvalidInput(err.to_string()).into()
            }))
            .service(health)
            .service(
                web::scope("/auth")
                    .service(routes::auth::signup)
                    .service(routes::auth::login),
            )
            .service(
                web::scope("/creator")
                    .service(routes::creator::upsert_profile)
                    .service(routes::creator::my_profile)
                    .service(routes::creator::create_video)
                    .service(routes::creator::my_videos),
            )
            .service(
                web::scope("/videos")
                    .service(routes::video::list_videos)
                    .service(routes::video::get_video)
                    .service(routes::video::update_video)
                    .service(routes::video::delete_video),
            )
            .service(
                web::scope("/admin")
                    .service(routes::admin::pending_creators)
                    .service(routes::admin::approve_creator),
            )
            .service(web::scope("/waitlist").service(routes::waitlist::join_waitlist))
    })
    .bind((host, port))?
    .run()
    .await
}
