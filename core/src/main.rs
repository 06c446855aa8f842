mod cors;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();

    // get info
    let is_production = config.environment == "production";
    let origin = config.cors_allowed_origin.clone();

    // init logger
    if config.console_logging_enabled {
        logger::setup().expect("Failed to set up logger");
    }

    // init db connection
    let pool = db::setup(&config.database_url, is_production)
        .await
        .expect("Failed to set up database");

    // one connection pool for all outbound provider calls
    let http_client = reqwest::Client::new();

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(http_client.clone()))
            .wrap(limiter::global_middleware(10)) // max 10 requests per second
            .wrap(logger::middleware()) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(
                web::scope("/api")
                    .service(api_auth::mount_auth())
                    .service(
                        web::scope("")
                            .wrap(api_auth::auth_middleware())
                            .service(api_auth::mount_user())
                            .service(api_gen::mount_thumbnails())
                            .service(api_pay::mount_pay()),
                    ),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
