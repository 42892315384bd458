use actix_web::{web, App, HttpServer};
use log::{error, info};
use taskboard::{config::Settings, db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&settings).await.map_err(|e| {
        error!("Failed to create pool: {}", e);
        std::io::Error::other(e)
    })?;
    db::create_db_and_tables(&pool).await.map_err(|e| {
        error!("Failed to create tables: {}", e);
        std::io::Error::other(e)
    })?;

    let server_address = settings.server_address.clone();
    info!("Server running at http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(settings.clone()))
            .configure(routes::routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
