use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use foodgram::config::ServerConfig;
use foodgram::repository::DieselRepository;
use foodgram::routes::{api_scope, json_error_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    let secret_key = match &config.secret {
        Some(key) => Key::from(key.as_bytes()),
        None => Key::generate(),
    };
    let common_config = config.common();

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let domain = config.domain.clone();
    let bind = (config.address.clone(), config.port);
    log::info!("Listening on {}:{}", bind.0, bind.1);

    HttpServer::new(move || {
        App::new()
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(api_scope())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(common_config.clone()))
    })
    .bind(bind)?
    .run()
    .await
}
