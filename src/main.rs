use actix_web::{App, HttpServer, middleware};
use actix_cors::Cors;
use gobra_playground::api::{configure_routes, AppState};
use gobra_playground::{banner, config};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env()
        .expect("Failed to load app configuration from environment");

    log::info!(
        "Verifying with {} -jar {} (timeout {}s)",
        app_config.java_path.display(),
        app_config.gobra_jar.display(),
        app_config.timeout.as_secs()
    );

    let bind_addr = (app_config.host.clone(), app_config.port);
    let state = AppState::new(app_config);

    println!("🚀 Running on http://{}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(actix_web::web::Data::new(state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(bind_addr)?
    .run()
    .await
}
