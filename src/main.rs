use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpServer};

use picklejar::db;
use picklejar::handlers::{
    home_handlers, jar_handlers, location_handlers, member_handlers, results_handlers,
    suggestion_handlers, vote_handlers,
};
use picklejar::models::vote::VoteRules;
use picklejar::scheduler;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Ensure data directory exists
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "data/app.db".to_string());
    let pool = db::init_pool(&database_path);
    db::run_migrations(&pool);

    scheduler::spawn_scheduler(pool.clone());

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let vote_rules = VoteRules::from_env();
    let geo_state = web::Data::new(location_handlers::GeoState::from_env());

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(vote_rules))
            .app_data(geo_state.clone())
            // Static files
            .service(actix_files::Files::new("/static", "./static"))
            // Home and jar creation
            .route("/", web::get().to(home_handlers::index))
            .route("/jars", web::post().to(home_handlers::create))
            // Jar page and administration — /jar/{id}/edit BEFORE /jar/{id}
            // sub-resources so routing stays unambiguous
            .route("/jar/{id}", web::get().to(jar_handlers::view))
            .route("/jar/{id}/edit", web::get().to(jar_handlers::edit_form))
            .route("/jar/{id}/edit", web::post().to(jar_handlers::edit_submit))
            .route(
                "/jar/{id}/phase/{action}",
                web::post().to(jar_handlers::phase_action),
            )
            // Membership
            .route("/jar/{id}/join", web::get().to(member_handlers::join_form))
            .route("/jar/{id}/join", web::post().to(member_handlers::join_submit))
            .route("/jar/{id}/leave", web::post().to(member_handlers::leave))
            // Suggestions
            .route("/jar/{id}/suggest", web::get().to(suggestion_handlers::suggest_form))
            .route("/jar/{id}/suggest", web::post().to(suggestion_handlers::suggest_submit))
            .route(
                "/jar/{id}/suggestion/{sid}/delete",
                web::post().to(suggestion_handlers::delete),
            )
            // Voting and results
            .route("/jar/{id}/vote", web::get().to(vote_handlers::vote_form))
            .route("/jar/{id}/vote", web::post().to(vote_handlers::vote_submit))
            .route(
                "/jar/{id}/vote/clear",
                web::post().to(vote_handlers::vote_clear),
            )
            .route("/jar/{id}/results", web::get().to(results_handlers::view))
            // Location search (JSON, used by the suggest form)
            .route("/jar/{id}/locations", web::get().to(location_handlers::search))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
