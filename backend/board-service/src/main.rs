use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use board_service::db::{
    CommentRepository, PgCommentRepository, PgPostRepository, PgUserRepository, PostRepository,
    UserRepository,
};
use board_service::handlers;
use board_service::middleware::SessionIdentity;
use board_service::session::Sessions;
use redis::aio::ConnectionManager;
use redis::RedisError;
use session_store::{RedisSessionStore, SessionStore, SharedConnectionManager};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct HealthState {
    db_pool: PgPool,
    redis_manager: SharedConnectionManager,
}

impl HealthState {
    async fn check_postgres(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.db_pool)
            .await
            .map(|_| ())
    }

    async fn check_redis(&self) -> Result<(), RedisError> {
        let mut conn = self.redis_manager.lock().await;
        let pong: String = redis::cmd("PING").query_async(&mut *conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(RedisError::from((
                redis::ErrorKind::ResponseError,
                "unexpected PING response",
            )))
        }
    }
}

async fn health_summary(state: web::Data<HealthState>) -> HttpResponse {
    let postgres_ok = state.check_postgres().await.is_ok();
    let redis_ok = state.check_redis().await.is_ok();

    let body = serde_json::json!({
        "status": if postgres_ok && redis_ok { "ok" } else { "unhealthy" },
        "service": "board-service",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "postgresql": if postgres_ok { "healthy" } else { "unhealthy" },
            "redis": if redis_ok { "healthy" } else { "unhealthy" },
        }
    });

    if postgres_ok && redis_ok {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"alive": true}))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match board_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting board-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            io::Error::new(io::ErrorKind::Other, format!("migrations failed: {}", e))
        })?;

    tracing::info!("Connected to database, migrations applied");

    // Initialize the Redis-backed session store
    let redis_client = redis::Client::open(config.session.redis_url.as_str()).map_err(|e| {
        io::Error::new(io::ErrorKind::Other, format!("invalid REDIS_URL: {}", e))
    })?;
    let redis_conn = ConnectionManager::new(redis_client).await.map_err(|e| {
        io::Error::new(
            io::ErrorKind::Other,
            format!("failed to connect to Redis: {}", e),
        )
    })?;
    let redis_manager: SharedConnectionManager = Arc::new(Mutex::new(redis_conn));

    let session_store: Arc<dyn SessionStore> =
        Arc::new(RedisSessionStore::new(redis_manager.clone(), "session"));
    let sessions = Sessions::new(
        session_store,
        Duration::from_secs(config.session.ttl_secs),
    );

    // Repositories shared across workers
    let post_repo: Arc<dyn PostRepository> = Arc::new(PgPostRepository::new(db_pool.clone()));
    let comment_repo: Arc<dyn CommentRepository> =
        Arc::new(PgCommentRepository::new(db_pool.clone()));
    let user_repo: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(db_pool.clone()));

    let health_state = web::Data::new(HealthState {
        db_pool: db_pool.clone(),
        redis_manager: redis_manager.clone(),
    });

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    HttpServer::new(move || {
        // Build CORS configuration
        let mut cors = Cors::default();
        for origin in config.cors.allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(web::Data::from(post_repo.clone()))
            .app_data(web::Data::from(comment_repo.clone()))
            .app_data(web::Data::from(user_repo.clone()))
            .app_data(web::Data::new(sessions.clone()))
            .app_data(health_state.clone())
            .wrap(SessionIdentity::new(sessions.clone()))
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/api/health", web::get().to(health_summary))
            .route("/api/health/live", web::get().to(liveness_check))
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .workers(4)
    .run()
    .await
}
