use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::WorkFactor;
use auth_service::config::Config;
use auth_service::credential::ports::AuthServicePort;
use auth_service::credential::service::AuthService;
use auth_service::inbound::grpc::interceptor::PUBLIC_METHODS;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::grpc::AuthInterceptorLayer;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::redis_store;
use auth_service::outbound::redis_store::RedisRevocationLedger;
use auth_service::outbound::redis_store::RedisSessionCache;
use auth_service::outbound::repositories::PostgresCredentialRepository;
use auth_service::proto::auth_service_server::AuthServiceServer;
use sqlx::postgres::PgPoolOptions;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        token_lifetime_hours = config.jwt.expiration_hours,
        session_cache_ttl_secs = config.session_cache.ttl_secs,
        ledger_policy = ?config.revocation.on_unavailable,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .max_lifetime(Duration::from_secs(config.database.max_lifetime_secs))
        .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        min_connections = config.database.min_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let redis_pool = redis_store::create_pool(&config.redis)?;
    match redis_pool.get().await {
        Ok(_) => tracing::info!(pool_size = config.redis.pool_size, "Redis connection pool created"),
        Err(e) => tracing::warn!(
            error = %e,
            "Redis not reachable at startup, session cache will miss and revocation checks will fail"
        ),
    }

    let password_hasher = PasswordHasher::with_work_factor(WorkFactor::from(&config.hashing))?;
    let mut authenticator = Authenticator::new(config.jwt.secret.as_bytes())
        .with_password_hasher(password_hasher)
        .with_token_lifetime(config.token_lifetime());
    if let Some(issuer) = &config.jwt.issuer {
        authenticator = authenticator.with_issuer(issuer);
    }

    let auth_service: Arc<dyn AuthServicePort> = Arc::new(AuthService::new(
        Arc::new(PostgresCredentialRepository::new(pg_pool)),
        Arc::new(RedisSessionCache::new(redis_pool.clone())),
        Arc::new(RedisRevocationLedger::new(redis_pool)),
        Arc::new(authenticator),
        config.session_cache_ttl(),
    ));
    let ledger_policy = config.revocation.on_unavailable;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::clone(&auth_service), ledger_policy);
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let grpc_service = AuthGrpcService::new(Arc::clone(&auth_service), ledger_policy);
    let grpc_auth_layer =
        AuthInterceptorLayer::new(Arc::clone(&auth_service), ledger_policy).allow(PUBLIC_METHODS);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .layer(grpc_auth_layer)
            .add_service(AuthServiceServer::new(grpc_service))
            .serve(grpc_address)
            .await
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((http_result, grpc_result)) => {
            if let Err(e) = http_result {
                tracing::error!(error = %e, protocol = "http", "Server error");
            }
            if let Err(e) = grpc_result {
                tracing::error!(error = %e, protocol = "grpc", "Server error");
            }
            tracing::info!("Servers exited");
        }
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    };

    Ok(())
}
