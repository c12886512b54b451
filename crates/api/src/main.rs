use billfold_api::app::{AppConfig, build_app};

#[tokio::main]
async fn main() {
    billfold_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let password_salt = std::env::var("PASSWORD_SALT").unwrap_or_else(|_| {
        tracing::warn!("PASSWORD_SALT not set; using insecure dev default");
        "dev-salt".to_string()
    });
    let attachment_dir = std::env::var("ATTACHMENT_DIR").ok().map(Into::into);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = build_app(AppConfig {
        jwt_secret,
        password_salt,
        attachment_dir,
    });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
