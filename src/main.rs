// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, sync::Arc};

use account_mail_server::{
    api::router,
    config::AppConfig,
    mailer::{LogMailer, Mailer, SmtpMailer},
    state::AppState,
    storage::{AccountDatabase, AccountStore, InMemoryAccountStore},
    telemetry,
};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may be set directly.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().expect("Invalid configuration");
    telemetry::init(config.log_format);

    if config.has_weak_secret() {
        tracing::warn!("JWT_SECRET is shorter than 32 bytes; use a longer random value");
    }

    let store: Arc<dyn AccountStore> = match &config.data_dir {
        Some(dir) => {
            tracing::info!(data_dir = %dir.display(), "Using redb account store");
            Arc::new(AccountDatabase::open_in_dir(dir).expect("Failed to open account database"))
        }
        None => {
            tracing::warn!("DATA_DIR not set; accounts are kept in memory only");
            Arc::new(InMemoryAccountStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "Using SMTP mailer");
            Arc::new(SmtpMailer::new(smtp).expect("Failed to configure SMTP mailer"))
        }
        None => {
            tracing::warn!("EMAIL_USER not set; emails are logged, not sent");
            Arc::new(LogMailer)
        }
    };

    let state = AppState::new(&config, store, mailer).expect("Invalid password hash parameters");
    let app = router(state);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .expect("Failed to parse bind address");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(%addr, base_url = %config.base_url, "Account mail server listening (docs at /docs)");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("HTTP server failed");

    tracing::info!("Server stopped");
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
