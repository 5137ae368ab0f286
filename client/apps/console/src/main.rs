//! Developer Smoke Console
//!
//! Drives the auth orchestrator against a real backend from the command
//! line, for poking at flows without the web UI. Uses `anyhow` for
//! startup errors; flow-level errors are the typed `AuthError` results.
//!
//! ```text
//! console login <email> <password>
//! console status <email> <password>
//! console reset-request <email>
//! ```

use std::env;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auth::application::config::AuthConfig;
use auth::application::orchestrator::AuthOrchestrator;
use auth::application::sign_in::SignInInput;
use auth::infra::http::{
    ApiClient, ApiConfig, HttpCodeDelivery, HttpIdentityGateway, HttpProfileStore,
    HttpTravelPreferencesStore,
};
use otp::application::config::OtpConfig;
use otp::infra::memory::MemoryCodeRepository;
use platform::clock::{Clock, SystemClock};
use platform::local_store::{LocalStore, MemoryLocalStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console=info,auth=info,otp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_url = env::var("API_BASE_URL").context("API_BASE_URL must be set in environment")?;
    let api_key = env::var("API_KEY").context("API_KEY must be set in environment")?;

    tracing::info!(base_url = %base_url, "Connecting to backend");
    let api = Arc::new(ApiClient::new(ApiConfig::new(base_url, api_key))?);

    let orchestrator = AuthOrchestrator::new(
        Arc::new(HttpIdentityGateway::new(api.clone())),
        Arc::new(HttpProfileStore::new(api.clone())),
        Arc::new(HttpTravelPreferencesStore::new(api.clone())),
        Arc::new(MemoryCodeRepository::new()),
        Arc::new(HttpCodeDelivery::new(api.clone())),
        Arc::new(MemoryLocalStore::new()) as Arc<dyn LocalStore>,
        Arc::new(SystemClock) as Arc<dyn Clock>,
        AuthConfig::default(),
        OtpConfig::default(),
    );

    // Keep the shared client's bearer token in sync with the session
    let mut session_rx = orchestrator.subscribe_session();
    let api_for_bearer = api.clone();
    tokio::spawn(async move {
        while session_rx.changed().await.is_ok() {
            let token = session_rx
                .borrow()
                .as_ref()
                .map(|session| session.access_token.clone());
            api_for_bearer.set_bearer(token);
        }
    });

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("login") => {
            let (email, password) = credentials(&args)?;
            let out = orchestrator
                .login(SignInInput { email, password })
                .await
                .context("login failed")?;
            println!("signed in as {}", out.identity.email);
        }
        Some("status") => {
            let (email, password) = credentials(&args)?;
            let out = orchestrator
                .login(SignInInput { email, password })
                .await
                .context("login failed")?;
            let status = orchestrator
                .check_user_registration_status(out.identity.identity_id)
                .await
                .context("status query failed")?;
            println!(
                "registration status: {status} (local hint: {})",
                orchestrator.onboarding_hint()
            );
        }
        Some("reset-request") => {
            let email = args
                .get(2)
                .context("usage: console reset-request <email>")?
                .clone();
            orchestrator
                .send_password_reset(&email)
                .await
                .context("reset request failed")?;
            println!("reset email requested (if the account exists)");
        }
        _ => {
            eprintln!("usage: console <login|status|reset-request> ...");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn credentials(args: &[String]) -> anyhow::Result<(String, String)> {
    let email = args
        .get(2)
        .context("usage: console <command> <email> <password>")?
        .clone();
    let password = args
        .get(3)
        .context("usage: console <command> <email> <password>")?
        .clone();
    Ok((email, password))
}
