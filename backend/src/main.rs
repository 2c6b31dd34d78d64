use backend::{build_rocket, config::LedgerSettings, routes::AppState};
use shuttle_runtime::{CustomError, SecretStore};
use tracing::info;

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_runtime::Secrets] secret_store: SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting vote ledger");

    let settings = LedgerSettings::from_secrets(&secret_store);
    let store = settings.open_store().map_err(CustomError::new)?;
    let state = AppState::new(store);
    state.ledger.init_ledger().map_err(CustomError::new)?;

    info!("📋 Ledger ready");

    Ok(build_rocket(state).into())
}
