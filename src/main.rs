use quitotine::client::{ApiClient, ApiConfig};
use quitotine::state::AppState;
use quitotine::store::JsonFileStore;
use quitotine::time_utils::today_utc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_dir = std::env::var("QUITOTINE_DATA_DIR").unwrap_or_else(|_| ".quitotine".into());
    let store = JsonFileStore::new(&data_dir)?;
    let client = ApiConfig::from_env().map(ApiClient::new);
    if client.is_none() {
        tracing::info!("no access token configured; running from local state only");
    }
    let state = AppState::new(store, client);

    let Some(onboarding) = state.onboarding() else {
        tracing::warn!("no onboarding answers in {data_dir}; nothing to derive yet");
        return Ok(());
    };

    let plan = state.ensure_plan(&onboarding)?;
    tracing::info!(
        severity = plan.severity_label.label(),
        days = plan.duration_days,
        baseline_mg = plan.baseline_mg_per_day,
        "quit plan ready"
    );

    let today = today_utc();
    let (entries, craving_logs) = state.sync_journal(today).await;
    tracing::info!(
        entries = entries.len(),
        craving_logs = craving_logs.len(),
        "journal loaded"
    );

    let snapshot = state.day_snapshot(&plan, &entries, &craving_logs, today);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
