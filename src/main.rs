use faculty_appraisal::auth::MockAuth;
use faculty_appraisal::{AppConfig, Dashboard};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };
    info!("Appraisal data in {}", config.data_dir.display());

    let store = config.open_store();

    if std::env::args().skip(1).any(|arg| arg == "--reset") {
        if let Err(e) = store.clear_all() {
            error!("Failed to clear appraisal data: {}", e);
            std::process::exit(1);
        }
    }

    let auth = MockAuth::new(store.clone(), config.login_delay);
    match auth.current_user() {
        Some(user) if auth.is_authenticated() => {
            info!("Signed in as {} ({}, {})", user.name, user.email, user.department)
        }
        _ => info!("Not signed in"),
    }

    let dashboard = Dashboard::read(&store);
    info!(
        "Total API score {} | {}/{} sections completed ({}%)",
        dashboard.total_score,
        dashboard.completed,
        dashboard.total_sections,
        dashboard.rounded_percentage()
    );
    for row in &dashboard.sections {
        match row.api_score {
            Some(score) => info!("  {:<36} {:?} ({})", row.title, row.status, score),
            None => info!("  {:<36} {:?}", row.title, row.status),
        }
    }
}
