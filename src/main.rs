use std::sync::Arc;

use tokio::io::BufReader;

use coach_signup::config::WizardConfig;
use coach_signup::sinks::{self, MemoryClipboard, RecordingNavigator};
use coach_signup::cli;
use coach_signup::wizard::{RegistrationWizard, WizardDeps};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = WizardConfig::from_env()?;

    eprintln!("🏋️ Coach Signup v{}", env!("CARGO_PKG_VERSION"));

    // ── Sinks ────────────────────────────────────────────────────────────
    let (submission, invitation) = sinks::from_config(&config)?;
    match config.submit_url {
        Some(ref url) => eprintln!("   Submit: POST {}", url),
        None => eprintln!("   Submit: log only"),
    }
    match config.smtp {
        Some(ref smtp) => eprintln!("   Invitations: SMTP {}:{}", smtp.host, smtp.port),
        None => eprintln!("   Invitations: log only"),
    }

    let clipboard = Arc::new(MemoryClipboard::new());
    let navigator = Arc::new(RecordingNavigator::new());

    let deps = WizardDeps {
        submission,
        invitation,
        clipboard: clipboard.clone(),
        navigator: navigator.clone(),
    };
    let wizard = Arc::new(RegistrationWizard::new(
        deps,
        config.invite_link.clone(),
        config.dashboard_route.clone(),
    ));

    eprintln!("   Type 'help' for commands. /quit to exit.\n");

    let stdin = BufReader::new(tokio::io::stdin());
    if cli::run(wizard, stdin).await {
        for destination in navigator.visited() {
            eprintln!("→ {destination}");
        }
    }
    if let Some(copied) = clipboard.contents() {
        tracing::debug!(%copied, "Clipboard contents at exit");
    }

    Ok(())
}
