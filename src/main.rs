//! Chat widget - terminal front end for a remote chat answering service

use chat_widget::chat_client::{HttpAnswerService, LoggingService};
use chat_widget::config::WidgetConfig;
use chat_widget::runtime::ProductionController;
use chat_widget::ui::{self, App};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = WidgetConfig::from_env();

    // The terminal owns stdout, so logs go to a file
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_widget=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    tracing::info!(
        base_url = %config.base_url,
        timeout = ?config.request_timeout,
        max_attachment_bytes = ?config.max_attachment_bytes,
        "Starting chat widget"
    );

    let service = LoggingService::new(HttpAnswerService::new(
        &config.base_url,
        config.request_timeout,
    )?);
    let controller: ProductionController =
        ProductionController::new(service, config.max_attachment_bytes);
    let mut app = App::new(controller, config.title.clone());

    let mut terminal = ratatui::init();
    let result = ui::run(&mut app, &mut terminal).await;
    ratatui::restore();

    tracing::info!(
        messages = app.controller().messages().len(),
        "Chat widget closed"
    );
    result?;
    Ok(())
}
