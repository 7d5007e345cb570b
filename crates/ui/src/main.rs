mod app;
mod bridge;
mod widgets;

use std::path::Path;

use app::AppState;
use engine::TrimmerConfig;
use engine::config::DEFAULT_CONFIG_FILE;

fn main() -> iced::Result {
    init_tracing();

    let (config, config_error) =
        match TrimmerConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE)) {
            Ok(config) => (config, None),
            Err(error) => {
                tracing::warn!(%error, "falling back to default settings");
                (TrimmerConfig::default(), Some(error.to_string()))
            }
        };

    iced::application("Trimmer", AppState::update, AppState::view)
        .subscription(AppState::subscription)
        .run_with(move || AppState::boot(config, config_error))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt::try_init();
}
