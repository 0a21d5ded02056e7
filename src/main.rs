use poke_rand::config::load_config;
use poke_rand::ui::app::QuizApp;

fn main() -> eframe::Result<()> {
    poke_rand::init_tracing();

    let config = load_config();
    tracing::info!(api = %config.api_base, max_id = config.max_id, cache = %config.cache.cache_version, "Starting");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([560.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Poke Rand",
        options,
        Box::new(|_cc| {
            Ok(Box::new(QuizApp::new(config)))
        }),
    )
}
