//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Croqui Fácil");

    let config = croqui_app::AppConfig::load();
    if let Err(e) = croqui_app::run(config) {
        log::error!("Application error: {e}");
        std::process::exit(1);
    }
}
