//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting Voxide");

    voxide_app::App::run();
}
