//! Main application entry point (native).

#[cfg(feature = "native")]
fn main() {
    env_logger::init();

    if std::env::args().skip(1).any(|arg| arg == "--shortcuts") {
        inkmaid_app::ShortcutRegistry::print_all();
        return;
    }

    log::info!("Starting Inkmaid");

    pollster::block_on(inkmaid_app::App::run());
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
