mod ui;

use adw::Application;
use adw::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // also routes the library's `log` records
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("logging already initialised: {e}");
    }
}

fn main() -> glib::ExitCode {
    init_logging();
    let app = Application::builder()
        .application_id("br.com.iagiliza.ClinicDashboard")
        .build();
    app.connect_activate(|app| {
        crate::ui::build_ui(app);
    });
    app.run()
}
