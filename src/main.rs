//! NetEase web player shell.
//!
//! Entry point: installs logging and opens the player window. When built
//! without the `gui` feature, performs one headless capture/restore cycle
//! against the persisted record and relays an optional media command.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("logging already initialised");
    }
}

#[cfg(feature = "gui")]
fn main() {
    init_logging();
    if let Err(e) = netease_webplayer::ui::webview_app::run() {
        tracing::error!(error = %e, "player shell failed to start");
        std::process::exit(1);
    }
}

#[cfg(not(feature = "gui"))]
fn main() {
    use netease_webplayer::app::App;
    use netease_webplayer::types::command::MediaCommand;
    use netease_webplayer::types::playback::RestorePayload;

    init_logging();

    let mut app = App::new();
    app.startup();

    let record = app.playback.state_file().read().ok().flatten();
    match record.as_deref().and_then(RestorePayload::parse) {
        Some(payload) => tracing::info!(payload = %payload.to_json(), "restorable playback state"),
        None => tracing::info!("no restorable playback state"),
    }

    let command = std::env::args().nth(1).and_then(|arg| {
        MediaCommand::ALL
            .into_iter()
            .find(|c| c.method_name().eq_ignore_ascii_case(&arg))
    });
    if let Some(command) = command {
        let delivered = app.dispatcher.dispatch(command);
        tracing::info!(%command, delivered, "media command relayed");
    }

    app.shutdown();
}
