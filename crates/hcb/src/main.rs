use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use hcb_core::{
    config::Config,
    messaging::port::ChatBackend,
    presence::PresenceStatus,
    serve::serve_forever,
};
use hcb_hoge::HogeBackend;

mod console;
mod echo;

use console::ConsoleClient;
use echo::EchoHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let logging = hcb_core::logging::init("hcb", &cfg.log)?;

    let cancel = CancellationToken::new();
    let backend = Arc::new(HogeBackend::new(&cfg, |token| {
        Ok(ConsoleClient::spawn(token, cancel.clone()))
    })?);

    tracing::info!(
        data_dir = %cfg.data_dir.display(),
        plugin_dir = ?cfg.extra_plugin_dir,
        backend_dir = ?cfg.extra_backend_dir,
        "host settings"
    );
    for admin in &cfg.admins {
        if let Err(e) = backend.build_identifier(admin) {
            tracing::warn!(%admin, error = %e, "ignoring admin entry");
        }
    }

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("interrupt received");
                    cancel.cancel();
                }
                Err(e) => tracing::warn!(error = %e, "cannot listen for ctrl-c"),
            }
        });
    }

    backend
        .change_presence(PresenceStatus::Online, "ready")
        .await?;

    let handler = EchoHandler::new(Arc::clone(&backend));
    let served = serve_forever(backend.as_ref(), &handler, cfg.poll_interval, cancel).await;

    if let Err(e) = backend
        .change_presence(PresenceStatus::Offline, "shutting down")
        .await
    {
        tracing::warn!(error = %e, "presence update failed");
    }

    logging.shutdown();
    served?;
    Ok(())
}
