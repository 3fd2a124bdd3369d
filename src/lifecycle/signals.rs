//! OS signal handling.

/// Resolve when SIGINT (Ctrl-C) or, on Unix, SIGTERM arrives.
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("SIGINT received");
            }
            _ = term.recv() => {
                tracing::info!("SIGTERM received");
            }
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Ctrl-C received");
        Ok(())
    }
}
