//! nativesvc-demo - a heartbeat service
//!
//! Logs a heartbeat every few seconds while running. Pass a verb as the
//! first argument to manage it:
//!
//! ```text
//! nativesvc-demo install | remove | debug | start | stop
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use nativesvc::ServiceConfig;

/// Interval between heartbeats, overridable with NATIVESVC_DEMO_INTERVAL (seconds)
const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

fn heartbeat_interval() -> Duration {
    std::env::var("NATIVESVC_DEMO_INTERVAL")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_INTERVAL)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout, so launchd's StandardOutPath and the journal pick it up
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stdout)
        .init();

    let worker: Arc<Mutex<Option<JoinHandle<()>>>> = Arc::new(Mutex::new(None));
    let start_worker = Arc::clone(&worker);
    let stop_worker = Arc::clone(&worker);

    let config = ServiceConfig::from_current_exe("nativesvc-demo")?
        .display_name("nativesvc demo")
        .long_description("Logs a heartbeat while running")
        .on_init(|| {
            log::info!("Heartbeat interval {:?}", heartbeat_interval());
            Ok(())
        })
        .on_start(move || {
            let interval = heartbeat_interval();
            let handle = tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                let mut beats: u64 = 0;
                loop {
                    ticker.tick().await;
                    beats += 1;
                    log::info!("heartbeat #{}", beats);
                }
            });
            *start_worker.lock().map_err(|e| e.to_string())? = Some(handle);
            Ok(())
        })
        .on_stop(move || {
            if let Some(handle) = stop_worker.lock().map_err(|e| e.to_string())?.take() {
                handle.abort();
            }
            Ok(())
        })
        .build()?;

    nativesvc::dispatch(config).await?;

    Ok(())
}
