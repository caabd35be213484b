use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use fsync::domain::ports::ChangeSink;
use fsync::{
    load_host_set, CancellationToken, FsyncError, LogSink, OpenSshConnector, Settings, Supervisor,
    SyncWorkerFactory, WorkerStatus,
};
use tracing::{error, info};

use crate::cli::RunArgs;

pub fn cmd_run(mut settings: Settings, args: &RunArgs) -> Result<()> {
    if let Some(ms) = args.poll_interval_ms {
        settings.poll_interval = Duration::from_millis(ms);
    }
    if let Some(secs) = args.connect_timeout {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(policy) = args.on_failure {
        settings.on_failure = policy.into();
    }

    let hosts = load_host_set(&settings)?;

    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        handler_token.cancel();
    })
    .context("cannot install Ctrl+C handler")?;

    let connector = Arc::new(OpenSshConnector::new(settings.connect_timeout));
    let factory = Arc::new(SyncWorkerFactory::new(settings.poll_interval, |_, _| {
        Box::new(LogSink) as Box<dyn ChangeSink>
    }));
    let supervisor =
        Supervisor::new(connector, factory, settings.on_failure).with_cancellation(token);

    let outcomes = match supervisor.run(&hosts) {
        Ok(outcomes) => outcomes,
        Err(FsyncError::Cancelled) => {
            info!("interrupted before sync started");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.status {
            WorkerStatus::Failed(message) => {
                failed += 1;
                error!(host = %outcome.pet_name, "sync worker failed: {message}");
            }
            status => info!(
                host = %outcome.pet_name,
                status = %status,
                events = outcome.stats.events,
                "sync worker finished"
            ),
        }
    }
    if failed > 0 {
        bail!("{failed} of {} sync workers failed", outcomes.len());
    }
    Ok(())
}
