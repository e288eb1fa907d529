use crate::config;
use crate::config::schema::PadConfig;
use crate::controller::Controller;
use crate::device::console::{self, ConsoleDisplay, ConsoleInput, ConsoleOutput, DetachedBus};
use crate::device::satellite::Satellite;
use crate::device::Peripherals;
use crate::error::{PadError, Result};
use crate::render;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Run the padd daemon on the console backend until SIGINT.
///
/// # Errors
/// Returns `PadError::NoApplications` if no macro set could be loaded (after
/// halting on the "no macro files" screen until shutdown), or `PadError::Io`
/// if the macro folder cannot be listed.
pub async fn run(config: PadConfig) -> Result<()> {
    let cancel = CancellationToken::new();
    let apps = config::load_applications(&config.pad.macro_folder)?;

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    console::spawn_stdin_reader(input_tx)?;

    let now = Instant::now();
    let satellite = Satellite::connect(DetachedBus, config.satellite.policy(), now);
    let mut hw = Peripherals::new(ConsoleOutput, ConsoleDisplay::default(), satellite);

    if apps.is_empty() {
        error!(
            "no macro files in {}, halting",
            config.pad.macro_folder.display()
        );
        render::show_no_applications(&mut hw.display);
        wait_for_shutdown(&cancel).await;
        return Err(PadError::NoApplications);
    }

    let mut controller = Controller::new(apps, hw, ConsoleInput::new(input_rx), &config.pad, now)?;
    let mut ticker = tokio::time::interval(config.pad.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        "padd running: {} applications, polling every {:?}",
        controller.registry().len(),
        config.pad.poll_interval()
    );

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            () = async { tokio::signal::ctrl_c().await.ok(); } => {
                info!("received SIGINT, shutting down");
                cancel.cancel();
                break;
            }
            _ = ticker.tick() => {
                controller.step(Instant::now()).await;
            }
        }
    }

    info!("daemon shutting down...");
    controller.peripherals_mut().reset_outputs();
    cancel.cancel();

    info!(
        "daemon stopped ({} unsupported steps skipped)",
        controller.interpreter().skipped()
    );
    Ok(())
}

async fn wait_for_shutdown(cancel: &CancellationToken) {
    tokio::select! {
        () = cancel.cancelled() => {}
        () = async { tokio::signal::ctrl_c().await.ok(); } => {
            info!("received SIGINT, shutting down");
        }
    }
    cancel.cancel();
}
