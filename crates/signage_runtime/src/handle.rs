use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use signage_core::{Clock, MotionPreference, Msg};
use signage_logging::{signage_error, signage_info};
use tokio::sync::mpsc as async_mpsc;
use tokio_util::sync::CancellationToken;

use crate::{Driver, RuntimeEvent, RuntimeSettings};

/// Runs a [`Driver`] on a background thread with its own tokio runtime.
///
/// Messages go in through [`RuntimeHandle::send`]; events come back on a
/// plain channel that a UI loop polls with [`RuntimeHandle::try_recv`].
pub struct RuntimeHandle {
    cmd_tx: async_mpsc::UnboundedSender<Msg>,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    cancel: CancellationToken,
    thread: Option<thread::JoinHandle<()>>,
}

impl RuntimeHandle {
    pub fn spawn(
        settings: RuntimeSettings,
        clock: Clock,
        motion: Arc<dyn MotionPreference>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();

        let thread = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    signage_error!("failed to start runtime: {}", err);
                    return;
                }
            };
            let driver = Driver::new(settings, clock, motion);
            runtime.block_on(run_loop(driver, cmd_rx, event_tx, loop_cancel));
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
            thread: Some(thread),
        }
    }

    pub fn send(&self, msg: Msg) {
        let _ = self.cmd_tx.send(msg);
    }

    pub fn try_recv(&self) -> Option<RuntimeEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stops the loop and waits for the thread to exit. Pending timers are dropped.
    pub fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                signage_error!("runtime thread panicked");
            }
        }
    }
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_loop(
    mut driver: Driver,
    mut cmd_rx: async_mpsc::UnboundedReceiver<Msg>,
    event_tx: mpsc::Sender<RuntimeEvent>,
    cancel: CancellationToken,
) {
    signage_info!("runtime started");
    loop {
        let delay = driver.next_delay();
        let events = tokio::select! {
            _ = cancel.cancelled() => break,
            received = cmd_rx.recv() => match received {
                Some(msg) => driver.dispatch(msg),
                None => break,
            },
            _ = wait_for(delay) => driver.fire_due(),
        };
        if !forward(&event_tx, events) {
            break;
        }
    }
    signage_info!(
        "runtime stopped with {} pending timers",
        driver.pending_timers()
    );
}

async fn wait_for(delay: Option<Duration>) {
    match delay {
        Some(delay) => tokio::time::sleep(delay).await,
        None => std::future::pending::<()>().await,
    }
}

/// False once the receiving side is gone.
fn forward(event_tx: &mpsc::Sender<RuntimeEvent>, events: Vec<RuntimeEvent>) -> bool {
    events.into_iter().all(|event| event_tx.send(event).is_ok())
}
