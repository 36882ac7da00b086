//! In-process signal bus shared by the taskbar components.

use startmenu_types::Signal;
use tokio::sync::broadcast;
use tracing::debug;

const SIGNAL_CAPACITY: usize = 32;

/// Typed broadcast bus. Cloning yields another handle to the same bus.
#[derive(Debug, Clone)]
pub struct SignalBus {
    tx: broadcast::Sender<Signal>,
}

impl SignalBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { tx }
    }

    /// Fire a signal to every current subscriber. Having none is fine.
    pub fn emit(&self, signal: Signal) {
        let receivers = self.tx.send(signal).unwrap_or(0);
        debug!("Emitted {} to {} receivers", signal, receivers);
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Signal> {
        self.tx.subscribe()
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
