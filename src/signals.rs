//! Termination requests delivered by the OS
//!
//! The lifecycle runner waits on a single-slot channel. `SignalListener`
//! feeds that channel from SIGINT/SIGQUIT/SIGTERM:
//! - SIGINT: Ctrl+C, and the upstart/systemd `kill signal`
//! - SIGQUIT: quit from the terminal
//! - SIGTERM: launchd and generic service-manager stop
//!
//! SIGKILL and SIGSTOP cannot be caught by any process. They are accepted by
//! [`TerminationRequest::from_signal`] only to be mapped to `None`.

use nix::sys::signal::Signal;
use tokio::signal::unix::{signal, Signal as SignalStream, SignalKind};
use tokio::sync::mpsc;

/// Why the runner was asked to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationRequest {
    /// SIGINT
    Interrupt,
    /// SIGQUIT
    Quit,
    /// SIGTERM
    Terminate,
    /// Line on stdin in debug mode
    Console,
    /// Every sender of the termination channel went away
    ChannelClosed,
}

impl TerminationRequest {
    /// Map a signal to a termination request.
    ///
    /// Returns `None` for signals that do not request termination, and for
    /// SIGKILL/SIGSTOP, which never reach a handler.
    pub fn from_signal(sig: Signal) -> Option<Self> {
        match sig {
            Signal::SIGINT => Some(Self::Interrupt),
            Signal::SIGQUIT => Some(Self::Quit),
            Signal::SIGTERM => Some(Self::Terminate),
            Signal::SIGKILL | Signal::SIGSTOP => None,
            _ => None,
        }
    }

    pub fn signal(&self) -> Option<Signal> {
        match self {
            Self::Interrupt => Some(Signal::SIGINT),
            Self::Quit => Some(Signal::SIGQUIT),
            Self::Terminate => Some(Signal::SIGTERM),
            Self::Console | Self::ChannelClosed => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "interrupt",
            Self::Quit => "quit",
            Self::Terminate => "terminate",
            Self::Console => "console",
            Self::ChannelClosed => "channel closed",
        }
    }
}

/// OS signal streams for the termination signals
pub struct SignalListener {
    sigint: SignalStream,
    sigquit: SignalStream,
    sigterm: SignalStream,
}

impl SignalListener {
    /// Register the signal handlers. Must be called inside a tokio runtime.
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigquit: signal(SignalKind::quit())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Wait for the next termination signal
    pub async fn wait(&mut self) -> TerminationRequest {
        tokio::select! {
            _ = self.sigint.recv() => TerminationRequest::Interrupt,
            _ = self.sigquit.recv() => TerminationRequest::Quit,
            _ = self.sigterm.recv() => TerminationRequest::Terminate,
        }
    }

    /// Spawn a task forwarding signals into a single-slot channel.
    ///
    /// Requests arriving while the slot is occupied are dropped.
    pub fn spawn_forwarder(mut self) -> mpsc::Receiver<TerminationRequest> {
        let (tx, rx) = mpsc::channel(1);

        tokio::spawn(async move {
            loop {
                let request = self.wait().await;
                log::info!("OS notification: {}", request.as_str());

                match tx.try_send(request) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        log::debug!("Shutdown already pending, ignoring {}", request.as_str());
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        // Receiver dropped, exit
                        break;
                    }
                }
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_signal() {
        assert_eq!(
            TerminationRequest::from_signal(Signal::SIGINT),
            Some(TerminationRequest::Interrupt)
        );
        assert_eq!(
            TerminationRequest::from_signal(Signal::SIGQUIT),
            Some(TerminationRequest::Quit)
        );
        assert_eq!(
            TerminationRequest::from_signal(Signal::SIGTERM),
            Some(TerminationRequest::Terminate)
        );
        assert_eq!(TerminationRequest::from_signal(Signal::SIGHUP), None);
    }

    #[test]
    fn test_uncatchable_signals_are_ignored() {
        assert_eq!(TerminationRequest::from_signal(Signal::SIGKILL), None);
        assert_eq!(TerminationRequest::from_signal(Signal::SIGSTOP), None);
    }

    #[test]
    fn test_signal_round_trip() {
        for request in [
            TerminationRequest::Interrupt,
            TerminationRequest::Quit,
            TerminationRequest::Terminate,
        ] {
            let sig = request.signal().unwrap();
            assert_eq!(TerminationRequest::from_signal(sig), Some(request));
        }
        assert_eq!(TerminationRequest::Console.signal(), None);
    }
}
