use crate::core_network::admission::ConnectionCounter;
use crate::server::ServerContext;
use crate::watchdog::IdleWatchdog;
use log::info;
use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Data transfer process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtpState {
    None,
    // PORT is not implemented, the state only exists for completeness.
    #[allow(dead_code)]
    Active,
    Passive,
}

/// State of one command connection. Owned by the task reading that
/// connection and never shared with another session.
pub struct Session {
    pub username: String,
    pub is_authenticated: bool,
    pub current_dir: String,
    pub dtp_state: DtpState,
    /// Pending PASV/EPSV listener, single use.
    pub pasv_listener: Option<TcpListener>,
    /// Write half of the command connection.
    pub writer: OwnedWriteHalf,
    /// Local end of the command connection, PASV answers with its address.
    pub local_addr: SocketAddr,
    pub context: Arc<ServerContext>,
    pub watchdog: IdleWatchdog,
    pub teardown: Arc<SessionTeardown>,
}

impl Session {
    pub fn new(
        writer: OwnedWriteHalf,
        local_addr: SocketAddr,
        context: Arc<ServerContext>,
        watchdog: IdleWatchdog,
        teardown: Arc<SessionTeardown>,
    ) -> Self {
        Self {
            username: String::new(),
            is_authenticated: false,
            current_dir: String::from("/"),
            dtp_state: DtpState::None,
            pasv_listener: None,
            writer,
            local_addr,
            context,
            watchdog,
            teardown,
        }
    }

    /// Drops the pending passive listener, if any, and forgets PASV mode.
    pub fn close_pasv_listener(&mut self) {
        if self.pasv_listener.take().is_some() {
            info!("Closed passive listener");
        }
        self.dtp_state = DtpState::None;
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("is_authenticated", &self.is_authenticated)
            .field("current_dir", &self.current_dir)
            .field("dtp_state", &self.dtp_state)
            .field("pasv_listener", &self.pasv_listener.is_some())
            .field("closed", &self.teardown.is_closed())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    Quit,
    IdleTimeout,
    Disconnected,
    ControlError,
}

impl fmt::Display for TeardownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TeardownReason::Quit => "QUIT",
            TeardownReason::IdleTimeout => "idle timeout",
            TeardownReason::Disconnected => "peer disconnected",
            TeardownReason::ControlError => "control connection error",
        };
        f.write_str(reason)
    }
}

/// The one way a session ends.
///
/// The command loop and the idle watchdog both race to tear the session
/// down; only the first call takes effect, so the live-session counter is
/// decremented exactly once. Waiters on [`SessionTeardown::closed`] are
/// woken so the command loop drops its sockets.
#[derive(Debug)]
pub struct SessionTeardown {
    done: AtomicBool,
    closed: watch::Sender<bool>,
    counter: Arc<ConnectionCounter>,
}

impl SessionTeardown {
    pub fn new(counter: Arc<ConnectionCounter>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            done: AtomicBool::new(false),
            closed,
            counter,
        }
    }

    /// Returns true for the call that actually tore the session down.
    pub async fn run(&self, reason: TeardownReason) -> bool {
        if self
            .done
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        let live = self.counter.decrement().await;
        self.closed.send_replace(true);
        info!("Session closed ({}), connections: {}", reason, live);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Resolves once the session has been torn down.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // the sender lives as long as self, wait_for cannot fail here
        let _ = rx.wait_for(|closed| *closed).await;
    }
}
