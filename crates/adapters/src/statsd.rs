//! `StatsD` metric sink over UDP.
//!
//! Each call is sent as one datagram in the plain `StatsD` line format:
//!
//! - timing: `<key>:<ms>|ms`
//! - increment: `<key>:1|c`
//! - gauge: `<key>:<value>|g`
//!
//! The socket is created on the first emission, never at construction time.
//! Transport failures are logged at `warn` and the datagram is dropped. A
//! failed socket setup is not retried until `retry_after` has elapsed, so an
//! unresolvable host costs one lookup per window instead of one per metric.

use poolstats_ports::MetricSink;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Default wait before retrying a failed socket setup.
pub const DEFAULT_SETUP_RETRY_AFTER: Duration = Duration::from_secs(30);

/// `StatsD` metric type suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsdKind {
    /// Timer in milliseconds (`ms`).
    Timing,
    /// Counter (`c`).
    Counter,
    /// Gauge (`g`).
    Gauge,
}

impl StatsdKind {
    /// Wire suffix.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Timing => "ms",
            Self::Counter => "c",
            Self::Gauge => "g",
        }
    }
}

/// Render one `StatsD` line (no trailing newline).
#[must_use]
pub fn format_statsd_line(key: &str, value: u64, kind: StatsdKind) -> String {
    format!("{key}:{value}|{}", kind.suffix())
}

enum Connection {
    Idle,
    Ready(UdpSocket),
    Failed { at: Instant },
}

struct SocketState {
    connection: Connection,
    setup_attempts: u64,
}

/// Metric sink sending `StatsD` datagrams to `host:port`.
pub struct StatsdMetricSink {
    host: Box<str>,
    port: u16,
    retry_after: Duration,
    state: Mutex<SocketState>,
}

impl StatsdMetricSink {
    /// Create a sink targeting `host:port`. No I/O happens here.
    pub fn new(host: impl Into<Box<str>>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            retry_after: DEFAULT_SETUP_RETRY_AFTER,
            state: Mutex::new(SocketState {
                connection: Connection::Idle,
                setup_attempts: 0,
            }),
        }
    }

    /// Override how long a failed socket setup suppresses new attempts.
    #[must_use]
    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = retry_after;
        self
    }

    /// Target host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Target port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// True once a socket has been set up by an emission.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self.lock_state().connection, Connection::Ready(_))
    }

    /// Number of socket setups attempted so far (resolve, bind, connect).
    #[must_use]
    pub fn setup_attempts(&self) -> u64 {
        self.lock_state().setup_attempts
    }

    fn lock_state(&self) -> MutexGuard<'_, SocketState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, key: &str, value: u64, kind: StatsdKind) {
        let line = format_statsd_line(key, value, kind);
        let mut state = self.lock_state();

        let needs_setup = match &state.connection {
            Connection::Ready(_) => false,
            Connection::Idle => true,
            Connection::Failed { at } => at.elapsed() >= self.retry_after,
        };
        if needs_setup {
            state.setup_attempts += 1;
            match connect(&self.host, self.port) {
                Ok(socket) => state.connection = Connection::Ready(socket),
                Err(error) => {
                    tracing::warn!(
                        host = %self.host,
                        port = self.port,
                        retry_after_ms = self.retry_after.as_millis(),
                        %error,
                        "statsd socket setup failed; dropping metrics until retry"
                    );
                    state.connection = Connection::Failed { at: Instant::now() };
                    return;
                },
            }
        }

        let Connection::Ready(socket) = &state.connection else {
            return;
        };
        if let Err(error) = socket.send(line.as_bytes()) {
            tracing::warn!(
                host = %self.host,
                port = self.port,
                metric = key,
                %error,
                "statsd send failed; dropping metric"
            );
            if error.kind() != io::ErrorKind::WouldBlock {
                // Re-resolve on the next emission.
                state.connection = Connection::Idle;
            }
        }
    }
}

impl std::fmt::Debug for StatsdMetricSink {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StatsdMetricSink")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("retry_after", &self.retry_after)
            .finish_non_exhaustive()
    }
}

impl MetricSink for StatsdMetricSink {
    fn timing(&self, key: &str, duration_ms: u64) {
        self.send(key, duration_ms, StatsdKind::Timing);
    }

    fn increment(&self, key: &str) {
        self.send(key, 1, StatsdKind::Counter);
    }

    fn gauge(&self, key: &str, value: u64) {
        self.send(key, value, StatsdKind::Gauge);
    }
}

fn connect(host: &str, port: u16) -> io::Result<UdpSocket> {
    let target = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no address found for {host}:{port}"),
        )
    })?;

    let local = match target {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    };
    let socket = UdpSocket::bind(local)?;
    socket.connect(target)?;
    socket.set_nonblocking(true)?;
    Ok(socket)
}
