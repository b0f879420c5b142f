//! Mock session for testing without a broker.
//!
//! Records publishes and supports scripted tick/publish failures so the
//! publish loop and teardown paths run in CI on any platform.

use async_trait::async_trait;

use crate::error::{SessionError, SessionResult};
use crate::session::Session;

/// Mock implementation of the `Session` trait with scripted outcomes.
pub struct MockSession {
    connected: bool,
    lost_on_tick: Option<usize>,
    failing_publishes: Vec<usize>,
    ticks: usize,
    publish_attempts: usize,
    published: Vec<(String, Vec<u8>)>,
    disconnects: usize,
}

impl MockSession {
    /// A healthy, connected session.
    pub fn connected() -> Self {
        Self {
            connected: true,
            lost_on_tick: None,
            failing_publishes: Vec::new(),
            ticks: 0,
            publish_attempts: 0,
            published: Vec::new(),
            disconnects: 0,
        }
    }

    /// A session that never connected.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::connected()
        }
    }

    /// Report transport loss on service tick `n` (1-based).
    pub fn lose_connection_on_tick(mut self, n: usize) -> Self {
        self.lost_on_tick = Some(n);
        self
    }

    /// Fail publish attempt `n` (1-based) with a buffer-full error.
    pub fn fail_publish(mut self, n: usize) -> Self {
        self.failing_publishes.push(n);
        self
    }

    /// All successfully published (topic, payload) pairs.
    pub fn published(&self) -> &[(String, Vec<u8>)] {
        &self.published
    }

    /// Payloads published to `topic`, as UTF-8 strings.
    pub fn published_to(&self, topic: &str) -> Vec<String> {
        self.published
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }

    /// Number of service ticks driven so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Number of publish attempts (including failed ones).
    pub fn publish_attempts(&self) -> usize {
        self.publish_attempts
    }

    /// Number of effective disconnects (idempotent repeats not counted).
    pub fn disconnects(&self) -> usize {
        self.disconnects
    }
}

#[async_trait]
impl Session for MockSession {
    async fn service_tick(&mut self) -> SessionResult<()> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        self.ticks += 1;
        if self.lost_on_tick == Some(self.ticks) {
            self.connected = false;
            return Err(SessionError::Lost("connection reset by peer".into()));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> SessionResult<()> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        self.publish_attempts += 1;
        if self.failing_publishes.contains(&self.publish_attempts) {
            return Err(SessionError::Publish("outbound buffer full".into()));
        }
        self.published.push((topic.to_string(), payload.to_vec()));
        Ok(())
    }

    async fn disconnect(&mut self) -> SessionResult<()> {
        if self.connected {
            self.connected = false;
            self.disconnects += 1;
        }
        Ok(())
    }
}
