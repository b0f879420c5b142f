//! Messaging session lifecycle over a secure channel.
//!
//! `Session` is the seam the publish loop drives; `MqttSession` is the
//! rumqttc-backed implementation. Session negotiation uses MQTT 3.1.1
//! with clean session disabled — the broker retains session state across
//! a future restart, though this process never reconnects within a run.

use std::time::Duration;

use async_trait::async_trait;
use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
};
use tokio::time::{Instant, timeout_at};

use crate::channel::SecureChannel;
use crate::config::BrokerConfig;
use crate::error::{SessionError, SessionResult};

/// How long a service tick drains the protocol machinery.
const SERVICE_WINDOW: Duration = Duration::from_millis(250);

/// How long a publish or disconnect flush may take before giving up.
const FLUSH_WINDOW: Duration = Duration::from_millis(500);

/// A negotiated messaging session usable for publish traffic.
///
/// `service_tick` is the sole cooperative suspension point: one bounded
/// round of protocol housekeeping (acknowledgements, keep-alive pings,
/// connection-state changes). Liveness is only revised by `service_tick`
/// or an explicit `disconnect` — a failed publish never flips it.
#[async_trait]
pub trait Session: Send {
    /// One round of protocol service. On transport loss or a protocol
    /// violation the session transitions to Disconnected and returns
    /// `SessionError::Lost`.
    async fn service_tick(&mut self) -> SessionResult<()>;

    /// Pure liveness query, usable in any state.
    fn is_connected(&self) -> bool;

    /// Fire-and-forget publish: QoS 0, unretained, never marked
    /// duplicate. Rejected with `SessionError::NotConnected` when the
    /// session is down; other failures are `SessionError::Publish` and
    /// leave liveness untouched.
    async fn publish(&mut self, topic: &str, payload: &[u8]) -> SessionResult<()>;

    /// Orderly session shutdown. Idempotent — calling it on an already
    /// disconnected session is a no-op.
    async fn disconnect(&mut self) -> SessionResult<()>;
}

/// rumqttc-backed MQTT session.
pub struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
    connected: bool,
    /// Transport failure observed outside a service tick. Liveness is
    /// only revised by `service_tick`, and polling a failed rumqttc
    /// event loop would start an unwanted reconnect — so the loss is
    /// parked here until the next tick surfaces it.
    pending_loss: Option<String>,
    service_window: Duration,
}

impl std::fmt::Debug for MqttSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttSession")
            .field("client", &self.client)
            .field("connected", &self.connected)
            .field("pending_loss", &self.pending_loss)
            .field("service_window", &self.service_window)
            .finish_non_exhaustive()
    }
}

impl MqttSession {
    /// Negotiate a session over the connected channel.
    ///
    /// Drives the protocol machinery until the broker's CONNACK arrives
    /// (completing the TLS negotiation begun by the channel handshake on
    /// the way). Rejection or timeout surfaces `SessionError::Connect`.
    pub async fn connect(channel: &SecureChannel, config: &BrokerConfig) -> SessionResult<Self> {
        let (host, port) = channel.peer().ok_or(SessionError::NotConnected)?;
        let transport = channel.transport().map_err(|e| SessionError::Connect {
            code: 0,
            detail: e.to_string(),
        })?;

        let mut options = MqttOptions::new(config.client_id.clone(), host.to_string(), port);
        options.set_keep_alive(Duration::from_secs(config.keepalive_secs.into()));
        options.set_clean_session(false);
        options.set_transport(transport);

        let (client, mut eventloop) = AsyncClient::new(options, 16);

        let deadline = Instant::now() + Duration::from_secs(config.connect_timeout_secs);
        loop {
            let event = timeout_at(deadline, eventloop.poll())
                .await
                .map_err(|_| SessionError::Connect {
                    code: 0,
                    detail: format!(
                        "no CONNACK within {}s",
                        config.connect_timeout_secs
                    ),
                })?
                .map_err(|e| SessionError::Connect {
                    code: 0,
                    detail: e.to_string(),
                })?;

            match event {
                Event::Incoming(Packet::ConnAck(ack)) => {
                    if ack.code != ConnectReturnCode::Success {
                        return Err(SessionError::Connect {
                            code: ack.code as u8,
                            detail: format!("broker rejected session: {:?}", ack.code),
                        });
                    }
                    tracing::info!(
                        client_id = %config.client_id,
                        session_present = ack.session_present,
                        "messaging session negotiated"
                    );
                    return Ok(Self {
                        client,
                        eventloop,
                        connected: true,
                        pending_loss: None,
                        service_window: SERVICE_WINDOW,
                    });
                }
                other => {
                    tracing::trace!(event = ?other, "pre-session event");
                }
            }
        }
    }

    /// Override the per-tick service window (tests use a short one).
    pub fn set_service_window(&mut self, window: Duration) {
        self.service_window = window;
    }
}

#[async_trait]
impl Session for MqttSession {
    async fn service_tick(&mut self) -> SessionResult<()> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        if let Some(reason) = self.pending_loss.take() {
            self.connected = false;
            return Err(SessionError::Lost(reason));
        }
        let window_end = Instant::now() + self.service_window;
        loop {
            match timeout_at(window_end, self.eventloop.poll()).await {
                // Window drained with the link healthy.
                Err(_) => return Ok(()),
                Ok(Ok(event)) => {
                    tracing::trace!(?event, "protocol event");
                }
                Ok(Err(e)) => {
                    self.connected = false;
                    return Err(SessionError::Lost(e.to_string()));
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> SessionResult<()> {
        if !self.connected {
            return Err(SessionError::NotConnected);
        }
        self.client
            .try_publish(topic, QoS::AtMostOnce, false, payload)
            .map_err(|e| SessionError::Publish(e.to_string()))?;

        // Drive the machinery until the packet is on the wire. A failure
        // here is a publish failure, not a liveness revision — the next
        // service tick surfaces transport loss.
        let deadline = Instant::now() + FLUSH_WINDOW;
        loop {
            match timeout_at(deadline, self.eventloop.poll()).await {
                Err(_) => {
                    return Err(SessionError::Publish("flush window expired".into()));
                }
                Ok(Ok(Event::Outgoing(Outgoing::Publish(_)))) => return Ok(()),
                Ok(Ok(_)) => continue,
                Ok(Err(e)) => {
                    self.pending_loss = Some(e.to_string());
                    return Err(SessionError::Publish(format!("not flushed: {e}")));
                }
            }
        }
    }

    async fn disconnect(&mut self) -> SessionResult<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;
        self.client
            .try_disconnect()
            .map_err(|e| SessionError::Lost(format!("disconnect not sent: {e}")))?;

        // Give the machinery a moment to flush the DISCONNECT packet.
        let deadline = Instant::now() + FLUSH_WINDOW;
        loop {
            match timeout_at(deadline, self.eventloop.poll()).await {
                Err(_) => break,
                Ok(Ok(Event::Outgoing(Outgoing::Disconnect))) => break,
                Ok(Ok(_)) => continue,
                Ok(Err(_)) => break,
            }
        }
        tracing::info!("messaging session disconnected");
        Ok(())
    }
}
