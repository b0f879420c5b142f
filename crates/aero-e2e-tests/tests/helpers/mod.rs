//! Shared test harness: a scripted in-process MQTT broker.
//!
//! Speaks just enough MQTT 3.1.1 over plaintext TCP to exercise the
//! real `MqttSession`: answers CONNECT with a CONNACK, answers PINGREQ,
//! records QoS0 publishes and DISCONNECTs, and can drop the connection
//! after a scripted number of publishes to simulate transport loss. The
//! channel layer's pre-handshake TCP probe (a connection that closes
//! without data) is tolerated.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use aero_agent::config::WifiConfig;
use aero_channel::BrokerConfig;

/// How the stub behaves once a session arrives.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Accept the session and serve until the client disconnects.
    Accept,
    /// Answer CONNECT with return code 5 (not authorized) and close.
    RejectNotAuthorized,
    /// Read the CONNECT but never answer it.
    Mute,
    /// Accept, then close the socket after this many publishes.
    DropAfterPublishes(usize),
}

#[derive(Default)]
struct Record {
    publishes: Vec<(String, Vec<u8>)>,
    disconnects: usize,
}

/// Scripted in-process broker.
pub struct StubBroker {
    addr: SocketAddr,
    record: Arc<Mutex<Record>>,
}

impl StubBroker {
    pub async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let record = Arc::new(Mutex::new(Record::default()));

        let task_record = record.clone();
        tokio::spawn(async move {
            // Accept until one real session is served; bare TCP probes
            // (no data) are skipped.
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                if serve(&mut socket, behavior, &task_record).await {
                    return;
                }
            }
        });

        Self { addr, record }
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Recorded publishes as (topic, utf-8 payload).
    pub fn publishes(&self) -> Vec<(String, String)> {
        self.record
            .lock()
            .unwrap()
            .publishes
            .iter()
            .map(|(t, p)| (t.clone(), String::from_utf8_lossy(p).into_owned()))
            .collect()
    }

    pub fn disconnects(&self) -> usize {
        self.record.lock().unwrap().disconnects
    }

    /// Wait until at least `n` publishes arrived (bounded).
    pub async fn wait_for_publishes(&self, n: usize) {
        for _ in 0..200 {
            if self.record.lock().unwrap().publishes.len() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "stub broker saw {} publishes, expected {n}",
            self.record.lock().unwrap().publishes.len()
        );
    }

    /// Wait until the client's DISCONNECT arrived (bounded).
    pub async fn wait_for_disconnect(&self) {
        for _ in 0..200 {
            if self.record.lock().unwrap().disconnects > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("stub broker never saw a DISCONNECT");
    }
}

/// Serve one connection. Returns false for a dataless probe.
async fn serve(socket: &mut TcpStream, behavior: Behavior, record: &Arc<Mutex<Record>>) -> bool {
    let Ok(first) = socket.read_u8().await else {
        return false;
    };
    if first != 0x10 {
        return false;
    }
    let Ok(len) = read_remaining_length(socket).await else {
        return false;
    };
    let mut connect = vec![0u8; len];
    if socket.read_exact(&mut connect).await.is_err() {
        return false;
    }

    match behavior {
        Behavior::Mute => {
            // Hold the socket open without a CONNACK until the client
            // gives up.
            tokio::time::sleep(Duration::from_secs(30)).await;
            return true;
        }
        Behavior::RejectNotAuthorized => {
            let _ = socket.write_all(&[0x20, 0x02, 0x00, 0x05]).await;
            return true;
        }
        Behavior::Accept | Behavior::DropAfterPublishes(_) => {
            if socket.write_all(&[0x20, 0x02, 0x00, 0x00]).await.is_err() {
                return true;
            }
        }
    }

    let mut publishes_seen = 0usize;
    loop {
        let Ok(header) = socket.read_u8().await else {
            return true;
        };
        let Ok(len) = read_remaining_length(socket).await else {
            return true;
        };
        let mut body = vec![0u8; len];
        if len > 0 && socket.read_exact(&mut body).await.is_err() {
            return true;
        }

        match header & 0xF0 {
            // PINGREQ → PINGRESP
            0xC0 => {
                let _ = socket.write_all(&[0xD0, 0x00]).await;
            }
            // QoS0 PUBLISH: topic length + topic + payload
            0x30 => {
                if body.len() < 2 {
                    continue;
                }
                let topic_len = u16::from_be_bytes([body[0], body[1]]) as usize;
                if body.len() < 2 + topic_len {
                    continue;
                }
                let topic = String::from_utf8_lossy(&body[2..2 + topic_len]).into_owned();
                let payload = body[2 + topic_len..].to_vec();
                record.lock().unwrap().publishes.push((topic, payload));
                publishes_seen += 1;

                if let Behavior::DropAfterPublishes(n) = behavior {
                    if publishes_seen >= n {
                        return true;
                    }
                }
            }
            // DISCONNECT
            0xE0 => {
                record.lock().unwrap().disconnects += 1;
                return true;
            }
            _ => {}
        }
    }
}

async fn read_remaining_length(socket: &mut TcpStream) -> std::io::Result<usize> {
    let mut multiplier = 1usize;
    let mut value = 0usize;
    loop {
        let byte = socket.read_u8().await?;
        value += (byte & 0x7F) as usize * multiplier;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        multiplier *= 128;
    }
}

// ── Config fixtures ────────────────────────────────────────────

/// Plaintext broker config pointed at the stub.
pub fn broker_config(broker: &StubBroker, client_id: &str, topic: &str) -> BrokerConfig {
    BrokerConfig {
        host: broker.host(),
        port: broker.port(),
        client_id: client_id.into(),
        topic: topic.into(),
        use_tls: false,
        ca_cert_path: String::new(),
        client_cert_path: String::new(),
        client_key_path: String::new(),
        keepalive_secs: 60,
        connect_timeout_secs: 2,
    }
}

pub fn wifi_config() -> WifiConfig {
    WifiConfig {
        ssid: "lab-net".into(),
        passphrase: "hunter2".into(),
        security: Default::default(),
    }
}
