//! Transport-level tests: the real `MqttSession` against the stub broker.

mod helpers;

use helpers::{Behavior, StubBroker, broker_config, wifi_config};

use aero_agent::run::{establish, provision};
use aero_channel::{MqttSession, Session, SessionError};
use aero_net::{MockWirelessStack, NetworkAttachment, NetworkProvisioner};

async fn established_channel(broker: &StubBroker) -> aero_channel::SecureChannel {
    let mut provisioner = NetworkProvisioner::new(MockWirelessStack::new());
    provision(&mut provisioner, &wifi_config()).await.unwrap();
    let attachment: NetworkAttachment = provisioner.attachment().unwrap().clone();
    establish(&attachment, &broker_config(broker, "dev-1", "t"))
        .await
        .unwrap()
}

#[tokio::test]
async fn session_negotiates_and_disconnects() {
    let broker = StubBroker::start(Behavior::Accept).await;
    let config = broker_config(&broker, "dev-1", "devices/dev-1/env");
    let channel = established_channel(&broker).await;

    let mut session = MqttSession::connect(&channel, &config).await.unwrap();
    assert!(session.is_connected());

    session.disconnect().await.unwrap();
    assert!(!session.is_connected());
    broker.wait_for_disconnect().await;

    // Idempotent: a second disconnect is a no-op.
    session.disconnect().await.unwrap();
    assert_eq!(broker.disconnects(), 1);
}

#[tokio::test]
async fn broker_rejection_surfaces_connack_code() {
    let broker = StubBroker::start(Behavior::RejectNotAuthorized).await;
    let config = broker_config(&broker, "dev-1", "t");
    let channel = established_channel(&broker).await;

    let err = MqttSession::connect(&channel, &config).await.unwrap_err();
    match err {
        SessionError::Connect { code, detail } => {
            assert_eq!(code, 5);
            assert!(detail.contains("NotAuthorized"), "detail: {detail}");
        }
        other => panic!("expected Connect, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_connack_times_out() {
    let broker = StubBroker::start(Behavior::Mute).await;
    let config = broker_config(&broker, "dev-1", "t");
    let channel = established_channel(&broker).await;

    let err = MqttSession::connect(&channel, &config).await.unwrap_err();
    match err {
        SessionError::Connect { code: 0, detail } => {
            assert!(detail.contains("CONNACK"), "detail: {detail}");
        }
        other => panic!("expected Connect timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn publish_reaches_the_wire() {
    let broker = StubBroker::start(Behavior::Accept).await;
    let config = broker_config(&broker, "dev-1", "devices/dev-1/env");
    let channel = established_channel(&broker).await;

    let mut session = MqttSession::connect(&channel, &config).await.unwrap();
    session
        .publish("devices/dev-1/env", br#"{"deviceId":1,"temp":21.5,"hum":40.0,"press":1012.3}"#)
        .await
        .unwrap();

    broker.wait_for_publishes(1).await;
    let publishes = broker.publishes();
    assert_eq!(publishes[0].0, "devices/dev-1/env");
    assert_eq!(
        publishes[0].1,
        r#"{"deviceId":1,"temp":21.5,"hum":40.0,"press":1012.3}"#
    );
}

#[tokio::test]
async fn transport_loss_is_surfaced_by_service_tick() {
    let broker = StubBroker::start(Behavior::DropAfterPublishes(1)).await;
    let config = broker_config(&broker, "dev-1", "t");
    let channel = established_channel(&broker).await;

    let mut session = MqttSession::connect(&channel, &config).await.unwrap();
    session.publish("t", b"x").await.unwrap();
    broker.wait_for_publishes(1).await;

    // The broker dropped the socket; the next service ticks must report
    // loss and flip liveness. (The first tick may still drain the final
    // healthy read.)
    let mut lost = false;
    for _ in 0..3 {
        if session.service_tick().await.is_err() {
            lost = true;
            break;
        }
    }
    assert!(lost, "service tick never reported the loss");
    assert!(!session.is_connected());

    // Publishing on a lost session is rejected outright.
    let err = session.publish("t", b"y").await.unwrap_err();
    assert!(matches!(err, SessionError::NotConnected));
}
