//! Steady-state publish loop.
//!
//! Each tick: liveness gate, one round of protocol service, sample,
//! compose, fire-and-forget publish, fixed-interval sleep. A publish
//! failure is logged and the loop continues; only the liveness gate or a
//! failed service tick ends the loop. The caller drives teardown after
//! the loop returns.

use std::time::Duration;

use aero_channel::Session;
use aero_protocol::{DeviceIdentity, TelemetryMessage};
use aero_sensors::{Sampler, SensorBank};

use crate::indicator::StatusIndicator;

/// Why the publish loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The liveness gate found the session already disconnected.
    NotConnected,
    /// A service tick reported transport loss or a protocol violation.
    SessionLost,
}

/// Summary of one publish-loop run.
#[derive(Debug)]
pub struct LoopExit {
    pub reason: ExitReason,
    /// Completed ticks (service round succeeded).
    pub ticks: u64,
    pub published: u64,
    pub publish_failures: u64,
}

/// Run the loop until liveness is lost.
pub async fn run<S, B, I>(
    session: &mut S,
    sampler: &mut Sampler<B>,
    indicator: &mut I,
    identity: &DeviceIdentity,
    topic: &str,
    interval: Duration,
) -> LoopExit
where
    S: Session,
    B: SensorBank,
    I: StatusIndicator,
{
    let mut ticks = 0u64;
    let mut published = 0u64;
    let mut publish_failures = 0u64;

    let reason = loop {
        if !session.is_connected() {
            break ExitReason::NotConnected;
        }
        if let Err(e) = session.service_tick().await {
            tracing::warn!(error = %e, "protocol service failed");
            break ExitReason::SessionLost;
        }
        ticks += 1;

        indicator.busy();
        let sample = sampler.sample();
        let message = TelemetryMessage::compose(identity, &sample);
        let payload = message.render();

        tracing::info!(topic, payload = %payload, "publishing telemetry");
        match session.publish(topic, payload.as_bytes()).await {
            Ok(()) => published += 1,
            Err(e) => {
                publish_failures += 1;
                tracing::warn!(error = %e, "publish failed, continuing");
            }
        }
        indicator.idle();

        tokio::time::sleep(interval).await;
    };

    LoopExit {
        reason,
        ticks,
        published,
        publish_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::RecordingIndicator;
    use aero_channel::MockSession;
    use aero_sensors::MockSensorBank;

    const INTERVAL: Duration = Duration::from_millis(10_000);

    fn identity() -> DeviceIdentity {
        DeviceIdentity::new(1, "1.0")
    }

    #[tokio::test(start_paused = true)]
    async fn three_ticks_then_transport_loss() {
        let mut session = MockSession::connected().lose_connection_on_tick(4);
        let mut sampler = Sampler::new(MockSensorBank::fixed(21.5, 40.0, 1012.3));
        let mut indicator = RecordingIndicator::new();

        let start = tokio::time::Instant::now();
        let exit = run(
            &mut session,
            &mut sampler,
            &mut indicator,
            &identity(),
            "devices/dev-1/env",
            INTERVAL,
        )
        .await;

        assert_eq!(exit.reason, ExitReason::SessionLost);
        assert_eq!(exit.ticks, 3);
        assert_eq!(exit.published, 3);
        assert_eq!(exit.publish_failures, 0);

        let payloads = session.published_to("devices/dev-1/env");
        assert_eq!(payloads.len(), 3);
        for payload in &payloads {
            assert_eq!(
                payload,
                r#"{"deviceId":1,"temp":21.5,"hum":40.0,"press":1012.3}"#
            );
        }

        // Three sleeps of the fixed interval (the fourth tick exits before
        // sleeping).
        assert_eq!(start.elapsed(), INTERVAL * 3);
        assert!(!session.is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn publish_failure_does_not_end_the_loop() {
        let mut session = MockSession::connected()
            .fail_publish(2)
            .lose_connection_on_tick(4);
        let mut sampler = Sampler::new(MockSensorBank::fixed(20.0, 50.0, 1000.0));
        let mut indicator = RecordingIndicator::new();

        let exit = run(
            &mut session,
            &mut sampler,
            &mut indicator,
            &identity(),
            "t",
            INTERVAL,
        )
        .await;

        assert_eq!(exit.reason, ExitReason::SessionLost);
        assert_eq!(exit.ticks, 3);
        assert_eq!(exit.published, 2);
        assert_eq!(exit.publish_failures, 1);
        // The indicator still cleared on the failed tick.
        assert_eq!(indicator.transitions(), &[true, false, true, false, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn disconnected_session_exits_immediately() {
        let mut session = MockSession::disconnected();
        let mut sampler = Sampler::new(MockSensorBank::fixed(20.0, 50.0, 1000.0));
        let mut indicator = RecordingIndicator::new();

        let exit = run(
            &mut session,
            &mut sampler,
            &mut indicator,
            &identity(),
            "t",
            INTERVAL,
        )
        .await;

        assert_eq!(exit.reason, ExitReason::NotConnected);
        assert_eq!(exit.ticks, 0);
        assert_eq!(exit.published, 0);
        assert!(indicator.transitions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn scripted_sensor_values_produce_distinct_payloads() {
        let mut session = MockSession::connected().lose_connection_on_tick(3);
        let bank = MockSensorBank::fixed(21.5, 40.0, 1012.3).then(22.0, 41.5, 1011.8);
        let mut sampler = Sampler::new(bank);
        let mut indicator = RecordingIndicator::new();

        run(
            &mut session,
            &mut sampler,
            &mut indicator,
            &identity(),
            "t",
            INTERVAL,
        )
        .await;

        let payloads = session.published_to("t");
        assert_eq!(
            payloads,
            [
                r#"{"deviceId":1,"temp":21.5,"hum":40.0,"press":1012.3}"#,
                r#"{"deviceId":1,"temp":22.0,"hum":41.5,"press":1011.8}"#,
            ]
        );
    }
}
