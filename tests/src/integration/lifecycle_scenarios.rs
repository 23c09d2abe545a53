//! # Lifecycle Scenarios
//!
//! Commit-then-notify choreography between the registry and the protocol
//! collaborators, observed on the shared bus the way the TCP adapter and
//! polling scheduler would observe it.

#[cfg(test)]
mod tests {
    use crate::integration::harness::{http_channel, Mediator};
    use hm_01_channel_registry::{ChannelRegistryApi, DeleteDecision, RegistryError};
    use hm_02_channel_lifecycle::{ChannelLifecycleApi, LifecycleError};
    use serde_json::{json, Value};
    use shared_bus::{EventTopic, MediatorEvent, Subscription};
    use shared_types::entities::ChannelStatus;

    fn tcp_channel(name: &str, status: &str) -> Value {
        let mut body = http_channel(name, "tcp", None, &[]);
        body["type"] = json!("tcp");
        body["status"] = json!(status);
        body["tcpHost"] = json!("0.0.0.0");
        body["tcpPort"] = json!(3600);
        body
    }

    fn polling_channel(name: &str) -> Value {
        let mut body = http_channel(name, "/poll", None, &[]);
        body["type"] = json!("polling");
        body["pollingSchedule"] = json!("1 minute");
        body
    }

    #[derive(Debug, Default, PartialEq)]
    struct Counts {
        start_tcp: usize,
        stop_tcp: usize,
        register: usize,
        deregister: usize,
    }

    fn count(sub: &mut Subscription) -> Counts {
        let mut counts = Counts::default();
        for event in sub.drain() {
            match event {
                MediatorEvent::StartTcpListener(_) => counts.start_tcp += 1,
                MediatorEvent::StopTcpListener(_) => counts.stop_tcp += 1,
                MediatorEvent::RegisterPolling(_) => counts.register += 1,
                MediatorEvent::DeregisterPolling(_) => counts.deregister += 1,
                _ => {}
            }
        }
        counts
    }

    fn protocol_events(m: &Mediator) -> Subscription {
        m.subscribe(vec![EventTopic::TcpAdapter, EventTopic::PollingScheduler])
    }

    // =========================================================================
    // TCP CHANNELS
    // =========================================================================

    #[tokio::test]
    async fn test_enabled_tcp_create_starts_listener() {
        let m = Mediator::new();
        let mut events = protocol_events(&m);

        m.create(tcp_channel("TCPTestChannel-Add", "enabled")).await;
        assert_eq!(
            count(&mut events),
            Counts { start_tcp: 1, ..Counts::default() }
        );
    }

    #[tokio::test]
    async fn test_disabled_tcp_create_notifies_nothing() {
        let m = Mediator::new();
        let mut events = protocol_events(&m);

        m.create(tcp_channel("TCPTestChannel-Add-Disabled", "disabled"))
            .await;
        assert_eq!(count(&mut events), Counts::default());
    }

    #[tokio::test]
    async fn test_disabling_tcp_stops_once_and_enabling_starts_once() {
        let m = Mediator::new();
        let channel = m.create(tcp_channel("TCPTestChannel-Update", "enabled")).await;
        let mut events = protocol_events(&m);

        let disabled = m.update(&channel, json!({ "status": "disabled" })).await;
        assert_eq!(
            count(&mut events),
            Counts { stop_tcp: 1, ..Counts::default() }
        );

        m.update(&disabled, json!({ "status": "enabled" })).await;
        assert_eq!(
            count(&mut events),
            Counts { start_tcp: 1, ..Counts::default() }
        );
    }

    #[tokio::test]
    async fn test_rebinding_tcp_port_restarts_listener() {
        let m = Mediator::new();
        let channel = m.create(tcp_channel("TCPTestChannel-Rebind", "enabled")).await;
        let mut events = protocol_events(&m);

        m.update(&channel, json!({ "tcpPort": 3601 })).await;
        let received = events.drain();
        assert!(matches!(received.first(), Some(MediatorEvent::StopTcpListener(c)) if c.tcp_port == Some(3600)));
        assert!(matches!(received.get(1), Some(MediatorEvent::StartTcpListener(c)) if c.tcp_port == Some(3601)));
        assert_eq!(received.len(), 2);
    }

    #[tokio::test]
    async fn test_unrelated_tcp_update_is_silent() {
        let m = Mediator::new();
        let channel = m.create(tcp_channel("TCPTestChannel-Quiet", "enabled")).await;
        let mut events = protocol_events(&m);

        m.update(&channel, json!({ "priority": 3 })).await;
        assert_eq!(count(&mut events), Counts::default());
    }

    #[tokio::test]
    async fn test_deleting_enabled_tcp_stops_listener() {
        let m = Mediator::new();
        let channel = m.create(tcp_channel("TCPTestChannel-Delete", "enabled")).await;
        let mut events = protocol_events(&m);

        m.delete(&channel).await;
        assert_eq!(
            count(&mut events),
            Counts { stop_tcp: 1, ..Counts::default() }
        );
    }

    // =========================================================================
    // POLLING CHANNELS
    // =========================================================================

    #[tokio::test]
    async fn test_polling_create_registers_once() {
        let m = Mediator::new();
        let mut events = protocol_events(&m);

        m.create(polling_channel("POLLINGTestChannel-Add")).await;
        assert_eq!(
            count(&mut events),
            Counts { register: 1, ..Counts::default() }
        );
    }

    #[tokio::test]
    async fn test_polling_delete_deregisters_once() {
        let m = Mediator::new();
        let channel = m.create(polling_channel("POLLINGTestChannel-Remove")).await;
        let mut events = protocol_events(&m);

        m.delete(&channel).await;
        assert_eq!(
            count(&mut events),
            Counts { deregister: 1, ..Counts::default() }
        );
    }

    #[tokio::test]
    async fn test_polling_schedule_change_reregisters() {
        let m = Mediator::new();
        let channel = m.create(polling_channel("POLLINGTestChannel-Reschedule")).await;
        let mut events = protocol_events(&m);

        m.update(&channel, json!({ "pollingSchedule": "5 minutes" })).await;
        assert_eq!(
            count(&mut events),
            Counts { register: 1, deregister: 1, ..Counts::default() }
        );
    }

    #[tokio::test]
    async fn test_resaving_enabled_polling_channel_registers_once() {
        let m = Mediator::new();
        let body = polling_channel("POLLINGTestChannel-Resave");
        let channel = m.create(body.clone()).await;
        let mut events = protocol_events(&m);

        m.update(&channel, body).await;
        let events = events.drain();
        assert_eq!(events.len(), 1);
        match &events[0] {
            MediatorEvent::RegisterPolling(registered) => {
                assert_eq!(registered.id, channel.id);
                assert_eq!(registered.name, "POLLINGTestChannel-Resave");
            }
            other => panic!("expected a polling registration, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_channel_never_notifies() {
        let m = Mediator::new();
        let mut events = protocol_events(&m);

        let channel = m.create(http_channel("plain", "/plain", None, &[])).await;
        m.update(&channel, json!({ "status": "disabled" })).await;
        m.delete(&channel).await;
        assert_eq!(count(&mut events), Counts::default());
    }

    // =========================================================================
    // COMMIT IS AUTHORITATIVE
    // =========================================================================

    #[tokio::test]
    async fn test_commit_survives_missing_collaborators() {
        let m = Mediator::new();
        let draft = serde_json::from_value(tcp_channel("nobody-listening", "enabled")).unwrap();

        let committed = m
            .container
            .lifecycle
            .create(draft, Mediator::root())
            .await
            .unwrap();
        let report = committed.notifications.settled().await;

        assert!(!report.all_delivered());
        let stored = m
            .container
            .registry
            .get_channel(committed.value.id)
            .await
            .unwrap();
        assert_eq!(stored.name, "nobody-listening");
    }

    #[tokio::test]
    async fn test_rejected_mutation_sends_nothing() {
        let m = Mediator::new();
        let mut events = protocol_events(&m);
        let mut body = tcp_channel("bad-tcp", "enabled");
        body["tcpPort"] = json!(70000);
        let draft = serde_json::from_value(body).unwrap();

        let err = m
            .container
            .lifecycle
            .create(draft, Mediator::root())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Registry(RegistryError::Validation(_))
        ));
        assert_eq!(count(&mut events), Counts::default());
    }

    // =========================================================================
    // DELETION
    // =========================================================================

    #[tokio::test]
    async fn test_unreferenced_channel_is_removed() {
        let m = Mediator::new();
        let channel = m.create(http_channel("hard", "/hard", None, &[])).await;

        let committed = m
            .container
            .lifecycle
            .delete(channel.id, Mediator::root())
            .await
            .unwrap();
        assert_eq!(committed.value.decision, DeleteDecision::HardDelete);
        assert!(matches!(
            m.container.registry.get_channel(channel.id).await,
            Err(RegistryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_referenced_channel_is_kept_as_deleted() {
        let m = Mediator::new();
        let channel = m.create(http_channel("soft", "/soft", None, &[])).await;
        m.container.transactions.record(channel.id);

        let committed = m
            .container
            .lifecycle
            .delete(channel.id, Mediator::root())
            .await
            .unwrap();
        assert!(matches!(
            committed.value.decision,
            DeleteDecision::SoftDelete { .. }
        ));
        let stored = m.container.registry.get_channel(channel.id).await.unwrap();
        assert_eq!(stored.status, ChannelStatus::Deleted);
    }

    #[tokio::test]
    async fn test_deleted_name_can_be_reused() {
        let m = Mediator::new();
        let channel = m.create(http_channel("reused", "/reused", None, &[])).await;
        m.container.transactions.record(channel.id);
        m.delete(&channel).await;

        let again = m.create(http_channel("reused", "/reused", None, &[])).await;
        assert_ne!(again.id, channel.id);
    }

    // =========================================================================
    // RESTART RECONCILIATION
    // =========================================================================

    #[tokio::test]
    async fn test_reconcile_reissues_active_protocol_channels() {
        let m = Mediator::new();
        m.create(tcp_channel("tcp-on", "enabled")).await;
        m.create(tcp_channel("tcp-off", "disabled")).await;
        m.create(polling_channel("poller")).await;
        m.create(http_channel("plain", "/plain", None, &[])).await;
        let mut events = protocol_events(&m);

        let report = m
            .container
            .lifecycle
            .reconcile_all()
            .await
            .unwrap()
            .settled()
            .await;
        assert!(report.all_delivered());
        assert_eq!(
            count(&mut events),
            Counts { start_tcp: 1, register: 1, ..Counts::default() }
        );
    }
}
