use markov_agents::message::{ExecutionCommand, Message};
use markov_agents::transport::{Bus, Envelope};

fn envelope(request_id: u64) -> Envelope {
    Envelope {
        request_id,
        reply_to: "orchestrator".to_string(),
        payload: Message::Execute(ExecutionCommand::GetBalances),
    }
}

#[tokio::test]
async fn registered_endpoint_receives_sends() {
    let bus = Bus::new();
    let mut inbox = bus.register("execution-worker", 8);

    bus.send("execution-worker", envelope(7));
    let received = inbox.recv().await.unwrap();
    assert_eq!(received.request_id, 7);
    assert_eq!(received.reply_to, "orchestrator");
}

#[tokio::test]
async fn unregistered_endpoint_drops_silently() {
    let bus = Bus::new();
    // Nothing to assert beyond not panicking; delivery is best-effort.
    bus.send("nobody-home", envelope(1));
}

#[tokio::test]
async fn full_inbox_drops_instead_of_blocking() {
    let bus = Bus::new();
    let mut inbox = bus.register("worker", 1);

    bus.send("worker", envelope(1));
    bus.send("worker", envelope(2));

    let first = inbox.recv().await.unwrap();
    assert_eq!(first.request_id, 1);
    assert!(
        inbox.try_recv().is_err(),
        "second send must have been dropped"
    );
}

#[tokio::test]
async fn clones_share_the_endpoint_table() {
    let bus = Bus::new();
    let mut inbox = bus.register("worker", 8);

    let peer = bus.clone();
    peer.send("worker", envelope(3));
    assert_eq!(inbox.recv().await.unwrap().request_id, 3);
}
