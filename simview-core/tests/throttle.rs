use simview_core::sync::{SendOutcome, ThrottleState, ThrottledSync, VirtualClock};
use simview_core::SyncError;

type Sent = Vec<&'static str>;

fn sink(sent: &mut Sent) -> impl FnMut(&&'static str) -> Result<SendOutcome, SyncError> + '_ {
    move |payload: &&'static str| {
        sent.push(*payload);
        Ok(SendOutcome::Delivered)
    }
}

#[test]
fn three_schedules_in_one_interval_send_only_the_last() {
    let clock = VirtualClock::new();
    let mut sync = ThrottledSync::new(150, clock.clone());
    let mut sent = Sent::new();

    sync.schedule("a", &mut sink(&mut sent)).unwrap();
    sync.schedule("b", &mut sink(&mut sent)).unwrap();
    sync.schedule("c", &mut sink(&mut sent)).unwrap();
    for _ in 0..10 {
        clock.advance(50);
        sync.poll(&mut sink(&mut sent)).unwrap();
    }

    assert_eq!(sent, vec!["c"]);
}

#[test]
fn every_burst_ends_with_one_send_of_its_last_payload() {
    let clock = VirtualClock::new();
    let mut sync = ThrottledSync::new(100, clock.clone());
    let mut sent = Sent::new();

    for (burst, payloads) in [["a1", "a2", "a3"], ["b1", "b2", "b3"]].iter().enumerate() {
        for payload in payloads {
            sync.schedule(*payload, &mut sink(&mut sent)).unwrap();
            clock.advance(10);
        }
        clock.advance(500);
        sync.poll(&mut sink(&mut sent)).unwrap();
        assert_eq!(sent.len(), burst + 1);
    }

    assert_eq!(sent, vec!["a3", "b3"]);
}

#[test]
fn flush_with_nothing_pending_sends_nothing() {
    let clock = VirtualClock::new();
    let mut sync: ThrottledSync<&'static str, _> = ThrottledSync::new(150, clock.clone());
    let mut sent = Sent::new();

    assert!(!sync.flush(&mut sink(&mut sent)).unwrap());
    clock.advance(1_000);
    sync.poll(&mut sink(&mut sent)).unwrap();
    assert!(sent.is_empty());
    assert_eq!(sync.state(), ThrottleState::Idle);
}

#[test]
fn flush_beats_the_interval() {
    let clock = VirtualClock::new();
    let mut sync = ThrottledSync::new(150, clock.clone());
    let mut sent = Sent::new();

    sync.schedule("edit", &mut sink(&mut sent)).unwrap();
    assert!(sent.is_empty());
    sync.flush(&mut sink(&mut sent)).unwrap();
    assert_eq!(sent, vec!["edit"]);

    clock.advance(1_000);
    sync.poll(&mut sink(&mut sent)).unwrap();
    assert_eq!(sent, vec!["edit"]);
}

#[test]
fn teardown_before_deadline_suppresses_send() {
    let clock = VirtualClock::new();
    let mut sync = ThrottledSync::new(150, clock.clone());
    let mut sent = Sent::new();

    sync.schedule("never", &mut sink(&mut sent)).unwrap();
    sync.reset();
    clock.advance(1_000);
    sync.poll(&mut sink(&mut sent)).unwrap();
    assert!(sent.is_empty());
}
