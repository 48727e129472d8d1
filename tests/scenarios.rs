//! End-to-end behavior of the shop: admission outcomes, draining shutdown and
//! event ordering, observed through a recording subscriber.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use barbershop::{
    Admission, Barbershop, Config, CustomerId, DelayRange, Event, EventKind, Phase, RejectReason,
    RuntimeError, ServiceFn, ServiceRef, Subscribe, Tally, WaitingArea, WorkerId,
};
use tokio::sync::{Semaphore, mpsc};

const STEP: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.events.lock().unwrap().push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }

    fn queue_capacity(&self) -> usize {
        1 << 16
    }
}

/// Service that reports each customer it starts and then waits for a permit.
struct Gate {
    started: mpsc::UnboundedReceiver<CustomerId>,
    permits: Arc<Semaphore>,
}

impl Gate {
    fn new() -> (Self, ServiceRef) {
        let (tx, rx) = mpsc::unbounded_channel();
        let permits = Arc::new(Semaphore::new(0));
        let gate = Arc::clone(&permits);
        let service = ServiceFn::arc(move |_w: WorkerId, c: CustomerId| {
            let tx = tx.clone();
            let gate = Arc::clone(&gate);
            async move {
                let _ = tx.send(c);
                gate.acquire().await.unwrap().forget();
            }
        });
        (Self { started: rx, permits }, service)
    }

    async fn started(&mut self) -> CustomerId {
        tokio::time::timeout(STEP, self.started.recv())
            .await
            .expect("a barber should start serving")
            .expect("service dropped")
    }

    fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }
}

fn shop_with(
    workers: usize,
    capacity: usize,
    service: ServiceRef,
) -> (Arc<Barbershop>, Arc<Recorder>) {
    let cfg = Config {
        workers,
        capacity,
        ..Config::default()
    };
    let recorder = Arc::new(Recorder::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![recorder.clone()];
    let shop = Barbershop::builder(cfg)
        .with_subscribers(subs)
        .with_service(service)
        .build()
        .unwrap();
    (shop, recorder)
}

async fn wait_until_closing(shop: &Barbershop) {
    tokio::time::timeout(STEP, async {
        while shop.is_open() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("closing should start");
}

fn position(events: &[Event], kind: EventKind, customer: Option<CustomerId>) -> Option<usize> {
    events
        .iter()
        .position(|e| e.kind == kind && (customer.is_none() || e.customer == customer))
}

fn count(events: &[Event], kind: EventKind) -> usize {
    events.iter().filter(|e| e.kind == kind).count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn full_area_rejects_until_a_chair_frees_up() {
    let (mut gate, service) = Gate::new();
    let (shop, recorder) = shop_with(1, 1, service);

    assert_eq!(shop.admit(CustomerId(1)), Admission::Admitted);
    assert_eq!(gate.started().await, CustomerId(1));

    assert_eq!(shop.admit(CustomerId(2)), Admission::Admitted);
    assert_eq!(
        shop.admit(CustomerId(3)),
        Admission::Rejected(RejectReason::NoCapacity)
    );
    assert_eq!(shop.waiting(), shop.capacity());

    gate.release(1);
    assert_eq!(gate.started().await, CustomerId(2));
    assert_eq!(shop.admit(CustomerId(4)), Admission::Admitted);

    gate.release(2);
    let report = shop.close().await.unwrap();
    assert_eq!(report.workers, 1);
    shop.detach_subscribers().await;

    let events = recorder.events();
    let finished_1 = position(&events, EventKind::ServiceFinished, Some(CustomerId(1))).unwrap();
    let admitted_4 = position(&events, EventKind::CustomerAdmitted, Some(CustomerId(4))).unwrap();
    assert!(finished_1 < admitted_4);
    assert_eq!(count(&events, EventKind::ServiceFinished), 3);

    let rejected = events
        .iter()
        .find(|e| e.kind == EventKind::CustomerRejected)
        .unwrap();
    assert_eq!(rejected.customer, Some(CustomerId(3)));
    assert_eq!(rejected.reason, Some(RejectReason::NoCapacity));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closing_immediately_rejects_everyone() {
    let (_gate, service) = Gate::new();
    let (shop, recorder) = shop_with(2, 5, service);

    let closer = tokio::spawn({
        let shop = Arc::clone(&shop);
        async move { shop.close_after(Duration::ZERO).await }
    });
    wait_until_closing(&shop).await;

    for id in 1..=10 {
        assert_eq!(
            shop.admit(CustomerId(id)),
            Admission::Rejected(RejectReason::ShopClosed)
        );
    }

    let report = closer.await.unwrap().unwrap();
    assert_eq!(report.backlog, 0);
    assert_eq!(report.workers, 2);
    assert_eq!(shop.phase(), Phase::Closed);
    shop.detach_subscribers().await;

    let events = recorder.events();
    assert_eq!(count(&events, EventKind::ServiceStarted), 0);
    assert_eq!(count(&events, EventKind::CustomerRejected), 10);
    assert_eq!(count(&events, EventKind::WorkerTerminated), 2);

    let closed = position(&events, EventKind::ShopClosed, None).unwrap();
    assert!(
        events[..closed]
            .iter()
            .filter(|e| e.kind == EventKind::WorkerTerminated)
            .count()
            == 2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn waiting_customers_are_served_before_closing_completes() {
    let (mut gate, service) = Gate::new();
    let (shop, recorder) = shop_with(1, 2, service);

    assert_eq!(shop.admit(CustomerId(1)), Admission::Admitted);
    assert_eq!(gate.started().await, CustomerId(1));
    assert_eq!(shop.admit(CustomerId(2)), Admission::Admitted);
    assert_eq!(shop.admit(CustomerId(3)), Admission::Admitted);
    assert_eq!(
        shop.admit(CustomerId(4)),
        Admission::Rejected(RejectReason::NoCapacity)
    );

    let closer = tokio::spawn({
        let shop = Arc::clone(&shop);
        async move { shop.close().await }
    });
    wait_until_closing(&shop).await;

    // Chairs are occupied but the shop is closing: the outcome is ShopClosed.
    assert_eq!(
        shop.admit(CustomerId(5)),
        Admission::Rejected(RejectReason::ShopClosed)
    );

    gate.release(3);
    let report = tokio::time::timeout(STEP, closer)
        .await
        .expect("closing should complete once the backlog is served")
        .unwrap()
        .unwrap();
    assert_eq!(report.backlog, 2);
    shop.detach_subscribers().await;

    let events = recorder.events();
    let started = events
        .iter()
        .find(|e| e.kind == EventKind::ClosingStarted)
        .unwrap();
    assert_eq!(started.backlog, Some(2));

    let closed = position(&events, EventKind::ShopClosed, None).unwrap();
    let finished_2 = position(&events, EventKind::ServiceFinished, Some(CustomerId(2))).unwrap();
    let finished_3 = position(&events, EventKind::ServiceFinished, Some(CustomerId(3))).unwrap();
    let drained = position(&events, EventKind::DrainCompleted, None).unwrap();
    let terminated = position(&events, EventKind::WorkerTerminated, None).unwrap();

    assert!(finished_2 < finished_3);
    assert!(finished_3 < drained);
    assert!(finished_3 < terminated);
    assert!(terminated < closed);
    assert_eq!(
        events[..closed]
            .iter()
            .filter(|e| e.kind == EventKind::ServiceFinished)
            .count(),
        3
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_admissions_never_overfill_the_area() {
    let area = Arc::new(WaitingArea::new(7));
    let mut tasks = Vec::new();
    for id in 0..200u64 {
        let area = Arc::clone(&area);
        tasks.push(tokio::spawn(async move { area.try_admit(CustomerId(id)) }));
    }

    let mut admitted = 0;
    for t in tasks {
        if t.await.unwrap() {
            admitted += 1;
        }
    }
    assert_eq!(admitted, 7);
    assert_eq!(area.len(), 7);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn admissions_racing_close_are_all_accounted_for() {
    let service: ServiceRef = ServiceFn::arc(|_w: WorkerId, _c: CustomerId| async {
        tokio::time::sleep(Duration::from_millis(1)).await;
    });
    let (shop, recorder) = shop_with(3, 4, service);

    let mut arrivals = Vec::new();
    for id in 1..=300u64 {
        let shop = Arc::clone(&shop);
        arrivals.push(tokio::spawn(async move {
            if id % 10 == 0 {
                tokio::task::yield_now().await;
            }
            (CustomerId(id), shop.admit(CustomerId(id)))
        }));
    }

    tokio::time::sleep(Duration::from_millis(2)).await;
    let report = tokio::time::timeout(STEP, shop.close())
        .await
        .expect("closing must not hang")
        .unwrap();
    assert_eq!(report.workers, 3);

    let mut outcomes = HashMap::new();
    for t in arrivals {
        let (id, outcome) = t.await.unwrap();
        outcomes.insert(id, outcome);
    }
    shop.detach_subscribers().await;

    let events = recorder.events();
    let closed = position(&events, EventKind::ShopClosed, None).unwrap();

    for (id, outcome) in &outcomes {
        let admitted = events
            .iter()
            .filter(|e| e.kind == EventKind::CustomerAdmitted && e.customer == Some(*id))
            .count();
        let rejected = events
            .iter()
            .filter(|e| e.kind == EventKind::CustomerRejected && e.customer == Some(*id))
            .count();
        assert_eq!(admitted + rejected, 1, "{id} must get exactly one outcome");
        assert_eq!(outcome.is_admitted(), admitted == 1);

        if outcome.is_admitted() {
            let seated = position(&events, EventKind::CustomerAdmitted, Some(*id)).unwrap();
            let started = position(&events, EventKind::ServiceStarted, Some(*id))
                .unwrap_or_else(|| panic!("{id} was admitted but never started"));
            let finished = position(&events, EventKind::ServiceFinished, Some(*id))
                .unwrap_or_else(|| panic!("{id} was admitted but never served"));
            assert!(seated < started, "{id}: admission must precede service");
            assert!(started < finished, "{id}: service must start before it finishes");
            assert!(finished < closed);
        }
    }

    let drained = position(&events, EventKind::DrainCompleted, None).unwrap();
    let terminations: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind == EventKind::WorkerTerminated)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(terminations.len(), 3);
    assert!(terminations.iter().all(|&i| drained < i && i < closed));
    assert_eq!(count(&events, EventKind::SubscriberOverflow), 0);
}

#[tokio::test]
async fn second_close_is_refused() {
    let service: ServiceRef = ServiceFn::arc(|_w: WorkerId, _c: CustomerId| async {});
    let (shop, _recorder) = shop_with(1, 1, service);

    shop.close().await.unwrap();
    assert!(matches!(shop.close().await, Err(RuntimeError::AlreadyClosing)));
    shop.detach_subscribers().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_service_still_drains() {
    let service: ServiceRef = ServiceFn::arc(|_w: WorkerId, c: CustomerId| async move {
        tokio::time::sleep(Duration::from_millis(5)).await;
        if c.0 % 2 == 0 {
            panic!("clippers broke on {c}");
        }
    });
    let cfg = Config {
        workers: 1,
        capacity: 4,
        ..Config::default()
    };
    let tally = Arc::new(Tally::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
    let shop = Barbershop::builder(cfg)
        .with_subscribers(subs)
        .with_service(service)
        .build()
        .unwrap();

    for id in 1..=4 {
        assert_eq!(shop.admit(CustomerId(id)), Admission::Admitted);
    }
    let report = tokio::time::timeout(STEP, shop.close())
        .await
        .expect("a panicking service must not stall the drain")
        .unwrap();
    assert_eq!(report.workers, 1);
    shop.detach_subscribers().await;

    let snap = tally.snapshot();
    assert_eq!(snap.admitted, 4);
    assert_eq!(snap.served, 4);
    assert_eq!(snap.panicked, 2);
    assert!(snap.inside.is_empty());
    assert_eq!(snap.workers_home, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropped_close_still_finishes_the_day() {
    let (mut gate, service) = Gate::new();
    let (shop, recorder) = shop_with(1, 2, service);

    assert_eq!(shop.admit(CustomerId(1)), Admission::Admitted);
    assert_eq!(gate.started().await, CustomerId(1));
    assert_eq!(shop.admit(CustomerId(2)), Admission::Admitted);
    assert_eq!(shop.admit(CustomerId(3)), Admission::Admitted);

    // The caller gives up while the backlog is still being served.
    let gave_up = tokio::time::timeout(Duration::from_millis(20), shop.close()).await;
    assert!(gave_up.is_err());
    assert_eq!(shop.phase(), Phase::Closing);
    assert!(matches!(shop.close().await, Err(RuntimeError::AlreadyClosing)));

    gate.release(3);
    tokio::time::timeout(STEP, async {
        while shop.phase() != Phase::Closed {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("closing must run to completion without its caller");
    shop.detach_subscribers().await;

    let events = recorder.events();
    assert_eq!(count(&events, EventKind::ServiceFinished), 3);
    assert_eq!(count(&events, EventKind::WorkerTerminated), 1);
    let terminated = position(&events, EventKind::WorkerTerminated, None).unwrap();
    let closed = position(&events, EventKind::ShopClosed, None).unwrap();
    assert!(terminated < closed);
}

#[tokio::test]
async fn burst_of_arrivals_is_fully_observed() {
    let tally = Arc::new(Tally::new().with_capacity(8));
    let subs: Vec<Arc<dyn Subscribe>> = vec![tally.clone()];
    let cfg = Config {
        service: DelayRange::up_to(Duration::from_millis(5)),
        ..Config::default()
    };
    let shop = Barbershop::builder(cfg)
        .with_subscribers(subs)
        .build()
        .unwrap();

    let mut admitted = 0u64;
    for id in 1..=3000 {
        if shop.admit(CustomerId(id)).is_admitted() {
            admitted += 1;
        }
    }
    shop.close().await.unwrap();
    shop.detach_subscribers().await;

    let snap = tally.snapshot();
    assert_eq!(snap.arrivals(), 3000);
    assert_eq!(snap.admitted, admitted);
    assert_eq!(snap.rejected_full, 3000 - admitted);
    assert_eq!(snap.served, admitted);
}
