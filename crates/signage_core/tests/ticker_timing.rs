mod common;

use signage_core::{Alignment, ManualClock, Ticker, TickerConfig, TimerCommand, TimerQueue};

fn pending_token(commands: &[TimerCommand]) -> signage_core::TimerToken {
    commands
        .iter()
        .rev()
        .find(|command| matches!(command, TimerCommand::Schedule { .. }))
        .map(TimerCommand::token)
        .expect("schedule command")
}

#[test]
fn aligned_tickers_fire_on_the_same_instants() {
    common::init_logging();
    let manual = ManualClock::new(120);
    let mut queue = TimerQueue::new(common::FRAME_MS);
    let mut header = Ticker::new(TickerConfig::aligned(Alignment::Second, manual.clock()));
    let mut badge = Ticker::new(TickerConfig::aligned(Alignment::Second, manual.clock()));

    for command in header.start() {
        queue.apply("header", command, manual.now());
    }
    manual.set(730);
    for command in badge.start() {
        queue.apply("badge", command, manual.now());
    }

    let mut header_fires = Vec::new();
    let mut badge_fires = Vec::new();
    while let Some(due) = queue.next_due().filter(|due| *due <= 10_000) {
        manual.set(due);
        while let Some((owner, token)) = queue.pop_due(due) {
            let (ticker, fires) = if owner == "header" {
                (&mut header, &mut header_fires)
            } else {
                (&mut badge, &mut badge_fires)
            };
            let commands = ticker.fire(token).expect("fresh token");
            fires.push(due);
            for command in commands {
                queue.apply(owner, command, due);
            }
        }
    }

    let whole_seconds: Vec<_> = (1..=10).map(|s| s * 1_000).collect();
    assert_eq!(header_fires, whole_seconds);
    assert_eq!(header_fires, badge_fires);
    assert!(header_fires.iter().all(|at| at % 1_000 == 0));
    assert_eq!(header.count(), 10);
    assert_eq!(badge.count(), 10);
}

#[test]
fn unaligned_ticker_does_not_accumulate_jitter() {
    common::init_logging();
    let manual = ManualClock::new(0);
    let mut ticker = Ticker::new(TickerConfig::every(1_000, manual.clock()));
    let mut token = pending_token(&ticker.start());
    let anchor = ticker.next_at().expect("anchored");
    assert_eq!(anchor, 1_000);

    // Deterministic delivery jitter of up to 250ms.
    let mut seed: u64 = 0x5eed;
    for k in 1..=200_i64 {
        seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        let jitter = ((seed >> 33) % 250) as i64;
        let scheduled = ticker.next_at().expect("pending");
        assert_eq!(scheduled, anchor + (k - 1) * 1_000);

        manual.set(scheduled + jitter);
        token = pending_token(&ticker.fire(token).expect("fresh token"));

        let deviation = manual.now() - (anchor + (k - 1) * 1_000);
        assert!((0..250).contains(&deviation));
        assert_eq!(ticker.next_at(), Some(anchor + k * 1_000));
    }
    assert_eq!(ticker.count(), 200);
}

#[test]
fn suspension_skips_missed_ticks_instead_of_bursting() {
    let manual = ManualClock::new(0);
    let mut ticker = Ticker::new(TickerConfig::every(100, manual.clock()));
    let token = pending_token(&ticker.start());

    manual.set(1_050);
    let commands = ticker.fire(token).expect("fresh token");
    assert_eq!(ticker.count(), 1);
    assert_eq!(ticker.next_at(), Some(1_100));
    assert!(matches!(
        commands[..],
        [TimerCommand::Schedule { delay_ms: 50, .. }]
    ));
}

#[test]
fn early_aligned_fire_does_not_repeat_a_boundary() {
    let manual = ManualClock::new(59_000);
    let mut ticker = Ticker::new(TickerConfig::aligned(Alignment::Minute, manual.clock()));
    let token = pending_token(&ticker.start());

    // Host timer slightly ahead of the wall clock.
    manual.set(59_990);
    ticker.fire(token).expect("fresh token");
    assert_eq!(ticker.next_at(), Some(120_000));
}

#[test]
fn exactly_one_pending_timer_across_lifecycle() {
    let manual = ManualClock::new(0);
    let mut queue = TimerQueue::new(common::FRAME_MS);
    let mut ticker = Ticker::new(TickerConfig::every(500, manual.clock()));
    let apply = |queue: &mut TimerQueue<u8>, commands: Vec<TimerCommand>| {
        for command in commands {
            queue.apply(1, command, manual.now());
        }
    };

    apply(&mut queue, ticker.start());
    apply(&mut queue, ticker.start());
    assert_eq!(queue.pending_count(), 1);

    apply(&mut queue, ticker.set_enabled(false));
    assert_eq!(queue.pending_count(), 0);

    apply(&mut queue, ticker.set_enabled(true));
    let faster = TickerConfig::every(200, manual.clock());
    apply(&mut queue, ticker.reconfigure(faster));
    assert_eq!(queue.pending_count(), 1);
    assert_eq!(ticker.next_at(), Some(200));
}
