//! Shuffle choreography tests.
//!
//! Run whole shuffles through the board with a hand-driven scheduler and
//! synthetic timestamps, and check the permutation itself for bias.

use card_table::board::{Board, BoardEvent};
use card_table::cards::{CardId, CardSpec, EntityStore, FaceState};
use card_table::core::{BoardConfig, BoardRng, Size};
use card_table::decks::tarot;
use card_table::host::{FixedGeometry, FrameHandle, ManualScheduler, RecordingDetailView};
use card_table::interaction::{PointerEvent, PointerId};
use card_table::placement::PlacementMode;
use card_table::shuffle::ShufflePhase;
use rustc_hash::FxHashSet;

type TestBoard = Board<FixedGeometry, ManualScheduler, RecordingDetailView>;

fn board(count: usize, seed: u64) -> TestBoard {
    let geometry = FixedGeometry::bottom_row(Size::new(1000.0, 1000.0), 500.0, 140.0);
    let config = BoardConfig::default().with_seed(seed);
    let mut board = Board::new(config, geometry, ManualScheduler::new(), RecordingDetailView::new()).unwrap();
    board
        .initialize_board((0..count).map(|i| CardSpec::new(format!("c{}", i), format!("Card {}", i))))
        .unwrap();
    board
}

/// Deliver the pending frame, if any, at `timestamp_ms`.
fn frame(board: &mut TestBoard, timestamp_ms: f64) -> bool {
    match board.scheduler_mut().take_pending() {
        Some(handle) => {
            board.on_frame(handle, timestamp_ms);
            true
        }
        None => false,
    }
}

/// Trigger and run frames until the loop is running.
fn start_loop(board: &mut TestBoard) {
    assert!(board.trigger_shuffle());
    frame(board, 0.0);
    frame(board, 800.0);
    assert_eq!(board.shuffle_phase(), ShufflePhase::Looping);
}

/// Deliver frames 16ms apart from `start` until the shuffle settles.
fn run_until_idle(board: &mut TestBoard, start: f64) {
    let mut t = start;
    while board.shuffle_phase() != ShufflePhase::Idle {
        assert!(frame(board, t), "shuffle stalled while {}", board.shuffle_phase());
        t += 16.0;
        assert!(t < start + 10_000.0, "shuffle never settled");
    }
}

fn order(board: &TestBoard) -> Vec<CardId> {
    board.session().store().order().iter().cloned().collect()
}

fn sorted(mut ids: Vec<CardId>) -> Vec<CardId> {
    ids.sort();
    ids
}

// =============================================================================
// Full Cycle
// =============================================================================

#[test]
fn test_full_shuffle_is_a_bijection() {
    let mut board = board(5, 99);
    let before = order(&board);

    start_loop(&mut board);
    for i in 0..30 {
        frame(&mut board, 816.0 + 16.0 * i as f64);
    }
    assert!(board.stop_shuffle());
    run_until_idle(&mut board, 1400.0);

    let after = order(&board);
    assert_eq!(sorted(after), sorted(before));
    assert_eq!(board.session().store().len(), 5);
    assert!(board.visuals().iter().all(|v| v.mode == PlacementMode::Row));
}

/// Stopping right after the loop starts still permutes once and lands
/// every card in its own slot, stacked in the new order.
#[test]
fn test_immediate_stop_lands_in_distinct_slots() {
    let mut board = board(5, 1234);
    start_loop(&mut board);
    assert!(board.stop_shuffle());
    assert_eq!(board.shuffle_phase(), ShufflePhase::Landing);

    // Landing: every card free, flying towards slot i with z = i + 1
    let landing = board.visuals();
    assert!(landing.iter().all(|v| v.mode == PlacementMode::Free));
    let zs: Vec<i32> = landing.iter().map(|v| v.z_index).collect();
    assert_eq!(zs, vec![1, 2, 3, 4, 5]);
    let xs: Vec<f64> = landing.iter().map(|v| v.displayed_at().x).collect();
    assert_eq!(xs, vec![0.0, 102.5, 205.0, 307.5, 410.0]);

    run_until_idle(&mut board, 1000.0);

    let settled = board.visuals();
    assert!(settled.iter().all(|v| v.mode == PlacementMode::Row));
    let xs: Vec<f64> = settled.iter().map(|v| v.displayed_at().x).collect();
    assert_eq!(xs, vec![0.0, 102.5, 205.0, 307.5, 410.0]);
    let zs: Vec<i32> = settled.iter().map(|v| v.z_index).collect();
    assert_eq!(zs, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_settle_waits_for_settle_delay() {
    let mut board = board(3, 8);
    start_loop(&mut board);
    board.stop_shuffle();

    frame(&mut board, 2000.0);
    frame(&mut board, 2549.0);
    assert_eq!(board.shuffle_phase(), ShufflePhase::Landing);

    frame(&mut board, 2550.0);
    assert_eq!(board.shuffle_phase(), ShufflePhase::Idle);
    assert!(board.scheduler().pending().is_none());
}

#[test]
fn test_phase_events() {
    let mut board = board(4, 2);
    start_loop(&mut board);
    board.stop_shuffle();
    run_until_idle(&mut board, 1000.0);

    let phases: Vec<ShufflePhase> = board
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            BoardEvent::ShufflePhaseChanged { phase } => Some(phase),
            _ => None,
        })
        .collect();
    assert_eq!(
        phases,
        vec![ShufflePhase::Gathering, ShufflePhase::Looping, ShufflePhase::Landing, ShufflePhase::Idle]
    );
}

#[test]
fn test_gather_hides_every_card() {
    let mut board = board(5, 3);
    board.handle_pointer(PointerEvent::down(PointerId(1), 20.0, 900.0));
    board.handle_pointer(PointerEvent::up(PointerId(1), 20.0, 900.0));
    assert!(board.visuals().iter().any(|v| v.face == FaceState::Revealed));

    board.trigger_shuffle();

    assert!(board.visuals().iter().all(|v| v.face == FaceState::Hidden));
}

#[test]
fn test_loop_keeps_z_positive_and_depth_sorted() {
    let mut board = board(12, 4);
    start_loop(&mut board);

    for i in 0..100 {
        frame(&mut board, 816.0 + 16.0 * i as f64);
        let visuals = board.visuals();
        assert!(visuals.iter().all(|v| v.mode == PlacementMode::Animating));
        assert!(visuals.iter().all(|v| v.z_index >= 1));
        for a in &visuals {
            for b in &visuals {
                if a.transform.z > b.transform.z + 1.0 {
                    assert!(a.z_index > b.z_index);
                }
            }
        }
    }
}

// =============================================================================
// Idempotence and Re-entrancy
// =============================================================================

#[test]
fn test_stop_when_idle_is_a_no_op() {
    let mut board = board(5, 6);
    let before = board.visuals();

    assert!(!board.stop_shuffle());
    assert!(!board.stop_shuffle());

    assert_eq!(board.visuals(), before);
    assert_eq!(board.shuffle_phase(), ShufflePhase::Idle);
    assert!(board.drain_events().is_empty());
}

#[test]
fn test_double_stop_equals_single_stop() {
    let mut once = board(5, 77);
    let mut twice = board(5, 77);

    start_loop(&mut once);
    start_loop(&mut twice);
    assert!(once.stop_shuffle());
    assert!(twice.stop_shuffle());
    assert!(!twice.stop_shuffle());

    run_until_idle(&mut once, 1000.0);
    run_until_idle(&mut twice, 1000.0);

    assert_eq!(order(&once), order(&twice));
    assert_eq!(once.visuals(), twice.visuals());
}

#[test]
fn test_second_trigger_is_ignored() {
    let mut board = board(5, 10);
    start_loop(&mut board);
    let requested = board.scheduler().requested();

    assert!(!board.trigger_shuffle());
    assert_eq!(board.shuffle_phase(), ShufflePhase::Looping);
    assert_eq!(board.scheduler().requested(), requested);
}

#[test]
fn test_stale_frame_is_ignored() {
    let mut board = board(3, 12);
    board.trigger_shuffle();
    let pending = board.scheduler().pending().unwrap();

    board.on_frame(FrameHandle(pending.0 + 100), 5000.0);

    assert_eq!(board.shuffle_phase(), ShufflePhase::Gathering);
    assert_eq!(board.scheduler().pending(), Some(pending));
}

#[test]
fn test_empty_board_cannot_shuffle() {
    let mut board = board(0, 1);
    assert!(!board.trigger_shuffle());
    assert!(board.scheduler().pending().is_none());
}

// =============================================================================
// Failure Recovery
// =============================================================================

#[test]
fn test_scheduler_failure_mid_loop_lands_cards() {
    let mut board = board(5, 21);
    let before = order(&board);
    start_loop(&mut board);

    board.scheduler_mut().set_failing(true);
    frame(&mut board, 816.0);

    assert_eq!(board.shuffle_phase(), ShufflePhase::Idle);
    assert!(board.visuals().iter().all(|v| v.mode == PlacementMode::Row));
    assert_eq!(sorted(order(&board)), sorted(before));
}

#[test]
fn test_frame_error_aborts_loop() {
    let mut board = board(5, 22);
    start_loop(&mut board);

    board.on_frame_error();

    assert_eq!(board.shuffle_phase(), ShufflePhase::Idle);
    assert!(board.visuals().iter().all(|v| v.mode == PlacementMode::Row));
    // A stray frame after recovery does nothing
    board.on_frame(FrameHandle(1), 9999.0);
    assert_eq!(board.shuffle_phase(), ShufflePhase::Idle);
}

// =============================================================================
// Permutation Quality
// =============================================================================

/// Each of 5 cards should land in each of 5 positions about equally often.
#[test]
fn test_permutation_is_unbiased() {
    const TRIALS: usize = 50_000;
    const TOLERANCE: usize = 600;

    let specs: Vec<CardSpec> = (0..5).map(|i| CardSpec::new(format!("c{}", i), "")).collect();
    let original = EntityStore::from_specs(specs).unwrap();
    let mut rng = BoardRng::new(0x5eed);
    let mut counts = [[0usize; 5]; 5];

    for _ in 0..TRIALS {
        let mut store = original.clone();
        store.permute(&mut rng);
        for (position, id) in store.order().iter().enumerate() {
            let card = original.position(id).unwrap();
            counts[card][position] += 1;
        }
    }

    let expected = TRIALS / 5;
    for (card, row) in counts.iter().enumerate() {
        for (position, &count) in row.iter().enumerate() {
            assert!(
                count.abs_diff(expected) <= TOLERANCE,
                "card {} landed in position {} {} times (expected ~{})",
                card,
                position,
                count,
                expected
            );
        }
    }
}

#[test]
fn test_all_orders_reachable() {
    let specs: Vec<CardSpec> = (0..4).map(|i| CardSpec::new(format!("c{}", i), "")).collect();
    let original = EntityStore::from_specs(specs).unwrap();
    let mut rng = BoardRng::new(17);
    let mut seen = FxHashSet::default();

    for _ in 0..2_000 {
        let mut store = original.clone();
        store.permute(&mut rng);
        seen.insert(store.order_snapshot());
    }

    assert_eq!(seen.len(), 24);
}

#[test]
fn test_seeds_vary_the_outcome() {
    let mut outcomes = FxHashSet::default();
    for seed in 0..40 {
        let mut board = board(6, seed);
        start_loop(&mut board);
        board.stop_shuffle();
        run_until_idle(&mut board, 1000.0);
        outcomes.insert(order(&board));
    }
    assert!(outcomes.len() > 20);
}

#[test]
fn test_tarot_deck_shuffle() {
    let geometry = FixedGeometry::bottom_row(Size::new(1600.0, 900.0), 1200.0, 140.0);
    let mut board = Board::new(
        BoardConfig::default().with_seed(78),
        geometry,
        ManualScheduler::new(),
        RecordingDetailView::new(),
    )
    .unwrap();
    board.initialize_board(tarot::standard_deck()).unwrap();
    let before = order(&board);

    start_loop(&mut board);
    board.stop_shuffle();
    run_until_idle(&mut board, 1000.0);

    let after = order(&board);
    assert_ne!(after, before);
    assert_eq!(sorted(after), sorted(before));
    let zs: Vec<i32> = board.visuals().iter().map(|v| v.z_index).collect();
    assert_eq!(zs, (1..=78).collect::<Vec<i32>>());
}
