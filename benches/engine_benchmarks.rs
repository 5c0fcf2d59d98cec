use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use holdem_engine::{
    Card, GameSnapshot, SEATS, SeatInput, SeatProposal, TableConfig, TableInputs, TableState,
    best_hand, calculate_transition, divide_pot, evaluate_hand, rank_players, wire,
};

/// Helper to build inputs with N seated, ready players
fn inputs_with_players(n_players: usize, now_millis: i64) -> TableInputs {
    let mut inputs = TableInputs {
        now_millis,
        ..TableInputs::default()
    };
    for seat in inputs.seats.iter_mut().take(n_players) {
        *seat = SeatInput::ready_with(5000);
    }
    inputs
}

/// Ticks a fresh table until the hand is dealt
fn snapshot_in_play(n_players: usize) -> (GameSnapshot, TableConfig) {
    let config = TableConfig::default();
    let mut snapshot = GameSnapshot::default();

    // Uninitialized -> Idle -> Ready -> Playing, driven by the clock
    for now in [0, 1, 1 + config.ready_timeout_secs * 1000 + 1000] {
        if let Some(next) = calculate_transition(&snapshot, &config, &inputs_with_players(n_players, now)) {
            snapshot = next;
        }
    }
    assert_eq!(snapshot.table_state, TableState::Playing);
    (snapshot, config)
}

/// Benchmark 5-card hand evaluation on a made hand
fn bench_evaluate_hand(c: &mut Criterion) {
    // A-K-Q-J-10 of spades, a royal flush
    let cards = [Card(51), Card(50), Card(49), Card(48), Card(47)];

    c.bench_function("evaluate_hand_5_cards", |b| {
        b.iter(|| evaluate_hand(cards));
    });
}

/// Benchmark the 21-combination search over hole cards plus a full board
fn bench_best_hand(c: &mut Criterion) {
    let hole = [Card(51), Card(38)];
    let community = [Card(25), Card(12), Card(0), Card(30), Card(44)];

    c.bench_function("best_hand_7_cards", |b| {
        b.iter(|| best_hand(hole, &community));
    });
}

/// Benchmark showdown settlement: ranking plus layered pot division
fn bench_showdown_settlement(c: &mut Criterion) {
    let mut values = [0u64; SEATS];
    let mut contributions = [0u32; SEATS];
    for i in 0..SEATS {
        values[i] = (i as u64 + 1) << 20;
        contributions[i] = 100 * (i as u32 + 1);
    }
    // two of the stakes tie for the best hand
    values[3] = values[7];

    c.bench_function("showdown_settlement", |b| {
        b.iter(|| divide_pot(&contributions, &rank_players(&values)));
    });
}

/// Benchmark one transition tick with different table sizes
fn bench_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_transition");

    for n_players in [2, 6, 10].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_players", n_players)),
            n_players,
            |b, &n| {
                let (snapshot, config) = snapshot_in_play(n);
                let mut inputs = inputs_with_players(n, snapshot.last_transition_millis + 1);
                inputs.proposal = SeatProposal::fold();
                b.iter(|| calculate_transition(&snapshot, &config, &inputs));
            },
        );
    }

    group.finish();
}

/// Benchmark the wire codec both directions
fn bench_wire_codec(c: &mut Criterion) {
    let (snapshot, _) = snapshot_in_play(SEATS);
    let frame = wire::encode(&snapshot);

    c.bench_function("wire_encode", |b| {
        b.iter(|| wire::encode(&snapshot));
    });
    c.bench_function("wire_decode", |b| {
        b.iter(|| wire::decode(&frame));
    });
}

criterion_group!(hand_evaluation, bench_evaluate_hand, bench_best_hand);

criterion_group!(
    table_operations,
    bench_showdown_settlement,
    bench_transition,
    bench_wire_codec,
);

criterion_main!(hand_evaluation, table_operations);
