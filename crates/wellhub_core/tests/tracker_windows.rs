use chrono::NaiveDate;
use wellhub_core::analytics::{GoalThresholds, GoalTier, Reducer};
use wellhub_core::calendar::ClockTime;
use wellhub_core::config::GoalsConfig;
use wellhub_core::model::goals::{HydrationGoal, SodiumGoal};
use wellhub_core::model::health::{
    BeverageKind, DailyCheckIn, HydrationEntry, SleepEntry, SodiumEntry,
};
use wellhub_core::registry::collections::{GOAL_SETTINGS, SODIUM};
use wellhub_core::service::tracker_service::TrackerService;
use wellhub_core::{ServiceError, StoreEngine, StoreHandle};

fn day(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn add_sodium(store: &StoreHandle, date: &str, mg: f64) {
    store
        .repository::<SodiumEntry>()
        .add(&SodiumEntry {
            date: day(date),
            time: None,
            amount_mg: mg,
            source: "broth".to_string(),
            notes: None,
        })
        .unwrap();
}

fn add_water(store: &StoreHandle, date: &str, ml: f64) {
    store
        .repository::<HydrationEntry>()
        .add(&HydrationEntry {
            date: day(date),
            time: None,
            amount_ml: ml,
            kind: BeverageKind::Water,
            notes: None,
        })
        .unwrap();
}

fn check_in(date: &str, energy: u8) -> DailyCheckIn {
    DailyCheckIn {
        date: day(date),
        time: None,
        pain: 3,
        energy,
        mood: 3,
        symptoms: Vec::new(),
        gratitude: None,
        notes: None,
    }
}

#[test]
fn window_covers_every_day_once() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_sodium(&store, "2024-03-02", 1000.0);
    add_sodium(&store, "2024-02-20", 1000.0);
    let tracker = TrackerService::new(&store);

    let start = day("2024-02-27");
    let end = day("2024-03-04");
    let buckets = tracker.window::<SodiumEntry>(start, end).unwrap();

    assert_eq!(buckets.len() as i64, (end - start).num_days() + 1);
    assert!(buckets.windows(2).all(|pair| pair[0].date < pair[1].date));
    assert_eq!(buckets.first().unwrap().date, start);
    assert_eq!(buckets.last().unwrap().date, end);
    let filled: usize = buckets.iter().map(|bucket| bucket.records.len()).sum();
    assert_eq!(filled, 1);
}

#[test]
fn inverted_window_is_rejected() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let tracker = TrackerService::new(&store);
    assert!(matches!(
        tracker.window::<SodiumEntry>(day("2024-03-05"), day("2024-03-01")),
        Err(ServiceError::Window(_))
    ));
}

#[test]
fn chart_series_zero_fills_while_average_skips_empty_days() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_sodium(&store, "2024-03-01", 1500.0);
    add_sodium(&store, "2024-03-01", 500.0);
    add_sodium(&store, "2024-03-03", 3000.0);
    let tracker = TrackerService::new(&store);

    let series = tracker
        .daily_series::<SodiumEntry>(day("2024-03-01"), day("2024-03-04"), Reducer::Sum, |entry| {
            Some(entry.amount_mg)
        })
        .unwrap();
    let values: Vec<f64> = series.iter().map(|point| point.value).collect();
    assert_eq!(values, vec![2000.0, 0.0, 3000.0, 0.0]);

    let repeat = tracker
        .daily_series::<SodiumEntry>(day("2024-03-01"), day("2024-03-04"), Reducer::Sum, |entry| {
            Some(entry.amount_mg)
        })
        .unwrap();
    assert_eq!(series, repeat);

    let average = tracker
        .average_per_recorded_day::<SodiumEntry>(
            day("2024-03-01"),
            day("2024-03-04"),
            Reducer::Sum,
            |entry| Some(entry.amount_mg),
        )
        .unwrap();
    assert_eq!(average, Some(2500.0));
}

#[test]
fn mean_reducer_over_check_ins() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let check_ins = store.repository::<DailyCheckIn>();
    check_ins.add(&check_in("2024-03-01", 2)).unwrap();
    check_ins.add(&check_in("2024-03-01", 5)).unwrap();
    let tracker = TrackerService::new(&store);

    let series = tracker
        .daily_series::<DailyCheckIn>(day("2024-03-01"), day("2024-03-02"), Reducer::Mean, |entry| {
            Some(f64::from(entry.energy))
        })
        .unwrap();
    assert_eq!(series[0].value, 3.5);
    assert_eq!(series[1].value, 0.0);

    let latest = tracker
        .latest_for_day::<DailyCheckIn>(day("2024-03-01"))
        .unwrap()
        .unwrap();
    assert_eq!(latest.fields.energy, 5);
    assert!(tracker
        .latest_for_day::<DailyCheckIn>(day("2024-03-02"))
        .unwrap()
        .is_none());
}

#[test]
fn sodium_goal_tiers_follow_daily_total() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let tracker = TrackerService::new(&store);
    let cases = [
        ("2024-03-01", 4000.0, GoalTier::Met),
        ("2024-03-02", 3000.0, GoalTier::Near),
        ("2024-03-03", 2000.0, GoalTier::Low),
        ("2024-03-04", 1000.0, GoalTier::Critical),
    ];
    for (date, total, _) in cases {
        add_sodium(&store, date, total / 2.0);
        add_sodium(&store, date, total / 2.0);
    }

    for (date, total, tier) in cases {
        let status = tracker.sodium_status(day(date)).unwrap();
        assert_eq!(status.total, total);
        assert_eq!(status.tier, tier);
    }

    let status = tracker.sodium_status(day("2024-03-04")).unwrap();
    assert_eq!(status.percent, 25);
    assert_eq!(status.remaining, 3000.0);
    assert_eq!(tracker.daily_total(SODIUM, "amount", day("2024-03-09")).unwrap(), 0.0);
}

#[test]
fn hydration_converts_millilitres_to_litres() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_water(&store, "2024-03-01", 1000.0);
    add_water(&store, "2024-03-01", 500.0);
    let tracker = TrackerService::new(&store);

    let status = tracker.hydration_status(day("2024-03-01")).unwrap();
    assert_eq!(status.total, 1.5);
    assert_eq!(status.goal, 2.5);
    assert_eq!(status.tier, GoalTier::Low);
    assert_eq!(status.percent, 60);
}

#[test]
fn configured_goals_and_thresholds_apply() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_sodium(&store, "2024-03-01", 3000.0);
    let tracker = TrackerService::new(&store).with_goals(GoalsConfig {
        sodium_daily_mg: 3000.0,
        hydration_daily_liters: 2.0,
        thresholds: GoalThresholds::new(0.9, 0.6).unwrap(),
    });
    assert_eq!(
        tracker.sodium_status(day("2024-03-01")).unwrap().tier,
        GoalTier::Met
    );
}

#[test]
fn recent_history_is_newest_first_within_cutoff() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_sodium(&store, "2024-03-05", 1.0);
    add_sodium(&store, "2024-02-01", 2.0);
    add_sodium(&store, "2024-03-09", 3.0);
    add_sodium(&store, "2024-03-03", 4.0);
    add_sodium(&store, "2024-03-09", 5.0);
    let tracker = TrackerService::new(&store);

    let recent = tracker
        .recent_history::<SodiumEntry>(day("2024-03-10"), 7)
        .unwrap();
    let amounts: Vec<f64> = recent.iter().map(|record| record.fields.amount_mg).collect();
    assert_eq!(amounts, vec![5.0, 3.0, 1.0, 4.0]);
}

fn night(date: &str, quality: u8) -> SleepEntry {
    SleepEntry {
        date: day(date),
        bed_time: ClockTime::from_hm(23, 0).unwrap(),
        wake_time: ClockTime::from_hm(7, 0).unwrap(),
        duration_hours: 8.0,
        quality,
        nightmares: false,
        wake_ups: 1,
        restful: true,
        notes: None,
    }
}

#[test]
fn sleep_for_day_keeps_the_first_night_logged() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let sleep = store.repository::<SleepEntry>();
    sleep.add(&night("2024-03-01", 4)).unwrap();
    sleep.add(&night("2024-03-01", 2)).unwrap();
    sleep.add(&night("2024-03-02", 5)).unwrap();
    let tracker = TrackerService::new(&store);

    let first = tracker.sleep_for_day(day("2024-03-01")).unwrap().unwrap();
    assert_eq!(first.fields.quality, 4);
    let latest = tracker
        .latest_for_day::<SleepEntry>(day("2024-03-01"))
        .unwrap()
        .unwrap();
    assert_eq!(latest.fields.quality, 2);
    assert!(tracker.sleep_for_day(day("2024-03-03")).unwrap().is_none());
}

#[test]
fn saved_goals_override_configured_defaults() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    add_sodium(&store, "2024-03-01", 3000.0);
    add_water(&store, "2024-03-01", 1500.0);
    let tracker = TrackerService::new(&store);

    let defaults = tracker.goal_settings().unwrap();
    assert_eq!(defaults.sodium.daily_goal_mg, 4000.0);
    assert_eq!(defaults.hydration.daily_goal_liters, 2.5);
    assert_eq!(store.count(GOAL_SETTINGS).unwrap(), 0);

    tracker
        .set_sodium_goal(SodiumGoal {
            daily_goal_mg: 3000.0,
            tracking_enabled: true,
        })
        .unwrap();
    let saved = tracker
        .set_hydration_goal(HydrationGoal {
            daily_goal_liters: 1.5,
            reminder_enabled: false,
            reminder_interval_minutes: 90,
        })
        .unwrap();
    assert_eq!(saved.sodium.daily_goal_mg, 3000.0);
    assert!(!saved.hydration.reminder_enabled);
    assert_eq!(store.count(GOAL_SETTINGS).unwrap(), 1);

    let reloaded = TrackerService::new(&store);
    assert_eq!(reloaded.goal_settings().unwrap(), saved);
    assert_eq!(
        reloaded.sodium_status(day("2024-03-01")).unwrap().tier,
        GoalTier::Met
    );
    let hydration = reloaded.hydration_status(day("2024-03-01")).unwrap();
    assert_eq!(hydration.goal, 1.5);
    assert_eq!(hydration.percent, 100);
}

#[test]
fn non_positive_goals_are_rejected() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let tracker = TrackerService::new(&store);

    assert!(matches!(
        tracker.set_sodium_goal(SodiumGoal {
            daily_goal_mg: 0.0,
            tracking_enabled: true,
        }),
        Err(ServiceError::InvalidInput(_))
    ));
    assert!(matches!(
        tracker.set_hydration_goal(HydrationGoal {
            daily_goal_liters: 2.0,
            reminder_enabled: true,
            reminder_interval_minutes: 0,
        }),
        Err(ServiceError::InvalidInput(_))
    ));
    assert_eq!(store.count(GOAL_SETTINGS).unwrap(), 0);
}
