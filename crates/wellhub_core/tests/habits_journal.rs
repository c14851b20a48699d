use chrono::NaiveDate;
use wellhub_core::model::habit::{Habit, HabitCategory};
use wellhub_core::model::journal::JournalEntry;
use wellhub_core::service::habit_service::HabitService;
use wellhub_core::service::journal_service::JournalService;
use wellhub_core::{ServiceError, StoreEngine, StoreError};

fn day(value: &str) -> NaiveDate {
    value.parse().unwrap()
}

fn entry(date: &str, title: &str, mood: u8, energy: u8) -> JournalEntry {
    JournalEntry {
        date: day(date),
        time: None,
        title: title.to_string(),
        content: "short walk, rested after".to_string(),
        mood,
        energy,
        gratitude: Vec::new(),
        highlights: String::new(),
        challenges: String::new(),
        tomorrow: String::new(),
        related_tags: Vec::new(),
        favorite: false,
    }
}

#[test]
fn toggles_persist_dates_and_streaks() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let habits = HabitService::new(&store);

    let habit = habits
        .create(&Habit::new("Morning stretch", HabitCategory::Health))
        .unwrap();
    assert!(habit.id.as_str().starts_with("habit"));

    for date in ["2024-03-02", "2024-03-01", "2024-03-03"] {
        habits.toggle(&habit.id, day(date)).unwrap();
    }
    let stored = store.repository::<Habit>().get(&habit.id).unwrap();
    assert_eq!(
        stored.fields.completed_dates,
        vec![day("2024-03-01"), day("2024-03-02"), day("2024-03-03")]
    );
    assert_eq!(stored.fields.current_streak, 3);
    assert_eq!(stored.fields.longest_streak, 3);

    let untoggled = habits.toggle(&habit.id, day("2024-03-03")).unwrap();
    assert!(!untoggled.fields.is_completed_on(day("2024-03-03")));
    assert_eq!(untoggled.fields.current_streak, 2);
    assert_eq!(untoggled.fields.longest_streak, 3);

    let restored = habits.toggle(&habit.id, day("2024-03-03")).unwrap();
    assert_eq!(restored.fields.completed_dates.len(), 3);
    assert_eq!(restored.fields.current_streak, 3);
}

#[test]
fn gap_in_completions_resets_current_streak() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let habits = HabitService::new(&store);
    let habit = habits
        .create(&Habit::new("Compression socks", HabitCategory::Health))
        .unwrap();

    habits.toggle(&habit.id, day("2024-03-01")).unwrap();
    habits.toggle(&habit.id, day("2024-03-02")).unwrap();
    let after_gap = habits.toggle(&habit.id, day("2024-03-05")).unwrap();

    assert_eq!(after_gap.fields.current_streak, 1);
    assert_eq!(after_gap.fields.longest_streak, 2);
}

#[test]
fn habits_by_category_and_summary() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let habits = HabitService::new(&store);

    let stretch = habits
        .create(&Habit::new("Stretch", HabitCategory::Health))
        .unwrap();
    habits
        .create(&Habit::new("Breathing", HabitCategory::Mindfulness))
        .unwrap();
    for date in ["2024-03-01", "2024-03-02", "2024-03-03"] {
        habits.toggle(&stretch.id, day(date)).unwrap();
    }

    let health = habits.by_category(HabitCategory::Health).unwrap();
    assert_eq!(health.len(), 1);
    assert_eq!(health[0].fields.name, "Stretch");
    assert!(habits.by_category(HabitCategory::Social).unwrap().is_empty());

    let summary = habits.summary().unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.active, 2);
    assert_eq!(summary.average_streak, "1.5");
    assert_eq!(summary.best_streak, 3);
    assert_eq!(summary.total_completions, 3);
}

#[test]
fn toggling_a_deleted_habit_is_not_found() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let habits = HabitService::new(&store);
    let habit = habits
        .create(&Habit::new("Salt tabs", HabitCategory::Health))
        .unwrap();
    habits.delete(&habit.id).unwrap();

    let err = habits.toggle(&habit.id, day("2024-03-01")).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound { .. })));
    assert!(habits.all().unwrap().is_empty());
}

#[test]
fn journal_averages_are_zero_without_entries() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let journal = JournalService::new(&store);

    let averages = journal.averages().unwrap();
    assert_eq!(averages.entries, 0);
    assert_eq!(averages.mood, "0");
    assert_eq!(averages.energy, "0");
    assert_eq!(journal.streak().unwrap(), 0);
}

#[test]
fn journal_streak_averages_and_history() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let journal = JournalService::new(&store);

    journal.add(&entry("2024-03-01", "first", 4, 2)).unwrap();
    let mut favorite = entry("2024-03-02", "second", 5, 3);
    favorite.favorite = true;
    journal.add(&favorite).unwrap();
    journal.add(&entry("2024-03-03", "third", 3, 3)).unwrap();

    assert_eq!(journal.streak().unwrap(), 3);

    let averages = journal.averages().unwrap();
    assert_eq!(averages.entries, 3);
    assert_eq!(averages.mood, "4.0");
    assert_eq!(averages.energy, "2.7");

    let titles: Vec<String> = journal
        .history()
        .unwrap()
        .into_iter()
        .map(|entry| entry.fields.title)
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    let favorites = journal.favorites().unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].fields.title, "second");
}

#[test]
fn second_entry_on_latest_day_ends_journal_streak() {
    let engine = StoreEngine::in_memory();
    let store = engine.open_default().unwrap();
    let journal = JournalService::new(&store);

    for (date, title) in [
        ("2024-03-01", "first"),
        ("2024-03-02", "second"),
        ("2024-03-03", "third"),
        ("2024-03-03", "evening"),
    ] {
        journal.add(&entry(date, title, 3, 3)).unwrap();
    }

    assert_eq!(journal.streak().unwrap(), 1);
    let newest = journal.history().unwrap();
    assert_eq!(newest[0].fields.title, "evening");
    assert_eq!(newest[1].fields.title, "third");
}
