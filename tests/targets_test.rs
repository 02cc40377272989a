use std::io::Write;

use chrono::{Duration, NaiveDate};
use tempfile::NamedTempFile;

use portion_optimizer_rs::config::load_settings;
use portion_optimizer_rs::planner::{
    derive_fat, resolve_target, resolve_target_from, week_start, DayTargets, NutritionSettings,
    WeeklyOverride,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_fat_derivation_examples() {
    assert_eq!(derive_fat(2000.0, 150.0, 200.0), 67.0);
    assert_eq!(derive_fat(1500.0, 200.0, 200.0), 30.0);
}

#[test]
fn test_every_resolved_target_is_energy_consistent() {
    let monday = date("2026-10-19");
    for calories in (1200..=3600).step_by(150) {
        for protein in (60..=260).step_by(25) {
            for carbs in (50..=400).step_by(35) {
                let settings = NutritionSettings {
                    weekday: DayTargets {
                        calories: Some(calories as f64),
                        protein: Some(protein as f64),
                        carbs: Some(carbs as f64),
                    },
                    ..Default::default()
                };
                let t = resolve_target(monday, &settings, None);
                let energy = 4.0 * t.protein + 4.0 * t.carbs + 9.0 * t.fat;
                assert!(
                    (energy - t.calories).abs() <= 8.0,
                    "{}/{}/{} resolved to {:?}",
                    calories,
                    protein,
                    carbs,
                    t
                );
                assert!(t.fat >= 30.0);
            }
        }
    }
}

#[test]
fn test_override_applies_across_its_week_only() {
    let settings = NutritionSettings::default();
    let overrides = vec![WeeklyOverride {
        week_start: date("2026-10-19"),
        calories: Some(2400.0),
        protein: None,
        carbs: None,
    }];

    let monday = date("2026-10-19");
    for offset in 0..7 {
        let day = monday + Duration::days(offset);
        assert_eq!(week_start(day), monday);
        assert_eq!(resolve_target_from(day, &settings, &overrides).calories, 2400.0);
    }
    let next_monday = monday + Duration::days(7);
    assert_eq!(
        resolve_target_from(next_monday, &settings, &overrides).calories,
        2000.0
    );
}

#[test]
fn test_settings_file_drives_resolution() {
    let json = r#"{
        "settings": {"weekday": {"calories": 2200, "protein": 160, "carbs": 220}},
        "overrides": [{"week_start": "2026-10-26", "carbs": 150}]
    }"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    let loaded = load_settings(file.path()).unwrap();

    let this_week = resolve_target_from(date("2026-10-21"), &loaded.settings, &loaded.overrides);
    assert_eq!(this_week.carbs, 220.0);
    // (2200 - 640 - 880) / 9 = 75.6
    assert_eq!(this_week.fat, 76.0);

    let next_week = resolve_target_from(date("2026-10-28"), &loaded.settings, &loaded.overrides);
    assert_eq!(next_week.carbs, 150.0);
    assert_eq!(next_week.protein, 160.0);
}
