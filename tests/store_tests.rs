use practice_hours::components::working_hours::{
    DayOfWeek, DoctorSchedule, IntervalId, TimeOfDay, WorkingInterval,
};
use practice_hours::db::{JsonFileDb, ScheduleDb};
use std::path::PathBuf;

/// Fresh, empty directory under the system temp dir
fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("practice-hours-test-{}", uuid::Uuid::new_v4()))
}

fn sample_schedule(doctor: &str) -> DoctorSchedule {
    DoctorSchedule::new(doctor).with_working_hours(vec![
        WorkingInterval {
            id: IntervalId::from("a"),
            day_of_week: DayOfWeek::Monday,
            start_time: TimeOfDay::from_hms(8, 0, 0).unwrap(),
            end_time: TimeOfDay::from_hms(12, 0, 0).unwrap(),
        },
        WorkingInterval {
            id: IntervalId::from("b"),
            day_of_week: DayOfWeek::Thursday,
            start_time: TimeOfDay::from_hms(12, 30, 15).unwrap(),
            end_time: TimeOfDay::from_hms(18, 0, 0).unwrap(),
        },
    ])
}

#[tokio::test]
async fn test_missing_schedule_is_none() {
    let db = JsonFileDb::new(temp_data_dir());
    assert!(db.get_schedule("Dr Nobody").await.unwrap().is_none());
    assert!(db.list_doctors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_json_file_round_trip() {
    let dir = temp_data_dir();
    let db = JsonFileDb::new(&dir);
    let schedule = sample_schedule("Dr Anna Virtanen");

    db.set_schedule("Dr Anna Virtanen", &schedule).await.unwrap();

    let path = db.path_for("Dr Anna Virtanen").unwrap();
    assert_eq!(path, dir.join("dr-anna-virtanen.json"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored["doctor"], "Dr Anna Virtanen");
    assert_eq!(stored["workingHours"][1]["startTime"], "12:30:15");
    assert_eq!(stored["workingHours"][1]["dayOfWeek"], 4);

    let loaded = db.get_schedule("Dr Anna Virtanen").await.unwrap();
    assert_eq!(loaded, Some(schedule));
    assert_eq!(
        db.list_doctors().await.unwrap(),
        vec!["Dr Anna Virtanen".to_string()]
    );

    db.delete_schedule("Dr Anna Virtanen").await.unwrap();
    assert!(db.get_schedule("Dr Anna Virtanen").await.unwrap().is_none());
    // Deleting again is fine
    db.delete_schedule("Dr Anna Virtanen").await.unwrap();

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_corrupt_file_is_a_store_error() {
    let dir = temp_data_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("dr-broken.json"), "{ not json").unwrap();

    let db = JsonFileDb::new(&dir);
    let err = db.get_schedule("Dr Broken").await.unwrap_err();
    assert!(matches!(err, practice_hours::error::Error::Store(_)));

    // Listing skips it
    assert!(db.list_doctors().await.unwrap().is_empty());

    std::fs::remove_dir_all(&dir).unwrap();
}
