use super::models::{Draft, IntervalId, Slot, TimeField, WorkingInterval};
use super::time::TimeOfDay;
use crate::error::ValidationError;

/// Check a draft against the existing collection.
///
/// `exclude` is the id of the interval being edited, which never conflicts
/// with itself. Pure: nothing is mutated.
pub fn validate(
    draft: &Draft,
    intervals: &[WorkingInterval],
    exclude: Option<&IntervalId>,
) -> Result<Slot, ValidationError> {
    check_slot(parse_draft(draft)?, intervals, exclude)
}

/// Parse both times of a draft, start first
pub fn parse_draft(draft: &Draft) -> Result<Slot, ValidationError> {
    Ok(Slot {
        day: draft.day,
        start: parse_field(&draft.start, TimeField::Start)?,
        end: parse_field(&draft.end, TimeField::End)?,
    })
}

/// Duration and overlap checks on already parsed times
pub fn check_slot(
    slot: Slot,
    intervals: &[WorkingInterval],
    exclude: Option<&IntervalId>,
) -> Result<Slot, ValidationError> {
    if slot.end <= slot.start {
        return Err(ValidationError::NonPositiveDuration {
            start: slot.start,
            end: slot.end,
        });
    }

    let conflict = intervals
        .iter()
        .filter(|other| Some(&other.id) != exclude)
        .find(|other| other.overlaps(slot.day, slot.start, slot.end));

    if let Some(conflicting) = conflict {
        return Err(ValidationError::OverlappingInterval {
            conflicting: conflicting.clone(),
        });
    }

    Ok(slot)
}

fn parse_field(value: &str, field: TimeField) -> Result<TimeOfDay, ValidationError> {
    TimeOfDay::parse_hh_mm(value).ok_or_else(|| ValidationError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

/// Pairs of ids whose intervals overlap, in collection order
pub fn find_overlaps(intervals: &[WorkingInterval]) -> Vec<(IntervalId, IntervalId)> {
    let mut overlaps = Vec::new();
    for (index, interval) in intervals.iter().enumerate() {
        for other in &intervals[index + 1..] {
            if interval.overlaps(other.day_of_week, other.start_time, other.end_time) {
                overlaps.push((interval.id.clone(), other.id.clone()));
            }
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::working_hours::models::DayOfWeek;

    fn interval(id: &str, day: DayOfWeek, start: &str, end: &str) -> WorkingInterval {
        WorkingInterval {
            id: IntervalId::from(id),
            day_of_week: day,
            start_time: TimeOfDay::parse_hh_mm(start).unwrap(),
            end_time: TimeOfDay::parse_hh_mm(end).unwrap(),
        }
    }

    fn monday_nine_to_five() -> Vec<WorkingInterval> {
        vec![interval("x", DayOfWeek::Monday, "09:00", "17:00")]
    }

    #[test]
    fn test_valid_draft_on_empty_collection() {
        let slot = validate(&Draft::default(), &[], None).unwrap();
        assert_eq!(slot.day, DayOfWeek::Monday);
        assert_eq!(slot.start.to_hh_mm(), "09:00");
        assert_eq!(slot.end.to_hh_mm(), "17:00");
    }

    #[test]
    fn test_invalid_times() {
        let draft = Draft::new(DayOfWeek::Monday, "9am", "17:00");
        assert_eq!(
            validate(&draft, &[], None),
            Err(ValidationError::InvalidTime {
                field: TimeField::Start,
                value: "9am".to_string(),
            })
        );

        let draft = Draft::new(DayOfWeek::Monday, "09:00", "");
        assert!(matches!(
            validate(&draft, &[], None),
            Err(ValidationError::InvalidTime {
                field: TimeField::End,
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_duration() {
        let same = Draft::new(DayOfWeek::Monday, "09:00", "09:00");
        assert!(matches!(
            validate(&same, &[], None),
            Err(ValidationError::NonPositiveDuration { .. })
        ));

        let backwards = Draft::new(DayOfWeek::Monday, "17:00", "09:00");
        assert!(matches!(
            validate(&backwards, &[], None),
            Err(ValidationError::NonPositiveDuration { .. })
        ));

        // One minute is the shortest accepted span
        let minute = Draft::new(DayOfWeek::Monday, "09:00", "09:01");
        assert!(validate(&minute, &[], None).is_ok());
    }

    #[test]
    fn test_overlap_cases() {
        let existing = monday_nine_to_five();

        for (start, end) in [
            ("10:00", "11:00"), // inside
            ("08:00", "09:30"), // crosses start
            ("16:30", "18:00"), // crosses end
            ("08:00", "18:00"), // contains
            ("09:00", "17:00"), // identical
        ] {
            let draft = Draft::new(DayOfWeek::Monday, start, end);
            match validate(&draft, &existing, None) {
                Err(ValidationError::OverlappingInterval { conflicting }) => {
                    assert_eq!(conflicting.id, IntervalId::from("x"));
                }
                other => panic!("{start}-{end} should overlap, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_touching_boundaries_do_not_overlap() {
        let existing = monday_nine_to_five();

        let before = Draft::new(DayOfWeek::Monday, "07:00", "09:00");
        assert!(validate(&before, &existing, None).is_ok());

        let after = Draft::new(DayOfWeek::Monday, "17:00", "19:00");
        assert!(validate(&after, &existing, None).is_ok());
    }

    #[test]
    fn test_other_days_never_conflict() {
        let existing = monday_nine_to_five();
        let draft = Draft::new(DayOfWeek::Tuesday, "10:00", "11:00");
        assert!(validate(&draft, &existing, None).is_ok());
    }

    #[test]
    fn test_excluded_interval_is_ignored() {
        let existing = monday_nine_to_five();
        let draft = Draft::new(DayOfWeek::Monday, "09:00", "17:00");
        let id = IntervalId::from("x");
        assert!(validate(&draft, &existing, Some(&id)).is_ok());

        let other = IntervalId::from("y");
        assert!(validate(&draft, &existing, Some(&other)).is_err());
    }

    #[test]
    fn test_find_overlaps() {
        let intervals = vec![
            interval("a", DayOfWeek::Monday, "09:00", "12:00"),
            interval("b", DayOfWeek::Monday, "11:00", "13:00"),
            interval("c", DayOfWeek::Monday, "13:00", "14:00"),
            interval("d", DayOfWeek::Tuesday, "09:00", "12:00"),
        ];
        assert_eq!(
            find_overlaps(&intervals),
            vec![(IntervalId::from("a"), IntervalId::from("b"))]
        );
    }
}
