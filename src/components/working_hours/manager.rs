use super::models::{Draft, EditState, IntervalId, Slot, WorkingInterval};
use super::validation::{check_slot, find_overlaps, parse_draft, validate};
use crate::error::{ScheduleError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Settings the host passes into the manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Reject every mutating operation
    pub disabled: bool,
    /// Values the form resets to after a commit or cancel
    pub default_draft: Draft,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            default_draft: Draft::default(),
        }
    }
}

/// Add/edit/delete session over a doctor's weekly working hours
#[derive(Debug, Clone)]
pub struct WorkingHoursManager {
    intervals: Vec<WorkingInterval>,
    edit_state: EditState,
    draft: Draft,
    config: ManagerConfig,
}

impl WorkingHoursManager {
    /// Create a manager over the host's collection.
    ///
    /// Duplicate ids and intervals that end before they start are rejected.
    /// Overlaps in host data are only logged.
    pub fn new(
        intervals: Vec<WorkingInterval>,
        config: ManagerConfig,
    ) -> Result<Self, ScheduleError> {
        let mut seen = HashSet::new();
        for interval in &intervals {
            if !seen.insert(&interval.id) {
                return Err(ScheduleError::DuplicateId(interval.id.clone()));
            }
            if interval.end_time <= interval.start_time {
                return Err(ScheduleError::NonPositiveInterval(interval.clone()));
            }
        }

        for (first, second) in find_overlaps(&intervals) {
            warn!("Working intervals {} and {} overlap", first, second);
        }

        Ok(Self {
            intervals,
            edit_state: EditState::Idle,
            draft: config.default_draft.clone(),
            config,
        })
    }

    /// Create an empty manager with default settings
    pub fn empty() -> Self {
        Self {
            intervals: Vec::new(),
            edit_state: EditState::Idle,
            draft: Draft::default(),
            config: ManagerConfig::default(),
        }
    }

    /// The canonical collection, in insertion order
    pub fn intervals(&self) -> &[WorkingInterval] {
        &self.intervals
    }

    /// Hand the collection back to the host
    pub fn into_intervals(self) -> Vec<WorkingInterval> {
        self.intervals
    }

    pub fn find(&self, id: &IntervalId) -> Option<&WorkingInterval> {
        self.intervals.iter().find(|interval| &interval.id == id)
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit_state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Form fields, for the host to update as the user types
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: Draft) {
        self.draft = draft;
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
    }

    /// Intervals sorted by day, then start time. Recomputed on every call.
    pub fn display_order(&self) -> impl Iterator<Item = &WorkingInterval> + Clone + '_ {
        let mut sorted: Vec<&WorkingInterval> = self.intervals.iter().collect();
        sorted.sort_by_key(|interval| (interval.day_of_week, interval.start_time));
        sorted.into_iter()
    }

    /// Validate the current draft without touching any state.
    ///
    /// While editing, fields left at their loaded minute keep the stored seconds.
    pub fn validate_draft(&self) -> Result<Slot, ValidationError> {
        let editing = self.edit_state.editing_id();
        let mut slot = parse_draft(&self.draft)?;
        if let Some(target) = editing.and_then(|id| self.find(id)) {
            slot = slot.keep_precision_of(target);
        }
        check_slot(slot, &self.intervals, editing)
    }

    /// Append the draft as a new interval
    pub fn add(&mut self) -> Result<IntervalId, ScheduleError> {
        self.ensure_enabled("add")?;

        let slot = validate(&self.draft, &self.intervals, None).inspect_err(|e| {
            debug!("Rejected new interval {}: {}", self.draft, e);
        })?;

        let interval = WorkingInterval::new(slot.day, slot.start, slot.end);
        let id = interval.id.clone();
        debug!("Added working interval {} ({})", id, interval);

        self.intervals.push(interval);
        self.reset();
        Ok(id)
    }

    /// Load an interval into the draft and start editing it.
    ///
    /// Returns `Ok(false)` without changing anything when the id is unknown.
    pub fn begin_edit(&mut self, id: &IntervalId) -> Result<bool, ScheduleError> {
        self.ensure_enabled("begin edit")?;

        let Some(draft) = self.find(id).map(Draft::from_interval) else {
            debug!("No working interval {} to edit", id);
            return Ok(false);
        };

        self.draft = draft;
        if let EditState::Editing(previous) = &self.edit_state {
            if previous != id {
                debug!("Discarding unsaved edit of {}", previous);
            }
        }
        self.edit_state = EditState::Editing(id.clone());
        debug!("Editing working interval {}", id);
        Ok(true)
    }

    /// Replace the interval under edit with the draft
    pub fn commit_edit(&mut self) -> Result<IntervalId, ScheduleError> {
        self.ensure_enabled("commit edit")?;

        let EditState::Editing(id) = &self.edit_state else {
            return Err(ScheduleError::NotEditing);
        };
        let id = id.clone();

        let slot = self.validate_draft().inspect_err(|e| {
            debug!("Rejected edit of {}: {}", id, e);
        })?;

        if let Some(interval) = self.intervals.iter_mut().find(|interval| interval.id == id) {
            interval.day_of_week = slot.day;
            interval.start_time = slot.start;
            interval.end_time = slot.end;
            debug!("Updated working interval {} ({})", id, interval);
        }

        self.reset();
        Ok(id)
    }

    /// Add when idle, commit when editing
    pub fn submit(&mut self) -> Result<IntervalId, ScheduleError> {
        if self.edit_state.editing_id().is_some() {
            self.commit_edit()
        } else {
            self.add()
        }
    }

    /// Drop the draft and return to idle
    pub fn cancel_edit(&mut self) {
        if let Some(id) = self.edit_state.editing_id() {
            debug!("Cancelled edit of {}", id);
        }
        self.reset();
    }

    /// Remove an interval. Deleting the interval under edit ends the edit.
    pub fn delete(&mut self, id: &IntervalId) -> Result<Option<WorkingInterval>, ScheduleError> {
        self.ensure_enabled("delete")?;

        let Some(position) = self.intervals.iter().position(|interval| &interval.id == id) else {
            debug!("No working interval {} to delete", id);
            return Ok(None);
        };

        let removed = self.intervals.remove(position);
        debug!("Deleted working interval {} ({})", id, removed);

        if self.edit_state.editing_id() == Some(id) {
            self.reset();
        }

        Ok(Some(removed))
    }

    fn reset(&mut self) {
        self.draft = self.config.default_draft.clone();
        self.edit_state = EditState::Idle;
    }

    fn ensure_enabled(&self, operation: &str) -> Result<(), ScheduleError> {
        if self.config.disabled {
            debug!("Ignoring {} while working hours are read-only", operation);
            return Err(ScheduleError::Disabled);
        }
        Ok(())
    }
}

impl Default for WorkingHoursManager {
    fn default() -> Self {
        Self::empty()
    }
}
