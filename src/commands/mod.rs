use crate::components::working_hours::{
    DayOfWeek, DoctorSchedule, Draft, IntervalId, ManagerConfig, TimeOfDay, WorkingHoursManager,
};
use crate::db::ScheduleDb;
use crate::error::{command_error, AppResult, Error};
use rust_i18n::t;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

// Export submodules
pub mod hours;

pub use hours::execute;

/// A parsed editor command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    ShowDraft,
    Help,
    Save,
    Quit,
    Cancel,
    Submit,
    SetDay(DayOfWeek),
    SetStart(String),
    SetEnd(String),
    Add(Option<Draft>),
    Edit(Reference),
    Commit(Option<Draft>),
    Delete(Reference),
}

/// How the user points at an interval: its position in the list or its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// 1-based position in display order
    Position(usize),
    Id(IntervalId),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Position(n) => write!(f, "#{n}"),
            Reference::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> AppResult<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match verb.to_lowercase().as_str() {
        "list" | "ls" => no_args(Command::List, &args)?,
        "draft" => no_args(Command::ShowDraft, &args)?,
        "help" | "?" => no_args(Command::Help, &args)?,
        "save" => no_args(Command::Save, &args)?,
        "quit" | "exit" => no_args(Command::Quit, &args)?,
        "cancel" => no_args(Command::Cancel, &args)?,
        "submit" => no_args(Command::Submit, &args)?,
        "day" => Command::SetDay(parse_day(single_arg(verb, &args)?)?),
        "start" => Command::SetStart(normalize_time(single_arg(verb, &args)?)),
        "end" => Command::SetEnd(normalize_time(single_arg(verb, &args)?)),
        "add" => Command::Add(optional_draft(verb, &args)?),
        "commit" => Command::Commit(optional_draft(verb, &args)?),
        "edit" => Command::Edit(parse_reference(single_arg(verb, &args)?)?),
        "delete" | "rm" => Command::Delete(parse_reference(single_arg(verb, &args)?)?),
        other => return Err(command_error(&format!("Unknown command: {}", other))),
    };

    Ok(Some(command))
}

fn no_args(command: Command, args: &[&str]) -> AppResult<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(command_error(&format!("Unexpected arguments: {}", args.join(" "))))
    }
}

fn single_arg<'a>(verb: &str, args: &[&'a str]) -> AppResult<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(command_error(&format!("{} takes exactly one argument", verb))),
    }
}

fn optional_draft(verb: &str, args: &[&str]) -> AppResult<Option<Draft>> {
    match args {
        [] => Ok(None),
        [day, start, end] => Ok(Some(Draft::new(
            parse_day(day)?,
            normalize_time(start),
            normalize_time(end),
        ))),
        _ => Err(command_error(&format!(
            "{} takes either no arguments or <day> <start> <end>",
            verb
        ))),
    }
}

fn parse_day(input: &str) -> AppResult<DayOfWeek> {
    DayOfWeek::parse(input).ok_or_else(|| command_error(&format!("Unknown day: {}", input)))
}

fn parse_reference(input: &str) -> AppResult<Reference> {
    if input.chars().all(|c| c.is_ascii_digit()) {
        let position = input
            .parse::<usize>()
            .map_err(|_| command_error(&format!("Bad position: {}", input)))?;
        if position == 0 {
            return Err(command_error("Positions start at 1"));
        }
        return Ok(Reference::Position(position));
    }
    Ok(Reference::Id(IntervalId::from(input)))
}

/// Normalize a typed time to HH:MM, keeping the raw text when it can't be read
/// so validation reports it
fn normalize_time(input: &str) -> String {
    TimeOfDay::parse_lenient(input)
        .map(TimeOfDay::to_hh_mm)
        .unwrap_or_else(|| input.to_string())
}

/// Parse and run one input line, turning failures into printable lines
pub async fn respond(session: &mut EditorSession, line: &str) -> Reply {
    let result = match parse(line) {
        Ok(Some(command)) => execute(session, command).await,
        Ok(None) => Ok(Reply::default()),
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        debug!("Command {:?} failed: {:?}", line.trim(), e);
        Reply::line(t!("error_line", reason = error_reason(&e)))
    })
}

/// User-facing text for an error
pub fn error_reason(error: &Error) -> String {
    match error {
        Error::Schedule(e) => e.reason(),
        other => other.to_string(),
    }
}

/// Outcome of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: false,
        }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }

    pub fn quit(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            quit: true,
        }
    }
}

/// Type alias for command result
pub type CommandResult = AppResult<Reply>;

/// One doctor's working hours opened for editing
pub struct EditorSession {
    schedule: DoctorSchedule,
    manager: WorkingHoursManager,
    db: Arc<dyn ScheduleDb>,
    dirty: bool,
    quit_warned: bool,
}

impl fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorSession")
            .field("doctor", &self.schedule.doctor)
            .field("manager", &self.manager)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl EditorSession {
    /// Load a doctor's schedule (or start an empty one) and open it
    pub async fn open(
        doctor: &str,
        db: Arc<dyn ScheduleDb>,
        config: ManagerConfig,
    ) -> AppResult<Self> {
        let schedule = match db.get_schedule(doctor).await? {
            Some(schedule) => {
                info!(
                    "Loaded {} working intervals for {}",
                    schedule.working_hours.len(),
                    doctor
                );
                schedule
            }
            None => {
                info!("No stored schedule for {}, starting empty", doctor);
                DoctorSchedule::new(doctor)
            }
        };

        let manager = WorkingHoursManager::new(schedule.working_hours.clone(), config)?;

        Ok(Self {
            schedule,
            manager,
            db,
            dirty: false,
            quit_warned: false,
        })
    }

    /// Greeting printed when the session opens
    pub fn banner(&self) -> Vec<String> {
        let mut lines = vec![t!(
            "session_opened",
            doctor = self.doctor(),
            count = self.manager.intervals().len()
        )
        .to_string()];
        if self.manager.is_disabled() {
            lines.push(t!("read_only_notice").to_string());
        }
        lines
    }

    pub fn doctor(&self) -> &str {
        &self.schedule.doctor
    }

    pub fn manager(&self) -> &WorkingHoursManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut WorkingHoursManager {
        &mut self.manager
    }

    /// Whether the collection changed since it was loaded or saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.quit_warned = false;
    }

    /// Merge the manager's collection into the record and store it
    pub async fn save(&mut self) -> AppResult<usize> {
        let schedule = self
            .schedule
            .clone()
            .with_working_hours(self.manager.intervals().to_vec());
        self.db.set_schedule(&schedule.doctor, &schedule).await?;

        let count = schedule.working_hours.len();
        self.schedule = schedule;
        self.dirty = false;
        Ok(count)
    }
}
