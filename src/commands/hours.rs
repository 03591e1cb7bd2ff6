use crate::commands::{Command, CommandResult, EditorSession, Reference, Reply};
use crate::components::working_hours::{EditState, IntervalId, WorkingHoursManager};
use crate::error::ScheduleError;
use rust_i18n::t;
use tracing::debug;

/// Run one command against the session
pub async fn execute(session: &mut EditorSession, command: Command) -> CommandResult {
    debug!("Executing {:?}", command);

    match command {
        Command::List => Ok(Reply::lines(list_lines(session))),
        Command::ShowDraft => {
            let manager = session.manager();
            let mut lines = vec![draft_line(manager)];
            if let Err(e) = manager.validate_draft() {
                lines.push(t!("draft_invalid", reason = e.reason()).to_string());
            }
            Ok(Reply::lines(lines))
        }
        Command::Help => Ok(Reply::lines(
            t!("help_text").lines().map(str::to_string).collect(),
        )),
        Command::SetDay(day) => {
            session.manager_mut().draft_mut().day = day;
            Ok(Reply::line(draft_line(session.manager())))
        }
        Command::SetStart(start) => {
            session.manager_mut().draft_mut().start = start;
            Ok(Reply::line(draft_line(session.manager())))
        }
        Command::SetEnd(end) => {
            session.manager_mut().draft_mut().end = end;
            Ok(Reply::line(draft_line(session.manager())))
        }
        Command::Add(draft) => {
            if let Some(draft) = draft {
                session.manager_mut().set_draft(draft);
            }
            let id = session.manager_mut().add()?;
            session.mark_dirty();
            Ok(Reply::line(t!("added", interval = describe(session, &id))))
        }
        Command::Commit(draft) => {
            if let Some(draft) = draft {
                session.manager_mut().set_draft(draft);
            }
            let id = session.manager_mut().commit_edit()?;
            session.mark_dirty();
            Ok(Reply::line(t!("updated", interval = describe(session, &id))))
        }
        Command::Submit => {
            let was_editing = session.manager().edit_state() != &EditState::Idle;
            let id = session.manager_mut().submit()?;
            session.mark_dirty();
            let interval = describe(session, &id);
            if was_editing {
                Ok(Reply::line(t!("updated", interval = interval)))
            } else {
                Ok(Reply::line(t!("added", interval = interval)))
            }
        }
        Command::Edit(reference) => {
            let id = resolve(session.manager(), &reference)?;
            if session.manager_mut().begin_edit(&id)? {
                Ok(Reply::line(t!("editing", interval = describe(session, &id))))
            } else {
                Err(ScheduleError::NotFound(reference.to_string()).into())
            }
        }
        Command::Cancel => {
            session.manager_mut().cancel_edit();
            Ok(Reply::line(t!("cancelled")))
        }
        Command::Delete(reference) => {
            let id = resolve(session.manager(), &reference)?;
            match session.manager_mut().delete(&id)? {
                Some(removed) => {
                    session.mark_dirty();
                    Ok(Reply::line(t!("deleted", interval = removed)))
                }
                None => Err(ScheduleError::NotFound(reference.to_string()).into()),
            }
        }
        Command::Save => {
            let count = session.save().await?;
            Ok(Reply::line(t!(
                "saved",
                count = count,
                doctor = session.doctor()
            )))
        }
        Command::Quit => {
            if session.is_dirty() && !session.quit_warned {
                session.quit_warned = true;
                return Ok(Reply::line(t!("unsaved_changes")));
            }
            Ok(Reply::quit(t!("goodbye")))
        }
    }
}

/// Find the id a reference points at
fn resolve(
    manager: &WorkingHoursManager,
    reference: &Reference,
) -> Result<IntervalId, ScheduleError> {
    let found = match reference {
        Reference::Position(position) => manager
            .display_order()
            .nth(position.saturating_sub(1))
            .map(|interval| interval.id.clone()),
        Reference::Id(id) => manager.find(id).map(|interval| interval.id.clone()),
    };
    found.ok_or_else(|| ScheduleError::NotFound(reference.to_string()))
}

fn describe(session: &EditorSession, id: &IntervalId) -> String {
    session
        .manager()
        .find(id)
        .map(ToString::to_string)
        .unwrap_or_else(|| id.to_string())
}

fn list_lines(session: &EditorSession) -> Vec<String> {
    let manager = session.manager();
    if manager.intervals().is_empty() {
        return vec![t!("list_empty").to_string()];
    }

    let editing = manager.edit_state().editing_id();
    let mut lines = vec![t!("list_header", doctor = session.doctor()).to_string()];
    for (index, interval) in manager.display_order().enumerate() {
        let marker = if Some(&interval.id) == editing { " *" } else { "" };
        lines.push(format!(
            "{:>3}. {:<12} {}  [{}]{}",
            index + 1,
            interval.day_of_week.name(),
            interval.format(),
            interval.id,
            marker
        ));
    }
    lines
}

fn draft_line(manager: &WorkingHoursManager) -> String {
    match manager.edit_state() {
        EditState::Idle => t!("draft_new", draft = manager.draft()).to_string(),
        EditState::Editing(id) => t!("draft_editing", id = id, draft = manager.draft()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::parse;
    use crate::components::working_hours::ManagerConfig;
    use crate::db::InMemoryDb;
    use std::sync::Arc;

    async fn session() -> EditorSession {
        EditorSession::open("Dr Test", Arc::new(InMemoryDb::default()), ManagerConfig::default())
            .await
            .unwrap()
    }

    async fn run(session: &mut EditorSession, line: &str) -> CommandResult {
        let command = parse(line)?.expect("command");
        execute(session, command).await
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let mut session = session().await;
        run(&mut session, "add tue 8 12").await.unwrap();
        run(&mut session, "add mon 9 17").await.unwrap();

        let reply = run(&mut session, "list").await.unwrap();
        assert_eq!(reply.lines.len(), 3);
        assert!(reply.lines[1].contains("09:00 - 17:00"));
        assert!(reply.lines[2].contains("08:00 - 12:00"));
        assert!(session.is_dirty());
    }

    #[tokio::test]
    async fn test_overlap_is_reported_as_error() {
        let mut session = session().await;
        run(&mut session, "add mon 9 17").await.unwrap();

        let err = run(&mut session, "add mon 10 11").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Schedule(ScheduleError::Validation(_))
        ));
        assert_eq!(session.manager().intervals().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_by_position_and_commit() {
        let mut session = session().await;
        run(&mut session, "add wed 9 17").await.unwrap();
        run(&mut session, "add mon 9 17").await.unwrap();

        // Position 1 is Monday in display order
        run(&mut session, "edit 1").await.unwrap();
        run(&mut session, "end 15").await.unwrap();
        run(&mut session, "commit").await.unwrap();

        let monday = session
            .manager()
            .display_order()
            .next()
            .unwrap()
            .clone();
        assert_eq!(monday.end_time.to_hh_mm(), "15:00");
        assert_eq!(session.manager().edit_state(), &EditState::Idle);
    }

    #[tokio::test]
    async fn test_draft_previews_validation() {
        let mut session = session().await;
        run(&mut session, "add mon 9 17").await.unwrap();

        let reply = run(&mut session, "draft").await.unwrap();
        assert_eq!(reply.lines.len(), 2);
        assert!(reply.lines[1].starts_with("  Not valid yet:"));

        run(&mut session, "day tue").await.unwrap();
        let reply = run(&mut session, "draft").await.unwrap();
        assert_eq!(reply.lines.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_reference() {
        let mut session = session().await;
        let err = run(&mut session, "delete 3").await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Schedule(ScheduleError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_quit_warns_once_about_unsaved_changes() {
        let mut session = session().await;
        run(&mut session, "add mon 9 17").await.unwrap();

        let first = run(&mut session, "quit").await.unwrap();
        assert!(!first.quit);
        let second = run(&mut session, "quit").await.unwrap();
        assert!(second.quit);
    }

    #[tokio::test]
    async fn test_save_clears_dirty_flag() {
        let mut session = session().await;
        run(&mut session, "add mon 9 17").await.unwrap();
        run(&mut session, "save").await.unwrap();
        assert!(!session.is_dirty());

        let reply = run(&mut session, "quit").await.unwrap();
        assert!(reply.quit);
    }
}
