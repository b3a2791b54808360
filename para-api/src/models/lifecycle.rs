//! Status-transition side effects
//!
//! Pure functions, independent of storage. The db layer computes the new
//! timestamp columns here before issuing an UPDATE, so every write path
//! (complete, defer, partial update, integration status change) applies
//! the same rules.

use chrono::{DateTime, Utc};

use super::{ActionStatus, PipelineStage, ProjectStatus};

/// `completed_at` for an action after a status transition.
///
/// Invariant maintained: `status = done ⇔ completed_at` is set.
/// - Entering `done` stamps `now` once; a repeat while already done keeps
///   the original stamp (idempotent complete).
/// - Leaving `done` clears the stamp, so a re-opened action can complete
///   again later with a fresh timestamp.
pub fn action_completed_at(
    new_status: ActionStatus,
    old_status: ActionStatus,
    old_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match new_status {
        ActionStatus::Done if old_status == ActionStatus::Done => old_completed_at.or(Some(now)),
        ActionStatus::Done => Some(now),
        _ => None,
    }
}

/// `completed_at` for a project after a status transition.
///
/// Stamped only on the transition into `completed`; repeated completes and
/// edits while completed never re-stamp. Unlike actions, the stamp is NOT
/// cleared when a project leaves `completed`; it records when the outcome
/// was first reached.
pub fn project_completed_at(
    new_status: ProjectStatus,
    old_status: ProjectStatus,
    old_completed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if new_status == ProjectStatus::Completed && old_status != ProjectStatus::Completed {
        Some(now)
    } else {
        old_completed_at
    }
}

/// `published_at` for an asset after a pipeline-stage change.
///
/// Stamped the first time the stage reaches `published`; sticky forever
/// after, including when the asset later leaves and re-enters `published`.
pub fn asset_published_at(
    new_stage: PipelineStage,
    old_stage: PipelineStage,
    old_published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if new_stage == PipelineStage::Published
        && old_stage != PipelineStage::Published
        && old_published_at.is_none()
    {
        Some(now)
    } else {
        old_published_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_action_complete_stamps_now() {
        let stamp = action_completed_at(ActionStatus::Done, ActionStatus::Next, None, t(100));
        assert_eq!(stamp, Some(t(100)));
    }

    #[test]
    fn test_action_complete_is_idempotent() {
        let stamp =
            action_completed_at(ActionStatus::Done, ActionStatus::Done, Some(t(100)), t(200));
        assert_eq!(stamp, Some(t(100)));
    }

    #[test]
    fn test_action_reopen_clears_stamp() {
        let stamp =
            action_completed_at(ActionStatus::Next, ActionStatus::Done, Some(t(100)), t(200));
        assert_eq!(stamp, None);
    }

    #[test]
    fn test_action_non_completion_edit_keeps_none() {
        let stamp =
            action_completed_at(ActionStatus::Waiting, ActionStatus::Next, None, t(200));
        assert_eq!(stamp, None);
    }

    #[test]
    fn test_project_complete_stamps_once() {
        let first =
            project_completed_at(ProjectStatus::Completed, ProjectStatus::Active, None, t(100));
        assert_eq!(first, Some(t(100)));

        // Second complete call is a no-op on the timestamp
        let second = project_completed_at(
            ProjectStatus::Completed,
            ProjectStatus::Completed,
            first,
            t(200),
        );
        assert_eq!(second, Some(t(100)));
    }

    #[test]
    fn test_project_leaving_completed_keeps_stamp() {
        let stamp = project_completed_at(
            ProjectStatus::Active,
            ProjectStatus::Completed,
            Some(t(100)),
            t(200),
        );
        assert_eq!(stamp, Some(t(100)));
    }

    #[test]
    fn test_project_non_completed_transitions_never_stamp() {
        for status in [
            ProjectStatus::Active,
            ProjectStatus::OnHold,
            ProjectStatus::Someday,
            ProjectStatus::Cancelled,
        ] {
            let stamp = project_completed_at(status, ProjectStatus::Active, None, t(100));
            assert_eq!(stamp, None);
        }
    }

    #[test]
    fn test_asset_publish_stamps_first_time() {
        let stamp = asset_published_at(
            PipelineStage::Published,
            PipelineStage::Review,
            None,
            t(100),
        );
        assert_eq!(stamp, Some(t(100)));
    }

    #[test]
    fn test_asset_publish_history_is_sticky() {
        // Leave published...
        let stamp = asset_published_at(
            PipelineStage::Review,
            PipelineStage::Published,
            Some(t(100)),
            t(200),
        );
        assert_eq!(stamp, Some(t(100)));

        // ...and re-enter: the original stamp survives
        let stamp = asset_published_at(
            PipelineStage::Published,
            PipelineStage::Review,
            stamp,
            t(300),
        );
        assert_eq!(stamp, Some(t(100)));
    }
}
