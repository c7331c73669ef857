mod support;

use support::{
    extra_activity, extra_draft, harness, monday, normal_activity, normal_draft, policy, record,
};
use timesheet_core::{
    error::{AppError, ValidationError},
    services::{FieldChange, NotificationKind, Phase, TimelineSection},
};

#[tokio::test]
async fn fixed_schedule_loads_policy_window_and_keeps_hours_when_continuous() {
    let mut h = harness(policy("H1", "07:00", "19:00"), None);
    h.service.load_day(monday()).await.expect("load day");

    assert_eq!(h.service.form().entry_time, "07:00");
    assert_eq!(h.service.form().exit_time, "19:00");
    assert_eq!(h.service.metrics().normal_hours_expected, 11.0);

    h.service
        .change_field(FieldChange::ContinuousShift(true))
        .expect("toggle continuous");
    assert_eq!(h.service.form().exit_time, "18:00");
    assert_eq!(h.service.metrics().normal_hours_expected, 11.0);
}

#[tokio::test]
async fn overlapping_extra_is_rejected_and_after_exit_extra_is_saved() {
    let existing = record(
        monday(),
        "07:00",
        "19:00",
        vec![extra_activity(monday(), "08:00", "09:00")],
    );
    let mut h = harness(policy("DEFAULT", "07:00", "19:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    let err = h
        .service
        .submit_activity(extra_draft("08:30", "09:30"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ValidationError::Overlap)));
    assert_eq!(h.store.replacements(), 0);

    let saved = h
        .service
        .submit_activity(extra_draft("19:30", "20:30"), None)
        .await
        .expect("extra after exit");
    assert_eq!(saved.activities.len(), 2);
    assert_eq!(saved.activities[1].duration_hours, 1.0);
    assert_eq!(h.store.replacements(), 1);
    assert_eq!(h.service.metrics().worked_extra_hours, 2.0);
}

#[tokio::test]
async fn extra_inside_labor_window_is_rejected() {
    let mut h = harness(policy("DEFAULT", "07:00", "19:00"), None);
    h.service.load_day(monday()).await.expect("load day");

    let err = h
        .service
        .submit_activity(extra_draft("18:00", "20:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InsideLaborWindow)
    ));
    assert_eq!(
        h.service.notification().map(|n| n.kind),
        Some(NotificationKind::Error)
    );
}

#[tokio::test]
async fn extra_may_run_until_end_of_day() {
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), None);
    h.service.load_day(monday()).await.expect("load day");

    let saved = h
        .service
        .submit_activity(extra_draft("22:00", "24:00"), None)
        .await
        .expect("extra until midnight");
    assert_eq!(saved.activities[0].duration_hours, 2.0);
}

#[tokio::test]
async fn extra_cannot_start_at_end_of_day() {
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), None);
    h.service.load_day(monday()).await.expect("load day");

    let err = h
        .service
        .submit_activity(extra_draft("24:00", "01:00"), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::InvalidTime {
            field: "start_time",
            ..
        })
    ));
    assert_eq!(h.store.replacements(), 0);
}

#[tokio::test]
async fn saved_after_exit_extra_blocks_later_day_saves() {
    let existing = record(
        monday(),
        "07:00",
        "19:00",
        vec![extra_activity(monday(), "19:30", "20:30")],
    );
    let mut h = harness(policy("DEFAULT", "07:00", "19:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    h.service
        .change_field(FieldChange::EmployeeComment("late".into()))
        .expect("edit comment");
    let err = h.service.submit_day_configuration().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ActivitiesOutsideRange { count: 1 })
    ));
    assert_eq!(h.store.replacements(), 0);
}

#[tokio::test]
async fn moving_entry_past_timed_activities_blocks_day_save() {
    let existing = record(
        monday(),
        "07:00",
        "19:00",
        vec![
            normal_activity(4.0),
            extra_activity(monday(), "06:30", "08:00"),
        ],
    );
    let mut h = harness(policy("DEFAULT", "07:00", "19:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    h.service
        .change_field(FieldChange::EntryTime("08:00".into()))
        .expect("edit entry");
    let err = h.service.submit_day_configuration().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ActivitiesOutsideRange { count: 1 })
    ));
    assert_eq!(
        h.service.notification().map(|n| n.message.as_str()),
        Some("1 activities are outside the new range; fix them first")
    );
    assert_eq!(h.store.replacements(), 0);
    assert!(h.service.metrics().has_unsaved_day_config_changes);
}

#[tokio::test]
async fn normal_hours_gate_and_allowance() {
    let existing = record(monday(), "08:00", "17:00", vec![normal_activity(5.0)]);
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    let metrics = h.service.metrics();
    assert_eq!(metrics.normal_hours_expected, 8.0);
    assert!(!metrics.can_enter_extra_hours);
    assert_eq!(metrics.remaining_normal_hours, 3.0);

    let err = h
        .service
        .submit_activity(normal_draft(4.0), None)
        .await
        .unwrap_err();
    match err {
        AppError::Validation(ValidationError::ExceedsAvailableHours {
            requested,
            available,
        }) => {
            assert_eq!(requested, 4.0);
            assert_eq!(available, 3.0);
        }
        other => panic!("unexpected {other:?}"),
    }

    h.service
        .submit_activity(normal_draft(3.0), None)
        .await
        .expect("fill remaining hours");
    let metrics = h.service.metrics();
    assert!(metrics.can_enter_extra_hours);
    assert!(metrics.is_normal_hours_complete);
    assert_eq!(metrics.progress_percentage, 100.0);
    assert_eq!(metrics.exceeded_hours, 0.0);

    let err = h
        .service
        .submit_activity(normal_draft(1.0), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NormalHoursExhausted)
    ));
}

#[tokio::test]
async fn editing_a_normal_activity_adds_its_hours_back() {
    let existing = record(monday(), "08:00", "17:00", vec![normal_activity(8.0)]);
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    let saved = h
        .service
        .submit_activity(normal_draft(6.5), Some(0))
        .await
        .expect("edit in place");
    assert_eq!(saved.activities.len(), 1);
    assert_eq!(saved.activities[0].duration_hours, 6.5);
}

#[tokio::test]
async fn exceeded_hours_are_reported_for_overlogged_days() {
    let existing = record(monday(), "08:00", "17:00", vec![normal_activity(9.0)]);
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    let metrics = h.service.metrics();
    assert_eq!(metrics.exceeded_hours, 1.0);
    assert!(metrics.has_exceeded_normal_hours);
    assert!(metrics.is_day_record_persisted);
    assert!(!metrics.has_unsaved_day_config_changes);
}

#[tokio::test]
async fn disability_leave_blocks_new_activities_but_not_deletes() {
    let existing = record(monday(), "07:00", "19:00", vec![normal_activity(2.0)]);
    let mut h = harness(policy("H1", "07:00", "19:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    h.service
        .change_field(FieldChange::DisabilityLeave(true))
        .expect("set disability leave");
    assert!(!h.service.can_edit_activities());
    assert!(h.service.can_delete_activities());
    assert_eq!(h.service.metrics().normal_hours_expected, 0.0);

    let err = h
        .service
        .submit_activity(normal_draft(1.0), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::DisabilityLeaveActive)
    ));

    let saved = h.service.delete_activity(0).await.expect("delete activity");
    assert!(saved.activities.is_empty());
    assert!(saved.is_disability_leave);
}

#[tokio::test]
async fn non_working_day_survives_save_but_never_reaches_the_store() {
    let mut h = harness(policy("H1_1", "07:00", "16:00"), None);
    h.service.load_day(monday()).await.expect("load day");

    h.service
        .change_field(FieldChange::NonWorkingDay(true))
        .expect("mark non-working");
    assert_eq!(h.service.metrics().normal_hours_expected, 0.0);

    let saved = h
        .service
        .submit_day_configuration()
        .await
        .expect("save non-working day");
    assert!(!saved.is_rest_day);
    assert_eq!(saved.entry_timestamp, saved.exit_timestamp);
    assert!(h.service.form().is_non_working_day);

    let json = serde_json::to_value(h.service.form()).unwrap();
    assert!(json.get("is_non_working_day").is_none());
}

#[tokio::test]
async fn failed_load_can_be_retried() {
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), None);
    h.store.set_failing(true);

    assert!(h.service.load_day(monday()).await.is_err());
    assert_eq!(h.service.phase(), Phase::Ready);
    assert!(h.service.policy().is_none());
    assert_eq!(
        h.service.notification().map(|n| n.kind),
        Some(NotificationKind::Error)
    );

    h.store.set_failing(false);
    h.service.load_day(monday()).await.expect("retry load");
    assert!(h.service.notification().is_none());
    assert_eq!(h.service.form().entry_time, "08:00");
}

#[tokio::test]
async fn failed_load_leaves_no_day_to_edit_or_save() {
    let existing = record(
        monday(),
        "07:00",
        "19:00",
        vec![normal_activity(4.0), normal_activity(3.0)],
    );
    let mut h = harness(policy("H1", "07:00", "19:00"), Some(existing));
    h.store.set_failing(true);
    assert!(h.service.load_day(monday()).await.is_err());
    h.store.set_failing(false);

    assert_eq!(h.service.date(), None);
    assert!(matches!(
        h.service.change_field(FieldChange::EntryTime("09:00".into())),
        Err(AppError::NotLoaded)
    ));
    assert!(matches!(
        h.service.submit_day_configuration().await,
        Err(AppError::NotLoaded)
    ));
    assert!(matches!(
        h.service.submit_activity(normal_draft(1.0), None).await,
        Err(AppError::NotLoaded)
    ));
    assert!(matches!(
        h.service.delete_activity(0).await,
        Err(AppError::NotLoaded)
    ));

    let stored = h.store.record(None, monday()).expect("record kept");
    assert_eq!(stored.activities.len(), 2);
    assert_eq!(h.store.replacements(), 0);
}

#[tokio::test]
async fn failed_save_leaves_state_untouched() {
    let existing = record(monday(), "08:00", "17:00", vec![normal_activity(2.0)]);
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");
    h.store.set_failing(true);

    let err = h
        .service
        .submit_activity(normal_draft(1.0), None)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "REQUEST_FAILED");
    assert_eq!(h.service.activities().len(), 1);
    assert_eq!(h.service.phase(), Phase::Ready);
}

#[tokio::test]
async fn timeline_places_saved_extras_around_the_shift() {
    let existing = record(
        monday(),
        "08:00",
        "17:00",
        vec![
            normal_activity(8.0),
            extra_activity(monday(), "18:00", "19:00"),
            extra_activity(monday(), "20:00", "21:00"),
        ],
    );
    let mut h = harness(policy("DEFAULT", "08:00", "17:00"), Some(existing));
    h.service.load_day(monday()).await.expect("load day");

    let timeline = h.service.timeline();
    let sections: Vec<TimelineSection> = timeline.iter().map(|e| e.section()).collect();
    assert_eq!(
        sections,
        [
            TimelineSection::WithinShift,
            TimelineSection::AfterExit,
            TimelineSection::AfterExit,
            TimelineSection::AfterExit,
        ]
    );
    assert_eq!(timeline[2].label(), "free time: 19:00–20:00");
}
