//! Display order for a day's activities, with free-time gaps between the
//! extra-hour blocks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{Activity, DayConfiguration};
use crate::utils::time::{build_instant, instant_to_time};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineSection {
    BeforeEntry,
    WithinShift,
    AfterExit,
    /// The day has no labor window.
    FullDay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineEntry {
    Activity {
        section: TimelineSection,
        /// Position in the record's activity list, for edit and delete.
        index: usize,
        activity: Activity,
    },
    FreeTime {
        section: TimelineSection,
        start: String,
        end: String,
    },
}

impl TimelineEntry {
    pub fn section(&self) -> TimelineSection {
        match self {
            TimelineEntry::Activity { section, .. } | TimelineEntry::FreeTime { section, .. } => {
                *section
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            TimelineEntry::Activity { activity, .. } => activity.description.clone(),
            TimelineEntry::FreeTime { start, end, .. } => format!("free time: {start}–{end}"),
        }
    }
}

/// Absolute labor window of the day, when it has a genuine one.
fn labor_window(
    date: NaiveDate,
    config: &DayConfiguration,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    if config.has_same_entry_exit() {
        return None;
    }
    let bounds = config.bounds()?;
    let entry = build_instant(date, &config.entry_time, 0)?;
    let exit = build_instant(date, &config.exit_time, i64::from(bounds.crosses_midnight))?;
    Some((entry, exit))
}

fn sort_by_start(items: &mut [(usize, &Activity)]) {
    items.sort_by_key(|(index, activity)| {
        (activity.start_time.is_none(), activity.start_time, *index)
    });
}

fn push_with_gaps(
    out: &mut Vec<TimelineEntry>,
    section: TimelineSection,
    items: &[(usize, &Activity)],
) {
    let mut previous_end: Option<DateTime<Utc>> = None;
    for (index, activity) in items {
        if let (Some(prev_end), Some((start, end))) = (previous_end, activity.interval()) {
            if start > prev_end {
                out.push(TimelineEntry::FreeTime {
                    section,
                    start: instant_to_time(&prev_end),
                    end: instant_to_time(&start),
                });
            }
            previous_end = Some(prev_end.max(end));
        } else if let Some((_, end)) = activity.interval() {
            previous_end = Some(end);
        }
        push_activity(out, section, *index, activity);
    }
}

fn push_activity(
    out: &mut Vec<TimelineEntry>,
    section: TimelineSection,
    index: usize,
    activity: &Activity,
) {
    out.push(TimelineEntry::Activity {
        section,
        index,
        activity: activity.clone(),
    });
}

/// Gaps are only surfaced between time-bounded activities, so days without
/// any produce the plain sorted list.
pub fn build_timeline(
    date: NaiveDate,
    config: &DayConfiguration,
    activities: &[Activity],
) -> Vec<TimelineEntry> {
    let mut out = Vec::with_capacity(activities.len());
    let indexed: Vec<(usize, &Activity)> = activities.iter().enumerate().collect();

    let Some((entry, exit)) = labor_window(date, config) else {
        let mut all = indexed;
        sort_by_start(&mut all);
        push_with_gaps(&mut out, TimelineSection::FullDay, &all);
        return out;
    };

    let mut before = Vec::new();
    let mut within = Vec::new();
    let mut after = Vec::new();
    for (index, activity) in indexed {
        match activity.interval().filter(|_| activity.is_extra) {
            Some((_, end)) if end <= entry => before.push((index, activity)),
            Some((start, _)) if start >= exit => after.push((index, activity)),
            _ => within.push((index, activity)),
        }
    }
    sort_by_start(&mut before);
    sort_by_start(&mut within);
    sort_by_start(&mut after);

    push_with_gaps(&mut out, TimelineSection::BeforeEntry, &before);
    for (index, activity) in within {
        push_activity(&mut out, TimelineSection::WithinShift, index, activity);
    }
    push_with_gaps(&mut out, TimelineSection::AfterExit, &after);
    out
}
