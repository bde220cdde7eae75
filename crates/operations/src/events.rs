//! Events, the dashboard's calendar views and event type choices.

use std::fmt;

use {
    chrono::NaiveDate,
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    Event, JsonData, MutationOutcome, Nullable, Page, PageQuery, User, data_selection,
    outcome_selection, page_selection,
};

/// Wire format of the `fetchDate` argument.
pub const FETCH_DATE_FORMAT: &str = "%Y-%m-%d";

/// `myEvents`: events the signed-in user authored or attends.
#[derive(Debug, Clone, Default)]
pub struct MyEvents {
    pub query: PageQuery,
}

impl Operation for MyEvents {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "myEvents";

    type Output = Page<Event>;

    fn variables(&self) -> Variables {
        self.query.apply(Variables::new())
    }

    fn selection(&self) -> Selection {
        page_selection(Event::selection())
    }
}

/// `myTodaysEvents`: today's events for the dashboard.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyTodaysEvents;

impl Operation for MyTodaysEvents {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "myTodaysEvents";

    type Output = Page<Event>;

    fn selection(&self) -> Selection {
        let results = Event::plain_selection()
            .nested("author", User::summary_selection())
            .nested("venue", Selection::of(&["id", "name", "description", "capacity"]));
        Selection::of(&["page", "total"]).nested("results", results)
    }
}

/// `event`: one event by id.
#[derive(Debug, Clone, Copy)]
pub struct EventById {
    pub id: i64,
}

impl Operation for EventById {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "event";

    type Output = Event;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.id)
    }

    fn selection(&self) -> Selection {
        Event::selection()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event: Nullable<Event>,
}

/// `createEvent`. Times are passed through as the backend expects them.
#[derive(Debug, Clone, Default)]
pub struct CreateEvent {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub venue_id: i64,
    pub committees: Option<Vec<i64>>,
    pub departments: Option<Vec<i64>>,
}

impl Operation for CreateEvent {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createEvent";

    type Output = MutationOutcome<EventPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("title", "String", self.title.as_str())
            .required("description", "String", self.description.as_str())
            .required("startTime", "String", self.start_time.as_str())
            .required("endTime", "String", self.end_time.as_str())
            .required("venueId", "Int", self.venue_id)
            .optional("committees", "[Int]", self.committees.clone())
            .optional("departments", "[Int]", self.departments.clone())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("event", Event::selection()))
    }
}

/// `eventTypes`: event type choices as a JSON scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventTypes;

impl Operation for EventTypes {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "eventTypes";

    type Output = JsonData;

    fn selection(&self) -> Selection {
        data_selection()
    }
}

// ── Timeline ─────────────────────────────────────────────────────────────────

/// Calendar granularity for [`Timeline`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimelineMode {
    #[default]
    Month,
    Year,
}

impl TimelineMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(format!("unknown timeline mode: {other}")),
        }
    }
}

/// `timeline`: event counts around `fetch_date`, as a JSON scalar.
#[derive(Debug, Clone, Copy)]
pub struct Timeline {
    pub fetch_date: NaiveDate,
    pub mode: TimelineMode,
}

impl Operation for Timeline {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "timeline";

    type Output = JsonData;

    fn variables(&self) -> Variables {
        Variables::new()
            .required(
                "fetchDate",
                "String",
                self.fetch_date.format(FETCH_DATE_FORMAT).to_string(),
            )
            .required("mode", "String", self.mode.as_str())
    }

    fn selection(&self) -> Selection {
        data_selection()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, rstest::rstest, serde_json::json};

    #[test]
    fn timeline_formats_date_and_mode() {
        let op = Timeline {
            fetch_date: NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
            mode: TimelineMode::Year,
        };
        assert_eq!(
            op.descriptor().document(),
            "query ($fetchDate: String!, $mode: String!) { timeline(fetchDate: $fetchDate, mode: $mode) { data } }"
        );
        let vars = op.variables().to_json();
        assert_eq!(vars["fetchDate"], "2024-03-07");
        assert_eq!(vars["mode"], "year");
    }

    #[rstest]
    #[case("month", Some(TimelineMode::Month))]
    #[case("year", Some(TimelineMode::Year))]
    #[case("week", None)]
    fn timeline_mode_parses(#[case] input: &str, #[case] expected: Option<TimelineMode>) {
        assert_eq!(input.parse::<TimelineMode>().ok(), expected);
    }

    #[test]
    fn create_event_sends_null_for_unset_lists() {
        let op = CreateEvent {
            title: "Board".into(),
            venue_id: 2,
            departments: Some(vec![1]),
            ..CreateEvent::default()
        };
        let vars = op.variables().to_json();
        assert_eq!(vars["committees"], serde_json::Value::Null);
        assert_eq!(vars["departments"], json!([1]));
        assert!(op.descriptor().document().contains("$committees: [Int], $departments: [Int]"));
    }

    #[test]
    fn todays_events_has_no_pages_field() {
        let sel = MyTodaysEvents.selection().to_string();
        assert!(sel.starts_with("{ page total results { id title"));
        assert!(sel.contains("venue { id name description capacity }"));
    }
}
