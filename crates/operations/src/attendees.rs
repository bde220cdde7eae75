use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    EventAttendee, MutationOutcome, Nullable, Page, User, outcome_selection, page_selection,
};

/// `eventAttendees`: who is invited to an event.
#[derive(Debug, Clone, Copy)]
pub struct EventAttendees {
    pub event_id: i64,
}

impl Operation for EventAttendees {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "eventAttendees";

    type Output = Page<EventAttendee>;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.event_id)
    }

    fn selection(&self) -> Selection {
        page_selection(EventAttendee::selection())
    }
}

/// `eventAttendeesToAdd`: users not yet invited, optionally narrowed to
/// some departments.
#[derive(Debug, Clone, Default)]
pub struct EventAttendeesToAdd {
    pub event_id: i64,
    pub department_ids: Option<Vec<i64>>,
}

impl Operation for EventAttendeesToAdd {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "eventAttendeesToAdd";

    type Output = Page<User>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("eventId", "Int", self.event_id)
            .optional("departmentIds", "[Int]", self.department_ids.clone())
    }

    fn selection(&self) -> Selection {
        page_selection(User::summary_selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttendeePayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event_attendee: Nullable<EventAttendee>,
}

#[derive(Debug, Clone, Copy)]
pub struct AddEventAttendee {
    pub event_id: i64,
    pub attendee_id: i64,
}

impl Operation for AddEventAttendee {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "addEventAttendee";

    type Output = MutationOutcome<EventAttendeePayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("eventId", "Int", self.event_id)
            .required("attendeeId", "Int", self.attendee_id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("eventAttendee", EventAttendee::selection()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RemoveEventAttendee {
    pub event_id: i64,
    pub attendee_id: i64,
}

impl Operation for RemoveEventAttendee {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "removeEventAttendee";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("eventId", "Int", self.event_id)
            .required("attendeeId", "Int", self.attendee_id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}
