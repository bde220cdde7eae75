use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    EventAgenda, MutationOutcome, Nullable, Page, outcome_selection, page_selection,
};

/// `eventAgendas`: agenda items of one event.
#[derive(Debug, Clone, Copy)]
pub struct EventAgendas {
    pub event_id: i64,
}

impl Operation for EventAgendas {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "eventAgendas";

    type Output = Page<EventAgenda>;

    fn variables(&self) -> Variables {
        Variables::new().required("eventId", "Int", self.event_id)
    }

    fn selection(&self) -> Selection {
        page_selection(EventAgenda::selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAgendaPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event_agenda: Nullable<EventAgenda>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateEventAgenda {
    pub event_id: i64,
    pub title: String,
}

impl Operation for CreateEventAgenda {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createEventAgenda";

    type Output = MutationOutcome<EventAgendaPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("eventId", "Int", self.event_id)
            .required("title", "String", self.title.as_str())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("eventAgenda", EventAgenda::selection()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEventAgenda {
    pub id: i64,
}

impl Operation for DeleteEventAgenda {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "deleteEventAgenda";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::models::NullableExt, serde_json::json};

    #[test]
    fn agendas_are_keyed_by_event() {
        assert_eq!(
            EventAgendas { event_id: 8 }.descriptor().document(),
            "query ($eventId: Int!) { eventAgendas(eventId: $eventId) { total page pages results { id title description created updated isActive } } }"
        );
    }

    #[test]
    fn create_agenda_decodes_created_item() {
        let out: MutationOutcome<EventAgendaPayload> = serde_json::from_value(json!({
            "success": true,
            "message": "Agenda added",
            "eventAgenda": { "id": 14, "title": "Budget review" }
        }))
        .unwrap();
        assert_eq!(out.payload.event_agenda.value().unwrap().id, 14);
    }

    #[test]
    fn delete_agenda_rejection_keeps_message() {
        let out: MutationOutcome = serde_json::from_value(json!({
            "success": false,
            "message": "Agenda not found"
        }))
        .unwrap();
        assert!(!out.success);
        assert_eq!(out.message_or("Request failed"), "Agenda not found");
    }
}
