//! Event documents, including the one multipart upload the console sends.

use {
    convene_protocol::{Operation, OperationDescriptor, OperationKind, Selection, Upload, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    Event, EventDocument, MutationOutcome, Nullable, Page, User, outcome_selection, page_selection,
};

/// `eventDocuments`: files attached to one event.
#[derive(Debug, Clone, Copy)]
pub struct EventDocuments {
    pub event_id: i64,
}

impl Operation for EventDocuments {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "eventDocuments";

    type Output = Page<EventDocument>;

    fn variables(&self) -> Variables {
        Variables::new().required("eventId", "Int", self.event_id)
    }

    fn selection(&self) -> Selection {
        page_selection(EventDocument::selection())
    }
}

/// `myDocuments`: documents across the signed-in user's events.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyDocuments;

impl Operation for MyDocuments {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "myDocuments";

    type Output = Page<EventDocument>;

    fn selection(&self) -> Selection {
        let results = EventDocument::selection()
            .nested("event", Event::plain_selection())
            .nested(
                "author",
                Selection::of(&["id", "email", "firstName", "middleName", "lastName", "avatar"]),
            );
        Selection::of(&["page", "total"]).nested("results", results)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDocumentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub event_document: Nullable<EventDocument>,
}

/// `createEventDocument`: attach a file to an event.
#[derive(Debug, Clone)]
pub struct CreateEventDocument {
    pub event_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub file: Upload,
}

impl Operation for CreateEventDocument {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createEventDocument";

    type Output = MutationOutcome<EventDocumentPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("eventId", "Int", self.event_id)
            .required("title", "String", self.title.as_str())
            .optional("description", "String", self.description.clone())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("eventDocument", EventDocument::selection()))
    }

    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::new(Self::NAME, Self::KIND)
            .with_variables(self.variables())
            .with_upload("file", self.file.clone())
            .with_selection(self.selection())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteEventDocument {
    pub id: i64,
}

impl Operation for DeleteEventDocument {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "deleteEventDocument";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

/// Shown in listings when a document's author is unknown.
pub fn author_label(author: Option<&User>) -> String {
    author
        .map(User::display_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::models::NullableExt, serde_json::json};

    fn minutes() -> CreateEventDocument {
        CreateEventDocument {
            event_id: 4,
            title: "Minutes".into(),
            description: None,
            file: Upload::new("minutes.pdf", b"%PDF-1.7".to_vec()),
        }
    }

    #[test]
    fn create_document_declares_upload_last() {
        let desc = minutes().descriptor();
        assert_eq!(
            desc.document(),
            "mutation ($eventId: Int!, $title: String!, $description: String, $file: Upload!) { createEventDocument(eventId: $eventId, title: $title, description: $description, file: $file) { success message eventDocument { id title description file created updated isActive } } }"
        );
        let request = desc.to_request();
        assert!(request.has_uploads());
        assert_eq!(request.variables["file"], serde_json::Value::Null);
    }

    #[test]
    fn my_documents_decode_with_event_and_author() {
        let page: Page<EventDocument> = serde_json::from_value(json!({
            "page": 1,
            "total": 1,
            "results": [{
                "id": 3,
                "title": "Minutes",
                "event": { "id": 4, "title": "Board" },
                "author": { "id": 7, "firstName": "Ada", "lastName": "Lovelace" }
            }]
        }))
        .unwrap();
        let doc = &page.results[0];
        assert_eq!(doc.event.value().unwrap().title.value().map(String::as_str), Some("Board"));
        assert_eq!(author_label(doc.author.value()), "Ada Lovelace");
        assert_eq!(author_label(None), "Unknown");
    }
}
