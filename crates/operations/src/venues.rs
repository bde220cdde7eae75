use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    JsonData, MutationOutcome, Nullable, Page, PageQuery, Venue, data_selection, outcome_selection,
    page_selection,
};

/// `venues`: paginated venue listing.
#[derive(Debug, Clone, Default)]
pub struct Venues {
    pub query: PageQuery,
}

impl Operation for Venues {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "venues";

    type Output = Page<Venue>;

    fn variables(&self) -> Variables {
        self.query.apply(Variables::new())
    }

    fn selection(&self) -> Selection {
        page_selection(Venue::selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenuePayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub venue: Nullable<Venue>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateVenue {
    pub name: String,
    pub description: String,
    pub venue_type: String,
    pub capacity: i64,
}

impl Operation for CreateVenue {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createVenue";

    type Output = MutationOutcome<VenuePayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("name", "String", self.name.as_str())
            .required("description", "String", self.description.as_str())
            .required("venueType", "String", self.venue_type.as_str())
            .required("capacity", "Int", self.capacity)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("venue", Venue::selection()))
    }
}

/// `venueTypes`: the backend's venue type choices as a JSON scalar.
#[derive(Debug, Clone, Copy, Default)]
pub struct VenueTypes;

impl Operation for VenueTypes {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "venueTypes";

    type Output = JsonData;

    fn selection(&self) -> Selection {
        data_selection()
    }
}
