use {
    convene_protocol::{Operation, OperationKind, Selection},
    serde::{Deserialize, Serialize},
    serde_json::{Map, Value},
    serde_with::rust::double_option,
};

use crate::models::{JsonData, Nullable, data_selection};

/// Dashboard counters. The backend sends these snake_cased inside the
/// `data` JSON scalar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub total_users: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub total_departments: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub total_committees: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub total_events: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub total_venues: Nullable<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `analytics`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Analytics;

impl Operation for Analytics {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "analytics";

    type Output = JsonData<AnalyticsSummary>;

    fn selection(&self) -> Selection {
        data_selection()
    }
}
