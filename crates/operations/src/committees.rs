//! Committees and their membership.

use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    Committee, CommitteeMember, MutationOutcome, Nullable, Page, PageQuery, User, outcome_selection,
    page_selection,
};

/// `committees`: paginated committee listing.
#[derive(Debug, Clone, Default)]
pub struct Committees {
    pub query: PageQuery,
}

impl Operation for Committees {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "committees";

    type Output = Page<Committee>;

    fn variables(&self) -> Variables {
        self.query.apply(Variables::new())
    }

    fn selection(&self) -> Selection {
        page_selection(Committee::selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitteePayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub committee: Nullable<Committee>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateCommittee {
    pub name: String,
    pub description: String,
}

impl Operation for CreateCommittee {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createCommittee";

    type Output = MutationOutcome<CommitteePayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("name", "String", self.name.as_str())
            .required("description", "String", self.description.as_str())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("committee", Committee::selection()))
    }
}

// ── Membership ───────────────────────────────────────────────────────────────

/// `committeeMembers`: members of one committee.
#[derive(Debug, Clone, Copy)]
pub struct CommitteeMembers {
    pub committee_id: i64,
}

impl Operation for CommitteeMembers {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "committeeMembers";

    type Output = Page<CommitteeMember>;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.committee_id)
    }

    fn selection(&self) -> Selection {
        page_selection(CommitteeMember::selection())
    }
}

/// `notCommitteeMembers`: users that can still be added to a committee,
/// searchable by `key`.
#[derive(Debug, Clone, Default)]
pub struct NotCommitteeMembers {
    pub committee_id: i64,
    pub query: PageQuery,
}

impl Operation for NotCommitteeMembers {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "notCommitteeMembers";

    type Output = Page<User>;

    fn variables(&self) -> Variables {
        self.query
            .apply(Variables::new().required("id", "Int", self.committee_id))
    }

    fn selection(&self) -> Selection {
        page_selection(User::summary_selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeMemberPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub committee_member: Nullable<CommitteeMember>,
}

#[derive(Debug, Clone, Copy)]
pub struct AddCommitteeMember {
    pub committee_id: i64,
    pub user_id: i64,
}

impl Operation for AddCommitteeMember {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "addCommitteeMember";

    type Output = MutationOutcome<CommitteeMemberPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("committeeId", "Int", self.committee_id)
            .required("userId", "Int", self.user_id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("committeeMember", CommitteeMember::selection()))
    }
}

/// `deleteCommitteeMember`: `id` is the membership id, not the user id.
#[derive(Debug, Clone, Copy)]
pub struct DeleteCommitteeMember {
    pub id: i64,
}

impl Operation for DeleteCommitteeMember {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "deleteCommitteeMember";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        Variables::new().required("id", "Int", self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}
