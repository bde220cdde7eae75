use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    MutationOutcome, Nullable, Page, PageQuery, User, outcome_selection, page_selection,
};

/// `users`: paginated user directory.
#[derive(Debug, Clone, Default)]
pub struct Users {
    pub query: PageQuery,
}

impl Operation for Users {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "users";

    type Output = Page<User>;

    fn variables(&self) -> Variables {
        self.query.apply(Variables::new())
    }

    fn selection(&self) -> Selection {
        page_selection(User::summary_selection().field("isActive"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub user: Nullable<User>,
}

/// `createUser`.
#[derive(Debug, Clone, Default)]
pub struct CreateUser {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department_ids: Vec<i64>,
    pub is_admin: Option<bool>,
    pub is_staff: Option<bool>,
}

impl Operation for CreateUser {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createUser";

    type Output = MutationOutcome<UserPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("firstName", "String", self.first_name.as_str())
            .required("middleName", "String", self.middle_name.as_str())
            .required("lastName", "String", self.last_name.as_str())
            .required("email", "String", self.email.trim())
            .required("phone", "String", self.phone.as_str())
            .required("departmentsIds", "[Int]", self.department_ids.clone())
            .optional("isAdmin", "Boolean", self.is_admin)
            .optional("isStaff", "Boolean", self.is_staff)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("user", User::selection()))
    }
}

fn id_variables(id: i64) -> Variables {
    Variables::new().required("id", "Int", id)
}

/// `blockUser`.
#[derive(Debug, Clone, Copy)]
pub struct BlockUser {
    pub id: i64,
}

impl Operation for BlockUser {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "blockUser";

    type Output = MutationOutcome<UserPayload>;

    fn variables(&self) -> Variables {
        id_variables(self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("user", Selection::of(&["id", "isActive"])))
    }
}

/// `unblockUser`.
#[derive(Debug, Clone, Copy)]
pub struct UnblockUser {
    pub id: i64,
}

impl Operation for UnblockUser {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "unblockUser";

    type Output = MutationOutcome<UserPayload>;

    fn variables(&self) -> Variables {
        id_variables(self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("user", Selection::of(&["id", "isActive"])))
    }
}

/// `deleteUser`.
#[derive(Debug, Clone, Copy)]
pub struct DeleteUser {
    pub id: i64,
}

impl Operation for DeleteUser {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "deleteUser";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        id_variables(self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

/// `createUserCredentials`.
#[derive(Debug, Clone, Copy)]
pub struct CreateUserCredentials {
    pub id: i64,
}

impl Operation for CreateUserCredentials {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createUserCredentials";

    type Output = MutationOutcome;

    fn variables(&self) -> Variables {
        id_variables(self.id)
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

/// `syncUsers`: pull users from the upstream directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncUsers;

impl Operation for SyncUsers {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "syncUsers";

    type Output = MutationOutcome;

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn users_without_query_sends_no_variables() {
        let desc = Users::default().descriptor();
        assert!(desc.variables.is_empty());
        assert_eq!(
            desc.document(),
            "query { users { total page pages results { id email phone firstName middleName lastName avatar isActive } } }"
        );
    }

    #[test]
    fn users_page_keeps_server_order() {
        let page: Page<User> = serde_json::from_value(json!({
            "total": 2,
            "page": 1,
            "results": [{ "id": 2 }, { "id": 1 }]
        }))
        .unwrap();
        let ids: Vec<i64> = page.results.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn create_user_declares_department_list() {
        let op = CreateUser {
            first_name: "Ada".into(),
            email: " ada@example.com ".into(),
            department_ids: vec![1, 4],
            ..CreateUser::default()
        };
        let desc = op.descriptor();
        assert!(desc.document().contains("$departmentsIds: [Int]!"));
        assert!(desc.document().contains("$isAdmin: Boolean,"));
        let vars = desc.variables.to_json();
        assert_eq!(vars["departmentsIds"], json!([1, 4]));
        assert_eq!(vars["email"], "ada@example.com");
        assert_eq!(vars["isStaff"], serde_json::Value::Null);
    }

    #[test]
    fn sync_users_renders_without_arguments() {
        assert_eq!(
            SyncUsers.descriptor().document(),
            "mutation { syncUsers { success message } }"
        );
    }
}
