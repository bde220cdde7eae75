use {
    convene_protocol::{Operation, OperationKind, Selection, Variables},
    serde::{Deserialize, Serialize},
    serde_with::rust::double_option,
};

use crate::models::{
    Department, MutationOutcome, Nullable, Page, PageQuery, outcome_selection, page_selection,
};

/// `departments`: paginated department listing.
#[derive(Debug, Clone, Default)]
pub struct Departments {
    pub query: PageQuery,
}

impl Operation for Departments {
    const KIND: OperationKind = OperationKind::Read;
    const NAME: &'static str = "departments";

    type Output = Page<Department>;

    fn variables(&self) -> Variables {
        self.query.apply(Variables::new())
    }

    fn selection(&self) -> Selection {
        page_selection(Department::selection())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPayload {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub department: Nullable<Department>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateDepartment {
    pub name: String,
    pub description: String,
}

impl Operation for CreateDepartment {
    const KIND: OperationKind = OperationKind::Write;
    const NAME: &'static str = "createDepartment";

    type Output = MutationOutcome<DepartmentPayload>;

    fn variables(&self) -> Variables {
        Variables::new()
            .required("name", "String", self.name.as_str())
            .required("description", "String", self.description.as_str())
    }

    fn selection(&self) -> Selection {
        outcome_selection(Selection::new().nested("department", Department::selection()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use {super::*, crate::models::NullableExt, serde_json::json};

    #[test]
    fn departments_forwards_search_key() {
        let op = Departments {
            query: PageQuery::default().with_key("finance"),
        };
        assert_eq!(
            op.descriptor().document(),
            "query ($key: String) { departments(key: $key) { total page pages results { id name description created updated isActive } } }"
        );
    }

    #[test]
    fn create_department_decodes_created_entity() {
        let out: MutationOutcome<DepartmentPayload> = serde_json::from_value(json!({
            "success": true,
            "message": "Department created",
            "department": { "id": 5, "name": "Finance" }
        }))
        .unwrap();
        assert_eq!(out.payload.department.value().unwrap().name.value().map(String::as_str), Some("Finance"));
    }
}
