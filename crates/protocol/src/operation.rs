use serde::de::DeserializeOwned;

use crate::{OperationDescriptor, OperationKind, Selection, Variables};

/// A typed remote operation.
///
/// Implementors name the root field, declare their variables and the result
/// shape, and say what the root field decodes into. The gateway does the
/// rest.
pub trait Operation: Send + Sync {
    /// Root field name on the remote schema, e.g. `auth`.
    const NAME: &'static str;
    /// Advisory read/write hint.
    const KIND: OperationKind;

    /// What the root field's payload decodes into.
    type Output: DeserializeOwned + Send;

    fn variables(&self) -> Variables {
        Variables::new()
    }

    fn selection(&self) -> Selection;

    fn descriptor(&self) -> OperationDescriptor {
        OperationDescriptor::new(Self::NAME, Self::KIND)
            .with_variables(self.variables())
            .with_selection(self.selection())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde::Deserialize};

    #[derive(Deserialize)]
    struct Ack {
        #[allow(dead_code)]
        success: bool,
    }

    struct DeleteAgenda {
        id: i64,
    }

    impl Operation for DeleteAgenda {
        const KIND: OperationKind = OperationKind::Write;
        const NAME: &'static str = "deleteEventAgenda";

        type Output = Ack;

        fn variables(&self) -> Variables {
            Variables::new().required("id", "Int", self.id)
        }

        fn selection(&self) -> Selection {
            Selection::of(&["success", "message"])
        }
    }

    #[test]
    fn default_descriptor_uses_declared_parts() {
        let desc = DeleteAgenda { id: 12 }.descriptor();
        assert_eq!(desc.name, "deleteEventAgenda");
        assert_eq!(desc.kind, OperationKind::Write);
        assert_eq!(
            desc.document(),
            "mutation ($id: Int!) { deleteEventAgenda(id: $id) { success message } }"
        );
    }
}
