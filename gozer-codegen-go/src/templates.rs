//! Which template renders which artifact.

use gozer_ir::{ArtifactKind, KeyMode};

/// Fixed association between artifact kinds and their templates.
pub struct Templates;

impl Templates {
    pub const fn for_kind(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Routes => "routes.tpl",
            ArtifactKind::Handler => "handler.tpl",
            ArtifactKind::Logic => "logic.tpl",
            ArtifactKind::Types => "types.tpl",
            ArtifactKind::Context => "svc.tpl",
            ArtifactKind::ProtoMessage => "proto.tpl",
            ArtifactKind::Model => "model.tpl",
        }
    }
}

/// A CRUD operation emitted per table in schema-driven mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrudOperation {
    CreateOrUpdate,
    Delete,
    BatchDelete,
    GetById,
    GetList,
    UpdateStatus,
}

impl CrudOperation {
    /// Operations every table receives.
    pub const BASE: [CrudOperation; 5] = [
        CrudOperation::CreateOrUpdate,
        CrudOperation::Delete,
        CrudOperation::BatchDelete,
        CrudOperation::GetById,
        CrudOperation::GetList,
    ];

    /// Operations for a table; update-status needs a `status` column.
    pub fn for_table(has_status: bool) -> Vec<CrudOperation> {
        let mut ops = Self::BASE.to_vec();
        if has_status {
            ops.push(CrudOperation::UpdateStatus);
        }
        ops
    }

    /// RPC method name, e.g. `getUserById`.
    pub fn method(&self, model: &str) -> String {
        match self {
            CrudOperation::CreateOrUpdate => format!("createOrUpdate{}", model),
            CrudOperation::Delete => format!("delete{}", model),
            CrudOperation::BatchDelete => format!("batchDelete{}", model),
            CrudOperation::GetById => format!("get{}ById", model),
            CrudOperation::GetList => format!("get{}List", model),
            CrudOperation::UpdateStatus => format!("update{}Status", model),
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            CrudOperation::CreateOrUpdate => "crud/create_or_update.tpl",
            CrudOperation::Delete => "crud/delete.tpl",
            CrudOperation::BatchDelete => "crud/batch_delete.tpl",
            CrudOperation::GetById => "crud/get_by_id.tpl",
            CrudOperation::GetList => "crud/get_list.tpl",
            CrudOperation::UpdateStatus => "crud/update_status.tpl",
        }
    }

    /// Request message of the RPC.
    pub fn request(&self, model: &str, key: KeyMode) -> String {
        match self {
            CrudOperation::CreateOrUpdate => format!("{}Info", model),
            CrudOperation::Delete | CrudOperation::GetById => key.id_request().to_string(),
            CrudOperation::BatchDelete => key.ids_request().to_string(),
            CrudOperation::GetList => format!("{}ListReq", model),
            CrudOperation::UpdateStatus => key.status_request().to_string(),
        }
    }

    /// Response message of the RPC.
    pub fn response(&self, model: &str) -> String {
        match self {
            CrudOperation::GetById => format!("{}Info", model),
            CrudOperation::GetList => format!("{}ListResp", model),
            _ => "BaseResp".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_template() {
        let kinds = [
            ArtifactKind::Routes,
            ArtifactKind::Handler,
            ArtifactKind::Logic,
            ArtifactKind::Types,
            ArtifactKind::Context,
            ArtifactKind::ProtoMessage,
            ArtifactKind::Model,
        ];
        let mut names: Vec<_> = kinds.iter().map(|k| Templates::for_kind(*k)).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), kinds.len());
    }

    #[test]
    fn test_status_adds_operation() {
        assert_eq!(CrudOperation::for_table(false).len(), 5);
        let ops = CrudOperation::for_table(true);
        assert_eq!(ops.len(), 6);
        assert_eq!(ops[5], CrudOperation::UpdateStatus);
    }

    #[test]
    fn test_messages_follow_key_mode() {
        assert_eq!(CrudOperation::GetById.request("User", KeyMode::Uuid), "UUIDReq");
        assert_eq!(CrudOperation::BatchDelete.request("User", KeyMode::AutoIncrement), "IDsReq");
        assert_eq!(CrudOperation::UpdateStatus.request("User", KeyMode::Uuid), "StatusCodeUUIDReq");
        assert_eq!(CrudOperation::GetList.response("User"), "UserListResp");
        assert_eq!(CrudOperation::GetById.method("User"), "getUserById");
    }
}
