use std::path::{Path, PathBuf};

use gozer_codegen::{builder::CodeBuilder, generation::ProtoDescriptor};
use gozer_core::{FileRules, GeneratedFile};
use gozer_ir::{KeyMode, TableIR};

use crate::{CrudOperation, GoSettings};

/// Header shared by the per-table descriptors and the umbrella.
pub fn umbrella_preamble(package: &str) -> String {
    format!(
        "syntax = \"proto3\";\n\npackage {0};\noption go_package = \"./{0}\";\n",
        package
    )
}

/// Shared message definitions, by name.
fn shared_message(name: &str) -> Option<&'static str> {
    let body = match name {
        "IDReq" => "message IDReq {\n  uint64 id = 1;\n}",
        "IDsReq" => "message IDsReq {\n  repeated uint64 ids = 1;\n}",
        "UUIDReq" => "message UUIDReq {\n  string id = 1;\n}",
        "UUIDsReq" => "message UUIDsReq {\n  repeated string ids = 1;\n}",
        "StatusCodeReq" => "message StatusCodeReq {\n  uint64 id = 1;\n  uint32 status = 2;\n}",
        "StatusCodeUUIDReq" => {
            "message StatusCodeUUIDReq {\n  string id = 1;\n  uint32 status = 2;\n}"
        }
        "BaseResp" => "message BaseResp {\n  string msg = 1;\n}",
        "Empty" => "message Empty {}",
        _ => return None,
    };
    Some(body)
}

/// `desc/{table}.proto`: messages and rpcs of one table.
///
/// The file is never written blindly; [`ProtoGo::merge_into`] folds the
/// fresh declarations into whatever the file already holds.
pub struct ProtoGo<'a> {
    settings: &'a GoSettings,
    table: &'a TableIR,
    operations: Vec<CrudOperation>,
}

impl<'a> ProtoGo<'a> {
    pub fn new(settings: &'a GoSettings, table: &'a TableIR) -> Self {
        Self {
            settings,
            table,
            operations: CrudOperation::for_table(table.has_status),
        }
    }

    fn struct_name(&self) -> &str {
        &self.table.struct_name
    }

    /// Names of the shared messages this table's rpcs reference.
    fn shared_names(&self) -> Vec<&'static str> {
        let key: KeyMode = self.table.key;
        let mut names = vec![key.id_request(), key.ids_request()];
        if self.table.has_status {
            names.push(key.status_request());
        }
        names.extend(["BaseResp", "Empty"]);
        names
    }

    fn info_message(&self) -> String {
        let fields = self
            .table
            .info_fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} {} = {};", f.mapped.wire.proto_type(), f.proto_name, i + 2));
        CodeBuilder::proto()
            .comment(&format!("{} message", self.struct_name()))
            .block(&format!("message {}Info {{", self.struct_name()), |b| {
                b.line(&format!("{} id = 1;", self.table.key.id_proto_type()))
                    .each(fields, |b, field| b.line(&field))
            })
            .build()
    }

    fn list_messages(&self) -> String {
        let filters = self
            .table
            .filter_fields
            .iter()
            .enumerate()
            .map(|(i, f)| format!("string {} = {};", f.proto_name, i + 3));
        CodeBuilder::proto()
            .block(&format!("message {}ListResp {{", self.struct_name()), |b| {
                b.line("uint64 total = 1;")
                    .line(&format!("repeated {}Info data = 2;", self.struct_name()))
            })
            .blank()
            .block(&format!("message {}ListReq {{", self.struct_name()), |b| {
                b.line("uint64 page = 1;")
                    .line("uint64 page_size = 2;")
                    .each(filters, |b, field| b.line(&field))
            })
            .build()
    }

    fn service(&self) -> String {
        let name = self.struct_name();
        CodeBuilder::proto()
            .block(&format!("service {} {{", name), |b| {
                b.comment(&format!("group: {}", self.table.package_name))
                    .each(&self.operations, |b, op| {
                        b.line(&format!(
                            "rpc {}({}) returns ({});",
                            op.method(name),
                            op.request(name, self.table.key),
                            op.response(name)
                        ))
                    })
            })
            .build()
    }

    /// Declarations owned by this table.
    fn table_text(&self) -> String {
        [
            umbrella_preamble(&self.settings.proto_package),
            self.info_message(),
            self.list_messages(),
            self.service(),
        ]
        .join("\n")
    }

    fn shared_text(&self) -> String {
        self.shared_names()
            .into_iter()
            .filter_map(shared_message)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Merge this table's declarations into `existing` descriptor text.
    ///
    /// Table messages and rpcs replace existing ones only when overwriting
    /// is enabled; shared messages are only ever added.
    pub fn merge_into(&self, existing: &str) -> String {
        let mut proto = ProtoDescriptor::parse(existing);
        proto.merge(ProtoDescriptor::parse(&self.table_text()), self.settings.overwrite);
        proto.merge(ProtoDescriptor::parse(&self.shared_text()), false);
        proto.render()
    }
}

impl GeneratedFile for ProtoGo<'_> {
    fn path(&self, base: &Path) -> PathBuf {
        base.join("desc")
            .join(format!("{}.proto", self.table.table_name))
    }

    fn rules(&self) -> FileRules {
        FileRules::default()
    }

    fn render(&self) -> String {
        self.merge_into("")
    }
}
