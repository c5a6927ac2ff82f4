//! Snapshot tests for Go and proto code generation.
//!
//! These tests verify that the generated files match the expected output.
//! Run `cargo insta review` to update snapshots when making intentional changes.

use gozer_codegen::{naming::Naming, schema::lower_table};
use gozer_codegen_go::{
    ApiGenerator, GoSettings, RpcClient,
    files::{ModelGo, ProtoGo},
};
use gozer_core::GeneratedFile;
use gozer_ir::TableIR;
use gozer_spec::SchemaConfig;
use tempfile::TempDir;

const USER_SPEC: &str = r#"
[service]
name = "core"

[[types]]
name = "UserInfo"
fields = [
    { name = "Id", type = "*uint64", tag = '`json:"id,optional"`' },
    { name = "Username", type = "string", tag = '`json:"username"`' },
]

[[types]]
name = "BaseMsgResp"
fields = [{ name = "Msg", type = "string", tag = '`json:"msg"`' }]

[[groups]]
annotations = { group = "user", jwt = "Auth", middleware = "Authority" }
routes = [
    { method = "post", path = "/user/create", handler = "createUser", request = "UserInfo", response = "BaseMsgResp", docs = ["Create user"] },
    { method = "post", path = "/user/sync", handler = "syncUser", docs = ["Sync users"] },
]

[[groups]]
annotations = { timeout = "3s" }
routes = [{ method = "get", path = "/health", handler = "health", docs = ["Health check"] }]
"#;

fn settings() -> GoSettings {
    GoSettings {
        naming: Naming::default(),
        module_path: "github.com/acme/core".into(),
        overwrite: false,
        use_casbin: false,
        use_i18n: false,
        use_uuid: false,
        trans_err: false,
        search_key_num: 3,
        rpc: None,
        proto_package: "core".into(),
        model_package: "model".into(),
        format_spec: false,
    }
}

fn rpc_settings() -> GoSettings {
    GoSettings {
        rpc: Some(RpcClient {
            field: "CoreRpc".into(),
            package: "coreclient".into(),
            import: "github.com/acme/core/rpc/coreclient".into(),
            service: "Core".into(),
        }),
        ..settings()
    }
}

/// Generate code from a spec and return files sorted by path for deterministic snapshots.
fn generate_files(spec_toml: &str, settings: GoSettings) -> Vec<(String, String)> {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let spec = dir.path().join("user.toml");
    std::fs::write(&spec, spec_toml).expect("Failed to write spec");

    let mut result: Vec<(String, String)> = ApiGenerator::new(settings)
        .preview(&[spec])
        .into_iter()
        .map(|f| (f.path, f.content))
        .collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

/// Get a specific file from the generated output.
fn get_file<'a>(files: &'a [(String, String)], path: &str) -> Option<&'a str> {
    files
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, c)| c.as_str())
}

fn table(json: &str) -> TableIR {
    let mut schema =
        SchemaConfig::from_json_str(json, "schema.json").expect("Failed to parse schema");
    lower_table(&schema.tables.remove(0), &Naming::default(), 3).expect("Failed to lower table")
}

#[test]
fn test_handler() {
    let files = generate_files(USER_SPEC, settings());

    let handler = get_file(&files, "internal/handler/user/user.go").expect("handler not found");
    insta::assert_snapshot!("handler", handler);
}

#[test]
fn test_logic_stubs() {
    let files = generate_files(USER_SPEC, settings());

    let logic = get_file(&files, "internal/logic/user/user.go").expect("logic not found");
    insta::assert_snapshot!("logic_stubs", logic);
}

#[test]
fn test_logic_with_rpc() {
    let files = generate_files(USER_SPEC, rpc_settings());

    let logic = get_file(&files, "internal/logic/user/user.go").expect("logic not found");
    insta::assert_snapshot!("logic_with_rpc", logic);
}

#[test]
fn test_routes() {
    let files = generate_files(USER_SPEC, settings());

    let routes = get_file(&files, "internal/handler/routes.go").expect("routes.go not found");
    insta::assert_snapshot!("routes", routes);
}

#[test]
fn test_proto_merge_keeps_existing_declarations() {
    let role = table(
        r#"{ "tables": [{ "table_name": "role", "columns": [
            { "name": "id", "type": "bigint unsigned", "auto_increment": true },
            { "name": "name", "type": "varchar(32)" }
        ]}]}"#,
    );
    let existing = r#"syntax = "proto3";

package core;
option go_package = "./core";

// base message
message BaseResp {
  string msg = 1;
  string code = 2;
}

message RoleInfo {
  uint64 id = 1;
  string remark = 9;
}

service Core {
  // group: base
  rpc initDatabase(Empty) returns (BaseResp);
}
"#;

    let settings = settings();
    let merged = ProtoGo::new(&settings, &role).merge_into(existing);
    insta::assert_snapshot!("proto_merge", merged);
}

#[test]
fn test_model() {
    let user = table(
        r#"{ "tables": [{ "table_name": "user", "columns": [
            { "name": "id", "type": "uuid", "primary_key": true },
            { "name": "name", "type": "varchar(64)", "comment": "display name" },
            { "name": "status", "type": "uint32" },
            { "name": "create_time", "type": "timestamp" }
        ]}]}"#,
    );

    let settings = settings();
    let model = ModelGo::new(&settings, &user).render();
    insta::assert_snapshot!("model", model);
}
