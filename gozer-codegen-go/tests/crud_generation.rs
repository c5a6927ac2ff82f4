use std::path::Path;

use gozer_codegen::{ErrorScope, naming::Naming};
use gozer_codegen_go::{CrudGenerator, CrudOperation, GoSettings, TableStatus};
use gozer_ir::KeyMode;
use gozer_spec::SchemaConfig;
use tempfile::TempDir;

const USER_SCHEMA: &str = r#"{ "tables": [{ "table_name": "user", "columns": [
    { "name": "id", "type": "uuid", "primary_key": true },
    { "name": "name", "type": "varchar(64)", "comment": "display name" },
    { "name": "status", "type": "uint32" },
    { "name": "create_time", "type": "timestamp" }
]}]}"#;

const LOGIC_FILES: [&str; 6] = [
    "internal/logic/user/create_or_update_user.go",
    "internal/logic/user/delete_user.go",
    "internal/logic/user/batch_delete_user.go",
    "internal/logic/user/get_user_by_id.go",
    "internal/logic/user/get_user_list.go",
    "internal/logic/user/update_user_status.go",
];

fn settings() -> GoSettings {
    GoSettings {
        naming: Naming::default(),
        module_path: "github.com/acme/core".into(),
        overwrite: false,
        use_casbin: false,
        use_i18n: false,
        use_uuid: true,
        trans_err: false,
        search_key_num: 3,
        rpc: None,
        proto_package: "core".into(),
        model_package: "model".into(),
        format_spec: false,
    }
}

fn schema(json: &str) -> SchemaConfig {
    SchemaConfig::from_json_str(json, "schema.json").unwrap()
}

fn read(dir: &Path, path: &str) -> String {
    std::fs::read_to_string(dir.join(path)).unwrap()
}

#[test]
fn test_uuid_keyed_user_table() {
    let out = TempDir::new().unwrap();
    let report = CrudGenerator::new(settings())
        .generate(&schema(USER_SCHEMA), out.path())
        .unwrap();

    match &report.tables[0].status {
        TableStatus::Generated { key, operations } => {
            assert_eq!(*key, KeyMode::Uuid);
            assert_eq!(operations.len(), 6);
            assert!(operations.contains(&CrudOperation::UpdateStatus));
        }
        other => panic!("unexpected status {:?}", other),
    }
    for path in LOGIC_FILES {
        assert!(out.path().join(path).exists(), "missing {}", path);
    }
    assert!(out.path().join("internal/model/user.go").exists());

    let proto = read(out.path(), "desc/user.proto");
    assert!(proto.contains("message UserInfo {\n  string id = 1;\n"));
    assert!(proto.contains("  uint32 status = 3;\n"));
    assert!(proto.contains("  int64 create_time = 4;\n"));
    assert!(proto.contains("message UserListResp {"));
    assert!(proto.contains(
        "message UserListReq {\n  uint64 page = 1;\n  uint64 page_size = 2;\n  string name = 3;\n}"
    ));
    assert!(proto.contains("message UUIDReq {"));
    assert!(proto.contains("rpc updateUserStatus(StatusCodeUUIDReq) returns (BaseResp);"));

    let umbrella = read(out.path(), "desc/all.proto");
    assert!(umbrella.contains("package core;"));
    assert!(umbrella.ends_with("import \"user.proto\";\n"));
}

#[test]
fn test_table_without_status_gets_five_artifacts() {
    let out = TempDir::new().unwrap();
    let report = CrudGenerator::new(settings())
        .generate(
            &schema(
                r#"{ "tables": [{ "table_name": "post", "columns": [
                    { "name": "id", "type": "bigint unsigned", "auto_increment": true },
                    { "name": "title", "type": "varchar(255)" }
                ]}]}"#,
            ),
            out.path(),
        )
        .unwrap();

    match &report.tables[0].status {
        TableStatus::Generated { key, operations } => {
            assert_eq!(*key, KeyMode::AutoIncrement);
            assert_eq!(operations, &CrudOperation::BASE.to_vec());
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert!(!out.path().join("internal/logic/post/update_post_status.go").exists());
}

#[test]
fn test_existing_logic_is_kept_unless_overwriting() {
    let out = TempDir::new().unwrap();
    let schema = schema(USER_SCHEMA);
    CrudGenerator::new(settings())
        .generate(&schema, out.path())
        .unwrap();

    let edited = out.path().join(LOGIC_FILES[1]);
    std::fs::write(&edited, "// hand edited\n").unwrap();

    let report = CrudGenerator::new(settings())
        .generate(&schema, out.path())
        .unwrap();
    assert_eq!(std::fs::read_to_string(&edited).unwrap(), "// hand edited\n");
    assert!(report.stats.skipped.contains(&LOGIC_FILES[1].to_string()));

    let overwrite = GoSettings {
        overwrite: true,
        ..settings()
    };
    CrudGenerator::new(overwrite)
        .generate(&schema, out.path())
        .unwrap();
    assert_ne!(std::fs::read_to_string(&edited).unwrap(), "// hand edited\n");
}

#[test]
fn test_descriptors_merge_idempotently() {
    let out = TempDir::new().unwrap();
    let generator = CrudGenerator::new(settings());
    let schema = schema(USER_SCHEMA);

    generator.generate(&schema, out.path()).unwrap();
    let proto_path = out.path().join("desc/user.proto");
    let mut proto = std::fs::read_to_string(&proto_path).unwrap();
    proto.push_str("\nmessage UserExportReq {\n  string name = 1;\n}\n");
    std::fs::write(&proto_path, &proto).unwrap();
    let first_umbrella = read(out.path(), "desc/all.proto");

    let report = generator.generate(&schema, out.path()).unwrap();
    let second_umbrella = read(out.path(), "desc/all.proto");
    assert_eq!(first_umbrella, second_umbrella);
    assert_eq!(second_umbrella.matches("import \"user.proto\";").count(), 1);
    assert!(report.stats.skipped.contains(&"desc/all.proto".to_string()));

    let merged = std::fs::read_to_string(&proto_path).unwrap();
    assert!(merged.contains("message UserExportReq {"));
    assert_eq!(merged.matches("message UserInfo {").count(), 1);
    assert_eq!(merged.matches("rpc getUserList(").count(), 1);
}

#[test]
fn test_unsupported_table_is_skipped() {
    let out = TempDir::new().unwrap();
    let report = CrudGenerator::new(settings())
        .generate(
            &schema(
                r#"{ "tables": [
                    { "table_name": "shop", "columns": [
                        { "name": "id", "type": "bigint" },
                        { "name": "location", "type": "geometry" }
                    ]},
                    { "table_name": "tag", "columns": [
                        { "name": "id", "type": "bigint" },
                        { "name": "label", "type": "varchar(32)" }
                    ]}
                ]}"#,
            ),
            out.path(),
        )
        .unwrap();

    let skipped: Vec<_> = report.skipped().collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].table, "shop");
    match &skipped[0].status {
        TableStatus::Skipped(err) => assert_eq!(err.scope(), ErrorScope::Table),
        other => panic!("unexpected status {:?}", other),
    }
    assert!(out.path().join("desc/tag.proto").exists());
    assert!(!out.path().join("desc/shop.proto").exists());
    let umbrella = read(out.path(), "desc/all.proto");
    assert!(!umbrella.contains("shop.proto"));
}
