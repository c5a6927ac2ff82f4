//! Schema-driven IR construction.
//!
//! One [`SchemaTable`] lowers into one [`TableIR`]. Failures are scoped to
//! the table, so callers can report them and go on with the next one.

use gozer_core::{to_pascal_case, to_snake_case};
use gozer_ir::{FieldIR, GoType, KeyMode, ScalarType, TableIR};
use gozer_spec::{Column, SchemaTable};

use crate::{Error, Result, naming::Naming, type_mapper::map_column};

/// Column that always acts as the primary key when present.
const ID_COLUMN: &str = "id";
/// Column whose presence adds the update-status operation.
const STATUS_COLUMN: &str = "status";

/// Lower one table.
///
/// `search_key_num` caps the number of string columns promoted to list
/// filters.
pub fn lower_table(table: &SchemaTable, naming: &Naming, search_key_num: usize) -> Result<TableIR> {
    let pk_index = table
        .columns
        .iter()
        .position(|c| c.name == ID_COLUMN)
        .or_else(|| table.columns.iter().position(|c| c.primary_key))
        .ok_or_else(|| {
            Box::new(Error::MissingPrimaryKey {
                table: table.table_name.clone(),
            })
        })?;

    let mut fields = table
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| lower_column(&table.table_name, column, index == pk_index, naming))
        .collect::<Result<Vec<_>>>()?;

    let primary_key = fields.remove(pk_index);
    let key = if primary_key.mapped.native == GoType::Uuid {
        KeyMode::Uuid
    } else {
        KeyMode::AutoIncrement
    };

    let filter_fields = fields
        .iter()
        .filter(|f| is_filter_candidate(f))
        .take(search_key_num)
        .cloned()
        .collect();

    let has_status = fields.iter().any(|f| f.column == STATUS_COLUMN);

    tracing::debug!(
        table = %table.table_name,
        key = ?key,
        fields = fields.len(),
        "lowered table"
    );

    Ok(TableIR {
        table_name: table.table_name.clone(),
        struct_name: table.struct_name(),
        package_name: table.package_name(),
        key,
        primary_key,
        info_fields: fields,
        filter_fields,
        has_status,
    })
}

fn lower_column(
    table: &str,
    column: &Column,
    primary_key: bool,
    naming: &Naming,
) -> Result<FieldIR> {
    let mapped = map_column(table, column)?;
    Ok(FieldIR {
        column: column.name.clone(),
        name: exported_field_name(&column.name),
        json_name: naming.json_name(&column.name),
        proto_name: to_snake_case(&column.name),
        mapped,
        raw_type: column.native_type.clone(),
        nullable: column.nullable,
        primary_key,
        auto_increment: column.auto_increment,
        comment: column.comment.clone().filter(|c| !c.trim().is_empty()),
        default: column.default_value.clone(),
    })
}

/// String columns are filterable unless they hold UUIDs.
fn is_filter_candidate(field: &FieldIR) -> bool {
    field.mapped.wire == ScalarType::String
        && field.mapped.native != GoType::Uuid
        && !field.column.to_lowercase().contains("uuid")
}

/// Exported Go name of a column; `id` and `*_id` keep Go's `ID` spelling.
fn exported_field_name(column: &str) -> String {
    let pascal = to_pascal_case(column);
    match pascal.strip_suffix("Id") {
        Some(stem) => format!("{}ID", stem),
        None => pascal,
    }
}

#[cfg(test)]
mod tests {
    use gozer_spec::SchemaConfig;

    use super::*;
    use crate::naming::NamingFormat;

    fn table(json: &str) -> SchemaTable {
        SchemaConfig::from_json_str(json, "schema.json")
            .unwrap()
            .tables
            .remove(0)
    }

    fn user_table() -> SchemaTable {
        table(
            r#"{ "tables": [{ "table_name": "user", "columns": [
                { "name": "id", "type": "uuid", "primary_key": true },
                { "name": "name", "type": "varchar(64)" },
                { "name": "status", "type": "int unsigned" },
                { "name": "create_time", "type": "timestamp" }
            ]}]}"#,
        )
    }

    #[test]
    fn test_uuid_keyed_table() {
        let ir = lower_table(&user_table(), &Naming::default(), 3).unwrap();
        assert_eq!(ir.key, KeyMode::Uuid);
        assert_eq!(ir.struct_name, "User");
        assert_eq!(ir.primary_key.name, "ID");
        assert!(ir.has_status);
        let info: Vec<_> = ir.info_fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(info, ["name", "status", "create_time"]);
        let filters: Vec<_> = ir.filter_fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(filters, ["name"]);
        assert_eq!(ir.info_fields[2].mapped.wire, ScalarType::Int64);
    }

    #[test]
    fn test_id_column_wins_over_flag() {
        let ir = lower_table(
            &table(
                r#"{ "tables": [{ "table_name": "post", "columns": [
                    { "name": "code", "type": "varchar", "primary_key": true },
                    { "name": "id", "type": "bigint unsigned", "auto_increment": true }
                ]}]}"#,
            ),
            &Naming::default(),
            3,
        )
        .unwrap();
        assert_eq!(ir.primary_key.column, "id");
        assert_eq!(ir.key, KeyMode::AutoIncrement);
        assert_eq!(ir.primary_key.mapped.wire, ScalarType::Uint64);
    }

    #[test]
    fn test_filter_cap_and_uuid_names() {
        let ir = lower_table(
            &table(
                r#"{ "tables": [{ "table_name": "member", "columns": [
                    { "name": "id", "type": "bigint" },
                    { "name": "user_uuid", "type": "varchar" },
                    { "name": "nickname", "type": "varchar" },
                    { "name": "email", "type": "text" },
                    { "name": "mobile", "type": "char(11)" }
                ]}]}"#,
            ),
            &Naming::default(),
            2,
        )
        .unwrap();
        let filters: Vec<_> = ir.filter_fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(filters, ["nickname", "email"]);
        assert!(!ir.has_status);
    }

    #[test]
    fn test_json_names_follow_format() {
        let ir = lower_table(&user_table(), &Naming::new(NamingFormat::LowerCamel), 3).unwrap();
        let created = &ir.info_fields[2];
        assert_eq!(created.json_name, "createTime");
        assert_eq!(created.proto_name, "create_time");
        assert_eq!(created.name, "CreateTime");
    }

    #[test]
    fn test_missing_primary_key() {
        let err = lower_table(
            &table(
                r#"{ "tables": [
                    { "table_name": "log", "columns": [{ "name": "msg", "type": "text" }] }
                ] }"#,
            ),
            &Naming::default(),
            3,
        )
        .unwrap_err();
        assert!(matches!(*err, Error::MissingPrimaryKey { ref table } if table == "log"));
    }

    #[test]
    fn test_unsupported_type_is_table_scoped() {
        let err = lower_table(
            &table(
                r#"{ "tables": [{ "table_name": "shop", "columns": [
                    { "name": "id", "type": "bigint" },
                    { "name": "location", "type": "geometry" }
                ]}]}"#,
            ),
            &Naming::default(),
            3,
        )
        .unwrap_err();
        assert_eq!(err.scope(), crate::ErrorScope::Table);
    }

    #[test]
    fn test_exported_field_names() {
        assert_eq!(exported_field_name("id"), "ID");
        assert_eq!(exported_field_name("role_id"), "RoleID");
        assert_eq!(exported_field_name("nickname"), "Nickname");
    }
}
