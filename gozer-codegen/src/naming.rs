//! Naming resolution shared by every artifact.
//!
//! A handler, its logic routine and the files they live in are all derived
//! from one canonical base name, so they always agree with each other.

use std::str::FromStr;

use gozer_core::{
    strip_suffix_ignore_case, to_lower_camel_case, to_pascal_case, to_snake_case, upper_first,
};

use crate::{Error, Result};

/// Casing applied to file names, folders and JSON field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingFormat {
    #[default]
    Snake,
    Camel,
    LowerCamel,
    Unchanged,
}

impl NamingFormat {
    pub const ALL: [NamingFormat; 4] = [
        NamingFormat::Snake,
        NamingFormat::Camel,
        NamingFormat::LowerCamel,
        NamingFormat::Unchanged,
    ];

    /// Convert `name` to this format.
    pub fn apply(&self, name: &str) -> String {
        match self {
            NamingFormat::Snake => to_snake_case(name),
            NamingFormat::Camel => to_pascal_case(name),
            NamingFormat::LowerCamel => to_lower_camel_case(name),
            NamingFormat::Unchanged => name.to_string(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingFormat::Snake => "snake",
            NamingFormat::Camel => "camel",
            NamingFormat::LowerCamel => "lower_camel",
            NamingFormat::Unchanged => "unchanged",
        }
    }
}

impl FromStr for NamingFormat {
    type Err = Box<Error>;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim() {
            "snake" => Ok(NamingFormat::Snake),
            "camel" => Ok(NamingFormat::Camel),
            "lower_camel" | "lowerCamel" => Ok(NamingFormat::LowerCamel),
            "unchanged" | "none" => Ok(NamingFormat::Unchanged),
            other => Err(Box::new(Error::NamingFormat {
                value: other.to_string(),
            })),
        }
    }
}

impl std::fmt::Display for NamingFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suffixes removed before a base name is reused.
const WELL_KNOWN_SUFFIXES: &[&str] = &["Handler", "Logic"];
const WELL_KNOWN_EXTENSIONS: &[&str] = &[".api", ".proto", ".toml", ".go"];

/// Derives cross-artifact identifiers under one [`NamingFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Naming {
    format: NamingFormat,
}

impl Naming {
    pub fn new(format: NamingFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> NamingFormat {
        self.format
    }

    /// Canonical base name: known extensions first, then `Handler`/`Logic`.
    pub fn base_name<'a>(&self, name: &'a str) -> &'a str {
        let mut base = name.trim();
        for ext in WELL_KNOWN_EXTENSIONS {
            if let Some(stripped) = strip_suffix_ignore_case(base, ext) {
                base = stripped;
                break;
            }
        }
        for suffix in WELL_KNOWN_SUFFIXES {
            if let Some(stripped) = strip_suffix_ignore_case(base, suffix)
                && !stripped.is_empty()
            {
                base = stripped;
                break;
            }
        }
        base
    }

    /// Exported handler function, e.g. `createUser` -> `CreateUserHandler`.
    pub fn handler_name(&self, name: &str) -> String {
        format!("{}Handler", upper_first(self.base_name(name)))
    }

    /// Logic method called by the handler, e.g. `createUser` -> `CreateUser`.
    pub fn logic_method(&self, name: &str) -> String {
        upper_first(self.base_name(name))
    }

    /// Logic struct, e.g. `user.toml` -> `UserLogic`.
    pub fn logic_type(&self, name: &str) -> String {
        format!("{}Logic", to_pascal_case(self.base_name(name)))
    }

    /// File name with `ext` attached, e.g. (`getUserList`, `.go`) -> `get_user_list.go`.
    pub fn file_name(&self, name: &str, ext: &str) -> String {
        format!("{}{}", self.format.apply(self.base_name(name)), ext)
    }

    /// Folder path with every segment converted.
    pub fn folder(&self, folder: &str) -> String {
        folder
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| self.format.apply(s))
            .collect::<Vec<_>>()
            .join("/")
    }

    /// JSON/wire field name.
    pub fn json_name(&self, name: &str) -> String {
        self.format.apply(name)
    }

    /// Go package name of a folder: its last segment.
    pub fn package_name(folder: &str) -> String {
        folder
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(folder)
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect()
    }

    /// Import alias of a folder: the folder with `/` removed.
    pub fn package_alias(folder: &str) -> String {
        folder
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "createUser",
        "CreateUser",
        "create_user",
        "getUserByIdLogic",
        "HTTPServer",
        "user2Name",
        "api-key",
        "x",
    ];

    #[test]
    fn test_parse_formats() {
        assert_eq!("snake".parse::<NamingFormat>().unwrap(), NamingFormat::Snake);
        assert_eq!("lowerCamel".parse::<NamingFormat>().unwrap(), NamingFormat::LowerCamel);
        assert_eq!("none".parse::<NamingFormat>().unwrap(), NamingFormat::Unchanged);
    }

    #[test]
    fn test_unknown_format_is_fatal() {
        let err = "kebab".parse::<NamingFormat>().unwrap_err();
        assert!(matches!(*err, Error::NamingFormat { ref value } if value == "kebab"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_apply_is_idempotent() {
        for format in NamingFormat::ALL {
            for name in SAMPLES {
                let once = format.apply(name);
                assert_eq!(format.apply(&once), once, "{} under {}", name, format);
            }
        }
    }

    #[test]
    fn test_derived_names_are_idempotent() {
        for format in NamingFormat::ALL {
            let naming = Naming::new(format);
            for name in SAMPLES {
                let handler = naming.handler_name(name);
                assert_eq!(naming.handler_name(&handler), handler);
                let file = naming.file_name(name, ".go");
                assert_eq!(naming.file_name(&file, ".go"), file);
                let folder = naming.folder(name);
                assert_eq!(naming.folder(&folder), folder);
            }
        }
    }

    #[test]
    fn test_handler_and_logic_agree() {
        let naming = Naming::new(NamingFormat::Snake);
        assert_eq!(naming.handler_name("createUser"), "CreateUserHandler");
        assert_eq!(naming.handler_name("createUserHandler"), "CreateUserHandler");
        assert_eq!(naming.logic_method("createUserHandler"), "CreateUser");
        assert_eq!(naming.file_name("createUser", ".go"), "create_user.go");
    }

    #[test]
    fn test_base_name_strips_extensions() {
        let naming = Naming::default();
        assert_eq!(naming.base_name("user.api"), "user");
        assert_eq!(naming.base_name("user.proto"), "user");
        assert_eq!(naming.base_name("Handler"), "Handler");
        assert_eq!(naming.logic_type("user.toml"), "UserLogic");
    }

    #[test]
    fn test_file_names_per_format() {
        assert_eq!(
            Naming::new(NamingFormat::Camel).file_name("get_user_list", ".go"),
            "GetUserList.go"
        );
        assert_eq!(
            Naming::new(NamingFormat::LowerCamel).file_name("GetUserList", ".go"),
            "getUserList.go"
        );
        assert_eq!(
            Naming::new(NamingFormat::Unchanged).file_name("getUser_list", ".go"),
            "getUser_list.go"
        );
    }

    #[test]
    fn test_packages() {
        assert_eq!(Naming::package_name("admin/user"), "user");
        assert_eq!(Naming::package_alias("admin/user"), "adminuser");
        assert_eq!(
            Naming::new(NamingFormat::Snake).folder("/adminUser/roleMenu/"),
            "admin_user/role_menu"
        );
    }
}
