//! Generator settings with every default resolved.

use std::path::Path;

use gozer_codegen::{
    Error,
    naming::{Naming, NamingFormat},
};
use gozer_core::{strip_suffix_ignore_case, to_pascal_case};
use gozer_spec::GenConfig;

const GO_MOD: &str = "go.mod";

/// Go-side view of a [`GenConfig`].
#[derive(Debug, Clone)]
pub struct GoSettings {
    pub naming: Naming,
    /// Go module path, e.g. `github.com/acme/core`.
    pub module_path: String,
    pub overwrite: bool,
    pub use_casbin: bool,
    pub use_i18n: bool,
    pub use_uuid: bool,
    pub trans_err: bool,
    pub search_key_num: usize,
    pub rpc: Option<RpcClient>,
    pub proto_package: String,
    pub model_package: String,
    pub format_spec: bool,
}

/// The RPC client reachable from the service context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcClient {
    /// Service-context field, e.g. `CoreRpc`.
    pub field: String,
    /// Client package, e.g. `coreclient`.
    pub package: String,
    pub import: String,
    /// Client interface and constructor stem, e.g. `Core` for `NewCore`.
    pub service: String,
}

impl GoSettings {
    /// Resolve `config` for output written under `output_dir`.
    ///
    /// # Errors
    ///
    /// Fails with a fatal `NamingFormat` error for an unknown naming format,
    /// or a `FileSystem` error when `go.mod` exists but cannot be read.
    pub fn resolve(config: &GenConfig, output_dir: &Path) -> gozer_codegen::Result<Self> {
        let format: NamingFormat = config.naming_format.parse()?;

        let module_path = match &config.module_path {
            Some(path) => path.clone(),
            None => match read_module_path(output_dir)? {
                Some(path) => path,
                None => {
                    let fallback = output_dir
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "app".to_string());
                    tracing::warn!(
                        dir = %output_dir.display(),
                        module = %fallback,
                        "no go.mod found, using the directory name as module path"
                    );
                    fallback
                }
            },
        };

        let rpc = config
            .rpc_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|field| {
                let stem = strip_suffix_ignore_case(field, "rpc")
                    .filter(|s| !s.is_empty())
                    .unwrap_or(field);
                let package = config
                    .rpc_package
                    .clone()
                    .unwrap_or_else(|| format!("{}client", stem.to_lowercase()));
                let import = config
                    .rpc_import
                    .clone()
                    .unwrap_or_else(|| format!("{}/rpc/{}", module_path, package));
                RpcClient {
                    field: field.to_string(),
                    package,
                    import,
                    service: to_pascal_case(stem),
                }
            });

        let proto_package = config.proto_package.clone().unwrap_or_else(|| {
            module_path
                .rsplit('/')
                .next()
                .unwrap_or(&module_path)
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .flat_map(|c| c.to_lowercase())
                .collect()
        });

        Ok(Self {
            naming: Naming::new(format),
            module_path,
            overwrite: config.overwrite,
            use_casbin: config.use_casbin,
            use_i18n: config.use_i18n,
            use_uuid: config.use_uuid,
            trans_err: config.trans_err,
            search_key_num: config.search_key_num,
            rpc,
            proto_package,
            model_package: config.model_package.clone(),
            format_spec: config.format_spec,
        })
    }

    /// Import path of a package under `internal/`.
    pub fn internal(&self, path: &str) -> String {
        format!("{}/internal/{}", self.module_path, path.trim_matches('/'))
    }

    /// Import path of the Go package generated from the proto descriptors.
    pub fn proto_import(&self) -> String {
        format!("{}/types/{}", self.module_path, self.proto_package)
    }

    /// The service context exposes a translator.
    pub fn has_translator(&self) -> bool {
        self.use_i18n || self.trans_err
    }
}

/// Read the module path from `dir/go.mod`, or `None` when there is no such file.
pub fn read_module_path(dir: &Path) -> gozer_codegen::Result<Option<String>> {
    let path = dir.join(GO_MOD);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|source| Box::new(Error::FileSystem { path, source }))?;
    Ok(content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let module = rest.trim().trim_matches('"');
        (!module.is_empty()).then(|| module.to_string())
    }))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn config() -> GenConfig {
        GenConfig {
            module_path: Some("github.com/acme/core".into()),
            ..GenConfig::default()
        }
    }

    #[test]
    fn test_defaults_resolve() {
        let temp = TempDir::new().unwrap();
        let settings = GoSettings::resolve(&config(), temp.path()).unwrap();
        assert_eq!(settings.naming.format(), NamingFormat::Snake);
        assert_eq!(settings.proto_package, "core");
        assert_eq!(settings.internal("svc"), "github.com/acme/core/internal/svc");
        assert_eq!(settings.proto_import(), "github.com/acme/core/types/core");
        assert!(settings.rpc.is_none());
    }

    #[test]
    fn test_unknown_naming_format_is_fatal() {
        let temp = TempDir::new().unwrap();
        let config = GenConfig {
            naming_format: "kebab".into(),
            ..config()
        };
        let err = GoSettings::resolve(&config, temp.path()).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_module_path_from_go_mod() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("go.mod"), "module example.com/shop\n\ngo 1.22\n").unwrap();
        let settings = GoSettings::resolve(&GenConfig::default(), temp.path()).unwrap();
        assert_eq!(settings.module_path, "example.com/shop");
        assert_eq!(read_module_path(&temp.path().join("missing")).unwrap(), None);
    }

    #[test]
    fn test_rpc_client_defaults() {
        let temp = TempDir::new().unwrap();
        let config = GenConfig {
            rpc_name: Some("CoreRpc".into()),
            ..config()
        };
        let rpc = GoSettings::resolve(&config, temp.path()).unwrap().rpc.unwrap();
        assert_eq!(rpc.package, "coreclient");
        assert_eq!(rpc.service, "Core");
        assert_eq!(rpc.import, "github.com/acme/core/rpc/coreclient");
    }
}
