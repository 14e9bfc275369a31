//! The `hydra.toml` project file.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// File name looked up by the CLI.
pub const CONFIG_FILE_NAME: &str = "hydra.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub frontend: FrontendConfig,

    /// Requested binding roots, in the order they were listed.
    pub bindings: Vec<BindingSpec>,

    pub policy: PolicyConfig,

    pub emit: EmitConfig,
}

/// How the front end is invoked. Hydra itself only uses `plugins` (for the
/// umbrella header); the rest is passed through to the adapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub cflags: Vec<String>,
    pub include_path: Vec<String>,
    /// Headers appended to the umbrella header after the binding headers.
    pub plugins: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSpec {
    /// Qualified name of the root (`H2Core::Song`).
    pub name: String,
    /// Header declaring it, relative to an include path.
    pub header: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Full names, or `full_name(signature)` for a single overload.
    pub exclude: Vec<String>,

    /// Types the target runtime already converts.
    pub casters: Vec<String>,

    /// Qualified name of the caster template; every specialization of it
    /// marks its argument type as a caster.
    pub caster_template: Option<String>,

    /// Veto records with a base that cannot be resolved instead of binding
    /// them without that base.
    pub drop_records_with_unresolved_bases: bool,

    /// Enums whose values are also exported into the enclosing scope.
    pub exported_enums: Vec<String>,

    /// Return value policy per callable key.
    pub return_policies: IndexMap<String, String>,

    /// Replacement snippet per callable key, bound instead of the callable.
    pub replacements: IndexMap<String, String>,

    /// Extra methods per record: record full name -> method name -> code.
    pub addon_methods: IndexMap<String, IndexMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitConfig {
    /// Name of the generated extension module.
    pub module: String,
    pub constructors: bool,
    pub fields: bool,
    pub methods: bool,
    /// Verbatim fragments emitted before the module body.
    pub prolog: Vec<String>,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            module: "bindings".to_string(),
            constructors: true,
            fields: true,
            methods: true,
            prolog: Vec::new(),
        }
    }
}

impl ProjectConfig {
    pub fn parse(text: &str) -> Result<Self, BindError> {
        toml::from_str(text).map_err(|err| BindError::Config { message: err.to_string() })
    }

    pub fn load(path: &Path) -> Result<Self, BindError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| BindError::ConfigRead { path: path.to_path_buf(), source })?;
        let config = Self::parse(&text)?;
        log::debug!("loaded {} with {} binding roots", path.display(), config.bindings.len());
        Ok(config)
    }

    /// Binding headers followed by plugin headers, the input of the
    /// umbrella header.
    pub fn umbrella_headers(&self) -> Vec<&str> {
        self.bindings
            .iter()
            .map(|binding| binding.header.as_str())
            .chain(self.frontend.plugins.iter().map(String::as_str))
            .collect()
    }

    pub fn root_names(&self) -> Vec<&str> {
        self.bindings.iter().map(|binding| binding.name.as_str()).collect()
    }
}
