//! Compiler Options
//!
//! The configuration object build tools pass to the compiler. Every field has
//! a default, so `CompilerOptions::default()` and an empty JSON object `{}`
//! describe the same compiler.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, Result};

/// Rendering target of the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generate {
    /// DOM construction and binding calls.
    #[default]
    Csr,
    /// String concatenation.
    Ssr,
}

impl Generate {
    pub fn from_str_opt(value: &str) -> Option<Generate> {
        match value.trim() {
            "csr" => Some(Generate::Csr),
            "ssr" => Some(Generate::Ssr),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssCompile {
    /// Scoped CSS is returned next to the JS output.
    #[default]
    External,
    /// Scoped CSS is inlined as a `<style>` block in each component's markup.
    Injected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashOptions {
    pub min: usize,
    pub max: usize,
}

impl Default for HashOptions {
    fn default() -> Self {
        HashOptions { min: 6, max: 12 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CssOptions {
    pub compile: CssCompile,
    pub hash: HashOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeOptions {
    /// Parse `@`, `:`, `#`, `*` prefixes and `.modifier` suffixes.
    pub affix: bool,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        AttributeOptions { affix: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Keep whitespace runs as written instead of collapsing them.
    pub whitespace: bool,
    /// Drop whitespace-only text at the edges of elements and the document.
    pub trim: bool,
    /// Keep HTML comments in the output markup.
    pub comments: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        TransformOptions {
            whitespace: false,
            trim: true,
            comments: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionOptions {
    /// Attach byte offsets to nodes.
    pub index: bool,
    /// Attach line/column locations to nodes.
    pub loc: bool,
}

impl PositionOptions {
    pub fn enabled(&self) -> bool {
        self.index || self.loc
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompilerOptions {
    /// Name of the root component function.
    pub name: String,
    pub generate: Generate,
    /// Module specifier of the runtime imported as `$`.
    pub runtime: String,
    pub css: CssOptions,
    pub attribute: AttributeOptions,
    pub transform: TransformOptions,
    pub position: PositionOptions,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            name: "Component".to_string(),
            generate: Generate::Csr,
            runtime: "tessera/runtime".to_string(),
            css: CssOptions::default(),
            attribute: AttributeOptions::default(),
            transform: TransformOptions::default(),
            position: PositionOptions::default(),
        }
    }
}

impl CompilerOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: CompilerOptions =
            serde_json::from_str(json).map_err(|e| CompileError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        let hash = &self.css.hash;
        if hash.min == 0 {
            return Err(CompileError::Config(
                "css.hash.min must be greater than zero".to_string(),
            ));
        }
        if hash.min > hash.max {
            return Err(CompileError::Config(format!(
                "css.hash.min ({}) is greater than css.hash.max ({})",
                hash.min, hash.max
            )));
        }
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_generate(mut self, generate: Generate) -> Self {
        self.generate = generate;
        self
    }

    pub fn with_css_compile(mut self, compile: CssCompile) -> Self {
        self.css.compile = compile;
        self
    }
}
