//! Enabled-tool registry
//!
//! Built once at startup from the static catalog and the configured
//! allowlist, then shared read-only across every query.

use super::entities::ToolSpec;
use std::collections::HashSet;
use std::fmt::Write as _;

/// The enabled, ordered subset of the tool catalog
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
    unknown_enabled: Vec<String>,
}

impl ToolRegistry {
    /// Filter `catalog` down to the names in `enabled`, preserving catalog order.
    ///
    /// Enabled names with no catalog entry are kept aside and exposed via
    /// [`unknown_enabled`](Self::unknown_enabled).
    pub fn from_catalog<I, S>(catalog: Vec<ToolSpec>, enabled: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enabled: Vec<String> = enabled
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let wanted: HashSet<&str> = enabled.iter().map(String::as_str).collect();

        let mut seen = HashSet::new();
        let tools: Vec<ToolSpec> = catalog
            .into_iter()
            .filter(|spec| wanted.contains(spec.name.as_str()))
            .filter(|spec| seen.insert(spec.name.clone()))
            .collect();

        let mut unknown_enabled = Vec::new();
        for name in &enabled {
            if !tools.iter().any(|t| &t.name == name) && !unknown_enabled.contains(name) {
                unknown_enabled.push(name.clone());
            }
        }

        Self {
            tools,
            unknown_enabled,
        }
    }

    /// Registry with every catalog entry enabled
    pub fn all(catalog: Vec<ToolSpec>) -> Self {
        let names: Vec<String> = catalog.iter().map(|t| t.name.clone()).collect();
        Self::from_catalog(catalog, names)
    }

    /// Enabled tools in catalog order
    pub fn enabled_tools(&self) -> &[ToolSpec] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Enabled names that matched nothing in the catalog
    pub fn unknown_enabled(&self) -> &[String] {
        &self.unknown_enabled
    }

    /// Render the catalog for the selection prompt.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for (i, tool) in self.tools.iter().enumerate() {
            let _ = writeln!(out, "{}. {}: {}", i + 1, tool.name, tool.description);
            if tool.parameters.is_empty() {
                let _ = writeln!(out, "   (no parameters)");
            }
            for param in &tool.parameters {
                let requirement = if param.required { "required" } else { "optional" };
                let default = param
                    .default
                    .as_ref()
                    .map(|d| format!(", default: {}", d))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "   - {} ({}, {}{}): {}",
                    param.name, param.param_type, requirement, default, param.description
                );
            }
        }
        out
    }
}
