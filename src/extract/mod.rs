//! Extraction rules that turn raw probe output into typed fields.
//!
//! Every field the detector reads is a variant of the closed [`Field`]
//! enumeration and has exactly one rule in [`RULES`]. Rules are compiled once
//! and resolved by field lookup. A rule that does not match is an ordinary
//! outcome: the field is simply absent.
//!
//! # Modules
//!
//! - [`features`] - DISM feature list and detail output
//! - [`software`] - Tool table and version output
//! - [`system`] - OS version values and developer mode
//! - [`office`] - Office registry values and licensing report

pub mod features;
pub mod office;
pub mod software;
pub mod system;

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{DetectError, Result};
use crate::records::Category;

/// A field produced by an extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FeatureName,
    FeatureState,
    /// Any `key : value` line; two captures.
    DetailLine,
    GitVersion,
    NodeVersion,
    NpmVersion,
    PythonVersion,
    DotnetVersion,
    VsCodeVersion,
    /// Year and edition in a Visual Studio install path; two captures.
    VisualStudioInstall,
    ProductName,
    CurrentBuildNumber,
    DisplayVersion,
    /// Major version inside the product name.
    WindowsMajor,
    DeveloperModeFlag,
    OfficeReleaseIds,
    OfficeUpdateChannel,
    OfficeInstallPath,
    OfficeVolumeLicense,
    OfficeRetailLicense,
}

impl Field {
    pub const ALL: [Field; 20] = [
        Field::FeatureName,
        Field::FeatureState,
        Field::DetailLine,
        Field::GitVersion,
        Field::NodeVersion,
        Field::NpmVersion,
        Field::PythonVersion,
        Field::DotnetVersion,
        Field::VsCodeVersion,
        Field::VisualStudioInstall,
        Field::ProductName,
        Field::CurrentBuildNumber,
        Field::DisplayVersion,
        Field::WindowsMajor,
        Field::DeveloperModeFlag,
        Field::OfficeReleaseIds,
        Field::OfficeUpdateChannel,
        Field::OfficeInstallPath,
        Field::OfficeVolumeLicense,
        Field::OfficeRetailLicense,
    ];
}

/// One declarative extraction rule.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub category: Category,
    pub field: Field,
    pub pattern: &'static str,
}

const fn rule(category: Category, field: Field, pattern: &'static str) -> ExtractionRule {
    ExtractionRule {
        category,
        field,
        pattern,
    }
}

/// The extraction table.
pub const RULES: &[ExtractionRule] = &[
    // --- Windows features (DISM list format) ---
    rule(
        Category::WindowsFeatures,
        Field::FeatureName,
        r"(?m)^[ \t]*Feature Name[ \t]*:[ \t]*(.+?)[ \t\r]*$",
    ),
    rule(
        Category::WindowsFeatures,
        Field::FeatureState,
        r"(?m)^[ \t]*State[ \t]*:[ \t]*(.+?)[ \t\r]*$",
    ),
    rule(
        Category::WindowsFeatures,
        Field::DetailLine,
        r"(?m)^[ \t]*([^:\r\n]*?[^:\s][^:\r\n]*?)[ \t]*:[ \t]*(.*?)[ \t\r]*$",
    ),
    // --- Software (version flag output) ---
    rule(Category::Software, Field::GitVersion, r"git version\s+(\S+)"),
    rule(Category::Software, Field::NodeVersion, r"v(\d+\.\d+\.\d+)"),
    rule(Category::Software, Field::NpmVersion, r"(\d+\.\d+\.\d+)"),
    rule(
        Category::Software,
        Field::PythonVersion,
        r"Python\s+(\d+\.\d+\.\d+)",
    ),
    rule(Category::Software, Field::DotnetVersion, r"(\d+\.\d+\.\d+)"),
    rule(
        Category::Software,
        Field::VsCodeVersion,
        r"\A\s*(\d+\.\d+\.\d+)",
    ),
    rule(
        Category::Software,
        Field::VisualStudioInstall,
        r"(\d{4})[\\/](Enterprise|Professional|Community)[\\/]?$",
    ),
    // --- System (reg query output) ---
    rule(
        Category::System,
        Field::ProductName,
        r"(?m)^[ \t]*ProductName[ \t]+REG_\w+[ \t]+(.+?)[ \t\r]*$",
    ),
    rule(
        Category::System,
        Field::CurrentBuildNumber,
        r"(?m)^[ \t]*CurrentBuildNumber[ \t]+REG_\w+[ \t]+(\d+)[ \t\r]*$",
    ),
    rule(
        Category::System,
        Field::DisplayVersion,
        r"(?m)^[ \t]*DisplayVersion[ \t]+REG_\w+[ \t]+(.+?)[ \t\r]*$",
    ),
    rule(Category::System, Field::WindowsMajor, r"Windows\s+(\d+)"),
    rule(
        Category::System,
        Field::DeveloperModeFlag,
        r"(?m)^[ \t]*AllowDevelopmentWithoutDevLicense[ \t]+REG_DWORD[ \t]+0x([0-9a-fA-F]+)",
    ),
    // --- Office (reg query output, OSPP report) ---
    rule(
        Category::Office,
        Field::OfficeReleaseIds,
        r"(?m)^[ \t]*ProductReleaseIds[ \t]+REG_\w+[ \t]+(.+?)[ \t\r]*$",
    ),
    rule(
        Category::Office,
        Field::OfficeUpdateChannel,
        r"(?m)^[ \t]*UpdateChannel[ \t]+REG_\w+[ \t]+(.+?)[ \t\r]*$",
    ),
    rule(
        Category::Office,
        Field::OfficeInstallPath,
        r"(?m)^[ \t]*Path[ \t]+REG_\w+[ \t]+(.+?)[ \t\r]*$",
    ),
    rule(Category::Office, Field::OfficeVolumeLicense, r"VOLUME_KMSCLIENT"),
    rule(Category::Office, Field::OfficeRetailLicense, r"RETAIL"),
];

static COMPILED: LazyLock<HashMap<Field, Regex>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|r| (r.field, Regex::new(r.pattern).unwrap()))
        .collect()
});

/// Compiled rule for a field.
pub fn regex(field: Field) -> Option<&'static Regex> {
    COMPILED.get(&field)
}

/// Category a field belongs to.
pub fn category_of(field: Field) -> Option<Category> {
    RULES.iter().find(|r| r.field == field).map(|r| r.category)
}

/// First capture group of the field's rule, trimmed; `None` when absent.
pub fn capture(field: Field, text: &str) -> Option<String> {
    let caps = regex(field)?.captures(text)?;
    let value = caps.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// First two capture groups of the field's rule, trimmed.
pub fn capture_pair(field: Field, text: &str) -> Option<(String, String)> {
    let caps = regex(field)?.captures(text)?;
    let first = caps.get(1)?.as_str().trim().to_string();
    let second = caps.get(2)?.as_str().trim().to_string();
    Some((first, second))
}

/// Like [`capture`], but a missing match is an `ExtractionMismatch`.
pub fn capture_required(field: Field, text: &str) -> Result<String> {
    capture(field, text).ok_or_else(|| DetectError::ExtractionMismatch {
        category: category_of(field)
            .map(|c| c.to_string())
            .unwrap_or_default(),
        field: format!("{:?}", field),
    })
}

/// Whether the field's rule matches anywhere in `text`.
pub fn matches(field: Field, text: &str) -> bool {
    regex(field).is_some_and(|re| re.is_match(text))
}
