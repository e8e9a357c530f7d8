//! Resource Registry - Load resource definitions from JSON
//!
//! Column layouts, form fields, endpoints and dashboard summaries for every
//! studio section are embedded JSON, so a section's presentation can change
//! without touching the list manager.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::OnceLock;

/// Embedded resource JSON files (compiled into the binary)
const RESOURCE_FILES: &[&str] = &[
    include_str!("../resources/common.json"),
    include_str!("../resources/clients.json"),
    include_str!("../resources/media.json"),
    include_str!("../resources/finance.json"),
];

/// Color definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColorDef {
    pub value: String,
    pub color: [u8; 3],
}

/// Column definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub json_path: String,
    pub width: u16,
    #[serde(default)]
    pub color_map: Option<String>,
    /// Optional display format ("money")
    #[serde(default)]
    pub format: Option<String>,
}

/// Input kind for a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Email,
    Tel,
    Url,
    Date,
    Number,
    Textarea,
    Select,
}

/// Form field definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct FieldDef {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Choices for `select` fields; the first one is the default
    #[serde(default)]
    pub options: Vec<String>,
    /// Initial value for a new record
    #[serde(default)]
    pub default: Option<String>,
}

/// How a dashboard card aggregates a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Count,
    Sum,
}

/// Dashboard summary definition
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryDef {
    pub label: String,
    pub kind: SummaryKind,
    /// Field to add up for `sum` summaries
    #[serde(default)]
    pub field: Option<String>,
}

/// Resource definition from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceDef {
    /// Sidebar / header name ("Bookings")
    pub display_name: String,
    /// Singular noun used in "Add New ..." ("Booking")
    pub item_name: String,
    /// Page title ("Manage Bookings")
    pub title: String,
    /// Path segment under the API base URL
    pub endpoint: String,
    /// Field used when a record is named in dialogs and toasts
    pub name_field: String,
    /// Show the collection newest-stored-last reversed
    #[serde(default)]
    pub reverse_display: bool,
    pub columns: Vec<ColumnDef>,
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub summary: Option<SummaryDef>,
}

/// Form that creates a record in a section without signing in
#[derive(Debug, Clone, Deserialize)]
pub struct PublicFormDef {
    pub title: String,
    /// Registry key of the section the record is created in
    pub resource: String,
    /// Line shown under the form
    #[serde(default)]
    pub note: String,
    pub fields: Vec<FieldDef>,
    /// Sent with every submission, whatever the form holds
    #[serde(default)]
    pub fixed: Map<String, Value>,
}

/// Root structure of resources/*.json
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub color_maps: HashMap<String, Vec<ColorDef>>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceDef>,
    #[serde(default)]
    pub forms: HashMap<String, PublicFormDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<ResourceConfig> = OnceLock::new();

/// Get the resource registry (loads from embedded JSON on first access)
pub fn get_registry() -> &'static ResourceConfig {
    REGISTRY.get_or_init(|| {
        let mut final_config = ResourceConfig {
            color_maps: HashMap::new(),
            resources: HashMap::new(),
            forms: HashMap::new(),
        };

        for content in RESOURCE_FILES {
            let partial: ResourceConfig = serde_json::from_str(content)
                .unwrap_or_else(|e| panic!("Failed to parse embedded resource JSON: {}", e));
            final_config.color_maps.extend(partial.color_maps);
            final_config.resources.extend(partial.resources);
            final_config.forms.extend(partial.forms);
        }

        final_config
    })
}

/// Get a resource definition by key
pub fn get_resource(key: &str) -> Option<&'static ResourceDef> {
    get_registry().resources.get(key)
}

/// Get a public form definition by key
pub fn get_form(key: &str) -> Option<&'static PublicFormDef> {
    get_registry().forms.get(key)
}

/// Get a color map by name
pub fn get_color_map(name: &str) -> Option<&'static Vec<ColorDef>> {
    get_registry().color_maps.get(name)
}

/// Get color for a value based on color map name
pub fn get_color_for_value(color_map_name: &str, value: &str) -> Option<[u8; 3]> {
    get_color_map(color_map_name)?
        .iter()
        .find(|c| c.value == value)
        .map(|c| c.color)
}
