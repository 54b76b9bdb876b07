//! Computed response fields.
//!
//! Every computed attribute is one row of [`REGISTERED_FIELDS`]. The pipeline
//! walks the table for registration and for computation; there are no
//! per-field callbacks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{ContentType, Intent};

/// The view a response is rendered for, taken from the `context` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewContext {
    /// Full public view
    #[default]
    View,
    /// Editing view
    Edit,
    /// Embedded in another response
    Embed,
}

impl ViewContext {
    /// Parses the `context` request parameter.
    pub fn from_param(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "view" => Some(ViewContext::View),
            "edit" => Some(ViewContext::Edit),
            "embed" => Some(ViewContext::Embed),
            _ => None,
        }
    }
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewContext::View => write!(f, "view"),
            ViewContext::Edit => write!(f, "edit"),
            ViewContext::Embed => write!(f, "embed"),
        }
    }
}

/// JSON type a computed field is advertised with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// A JSON string
    String,
    /// A JSON boolean
    Boolean,
}

/// How a field's value is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// The item's permalink
    Link,
    /// Whether the current user may perform the intent on the item
    Capability(Intent),
}

/// Schema advertised to the dispatch framework for a computed field.
///
/// # Examples
///
/// ```
/// use content_exposure::{FieldSchema, FieldType, ViewContext};
///
/// let schema = FieldSchema {
///     value_type: FieldType::Boolean,
///     context: &[ViewContext::View, ViewContext::Edit],
/// };
/// assert_eq!(
///     serde_json::to_string(&schema).unwrap(),
///     r#"{"type":"boolean","context":["view","edit"]}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Declared JSON type
    #[serde(rename = "type")]
    pub value_type: FieldType,
    /// Views the field appears in
    pub context: &'static [ViewContext],
}

impl FieldSchema {
    /// Is the field visible in `view`?
    pub fn visible_in(&self, view: ViewContext) -> bool {
        self.context.contains(&view)
    }
}

const LINK_CONTEXTS: &[ViewContext] = &[ViewContext::View, ViewContext::Edit, ViewContext::Embed];
const CAPABILITY_CONTEXTS: &[ViewContext] = &[ViewContext::View, ViewContext::Edit];

/// One computed attribute on one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredField {
    /// Entity type the attribute is attached to
    pub entity_type: ContentType,
    /// Attribute name in the JSON representation
    pub attribute: &'static str,
    /// How the value is computed
    pub kind: FieldKind,
}

impl RegisteredField {
    const fn link(entity_type: ContentType) -> Self {
        Self {
            entity_type,
            attribute: "link",
            kind: FieldKind::Link,
        }
    }

    const fn capability(entity_type: ContentType, attribute: &'static str, intent: Intent) -> Self {
        Self {
            entity_type,
            attribute,
            kind: FieldKind::Capability(intent),
        }
    }

    /// The schema advertised for this field.
    pub fn schema(&self) -> FieldSchema {
        match self.kind {
            FieldKind::Link => FieldSchema {
                value_type: FieldType::String,
                context: LINK_CONTEXTS,
            },
            FieldKind::Capability(_) => FieldSchema {
                value_type: FieldType::Boolean,
                context: CAPABILITY_CONTEXTS,
            },
        }
    }

    /// The intent checked by a capability field.
    pub fn intent(&self) -> Option<Intent> {
        match self.kind {
            FieldKind::Capability(intent) => Some(intent),
            FieldKind::Link => None,
        }
    }
}

/// Every computed field the pipeline attaches.
pub const REGISTERED_FIELDS: &[RegisteredField] = &[
    RegisteredField::link(ContentType::Section),
    RegisteredField::link(ContentType::Post),
    RegisteredField::link(ContentType::Comment),
    RegisteredField::capability(ContentType::Section, "user_can_post", Intent::Post),
    RegisteredField::capability(ContentType::Post, "user_can_comment", Intent::Comment),
    RegisteredField::capability(ContentType::Post, "user_can_edit", Intent::Edit),
    RegisteredField::capability(ContentType::Comment, "user_can_edit", Intent::Edit),
];

/// Fields attached to `entity_type`, in table order.
pub fn fields_for(entity_type: ContentType) -> impl Iterator<Item = &'static RegisteredField> {
    REGISTERED_FIELDS
        .iter()
        .filter(move |field| field.entity_type == entity_type)
}

/// Every `(content type, intent)` pair the table checks.
pub fn capability_pairs() -> impl Iterator<Item = (ContentType, Intent)> {
    REGISTERED_FIELDS
        .iter()
        .filter_map(|field| field.intent().map(|intent| (field.entity_type, intent)))
}
