//! Declarative attribute schema for resource types.

use common::protocol::{AttributeDescriptor, Attributes};
use serde_json::Value;

use super::error::ResourceError;

/// Value kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// A JSON string.
    String,
    /// A JSON object whose values are all strings.
    Map,
}

impl AttributeKind {
    fn as_str(self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Map => "map",
        }
    }
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// The user must supply it.
    Required,
    /// The user may supply it.
    Optional,
    /// The provider sets it; user configuration may not.
    Computed,
}

/// Declaration of a single attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    /// Any change forces destroy-then-recreate.
    pub force_new: bool,
    /// The value must never be logged or shown in a diff.
    pub sensitive: bool,
}

impl AttributeSchema {
    pub const fn required(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Required)
    }

    pub const fn optional(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Optional)
    }

    pub const fn computed(name: &'static str, kind: AttributeKind) -> Self {
        Self::new(name, kind, AttributeMode::Computed)
    }

    const fn new(name: &'static str, kind: AttributeKind, mode: AttributeMode) -> Self {
        Self {
            name,
            kind,
            mode,
            force_new: false,
            sensitive: false,
        }
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// `true` for attributes taken from user configuration.
    pub fn is_input(&self) -> bool {
        self.mode != AttributeMode::Computed
    }

    /// Reduce a value to its canonical form for comparison.
    ///
    /// Absent, `null`, and (for maps) `{}` are all treated as "not set".
    pub fn normalize<'a>(&self, value: Option<&'a Value>) -> Option<&'a Value> {
        match value {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if self.kind == AttributeKind::Map && map.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn check_kind(&self, value: &Value) -> Result<(), ResourceError> {
        let ok = match (self.kind, value) {
            (AttributeKind::String, Value::String(_)) => true,
            (AttributeKind::Map, Value::Object(map)) => map.values().all(Value::is_string),
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(ResourceError::InvalidInput(format!(
                "attribute `{}` must be a {}",
                self.name,
                self.kind.as_str()
            )))
        }
    }

    fn descriptor(&self) -> AttributeDescriptor {
        AttributeDescriptor {
            name: self.name.to_owned(),
            kind: self.kind.as_str().to_owned(),
            required: self.mode == AttributeMode::Required,
            optional: self.mode == AttributeMode::Optional,
            computed: self.mode == AttributeMode::Computed,
            force_new: self.force_new,
            sensitive: self.sensitive,
        }
    }
}

/// The full set of attributes a resource type declares.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchema {
    pub attributes: &'static [AttributeSchema],
}

impl ResourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn is_sensitive(&self, name: &str) -> bool {
        self.attribute(name).is_some_and(|a| a.sensitive)
    }

    pub fn sensitive_attributes(&self) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| a.sensitive)
            .map(|a| a.name.to_owned())
            .collect()
    }

    pub fn descriptors(&self) -> Vec<AttributeDescriptor> {
        self.attributes.iter().map(AttributeSchema::descriptor).collect()
    }

    /// Check user configuration against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] for unknown attributes, computed
    /// attributes supplied by the user, missing or empty required attributes, and
    /// values of the wrong kind.
    pub fn validate(&self, config: &Attributes) -> Result<(), ResourceError> {
        for (name, value) in config {
            let attr = self.attribute(name).ok_or_else(|| {
                ResourceError::InvalidInput(format!("unsupported attribute `{name}`"))
            })?;
            if !attr.is_input() {
                return Err(ResourceError::InvalidInput(format!(
                    "attribute `{name}` is computed and cannot be set"
                )));
            }
            if !value.is_null() {
                attr.check_kind(value)?;
            }
        }

        for attr in self.attributes.iter().filter(|a| a.mode == AttributeMode::Required) {
            match config.get(attr.name) {
                None | Some(Value::Null) => {
                    return Err(ResourceError::InvalidInput(format!(
                        "attribute `{}` is required",
                        attr.name
                    )))
                }
                Some(Value::String(s)) if s.is_empty() => {
                    return Err(ResourceError::InvalidInput(format!(
                        "attribute `{}` must not be empty",
                        attr.name
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}
