//! [`ResourceData`]: the typed attribute store handed to lifecycle callbacks.
//!
//! Holds two views of an instance: the persisted `state` (what the host last
//! recorded) and the desired `config`. Inputs are read from `config`; computed
//! values are written to `state`. [`ResourceData::into_response`] merges both back
//! into the wire representation.

use std::collections::HashMap;
use std::fmt;

use common::protocol::{Attributes, InstanceState, StateResponse};
use common::sensitive::REDACTED;
use serde_json::Value;

use super::error::ResourceError;
use super::schema::ResourceSchema;

pub struct ResourceData {
    schema: &'static ResourceSchema,
    id: Option<String>,
    state: Attributes,
    config: Attributes,
}

impl ResourceData {
    /// Attribute store for an instance that does not exist yet.
    pub fn for_create(schema: &'static ResourceSchema, config: Attributes) -> Self {
        Self {
            schema,
            id: None,
            state: Attributes::new(),
            config,
        }
    }

    /// Attribute store for an existing instance.
    ///
    /// When `config` is `None` the desired inputs are taken from the stored
    /// state, so no attribute reports a change.
    pub fn from_state(
        schema: &'static ResourceSchema,
        state: InstanceState,
        config: Option<Attributes>,
    ) -> Self {
        let config = config.unwrap_or_else(|| {
            state
                .attributes
                .iter()
                .filter(|(name, _)| schema.attribute(name).is_some_and(|a| a.is_input()))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect()
        });
        Self {
            schema,
            id: Some(state.id).filter(|id| !id.is_empty()),
            state: state.attributes,
            config,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the instance. The host drops it from tracked state.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Current value of an attribute: inputs come from config, computed values from state.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let attr = self.schema.attribute(name)?;
        let raw = if attr.is_input() {
            self.config.get(name)
        } else {
            self.state.get(name)
        };
        attr.normalize(raw)
    }

    /// Read a string attribute that must be present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] if the attribute is unset, empty,
    /// or not a string.
    pub fn get_str(&self, name: &str) -> Result<String, ResourceError> {
        match self.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::String(_)) => Err(ResourceError::InvalidInput(format!(
                "attribute `{name}` must not be empty"
            ))),
            Some(_) => Err(ResourceError::InvalidInput(format!(
                "attribute `{name}` must be a string"
            ))),
            None => Err(ResourceError::InvalidInput(format!(
                "attribute `{name}` is required"
            ))),
        }
    }

    /// Read an optional map-of-strings attribute. Unset and empty both yield `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidInput`] if the value is not a map of strings.
    pub fn get_string_map(&self, name: &str) -> Result<Option<HashMap<String, String>>, ResourceError> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let invalid =
            || ResourceError::InvalidInput(format!("attribute `{name}` must be a map of strings"));
        let map = value.as_object().ok_or_else(invalid)?;
        map.iter()
            .map(|(k, v)| {
                v.as_str()
                    .map(|s| (k.clone(), s.to_owned()))
                    .ok_or_else(invalid)
            })
            .collect::<Result<HashMap<_, _>, _>>()
            .map(Some)
    }

    /// Record a computed value.
    pub fn set(&mut self, name: &str, value: Value) {
        self.state.insert(name.to_owned(), value);
    }

    /// `true` if the desired value of an input differs from the stored one.
    pub fn has_change(&self, name: &str) -> bool {
        match self.schema.attribute(name) {
            Some(attr) if attr.is_input() => {
                attr.normalize(self.config.get(name)) != attr.normalize(self.state.get(name))
            }
            _ => false,
        }
    }

    /// Convert back into the wire representation returned to the host.
    ///
    /// Unchanged inputs keep their stored representation, so an untouched
    /// instance round-trips byte for byte.
    pub fn into_response(self) -> StateResponse {
        let sensitive_attributes = self.schema.sensitive_attributes();
        let Some(id) = self.id.clone() else {
            return StateResponse {
                id: None,
                attributes: Attributes::new(),
                sensitive_attributes,
            };
        };

        let mut attributes = self.state.clone();
        for attr in self.schema.attributes.iter().filter(|a| a.is_input()) {
            if !self.has_change(attr.name) {
                continue;
            }
            match self.config.get(attr.name) {
                Some(value) => attributes.insert(attr.name.to_owned(), value.clone()),
                None => attributes.remove(attr.name),
            };
        }

        StateResponse {
            id: Some(id),
            attributes,
            sensitive_attributes,
        }
    }
}

impl fmt::Debug for ResourceData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceData")
            .field("id", &self.id)
            .field("state", &Redacted(self.schema, &self.state))
            .field("config", &Redacted(self.schema, &self.config))
            .finish()
    }
}

/// Debug view of an attribute map with sensitive values replaced.
struct Redacted<'a>(&'static ResourceSchema, &'a Attributes);

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.1 {
            if self.0.is_sensitive(name) {
                map.entry(name, &format_args!("{REDACTED}"));
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}
