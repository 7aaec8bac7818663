//! Plan computation and human-readable diff rendering.
//!
//! Sensitive attributes are compared like any other but their values never
//! leave this module in rendered form.

use common::protocol::{Attributes, InstanceState, PlanAction, PlanResponse};
use serde_json::Value;

use super::schema::{AttributeSchema, ResourceSchema};

const SENSITIVE_PLACEHOLDER: &str = "(sensitive value)";
const UNKNOWN_PLACEHOLDER: &str = "(known after apply)";

/// A single attribute-level difference between prior state and configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeChange {
    pub attribute: &'static AttributeSchema,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

impl AttributeChange {
    fn render(&self) -> String {
        let name = self.attribute.name;
        let mut line = match (&self.before, &self.after) {
            (None, Some(after)) => format!("+ {name} = {}", self.render_value(after)),
            (Some(before), None) => format!("- {name} = {}", self.render_value(before)),
            (Some(before), Some(after)) => format!(
                "~ {name} = {} -> {}",
                self.render_value(before),
                self.render_value(after)
            ),
            (None, None) => format!("+ {name} = {UNKNOWN_PLACEHOLDER}"),
        };
        if self.attribute.force_new && self.before.is_some() {
            line.push_str(" # forces replacement");
        }
        line
    }

    fn render_value(&self, value: &Value) -> String {
        if self.attribute.sensitive {
            SENSITIVE_PLACEHOLDER.to_owned()
        } else {
            value.to_string()
        }
    }
}

/// Outcome of comparing an instance's state against its configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub action: PlanAction,
    pub changes: Vec<AttributeChange>,
}

impl Plan {
    /// Names of changed attributes that force replacement.
    pub fn requires_replace(&self) -> Vec<String> {
        if self.action != PlanAction::Replace {
            return Vec::new();
        }
        self.changes
            .iter()
            .filter(|c| c.attribute.force_new)
            .map(|c| c.attribute.name.to_owned())
            .collect()
    }

    /// Diff lines with sensitive values redacted.
    pub fn render(&self) -> Vec<String> {
        self.changes.iter().map(AttributeChange::render).collect()
    }

    pub fn into_response(self) -> PlanResponse {
        PlanResponse {
            action: self.action,
            requires_replace: self.requires_replace(),
            diff: self.render(),
        }
    }
}

/// Compute what the host must do to bring `prior` in line with `config`.
///
/// `config` is assumed to have passed [`ResourceSchema::validate`]. A resource
/// has no in-place update path, so any input change yields
/// [`PlanAction::Replace`].
pub fn plan(
    schema: &'static ResourceSchema,
    prior: Option<&InstanceState>,
    config: &Attributes,
) -> Plan {
    let Some(prior) = prior else {
        let changes = schema
            .attributes
            .iter()
            .filter_map(|attr| {
                let after = attr.normalize(config.get(attr.name)).cloned();
                (after.is_some() || !attr.is_input()).then_some(AttributeChange {
                    attribute: attr,
                    before: None,
                    after,
                })
            })
            .collect();
        return Plan {
            action: PlanAction::Create,
            changes,
        };
    };

    let changes: Vec<AttributeChange> = schema
        .attributes
        .iter()
        .filter(|attr| attr.is_input())
        .filter_map(|attr| {
            let before = attr.normalize(prior.attributes.get(attr.name));
            let after = attr.normalize(config.get(attr.name));
            (before != after).then(|| AttributeChange {
                attribute: attr,
                before: before.cloned(),
                after: after.cloned(),
            })
        })
        .collect();

    let action = if changes.is_empty() {
        PlanAction::NoOp
    } else {
        PlanAction::Replace
    };
    Plan { action, changes }
}
