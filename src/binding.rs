//! Environment-to-field bindings and the override resolver.

use crate::coerce::{TypeTag, coerce, normalize_newlines};
use crate::document::{ConfigDocument, FieldPath};
use crate::env::EnvSource;
use crate::error::{OverrideError, ValidationError};
use tracing::{debug, warn};

/// Maps one environment variable onto one document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub variable: &'static str,
    pub tag: TypeTag,
    pub path: FieldPath,
}

impl FieldBinding {
    pub const fn new(variable: &'static str, tag: TypeTag, path: FieldPath) -> Self {
        Self {
            variable,
            tag,
            path,
        }
    }

    /// Bind a top-level key.
    pub const fn top(variable: &'static str, tag: TypeTag, key: &'static str) -> Self {
        Self::new(variable, tag, FieldPath::Top(key))
    }

    /// Bind a key inside a top-level map.
    pub const fn nested(
        variable: &'static str,
        tag: TypeTag,
        parent: &'static str,
        key: &'static str,
    ) -> Self {
        Self::new(variable, tag, FieldPath::Nested(parent, key))
    }

    /// Resolve this binding against `env`.
    ///
    /// Returns `Ok(None)` when the variable is unset.
    pub fn resolve(&self, env: &dyn EnvSource) -> Result<Option<serde_json::Value>, ValidationError> {
        let Some(raw) = env.var(self.variable) else {
            return Ok(None);
        };
        let text = normalize_newlines(&raw);
        coerce(self.tag, &text)
            .map(Some)
            .map_err(|detail| ValidationError {
                variable: self.variable.to_string(),
                expected: self.tag,
                raw,
                detail,
            })
    }
}

/// Result of overlaying one binding table onto a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayOutcome {
    /// Variables that were set and written into the document.
    pub applied: Vec<&'static str>,
    /// Variables that were set but rejected.
    pub errors: Vec<OverrideError>,
}

impl OverlayOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Apply every binding to `doc`.
///
/// A rejected binding leaves its field untouched and does not stop the
/// remaining bindings.
pub fn apply_bindings(
    doc: &mut ConfigDocument,
    bindings: &[FieldBinding],
    env: &dyn EnvSource,
) -> OverlayOutcome {
    let mut outcome = OverlayOutcome::default();

    for binding in bindings {
        let value = match binding.resolve(env) {
            Ok(Some(value)) => value,
            Ok(None) => continue,
            Err(err) => {
                warn!(document = doc.name(), error = %err, "Rejected environment override");
                outcome.errors.push(err.into());
                continue;
            }
        };

        match doc.set(&binding.path, value) {
            Ok(_) => {
                debug!(
                    document = doc.name(),
                    variable = binding.variable,
                    path = %binding.path,
                    "Applied environment override"
                );
                outcome.applied.push(binding.variable);
            }
            Err(source) => {
                let err = OverrideError::Unaddressable {
                    variable: binding.variable.to_string(),
                    source,
                };
                warn!(document = doc.name(), error = %err, "Rejected environment override");
                outcome.errors.push(err);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    const BINDINGS: &[FieldBinding] = &[
        FieldBinding::top("COMMAND_PREFIX", TypeTag::String, "commandPrefix"),
        FieldBinding::top("DEBUG_MODE", TypeTag::Boolean, "debug"),
        FieldBinding::top("DICE_MAX", TypeTag::Integer, "diceMax"),
        FieldBinding::top("PIXELS_PER_M", TypeTag::Float, "pixelsPerMeter"),
        FieldBinding::nested("ONLINE_ACTIVITY_STRING", TypeTag::String, "onlineActivity", "string"),
        FieldBinding::top("ROOM_ICONS", TypeTag::Array, "roomIcons"),
    ];

    fn settings() -> ConfigDocument {
        ConfigDocument::from_value(
            "settings",
            json!({
                "commandPrefix": "!",
                "debug": false,
                "diceMax": 6,
                "pixelsPerMeter": 0.1,
                "onlineActivity": {"type": "PLAYING", "string": "Alter Ego"},
                "roomIcons": []
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_unset_variables_are_noop() {
        let mut doc = settings();
        let env: HashMap<&str, &str> = HashMap::new();
        let outcome = apply_bindings(&mut doc, BINDINGS, &env);
        assert_eq!(doc, settings());
        assert!(outcome.applied.is_empty());
        assert!(outcome.is_clean());
    }

    #[test]
    fn test_applies_every_tag() {
        let mut doc = settings();
        let env = HashMap::from([
            ("COMMAND_PREFIX", "!!"),
            ("DEBUG_MODE", "TRUE"),
            ("DICE_MAX", "20"),
            ("PIXELS_PER_M", "0.25"),
            ("ONLINE_ACTIVITY_STRING", "line one\\nline two"),
            ("ROOM_ICONS", r#"["a.png","b.png"]"#),
        ]);
        let outcome = apply_bindings(&mut doc, BINDINGS, &env);

        assert!(outcome.is_clean());
        assert_eq!(outcome.applied.len(), 6);
        assert_eq!(
            doc.into_value(),
            json!({
                "commandPrefix": "!!",
                "debug": true,
                "diceMax": 20,
                "pixelsPerMeter": 0.25,
                "onlineActivity": {"type": "PLAYING", "string": "line one\nline two"},
                "roomIcons": ["a.png", "b.png"]
            })
        );
    }

    #[test]
    fn test_invalid_value_is_isolated() {
        let mut doc = settings();
        let env = HashMap::from([
            ("COMMAND_PREFIX", "?"),
            ("DEBUG_MODE", "notabool"),
            ("DICE_MAX", "many"),
            ("PIXELS_PER_M", "fast"),
        ]);
        let outcome = apply_bindings(&mut doc, BINDINGS, &env);

        assert_eq!(outcome.applied, vec!["COMMAND_PREFIX"]);
        let failed: Vec<&str> = outcome.errors.iter().map(|e| e.variable()).collect();
        assert_eq!(failed, vec!["DEBUG_MODE", "DICE_MAX", "PIXELS_PER_M"]);

        assert_eq!(doc.get(&FieldPath::Top("debug")), Some(&json!(false)));
        assert_eq!(doc.get(&FieldPath::Top("diceMax")), Some(&json!(6)));
        assert_eq!(doc.get(&FieldPath::Top("commandPrefix")), Some(&json!("?")));
        assert_eq!(doc.get(&FieldPath::Top("pixelsPerMeter")), Some(&json!(0.1)));
    }

    #[test]
    fn test_validation_error_carries_raw_text() {
        let env = HashMap::from([("DEBUG_MODE", "notabool")]);
        let err = BINDINGS[1].resolve(&env).unwrap_err();
        assert_eq!(err.variable, "DEBUG_MODE");
        assert_eq!(err.expected, TypeTag::Boolean);
        assert_eq!(err.raw, "notabool");
    }

    #[test]
    fn test_missing_parent_is_reported_not_created() {
        let bindings = [FieldBinding::nested("DISCORD_TOKEN", TypeTag::String, "discord", "token")];
        let mut doc = settings();
        let env = HashMap::from([("DISCORD_TOKEN", "abc")]);
        let outcome = apply_bindings(&mut doc, &bindings, &env);

        assert!(outcome.applied.is_empty());
        assert!(matches!(
            outcome.errors.as_slice(),
            [OverrideError::Unaddressable { variable, .. }] if variable == "DISCORD_TOKEN"
        ));
        assert_eq!(doc, settings());
    }

    #[test]
    fn test_binding_order_does_not_matter() {
        let env = HashMap::from([
            ("COMMAND_PREFIX", "$"),
            ("DEBUG_MODE", "false"),
            ("DICE_MAX", "bad"),
            ("ROOM_ICONS", "[1]"),
        ]);

        let mut forward = settings();
        apply_bindings(&mut forward, BINDINGS, &env);

        let reversed: Vec<FieldBinding> = BINDINGS.iter().rev().copied().collect();
        let mut backward = settings();
        apply_bindings(&mut backward, &reversed, &env);

        assert_eq!(forward, backward);
    }
}
