//! Config validation - warns about unknown fields and values that fall back

use serde_json::Value;
use startmenu_types::Position;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return;
    };

    let expected = expected_config_keys();
    let unknowns = find_unknown_keys(&value, &expected, "");

    for path in unknowns {
        warn!("Unknown config field in {config_name}: {path}");
    }

    if let Some(position) = unknown_position(&value) {
        warn!("Unknown menu.position {position:?} in {config_name}, using bottom_left");
    }
}

/// A `menu.position` string that names no known anchor
fn unknown_position(value: &Value) -> Option<&str> {
    let position = value.get("menu")?.get("position")?.as_str()?;
    Position::parse(position).is_none().then_some(position)
}

/// Find unknown keys in JSON value compared to expected keys.
/// Returns paths like "menu.unknownField" for unknown fields.
fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

fn expected_config_keys() -> ExpectedKeys {
    let menu_keys = ExpectedKeys::new(&["position", "scrollbar", "layout", "onHomeScreen"]);
    let taskbar_keys = ExpectedKeys::new(&["active", "hideTaskbar"]);
    let search_keys = ExpectedKeys::new(&["engineUrl"]);

    ExpectedKeys::new(&[])
        .with_nested("menu", menu_keys)
        .with_nested("taskbar", taskbar_keys)
        .with_nested("search", search_keys)
}
