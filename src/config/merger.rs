//! Deep merge for layered settings files.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences are replaced entirely (not merged)
//! - Null values in overlay delete the corresponding key from base
//! - Scalars in overlay replace scalars in base

use serde_yaml::Value;

/// Deep merge two YAML values; `overlay` wins at the point of conflict.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();

            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }

            Value::Mapping(result)
        }

        // An empty settings file parses as null and contributes nothing.
        (base, Value::Null) => base.clone(),

        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order (later overrides earlier).
pub fn merge_layers(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn scalars_are_overridden() {
        let merged = deep_merge(&yaml("appcfg: a"), &yaml("appcfg: b"));
        assert_eq!(merged["appcfg"], "b");
    }

    #[test]
    fn mappings_merge_recursively() {
        let merged = deep_merge(
            &yaml("test:\n  runner: nose\n  modules: [a]"),
            &yaml("test:\n  modules: [b, c]"),
        );
        assert_eq!(merged["test"]["runner"], "nose");
        assert_eq!(merged["test"]["modules"], yaml("[b, c]"));
    }

    #[test]
    fn null_deletes_key() {
        let merged = deep_merge(&yaml("appcfg: a\nlocal_shell: ipython"), &yaml("appcfg: ~"));
        assert!(merged.get("appcfg").is_none());
        assert_eq!(merged["local_shell"], "ipython");
    }

    #[test]
    fn empty_overlay_keeps_base() {
        let merged = deep_merge(&yaml("appcfg: a"), &Value::Null);
        assert_eq!(merged["appcfg"], "a");
    }

    #[test]
    fn merge_layers_applies_in_order() {
        let merged = merge_layers(&[yaml("appcfg: a"), yaml("appcfg: b"), yaml("appcfg: c")]);
        assert_eq!(merged["appcfg"], "c");
    }

    #[test]
    fn merge_layers_of_nothing_is_empty_mapping() {
        assert_eq!(merge_layers(&[]), Value::Mapping(Default::default()));
    }
}
