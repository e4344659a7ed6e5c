use std::fs;
use std::path::Path;

use serde_yaml::Value;
use thiserror::Error;

use crate::model::LogicalRow;

/// Errors returned when loading the YAML inventory source.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("failed to read inventory file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse inventory file {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("{path}: sub-site '{name}' is missing required key '{key}'")]
    MissingKey {
        path: String,
        name: String,
        key: String,
    },
    #[error("{path}: sub-site '{name}' key '{key}' has the wrong type")]
    BadValue {
        path: String,
        name: String,
        key: String,
    },
    #[error("{path}: unexpected structure ({detail})")]
    Structure { path: String, detail: String },
}

/// Load a nested site → sub-site YAML file into flat logical rows.
///
/// The source shape is a sequence of one-entry maps:
///
/// ```yaml
/// - site-a:
///     - hall-west:
///         ip: 10.20.0.0
///         vlan: 100
///     - depot:
///         ip: 10.24.0.0
///         vlan: 500
///         vrf: npflan
/// ```
pub fn load_inventory(path: &Path) -> Result<Vec<LogicalRow>, InventoryError> {
    let display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| InventoryError::Io {
        path: display.clone(),
        source,
    })?;
    parse_inventory(&raw, &display)
}

/// Parse inventory YAML text; `path` is only used in error messages.
pub fn parse_inventory(raw: &str, path: &str) -> Result<Vec<LogicalRow>, InventoryError> {
    let doc: Value = serde_yaml::from_str(raw).map_err(|source| InventoryError::Yaml {
        path: path.to_string(),
        source,
    })?;

    let main_items = doc.as_sequence().ok_or_else(|| structure(path, "top level is not a sequence"))?;

    let mut rows = Vec::new();
    for main_item in main_items {
        let main_map = main_item
            .as_mapping()
            .ok_or_else(|| structure(path, "site entry is not a map"))?;
        for (main_key, main_value) in main_map {
            let main_name = key_str(main_key, path, "site name")?;
            let second_items = main_value
                .as_sequence()
                .ok_or_else(|| structure(path, "site value is not a sequence"))?;
            for second_item in second_items {
                let sec_map = second_item
                    .as_mapping()
                    .ok_or_else(|| structure(path, "sub-site entry is not a map"))?;
                for (sec_key, sec_value) in sec_map {
                    let sec_name = key_str(sec_key, path, "sub-site name")?;
                    rows.push(read_sub_site(path, main_name, sec_name, sec_value)?);
                }
            }
        }
    }
    Ok(rows)
}

fn read_sub_site(
    path: &str,
    main_name: &str,
    sec_name: &str,
    value: &Value,
) -> Result<LogicalRow, InventoryError> {
    let entry = value
        .as_mapping()
        .ok_or_else(|| structure(path, "sub-site value is not a map"))?;

    let ip = entry
        .get(Value::from("ip"))
        .ok_or_else(|| missing(path, sec_name, "ip"))?
        .as_str()
        .ok_or_else(|| bad_value(path, sec_name, "ip"))?
        .to_string();
    let vlan = entry
        .get(Value::from("vlan"))
        .ok_or_else(|| missing(path, sec_name, "vlan"))?
        .as_u64()
        .ok_or_else(|| bad_value(path, sec_name, "vlan"))?;
    let vlan = u32::try_from(vlan).map_err(|_| bad_value(path, sec_name, "vlan"))?;
    let vrf_tag = match entry.get(Value::from("vrf")) {
        Some(value) => Some(
            value
                .as_str()
                .ok_or_else(|| bad_value(path, sec_name, "vrf"))?
                .to_string(),
        ),
        None => None,
    };

    Ok(LogicalRow {
        main_name: main_name.to_string(),
        sec_name: sec_name.to_string(),
        base_ip: ip,
        vlan_base: vlan,
        vrf_tag,
    })
}

fn key_str<'a>(value: &'a Value, path: &str, what: &str) -> Result<&'a str, InventoryError> {
    value
        .as_str()
        .ok_or_else(|| structure(path, &format!("{what} is not a string")))
}

fn structure(path: &str, detail: &str) -> InventoryError {
    InventoryError::Structure {
        path: path.to_string(),
        detail: detail.to_string(),
    }
}

fn missing(path: &str, name: &str, key: &str) -> InventoryError {
    InventoryError::MissingKey {
        path: path.to_string(),
        name: name.to_string(),
        key: key.to_string(),
    }
}

fn bad_value(path: &str, name: &str, key: &str) -> InventoryError {
    InventoryError::BadValue {
        path: path.to_string(),
        name: name.to_string(),
        key: key.to_string(),
    }
}
