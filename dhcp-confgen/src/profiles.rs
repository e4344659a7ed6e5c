use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Expansion parameters for one inventory flavor.
///
/// Everything that differed between the original wired and wifi
/// generators lives in this table: the offset list, the three
/// increments, the prefix length applied to bases without an explicit
/// `/len`, and the VLAN group label per offset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OffsetProfile {
    pub name: String,
    pub offsets: Vec<u32>,
    pub vrf_increment: u32,
    pub ip_increment: u32,
    pub vlan_increment: u32,
    pub prefix_len: u8,
    pub vlan_groups: Vec<String>,
}

impl OffsetProfile {
    /// VLAN group for the derived row at `index`.
    ///
    /// A single-entry list is shared by every derived row; otherwise
    /// the list carries one entry per offset (validated on load).
    pub fn vlan_group(&self, index: usize) -> &str {
        if self.vlan_groups.len() == 1 {
            &self.vlan_groups[0]
        } else {
            &self.vlan_groups[index]
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    profile: Vec<OffsetProfile>,
}

/// Errors returned when loading or selecting offset profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profiles file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse profiles file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("profile '{name}' has no offsets")]
    EmptyOffsets { name: String },
    #[error("profile '{name}' offsets must be strictly increasing")]
    OffsetsNotIncreasing { name: String },
    #[error("profile '{name}' has {groups} vlan groups for {offsets} offsets")]
    GroupCountMismatch {
        name: String,
        groups: usize,
        offsets: usize,
    },
    #[error("unknown profile '{name}' (available: {available})")]
    UnknownProfile { name: String, available: String },
}

/// Load offset profiles from a TOML file.
pub fn load_profiles(path: &Path) -> Result<Vec<OffsetProfile>, ProfileError> {
    let raw = fs::read_to_string(path).map_err(|source| ProfileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_profiles(&raw, path.display().to_string())
}

/// Built-in wired/wifi profiles.
pub fn default_profiles() -> Vec<OffsetProfile> {
    let embedded = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/profiles/profiles.toml"
    ));
    match parse_profiles(embedded, "embedded profiles".to_string()) {
        Ok(profiles) if !profiles.is_empty() => profiles,
        _ => fallback_profiles(),
    }
}

/// Use the built-in table unless an override file was given.
pub fn resolve_profiles(path: Option<&Path>) -> Result<Vec<OffsetProfile>, ProfileError> {
    match path {
        Some(path) => load_profiles(path),
        None => Ok(default_profiles()),
    }
}

/// Select a profile by name.
pub fn find_profile<'a>(
    profiles: &'a [OffsetProfile],
    name: &str,
) -> Result<&'a OffsetProfile, ProfileError> {
    profiles.iter().find(|p| p.name == name).ok_or_else(|| {
        let available = profiles
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ProfileError::UnknownProfile {
            name: name.to_string(),
            available,
        }
    })
}

/// Resolve an inventory row's VRF tag to a VRF name.
///
/// Tags come from the optional `vrf` key in the YAML source; an unknown
/// tag aborts the run.
pub fn vrf_name_for_tag(tag: &str) -> Option<&'static str> {
    match tag {
        "npflan" => Some("NPFLAN"),
        "mgmt" => Some("MGMT"),
        "stab" => Some("STAB"),
        "beredskab" => Some("BEREDSKAB"),
        "hotspot" => Some("HOTSPOT"),
        "video" => Some("VIDEO"),
        _ => None,
    }
}

fn parse_profiles(raw: &str, path: String) -> Result<Vec<OffsetProfile>, ProfileError> {
    let parsed: ProfileFile =
        toml::from_str(raw).map_err(|source| ProfileError::Parse { path, source })?;
    for profile in &parsed.profile {
        validate_profile(profile)?;
    }
    Ok(parsed.profile)
}

fn validate_profile(profile: &OffsetProfile) -> Result<(), ProfileError> {
    if profile.offsets.is_empty() {
        return Err(ProfileError::EmptyOffsets {
            name: profile.name.clone(),
        });
    }
    if !profile.offsets.windows(2).all(|w| w[0] < w[1]) {
        return Err(ProfileError::OffsetsNotIncreasing {
            name: profile.name.clone(),
        });
    }
    if profile.vlan_groups.len() != 1 && profile.vlan_groups.len() != profile.offsets.len() {
        return Err(ProfileError::GroupCountMismatch {
            name: profile.name.clone(),
            groups: profile.vlan_groups.len(),
            offsets: profile.offsets.len(),
        });
    }
    Ok(())
}

fn fallback_profiles() -> Vec<OffsetProfile> {
    vec![
        OffsetProfile {
            name: "wired".to_string(),
            offsets: vec![1, 2, 3, 4, 5, 6, 7, 9],
            vrf_increment: 10,
            ip_increment: 10,
            vlan_increment: 10,
            prefix_len: 24,
            vlan_groups: [
                "wireless-ap-mgmt",
                "it-netnisser",
                "STAB",
                "IP Telefoni",
                "Beredskabet",
                "hotspot",
                "Video",
                "Skejser",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
        OffsetProfile {
            name: "wifi".to_string(),
            offsets: vec![0, 1, 2, 3, 4, 5, 6, 7],
            vrf_increment: 10,
            ip_increment: 10,
            vlan_increment: 10,
            prefix_len: 20,
            vlan_groups: vec!["wifi-client-range".to_string()],
        },
    ]
}
