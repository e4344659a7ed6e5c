use std::net::Ipv4Addr;

use subnet_core::{Ipv4Net, NetError};
use thiserror::Error;

use crate::model::{ExpandedRow, LogicalRow};
use crate::profiles::{vrf_name_for_tag, OffsetProfile};

/// Values the generator stamps on every derived row.
const STATUS_ACTIVE: &str = "Active";
const ROLE_GENERATED: &str = "n/a";

/// Labels stamped into the tenant/site columns of every derived row.
#[derive(Debug, Clone)]
pub struct SiteLabels {
    pub tenant: String,
    pub site: String,
}

/// Errors from expanding logical rows into subnet records.
#[derive(Debug, Error)]
pub enum ExpandError {
    #[error("invalid base address '{0}'")]
    InvalidBaseAddress(String),
    /// The inventory only covers 10.0.0.0/8; anything else is a typo.
    #[error("unexpected first octet {0} in '{1}' (expected 10)")]
    UnexpectedFirstOctet(u8, String),
    #[error("third octet overflow in '{base_ip}': {octet} + {delta} exceeds 255")]
    OctetOverflow {
        base_ip: String,
        octet: u8,
        delta: u32,
    },
    #[error("unknown vrf tag '{0}'")]
    UnknownVrfTag(String),
    #[error(transparent)]
    Net(#[from] NetError),
}

/// Expand every logical row with the given profile.
pub fn expand_all(
    rows: &[LogicalRow],
    profile: &OffsetProfile,
    labels: &SiteLabels,
) -> Result<Vec<ExpandedRow>, ExpandError> {
    let mut out = Vec::with_capacity(rows.len() * profile.offsets.len());
    for row in rows {
        out.extend(expand_row(row, profile, labels)?);
    }
    Ok(out)
}

/// Derive one subnet record per profile offset for a single logical row.
///
/// The offset times `ip_increment` is added to the base address's third
/// octet and the result is masked to a network at the row's prefix
/// length (the base's own `/len` when present, else the profile's).
/// VLAN id and VRF name are derived from the same offset with their own
/// increments; a `vrf` tag on the row overrides the derived VRF name
/// for every record.
pub fn expand_row(
    row: &LogicalRow,
    profile: &OffsetProfile,
    labels: &SiteLabels,
) -> Result<Vec<ExpandedRow>, ExpandError> {
    let (octets, explicit_len) = parse_base(&row.base_ip)?;
    if octets[0] != 10 {
        return Err(ExpandError::UnexpectedFirstOctet(
            octets[0],
            row.base_ip.clone(),
        ));
    }
    let prefix_len = explicit_len.unwrap_or(profile.prefix_len);

    let vrf_override = match &row.vrf_tag {
        Some(tag) => Some(
            vrf_name_for_tag(tag).ok_or_else(|| ExpandError::UnknownVrfTag(tag.clone()))?,
        ),
        None => None,
    };

    let mut out = Vec::with_capacity(profile.offsets.len());
    for (index, &offset) in profile.offsets.iter().enumerate() {
        let delta = offset * profile.ip_increment;
        let third =
            u8::try_from(u32::from(octets[2]) + delta).map_err(|_| ExpandError::OctetOverflow {
                base_ip: row.base_ip.clone(),
                octet: octets[2],
                delta,
            })?;
        let addr = Ipv4Addr::new(octets[0], octets[1], third, octets[3]);
        let prefix = Ipv4Net::new(addr, prefix_len)?;

        let vrf = match vrf_override {
            Some(name) => name.to_string(),
            None => format!("VRF{}", offset * profile.vrf_increment),
        };

        out.push(ExpandedRow {
            prefix,
            vrf,
            tenant: labels.tenant.clone(),
            site: labels.site.clone(),
            vlan_group: profile.vlan_group(index).to_string(),
            vlan: row.vlan_base + offset * profile.vlan_increment,
            status: STATUS_ACTIVE.to_string(),
            role: ROLE_GENERATED.to_string(),
            is_pool: String::new(),
            description: format!("{} - {}", row.main_name, row.sec_name),
        });
    }
    Ok(out)
}

/// Split a base value into octets and an optional explicit prefix length.
fn parse_base(base: &str) -> Result<([u8; 4], Option<u8>), ExpandError> {
    let invalid = || ExpandError::InvalidBaseAddress(base.to_string());

    let (addr_part, len) = match base.trim().split_once('/') {
        Some((addr, len)) => {
            let len: u8 = len.parse().map_err(|_| invalid())?;
            (addr, Some(len))
        }
        None => (base.trim(), None),
    };

    let addr: Ipv4Addr = addr_part.parse().map_err(|_| invalid())?;
    Ok((addr.octets(), len))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::profiles::{default_profiles, find_profile};

    fn labels() -> SiteLabels {
        SiteLabels {
            tenant: "SL2022".to_string(),
            site: "sl2022".to_string(),
        }
    }

    fn row(base_ip: &str, vlan_base: u32) -> LogicalRow {
        LogicalRow {
            main_name: "koldby".to_string(),
            sec_name: "hal-a".to_string(),
            base_ip: base_ip.to_string(),
            vlan_base,
            vrf_tag: None,
        }
    }

    #[test]
    fn wired_expansion_yields_eight_rows_with_increasing_third_octets() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let rows = expand_row(&row("10.20.0.0", 100), wired, &labels()).expect("expand");

        assert_eq!(rows.len(), 8);
        let thirds: Vec<u8> = rows.iter().map(|r| r.prefix.network().octets()[2]).collect();
        assert_eq!(thirds, vec![10, 20, 30, 40, 50, 60, 70, 90]);
        assert!(thirds.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn offset_two_with_increment_ten_derives_third_octet_forty() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let rows = expand_row(&row("10.20.0.0", 100), wired, &labels()).expect("expand");

        // offsets[1] == 2, so the second record is 20 + 2*10 = 40
        assert_eq!(rows[1].prefix.to_string(), "10.20.40.0/24");
        assert_eq!(rows[1].vrf, "VRF20");
        assert_eq!(rows[1].vlan, 120);
        assert_eq!(rows[1].vlan_group, "it-netnisser");
    }

    #[test]
    fn derived_records_carry_fixed_columns() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let rows = expand_row(&row("10.20.0.0", 100), wired, &labels()).expect("expand");

        for r in &rows {
            assert_eq!(r.tenant, "SL2022");
            assert_eq!(r.site, "sl2022");
            assert_eq!(r.status, "Active");
            assert_eq!(r.role, "n/a");
            assert_eq!(r.is_pool, "");
            assert_eq!(r.description, "koldby - hal-a");
        }
    }

    #[test]
    fn wifi_profile_masks_to_slash_twenty_networks() {
        let profiles = default_profiles();
        let wifi = find_profile(&profiles, "wifi").unwrap();
        let rows = expand_row(&row("10.128.0.0", 1000), wifi, &labels()).expect("expand");

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].prefix.to_string(), "10.128.0.0/20");
        assert_eq!(rows[0].vrf, "VRF0");
        assert_eq!(rows[0].vlan, 1000);
        // third octet 70 masks down to the /20 boundary at 64
        assert_eq!(rows[7].prefix.to_string(), "10.128.64.0/20");
        for r in &rows {
            assert_eq!(r.vlan_group, "wifi-client-range");
        }
    }

    #[test]
    fn explicit_prefix_length_on_base_wins_over_profile() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let rows = expand_row(&row("10.20.0.0/30", 100), wired, &labels()).expect("expand");
        assert_eq!(rows[0].prefix.to_string(), "10.20.10.0/30");
    }

    #[test]
    fn non_ten_first_octet_aborts() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let err = expand_row(&row("192.168.0.0", 100), wired, &labels()).expect_err("should fail");
        assert!(matches!(err, ExpandError::UnexpectedFirstOctet(192, _)));
    }

    #[test]
    fn third_octet_overflow_aborts() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let err = expand_row(&row("10.20.250.0", 100), wired, &labels()).expect_err("should fail");
        assert!(matches!(err, ExpandError::OctetOverflow { .. }));
    }

    #[test]
    fn vrf_tag_overrides_derived_name() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let tagged = LogicalRow {
            vrf_tag: Some("npflan".to_string()),
            ..row("10.24.0.0", 500)
        };
        let rows = expand_row(&tagged, wired, &labels()).expect("expand");
        assert!(rows.iter().all(|r| r.vrf == "NPFLAN"));
    }

    #[test]
    fn unknown_vrf_tag_aborts() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let tagged = LogicalRow {
            vrf_tag: Some("nope".to_string()),
            ..row("10.24.0.0", 500)
        };
        let err = expand_row(&tagged, wired, &labels()).expect_err("should fail");
        assert!(matches!(err, ExpandError::UnknownVrfTag(ref tag) if tag == "nope"));
    }

    #[test]
    fn expand_all_flattens_every_logical_row() {
        let profiles = default_profiles();
        let wired = find_profile(&profiles, "wired").unwrap();
        let rows = vec![row("10.20.0.0", 100), row("10.21.0.0", 300)];
        let expanded = expand_all(&rows, wired, &labels()).expect("expand");
        assert_eq!(expanded.len(), 16);
    }
}
