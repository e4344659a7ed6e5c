use std::net::Ipv4Addr;

use serde::Serialize;
use subnet_core::NetError;

use crate::model::ExpandedRow;

/// Roles the inventory filter accepts, lowercase. Both spacings of
/// the management role appear in real exports.
const ALLOWED_ROLES: [&str; 7] = [
    "access",
    "wireless",
    "management  netværk",
    "management netværk",
    "cctv",
    "management access points",
    "environment",
];

/// Descriptions excluded even when the role matches, lowercase.
const EXCLUDED_DESCRIPTIONS: [&str; 1] = ["wireless networks"];

/// Longest prefix that still yields a subnet block.
const MAX_PREFIX_LEN: u8 = 24;

/// First pool address index inside a subnet.
pub const DEFAULT_POOL_START: u64 = 11;

/// Distance of the last pool address from the end of the subnet
/// (broadcast and a handful of reserved top addresses stay out).
const POOL_END_BACKOFF: u64 = 6;

/// VLAN group whose subnets receive the controller vendor option.
pub const DEFAULT_MGMT_GROUP: &str = "wireless-ap-mgmt";

const VENDOR_OPTION_SPACE: &str = "dhcp4";
const VENDOR_OPTION_NAME: &str = "vendor-encapsulated-options";
const VENDOR_OPTION_CODE: u16 = 43;

/// One `subnet4` block of the output fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetConfig {
    pub subnet: String,
    pub pools: Vec<PoolEntry>,
    pub relay: RelayAddress,
    #[serde(rename = "option-data")]
    pub option_data: Vec<OptionData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolEntry {
    pub pool: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayAddress {
    #[serde(rename = "ip-address")]
    pub ip_address: String,
}

/// An option-data entry: either a plain named option or an
/// encapsulated vendor option addressed by space and code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionData {
    Named {
        name: String,
        data: String,
    },
    Encapsulated {
        space: String,
        #[serde(rename = "csv-format")]
        csv_format: bool,
        name: String,
        code: u16,
        data: String,
    },
}

/// Knobs for the filter/formatter stage.
#[derive(Debug, Clone)]
pub struct SubnetOptions {
    pub pool_start: u64,
    pub filter_roles: bool,
    pub mgmt_group: String,
    pub ap_controllers: Vec<Ipv4Addr>,
}

impl Default for SubnetOptions {
    fn default() -> Self {
        Self {
            pool_start: DEFAULT_POOL_START,
            filter_roles: true,
            mgmt_group: DEFAULT_MGMT_GROUP.to_string(),
            ap_controllers: Vec::new(),
        }
    }
}

/// What the filter did across a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub emitted: usize,
    pub role_filtered: usize,
    pub prefix_skipped: usize,
}

/// Build subnet blocks for every row that survives filtering.
pub fn build_subnets(
    rows: &[ExpandedRow],
    opts: &SubnetOptions,
) -> Result<(Vec<SubnetConfig>, FilterStats), NetError> {
    let mut out = Vec::new();
    let mut stats = FilterStats::default();
    for row in rows {
        if opts.filter_roles && !role_accepted(row) {
            stats.role_filtered += 1;
            continue;
        }
        if row.prefix.prefix_len() > MAX_PREFIX_LEN {
            stats.prefix_skipped += 1;
            continue;
        }
        out.push(subnet_for_row(row, opts)?);
        stats.emitted += 1;
    }
    Ok((out, stats))
}

/// Format one accepted row as a subnet block.
///
/// The pool runs from `pool_start` to six addresses below the end of
/// the subnet; the relay and routers option both point at the first
/// host address.
pub fn subnet_for_row(row: &ExpandedRow, opts: &SubnetOptions) -> Result<SubnetConfig, NetError> {
    let net = row.prefix;
    let pool_start = net.addr_at(opts.pool_start)?;
    let pool_end = net.addr_at(net.num_addresses() - POOL_END_BACKOFF)?;
    let first_host = net.addr_at(1)?;

    let mut option_data = vec![OptionData::Named {
        name: "routers".to_string(),
        data: first_host.to_string(),
    }];
    if row.vlan_group == opts.mgmt_group && !opts.ap_controllers.is_empty() {
        option_data.push(OptionData::Encapsulated {
            space: VENDOR_OPTION_SPACE.to_string(),
            csv_format: false,
            name: VENDOR_OPTION_NAME.to_string(),
            code: VENDOR_OPTION_CODE,
            data: controller_option_payload(&opts.ap_controllers),
        });
    }

    Ok(SubnetConfig {
        subnet: net.to_string(),
        pools: vec![PoolEntry {
            pool: format!("{pool_start}-{pool_end}"),
        }],
        relay: RelayAddress {
            ip_address: first_host.to_string(),
        },
        option_data,
    })
}

fn role_accepted(row: &ExpandedRow) -> bool {
    let role = row.role.to_lowercase();
    if !ALLOWED_ROLES.contains(&role.as_str()) {
        return false;
    }
    let description = row.description.to_lowercase();
    !EXCLUDED_DESCRIPTIONS.contains(&description.as_str())
}

/// Hex TLV payload for the encapsulated controller-list option:
/// sub-option 1, length 4n, then each controller's four octets.
fn controller_option_payload(controllers: &[Ipv4Addr]) -> String {
    let mut bytes = Vec::with_capacity(2 + controllers.len() * 4);
    bytes.push(0x01);
    bytes.push((controllers.len() * 4) as u8);
    for ip in controllers {
        bytes.extend_from_slice(&ip.octets());
    }
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn inventory_row(prefix: &str, role: &str, description: &str) -> ExpandedRow {
        ExpandedRow {
            prefix: prefix.parse().unwrap(),
            vrf: "NPFLAN".to_string(),
            tenant: String::new(),
            site: "npflan".to_string(),
            vlan_group: "access-sw1".to_string(),
            vlan: 310,
            status: "Active".to_string(),
            role: role.to_string(),
            is_pool: String::new(),
            description: description.to_string(),
        }
    }

    #[test]
    fn formats_pool_relay_and_routers() {
        let row = inventory_row("10.1.0.0/24", "Access", "Hal A vest");
        let subnet = subnet_for_row(&row, &SubnetOptions::default()).expect("format");
        assert_eq!(subnet.subnet, "10.1.0.0/24");
        assert_eq!(subnet.pools[0].pool, "10.1.0.11-10.1.0.250");
        assert_eq!(subnet.relay.ip_address, "10.1.0.1");
        assert_eq!(
            subnet.option_data,
            vec![OptionData::Named {
                name: "routers".to_string(),
                data: "10.1.0.1".to_string(),
            }]
        );
    }

    #[test]
    fn pool_end_scales_with_prefix_length() {
        let row = inventory_row("10.128.0.0/20", "Wireless", "Hal A wifi");
        let subnet = subnet_for_row(&row, &SubnetOptions::default()).expect("format");
        // /20 holds 4096 addresses; the pool ends 6 below the top
        assert_eq!(subnet.pools[0].pool, "10.128.0.11-10.128.15.250");
    }

    #[test]
    fn role_filter_is_case_insensitive() {
        let rows = vec![
            inventory_row("10.1.0.0/24", "ACCESS", "Hal A vest"),
            inventory_row("10.2.0.0/24", "Management Netværk", "AP mgmt"),
            inventory_row("10.3.0.0/24", "Firewall Net", "AVATAR Inside"),
        ];
        let (subnets, stats) = build_subnets(&rows, &SubnetOptions::default()).expect("build");
        assert_eq!(subnets.len(), 2);
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.role_filtered, 1);
    }

    #[test]
    fn excluded_description_beats_accepted_role() {
        let rows = vec![inventory_row("10.3.0.0/24", "Wireless", "Wireless Networks")];
        let (subnets, stats) = build_subnets(&rows, &SubnetOptions::default()).expect("build");
        assert!(subnets.is_empty());
        assert_eq!(stats.role_filtered, 1);
    }

    #[test]
    fn long_prefixes_are_skipped_even_without_role_filter() {
        let rows = vec![
            inventory_row("10.4.0.0/25", "Access", "Kamera net"),
            inventory_row("10.0.0.0/30", "Access", "core link"),
        ];
        let opts = SubnetOptions {
            filter_roles: false,
            ..SubnetOptions::default()
        };
        let (subnets, stats) = build_subnets(&rows, &opts).expect("build");
        assert!(subnets.is_empty());
        assert_eq!(stats.prefix_skipped, 2);
    }

    #[test]
    fn disabled_role_filter_keeps_everything_at_or_below_24() {
        let rows = vec![inventory_row("10.3.0.0/24", "Firewall Net", "AVATAR Inside")];
        let opts = SubnetOptions {
            filter_roles: false,
            ..SubnetOptions::default()
        };
        let (subnets, _) = build_subnets(&rows, &opts).expect("build");
        assert_eq!(subnets.len(), 1);
    }

    #[test]
    fn mgmt_group_gets_encapsulated_controller_option() {
        let mut row = inventory_row("10.2.0.0/24", "Management Netværk", "AP mgmt");
        row.vlan_group = DEFAULT_MGMT_GROUP.to_string();
        let opts = SubnetOptions {
            ap_controllers: vec![Ipv4Addr::new(10, 2, 0, 5)],
            ..SubnetOptions::default()
        };
        let subnet = subnet_for_row(&row, &opts).expect("format");
        assert_eq!(subnet.option_data.len(), 2);
        assert_eq!(
            subnet.option_data[1],
            OptionData::Encapsulated {
                space: "dhcp4".to_string(),
                csv_format: false,
                name: "vendor-encapsulated-options".to_string(),
                code: 43,
                data: "01040a020005".to_string(),
            }
        );
    }

    #[test]
    fn controller_payload_concatenates_addresses() {
        let payload = controller_option_payload(&[
            Ipv4Addr::new(10, 2, 0, 5),
            Ipv4Addr::new(10, 2, 0, 6),
        ]);
        assert_eq!(payload, "01080a0200050a020006");
    }

    #[test]
    fn non_mgmt_groups_never_get_the_vendor_option() {
        let row = inventory_row("10.1.0.0/24", "Access", "Hal A vest");
        let opts = SubnetOptions {
            ap_controllers: vec![Ipv4Addr::new(10, 2, 0, 5)],
            ..SubnetOptions::default()
        };
        let subnet = subnet_for_row(&row, &opts).expect("format");
        assert_eq!(subnet.option_data.len(), 1);
    }

    #[test]
    fn serializes_with_kea_field_names() {
        let row = inventory_row("10.1.0.0/24", "Access", "Hal A vest");
        let subnet = subnet_for_row(&row, &SubnetOptions::default()).expect("format");
        let json = serde_json::to_value(&subnet).expect("serialize");
        assert_eq!(json["subnet"], "10.1.0.0/24");
        assert_eq!(json["pools"][0]["pool"], "10.1.0.11-10.1.0.250");
        assert_eq!(json["relay"]["ip-address"], "10.1.0.1");
        assert_eq!(json["option-data"][0]["name"], "routers");
        assert_eq!(json["option-data"][0]["data"], "10.1.0.1");
    }
}
