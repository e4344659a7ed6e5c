use subnet_core::Ipv4Net;

/// One site/sub-site pairing from the YAML source, before expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalRow {
    pub main_name: String,
    pub sec_name: String,
    /// Dotted quad, optionally carrying an explicit `/len`.
    pub base_ip: String,
    pub vlan_base: u32,
    /// Optional VRF tag resolved through the static tag table.
    pub vrf_tag: Option<String>,
}

/// One derived subnet record, as stored in the CSV intermediate file.
///
/// Column order in the file matches field order here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedRow {
    pub prefix: Ipv4Net,
    pub vrf: String,
    pub tenant: String,
    pub site: String,
    pub vlan_group: String,
    pub vlan: u32,
    pub status: String,
    pub role: String,
    pub is_pool: String,
    pub description: String,
}
