use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "dhcp-confgen")]
#[command(about = "Expand network-inventory data into DHCP subnet configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Expand site/VLAN YAML files into the CSV intermediate format.
    Expand(ExpandArgs),
    /// Format a prefix inventory CSV as a Kea subnet4 fragment.
    Subnets(SubnetsArgs),
    /// Run the full pipeline: YAML inputs to CSV to subnet4 fragment.
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
pub struct ExpandArgs {
    /// YAML inventory file(s), expanded in order.
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Offset profile applied to every input (for example wired, wifi).
    #[arg(long)]
    pub profile: String,
    /// CSV intermediate file to write.
    #[arg(short, long, default_value = "data.csv")]
    pub output: PathBuf,
    /// Append to an existing CSV instead of writing a new header.
    #[arg(long)]
    pub append: bool,
    /// Tenant label stamped on every row.
    #[arg(long, default_value = "SL2022")]
    pub tenant: String,
    /// Site slug stamped on every row.
    #[arg(long, default_value = "sl2022")]
    pub site: String,
    /// Optional offset-profile TOML file overriding the built-in table.
    #[arg(long)]
    pub profiles_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct SubnetsArgs {
    /// Prefix inventory CSV file.
    pub file: PathBuf,
    /// First pool address index inside each subnet.
    #[arg(long, default_value_t = 11)]
    pub pool_start: u64,
    /// Disable the role/description allow-list filter.
    #[arg(long)]
    pub no_role_filter: bool,
    /// Wireless controller address(es) for the management-group vendor option.
    #[arg(long = "ap-controller")]
    pub ap_controllers: Vec<Ipv4Addr>,
    /// VLAN group whose subnets receive the controller vendor option.
    #[arg(long, default_value = "wireless-ap-mgmt")]
    pub mgmt_group: String,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Wired site/VLAN YAML file.
    #[arg(long, required_unless_present = "wifi")]
    pub wired: Option<PathBuf>,
    /// Wifi site/VLAN YAML file.
    #[arg(long, required_unless_present = "wired")]
    pub wifi: Option<PathBuf>,
    /// CSV intermediate file written between the two stages.
    #[arg(long, default_value = "data.csv")]
    pub data_file: PathBuf,
    /// First pool address index inside each subnet.
    #[arg(long, default_value_t = 11)]
    pub pool_start: u64,
    /// Wireless controller address(es) for the management-group vendor option.
    #[arg(long = "ap-controller")]
    pub ap_controllers: Vec<Ipv4Addr>,
    /// VLAN group whose subnets receive the controller vendor option.
    #[arg(long, default_value = "wireless-ap-mgmt")]
    pub mgmt_group: String,
    /// Tenant label stamped on every row.
    #[arg(long, default_value = "SL2022")]
    pub tenant: String,
    /// Site slug stamped on every row.
    #[arg(long, default_value = "sl2022")]
    pub site: String,
    /// Optional offset-profile TOML file overriding the built-in table.
    #[arg(long)]
    pub profiles_file: Option<PathBuf>,
}
