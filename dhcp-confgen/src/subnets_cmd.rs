use anyhow::{ensure, Context, Result};
use dhcp_confgen::datafile::read_rows;
use dhcp_confgen::render::{render_filter_summary, render_subnet4_fragment};
use dhcp_confgen::subnet::{build_subnets, SubnetOptions};

use crate::cli::SubnetsArgs;

pub fn run_subnets(args: SubnetsArgs) -> Result<()> {
    ensure!(
        args.ap_controllers.len() <= 63,
        "at most 63 controller addresses fit the vendor option payload"
    );

    let rows = read_rows(&args.file)
        .with_context(|| format!("failed to load inventory CSV {}", args.file.display()))?;

    let opts = SubnetOptions {
        pool_start: args.pool_start,
        filter_roles: !args.no_role_filter,
        mgmt_group: args.mgmt_group,
        ap_controllers: args.ap_controllers,
    };
    let (subnets, stats) = build_subnets(&rows, &opts)?;

    println!("{}", render_subnet4_fragment(&subnets)?);
    eprintln!("{}", render_filter_summary(&stats));
    Ok(())
}
