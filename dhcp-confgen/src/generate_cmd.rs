use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use dhcp_confgen::datafile::{read_rows, write_rows};
use dhcp_confgen::expand::{expand_all, SiteLabels};
use dhcp_confgen::inventory::load_inventory;
use dhcp_confgen::profiles::{find_profile, resolve_profiles};
use dhcp_confgen::render::{render_filter_summary, render_subnet4_fragment};
use dhcp_confgen::subnet::{build_subnets, SubnetOptions};

use crate::cli::GenerateArgs;

/// Full pipeline: expand the YAML inputs into the CSV intermediate
/// file, then read it back and print the subnet4 fragment. Generated
/// rows carry role "n/a", so no role filtering is applied here.
pub fn run_generate(args: GenerateArgs) -> Result<()> {
    ensure!(
        args.ap_controllers.len() <= 63,
        "at most 63 controller addresses fit the vendor option payload"
    );

    let profiles = resolve_profiles(args.profiles_file.as_deref())?;
    let labels = SiteLabels {
        tenant: args.tenant,
        site: args.site,
    };

    let inputs: Vec<(PathBuf, &str)> = [(args.wired, "wired"), (args.wifi, "wifi")]
        .into_iter()
        .filter_map(|(path, profile)| path.map(|p| (p, profile)))
        .collect();

    let mut append = false;
    for (input, profile_name) in &inputs {
        let profile = find_profile(&profiles, profile_name)?;
        let rows = load_inventory(input)
            .with_context(|| format!("failed to load inventory {}", input.display()))?;
        let expanded = expand_all(&rows, profile, &labels)
            .with_context(|| format!("failed to expand {}", input.display()))?;
        write_rows(&args.data_file, &expanded, append)
            .with_context(|| format!("failed to write {}", args.data_file.display()))?;
        append = true;
    }

    // The fragment is always built from the re-read data file, the
    // same records a standalone `subnets` run would see.
    let rows = read_rows(&args.data_file)
        .with_context(|| format!("failed to re-read {}", args.data_file.display()))?;

    let opts = SubnetOptions {
        pool_start: args.pool_start,
        filter_roles: false,
        mgmt_group: args.mgmt_group,
        ap_controllers: args.ap_controllers,
    };
    let (subnets, stats) = build_subnets(&rows, &opts)?;

    println!("{}", render_subnet4_fragment(&subnets)?);
    eprintln!("{}", render_filter_summary(&stats));
    Ok(())
}
