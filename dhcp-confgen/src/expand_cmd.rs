use anyhow::{Context, Result};
use dhcp_confgen::datafile::write_rows;
use dhcp_confgen::expand::{expand_all, SiteLabels};
use dhcp_confgen::inventory::load_inventory;
use dhcp_confgen::profiles::{find_profile, resolve_profiles};
use dhcp_confgen::render::render_expand_summary;

use crate::cli::ExpandArgs;

pub fn run_expand(args: ExpandArgs) -> Result<()> {
    let profiles = resolve_profiles(args.profiles_file.as_deref())?;
    let profile = find_profile(&profiles, &args.profile)?;
    let labels = SiteLabels {
        tenant: args.tenant,
        site: args.site,
    };

    let mut append = args.append;
    let mut total = 0;
    for input in &args.inputs {
        let rows = load_inventory(input)
            .with_context(|| format!("failed to load inventory {}", input.display()))?;
        let expanded = expand_all(&rows, profile, &labels)
            .with_context(|| format!("failed to expand {}", input.display()))?;
        write_rows(&args.output, &expanded, append)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
        append = true;
        total += expanded.len();
    }

    eprintln!("{}", render_expand_summary(total, &args.output));
    Ok(())
}
