use anyhow::Context;

use oderland_core::api::AccountApi;
use oderland_core::config::CacheConfig;
use oderland_core::{domains, list, migrate, path, CacheContext, OderError};

use super::super::args::OdercacheEnableArgs;
use crate::exit_codes::SUCCESS;

fn cache_context() -> anyhow::Result<CacheContext> {
    let home = dirs::home_dir().context("cannot determine the account home directory")?;
    Ok(CacheContext::new(home))
}

pub fn cmd_enable(api: &dyn AccountApi, args: OdercacheEnableArgs) -> anyhow::Result<i32> {
    let ctx = cache_context()?;
    let resolved = domains::resolve_domains(api)?;
    let record = resolved
        .get(&args.domain)
        .ok_or_else(|| OderError::DomainNotFound(args.domain.clone()))?;
    let rel = path::sanitize_rel_path(&args.directory, &record.docroot)?;

    migrate::enable(&ctx, record, &rel)?;

    let mut config = CacheConfig::load(ctx.config_path.clone())?;
    config.add_entry(&args.domain, &rel)?;

    println!(
        "Success: {} of domain {} is now served from the cache area",
        rel, args.domain
    );
    Ok(SUCCESS)
}

pub fn cmd_list(api: &dyn AccountApi) -> anyhow::Result<i32> {
    let ctx = cache_context()?;
    let resolved = domains::resolve_domains(api)?;
    let config = CacheConfig::load(ctx.config_path.clone())?;
    let entries = list::collect(&ctx, &config, &resolved)?;
    print!("{}", list::render_report(&entries));
    Ok(SUCCESS)
}
