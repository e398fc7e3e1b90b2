//! One-shot provisioning calls against the control panel API. Thin by
//! design: resolve the account restrictions, adjust the requested name, fire
//! the call, report.

use oderland_core::api::AccountApi;

use super::super::args::{
    AddAddonDomainArgs, CreateDatabaseArgs, CreateDatabaseUserArgs, SetDatabasePrivilegesArgs,
};
use crate::exit_codes::SUCCESS;

pub fn cmd_add_addon_domain(api: &dyn AccountApi, args: AddAddonDomainArgs) -> anyhow::Result<i32> {
    let subdomain = args.subdomain.as_deref().unwrap_or(&args.domain);
    api.add_addon_domain(&args.domain, &args.directory, subdomain)?;
    println!(
        "Success: addon domain was added: {} with document root: {}",
        args.domain, args.directory
    );
    Ok(SUCCESS)
}

pub fn cmd_create_database(api: &dyn AccountApi, args: CreateDatabaseArgs) -> anyhow::Result<i32> {
    let restrictions = api.restrictions()?;
    let dbname = apply_name_restrictions(
        &args.dbname,
        &restrictions.prefix,
        restrictions.max_database_name_length,
        "Database name",
    );
    api.create_database(&dbname)?;
    println!("Success: created database: {dbname}");
    Ok(SUCCESS)
}

pub fn cmd_create_database_user(
    api: &dyn AccountApi,
    args: CreateDatabaseUserArgs,
) -> anyhow::Result<i32> {
    let restrictions = api.restrictions()?;
    let username = apply_name_restrictions(
        &args.username,
        &restrictions.prefix,
        restrictions.max_username_length,
        "Database username",
    );
    api.create_database_user(&username, &args.password)?;
    println!("Success: created database user: {username}");
    Ok(SUCCESS)
}

pub fn cmd_set_database_privileges(
    api: &dyn AccountApi,
    args: SetDatabasePrivilegesArgs,
) -> anyhow::Result<i32> {
    api.set_database_privileges(&args.username, &args.database)?;
    println!(
        "Success: set all privileges for user: {} on database {}",
        args.username, args.database
    );
    Ok(SUCCESS)
}

/// Accounts must prefix database and user names; names beyond the account
/// maximum get truncated. Both adjustments warn rather than fail.
fn apply_name_restrictions(raw: &str, prefix: &str, max_len: usize, what: &str) -> String {
    let mut name = raw.to_string();
    if !name.starts_with(prefix) {
        eprintln!("Warning: {what} has to be prefixed with: {prefix}");
        name = format!("{prefix}{name}");
    }
    if name.len() > max_len {
        eprintln!("Warning: {what} max length is {max_len}");
        let mut cut = max_len;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    name
}
