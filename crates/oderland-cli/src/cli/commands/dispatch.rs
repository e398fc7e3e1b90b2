use oderland_core::api::UapiClient;

use super::super::args::{Cli, Command};

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let api = UapiClient::new();
    match cli.cmd {
        Command::OdercacheEnable(args) => super::odercache::cmd_enable(&api, args),
        Command::OdercacheList => super::odercache::cmd_list(&api),
        Command::AddAddonDomain(args) => super::provision::cmd_add_addon_domain(&api, args),
        Command::CreateDatabase(args) => super::provision::cmd_create_database(&api, args),
        Command::CreateDatabaseUser(args) => super::provision::cmd_create_database_user(&api, args),
        Command::SetDatabasePrivileges(args) => {
            super::provision::cmd_set_database_privileges(&api, args)
        }
    }
}
