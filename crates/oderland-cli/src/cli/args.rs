use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "oderland",
    version,
    about = "Oderland hosting-account administration — cPanel provisioning and the odercache directory cache"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Move a docroot subdirectory onto the cache area and symlink it back
    OdercacheEnable(OdercacheEnableArgs),
    /// Report every cached directory with its on-disk size
    OdercacheList,
    /// Add an addon domain to the account
    AddAddonDomain(AddAddonDomainArgs),
    /// Create a MySQL database
    CreateDatabase(CreateDatabaseArgs),
    /// Create a MySQL database user
    CreateDatabaseUser(CreateDatabaseUserArgs),
    /// Grant all privileges on a database to a user
    SetDatabasePrivileges(SetDatabasePrivilegesArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct OdercacheEnableArgs {
    /// Domain the directory belongs to
    pub domain: String,
    /// Directory to cache, relative to the domain's document root
    pub directory: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AddAddonDomainArgs {
    /// The addon domain
    pub domain: String,
    /// Path to the public directory
    pub directory: String,
    /// Subdomain to create on the main domain (defaults to the addon domain)
    #[arg(long)]
    pub subdomain: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CreateDatabaseArgs {
    /// The database name
    pub dbname: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CreateDatabaseUserArgs {
    /// The database username
    pub username: String,
    /// The database user password
    pub password: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SetDatabasePrivilegesArgs {
    /// The database username
    pub username: String,
    /// The database
    pub database: String,
}
