//! Domain resolution against the account API.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::api::AccountApi;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Main,
    Parked,
    Addon,
    Sub,
}

/// One domain on the account, produced fresh on every resolve.
#[derive(Debug, Clone)]
pub struct DomainRecord {
    pub docroot: PathBuf,
    pub kind: DomainKind,
}

/// Flattens the account's domains into one map keyed by domain name.
///
/// Parked domains inherit the main domain's document root; addon and sub
/// domains carry their own. Insertion order is main, parked, addon, sub, and
/// a name collision overwrites the earlier entry.
pub fn resolve_domains(api: &dyn AccountApi) -> Result<BTreeMap<String, DomainRecord>> {
    let data = api.domains_data()?;
    let main_docroot = PathBuf::from(&data.main_domain.documentroot);

    let mut out = BTreeMap::new();
    out.insert(
        data.main_domain.domain.clone(),
        DomainRecord {
            docroot: main_docroot.clone(),
            kind: DomainKind::Main,
        },
    );
    for parked in &data.parked_domains {
        out.insert(
            parked.clone(),
            DomainRecord {
                docroot: main_docroot.clone(),
                kind: DomainKind::Parked,
            },
        );
    }
    for addon in &data.addon_domains {
        out.insert(
            addon.domain.clone(),
            DomainRecord {
                docroot: PathBuf::from(&addon.documentroot),
                kind: DomainKind::Addon,
            },
        );
    }
    for sub in &data.sub_domains {
        out.insert(
            sub.domain.clone(),
            DomainRecord {
                docroot: PathBuf::from(&sub.documentroot),
                kind: DomainKind::Sub,
            },
        );
    }
    Ok(out)
}
