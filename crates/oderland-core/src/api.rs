//! Client for the control panel's CLI APIs.
//!
//! cPanel exposes two command-line entry points with different JSON
//! envelopes: `uapi` (`result.status` / `result.errors` / `result.data`) and
//! the older `cpapi2` (`cpanelresult.data[0].result` / `cpanelresult.error`).
//! Both are invoked with `--output=json` and parsed from stdout. Any spawn
//! failure, non-JSON output, or unexpected envelope shape is
//! [`OderError::ExternalApiError`] — the caller never retries.

use std::path::PathBuf;
use std::process::Command;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{OderError, Result};

const UAPI_BIN: &str = "/usr/bin/uapi";
const CPAPI2_BIN: &str = "/usr/bin/cpapi2";

/// One row of `DomainInfo domains_data` carrying its own document root.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    pub domain: String,
    pub documentroot: String,
}

/// Payload of `uapi DomainInfo domains_data`. Parked domains are bare names
/// and serve out of the main domain's document root.
#[derive(Debug, Clone, Deserialize)]
pub struct DomainsData {
    pub main_domain: DomainEntry,
    #[serde(default)]
    pub parked_domains: Vec<String>,
    #[serde(default)]
    pub addon_domains: Vec<DomainEntry>,
    #[serde(default)]
    pub sub_domains: Vec<DomainEntry>,
}

/// Payload of `uapi Mysql get_restrictions`.
#[derive(Debug, Clone, Deserialize)]
pub struct Restrictions {
    pub prefix: String,
    pub max_username_length: usize,
    pub max_database_name_length: usize,
}

/// Account API surface the rest of the crate depends on. The CLI wires in
/// [`UapiClient`]; tests substitute an in-memory fake.
pub trait AccountApi {
    fn domains_data(&self) -> Result<DomainsData>;
    fn restrictions(&self) -> Result<Restrictions>;
    fn create_database(&self, name: &str) -> Result<()>;
    fn create_database_user(&self, name: &str, password: &str) -> Result<()>;
    fn set_database_privileges(&self, user: &str, database: &str) -> Result<()>;
    fn add_addon_domain(&self, domain: &str, directory: &str, subdomain: &str) -> Result<()>;
}

/// Real client shelling out to the control panel binaries.
pub struct UapiClient {
    uapi: PathBuf,
    cpapi2: PathBuf,
}

impl UapiClient {
    /// Binary paths default to the stock cPanel locations and can be
    /// overridden through `ODERLAND_UAPI` / `ODERLAND_CPAPI2` (used by the
    /// integration tests).
    pub fn new() -> Self {
        Self {
            uapi: std::env::var_os("ODERLAND_UAPI")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(UAPI_BIN)),
            cpapi2: std::env::var_os("ODERLAND_CPAPI2")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(CPAPI2_BIN)),
        }
    }

    fn run_uapi(&self, args: &[&str]) -> Result<Value> {
        let raw = run_command(&self.uapi, args)?;
        parse_uapi_envelope(&raw)
    }

    fn run_cpapi2(&self, args: &[&str]) -> Result<Value> {
        let raw = run_command(&self.cpapi2, args)?;
        parse_cpapi2_envelope(&raw)
    }
}

impl Default for UapiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountApi for UapiClient {
    fn domains_data(&self) -> Result<DomainsData> {
        let data = self.run_uapi(&["DomainInfo", "domains_data", "--output=json"])?;
        serde_json::from_value(data).map_err(|e| {
            OderError::ExternalApiError(format!("unexpected domains_data shape: {e}"))
        })
    }

    fn restrictions(&self) -> Result<Restrictions> {
        let data = self.run_uapi(&["Mysql", "get_restrictions", "--output=json"])?;
        serde_json::from_value(data).map_err(|e| {
            OderError::ExternalApiError(format!("unexpected get_restrictions shape: {e}"))
        })
    }

    fn create_database(&self, name: &str) -> Result<()> {
        let name = scrub_arg(name);
        self.run_uapi(&[
            "Mysql",
            "create_database",
            &format!("name={name}"),
            "--output=json",
        ])?;
        Ok(())
    }

    fn create_database_user(&self, name: &str, password: &str) -> Result<()> {
        let name = scrub_arg(name);
        self.run_uapi(&[
            "Mysql",
            "create_user",
            &format!("name={name}"),
            &format!("password={password}"),
            "--output=json",
        ])?;
        Ok(())
    }

    fn set_database_privileges(&self, user: &str, database: &str) -> Result<()> {
        let user = scrub_arg(user);
        let database = scrub_arg(database);
        self.run_uapi(&[
            "Mysql",
            "set_privileges_on_database",
            &format!("user={user}"),
            &format!("database={database}"),
            "privileges=ALL PRIVILEGES",
            "--output=json",
        ])?;
        Ok(())
    }

    fn add_addon_domain(&self, domain: &str, directory: &str, subdomain: &str) -> Result<()> {
        // cpapi2 expects URI-encoded values.
        let domain = urlencode(&scrub_arg(domain));
        let directory = urlencode(&scrub_arg(directory));
        let subdomain = urlencode(&scrub_arg(subdomain));
        self.run_cpapi2(&[
            "AddonDomain",
            "addaddondomain",
            &format!("dir={directory}"),
            &format!("newdomain={domain}"),
            &format!("subdomain={subdomain}"),
            "--output=json",
        ])?;
        Ok(())
    }
}

fn run_command(bin: &std::path::Path, args: &[&str]) -> Result<Vec<u8>> {
    debug!(bin = %bin.display(), ?args, "running control panel command");
    let output = Command::new(bin).args(args).output().map_err(|e| {
        OderError::ExternalApiError(format!("failed to run {}: {e}", bin.display()))
    })?;
    if !output.status.success() {
        return Err(OderError::ExternalApiError(format!(
            "{} exited with {}: {}",
            bin.display(),
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output.stdout)
}

fn parse_uapi_envelope(raw: &[u8]) -> Result<Value> {
    let doc: Value = serde_json::from_slice(raw)
        .map_err(|e| OderError::ExternalApiError(format!("failed to decode uapi output: {e}")))?;
    let result = &doc["result"];
    if result["status"].as_i64() != Some(1) {
        let errors = result["errors"]
            .as_array()
            .map(|errs| {
                errs.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "uapi reported failure without an error message".to_string());
        return Err(OderError::ExternalApiError(errors));
    }
    Ok(result["data"].clone())
}

fn parse_cpapi2_envelope(raw: &[u8]) -> Result<Value> {
    let doc: Value = serde_json::from_slice(raw)
        .map_err(|e| OderError::ExternalApiError(format!("failed to decode cpapi2 output: {e}")))?;
    let result = &doc["cpanelresult"];
    if result["data"][0]["result"].as_i64() != Some(1) {
        let error = result["error"]
            .as_str()
            .unwrap_or("cpapi2 reported failure without an error message")
            .to_string();
        return Err(OderError::ExternalApiError(error));
    }
    Ok(result["data"].clone())
}

/// Drops characters that have no business in a control panel identifier.
/// The API calls never go through a shell, so this is belt-and-braces input
/// sanitization rather than shell escaping.
fn scrub_arg(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@'))
        .collect()
}

fn urlencode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uapi_envelope_success_yields_data() {
        let raw = br#"{"result":{"status":1,"errors":null,"data":{"prefix":"wp_"}}}"#;
        let data = parse_uapi_envelope(raw).unwrap();
        assert_eq!(data["prefix"], "wp_");
    }

    #[test]
    fn uapi_envelope_failure_joins_errors() {
        let raw = br#"{"result":{"status":0,"errors":["first","second"],"data":null}}"#;
        let err = parse_uapi_envelope(raw).unwrap_err();
        match err {
            OderError::ExternalApiError(msg) => assert_eq!(msg, "first\nsecond"),
            other => panic!("expected ExternalApiError, got {other:?}"),
        }
    }

    #[test]
    fn uapi_envelope_rejects_garbage() {
        let err = parse_uapi_envelope(b"not json at all").unwrap_err();
        assert!(matches!(err, OderError::ExternalApiError(_)));
    }

    #[test]
    fn uapi_envelope_rejects_missing_status() {
        let err = parse_uapi_envelope(br#"{"something":"else"}"#).unwrap_err();
        assert!(matches!(err, OderError::ExternalApiError(_)));
    }

    #[test]
    fn cpapi2_envelope_success_and_failure() {
        let ok = br#"{"cpanelresult":{"data":[{"result":1}],"error":null}}"#;
        assert!(parse_cpapi2_envelope(ok).is_ok());

        let bad = br#"{"cpanelresult":{"data":[{"result":0}],"error":"domain exists"}}"#;
        let err = parse_cpapi2_envelope(bad).unwrap_err();
        match err {
            OderError::ExternalApiError(msg) => assert_eq!(msg, "domain exists"),
            other => panic!("expected ExternalApiError, got {other:?}"),
        }
    }

    #[test]
    fn domains_data_deserializes_with_defaults() {
        let raw = serde_json::json!({
            "main_domain": {"domain": "example.com", "documentroot": "/home/u1/public_html"}
        });
        let data: DomainsData = serde_json::from_value(raw).unwrap();
        assert_eq!(data.main_domain.domain, "example.com");
        assert!(data.parked_domains.is_empty());
        assert!(data.addon_domains.is_empty());
        assert!(data.sub_domains.is_empty());
    }

    #[test]
    fn scrub_arg_strips_hostile_characters() {
        assert_eq!(scrub_arg("wp_db1"), "wp_db1");
        assert_eq!(scrub_arg("db;rm -rf /"), "dbrm-rf/");
        assert_eq!(scrub_arg("dom.example.com"), "dom.example.com");
    }

    #[test]
    fn urlencode_matches_form_encoding() {
        assert_eq!(urlencode("domains/domain1.com"), "domains%2Fdomain1.com");
        assert_eq!(urlencode("a b"), "a+b");
    }
}
