//! Shared fixture for CLI contract tests: a temporary account home plus fake
//! `uapi` / `cpapi2` binaries that log their argv and replay canned JSON.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub struct Account {
    pub tmp: tempfile::TempDir,
    pub home: PathBuf,
    pub docroot: PathBuf,
    pub uapi: PathBuf,
    pub cpapi2: PathBuf,
    pub api_log: PathBuf,
}

impl Account {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let home = tmp.path().join("home").join("u1");
        let docroot = home.join("public_html");
        fs::create_dir_all(&docroot).unwrap();

        let fixtures = tmp.path().join("fixtures");
        fs::create_dir_all(&fixtures).unwrap();
        let api_log = fixtures.join("api.log");

        write_json(
            &fixtures.join("domains_data.json"),
            serde_json::json!({
                "result": {
                    "status": 1,
                    "errors": null,
                    "data": {
                        "main_domain": {
                            "domain": "example.com",
                            "documentroot": docroot.to_str().unwrap(),
                        },
                        "parked_domains": [],
                        "addon_domains": [],
                        "sub_domains": [],
                    }
                }
            }),
        );
        write_json(
            &fixtures.join("restrictions.json"),
            serde_json::json!({
                "result": {
                    "status": 1,
                    "errors": null,
                    "data": {
                        "prefix": "wp_",
                        "max_username_length": 16,
                        "max_database_name_length": 64,
                    }
                }
            }),
        );
        write_json(
            &fixtures.join("uapi_ok.json"),
            serde_json::json!({"result": {"status": 1, "errors": null, "data": {}}}),
        );
        write_json(
            &fixtures.join("cpapi2_ok.json"),
            serde_json::json!({"cpanelresult": {"data": [{"result": 1}], "error": null}}),
        );

        let bin = tmp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let uapi = bin.join("uapi");
        let cpapi2 = bin.join("cpapi2");
        write_script(
            &uapi,
            &format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$*\" >> \"{log}\"\n\
                 case \"$2\" in\n\
                   domains_data) cat \"{fix}/domains_data.json\" ;;\n\
                   get_restrictions) cat \"{fix}/restrictions.json\" ;;\n\
                   *) cat \"{fix}/uapi_ok.json\" ;;\n\
                 esac\n",
                log = api_log.display(),
                fix = fixtures.display(),
            ),
        );
        write_script(
            &cpapi2,
            &format!(
                "#!/bin/sh\n\
                 printf '%s\\n' \"$*\" >> \"{log}\"\n\
                 cat \"{fix}/cpapi2_ok.json\"\n",
                log = api_log.display(),
                fix = fixtures.display(),
            ),
        );

        Self {
            tmp,
            home,
            docroot,
            uapi,
            cpapi2,
            api_log,
        }
    }

    /// The `oderland` binary wired to this fake account.
    pub fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::Command::cargo_bin("oderland").unwrap();
        cmd.env("HOME", &self.home)
            .env("ODERLAND_UAPI", &self.uapi)
            .env("ODERLAND_CPAPI2", &self.cpapi2);
        cmd
    }

    pub fn api_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.api_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join(".oderland/odercache/config.json")
    }
}

fn write_json(path: &Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_string(&value).unwrap()).unwrap()
}

fn write_script(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
