//! Static connection parameters, loaded once per run from a delimited file.

use crate::table;
use anyhow::{Context, Result, anyhow, bail};
use std::path::Path;

/// Logical name keying the controller row in the credential file.
pub const CONTROLLER_KEY: &str = "DNAC";

/// Connection parameters for one controller. Immutable during a run.
#[derive(Debug, Clone)]
pub struct Credential {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
}

/// Load the credential row keyed `name` from the file at `path`.
///
/// The file is delimited with a header row of at least
/// `hostname,host,username,password,https_port`; the `hostname` column is
/// the logical key.
pub fn load_credential(path: &Path, name: &str) -> Result<Credential> {
    if !path.exists() {
        bail!("Credential file not found at {:?}", path);
    }

    let records = table::read_records(path)
        .with_context(|| format!("Failed to parse credential file {:?}", path))?;

    let record = records
        .into_iter()
        .find(|r| r.get("hostname").map(String::as_str) == Some(name))
        .ok_or_else(|| anyhow!("No credential entry named '{}' in {:?}", name, path))?;

    let field = |key: &str| -> Result<String> {
        record
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("Credential entry '{}' is missing column '{}'", name, key))
    };

    let port_text = field("https_port")?;
    let port: u16 = port_text
        .parse()
        .with_context(|| format!("Invalid https_port '{}' for credential '{}'", port_text, name))?;

    Ok(Credential {
        host: field("host")?,
        username: field("username")?,
        password: field("password")?,
        port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path =
            std::env::temp_dir().join(format!("devwatch-cred-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_controller_credential() {
        let path = temp_file(
            "ok.csv",
            "hostname,host,username,password,https_port\n\
             DNAC,10.0.0.5,admin,secret,443\n",
        );
        let cred = load_credential(&path, CONTROLLER_KEY).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(cred.host, "10.0.0.5");
        assert_eq!(cred.username, "admin");
        assert_eq!(cred.password, "secret");
        assert_eq!(cred.port, 443);
    }

    #[test]
    fn test_missing_file_is_descriptive() {
        let err = load_credential(Path::new("/nonexistent/cred_list.csv"), CONTROLLER_KEY)
            .unwrap_err();
        assert!(err.to_string().contains("Credential file not found"));
    }

    #[test]
    fn test_missing_entry_is_descriptive() {
        let path = temp_file(
            "other.csv",
            "hostname,host,username,password,https_port\n\
             OTHER,10.0.0.9,admin,secret,443\n",
        );
        let err = load_credential(&path, CONTROLLER_KEY).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("No credential entry named 'DNAC'"));
    }

    #[test]
    fn test_bad_port_is_an_error() {
        let path = temp_file(
            "badport.csv",
            "hostname,host,username,password,https_port\n\
             DNAC,10.0.0.5,admin,secret,https\n",
        );
        assert!(load_credential(&path, CONTROLLER_KEY).is_err());
        std::fs::remove_file(&path).unwrap();
    }
}
