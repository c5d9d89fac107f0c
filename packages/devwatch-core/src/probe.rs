//! Controller reachability probe using the system ping command.

use std::process::Command;

/// Send a single ping to `host` and report whether it answered.
///
/// Used before requesting a fresh token so an unreachable controller fails
/// with a connectivity error instead of an opaque authentication timeout.
pub async fn host_is_reachable(host: &str) -> bool {
    let host_owned = host.to_string();

    let result = tokio::task::spawn_blocking(move || {
        #[cfg(target_os = "windows")]
        let output = Command::new("ping")
            .args(["-n", "1", "-w", "1000", &host_owned])
            .output();

        #[cfg(not(target_os = "windows"))]
        let output = Command::new("ping")
            .args(["-c", "1", "-W", "2", &host_owned])
            .output();

        match output {
            Ok(output) => {
                #[cfg(target_os = "windows")]
                {
                    let text = String::from_utf8_lossy(&output.stdout).to_lowercase();
                    if text.contains("request timed out")
                        || text.contains("destination host unreachable")
                        || text.contains("transmit failed")
                    {
                        return false;
                    }
                    text.contains("reply from")
                }

                #[cfg(not(target_os = "windows"))]
                {
                    output.status.success()
                }
            }
            Err(e) => {
                tracing::warn!("Failed to run ping for {}: {}", host_owned, e);
                false
            }
        }
    })
    .await;

    match result {
        Ok(reachable) => {
            tracing::debug!("Reachability probe for {}: {}", host, reachable);
            reachable
        }
        Err(_) => false,
    }
}
