//! Snapshot diffing by hostname.

use std::collections::HashSet;

/// Devices that appeared or disappeared between two inventory tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDiff {
    /// Hostnames present in the new table but not the previous snapshot
    pub added: Vec<String>,
    /// Hostnames present in the previous snapshot but not the new table
    pub removed: Vec<String>,
}

impl SnapshotDiff {
    /// True when the hostname sets are equal (no additions and no removals).
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare two device tables by their first column (hostname).
///
/// A leading header row (first cell `hostname`) is skipped on either side;
/// results are sorted for stable output.
pub fn diff_hostnames(new_rows: &[Vec<String>], old_rows: &[Vec<String>]) -> SnapshotDiff {
    let new_keys = hostname_set(new_rows);
    let old_keys = hostname_set(old_rows);

    let mut added: Vec<String> = new_keys.difference(&old_keys).map(|s| s.to_string()).collect();
    let mut removed: Vec<String> = old_keys.difference(&new_keys).map(|s| s.to_string()).collect();
    added.sort();
    removed.sort();

    SnapshotDiff { added, removed }
}

fn hostname_set(rows: &[Vec<String>]) -> HashSet<&str> {
    rows.iter()
        .filter_map(|row| row.first())
        .map(String::as_str)
        .filter(|key| *key != "hostname")
        .collect()
}

/// Strip the configured DNS suffix from a hostname for display.
pub fn display_name<'a>(hostname: &'a str, strip_suffix: Option<&str>) -> &'a str {
    match strip_suffix {
        Some(suffix) if !suffix.is_empty() => {
            hostname.strip_suffix(suffix).unwrap_or(hostname)
        }
        _ => hostname,
    }
}

/// Render the console report for one device family.
///
/// Lists newly appeared devices, then disappeared ones, each numbered;
/// prints `<family> Good` when nothing changed.
pub fn render_report(family_label: &str, diff: &SnapshotDiff, strip_suffix: Option<&str>) -> String {
    if diff.is_unchanged() {
        return format!("{} Good", family_label);
    }

    let mut out = String::new();
    if !diff.added.is_empty() {
        out.push_str(&format!("{} NEW ({})\n", family_label, diff.added.len()));
        for (idx, hostname) in diff.added.iter().enumerate() {
            out.push_str(&format!("  {}) {}\n", idx + 1, display_name(hostname, strip_suffix)));
        }
    }
    if !diff.removed.is_empty() {
        out.push_str(&format!("{} NOT FOUND ({})\n", family_label, diff.removed.len()));
        for (idx, hostname) in diff.removed.iter().enumerate() {
            out.push_str(&format!("  {}) {}\n", idx + 1, display_name(hostname, strip_suffix)));
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(hostnames: &[&str]) -> Vec<Vec<String>> {
        let mut rows = vec![vec!["hostname".to_string(), "id".to_string()]];
        for h in hostnames {
            rows.push(vec![h.to_string(), "x".to_string()]);
        }
        rows
    }

    #[test]
    fn test_diff_reports_additions_and_removals() {
        let old = table(&["A", "B", "C"]);
        let new = table(&["B", "C", "D"]);

        let diff = diff_hostnames(&new, &old);
        assert_eq!(diff.added, vec!["D"]);
        assert_eq!(diff.removed, vec!["A"]);
        assert!(!diff.is_unchanged());
    }

    #[test]
    fn test_diff_equal_sets_is_unchanged() {
        let old = table(&["A", "B"]);
        let new = table(&["B", "A"]);

        let diff = diff_hostnames(&new, &old);
        assert!(diff.is_unchanged());
        assert_eq!(render_report("Switch", &diff, None), "Switch Good");
    }

    #[test]
    fn test_diff_against_empty_snapshot() {
        let old: Vec<Vec<String>> = Vec::new();
        let new = table(&["A"]);

        let diff = diff_hostnames(&new, &old);
        assert_eq!(diff.added, vec!["A"]);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_display_name_strips_suffix() {
        assert_eq!(display_name("sw-01.corp.example.com", Some(".corp.example.com")), "sw-01");
        assert_eq!(display_name("sw-01", Some(".corp.example.com")), "sw-01");
        assert_eq!(display_name("sw-01.corp.example.com", None), "sw-01.corp.example.com");
    }

    #[test]
    fn test_render_report_numbers_entries() {
        let diff = SnapshotDiff {
            added: vec!["sw-10.corp.example.com".to_string()],
            removed: vec!["sw-02.corp.example.com".to_string()],
        };
        let report = render_report("Switch", &diff, Some(".corp.example.com"));
        assert_eq!(
            report,
            "Switch NEW (1)\n  1) sw-10\nSwitch NOT FOUND (1)\n  1) sw-02"
        );
    }
}
