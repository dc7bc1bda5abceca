//! Component-wise filesystem glob used to find installed browser builds.
//!
//! Browser-fetch installers drop binaries under versioned directory
//! trees like `chrome/linux-131.0.6730.0/chrome-linux64/chrome`. The
//! providers scan those trees with one `*`-wildcard pattern per path
//! component. Results come back lexically sorted; callers take the last
//! match as the newest build. That heuristic is NOT a real version
//! comparison ("9" sorts after "10") and is kept on purpose for
//! compatibility with existing install trees.

use std::path::{Path, PathBuf};

/// Match `name` against a pattern where `*` matches any run of
/// characters (including none).
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let n: Vec<char> = name.chars().collect();

    // dp[i][j]: pattern[..i] matches name[..j]
    let mut dp = vec![vec![false; n.len() + 1]; p.len() + 1];
    dp[0][0] = true;
    for i in 1..=p.len() {
        if p[i - 1] == '*' {
            dp[i][0] = dp[i - 1][0];
        }
    }
    for i in 1..=p.len() {
        for j in 1..=n.len() {
            dp[i][j] = if p[i - 1] == '*' {
                dp[i - 1][j] || dp[i][j - 1]
            } else {
                dp[i - 1][j - 1] && p[i - 1] == n[j - 1]
            };
        }
    }
    dp[p.len()][n.len()]
}

/// Expand a component-wise glob under `base`, returning every matching
/// path, lexically sorted.
pub fn glob_components(base: &Path, pattern: &[&str]) -> Vec<PathBuf> {
    let mut current = vec![base.to_path_buf()];

    for component in pattern {
        let mut next = Vec::new();
        for dir in &current {
            let Ok(entries) = std::fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let name = entry.file_name();
                if wildcard_match(component, &name.to_string_lossy()) {
                    next.push(entry.path());
                }
            }
        }
        current = next;
        if current.is_empty() {
            break;
        }
    }

    current.sort();
    current
}
