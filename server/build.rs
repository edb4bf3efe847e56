use std::process::Command;

fn main() {
    let commit = if let Ok(commit) = std::env::var("STOREFRONT_GIT_COMMIT") {
        commit
    } else {
        // Git commit hash, empty when git or the repository is unavailable
        Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .unwrap_or_default()
    };

    println!("cargo:rustc-env=STOREFRONT_GIT_COMMIT={}", commit.trim());
    println!("cargo:rerun-if-env-changed=STOREFRONT_GIT_COMMIT");
}
