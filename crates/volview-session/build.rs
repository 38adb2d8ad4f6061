use std::process::Command;

fn main() {
    // Emit git describe so --version includes commit info.
    let git_describe = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    let pkg_version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version = if git_describe.is_empty() {
        pkg_version
    } else {
        format!("{pkg_version} ({git_describe})")
    };
    println!("cargo:rustc-env=VVS_VERSION={version}");

    // Re-run when HEAD changes (new commits).
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");
}
