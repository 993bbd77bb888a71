use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::{Command, Output},
};

pub const PIPELINE_BINARY: &str = env!("CARGO_BIN_EXE_run-pipeline");
pub const SERVE_BINARY: &str = env!("CARGO_BIN_EXE_serve-model");
const CONFIG_ENV_KEY: &str = "NEWSLETTER_LAUNCH_CONFIG";

/// Run a launcher binary from `cwd` with a clean config environment.
pub fn run(binary: &str, cwd: &Path, args: &[&str]) -> Output {
    Command::new(binary)
        .current_dir(cwd)
        .env_remove(CONFIG_ENV_KEY)
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("launcher binary should start")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write an executable `#!/bin/sh` script.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("can write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("can chmod script");
    path
}

pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("launch.toml");
    fs::write(&path, content).expect("can write config");
    path
}
