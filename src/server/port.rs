use std::{
    io,
    net::{TcpStream, ToSocketAddrs},
    process::Command,
    time::Duration,
};

use tokio::time;
use tracing::{info, warn};

use crate::lib::errors::LaunchError;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Whose rights a port lookup or kill runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// The launcher's own user.
    Caller,
    /// Through `sudo`; needed when the listener belongs to another user.
    Sudo,
}

/// Abstraction for inspecting and freeing a listening port.
pub trait PortProbe {
    fn is_listening(&self, host: &str, port: u16) -> bool;
    fn listener_pids(&self, port: u16, privilege: Privilege) -> Result<Vec<u32>, LaunchError>;
    fn terminate(&self, pid: u32, port: u16, privilege: Privilege) -> Result<(), LaunchError>;
}

/// Probe that operates against the real system via `lsof` and `kill(2)`.
pub struct SystemPortProbe;

impl PortProbe for SystemPortProbe {
    fn is_listening(&self, host: &str, port: u16) -> bool {
        let Ok(addrs) = (probe_host(host), port).to_socket_addrs() else {
            return false;
        };
        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok())
    }

    fn listener_pids(&self, port: u16, privilege: Privilege) -> Result<Vec<u32>, LaunchError> {
        let lsof_args = [
            "-t".to_string(),
            format!("-iTCP:{port}"),
            "-sTCP:LISTEN".to_string(),
        ];
        let (program, output) = match privilege {
            Privilege::Caller => ("lsof", Command::new("lsof").args(&lsof_args).output()),
            Privilege::Sudo => (
                "sudo",
                Command::new("sudo").arg("lsof").args(&lsof_args).output(),
            ),
        };
        let output = output.map_err(|err| LaunchError::from_spawn(program, err))?;
        // lsof exits 1 when nothing matches.
        Ok(parse_pids(&String::from_utf8_lossy(&output.stdout)))
    }

    fn terminate(&self, pid: u32, port: u16, privilege: Privilege) -> Result<(), LaunchError> {
        if privilege == Privilege::Sudo {
            return kill_with_sudo(pid, port);
        }

        let raw_pid = libc::pid_t::try_from(pid).map_err(|_| LaunchError::KillFailed {
            pid,
            port,
            message: "pid out of range".into(),
        })?;
        let result = unsafe { libc::kill(raw_pid, libc::SIGKILL) };
        if result == 0 {
            return Ok(());
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            // Already gone.
            Some(libc::ESRCH) => Ok(()),
            Some(libc::EPERM) => {
                warn!(
                    target: "newsletter_launch::server",
                    pid,
                    port,
                    "Not permitted to kill listener; retrying with sudo"
                );
                kill_with_sudo(pid, port)
            }
            _ => Err(LaunchError::KillFailed {
                pid,
                port,
                message: err.to_string(),
            }),
        }
    }
}

fn kill_with_sudo(pid: u32, port: u16) -> Result<(), LaunchError> {
    let status = Command::new("sudo")
        .args(["kill", "-9", &pid.to_string()])
        .status()
        .map_err(|err| LaunchError::from_spawn("sudo", err))?;
    if status.success() {
        return Ok(());
    }
    Err(LaunchError::KillFailed {
        pid,
        port,
        message: format!("sudo kill exited with {status}"),
    })
}

/// Wildcard bind addresses are probed through loopback.
fn probe_host(host: &str) -> &str {
    match host {
        "" | "0.0.0.0" => "127.0.0.1",
        "::" | "[::]" => "::1",
        other => other,
    }
}

fn parse_pids(stdout: &str) -> Vec<u32> {
    let mut pids: Vec<u32> = stdout
        .lines()
        .filter_map(|line| line.trim().parse().ok())
        .collect();
    pids.sort_unstable();
    pids.dedup();
    pids
}

/// Outcome of the pre-launch port check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortStatus {
    Free,
    Freed { pids: Vec<u32> },
}

/// Owners of `port`, looked up through `sudo` only when the caller sees none.
///
/// Unprivileged `lsof` cannot see sockets held by other users, so an empty
/// answer for a busy port is not conclusive.
fn find_listeners<P>(probe: &P, port: u16) -> Result<(Vec<u32>, Privilege), LaunchError>
where
    P: PortProbe + ?Sized,
{
    let pids = probe.listener_pids(port, Privilege::Caller)?;
    if !pids.is_empty() {
        return Ok((pids, Privilege::Caller));
    }

    warn!(
        target: "newsletter_launch::server",
        port,
        "No visible owner for busy port; looking it up with sudo"
    );
    let pids = probe.listener_pids(port, Privilege::Sudo)?;
    if pids.is_empty() {
        return Err(LaunchError::ListenerNotFound { port });
    }
    Ok((pids, Privilege::Sudo))
}

/// Make sure nothing is listening on `port` before the server starts.
///
/// A busy port is an error when `kill_existing` is false; otherwise every
/// owning process is killed and the launcher pauses for `grace`.
pub async fn ensure_port_available<P>(
    probe: &P,
    host: &str,
    port: u16,
    kill_existing: bool,
    grace: Duration,
) -> Result<PortStatus, LaunchError>
where
    P: PortProbe + ?Sized,
{
    if !probe.is_listening(host, port) {
        return Ok(PortStatus::Free);
    }

    if !kill_existing {
        warn!(
            target: "newsletter_launch::server",
            port,
            "Port is busy and killing is disabled"
        );
        return Err(LaunchError::PortBusy { port });
    }

    let (pids, privilege) = find_listeners(probe, port)?;
    for pid in &pids {
        info!(
            target: "newsletter_launch::server",
            pid,
            port,
            ?privilege,
            "Killing process listening on port"
        );
        probe.terminate(*pid, port, privilege)?;
    }

    time::sleep(grace).await;
    if probe.is_listening(host, port) {
        warn!(
            target: "newsletter_launch::server",
            port,
            "Port still busy after killing its listener"
        );
    }
    Ok(PortStatus::Freed { pids })
}
