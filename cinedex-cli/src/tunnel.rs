//! SSH reverse tunnel command for the remote relay machine.

use cinedex_push::PlatformConfig;

/// Local ports forwarded through the tunnel.
pub const TUNNEL_PORTS: [u16; 3] = [12001, 12000, 52811];

const REMOTE_USER: &str = "ubuntu";

/// Build the `ssh` invocation that exposes the local ports on the remote host.
///
/// On Windows the command stays in the foreground and is pinned to IPv4.
pub fn reverse_proxy_command(config: &PlatformConfig, windows: bool) -> String {
    let mode = if windows { "-N -4" } else { "-N -f" };
    let mut command = format!(
        "ssh {mode} -i {} {REMOTE_USER}@{}",
        config.credentials.ssh_key, config.settings.aws_machine_url
    );
    for port in TUNNEL_PORTS {
        command.push_str(&format!(" -R 0.0.0.0:{port}:localhost:{port}"));
    }
    command
}
