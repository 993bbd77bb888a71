//! Model server launcher: port check, command construction, and output capture.
mod command;
mod executor;
mod port;

pub use command::{build_server_command, CUDA_VISIBLE_DEVICES_ENV};
pub use executor::launch_server;
pub use port::{ensure_port_available, PortProbe, PortStatus, Privilege, SystemPortProbe};
