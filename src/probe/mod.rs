pub mod engine;
pub mod socket;
pub mod transport;

pub use engine::{ProbeReport, report_outcome, run_probe};
pub use socket::check_permissions;
pub use transport::{Outcome, send_and_receive};
