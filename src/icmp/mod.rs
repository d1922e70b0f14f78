pub mod classify;
pub mod packet;
pub mod reply;
pub mod wire;

pub use classify::icmp_message;
pub use packet::EchoRequest;
pub use reply::{EchoReply, Validation};
