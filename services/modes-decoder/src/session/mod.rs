//! Consumer side of a decoding session

pub mod manager;
pub mod queue;
pub mod state;

pub use manager::SessionManager;
pub use queue::FrameQueue;
pub use state::SessionStats;
