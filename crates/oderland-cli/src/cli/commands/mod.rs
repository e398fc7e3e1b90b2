pub mod dispatch;
pub mod odercache;
pub mod provision;

pub use dispatch::dispatch;
