pub mod formatter;
pub mod http_store;
pub mod memory_store;
pub mod navigation;
pub mod render;
pub mod session;
pub mod store;
