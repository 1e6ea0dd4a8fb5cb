pub mod http_store;
pub mod session_file;

pub use http_store::HttpRemoteStore;
pub use session_file::FileSessionStore;
