//! rs-matter integration for serving vendor clusters on a local node.

pub mod handler;

pub use handler::VendorClusterHandler;
