pub mod service;

pub use service::create_app;
