// src/web/handlers/mod.rs
pub mod job_handlers;
pub mod page_handlers;
pub mod profile_handlers;
pub mod system_handlers;

pub use job_handlers::*;
pub use page_handlers::*;
pub use profile_handlers::*;
pub use system_handlers::*;
