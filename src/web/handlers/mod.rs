pub mod account_handlers;
pub mod application_handlers;
pub mod opportunity_handlers;
pub mod profile_handlers;
pub mod system_handlers;

pub use account_handlers::*;
pub use application_handlers::*;
pub use opportunity_handlers::*;
pub use profile_handlers::*;
pub use system_handlers::*;
