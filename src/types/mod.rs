pub mod application;
pub mod opportunity;
pub mod profile;

pub use application::*;
pub use opportunity::*;
pub use profile::*;
