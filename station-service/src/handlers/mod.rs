pub mod account;
pub mod metrics;
pub mod profile;

pub use account::get_two_factor_status;
pub use profile::{get_profile_edit, put_profile_edit};
