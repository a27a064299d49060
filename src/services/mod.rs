pub mod polling;
pub mod registration;

pub use polling::PollService;
pub use registration::RegistrationService;
