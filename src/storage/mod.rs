pub mod json;
pub mod traits;

pub use json::JsonRegistryStore;
pub use traits::ChannelRepository;
