pub mod debounce;
pub mod mapbox;
pub mod types;

pub use debounce::SearchGate;
pub use mapbox::MapboxClient;
pub use types::*;
