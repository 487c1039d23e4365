mod net_config;

pub use net_config::{FlashConfigStore, NetConfig};
