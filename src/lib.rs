#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod fsm;
pub mod logging;
pub mod network_wizard;
pub mod nfc;
pub mod settings_ini;
pub mod storage;
pub mod time;

#[cfg(feature = "esp-hal-runtime")]
pub mod platform;

#[cfg(test)]
mod test_support;

pub use network_wizard::{
    network_ini_wizard, network_initial_setup_wizard, network_nfc_wizard, network_setup_wizard,
    NetworkSetupWizard, Platform,
};
