mod machine;
mod ports;
mod types;
mod wizard;


pub use ports::{
    ConfigStore, FsError, NetworkDriver, NfcReader, Platform, SettingsFiles, WizardUi,
};
pub use types::{
    CredentialsError, EspFwState, NetdevId, NetifStatus, NetworkSetupResponse, Phase,
    WifiCredentials, WizardMode, WizardResponse,
};
pub use wizard::NetworkSetupWizard;

/// Network setup opened from the network menu.
pub fn network_setup_wizard<P: Platform>(platform: P) {
    NetworkSetupWizard::new(platform).run();
}

/// First-boot variant: an already working wired link counts as done.
pub fn network_initial_setup_wizard<P: Platform>(platform: P) {
    NetworkSetupWizard::initial_setup(platform).run();
}

pub fn network_ini_wizard<P: Platform>(platform: P) {
    NetworkSetupWizard::ini_load_only(platform).run();
}

pub fn network_nfc_wizard<P: Platform>(platform: P, credentials: WifiCredentials) {
    NetworkSetupWizard::nfc_only(platform, credentials).run();
}
