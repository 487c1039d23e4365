use crate::fsm::PhaseData;
use crate::time::Clock;

use super::types::{EspFwState, NetdevId, NetifStatus, Phase, WizardResponse};

pub trait NetworkDriver {
    fn status(&self, id: NetdevId) -> NetifStatus;
    fn set_active_id(&mut self, id: NetdevId);
    /// Asks the network stack to reload its configuration from the store.
    fn notify_reconfigure(&mut self);
    fn reset_connection(&mut self);
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FsError {
    NotFound,
    NotRegularFile,
    Io,
}

pub trait SettingsFiles {
    fn is_regular_file(&mut self, path: &str) -> bool;
    fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, FsError>;
    fn remove(&mut self, path: &str) -> Result<(), FsError>;
}

pub trait ConfigStore {
    fn active_netdev(&self) -> NetdevId;
    fn set_active_netdev(&mut self, id: NetdevId);
    fn set_wifi_ssid(&mut self, ssid: &str);
    fn set_wifi_password(&mut self, password: &str);
    fn set_hostname(&mut self, hostname: &str);
}

pub trait NfcReader {
    fn has_activity(&mut self) -> bool;
    /// Copies the last scanned NDEF message into `out`. `None` when nothing
    /// was scanned since the previous call.
    fn consume_payload(&mut self, out: &mut [u8]) -> Option<usize>;
}

pub trait WizardUi {
    fn take_response(&mut self) -> Option<WizardResponse>;
    fn show_phase(&mut self, phase: Phase, data: PhaseData);
    fn set_param_string(&mut self, value: &str);
}

/// Everything the wizard talks to outside itself.
pub trait Platform: Clock {
    fn esp_fw_state(&self) -> EspFwState;
    fn netdev(&mut self) -> &mut dyn NetworkDriver;
    fn files(&mut self) -> &mut dyn SettingsFiles;
    fn config_store(&mut self) -> &mut dyn ConfigStore;
    fn ui(&mut self) -> &mut dyn WizardUi;

    fn nfc(&mut self) -> Option<&mut dyn NfcReader> {
        None
    }

    /// Called between ticks so other firmware work gets to run.
    fn idle(&mut self) {}
}

impl<T: Platform + ?Sized> Platform for &mut T {
    fn esp_fw_state(&self) -> EspFwState {
        (**self).esp_fw_state()
    }

    fn netdev(&mut self) -> &mut dyn NetworkDriver {
        (**self).netdev()
    }

    fn files(&mut self) -> &mut dyn SettingsFiles {
        (**self).files()
    }

    fn config_store(&mut self) -> &mut dyn ConfigStore {
        (**self).config_store()
    }

    fn ui(&mut self) -> &mut dyn WizardUi {
        (**self).ui()
    }

    fn nfc(&mut self) -> Option<&mut dyn NfcReader> {
        (**self).nfc()
    }

    fn idle(&mut self) {
        (**self).idle()
    }
}
