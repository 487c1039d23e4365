use std::collections::{BTreeMap, VecDeque};

use crate::fsm::PhaseData;
use crate::network_wizard::{
    ConfigStore, EspFwState, FsError, NetdevId, NetifStatus, NetworkDriver, NfcReader, Phase,
    Platform, SettingsFiles, WizardResponse, WizardUi,
};
use crate::time::Clock;

/// Host-side stand-in for the printer. Every collaborator is served by the
/// same struct, but each port only touches its own fields.
pub(crate) struct SimPlatform {
    pub now_ms: u32,
    pub esp_state: EspFwState,
    pub statuses: [NetifStatus; 3],
    pub active_netdev: NetdevId,
    pub set_active_calls: Vec<NetdevId>,
    pub resets: u32,
    pub reconfigures: u32,
    pub files: BTreeMap<String, Vec<u8>>,
    pub removed: Vec<String>,
    pub wifi_ssid: String,
    pub wifi_password: String,
    pub hostname: String,
    pub nfc_enabled: bool,
    pub nfc_payload: Option<Vec<u8>>,
    /// Scripted UI input; `None` entries are ticks without a response.
    pub responses: VecDeque<Option<WizardResponse>>,
    pub shown: Vec<(Phase, PhaseData)>,
    pub param_string: String,
    pub idles: u32,
    /// Milliseconds added to the clock on each `idle`.
    pub idle_step_ms: u32,
}

impl SimPlatform {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            esp_state: EspFwState::Ok,
            statuses: [NetifStatus::Unlinked; 3],
            active_netdev: NetdevId::Esp,
            set_active_calls: Vec::new(),
            resets: 0,
            reconfigures: 0,
            files: BTreeMap::new(),
            removed: Vec::new(),
            wifi_ssid: String::new(),
            wifi_password: String::new(),
            hostname: String::new(),
            nfc_enabled: true,
            nfc_payload: None,
            responses: VecDeque::new(),
            shown: Vec::new(),
            param_string: String::new(),
            idles: 0,
            idle_step_ms: 0,
        }
    }

    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    pub fn set_status(&mut self, id: NetdevId, status: NetifStatus) {
        self.statuses[id.as_u8() as usize] = status;
    }

    pub fn put_file(&mut self, path: &str, contents: &str) {
        self.files.insert(path.into(), contents.as_bytes().to_vec());
    }

    pub fn script(&mut self, responses: impl IntoIterator<Item = Option<WizardResponse>>) {
        self.responses.extend(responses);
    }

    pub fn shown_phases(&self) -> Vec<Phase> {
        self.shown.iter().map(|(phase, _)| *phase).collect()
    }
}

impl Clock for SimPlatform {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}

impl NetworkDriver for SimPlatform {
    fn status(&self, id: NetdevId) -> NetifStatus {
        self.statuses[id.as_u8() as usize]
    }

    fn set_active_id(&mut self, id: NetdevId) {
        self.set_active_calls.push(id);
    }

    fn notify_reconfigure(&mut self) {
        self.reconfigures += 1;
    }

    fn reset_connection(&mut self) {
        self.resets += 1;
    }
}

impl SettingsFiles for SimPlatform {
    fn is_regular_file(&mut self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, FsError> {
        let contents = self.files.get(path).ok_or(FsError::NotFound)?;
        let len = contents.len().min(buf.len());
        buf[..len].copy_from_slice(&contents[..len]);
        Ok(len)
    }

    fn remove(&mut self, path: &str) -> Result<(), FsError> {
        self.files.remove(path).ok_or(FsError::NotFound)?;
        self.removed.push(path.into());
        Ok(())
    }
}

impl ConfigStore for SimPlatform {
    fn active_netdev(&self) -> NetdevId {
        self.active_netdev
    }

    fn set_active_netdev(&mut self, id: NetdevId) {
        self.active_netdev = id;
    }

    fn set_wifi_ssid(&mut self, ssid: &str) {
        self.wifi_ssid = ssid.into();
    }

    fn set_wifi_password(&mut self, password: &str) {
        self.wifi_password = password.into();
    }

    fn set_hostname(&mut self, hostname: &str) {
        self.hostname = hostname.into();
    }
}

impl NfcReader for SimPlatform {
    fn has_activity(&mut self) -> bool {
        self.nfc_payload.is_some()
    }

    fn consume_payload(&mut self, out: &mut [u8]) -> Option<usize> {
        let payload = self.nfc_payload.take()?;
        let len = payload.len().min(out.len());
        out[..len].copy_from_slice(&payload[..len]);
        Some(len)
    }
}

impl WizardUi for SimPlatform {
    fn take_response(&mut self) -> Option<WizardResponse> {
        self.responses.pop_front().flatten()
    }

    fn show_phase(&mut self, phase: Phase, data: PhaseData) {
        self.shown.push((phase, data));
    }

    fn set_param_string(&mut self, value: &str) {
        self.param_string = value.into();
    }
}

impl Platform for SimPlatform {
    fn esp_fw_state(&self) -> EspFwState {
        self.esp_state
    }

    fn netdev(&mut self) -> &mut dyn NetworkDriver {
        self
    }

    fn files(&mut self) -> &mut dyn SettingsFiles {
        self
    }

    fn config_store(&mut self) -> &mut dyn ConfigStore {
        self
    }

    fn ui(&mut self) -> &mut dyn WizardUi {
        self
    }

    fn nfc(&mut self) -> Option<&mut dyn NfcReader> {
        if self.nfc_enabled {
            Some(self)
        } else {
            None
        }
    }

    fn idle(&mut self) {
        self.idles += 1;
        self.advance(self.idle_step_ms);
    }
}
