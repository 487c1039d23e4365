use log::{debug, info, warn};

use crate::config::{
    CONNECT_TIMEOUT_MS, INI_CHECK_DELAY_MS, NFC_CHECK_INTERVAL_MS, NFC_PAYLOAD_MAX, NFC_SUPPORTED,
    RECONFIGURE_DELAY_MS, SETTINGS_INI_PATH,
};
use crate::fsm::{InitArgs, LoopArgs, PhaseConfig, PhaseData, PhaseTable, Response};
use crate::nfc::parse_wifi_credentials;
use crate::settings_ini::read_settings_ini;
use crate::time::ticks_diff;

use super::ports::Platform;
use super::types::{
    NetdevId, NetifStatus, NetworkSetupResponse, Phase, WifiCredentials, WizardMode,
};

pub(crate) type Args = LoopArgs<NetworkSetupResponse>;
pub(crate) type WizardTable<P> =
    PhaseTable<Phase, WizardMachine<P>, NetworkSetupResponse, { Phase::COUNT }>;

/// Per-run wizard state. Lives exactly as long as one `run()`.
pub(crate) struct WizardMachine<P> {
    pub(crate) platform: P,
    mode: WizardMode,
    first_phase: Phase,
    cancel_target: Phase,
    // Shared by the timer-gated phases; reset by their init callbacks.
    phase_start_ms: u32,
    phase_action_done: bool,
    last_nfc_check_ms: u32,
    nfc_credentials: WifiCredentials,
}

impl<P: Platform> WizardMachine<P> {
    pub(crate) fn new(platform: P, mode: WizardMode) -> Self {
        Self {
            platform,
            mode,
            first_phase: mode.first_phase(),
            cancel_target: mode.cancel_target(),
            phase_start_ms: 0,
            phase_action_done: false,
            last_nfc_check_ms: 0,
            nfc_credentials: WifiCredentials::default(),
        }
    }

    pub(crate) fn with_nfc_credentials(mut self, credentials: WifiCredentials) -> Self {
        self.nfc_credentials = credentials;
        self
    }

    pub(crate) fn mode(&self) -> WizardMode {
        self.mode
    }

    pub(crate) fn nfc_credentials(&self) -> &WifiCredentials {
        &self.nfc_credentials
    }

    pub(crate) fn phase_table() -> WizardTable<P> {
        PhaseTable::new([
            (Phase::Init, PhaseConfig::looping(Self::phase_init)),
            (
                Phase::AskSwitchToWifi,
                PhaseConfig::looping(Self::phase_ask_switch_to_wifi),
            ),
            (
                Phase::ActionSelect,
                PhaseConfig::looping(Self::phase_action_select)
                    .with_init(Self::phase_action_select_init),
            ),
            (Phase::WifiScan, PhaseConfig::looping(Self::phase_wifi_scan)),
            (
                Phase::WaitForIniFile,
                PhaseConfig::looping(Self::phase_wait_for_ini_file)
                    .with_init(Self::phase_general_init),
            ),
            (
                Phase::AskDeleteIniFile,
                PhaseConfig::looping(Self::phase_ask_delete_ini_file),
            ),
            (
                Phase::WaitForNfc,
                PhaseConfig::looping(Self::phase_wait_for_nfc),
            ),
            (
                Phase::NfcConfirm,
                PhaseConfig::looping(Self::phase_nfc_confirm)
                    .with_init(Self::phase_nfc_confirm_init),
            ),
            (
                Phase::Connecting,
                PhaseConfig::looping(Self::phase_connecting)
                    .with_init(Self::phase_connecting_init),
            ),
            (Phase::Connected, PhaseConfig::looping(Self::phase_connected)),
            (
                Phase::NoInterfaceError,
                PhaseConfig::looping(Self::phase_esp_error),
            ),
            (
                Phase::ConnectionError,
                PhaseConfig::looping(Self::phase_connection_error),
            ),
            (Phase::HelpQr, PhaseConfig::looping(Self::phase_help_qr)),
            (Phase::Finish, PhaseConfig::terminal()),
        ])
    }

    fn elapsed_in_phase(&self) -> u32 {
        ticks_diff(self.platform.now_ms(), self.phase_start_ms)
    }

    fn check_nfc(&mut self) -> Option<Phase> {
        if !NFC_SUPPORTED {
            return None;
        }

        let now = self.platform.now_ms();
        if ticks_diff(now, self.last_nfc_check_ms) < NFC_CHECK_INTERVAL_MS {
            return None;
        }
        self.last_nfc_check_ms = now;

        let reader = self.platform.nfc()?;
        if !reader.has_activity() {
            return None;
        }

        let mut payload = [0u8; NFC_PAYLOAD_MAX];
        let len = reader.consume_payload(&mut payload)?;
        let Some(credentials) = parse_wifi_credentials(&payload[..len.min(payload.len())]) else {
            debug!("netwizard: nfc payload ignored len={}", len);
            return None;
        };

        info!("netwizard: nfc credentials ssid={}", credentials.ssid);
        self.nfc_credentials = credentials;
        Some(Phase::NfcConfirm)
    }

    fn phase_init(&mut self, _args: &Args) -> Option<Phase> {
        // Already online through a wired interface: offer the switch first.
        let active = self.platform.config_store().active_netdev();
        if active != NetdevId::Esp && self.platform.netdev().status(active) == NetifStatus::Up {
            return Some(match self.mode {
                WizardMode::InitialSetup => Phase::Connected,
                WizardMode::IniLoadOnly | WizardMode::NfcOnly | WizardMode::FromNetworkMenu => {
                    Phase::AskSwitchToWifi
                }
            });
        }

        let esp_state = self.platform.esp_fw_state();
        if !esp_state.is_usable() {
            warn!("netwizard: esp unusable state={:?}", esp_state);
            return Some(Phase::NoInterfaceError);
        }

        Some(self.first_phase)
    }

    fn phase_ask_switch_to_wifi(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Yes) => {
                self.activate_esp();
                Some(Phase::Init)
            }
            Some(Response::No | Response::Back) => Some(Phase::Finish),
            _ => None,
        }
    }

    fn phase_action_select_init(&mut self, args: &mut InitArgs<'_>) {
        args.change_data(PhaseData::from_byte(self.mode.as_u8()));
    }

    fn phase_action_select(&mut self, args: &Args) -> Option<Phase> {
        if let Some(phase) = self.check_nfc() {
            return Some(phase);
        }

        match args.response() {
            Some(Response::Back) => return Some(Phase::Finish),
            Some(Response::Help) => return Some(Phase::HelpQr),
            _ => {}
        }

        match args.specific() {
            Some(NetworkSetupResponse::ScanWifi) => Some(Phase::WifiScan),
            Some(NetworkSetupResponse::LoadFromIni) => Some(Phase::WaitForIniFile),
            // The UI has already written the credentials into the store.
            Some(NetworkSetupResponse::Connect) => Some(Phase::Connecting),
            Some(NetworkSetupResponse::ScanNfc) if NFC_SUPPORTED => Some(Phase::WaitForNfc),
            _ => None,
        }
    }

    fn phase_wifi_scan(&mut self, args: &Args) -> Option<Phase> {
        if let Some(phase) = self.check_nfc() {
            return Some(phase);
        }

        match args.response() {
            Some(Response::Back) => Some(Phase::ActionSelect),
            Some(Response::Continue) => Some(Phase::Connecting),
            _ => None,
        }
    }

    fn phase_general_init(&mut self, _args: &mut InitArgs<'_>) {
        self.phase_start_ms = self.platform.now_ms();
        self.phase_action_done = false;
    }

    fn phase_wait_for_ini_file(&mut self, args: &Args) -> Option<Phase> {
        if matches!(args.response(), Some(Response::Back | Response::Cancel)) {
            return Some(self.cancel_target);
        }

        if self.phase_action_done || self.elapsed_in_phase() <= INI_CHECK_DELAY_MS {
            return None;
        }
        if !self.platform.files().is_regular_file(SETTINGS_INI_PATH) {
            return None;
        }
        if !self.load_settings_ini() {
            return None;
        }

        self.phase_action_done = true;
        Some(Phase::AskDeleteIniFile)
    }

    fn load_settings_ini(&mut self) -> bool {
        match read_settings_ini(self.platform.files(), SETTINGS_INI_PATH) {
            Ok(settings) => {
                settings.apply(self.platform.config_store());
                info!("netwizard: ini loaded ssid={}", settings.wifi.ssid);
                true
            }
            Err(err) => {
                debug!("netwizard: ini not loaded err={:?}", err);
                false
            }
        }
    }

    fn phase_ask_delete_ini_file(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Back) => Some(self.cancel_target),
            Some(Response::Yes) => {
                if let Err(err) = self.platform.files().remove(SETTINGS_INI_PATH) {
                    warn!("netwizard: ini remove err={:?}", err);
                }
                Some(Phase::Connecting)
            }
            Some(Response::No) => Some(Phase::Connecting),
            _ => None,
        }
    }

    fn phase_wait_for_nfc(&mut self, args: &Args) -> Option<Phase> {
        if let Some(phase) = self.check_nfc() {
            return Some(phase);
        }

        match args.response() {
            Some(Response::Back | Response::Cancel) => Some(self.cancel_target),
            _ => None,
        }
    }

    fn phase_nfc_confirm_init(&mut self, _args: &mut InitArgs<'_>) {
        self.platform
            .ui()
            .set_param_string(&self.nfc_credentials.ssid);
    }

    fn phase_nfc_confirm(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Ok) => {
                let store = self.platform.config_store();
                store.set_wifi_ssid(&self.nfc_credentials.ssid);
                store.set_wifi_password(&self.nfc_credentials.password);
                Some(Phase::Connecting)
            }
            Some(Response::Back | Response::Cancel) => Some(self.cancel_target),
            _ => None,
        }
    }

    fn phase_connecting_init(&mut self, args: &mut InitArgs<'_>) {
        self.phase_general_init(args);
        self.activate_esp();
    }

    // `init` reads the active interface back from the store.
    fn activate_esp(&mut self) {
        self.platform.config_store().set_active_netdev(NetdevId::Esp);
        self.platform.netdev().set_active_id(NetdevId::Esp);
    }

    /// Fires the reset and reconfigure at most once per visit of `Connecting`.
    fn ensure_reconfigured(&mut self) {
        if self.phase_action_done {
            return;
        }
        self.phase_action_done = true;
        info!("netwizard: reconfigure requested");
        let netdev = self.platform.netdev();
        netdev.reset_connection();
        netdev.notify_reconfigure();
    }

    fn phase_connecting(&mut self, args: &Args) -> Option<Phase> {
        if self.phase_action_done && self.platform.netdev().status(NetdevId::Esp) == NetifStatus::Up
        {
            return Some(Phase::Connected);
        }

        let elapsed = self.elapsed_in_phase();
        if elapsed > RECONFIGURE_DELAY_MS {
            self.ensure_reconfigured();
        }

        if elapsed >= CONNECT_TIMEOUT_MS {
            warn!("netwizard: connect timeout elapsed_ms={}", elapsed);
            return Some(Phase::ConnectionError);
        }

        match args.response() {
            Some(Response::Back | Response::Cancel) => {
                self.ensure_reconfigured();
                Some(self.cancel_target)
            }
            Some(Response::Finish) => {
                self.ensure_reconfigured();
                Some(Phase::Finish)
            }
            _ => None,
        }
    }

    fn phase_connected(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Ok) => Some(Phase::Finish),
            _ => None,
        }
    }

    fn phase_esp_error(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Retry) => Some(Phase::Init),
            Some(Response::Help) => Some(Phase::HelpQr),
            Some(Response::Ok | Response::Back) => Some(Phase::Finish),
            _ => None,
        }
    }

    fn phase_connection_error(&mut self, args: &Args) -> Option<Phase> {
        // Late success after the timeout.
        if self.platform.netdev().status(NetdevId::Esp) == NetifStatus::Up {
            return Some(Phase::Connected);
        }

        match args.response() {
            Some(Response::Back) => Some(self.cancel_target),
            Some(Response::Help) => Some(Phase::HelpQr),
            Some(Response::Abort) => Some(Phase::Finish),
            _ => None,
        }
    }

    // Back always restarts from init, not from the phase that opened help.
    fn phase_help_qr(&mut self, args: &Args) -> Option<Phase> {
        match args.response() {
            Some(Response::Back) => Some(Phase::Init),
            _ => None,
        }
    }
}
