use heapless::String;

use crate::config::{WIFI_PASSWORD_MAX, WIFI_SSID_MAX};
use crate::fsm::{PhaseResponse, PhaseSet};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Init,
    AskSwitchToWifi,
    ActionSelect,
    WifiScan,
    WaitForIniFile,
    AskDeleteIniFile,
    WaitForNfc,
    NfcConfirm,
    Connecting,
    Connected,
    NoInterfaceError,
    ConnectionError,
    HelpQr,
    Finish,
}

impl Phase {
    pub const COUNT: usize = 14;

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::AskSwitchToWifi => 1,
            Self::ActionSelect => 2,
            Self::WifiScan => 3,
            Self::WaitForIniFile => 4,
            Self::AskDeleteIniFile => 5,
            Self::WaitForNfc => 6,
            Self::NfcConfirm => 7,
            Self::Connecting => 8,
            Self::Connected => 9,
            Self::NoInterfaceError => 10,
            Self::ConnectionError => 11,
            Self::HelpQr => 12,
            Self::Finish => 13,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Init),
            1 => Some(Self::AskSwitchToWifi),
            2 => Some(Self::ActionSelect),
            3 => Some(Self::WifiScan),
            4 => Some(Self::WaitForIniFile),
            5 => Some(Self::AskDeleteIniFile),
            6 => Some(Self::WaitForNfc),
            7 => Some(Self::NfcConfirm),
            8 => Some(Self::Connecting),
            9 => Some(Self::Connected),
            10 => Some(Self::NoInterfaceError),
            11 => Some(Self::ConnectionError),
            12 => Some(Self::HelpQr),
            13 => Some(Self::Finish),
            _ => None,
        }
    }
}

impl PhaseSet for Phase {
    const COUNT: usize = Phase::COUNT;
    const TERMINAL: Self = Self::Finish;

    fn index(self) -> usize {
        self.as_u8() as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum WizardMode {
    InitialSetup,
    IniLoadOnly,
    NfcOnly,
    #[default]
    FromNetworkMenu,
}

impl WizardMode {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::InitialSetup => 0,
            Self::IniLoadOnly => 1,
            Self::NfcOnly => 2,
            Self::FromNetworkMenu => 3,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::InitialSetup),
            1 => Some(Self::IniLoadOnly),
            2 => Some(Self::NfcOnly),
            3 => Some(Self::FromNetworkMenu),
            _ => None,
        }
    }

    pub const fn first_phase(self) -> Phase {
        match self {
            Self::InitialSetup | Self::FromNetworkMenu => Phase::ActionSelect,
            Self::IniLoadOnly => Phase::WaitForIniFile,
            Self::NfcOnly => Phase::NfcConfirm,
        }
    }

    pub const fn cancel_target(self) -> Phase {
        match self {
            Self::InitialSetup | Self::FromNetworkMenu => Phase::ActionSelect,
            Self::IniLoadOnly | Self::NfcOnly => Phase::Finish,
        }
    }
}

/// Choices offered by the action-select screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetworkSetupResponse {
    ScanWifi,
    LoadFromIni,
    Connect,
    ScanNfc,
}

pub type WizardResponse = PhaseResponse<NetworkSetupResponse>;

impl From<NetworkSetupResponse> for WizardResponse {
    fn from(value: NetworkSetupResponse) -> Self {
        Self::Specific(value)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CredentialsError {
    EmptySsid,
    SsidTooLong,
    PasswordTooLong,
    NotUtf8,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct WifiCredentials {
    pub ssid: String<WIFI_SSID_MAX>,
    pub password: String<WIFI_PASSWORD_MAX>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        let mut credentials = Self::default();
        credentials
            .ssid
            .push_str(ssid)
            .map_err(|_| CredentialsError::SsidTooLong)?;
        credentials
            .password
            .push_str(password)
            .map_err(|_| CredentialsError::PasswordTooLong)?;
        Ok(credentials)
    }

    pub fn from_bytes(ssid: &[u8], password: &[u8]) -> Result<Self, CredentialsError> {
        let ssid = core::str::from_utf8(ssid).map_err(|_| CredentialsError::NotUtf8)?;
        let password = core::str::from_utf8(password).map_err(|_| CredentialsError::NotUtf8)?;
        Self::new(ssid, password)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NetdevId {
    Ethernet,
    #[default]
    Esp,
    None,
}

impl NetdevId {
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Ethernet => 0,
            Self::Esp => 1,
            Self::None => 2,
        }
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Ethernet),
            1 => Some(Self::Esp),
            2 => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NetifStatus {
    Unlinked,
    Down,
    Up,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EspFwState {
    Ok,
    Scanning,
    NotDetected,
    NoFirmware,
    WrongVersion,
    Flashing,
    Unknown,
}

impl EspFwState {
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Ok | Self::Scanning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_byte_roundtrip_covers_all_phases() {
        for value in 0..Phase::COUNT as u8 {
            let phase = Phase::from_u8(value).expect("phase");
            assert_eq!(phase.as_u8(), value);
        }
        assert_eq!(Phase::from_u8(Phase::COUNT as u8), None);
    }

    #[test]
    fn credentials_enforce_capacity() {
        let long_ssid = "s".repeat(WIFI_SSID_MAX + 1);
        assert_eq!(
            WifiCredentials::new(&long_ssid, "pw"),
            Err(CredentialsError::SsidTooLong)
        );
        assert_eq!(
            WifiCredentials::new("", "pw"),
            Err(CredentialsError::EmptySsid)
        );
        let ok = WifiCredentials::new("home", "secret").expect("credentials");
        assert_eq!(ok.ssid.as_str(), "home");
        assert_eq!(ok.password.as_str(), "secret");
    }

    #[test]
    fn mode_routing_table() {
        assert_eq!(WizardMode::default(), WizardMode::FromNetworkMenu);
        assert_eq!(WizardMode::IniLoadOnly.first_phase(), Phase::WaitForIniFile);
        assert_eq!(WizardMode::IniLoadOnly.cancel_target(), Phase::Finish);
        assert_eq!(WizardMode::NfcOnly.first_phase(), Phase::NfcConfirm);
        assert_eq!(WizardMode::InitialSetup.cancel_target(), Phase::ActionSelect);
    }
}
