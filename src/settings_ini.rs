use heapless::String;

use crate::config::{HOSTNAME_MAX, SETTINGS_INI_MAX};
use crate::network_wizard::{ConfigStore, CredentialsError, FsError, SettingsFiles, WifiCredentials};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IniError {
    Fs(FsError),
    TooLarge,
    NotUtf8,
    MissingWifiSsid,
    Credentials(CredentialsError),
    HostnameTooLong,
}

impl From<FsError> for IniError {
    fn from(value: FsError) -> Self {
        Self::Fs(value)
    }
}

impl From<CredentialsError> for IniError {
    fn from(value: CredentialsError) -> Self {
        Self::Credentials(value)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IniSettings {
    pub wifi: WifiCredentials,
    pub hostname: Option<String<HOSTNAME_MAX>>,
}

impl IniSettings {
    pub fn apply(&self, store: &mut dyn ConfigStore) {
        store.set_wifi_ssid(&self.wifi.ssid);
        store.set_wifi_password(&self.wifi.password);
        if let Some(hostname) = &self.hostname {
            store.set_hostname(hostname);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Wifi,
    Lan,
    Other,
}

impl Section {
    fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("wifi") {
            Self::Wifi
        } else if name.eq_ignore_ascii_case("lan") {
            Self::Lan
        } else {
            Self::Other
        }
    }
}

pub fn read_settings_ini(files: &mut dyn SettingsFiles, path: &str) -> Result<IniSettings, IniError> {
    // One spare byte tells a file of exactly SETTINGS_INI_MAX from a longer one.
    let mut raw = [0u8; SETTINGS_INI_MAX + 1];
    let len = files.read(path, &mut raw)?;
    if len > SETTINGS_INI_MAX {
        return Err(IniError::TooLarge);
    }
    let text = core::str::from_utf8(&raw[..len]).map_err(|_| IniError::NotUtf8)?;
    parse_settings_ini(text)
}

pub fn parse_settings_ini(text: &str) -> Result<IniSettings, IniError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut section = Section::Other;
    let mut ssid: Option<&str> = None;
    let mut password: Option<&str> = None;
    let mut hostname: Option<&str> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            section = Section::from_name(name.trim());
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match section {
            Section::Wifi if key.eq_ignore_ascii_case("ssid") => ssid = Some(value),
            Section::Wifi
                if key.eq_ignore_ascii_case("psk") || key.eq_ignore_ascii_case("password") =>
            {
                password = Some(value)
            }
            Section::Wifi | Section::Lan if key.eq_ignore_ascii_case("hostname") => {
                hostname = Some(value)
            }
            _ => {}
        }
    }

    let ssid = ssid
        .filter(|ssid| !ssid.is_empty())
        .ok_or(IniError::MissingWifiSsid)?;
    let wifi = WifiCredentials::new(ssid, password.unwrap_or(""))?;

    let hostname = match hostname.filter(|hostname| !hostname.is_empty()) {
        Some(value) => {
            let mut hostname = String::new();
            hostname
                .push_str(value)
                .map_err(|_| IniError::HostnameTooLong)?;
            Some(hostname)
        }
        None => None,
    };

    Ok(IniSettings { wifi, hostname })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wifi_and_lan_sections() {
        let text = "\
# printer network settings
[lan]
hostname = bench-mk4

[wifi]
ssid=Workshop
psk = hunter2
";
        let settings = parse_settings_ini(text).expect("settings");
        assert_eq!(settings.wifi.ssid.as_str(), "Workshop");
        assert_eq!(settings.wifi.password.as_str(), "hunter2");
        assert_eq!(settings.hostname.as_deref(), Some("bench-mk4"));
    }

    #[test]
    fn keys_outside_wifi_section_are_ignored() {
        let text = "ssid=Orphan\n[other]\nssid=Nope\n";
        assert_eq!(parse_settings_ini(text), Err(IniError::MissingWifiSsid));
    }

    #[test]
    fn open_network_has_empty_password() {
        let settings = parse_settings_ini("[WiFi]\r\nSSID=cafe\r\n").expect("settings");
        assert_eq!(settings.wifi.ssid.as_str(), "cafe");
        assert!(settings.wifi.password.is_empty());
        assert!(settings.hostname.is_none());
    }

    #[test]
    fn oversized_psk_is_rejected() {
        let text = format!("[wifi]\nssid=x\npsk={}\n", "p".repeat(80));
        assert_eq!(
            parse_settings_ini(&text),
            Err(IniError::Credentials(CredentialsError::PasswordTooLong))
        );
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let settings =
            parse_settings_ini("\u{feff}[wifi]\r\nssid=Home\r\npsk=x\r\n").expect("settings");
        assert_eq!(settings.wifi.ssid.as_str(), "Home");
        assert_eq!(settings.wifi.password.as_str(), "x");
    }

    struct OneFile(Vec<u8>);

    impl SettingsFiles for OneFile {
        fn is_regular_file(&mut self, _path: &str) -> bool {
            true
        }

        fn read(&mut self, _path: &str, buf: &mut [u8]) -> Result<usize, FsError> {
            let len = self.0.len().min(buf.len());
            buf[..len].copy_from_slice(&self.0[..len]);
            Ok(len)
        }

        fn remove(&mut self, _path: &str) -> Result<(), FsError> {
            Ok(())
        }
    }

    fn padded_ini(len: usize) -> OneFile {
        let mut text = "[wifi]\nssid=Workshop\npsk=hunter2\n".to_string();
        while text.len() < len - 1 {
            text.push(';');
        }
        text.push('\n');
        OneFile(text.into_bytes())
    }

    #[test]
    fn file_at_size_limit_is_read() {
        let mut files = padded_ini(SETTINGS_INI_MAX);
        let settings = read_settings_ini(&mut files, "settings.ini").expect("settings");
        assert_eq!(settings.wifi.ssid.as_str(), "Workshop");
    }

    #[test]
    fn file_over_size_limit_is_rejected() {
        let mut files = padded_ini(SETTINGS_INI_MAX + 1);
        assert_eq!(
            read_settings_ini(&mut files, "settings.ini"),
            Err(IniError::TooLarge)
        );
    }

    #[test]
    fn empty_ssid_counts_as_missing() {
        assert_eq!(
            parse_settings_ini("[wifi]\nssid=\npsk=abc\n"),
            Err(IniError::MissingWifiSsid)
        );
    }
}
