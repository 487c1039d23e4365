pub const NFC_SUPPORTED: bool = cfg!(feature = "nfc");

// Heavy checks are deferred past phase entry so the screen gets redrawn first.
pub const INI_CHECK_DELAY_MS: u32 = 500;
pub const RECONFIGURE_DELAY_MS: u32 = 700;
pub const CONNECT_TIMEOUT_MS: u32 = 120_000;
pub const NFC_CHECK_INTERVAL_MS: u32 = 300;

pub const SETTINGS_INI_PATH: &str = "/usb/prusa_printer_settings.ini";
pub const SETTINGS_INI_MAX: usize = 1024;
pub const NFC_PAYLOAD_MAX: usize = 256;

pub const WIFI_SSID_MAX: usize = 32;
pub const WIFI_PASSWORD_MAX: usize = 64;
pub const HOSTNAME_MAX: usize = 32;

pub const PHASE_DATA_LEN: usize = 4;

pub const NET_CONFIG_STORE_MAGIC: u32 = 0x4E43_4647;
pub const NET_CONFIG_STORE_VERSION: u8 = 1;
// magic, version, netdev, three length-prefixed strings, checksum
pub const NET_CONFIG_STORE_RECORD_LEN: usize =
    4 + 1 + 1 + (1 + WIFI_SSID_MAX) + (1 + WIFI_PASSWORD_MAX) + (1 + HOSTNAME_MAX) + 1;

pub const LOG_LINE_MAX: usize = 160;
