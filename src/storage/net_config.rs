use core::fmt::Debug;

use embedded_storage::{ReadStorage, Storage};
use heapless::String;
use log::warn;

use crate::config::{
    HOSTNAME_MAX, NET_CONFIG_STORE_MAGIC, NET_CONFIG_STORE_RECORD_LEN, NET_CONFIG_STORE_VERSION,
    WIFI_PASSWORD_MAX, WIFI_SSID_MAX,
};
use crate::network_wizard::{ConfigStore, NetdevId};

const NETDEV_OFFSET: usize = 5;
const SSID_OFFSET: usize = NETDEV_OFFSET + 1;
const PASSWORD_OFFSET: usize = SSID_OFFSET + 1 + WIFI_SSID_MAX;
const HOSTNAME_OFFSET: usize = PASSWORD_OFFSET + 1 + WIFI_PASSWORD_MAX;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct NetConfig {
    pub active_netdev: NetdevId,
    pub wifi_ssid: String<WIFI_SSID_MAX>,
    pub wifi_password: String<WIFI_PASSWORD_MAX>,
    pub hostname: String<HOSTNAME_MAX>,
}

impl NetConfig {
    pub fn record_bytes(&self) -> [u8; NET_CONFIG_STORE_RECORD_LEN] {
        let mut record = [0xFFu8; NET_CONFIG_STORE_RECORD_LEN];
        record[0..4].copy_from_slice(&NET_CONFIG_STORE_MAGIC.to_le_bytes());
        record[4] = NET_CONFIG_STORE_VERSION;
        record[NETDEV_OFFSET] = self.active_netdev.as_u8();
        write_field(&mut record, SSID_OFFSET, WIFI_SSID_MAX, &self.wifi_ssid);
        write_field(&mut record, PASSWORD_OFFSET, WIFI_PASSWORD_MAX, &self.wifi_password);
        write_field(&mut record, HOSTNAME_OFFSET, HOSTNAME_MAX, &self.hostname);
        record[NET_CONFIG_STORE_RECORD_LEN - 1] =
            checksum8(&record[..NET_CONFIG_STORE_RECORD_LEN - 1]);
        record
    }

    pub fn from_record(record: &[u8; NET_CONFIG_STORE_RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]])
            != NET_CONFIG_STORE_MAGIC
        {
            return None;
        }
        if record[4] != NET_CONFIG_STORE_VERSION {
            return None;
        }
        let expected = checksum8(&record[..NET_CONFIG_STORE_RECORD_LEN - 1]);
        if expected != record[NET_CONFIG_STORE_RECORD_LEN - 1] {
            return None;
        }
        Some(Self {
            active_netdev: NetdevId::from_u8(record[NETDEV_OFFSET])?,
            wifi_ssid: read_field(record, SSID_OFFSET)?,
            wifi_password: read_field(record, PASSWORD_OFFSET)?,
            hostname: read_field(record, HOSTNAME_OFFSET)?,
        })
    }
}

fn write_field(record: &mut [u8], offset: usize, capacity: usize, value: &str) {
    let bytes = value.as_bytes();
    let len = bytes.len().min(capacity);
    record[offset] = len as u8;
    record[offset + 1..offset + 1 + len].copy_from_slice(&bytes[..len]);
}

fn read_field<const N: usize>(record: &[u8], offset: usize) -> Option<String<N>> {
    let len = record[offset] as usize;
    if len > N {
        return None;
    }
    let value = core::str::from_utf8(&record[offset + 1..offset + 1 + len]).ok()?;
    let mut out = String::new();
    out.push_str(value).ok()?;
    Some(out)
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

/// `ConfigStore` persisted as a single record at a fixed storage offset.
pub struct FlashConfigStore<S> {
    storage: S,
    offset: u32,
    current: NetConfig,
}

impl<S> FlashConfigStore<S>
where
    S: Storage,
    S::Error: Debug,
{
    pub fn new(mut storage: S, offset: u32) -> Self {
        let mut record = [0u8; NET_CONFIG_STORE_RECORD_LEN];
        let current = match storage.read(offset, &mut record) {
            Ok(()) => NetConfig::from_record(&record).unwrap_or_default(),
            Err(err) => {
                warn!("net_config: load err={:?}", err);
                NetConfig::default()
            }
        };
        Self {
            storage,
            offset,
            current,
        }
    }

    pub fn config(&self) -> &NetConfig {
        &self.current
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    fn update(&mut self, apply: impl FnOnce(&mut NetConfig)) {
        let mut next = self.current.clone();
        apply(&mut next);
        if next == self.current {
            return;
        }
        if let Err(err) = self.storage.write(self.offset, &next.record_bytes()) {
            warn!("net_config: save err={:?}", err);
        }
        self.current = next;
    }
}

impl<S> ConfigStore for FlashConfigStore<S>
where
    S: Storage,
    S::Error: Debug,
{
    fn active_netdev(&self) -> NetdevId {
        self.current.active_netdev
    }

    fn set_active_netdev(&mut self, id: NetdevId) {
        self.update(|config| config.active_netdev = id);
    }

    fn set_wifi_ssid(&mut self, ssid: &str) {
        self.update(|config| set_truncated(&mut config.wifi_ssid, ssid));
    }

    fn set_wifi_password(&mut self, password: &str) {
        self.update(|config| set_truncated(&mut config.wifi_password, password));
    }

    fn set_hostname(&mut self, hostname: &str) {
        self.update(|config| set_truncated(&mut config.hostname, hostname));
    }
}

fn set_truncated<const N: usize>(out: &mut String<N>, value: &str) {
    out.clear();
    for ch in value.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
}
