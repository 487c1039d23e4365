use embassy_time::Instant;
use embedded_storage::ReadStorage;
use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;

use crate::logging::DebugChannel;
use crate::storage::FlashConfigStore;
use crate::time::Clock;

/// Millisecond clock backed by the embassy time driver of the firmware.
#[derive(Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping counter `ticks_diff` expects.
        Instant::now().as_millis() as u32
    }
}

#[derive(Clone, Copy, Default)]
pub struct UartDebugChannel;

impl DebugChannel for UartDebugChannel {
    fn put_bytes(&mut self, bytes: &[u8]) {
        esp_println::Printer::write_bytes(bytes);
    }
}

/// Network settings kept in the last flash sector.
pub fn flash_config_store(flash_peripheral: FLASH<'_>) -> FlashConfigStore<FlashStorage<'_>> {
    let flash = FlashStorage::new(flash_peripheral).multicore_auto_park();
    let capacity = flash.capacity() as u32;
    let offset = capacity.saturating_sub(FlashStorage::SECTOR_SIZE);
    FlashConfigStore::new(flash, offset)
}
