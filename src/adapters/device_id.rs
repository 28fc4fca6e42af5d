//! Device identity derived from the WiFi station MAC address.
//!
//! The identity is six colon-separated lowercase hex bytes with no
//! per-byte zero padding (`0x03` renders as `3`). Dashboards already key
//! on this exact text, so the unpadded form is kept.

use core::fmt::Write;

/// Identity text: at most 6 × "ff" + 5 separators.
pub type DeviceIdString = heapless::String<24>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the station interface MAC.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_read_mac(
            mac.as_mut_ptr(),
            esp_idf_svc::sys::esp_mac_type_t_ESP_MAC_WIFI_STA,
        );
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0x0A, 0x05]
}

/// Format `mac` as `b0:b1:b2:b3:b4:b5`, lowercase, unpadded.
pub fn format_mac(mac: &MacAddress) -> DeviceIdString {
    let mut id = DeviceIdString::new();
    for (i, b) in mac.iter().enumerate() {
        if i > 0 {
            let _ = id.push(':');
        }
        let _ = write!(id, "{:x}", b);
    }
    id
}

/// Identity of this node, read once at boot.
pub fn device_identity() -> DeviceIdString {
    format_mac(&read_mac())
}
