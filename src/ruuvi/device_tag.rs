use macaddr::MacAddr6;

/// Formats a hardware address the way RuuviTag device tags are keyed:
/// twelve upper-case hex digits without separators.
pub fn device_tag(mac: &MacAddr6) -> String {
    mac.as_bytes().iter().map(|b| format!("{b:02X}")).collect()
}
