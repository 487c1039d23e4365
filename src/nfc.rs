use crate::network_wizard::WifiCredentials;

const NDEF_FLAG_ME: u8 = 0x40;
const NDEF_FLAG_SR: u8 = 0x10;
const NDEF_FLAG_IL: u8 = 0x08;
const NDEF_TNF_MASK: u8 = 0x07;
const NDEF_TNF_MEDIA: u8 = 0x02;
const WSC_MIME_TYPE: &[u8] = b"application/vnd.wfa.wsc";

const WSC_ATTR_CREDENTIAL: u16 = 0x100E;
const WSC_ATTR_SSID: u16 = 0x1045;
const WSC_ATTR_NETWORK_KEY: u16 = 0x1027;

struct NdefRecord<'a> {
    tnf: u8,
    record_type: &'a [u8],
    payload: &'a [u8],
    last: bool,
}

/// Decodes the first Wi-Fi Simple Config record of an NDEF message.
pub fn parse_wifi_credentials(message: &[u8]) -> Option<WifiCredentials> {
    let mut rest = message;
    while !rest.is_empty() {
        let (record, tail) = next_record(rest)?;
        if record.tnf == NDEF_TNF_MEDIA && record.record_type == WSC_MIME_TYPE {
            return parse_wsc_payload(record.payload);
        }
        if record.last {
            break;
        }
        rest = tail;
    }
    None
}

fn next_record(buf: &[u8]) -> Option<(NdefRecord<'_>, &[u8])> {
    let (&header, rest) = buf.split_first()?;
    let (&type_len, mut rest) = rest.split_first()?;

    let payload_len = if header & NDEF_FLAG_SR != 0 {
        let (&len, tail) = rest.split_first()?;
        rest = tail;
        len as usize
    } else {
        let (len, tail) = rest.split_at_checked(4)?;
        rest = tail;
        u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize
    };

    let id_len = if header & NDEF_FLAG_IL != 0 {
        let (&len, tail) = rest.split_first()?;
        rest = tail;
        len as usize
    } else {
        0
    };

    let (record_type, rest) = rest.split_at_checked(type_len as usize)?;
    let (_id, rest) = rest.split_at_checked(id_len)?;
    let (payload, rest) = rest.split_at_checked(payload_len)?;

    Some((
        NdefRecord {
            tnf: header & NDEF_TNF_MASK,
            record_type,
            payload,
            last: header & NDEF_FLAG_ME != 0,
        },
        rest,
    ))
}

fn parse_wsc_payload(payload: &[u8]) -> Option<WifiCredentials> {
    let credential = find_attr(payload, WSC_ATTR_CREDENTIAL)?;
    let ssid = find_attr(credential, WSC_ATTR_SSID)?;
    let key = find_attr(credential, WSC_ATTR_NETWORK_KEY).unwrap_or(&[]);
    WifiCredentials::from_bytes(ssid, key).ok()
}

fn find_attr(mut buf: &[u8], wanted: u16) -> Option<&[u8]> {
    while buf.len() >= 4 {
        let attr = u16::from_be_bytes([buf[0], buf[1]]);
        let len = u16::from_be_bytes([buf[2], buf[3]]) as usize;
        let (value, rest) = buf[4..].split_at_checked(len)?;
        if attr == wanted {
            return Some(value);
        }
        buf = rest;
    }
    None
}
