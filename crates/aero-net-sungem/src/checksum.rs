//! Frame checksums computed by the MAC.

const CRC32_POLY_LE: u32 = 0xedb8_8320;

/// Ones'-complement sum of `data` as big-endian 16-bit words, folded and complemented.
///
/// An odd trailing byte is treated as the high byte of a final word. The result is ready to be
/// stored big-endian into a frame.
pub fn raw_checksum(data: &[u8]) -> u16 {
    let mut sum: u64 = 0;
    let mut words = data.chunks_exact(2);
    for word in &mut words {
        sum += u64::from(u16::from_be_bytes([word[0], word[1]]));
    }
    if let [last] = words.remainder() {
        sum += u64::from(*last) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xffff) + (sum >> 16);
    }
    !(sum as u16)
}

/// Bitwise reflected CRC-32 update without pre or post inversion.
pub fn crc32_update(mut crc: u32, data: &[u8]) -> u32 {
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ CRC32_POLY_LE
            } else {
                crc >> 1
            };
        }
    }
    crc
}

/// CRC of a destination address as latched by the receive filter.
///
/// Bits 31..24 select the multicast hash bucket; bits 31..16 are reported in the RX
/// descriptor's hash field.
pub fn address_crc(dst: &[u8; 6]) -> u32 {
    !crc32_update(0, dst)
}
