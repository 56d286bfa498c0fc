//! Header checksums used by LZH/LHA archives.
//!
//! Two independent checks protect an entry header:
//!
//! - **CRC-16/ARC** (polynomial 0xA001, reflected, initial value 0): the
//!   header CRC of level 2 and 3 headers, and the payload CRC stored in every
//!   level.
//! - **Byte-sum**: an 8-bit additive checksum over the method-through-name
//!   span of level 0 and level 1 headers.
//!
//! The lookup table is built at compile time, so it is shared read-only by
//! every caller without any initialisation step.

/// CRC-16/ARC polynomial (x^16 + x^15 + x^2 + 1), reflected.
pub const CRC16_POLY: u16 = 0xA001;

/// CRC-16/ARC lookup table (polynomial 0xA001, reflected).
const CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0usize;
    while i < 256 {
        let mut crc = i as u16;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ CRC16_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Access the CRC-16 lookup table.
pub fn crc16_table() -> &'static [u16; 256] {
    &CRC16_TABLE
}

/// Fold one byte into a running CRC-16.
#[inline(always)]
pub fn update_crc(crc: u16, byte: u8) -> u16 {
    CRC16_TABLE[((crc ^ byte as u16) & 0xFF) as usize] ^ (crc >> 8)
}

/// Fold a byte slice into a running CRC-16 and return the new value.
#[inline]
pub fn calc_crc(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &byte| update_crc(crc, byte))
}

/// 8-bit additive checksum used by level 0 and level 1 headers.
#[inline]
pub fn calc_sum(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// CRC-16 calculator (CRC-16/ARC).
///
/// This is the CRC used by LZH/LHA archives.
///
/// - Polynomial: 0x8005 (reflected: 0xA001)
/// - Initial value: 0x0000
/// - Final XOR: 0x0000
/// - Reflected input: Yes
/// - Reflected output: Yes
///
/// # Example
///
/// ```
/// use oxilha_core::crc::Crc16;
///
/// let mut crc = Crc16::new();
/// crc.update(b"123456789");
/// assert_eq!(crc.finalize(), 0xBB3D);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    /// Create a new CRC-16 calculator.
    pub fn new() -> Self {
        Self { crc: 0x0000 }
    }

    /// Create a calculator that continues from an existing CRC value.
    pub fn with_initial(crc: u16) -> Self {
        Self { crc }
    }

    /// Reset the CRC to its initial state.
    pub fn reset(&mut self) {
        self.crc = 0x0000;
    }

    /// Update the CRC with more data.
    pub fn update(&mut self, data: &[u8]) {
        self.crc = calc_crc(self.crc, data);
    }

    /// Update the CRC with a single byte.
    #[inline]
    pub fn update_byte(&mut self, byte: u8) {
        self.crc = update_crc(self.crc, byte);
    }

    /// Get the current CRC value.
    pub fn value(&self) -> u16 {
        self.crc
    }

    /// Finalize and return the CRC value.
    pub fn finalize(self) -> u16 {
        self.crc
    }

    /// Compute CRC-16 for a slice in one call.
    pub fn compute(data: &[u8]) -> u16 {
        calc_crc(0, data)
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bit-at-a-time CRC-16/ARC update, independent of the table.
    fn bitwise_update(mut crc: u16, byte: u8) -> u16 {
        crc ^= byte as u16;
        for _ in 0..8 {
            crc = if crc & 1 != 0 {
                (crc >> 1) ^ 0xA001
            } else {
                crc >> 1
            };
        }
        crc
    }

    #[test]
    fn test_crc16_empty() {
        assert_eq!(Crc16::compute(b""), 0x0000);
    }

    #[test]
    fn test_crc16_check() {
        // Standard CRC-16/ARC check value for "123456789"
        assert_eq!(Crc16::compute(b"123456789"), 0xBB3D);
    }

    #[test]
    fn test_crc16_modbus_check() {
        // Same table seeded with 0xFFFF is CRC-16/MODBUS
        assert_eq!(calc_crc(0xFFFF, b"123456789"), 0x4B37);
    }

    #[test]
    fn test_crc16_incremental() {
        let mut crc = Crc16::new();
        crc.update(b"12345");
        crc.update(b"6789");
        assert_eq!(crc.finalize(), 0xBB3D);

        let mut crc = Crc16::with_initial(calc_crc(0, b"1234"));
        for &b in b"56789" {
            crc.update_byte(b);
        }
        assert_eq!(crc.value(), 0xBB3D);
    }

    #[test]
    fn test_crc16_table_correctness() {
        let table = crc16_table();
        for (i, &entry) in table.iter().enumerate() {
            assert_eq!(entry, bitwise_update(0, i as u8), "table[{}]", i);
        }
        assert_eq!(table[0], 0x0000);
        assert_eq!(table[1], 0xC0C1);
        assert_eq!(table[255], 0x4040);
    }

    #[test]
    fn test_calc_sum_wraps() {
        assert_eq!(calc_sum(b""), 0);
        assert_eq!(calc_sum(&[0x80, 0x80, 0x01]), 0x01);
        // 0x2D + 0x6C + 0x68 + 0x30 + 0x2D = 0x15E
        assert_eq!(calc_sum(b"-lh0-"), 0x5E);
    }
}
