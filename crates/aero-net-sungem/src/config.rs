use thiserror::Error;

/// Construction-time parameters for [`crate::SunGemDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunGemConfig {
    /// Station address loaded into the primary address registers on bus reset.
    pub mac_addr: [u8; 6],
    /// MIF address the transceiver answers on.
    pub phy_addr: u8,
}

impl Default for SunGemConfig {
    fn default() -> Self {
        Self {
            mac_addr: [0x52, 0x54, 0x00, 0x12, 0x34, 0x56],
            phy_addr: 0,
        }
    }
}

impl SunGemConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.phy_addr > 0x1f {
            return Err(ConfigError::PhyAddrOutOfRange(self.phy_addr));
        }
        if self.mac_addr[0] & 0x01 != 0 {
            return Err(ConfigError::MulticastMacAddr(self.mac_addr));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("transceiver address {0} does not fit the 5-bit MIF address field")]
    PhyAddrOutOfRange(u8),
    #[error("station address {0:02x?} has the group bit set")]
    MulticastMacAddr([u8; 6]),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(SunGemConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_phy_and_group_address() {
        let cfg = SunGemConfig {
            phy_addr: 32,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::PhyAddrOutOfRange(32)));

        let cfg = SunGemConfig {
            mac_addr: [0x01, 0, 0x5e, 0, 0, 1],
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::MulticastMacAddr(_))
        ));
        assert!(cfg
            .validate()
            .unwrap_err()
            .to_string()
            .contains("group bit"));
    }
}
