use memory::DenseMemory;

use crate::regs::{
    GREG_IMASK, GREG_STAT, GREG_STAT2, MAC_CSTAT, MAC_MCMASK, MAC_RXMASK, MAC_RXSTAT, MAC_TXMASK,
    MAC_TXSTAT,
};
use crate::{GlobalStatus, SunGemDevice};

fn device() -> (SunGemDevice, DenseMemory) {
    let mut dev = SunGemDevice::new([0x02, 0, 0, 0, 0, 1]);
    let mut mem = DenseMemory::new(0x100);
    dev.mmio_write_u32(GREG_IMASK.offset(), 0, &mut mem);
    dev.mmio_write_u32(MAC_TXMASK.offset(), u32::MAX, &mut mem);
    dev.mmio_write_u32(MAC_RXMASK.offset(), u32::MAX, &mut mem);
    dev.mmio_write_u32(MAC_MCMASK.offset(), u32::MAX, &mut mem);
    (dev, mem)
}

#[test]
fn unmasking_a_pending_mac_cause_raises_the_line() {
    let (mut dev, mut mem) = device();
    dev.regs[MAC_TXSTAT] = 0x1;
    assert!(!dev.irq_level());

    dev.mmio_write_u32(MAC_TXMASK.offset(), !0x1, &mut mem);
    assert_eq!(dev.regs[GREG_STAT], GlobalStatus::TXMAC.bits());
    assert!(dev.irq_level());

    // Masking again retracts the aggregate bit.
    dev.mmio_write_u32(MAC_TXMASK.offset(), u32::MAX, &mut mem);
    assert_eq!(dev.regs[GREG_STAT], 0);
    assert!(!dev.irq_level());
}

#[test]
fn mac_status_registers_clear_on_read() {
    let (mut dev, mut mem) = device();
    dev.regs[MAC_RXSTAT] = 0x4;
    dev.mmio_write_u32(MAC_RXMASK.offset(), 0, &mut mem);
    assert!(dev.irq_level());

    assert_eq!(dev.mmio_read_u32(MAC_RXSTAT.offset()), 0x4);
    assert_eq!(dev.mmio_read_u32(MAC_RXSTAT.offset()), 0);
    assert_eq!(dev.regs[GREG_STAT] & GlobalStatus::RXMAC.bits(), 0);
    assert!(!dev.irq_level());

    dev.regs[MAC_TXSTAT] = 0x2;
    dev.mmio_write_u32(MAC_TXMASK.offset(), 0, &mut mem);
    assert_eq!(dev.mmio_read_u32(MAC_TXSTAT.offset()), 0x2);
    assert!(!dev.irq_level());
}

#[test]
fn control_status_read_keeps_pause_pointer() {
    let (mut dev, mut mem) = device();
    dev.regs[MAC_CSTAT] = 0x1234_0001;
    dev.mmio_write_u32(MAC_MCMASK.offset(), 0, &mut mem);
    assert!(dev.irq_level());

    assert_eq!(dev.mmio_read_u32(MAC_CSTAT.offset()), 0x1234_0001);
    assert_eq!(dev.regs[MAC_CSTAT], 0x1234_0000);
    assert!(!dev.irq_level());

    // The pointer field alone is not a cause.
    dev.mmio_write_u32(MAC_MCMASK.offset(), 0, &mut mem);
    assert!(!dev.irq_level());
}

#[test]
fn status_read_clears_only_latched_causes() {
    let (mut dev, _mem) = device();
    dev.regs[GREG_STAT] = (GlobalStatus::RXDONE | GlobalStatus::MIF | GlobalStatus::PCS).bits();
    dev.eval_irq();

    let alias = dev.mmio_read_u32(GREG_STAT2.offset());
    assert_eq!(alias, dev.regs[GREG_STAT]);

    let stat = dev.mmio_read_u32(GREG_STAT.offset());
    assert_eq!(stat, alias);
    assert_eq!(
        dev.regs[GREG_STAT],
        (GlobalStatus::MIF | GlobalStatus::PCS).bits()
    );
    assert!(dev.irq_level());
}
