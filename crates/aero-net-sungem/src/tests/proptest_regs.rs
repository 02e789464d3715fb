use memory::DenseMemory;
use proptest::prelude::*;

use crate::regs::{write_filter, GREG_IACK, GREG_SWRST, MIF_FRAME};
use crate::{Reg, SunGemDevice, BANKS};

fn any_reg() -> impl Strategy<Value = Reg> {
    (0..BANKS.len())
        .prop_flat_map(|bank| (Just(bank), 0..BANKS[bank].count))
        .prop_map(|(bank, index)| {
            let offset = BANKS[bank].base + index * 4;
            Reg::decode(u64::from(offset)).unwrap()
        })
}

fn has_write_side_effect(reg: Reg) -> bool {
    matches!(reg, GREG_IACK | GREG_SWRST | MIF_FRAME)
}

proptest! {
    #[test]
    fn plain_registers_read_back_filtered_value(reg in any_reg(), value in any::<u32>()) {
        prop_assume!(!has_write_side_effect(reg));

        let mut dev = SunGemDevice::new([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        let mut mem = DenseMemory::new(0x1000);
        let before = dev.regs()[reg];
        dev.mmio_write_u32(reg.offset(), value, &mut mem);

        let expected = write_filter(reg, value).unwrap_or(before);
        prop_assert_eq!(dev.regs()[reg], expected);
    }

    #[test]
    fn unmapped_offsets_read_all_ones(offset in 0u64..0x20_0000) {
        prop_assume!(Reg::decode(offset).is_err());
        let mut dev = SunGemDevice::new([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        let mut mem = DenseMemory::new(0x1000);
        dev.mmio_write_u32(offset, 0x1234_5678, &mut mem);
        prop_assert_eq!(dev.mmio_read_u32(offset), u32::MAX);
    }

    #[test]
    fn mmio_never_panics(ops in proptest::collection::vec((0u64..0xa000, any::<u32>(), any::<bool>()), 0..64)) {
        let mut dev = SunGemDevice::new([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        let mut mem = DenseMemory::new(0x4000);
        for (offset, value, write) in ops {
            if write {
                dev.mmio_write_u32(offset, value, &mut mem);
            } else {
                let _ = dev.mmio_read_u32(offset);
            }
        }
    }
}
