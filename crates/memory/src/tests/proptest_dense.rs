use proptest::prelude::*;

use crate::{DenseMemory, MemoryBus};

const RAM_SIZE: usize = 0x1000;

proptest! {
    #[test]
    fn in_range_writes_round_trip(
        paddr in 0u64..(RAM_SIZE as u64 - 64),
        bytes in proptest::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut mem = DenseMemory::new(RAM_SIZE);
        mem.write_physical(paddr, &bytes);

        let mut back = vec![0u8; bytes.len()];
        mem.read_physical(paddr, &mut back);
        prop_assert_eq!(back, bytes);
    }

    #[test]
    fn arbitrary_accesses_never_panic(paddr in any::<u64>(), len in 0usize..256) {
        let mut mem = DenseMemory::new(RAM_SIZE);
        let data = vec![0x5Au8; len];
        mem.write_physical(paddr, &data);

        let mut back = vec![0u8; len];
        mem.read_physical(paddr, &mut back);
        prop_assert_eq!(back.len(), len);
    }
}
