//! Network backend primitives used to bridge emulated NICs to host glue.
//!
//! This crate deals exclusively with raw Ethernet frames (`Vec<u8>`). NIC models never talk to a
//! backend directly; a pump (see `aero-net-pump`) moves frames between the two so device code
//! stays free of host I/O.
#![forbid(unsafe_code)]

pub mod queue_backend;

pub use queue_backend::FrameQueueBackend;

/// Network backend to bridge frames between emulated NICs and the outside world.
pub trait NetworkBackend {
    /// Transmit a guest → host Ethernet frame.
    fn transmit(&mut self, frame: Vec<u8>);

    /// Poll for a host → guest Ethernet frame.
    ///
    /// Backends may return immediate responses when the guest transmits, allowing round-trips
    /// within a single emulation tick when used by a pump.
    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        None
    }

    /// Whether the host side of the link is currently up.
    ///
    /// NIC models surface this through their PHY link-status bits.
    fn link_up(&self) -> bool {
        true
    }
}

impl<T: NetworkBackend + ?Sized> NetworkBackend for Box<T> {
    fn transmit(&mut self, frame: Vec<u8>) {
        <T as NetworkBackend>::transmit(&mut **self, frame);
    }

    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        <T as NetworkBackend>::poll_receive(&mut **self)
    }

    fn link_up(&self) -> bool {
        <T as NetworkBackend>::link_up(&**self)
    }
}

impl<T: NetworkBackend + ?Sized> NetworkBackend for &mut T {
    fn transmit(&mut self, frame: Vec<u8>) {
        <T as NetworkBackend>::transmit(&mut **self, frame);
    }

    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        <T as NetworkBackend>::poll_receive(&mut **self)
    }

    fn link_up(&self) -> bool {
        <T as NetworkBackend>::link_up(&**self)
    }
}

/// A disconnected cable: frames go nowhere and the link reports down.
impl NetworkBackend for () {
    fn transmit(&mut self, _frame: Vec<u8>) {}

    fn link_up(&self) -> bool {
        false
    }
}

impl<B: NetworkBackend> NetworkBackend for Option<B> {
    fn transmit(&mut self, frame: Vec<u8>) {
        if let Some(backend) = self.as_mut() {
            backend.transmit(frame);
        }
    }

    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        self.as_mut().and_then(|backend| backend.poll_receive())
    }

    fn link_up(&self) -> bool {
        self.as_ref().is_some_and(|backend| backend.link_up())
    }
}

impl<T: NetworkBackend + ?Sized> NetworkBackend for std::rc::Rc<std::cell::RefCell<T>> {
    fn transmit(&mut self, frame: Vec<u8>) {
        self.borrow_mut().transmit(frame);
    }

    fn poll_receive(&mut self) -> Option<Vec<u8>> {
        self.borrow_mut().poll_receive()
    }

    fn link_up(&self) -> bool {
        self.borrow().link_up()
    }
}
