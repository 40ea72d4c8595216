use {
    crate::IntBuffer,
    derive_more::Display,
    std::{cell::Cell, mem::size_of},
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AllocFailure {
    #[display("capacity overflow")]
    CapacityOverflow,
    #[display("out of memory")]
    OutOfMemory,
    #[display("injected fault")]
    Injected,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
#[display("failed to allocate {len} integers: {reason}")]
pub struct AllocError {
    pub len: usize,
    pub reason: AllocFailure,
}

impl std::error::Error for AllocError {}

pub trait Allocator {
    fn allocate(&self, len: usize) -> Result<IntBuffer, AllocError>;

    /// Gives the buffer back and returns what it held.
    fn release(&self, buffer: IntBuffer) -> Vec<i32> {
        buffer.into_vec()
    }
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, len: usize) -> Result<IntBuffer, AllocError> {
        (**self).allocate(len)
    }

    fn release(&self, buffer: IntBuffer) -> Vec<i32> {
        (**self).release(buffer)
    }
}

/// Backed by the global allocator. Failure is reported, never aborted on.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl Allocator for SystemAllocator {
    fn allocate(&self, len: usize) -> Result<IntBuffer, AllocError> {
        let fits = len
            .checked_mul(size_of::<i32>())
            .is_some_and(|bytes| bytes <= isize::MAX as usize);
        if !fits {
            return Err(AllocError {
                len,
                reason: AllocFailure::CapacityOverflow,
            });
        }
        let mut values = Vec::new();
        values.try_reserve_exact(len).map_err(|_| AllocError {
            len,
            reason: AllocFailure::OutOfMemory,
        })?;
        values.resize(len, 0);
        Ok(IntBuffer::from_vec(values))
    }
}

/// Refuses every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingAllocator;

impl Allocator for FailingAllocator {
    fn allocate(&self, len: usize) -> Result<IntBuffer, AllocError> {
        Err(AllocError {
            len,
            reason: AllocFailure::Injected,
        })
    }
}

/// Counts what passes through the wrapped allocator.
#[derive(Debug, Default)]
pub struct TrackingAllocator<A> {
    inner: A,
    allocations: Cell<usize>,
    failures: Cell<usize>,
    releases: Cell<usize>,
    live: Cell<usize>,
}

impl<A: Allocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        TrackingAllocator {
            inner,
            allocations: Cell::new(0),
            failures: Cell::new(0),
            releases: Cell::new(0),
            live: Cell::new(0),
        }
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    pub fn releases(&self) -> usize {
        self.releases.get()
    }

    /// Buffers handed out by this tracker and not yet released. Releasing a
    /// buffer from elsewhere never takes this below zero.
    pub fn live(&self) -> usize {
        self.live.get()
    }
}

impl<A: Allocator> Allocator for TrackingAllocator<A> {
    fn allocate(&self, len: usize) -> Result<IntBuffer, AllocError> {
        let result = self.inner.allocate(len);
        match result {
            Ok(_) => {
                self.allocations.set(self.allocations.get() + 1);
                self.live.set(self.live.get() + 1);
            }
            Err(_) => self.failures.set(self.failures.get() + 1),
        }
        result
    }

    fn release(&self, buffer: IntBuffer) -> Vec<i32> {
        self.releases.set(self.releases.get() + 1);
        self.live.set(self.live.get().saturating_sub(1));
        self.inner.release(buffer)
    }
}
