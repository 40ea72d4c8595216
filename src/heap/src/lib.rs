pub mod allocator;

pub use allocator::{
    AllocError, AllocFailure, Allocator, FailingAllocator, SystemAllocator, TrackingAllocator,
};

/// An owned, fixed-length run of integers handed out by an [`Allocator`].
///
/// The length never changes after allocation. Give it back through
/// [`Allocator::release`] so tracking allocators see the release.
#[derive(Debug, PartialEq, Eq)]
pub struct IntBuffer {
    values: Box<[i32]>,
}

impl IntBuffer {
    fn from_vec(values: Vec<i32>) -> Self {
        IntBuffer {
            values: values.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.values
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.values.into_vec()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, i32> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for &'a IntBuffer {
    type Item = &'a i32;
    type IntoIter = std::slice::Iter<'a, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
