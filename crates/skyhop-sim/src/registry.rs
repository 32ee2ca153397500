//! Fixed-capacity, append-only storage shared by every world registry

use skyhop_core::{Handle, Result, SkyhopError};
use std::marker::PhantomData;

/// Preallocated storage whose handles are dense slot indices.
///
/// Slots are never freed or reused, so a handle stays valid for the
/// lifetime of the registry.
#[derive(Debug, Clone)]
pub struct Registry<H, T> {
    items: Vec<T>,
    capacity: usize,
    _handle: PhantomData<H>,
}

impl<H: Handle, T> Registry<H, T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            _handle: PhantomData,
        }
    }

    /// Append an item, failing once the registry is full
    pub fn push(&mut self, item: T) -> Result<H> {
        if self.items.len() >= self.capacity {
            return Err(SkyhopError::CapacityExceeded {
                registry: H::KIND,
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(H::from_index(self.items.len() - 1))
    }

    /// Append an item built from the handle it will receive
    pub fn push_with(&mut self, build: impl FnOnce(H) -> T) -> Result<H> {
        let handle = self.next_handle()?;
        self.items.push(build(handle));
        Ok(handle)
    }

    fn next_handle(&self) -> Result<H> {
        if self.items.len() >= self.capacity {
            return Err(SkyhopError::CapacityExceeded {
                registry: H::KIND,
                capacity: self.capacity,
            });
        }
        Ok(H::from_index(self.items.len()))
    }

    pub fn get(&self, handle: H) -> Option<&T> {
        self.items.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Like `get`, but a missing slot is an `InvalidReference` error
    pub fn try_get(&self, handle: H) -> Result<&T> {
        self.get(handle).ok_or(SkyhopError::InvalidReference {
            kind: H::KIND,
            index: handle.index(),
        })
    }

    pub fn try_get_mut(&mut self, handle: H) -> Result<&mut T> {
        self.items
            .get_mut(handle.index())
            .ok_or(SkyhopError::InvalidReference {
                kind: H::KIND,
                index: handle.index(),
            })
    }

    pub fn contains(&self, handle: H) -> bool {
        handle.index() < self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = (H, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (H::from_index(i), item))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }
}
