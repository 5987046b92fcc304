use alloc::vec::Vec;

use super::handle::Handle;
use crate::AllocError;

enum Slot<T> {
    Occupied(T),
    // Next entry of the intrusive free list.
    Vacant(Option<Handle>),
}

/// Node allocator: hands out one slot at a time and recycles freed slots.
///
/// Freed slots are threaded through an intrusive free list so `deallocate_one` never shrinks
/// `slots` and handles of live elements stay valid.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(Handle::MAX)),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Ensures the next `additional` calls to `allocate_one` will not need to allocate.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let vacant = self.slots.len() - self.len;
        let needed = additional.saturating_sub(vacant);
        if needed == 0 {
            return Ok(());
        }
        if self.slots.len().saturating_add(needed) > Handle::MAX {
            return Err(AllocError::CapacityOverflow);
        }
        self.slots.try_reserve(needed).map_err(|_| AllocError::OutOfMemory)
    }

    pub(crate) fn allocate_one(&mut self, element: T) -> Handle {
        let handle = if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.to_index()];
            let Slot::Vacant(next) = *slot else {
                panic!("`Arena::allocate_one()` - free list points at an occupied slot!");
            };
            self.free_head = next;
            *slot = Slot::Occupied(element);
            handle
        } else {
            // Caps the arena at `Handle::MAX` slots, leaving index `Handle::MAX` itself unused.
            // `try_reserve` and `RBTree::max_size` use the same bound.
            assert!(
                self.slots.len() < Handle::MAX,
                "`Arena::allocate_one()` - arena is at maximum capacity ({})",
                Handle::MAX
            );
            self.slots.push(Slot::Occupied(element));
            Handle::from_index(self.slots.len() - 1)
        };
        self.len += 1;
        handle
    }

    pub(crate) fn deallocate_one(&mut self, handle: Handle) -> T {
        let slot = core::mem::replace(&mut self.slots[handle.to_index()], Slot::Vacant(self.free_head));
        match slot {
            Slot::Occupied(element) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Slot::Vacant(next) => {
                self.slots[handle.to_index()] = Slot::Vacant(next);
                panic!("`Arena::deallocate_one()` - `handle` is invalid!");
            }
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match &self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant(_) => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match &mut self.slots[handle.to_index()] {
            Slot::Occupied(element) => element,
            Slot::Vacant(_) => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Drops every element and forgets every handle, keeping the allocation.
    pub(crate) fn reset(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
