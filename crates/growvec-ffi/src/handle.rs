//! Slot+generation table mapping opaque `u64` handles to owned buffers.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation at
//! insertion time (lower 32 bits). Removing a value bumps the slot's
//! generation, so handles to destroyed buffers stop resolving instead of
//! aliasing whatever reuses the slot.

fn encode(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn decode(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Owned values addressed by generation-checked handles.
pub(crate) struct HandleTable<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    live: usize,
}

impl<T> HandleTable<T> {
    /// Create an empty handle table.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Store `value`, reusing a freed slot when one is available.
    pub fn insert(&mut self, value: T) -> u64 {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.value = Some(value);
                encode(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    value: Some(value),
                });
                encode(index, 0)
            }
        }
    }

    /// Resolve a handle. `None` for stale or never-issued handles.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (index, generation) = decode(handle);
        let slot = self.slots.get(index as usize)?;
        (slot.generation == generation)
            .then_some(slot.value.as_ref())
            .flatten()
    }

    /// Resolve a handle mutably. `None` for stale or never-issued handles.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (index, generation) = decode(handle);
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Take the value out and invalidate the handle.
    ///
    /// A slot whose generation wraps back to 0 is retired rather than
    /// recycled, so a handle from its first lifetime can never resolve again.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (index, generation) = decode(handle);
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        if slot.generation != 0 {
            self.free.push(index);
        }
        self.live -= 1;
        Some(value)
    }

    /// Number of values currently stored.
    pub fn live(&self) -> usize {
        self.live
    }
}
