//! Generational handle table for module instances.
//!
//! A handle packs a slot index (upper 32 bits) and the slot's generation
//! (lower 32 bits). Removing an entry bumps the generation, so a handle
//! used after `micro_module_destroy` no longer matches and resolves to
//! `None`. Destroying twice is therefore harmless.

fn pack(slot: u32, generation: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> (usize, u32) {
    ((handle >> 32) as usize, handle as u32)
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps opaque `u64` handles to owned values.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Store `value`, reusing a vacant slot if there is one.
    pub fn insert(&mut self, value: T) -> u64 {
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.value = Some(value);
                pack(slot, entry.generation)
            }
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(slot, 0)
            }
        }
    }

    fn entry(&self, handle: u64) -> Option<&Entry<T>> {
        let (slot, generation) = unpack(handle);
        self.entries
            .get(slot)
            .filter(|entry| entry.generation == generation)
    }

    /// The value behind `handle`, or `None` if it is stale or unknown.
    pub fn get(&self, handle: u64) -> Option<&T> {
        self.entry(handle)?.value.as_ref()
    }

    /// Take the value behind `handle` out of the table.
    ///
    /// A slot whose generation wraps to 0 is never reused, so an old
    /// handle from generation 0 cannot come back to life.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get_mut(slot)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(slot as u32);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_get() {
        let mut table = HandleTable::new();
        let h = table.insert("a");
        assert_eq!(table.get(h), Some(&"a"));
    }

    #[test]
    fn removed_handle_is_dead() {
        let mut table = HandleTable::new();
        let h = table.insert(5u8);
        assert_eq!(table.remove(h), Some(5));
        assert_eq!(table.get(h), None);
        assert_eq!(table.remove(h), None);
    }

    #[test]
    fn reused_slot_gets_a_new_handle() {
        let mut table = HandleTable::new();
        let old = table.insert(1u8);
        table.remove(old);
        let new = table.insert(2u8);
        assert_ne!(old, new);
        assert_eq!(new >> 32, old >> 32);
        assert_eq!(table.get(old), None);
        assert_eq!(table.get(new), Some(&2));
    }

    #[test]
    fn unknown_slot_is_none() {
        let table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.get(pack(7, 0)), None);
    }

    #[test]
    fn wrapped_generation_retires_the_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(0u8);
        table.entries[0].generation = u32::MAX;
        let (slot, _) = unpack(h);
        let last = pack(slot as u32, u32::MAX);
        assert_eq!(table.remove(last), Some(0));
        assert!(table.vacant.is_empty());
        let fresh = table.insert(1u8);
        assert_eq!(fresh >> 32, 1);
    }
}
