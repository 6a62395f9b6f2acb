//! Object heap with mark-and-sweep collection.
//!
//! Objects live in an arena addressed by 4-byte handles; the handle graph
//! carries no ownership, so reference cycles (`a.self = a`, closures
//! capturing their own function) collect fine. Environments are `Rc`
//! chains owned by the closures that captured them; the collector traces
//! through them, and sweeping a dead closure drops its environment chain.
//!
//! Collection only runs between top-level statements, when every live
//! value is reachable from the interpreter's roots.

use crate::env::EnvRef;
use crate::object::JsObject;
use crate::value::Value;
use rustc_hash::FxHashSet;

/// Heap address of a [`JsObject`]. Plain index; validity is guaranteed by
/// only collecting at points where all live handles are root-reachable.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Handle(u32);

impl Handle {
    #[inline]
    pub(crate) const fn from_index(index: u32) -> Handle {
        Handle(index)
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

struct Slot {
    marked: bool,
    object: JsObject,
}

pub struct Heap {
    slots: Vec<Option<Slot>>,
    free: Vec<u32>,
    live: usize,
    next_gc: usize,
}

const INITIAL_GC_THRESHOLD: usize = 256;

impl Heap {
    pub fn new() -> Heap {
        Heap {
            slots: Vec::with_capacity(INITIAL_GC_THRESHOLD),
            free: Vec::new(),
            live: 0,
            next_gc: INITIAL_GC_THRESHOLD,
        }
    }

    pub fn alloc(&mut self, object: JsObject) -> Handle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(Slot {
                marked: false,
                object,
            });
            return Handle(index);
        }
        let index = u32::try_from(self.slots.len())
            .unwrap_or_else(|_| panic!("heap exceeded {} objects", u32::MAX));
        self.slots.push(Some(Slot {
            marked: false,
            object,
        }));
        Handle(index)
    }

    /// # Panics
    /// Panics on a dangling handle, which indicates a collector bug.
    #[inline]
    pub fn get(&self, handle: Handle) -> &JsObject {
        match &self.slots[handle.index()] {
            Some(slot) => &slot.object,
            None => panic!("dangling heap handle {}", handle.0),
        }
    }

    #[inline]
    pub fn get_mut(&mut self, handle: Handle) -> &mut JsObject {
        match &mut self.slots[handle.index()] {
            Some(slot) => &mut slot.object,
            None => panic!("dangling heap handle {}", handle.0),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether enough allocation happened since the last collection to
    /// schedule another.
    pub fn should_collect(&self) -> bool {
        self.live >= self.next_gc
    }

    /// Mark from the given roots and sweep everything unreached.
    pub fn collect(&mut self, root_values: &[Value], root_envs: &[EnvRef]) {
        for slot in self.slots.iter_mut().flatten() {
            slot.marked = false;
        }

        let mut pending: Vec<Handle> = root_values
            .iter()
            .filter_map(|value| value.as_object())
            .collect();
        let mut env_pending: Vec<EnvRef> = root_envs.to_vec();
        let mut visited_envs: FxHashSet<*const ()> = FxHashSet::default();

        loop {
            if let Some(handle) = pending.pop() {
                {
                    let Some(slot) = &mut self.slots[handle.index()] else {
                        continue;
                    };
                    if slot.marked {
                        continue;
                    }
                    slot.marked = true;
                }
                if let Some(slot) = &self.slots[handle.index()] {
                    slot.object.trace(
                        |value| {
                            if let Some(child) = value.as_object() {
                                pending.push(child);
                            }
                        },
                        |env| env_pending.push(env.clone()),
                    );
                }
                continue;
            }
            let Some(env) = env_pending.pop() else {
                break;
            };
            let ptr = std::rc::Rc::as_ptr(&env).cast::<()>();
            if !visited_envs.insert(ptr) {
                continue;
            }
            let scope = env.borrow();
            scope.for_each_value(|value| {
                if let Some(child) = value.as_object() {
                    pending.push(child);
                }
            });
            if let Some(parent) = scope.parent() {
                env_pending.push(parent.clone());
            }
        }

        for (index, entry) in self.slots.iter_mut().enumerate() {
            if matches!(entry, Some(slot) if !slot.marked) {
                *entry = None;
                self.free.push(index as u32);
                self.live -= 1;
            }
        }
        self.next_gc = (self.live * 2).max(INITIAL_GC_THRESHOLD);
    }
}

impl Default for Heap {
    fn default() -> Heap {
        Heap::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_sweep_unreachable() {
        let mut heap = Heap::new();
        let kept = heap.alloc(JsObject::ordinary(None));
        let _dropped = heap.alloc(JsObject::ordinary(None));
        assert_eq!(heap.live_count(), 2);
        heap.collect(&[Value::Object(kept)], &[]);
        assert_eq!(heap.live_count(), 1);
        // Kept object still accessible.
        assert!(heap.get(kept).own_keys(false).is_empty());
    }

    #[test]
    fn cycles_are_collected() {
        let mut heap = Heap::new();
        let a = heap.alloc(JsObject::ordinary(None));
        let b = heap.alloc(JsObject::ordinary(Some(a)));
        heap.get_mut(a).proto = Some(b);
        heap.collect(&[], &[]);
        assert_eq!(heap.live_count(), 0);
    }

    #[test]
    fn slots_are_reused_after_collection() {
        let mut heap = Heap::new();
        let first = heap.alloc(JsObject::ordinary(None));
        heap.collect(&[], &[]);
        let second = heap.alloc(JsObject::ordinary(None));
        assert_eq!(first, second);
    }
}
