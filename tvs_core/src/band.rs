/*
This file is part of the Building Aggregration Tool
Copyright (C) 2022 Novel-T

The Building Aggregration Tool is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

/// A bounded circular doubly-linked list stored in a fixed-size arena,
/// ported from the original `LinkedList` class. Slots are addressed by
/// index rather than pointer; `next == -1` marks the forward end of the
/// list, `prev == -2` marks the backward end.
#[derive(Debug, Clone, Copy)]
struct Slot {
    point_id: u32,
    next: i32,
    prev: i32,
}

pub const END_FORWARD: i32 = -1;
pub const END_BACKWARD: i32 = -2;

#[derive(Debug, Clone)]
pub struct Band {
    slots: Vec<Slot>,
    capacity: usize,
    pub first: i32,
    pub last: i32,
    head: i32,
    tail: i32,
    count: i32,
}

impl Band {
    pub fn new(capacity: usize) -> Self {
        Band {
            slots: vec![
                Slot {
                    point_id: 0,
                    next: END_FORWARD,
                    prev: END_BACKWARD,
                };
                capacity
            ],
            capacity,
            first: 0,
            last: 0,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> i32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn clear(&mut self) {
        self.first = 0;
        self.last = 0;
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        self.slots[0].next = END_FORWARD;
        self.slots[0].prev = END_BACKWARD;
    }

    /// Seeds the band with a single point, occupying slot 0.
    pub fn first_node(&mut self, point_id: u32) {
        self.clear();
        self.slots[0].point_id = point_id;
        self.count = 1;
        self.advance_head();
    }

    pub fn point_at(&self, slot: i32) -> u32 {
        self.slots[slot as usize].point_id
    }

    pub fn next_of(&self, slot: i32) -> i32 {
        self.slots[slot as usize].next
    }

    pub fn prev_of(&self, slot: i32) -> i32 {
        self.slots[slot as usize].prev
    }

    fn advance_head(&mut self) {
        self.head = (self.head + 1) % self.capacity as i32;
    }

    fn advance_tail(&mut self) {
        self.tail = (self.tail + 1) % self.capacity as i32;
    }

    /// Links a freshly allocated slot into the list immediately after
    /// `after` (or as the sole element when the list was empty).
    fn splice_after(&mut self, slot: i32, after: i32) {
        if self.count == 0 {
            self.slots[slot as usize].next = END_FORWARD;
            self.slots[slot as usize].prev = END_BACKWARD;
            self.first = slot;
            self.last = slot;
        } else if after == END_BACKWARD {
            // insert before the current first
            self.slots[slot as usize].next = self.first;
            self.slots[slot as usize].prev = END_BACKWARD;
            self.slots[self.first as usize].prev = slot;
            self.first = slot;
        } else if after == self.last {
            self.slots[slot as usize].prev = self.last;
            self.slots[slot as usize].next = END_FORWARD;
            self.slots[self.last as usize].next = slot;
            self.last = slot;
        } else {
            let next = self.slots[after as usize].next;
            self.slots[slot as usize].prev = after;
            self.slots[slot as usize].next = next;
            self.slots[after as usize].next = slot;
            self.slots[next as usize].prev = slot;
        }
        self.count += 1;
    }

    /// Removes the oldest slot (the one at `tail`) from the list, pairing
    /// the removal with the allocation of new slots so the arena never
    /// grows unbounded. Ported from `LinkedList::Remove_one`.
    pub fn remove_one(&mut self) {
        if self.count == 0 {
            return;
        }
        let victim = self.tail;
        let prev = self.slots[victim as usize].prev;
        let next = self.slots[victim as usize].next;
        if prev == END_BACKWARD {
            self.first = next;
            if next != END_FORWARD {
                self.slots[next as usize].prev = END_BACKWARD;
            }
        } else {
            self.slots[prev as usize].next = next;
        }
        if next == END_FORWARD {
            self.last = prev;
            if prev != END_BACKWARD {
                self.slots[prev as usize].prev = END_BACKWARD;
            }
        } else {
            self.slots[next as usize].prev = prev;
        }
        self.count -= 1;
        self.advance_tail();
    }

    /// Inserts `point_id` at logical `position` (the slot it should follow;
    /// `END_BACKWARD` means "becomes the new first"), allocating the next
    /// arena slot from `head`. When `remove` is set, the oldest slot is
    /// evicted first (the "paired remove" of spec.md §9).
    pub fn insert(&mut self, point_id: u32, position: i32, remove: bool) -> i32 {
        if remove {
            self.remove_one();
        }
        let slot = self.head;
        self.slots[slot as usize].point_id = point_id;
        self.splice_after(slot, position);
        self.advance_head();
        slot
    }

    pub fn insert_first(&mut self, point_id: u32, remove: bool) -> i32 {
        self.insert(point_id, END_BACKWARD, remove)
    }

    pub fn insert_last(&mut self, point_id: u32, remove: bool) -> i32 {
        let last = self.last;
        self.insert(point_id, last, remove)
    }

    pub fn iter_forward_from(&self, slot: i32) -> ForwardIter<'_> {
        ForwardIter {
            band: self,
            cursor: self.next_of(slot),
        }
    }

    pub fn iter_backward_from(&self, slot: i32) -> BackwardIter<'_> {
        BackwardIter {
            band: self,
            cursor: self.prev_of(slot),
        }
    }
}

pub struct ForwardIter<'a> {
    band: &'a Band,
    cursor: i32,
}

impl<'a> Iterator for ForwardIter<'a> {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == END_FORWARD {
            return None;
        }
        let slot = self.cursor;
        let id = self.band.point_at(slot);
        self.cursor = self.band.next_of(slot);
        Some((slot, id))
    }
}

pub struct BackwardIter<'a> {
    band: &'a Band,
    cursor: i32,
}

impl<'a> Iterator for BackwardIter<'a> {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == END_BACKWARD {
            return None;
        }
        let slot = self.cursor;
        let id = self.band.point_at(slot);
        self.cursor = self.band.prev_of(slot);
        Some((slot, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_node_seeds_single_element_list() {
        let mut band = Band::new(5);
        band.first_node(42);
        assert_eq!(band.len(), 1);
        assert_eq!(band.point_at(band.first), 42);
        assert_eq!(band.point_at(band.last), 42);
    }

    #[test]
    fn insert_last_grows_the_band_contiguously() {
        let mut band = Band::new(5);
        band.first_node(0);
        band.insert_last(1, false);
        band.insert_last(2, false);
        let forward: Vec<u32> = band
            .iter_forward_from(band.first)
            .map(|(_, id)| id)
            .collect();
        assert_eq!(forward, vec![1, 2]);
    }

    #[test]
    fn insert_first_prepends() {
        let mut band = Band::new(5);
        band.first_node(5);
        band.insert_first(4, false);
        band.insert_first(3, false);
        assert_eq!(band.point_at(band.first), 3);
        let forward: Vec<u32> = std::iter::once(band.point_at(band.first))
            .chain(band.iter_forward_from(band.first).map(|(_, id)| id))
            .collect();
        assert_eq!(forward, vec![3, 4, 5]);
    }

    #[test]
    fn remove_one_evicts_the_oldest_slot() {
        let mut band = Band::new(3);
        band.first_node(0);
        band.insert_last(1, false);
        band.insert_last(2, false);
        assert_eq!(band.len(), 3);
        band.remove_one();
        assert_eq!(band.len(), 2);
        let remaining: Vec<u32> = std::iter::once(band.point_at(band.first))
            .chain(band.iter_forward_from(band.first).map(|(_, id)| id))
            .collect();
        assert_eq!(remaining, vec![1, 2]);
    }

    #[test]
    fn paired_insert_keeps_the_band_bounded() {
        let mut band = Band::new(3);
        band.first_node(0);
        band.insert_last(1, false);
        band.insert_last(2, false);
        band.insert_last(3, true);
        assert_eq!(band.len(), 3);
        let remaining: Vec<u32> = std::iter::once(band.point_at(band.first))
            .chain(band.iter_forward_from(band.first).map(|(_, id)| id))
            .collect();
        assert_eq!(remaining, vec![1, 2, 3]);
    }
}
