/// Binary min-heap keyed by a `u64` priority.
///
/// Entries with equal priority come out in insertion order: every entry is
/// stamped with a sequence number and ties compare on it.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    elements: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    priority: u64,
    seq: u64,
    item: T,
}

impl<T> Entry<T> {
    fn key(&self) -> (u64, u64) {
        (self.priority, self.seq)
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap {
            elements: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            elements: Vec::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn parent(i: usize) -> usize {
        (i - 1) / 2
    }

    fn left(i: usize) -> usize {
        2 * i + 1
    }

    fn right(i: usize) -> usize {
        2 * i + 2
    }

    pub fn insert(&mut self, priority: u64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.elements.push(Entry {
            priority,
            seq,
            item,
        });
        self.sift_up(self.elements.len() - 1);
    }

    /// Removes the entry with the smallest priority, or `None` when empty.
    pub fn extract_min(&mut self) -> Option<(u64, T)> {
        if self.elements.is_empty() {
            return None;
        }
        let last = self.elements.len() - 1;
        self.elements.swap(0, last);
        let min = self.elements.pop()?;
        if !self.elements.is_empty() {
            self.sift_down(0);
        }
        Some((min.priority, min.item))
    }

    pub fn peek_priority(&self) -> Option<u64> {
        self.elements.first().map(|e| e.priority)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = Self::parent(i);
            if self.elements[i].key() >= self.elements[p].key() {
                break;
            }
            self.elements.swap(i, p);
            i = p;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.elements.len();
        loop {
            let l = Self::left(i);
            let r = Self::right(i);
            let mut smallest = i;

            if l < n && self.elements[l].key() < self.elements[smallest].key() {
                smallest = l;
            }
            if r < n && self.elements[r].key() < self.elements[smallest].key() {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.elements.swap(i, smallest);
            i = smallest;
        }
    }

    #[cfg(test)]
    fn valid_min_heap(&self) -> bool {
        (1..self.elements.len())
            .all(|i| self.elements[Self::parent(i)].key() <= self.elements[i].key())
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
