//! Bounded selection heap used for recommendations.
//!
//! A binary max-heap keyed by score with a storage capacity. Once full, a
//! candidate is admitted only when its score beats the root (it replaces
//! the root) or equals the root (it is appended past capacity). Anything
//! below the root is dropped, so at capacity the heap keeps the largest
//! scores seen *after* it filled plus whatever filled it, not a strict
//! top-K.
//!
//! Extraction pops maxima; once `k` items are out it keeps popping only
//! while the score equals the last one emitted, so every tie at the
//! boundary is reported.

#[derive(Debug, Clone)]
pub struct TopK<T> {
    heap: Vec<(u64, T)>,
    capacity: usize,
}

impl<T> TopK<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Score at the root, if any.
    pub fn peek_score(&self) -> Option<u64> {
        self.heap.first().map(|(score, _)| *score)
    }

    /// Offer a candidate. Returns whether it was admitted.
    pub fn offer(&mut self, score: u64, item: T) -> bool {
        if self.heap.len() < self.capacity {
            self.push(score, item);
            return true;
        }
        match self.peek_score() {
            Some(root) if score > root => {
                self.heap[0] = (score, item);
                self.sift_down(0);
                true
            }
            Some(root) if score == root => {
                self.push(score, item);
                true
            }
            _ => false,
        }
    }

    /// Drain in descending score order: `k` items plus any that tie with
    /// the last of them.
    pub fn into_sorted(mut self, k: usize) -> Vec<(u64, T)> {
        let mut out: Vec<(u64, T)> = Vec::new();
        while let Some((score, item)) = self.pop_max() {
            if out.len() >= k && out.last().map(|(s, _)| *s) != Some(score) {
                break;
            }
            out.push((score, item));
        }
        out
    }

    fn push(&mut self, score: u64, item: T) {
        self.heap.push((score, item));
        self.sift_up(self.heap.len() - 1);
    }

    fn pop_max(&mut self) -> Option<(u64, T)> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.heap[i].0 <= self.heap[parent].0 {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut largest = i;
            if left < len && self.heap[left].0 > self.heap[largest].0 {
                largest = left;
            }
            if right < len && self.heap[right].0 > self.heap[largest].0 {
                largest = right;
            }
            if largest == i {
                break;
            }
            self.heap.swap(i, largest);
            i = largest;
        }
    }
}
