/// A ping-pong pair of equally sized storage areas. One of them is the "current" (read) side, the
/// other one is the "next" (write) side. The roles are selected by a parity bit, so swapping never
/// moves or reallocates any data.
#[derive(Debug, Clone)]
pub struct DoubleBuffer<T> {
    halves: [Vec<T>; 2],
    parity: usize,
}

impl<T: Clone> DoubleBuffer<T> {
    /// Create a pair where both halves hold `len` copies of `value`.
    pub fn new(len: usize, value: T) -> Self {
        DoubleBuffer {
            halves: [vec![value.clone(); len], vec![value; len]],
            parity: 0,
        }
    }

    /// Create a pair where both halves start out as copies of `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        DoubleBuffer {
            halves: [data.clone(), data],
            parity: 0,
        }
    }
}

impl<T> DoubleBuffer<T> {
    pub fn len(&self) -> usize {
        self.halves[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The half that is read from during this tick.
    pub fn current(&self) -> &[T] {
        &self.halves[self.parity]
    }

    /// Mutable access to the current half. Only meant for seeding state between ticks.
    pub fn current_mut(&mut self) -> &mut [T] {
        &mut self.halves[self.parity]
    }

    /// The half that is written to during this tick.
    pub fn next(&self) -> &[T] {
        &self.halves[self.parity ^ 1]
    }

    /// Borrow the current half for reading and the next half for writing at the same time.
    pub fn split(&mut self) -> (&[T], &mut [T]) {
        let [even, odd] = &mut self.halves;
        if self.parity == 0 {
            (even.as_slice(), odd.as_mut_slice())
        } else {
            (odd.as_slice(), even.as_mut_slice())
        }
    }

    /// Flip the roles of the two halves.
    pub fn swap(&mut self) {
        self.parity ^= 1;
    }

    pub fn parity(&self) -> usize {
        self.parity
    }
}
