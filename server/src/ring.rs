use std::collections::{VecDeque, vec_deque};

/// A FIFO that forgets its oldest entries past `capacity`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingBuffer<T> {
  capacity: usize,
  vec: VecDeque<T>,
}

impl<T> Extend<T> for RingBuffer<T> {
  fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
    for item in iter {
      self.push(item);
    }
  }
}

impl<T> RingBuffer<T> {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity,
      vec: VecDeque::with_capacity(capacity),
    }
  }

  pub fn push(&mut self, value: T) {
    if self.capacity == 0 {
      return;
    }

    if self.vec.len() == self.capacity {
      self.vec.pop_front();
    }

    self.vec.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.vec.len()
  }

  pub fn is_empty(&self) -> bool {
    self.vec.is_empty()
  }

  pub fn iter(&self) -> vec_deque::Iter<'_, T> {
    self.vec.iter()
  }
}
