use std::collections::VecDeque;

use nalgebra::Vector3;

/// Bounded, insertion-ordered history of recent positions.
///
/// Oldest entries are evicted first. The buffer carries no visual
/// semantics; renderers derive a recency weight from index / length.
pub struct TrailBuffer {
    points: VecDeque<Vector3<f64>>,
    capacity: usize,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, position: Vector3<f64>) {
        self.points.push_back(position);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Ordered traversal, oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Vector3<f64>> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64) -> Vector3<f64> {
        Vector3::new(x, 0.0, 0.0)
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut trail = TrailBuffer::new(8);
        for i in 0..100 {
            trail.push(p(i as f64));
            assert!(trail.len() <= 8);
        }
        assert_eq!(trail.len(), 8);
    }

    #[test]
    fn test_fifo_eviction() {
        let mut trail = TrailBuffer::new(3);
        for i in 0..4 {
            trail.push(p(i as f64));
        }
        let xs: Vec<f64> = trail.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_order_oldest_to_newest() {
        let mut trail = TrailBuffer::new(10);
        trail.push(p(1.0));
        trail.push(p(2.0));
        trail.push(p(3.0));
        let xs: Vec<f64> = trail.iter().map(|v| v.x).collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let mut trail = TrailBuffer::new(4);
        trail.push(p(1.0));
        trail.push(p(2.0));
        trail.clear();
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 4);
    }
}
