//! Pooled capture buffers.
//!
//! # Responsibilities
//! - Hand out reusable `BytesMut` buffers to concurrent requests
//! - Return each buffer exactly once, when its guard is dropped
//! - Bound the memory retained between requests

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::BytesMut;

/// Default number of idle buffers kept for reuse.
pub const DEFAULT_MAX_POOLED: usize = 64;
/// Default capacity of a freshly allocated buffer.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4 * 1024;
/// Buffers that grew beyond this are dropped instead of pooled.
pub const DEFAULT_MAX_RETAINED_CAPACITY: usize = 1024 * 1024;

#[derive(Debug)]
struct PoolInner {
    idle: Mutex<Vec<BytesMut>>,
    max_pooled: usize,
    initial_capacity: usize,
    max_retained_capacity: usize,
}

impl PoolInner {
    fn release(&self, mut buffer: BytesMut) {
        if buffer.capacity() > self.max_retained_capacity {
            return;
        }
        buffer.clear();

        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < self.max_pooled {
            idle.push(buffer);
        }
    }
}

/// Shared pool of capture buffers.
///
/// Cloning is cheap; all clones share the same idle list.
#[derive(Debug, Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

impl BufferPool {
    /// Create a pool with explicit limits.
    pub fn new(max_pooled: usize, initial_capacity: usize, max_retained_capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::with_capacity(max_pooled)),
                max_pooled,
                initial_capacity,
                max_retained_capacity,
            }),
        }
    }

    /// Borrow a cleared buffer. It goes back to the pool when the guard drops.
    pub fn acquire(&self) -> PooledBuffer {
        let reused = self
            .inner
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        let buffer = reused.unwrap_or_else(|| BytesMut::with_capacity(self.inner.initial_capacity));

        PooledBuffer {
            buffer,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Number of idle buffers currently held.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_POOLED,
            DEFAULT_INITIAL_CAPACITY,
            DEFAULT_MAX_RETAINED_CAPACITY,
        )
    }
}

/// A buffer borrowed from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer {
    buffer: BytesMut,
    pool: Arc<PoolInner>,
}

impl Deref for PooledBuffer {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_returned_on_drop() {
        let pool = BufferPool::default();
        assert_eq!(pool.idle_count(), 0);

        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(b"hello");
            assert_eq!(&buf[..], b"hello");
        }
        assert_eq!(pool.idle_count(), 1);

        // Reused buffers come back empty.
        let buf = pool.acquire();
        assert!(buf.is_empty());
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_oversized_buffers_not_retained() {
        let pool = BufferPool::new(4, 8, 16);
        {
            let mut buf = pool.acquire();
            buf.extend_from_slice(&[0u8; 64]);
        }
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_idle_list_bounded() {
        let pool = BufferPool::new(2, 8, 1024);
        let guards: Vec<_> = (0..5).map(|_| pool.acquire()).collect();
        drop(guards);
        assert_eq!(pool.idle_count(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_borrows() {
        let pool = BufferPool::new(16, 8, 1024);
        let mut handles = Vec::new();
        for i in 0..32u8 {
            let pool = pool.clone();
            handles.push(tokio::spawn(async move {
                let mut buf = pool.acquire();
                buf.extend_from_slice(&[i; 4]);
                tokio::task::yield_now().await;
                assert_eq!(&buf[..], &[i; 4]);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(pool.idle_count() <= 16);
        assert!(pool.idle_count() > 0);
    }
}
