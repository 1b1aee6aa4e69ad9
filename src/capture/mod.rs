//! Body capture subsystem.
//!
//! # Data Flow
//! ```text
//! Request<Body> / Response<Body>
//!     → body.rs (drain frames into a pooled buffer)
//!     → UTF-8 decode → CapturedBody { bytes, text }
//!     → rebuilt message with the same bytes → real consumer
//!
//!     over max_body_bytes → Captured::Oversized(message with read bytes + unread rest)
//!
//! pool.rs:
//!     BufferPool::acquire() → PooledBuffer (guard) → returned on drop
//! ```
//!
//! # Design Decisions
//! - One pool shared by every request; borrows are independent
//! - Buffers are returned by `Drop`, so error paths cannot leak them
//! - Large buffers are discarded instead of pooled to bound idle memory

pub mod body;
pub mod pool;

pub use body::{BodyCapture, Captured, CapturedBody};
pub use pool::{BufferPool, PooledBuffer};
