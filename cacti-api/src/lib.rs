//! # Cacti Actor API
//!
//! The application-facing vocabulary of the Cacti actor runtime. Applications
//! describe actors through a [`Role`] (an ordered table of handlers) and talk
//! to them exclusively with [`Message`]s. The runtime crate (`cacti`) owns the
//! scheduling; this crate only defines what crosses the boundary.
//!
//! ## Core Components
//!
//! - [`ActorId`]: stable actor identity, equal to the actor's registry index
//! - [`Message`] and [`Payload`]: the message envelope and its tagged payload
//! - [`Role`] and [`Handler`]: per-actor dispatch tables
//! - [`ActorContext`]: what a handler may do while it runs
//! - [`errors`]: error values returned by `send` and the queues behind it
//!
//! ## Usage Example
//!
//! ```rust
//! use cacti_api::{ActorContext, Message, Role};
//!
//! const MSG_COUNT: usize = 1;
//!
//! let role = Role::builder()
//!     .handler(|ctx: &mut dyn ActorContext, _msg: &Message| ctx.set_state(0u64))
//!     .handler(|ctx: &mut dyn ActorContext, _msg: &Message| {
//!         if let Some(count) = ctx.state_mut::<u64>() {
//!             *count += 1;
//!         }
//!     })
//!     .build();
//!
//! assert_eq!(role.handler_count(), 2);
//! let msg = Message::with_data(MSG_COUNT, 5u32);
//! assert_eq!(msg.payload.downcast_ref::<u32>(), Some(&5));
//! ```

pub mod context;
pub mod errors;
pub mod message;
pub mod role;
pub mod types;

pub use context::ActorContext;
pub use errors::{QueueError, SendError};
pub use message::{Message, Payload, MSG_GODIE, MSG_HELLO, MSG_SPAWN};
pub use role::{Handler, Role, RoleBuilder};
pub use types::{ActorId, MessageType, State};
