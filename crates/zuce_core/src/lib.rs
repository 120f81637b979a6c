//! zuce Core Runtime
//!
//! Foundational primitives for the zuce element engine:
//!
//! - **Signals**: a value cell whose writes synchronously fan out to its
//!   subscribers, in subscription order
//! - **Subscriptions**: cancellable effect bindings
//! - **Text helpers**: the case conversion shared by attribute and style
//!   formatting
//!
//! # Example
//!
//! ```rust
//! use zuce_core::Signal;
//!
//! let is_blue = Signal::new(false);
//! let subscription = is_blue.subscribe(|value| println!("is_blue = {value}"));
//!
//! is_blue.set(true);
//! subscription.unsubscribe();
//! ```

pub mod reactive;
pub mod text;

pub use reactive::{Signal, Subscription, SubscriptionId};
pub use text::kebab_case;
