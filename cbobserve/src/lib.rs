//! Observability hooks for bot operations and reply streams.
//!
//! ```rust
//! use cbobserve::{MetricsObservabilityHooks, SafeBotHooks, TracingObservabilityHooks};
//!
//! let _hooks = SafeBotHooks::new(TracingObservabilityHooks);
//! let _metrics = MetricsObservabilityHooks;
//! ```

mod fanout;
mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use fanout::FanoutHooks;
pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeBotHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{
        FanoutHooks, MetricsObservabilityHooks, SafeBotHooks, TracingObservabilityHooks,
    };
}
