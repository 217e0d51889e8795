//! Small convenience helpers for wiring bots into a host.

use std::sync::Arc;

use crate::{
    BotId, BotOperationHooks, FanoutHooks, MetricsObservabilityHooks, SafeBotHooks,
    TracingObservabilityHooks,
};

pub fn parse_bot_id(value: &str) -> Option<BotId> {
    match value.trim().to_ascii_lowercase().as_str() {
        "julian-gpt" | "julian_gpt" | "juliangpt" | "julian" => Some(BotId::JulianGpt),
        _ => None,
    }
}

pub fn observability_hooks() -> Arc<dyn BotOperationHooks> {
    Arc::new(
        FanoutHooks::new()
            .with(Arc::new(SafeBotHooks::new(TracingObservabilityHooks)))
            .with(Arc::new(SafeBotHooks::new(MetricsObservabilityHooks))),
    )
}
