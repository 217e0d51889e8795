/// Builds an update callback from a two-argument closure body, supplying the
/// argument types the compiler cannot infer for `&dyn UpdateSink`.
///
/// ```rust
/// use std::sync::Mutex;
///
/// use chatterbox::{CorrelationToken, StreamUpdate, UpdateSink, cb_sink};
///
/// let seen = Mutex::new(Vec::new());
/// let sink = cb_sink!(|token, update| {
///     seen.lock().unwrap().push(format!("{token}:{}", update.content));
/// });
///
/// sink.on_update(&CorrelationToken::new("tab-1"), &StreamUpdate::progress("He"));
/// assert_eq!(seen.lock().unwrap().as_slice(), ["tab-1:He"]);
/// ```
#[macro_export]
macro_rules! cb_sink {
    (|$token:pat_param, $update:pat_param| $body:expr) => {
        |$token: &$crate::CorrelationToken, $update: &$crate::StreamUpdate| $body
    };
}
