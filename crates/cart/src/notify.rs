//! User-facing failure notifications.

/// Surface for messages shown to the shopper.
///
/// Fire-and-forget: the store never waits on or inspects the outcome.
pub trait Notifier: Send + Sync {
    /// Report a failed cart operation.
    fn error(&self, message: &str);
}

/// Notifier that emits messages as `tracing` WARN events.
///
/// Events use the `rocketshoes::notify` target so a subscriber can route
/// them to whatever surface the shopper sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(target: "rocketshoes::notify", "{message}");
    }
}
