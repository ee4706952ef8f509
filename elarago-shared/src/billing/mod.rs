/// Billing integration
///
/// Everything that talks to, or is driven by, the external payment provider:
///
/// - `event`: webhook payload parsing into typed billing events
/// - `signature`: webhook signature verification (HMAC-SHA256)
/// - `provider`: the provider REST client and the subscription lookup seam
/// - `reconciler`: converges local plan state with the provider's latest
///   reported state, tolerant of unordered and duplicate delivery

pub mod event;
pub mod provider;
pub mod reconciler;
pub mod signature;
