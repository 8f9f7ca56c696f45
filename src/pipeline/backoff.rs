use rand::Rng;
use std::time::Duration;

/// Highest doubling applied to the base delay.
const MAX_EXPONENT: u32 = 6;

/// Delay before retry number `attempt` (0-based): `base * 2^attempt`, capped,
/// with ±30% jitter.
pub fn retry_delay(attempt: u32, base: Duration) -> Duration {
    let exponent = attempt.min(MAX_EXPONENT);
    let base_ms = u64::try_from(base.as_millis()).unwrap_or(u64::MAX);
    let scaled_ms = base_ms.saturating_mul(1_u64 << exponent);

    let jitter = rand::thread_rng().gen_range(0.7..1.3);
    Duration::from_millis((scaled_ms as f64 * jitter).round() as u64)
}
