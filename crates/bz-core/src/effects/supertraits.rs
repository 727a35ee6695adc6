//! Supertraits for common effect combinations

use super::{NetworkStatusEffects, TimerEffects, TransportEffects};

/// Effects needed by the REST API client: a transport to send requests, a
/// timer to race them against, and the host's connectivity status.
pub trait ApiEffects: TransportEffects + TimerEffects + NetworkStatusEffects {}

/// Automatic implementation for types that satisfy the required bounds
impl<T> ApiEffects for T where T: TransportEffects + TimerEffects + NetworkStatusEffects {}
