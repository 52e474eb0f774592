use log::debug;
use std::time::Instant;

pub struct Logging;

impl Logging {
    /// Runs an action and logs its wall time at debug level. Timing is
    /// observability only and never feeds back into simulation state.
    pub fn estimate_result<T, F: FnOnce() -> T>(action: F, message: &str) -> T {
        let now = Instant::now();
        let result = action();
        debug!("{}, {} ms", message, now.elapsed().as_millis());
        result
    }
}

pub struct TimeEstimation;

impl TimeEstimation {
    pub fn estimate<T, F: FnOnce() -> T>(action: F) -> (T, u128) {
        let now = Instant::now();
        let result = action();
        (result, now.elapsed().as_millis())
    }
}
