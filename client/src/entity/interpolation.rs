use replica_shared::Value;

/// Boundary values for an observer-local interpolator.
///
/// The replica only records the boundaries the environment announced; it
/// does not interpolate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Interpolation {
    start: Option<Value>,
    stop: Option<Value>,
}

impl Interpolation {
    pub fn start(&self) -> Option<&Value> {
        self.start.as_ref()
    }

    pub fn stop(&self) -> Option<&Value> {
        self.stop.as_ref()
    }

    /// Started and not yet stopped.
    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.stop.is_none()
    }

    /// A new start discards the previous run's stop value.
    pub(crate) fn begin(&mut self, value: Value) {
        self.start = Some(value);
        self.stop = None;
    }

    pub(crate) fn end(&mut self, value: Value) {
        self.stop = Some(value);
    }
}
