use crate::FlowError;
use std::any::{type_name, Any};
use std::fmt;

/// Values that may flow between the steps of a flow.
///
/// Every step input and output must be `'static`, `Send` and `Debug`; the
/// latter lets decorating visitors report what went in and came out.
pub trait FlowValue: Any + Send + fmt::Debug {}

impl<T: Any + Send + fmt::Debug> FlowValue for T {}

trait Carried: Any + Send + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T: Any + Send + fmt::Debug> Carried for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// Type-erased value passed between the untyped nodes of a flow.
///
/// Typed [`Flow`](crate::Flow) handles wrap their inputs in a `Payload` on the
/// way in and unwrap outputs on the way out, so visitors only ever see this
/// one type.
pub struct Payload(Box<dyn Carried>);

impl Payload {
    pub fn new<T: FlowValue>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Returns `true` if the carried value is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        Carried::as_any(&*self.0).is::<T>()
    }

    /// Unwraps the carried value.
    pub fn downcast<T: Any>(self) -> Result<T, FlowError> {
        Carried::into_any(self.0)
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| FlowError::TypeMismatch {
                expected: type_name::<T>(),
            })
    }

    pub fn downcast_ref<T: Any>(&self) -> Result<&T, FlowError> {
        Carried::as_any(&*self.0)
            .downcast_ref::<T>()
            .ok_or(FlowError::TypeMismatch {
                expected: type_name::<T>(),
            })
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_downcast() {
        let payload = Payload::new("hello".to_string());
        assert!(payload.is::<String>());
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "hello");
        assert_eq!(format!("{payload:?}"), "\"hello\"");
        assert_eq!(payload.downcast::<String>().unwrap(), "hello");
    }

    #[test]
    fn test_payload_type_mismatch() {
        let payload = Payload::new(42u32);
        assert!(!payload.is::<String>());
        let err = payload.downcast::<String>().unwrap_err();
        assert!(matches!(err, FlowError::TypeMismatch { .. }));
        assert!(err.to_string().contains("String"));
    }
}
