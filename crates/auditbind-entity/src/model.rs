//! The `Model` trait shared by every persisted record.

use std::any::Any;
use std::fmt;

use auditbind_core::types::ContentType;

/// A persistable record.
pub trait Model: Any + Send + Sync + fmt::Debug {
    /// The kind this record belongs to.
    fn content_type(&self) -> ContentType;

    /// Primary key rendered as a string.
    fn pk(&self) -> String;

    /// Short human-readable description.
    fn repr(&self) -> String {
        format!("{} {}", self.content_type(), self.pk())
    }

    /// Upcast for downcasting by receivers.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting by receivers.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn Model + 'a {
    /// Returns the concrete record if it is a `T`.
    pub fn downcast_ref<T: Model>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Returns the concrete record mutably if it is a `T`.
    pub fn downcast_mut<T: Model>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

/// Implements the `Any` plumbing of [`Model`] for a concrete type.
#[macro_export]
macro_rules! impl_model_any {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}
