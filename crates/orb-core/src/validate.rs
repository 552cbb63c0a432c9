//! Structural validation.
//!
//! `Validate` walks a decoded value and checks that it is complete: nested
//! records and unions are visited recursively and string enums must hold a
//! known value. It never checks business rules.

use crate::error::ModelError;

/// Structural completeness check.
pub trait Validate {
    /// Validate this value and everything nested inside it.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    fn validate(&self) -> Result<(), ModelError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ModelError> {
        self.as_ref().map_or(Ok(()), Validate::validate)
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), ModelError> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl<T: Validate> Validate for Box<T> {
    fn validate(&self) -> Result<(), ModelError> {
        (**self).validate()
    }
}

impl Validate for () {
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

impl Validate for serde_json::Map<String, serde_json::Value> {
    fn validate(&self) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Implement [`Validate`] by visiting the listed fields in order.
macro_rules! validate_fields {
    ($ty:ty { $($field:ident),* $(,)? }) => {
        impl $crate::validate::Validate for $ty {
            fn validate(&self) -> ::std::result::Result<(), $crate::error::ModelError> {
                $( $crate::validate::Validate::validate(&self.$field)?; )*
                Ok(())
            }
        }
    };
}

pub(crate) use validate_fields;
