//! String enums.
//!
//! The server adds enum values over time, so decoding is lenient: an
//! unrecognized wire value is kept as `Unknown(raw)` and written back
//! unchanged. [`Validate`](crate::Validate) is where unknown values are
//! rejected.

/// Define a string-backed enum with an `Unknown` fallback.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not recognize.
            Unknown(String),
        }

        impl $name {
            /// The wire value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Unknown(raw) => raw,
                }
            }

            /// Whether the value is one this client recognizes.
            #[must_use]
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $value => Self::$variant, )+
                    other => Self::Unknown(other.to_owned()),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let raw = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(raw.as_str()))
            }
        }

        impl $crate::validate::Validate for $name {
            fn validate(&self) -> ::std::result::Result<(), $crate::error::ModelError> {
                match self {
                    Self::Unknown(raw) => Err($crate::error::ModelError::UnknownEnumValue {
                        type_name: stringify!($name),
                        value: raw.clone(),
                    }),
                    _ => Ok(()),
                }
            }
        }
    };
}

pub(crate) use string_enum;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ModelError;
    use crate::validate::Validate;

    string_enum! {
        /// Test enum.
        pub enum Color {
            /// Red.
            Red = "red",
            /// Light blue.
            LightBlue = "light_blue",
        }
    }

    #[test]
    fn known_values_round_trip() {
        let color: Color = serde_json::from_value(json!("light_blue")).unwrap();
        assert_eq!(color, Color::LightBlue);
        assert_eq!(serde_json::to_value(&color).unwrap(), json!("light_blue"));
        assert!(color.validate().is_ok());
    }

    #[test]
    fn unknown_values_decode_but_fail_validation() {
        let color: Color = serde_json::from_value(json!("ultraviolet")).unwrap();
        assert_eq!(color, Color::Unknown("ultraviolet".into()));
        assert!(!color.is_known());
        assert_eq!(serde_json::to_value(&color).unwrap(), json!("ultraviolet"));

        match color.validate() {
            Err(ModelError::UnknownEnumValue { type_name, value }) => {
                assert_eq!(type_name, "Color");
                assert_eq!(value, "ultraviolet");
            }
            other => panic!("expected UnknownEnumValue, got {other:?}"),
        }
    }
}
