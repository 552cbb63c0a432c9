//! Union codecs.
//!
//! Two kinds of polymorphic JSON show up in the API:
//!
//! - **Discriminated unions**: an object whose shape is chosen by one string
//!   key (`model_type`, `entry_type`, ...). Each union is a closed enum with
//!   one `match` over the discriminator, generated by
//!   `discriminated_union!`. The discriminator is a declared field of every
//!   variant type (a [`tag_type!`] constant), so encoding simply writes the
//!   inner value.
//! - **Shape-probing unions**: values with no discriminator (for example a
//!   date or a datetime). Candidates are tried in a fixed order with
//!   [`probe`], and the first one that decodes and passes its shape check
//!   wins.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::UnionError;

/// A closed set of JSON shapes selected by one discriminator key.
pub trait Discriminated: Sized {
    /// Rust name of the union, used in errors.
    const NAME: &'static str;
    /// JSON key holding the discriminator.
    const DISCRIMINATOR: &'static str;
    /// Every discriminator value the union accepts.
    const VARIANTS: &'static [&'static str];

    /// Decode a raw JSON value into the matching variant.
    ///
    /// # Errors
    ///
    /// Fails when the discriminator is missing, unknown, or when the body
    /// does not fit the selected variant.
    fn decode(value: Value) -> Result<Self, UnionError>;

    /// Discriminator value of the held variant.
    fn variant_name(&self) -> &'static str;
}

/// Read the discriminator string out of a JSON object.
///
/// # Errors
///
/// Returns [`UnionError::MissingDiscriminator`] when the key is absent or
/// holds a non-string.
pub fn discriminator<'a>(
    union: &'static str,
    field: &'static str,
    value: &'a Value,
) -> Result<&'a str, UnionError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .ok_or(UnionError::MissingDiscriminator { union, field })
}

/// Decode the body of a selected variant.
///
/// # Errors
///
/// Returns [`UnionError::VariantMismatch`] wrapping the serde error.
pub fn decode_variant<T: DeserializeOwned>(
    union: &'static str,
    variant: &'static str,
    value: Value,
) -> Result<T, UnionError> {
    serde_json::from_value(value).map_err(|source| UnionError::VariantMismatch {
        union,
        variant,
        source,
    })
}

/// One candidate of a shape-probing union.
pub type Candidate<T> = (&'static str, fn(&Value) -> Result<T, String>);

/// Try each candidate in order and keep the first success.
///
/// A candidate reports failure as a message; structural decode errors and
/// failed shape checks are recorded the same way.
///
/// # Errors
///
/// Returns [`UnionError::NoVariantMatched`] listing every rejected attempt.
pub fn probe<T>(
    union: &'static str,
    value: &Value,
    candidates: &[Candidate<T>],
) -> Result<T, UnionError> {
    let mut attempts = Vec::with_capacity(candidates.len());
    for (name, candidate) in candidates {
        match candidate(value) {
            Ok(decoded) => return Ok(decoded),
            Err(reason) => attempts.push(format!("{name}: {reason}")),
        }
    }
    Err(UnionError::NoVariantMatched { union, attempts })
}

/// Define a zero-sized type that serializes as one constant string.
///
/// Used for discriminator fields, so a variant can only ever carry its own
/// tag.
macro_rules! tag_type {
    ($( $(#[$meta:meta])* $name:ident = $value:literal; )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            pub struct $name;

            impl $name {
                /// The wire value of this tag.
                pub const VALUE: &'static str = $value;

                /// The wire value of this tag.
                #[must_use]
                pub const fn as_str(self) -> &'static str {
                    $value
                }
            }

            impl ::serde::Serialize for $name {
                fn serialize<S: ::serde::Serializer>(
                    &self,
                    serializer: S,
                ) -> ::std::result::Result<S::Ok, S::Error> {
                    serializer.serialize_str($value)
                }
            }

            impl<'de> ::serde::Deserialize<'de> for $name {
                fn deserialize<D: ::serde::Deserializer<'de>>(
                    deserializer: D,
                ) -> ::std::result::Result<Self, D::Error> {
                    let raw = <::std::string::String as ::serde::Deserialize>::deserialize(deserializer)?;
                    if raw == $value {
                        Ok(Self)
                    } else {
                        Err(<D::Error as ::serde::de::Error>::invalid_value(
                            ::serde::de::Unexpected::Str(&raw),
                            &$value,
                        ))
                    }
                }
            }

            impl $crate::validate::Validate for $name {
                fn validate(&self) -> ::std::result::Result<(), $crate::error::ModelError> {
                    Ok(())
                }
            }
        )+
    };
}

/// Define a discriminated union over concrete variant types.
///
/// Generates the enum, its decode table, `as_*` accessors, `From` impls,
/// serde impls and [`Validate`](crate::Validate).
macro_rules! discriminated_union {
    (
        $(#[$meta:meta])*
        pub enum $name:ident on $field:literal {
            $(
                $(#[$vmeta:meta])*
                $tag:literal => $variant:ident($inner:ty) as $accessor:ident,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant($inner), )+
        }

        impl $crate::union::Discriminated for $name {
            const NAME: &'static str = stringify!($name);
            const DISCRIMINATOR: &'static str = $field;
            const VARIANTS: &'static [&'static str] = &[$($tag),+];

            fn decode(
                value: ::serde_json::Value,
            ) -> ::std::result::Result<Self, $crate::error::UnionError> {
                let tag = $crate::union::discriminator(Self::NAME, $field, &value)?.to_owned();
                match tag.as_str() {
                    $(
                        $tag => $crate::union::decode_variant(Self::NAME, $tag, value)
                            .map(Self::$variant),
                    )+
                    _ => Err($crate::error::UnionError::UnknownVariant {
                        union: Self::NAME,
                        field: $field,
                        value: tag,
                        expected: Self::VARIANTS,
                    }),
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => $tag, )+
                }
            }
        }

        impl $name {
            $(
                #[doc = concat!("The `", $tag, "` variant, if this value holds it.")]
                #[must_use]
                #[allow(unreachable_patterns)]
                pub fn $accessor(&self) -> Option<&$inner> {
                    match self {
                        Self::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            )+
        }

        $(
            impl From<$inner> for $name {
                fn from(inner: $inner) -> Self {
                    Self::$variant(inner)
                }
            }
        )+

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                match self {
                    $( Self::$variant(inner) => ::serde::Serialize::serialize(inner, serializer), )+
                }
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::union::Discriminated>::decode(value)
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }

        impl $crate::validate::Validate for $name {
            fn validate(&self) -> ::std::result::Result<(), $crate::error::ModelError> {
                match self {
                    $( Self::$variant(inner) => $crate::validate::Validate::validate(inner), )+
                }
            }
        }
    };
}

pub(crate) use discriminated_union;
pub(crate) use tag_type;

/// Decode one body per discriminator value of `U`, then check that each
/// value keeps its variant and compares equal after an encode and decode.
///
/// `body_for` builds the body for a tag; the tag itself is filled in here.
#[cfg(test)]
pub(crate) fn assert_every_variant_round_trips<U>(body_for: impl Fn(&str) -> Value)
where
    U: Discriminated + serde::Serialize + PartialEq + std::fmt::Debug,
{
    for &tag in U::VARIANTS {
        let mut body = body_for(tag);
        body[U::DISCRIMINATOR] = Value::from(tag);
        let decoded = U::decode(body).unwrap_or_else(|err| panic!("{tag}: {err}"));
        assert_eq!(decoded.variant_name(), tag);

        let encoded = serde_json::to_value(&decoded).unwrap();
        assert_eq!(encoded[U::DISCRIMINATOR], tag);
        let again = U::decode(encoded).unwrap_or_else(|err| panic!("{tag}: {err}"));
        assert_eq!(again, decoded, "{tag} changed across encode and decode");
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;
    use crate::validate::validate_fields;

    tag_type! {
        CircleKind = "circle";
        SquareKind = "square";
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Circle {
        kind: CircleKind,
        radius: f64,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Square {
        kind: SquareKind,
        side: f64,
    }

    validate_fields!(Circle {});
    validate_fields!(Square {});

    discriminated_union! {
        pub enum Shape on "kind" {
            "circle" => Circle(Circle) as as_circle,
            "square" => Square(Square) as as_square,
        }
    }

    #[test]
    fn decodes_by_discriminator() {
        let shape = Shape::decode(json!({"kind": "square", "side": 2.0})).unwrap();
        assert_eq!(shape.variant_name(), "square");
        assert!(shape.as_square().is_some());
        assert!(shape.as_circle().is_none());
    }

    #[test]
    fn encode_writes_inner_value_verbatim() {
        let shape = Shape::from(Circle {
            kind: CircleKind,
            radius: 1.5,
        });
        let encoded = serde_json::to_value(&shape).unwrap();
        assert_eq!(encoded, json!({"kind": "circle", "radius": 1.5}));
        assert_eq!(Shape::decode(encoded).unwrap(), shape);
    }

    #[test]
    fn missing_discriminator_is_reported() {
        let err = Shape::decode(json!({"radius": 1.0})).unwrap_err();
        assert!(matches!(
            err,
            UnionError::MissingDiscriminator { union: "Shape", field: "kind" }
        ));

        let err = Shape::decode(json!({"kind": 7})).unwrap_err();
        assert!(matches!(err, UnionError::MissingDiscriminator { .. }));
    }

    #[test]
    fn unknown_discriminator_never_defaults() {
        let err = Shape::decode(json!({"kind": "hexagon"})).unwrap_err();
        match err {
            UnionError::UnknownVariant { value, expected, .. } => {
                assert_eq!(value, "hexagon");
                assert_eq!(expected, &["circle", "square"]);
            }
            other => panic!("expected UnknownVariant, got {other:?}"),
        }
    }

    #[test]
    fn body_mismatch_names_the_variant() {
        let err = Shape::decode(json!({"kind": "circle", "side": 1.0})).unwrap_err();
        assert!(matches!(
            err,
            UnionError::VariantMismatch { variant: "circle", .. }
        ));
    }

    #[test]
    fn every_shape_round_trips() {
        assert_every_variant_round_trips::<Shape>(|tag| match tag {
            "circle" => json!({"radius": 1.0}),
            _ => json!({"side": 2.0}),
        });
    }

    #[test]
    fn serde_path_uses_the_same_table() {
        let err = serde_json::from_value::<Shape>(json!({"kind": "hexagon"})).unwrap_err();
        assert!(err.to_string().contains("no variant matched"));
    }

    #[test]
    fn tag_type_rejects_other_strings() {
        assert!(serde_json::from_value::<CircleKind>(json!("square")).is_err());
        assert_eq!(serde_json::to_value(CircleKind).unwrap(), json!("circle"));
    }

    #[test]
    fn probe_reports_every_attempt() {
        let candidates: [Candidate<u64>; 2] = [
            ("small", |v| {
                v.as_u64()
                    .filter(|n| *n < 10)
                    .ok_or_else(|| "not below 10".to_owned())
            }),
            ("even", |v| {
                v.as_u64()
                    .filter(|n| n % 2 == 0)
                    .ok_or_else(|| "not even".to_owned())
            }),
        ];

        assert_eq!(probe("Number", &json!(3), &candidates).unwrap(), 3);
        assert_eq!(probe("Number", &json!(12), &candidates).unwrap(), 12);

        match probe("Number", &json!(13), &candidates).unwrap_err() {
            UnionError::NoVariantMatched { attempts, .. } => {
                assert_eq!(attempts, vec!["small: not below 10", "even: not even"]);
            }
            other => panic!("expected NoVariantMatched, got {other:?}"),
        }
    }
}
