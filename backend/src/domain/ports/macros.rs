//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor that
//! accepts anything convertible into its field types, so adapters can write
//! `ContactRepositoryError::query("...")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Missing { key: String } => "missing {key}",
            Slow { millis: u64 } => "took {millis}ms",
            Partial { key: String, written: u64 } => "{key}: wrote {written} bytes",
        }
    }

    #[test]
    fn unit_variants_get_zero_argument_constructors() {
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SamplePortError::missing("avatar.png");
        assert_eq!(err.to_string(), "missing avatar.png");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        let err = SamplePortError::slow(250_u64);
        assert_eq!(err.to_string(), "took 250ms");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = SamplePortError::partial("a.png", 12_u64);
        assert_eq!(err, SamplePortError::Partial { key: "a.png".to_owned(), written: 12 });
    }
}
