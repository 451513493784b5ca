//! `define_port_error!` builds a `thiserror` enum for a port plus one
//! snake_case constructor per variant.

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
    use rstest::rstest;

    define_port_error! {
        pub enum SamplePortError {
            Unavailable => "store unavailable",
            Rejected { reason: String } => "rejected: {reason}",
            Retried { reason: String, attempts: u32 } => "{reason} after {attempts} attempts",
        }
    }

    #[rstest]
    fn unit_variants_get_constructors() {
        assert_eq!(SamplePortError::unavailable().to_string(), "store unavailable");
    }

    #[rstest]
    fn string_fields_accept_str() {
        let err = SamplePortError::rejected("duplicate key");
        assert_eq!(err, SamplePortError::Rejected { reason: "duplicate key".to_owned() });
    }

    #[rstest]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::retried("timeout", 3_u32);
        assert_eq!(err.to_string(), "timeout after 3 attempts");
    }
}
