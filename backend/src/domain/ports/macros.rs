//! Helper macro that generates port error enums with snake_case constructors.
//!
//! Each variant becomes a `thiserror` case plus a constructor named after the
//! variant. Constructor parameters take `impl Into<T>` so call sites can pass
//! `&str` for `String` fields.

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            #[doc = "Construct the `" $variant "` variant."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fields
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LedgerPortError {
            Unreachable { message: String } => "ledger unreachable: {message}",
            Missing { loan_id: i64 } => "loan {loan_id} missing",
            Conflict { message: String, loan_id: i64 } => "loan {loan_id} conflict: {message}",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = LedgerPortError::unreachable("timeout");
        assert_eq!(err.to_string(), "ledger unreachable: timeout");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = LedgerPortError::missing(7_i64);
        assert_eq!(err, LedgerPortError::Missing { loan_id: 7 });
        assert_eq!(err.to_string(), "loan 7 missing");
    }

    #[test]
    fn mixed_fields_render_in_order() {
        let err = LedgerPortError::conflict("stale write", 3_i64);
        assert_eq!(err.to_string(), "loan 3 conflict: stale write");
    }
}
