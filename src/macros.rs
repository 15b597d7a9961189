//! Macros to reduce boilerplate in the codebase

/// Generate Display, FromStr and a `VALUES` list for wire-format enums.
///
/// # Usage
///
/// ```rust,ignore
/// use crate::error::FloranetError;
///
/// enum_display_fromstr!(
///     MyStatus,
///     FloranetError::InvalidStatus,
///     {
///         Pending => "pending",
///         InProgress => "in_progress",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_display_fromstr {
    (
        $enum_name:ident,
        $error_variant:path,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl $enum_name {
            /// Every accepted wire value, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($str),+];
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $($enum_name::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::FloranetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
                    $($str => Ok($enum_name::$variant),)+
                    _ => Err($error_variant(s.to_string())),
                }
            }
        }
    };
}
