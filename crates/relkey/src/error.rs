mod adhoc;
mod column_mismatch;
mod mapping_model_creation;
mod unsupported_feature;

use adhoc::AdhocError;
use column_mismatch::ColumnMismatch;
use mapping_model_creation::MappingModelCreation;
use std::sync::Arc;
use unsupported_feature::UnsupportedFeature;

/// Returns early with an adhoc error built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::from_args(format_args!($($arg)*)))
    };
}

/// Builds an adhoc error from a format string.
#[macro_export]
macro_rules! err {
    ($($arg:tt)*) => {
        $crate::Error::from_args(format_args!($($arg)*))
    };
}

/// An error raised while building or querying the mapping model.
#[derive(Clone)]
pub struct Error {
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Adds context to this error.
    ///
    /// Context is displayed in reverse order: the most recently added context
    /// is shown first, followed by earlier context, ending with the root cause.
    #[inline(always)]
    pub fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        let inner = err.inner.as_mut().unwrap();
        assert!(
            inner.cause.is_none(),
            "consequent error must not already have a cause"
        );
        Arc::get_mut(inner).unwrap().cause = Some(self);
        err
    }

    /// Returns the innermost error of the context chain.
    pub fn root(&self) -> &Error {
        self.chain().last().unwrap()
    }

    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Anyhow(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f.debug_struct("Error").field("kind", &"None").finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

#[derive(Debug)]
enum ErrorKind {
    Anyhow(anyhow::Error),
    Adhoc(AdhocError),
    ColumnMismatch(ColumnMismatch),
    MappingModelCreation(MappingModelCreation),
    UnsupportedFeature(UnsupportedFeature),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match self {
            Anyhow(err) => core::fmt::Display::fmt(err, f),
            Adhoc(err) => core::fmt::Display::fmt(err, f),
            ColumnMismatch(err) => core::fmt::Display::fmt(err, f),
            MappingModelCreation(err) => core::fmt::Display::fmt(err, f),
            UnsupportedFeature(err) => core::fmt::Display::fmt(err, f),
            Unknown => f.write_str("unknown relkey error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error {
            inner: Some(Arc::new(ErrorInner { kind, cause: None })),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Error {
        Error::from(ErrorKind::Anyhow(err))
    }
}

/// Trait for types that can be converted into an Error.
pub trait IntoError {
    /// Converts this type into an Error.
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NavigableRole;

    #[test]
    fn error_size() {
        // Ensure Error stays at one word (size of pointer/Arc)
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn error_from_args() {
        let err = Error::from_args(format_args!("no table for {}", "Order"));
        assert_eq!(err.to_string(), "no table for Order");
    }

    #[test]
    fn error_chain_display() {
        let root = Error::column_mismatch(
            &NavigableRole::new("Line").append("order"),
            1,
            &NavigableRole::new("Order"),
            2,
        );
        let chained = root.context(err!("post-init callback `Line.order` failed"));

        assert_eq!(
            chained.to_string(),
            "post-init callback `Line.order` failed: column mismatch: `Line.order` has 1 \
             referring column(s) but `Order` has 2 target column(s)"
        );
        assert!(chained.root().is_column_mismatch());
        assert!(!chained.is_column_mismatch());
    }

    #[test]
    fn anyhow_bridge() {
        let anyhow_err = anyhow::anyhow!("naming provider failed");
        let our_err: Error = anyhow_err.into();
        assert_eq!(our_err.to_string(), "naming provider failed");
        assert!(std::error::Error::source(&our_err).is_some());
    }

    #[test]
    fn mapping_model_creation_names_role() {
        let err = Error::mapping_model_creation(
            &NavigableRole::new("Order").append("lines"),
            "mapped-by attribute `Line.orderz` does not exist",
        );
        assert!(err.is_mapping_model_creation());
        assert_eq!(
            err.to_string(),
            "could not create mapping model for `Order.lines`: mapped-by attribute \
             `Line.orderz` does not exist"
        );
    }

    #[test]
    fn unsupported_feature_is_distinct() {
        let err = Error::unsupported_feature("logical one-to-one as a foreign-key target");
        assert!(err.is_unsupported_feature());
        assert!(!err.is_mapping_model_creation());
        assert_eq!(
            err.to_string(),
            "unsupported feature: logical one-to-one as a foreign-key target"
        );
    }
}
