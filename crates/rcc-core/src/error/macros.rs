//! Error macros for rcc

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::RccError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::RccError::UsageError($msg.to_string()))
    };
}

/// Macro for mapping filesystem errors onto a path
#[macro_export]
macro_rules! map_io_err {
    ($op:expr, $path:expr) => {
        |e| $crate::error::RccError::io_operation($op, $path.display(), e)
    };
}
