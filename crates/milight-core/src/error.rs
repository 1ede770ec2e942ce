//! Error types for milight.
//!
//! All fallible operations across the library return [`Result<T>`], which
//! uses [`Error`] as the error type. Configuration, addressing, transport
//! and packet-level errors are all captured here.

/// The error type for all milight operations.
///
/// The protocol is send-only and best-effort, so none of these variants
/// describe an acknowledgement failure: every error is raised synchronously
/// by the call that detected it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A device type was requested that no configured radio speaks.
    #[error("unknown device type: {0}")]
    UnknownDeviceType(String),

    /// A packet was built before `prepare()` bound a device id and group.
    #[error("formatter has not been prepared with a device id and group")]
    NotPrepared,

    /// No radio is selected, or the selected radio is not ready.
    #[error("transport unavailable")]
    TransportUnavailable,

    /// The radio transport failed to configure or write.
    #[error("transport error: {0}")]
    Transport(String),

    /// A V2 command id has no entry in the argument jump-start table.
    #[error("unknown command: {0:#04X}")]
    UnknownCommand(u8),

    /// A raw packet could not be interpreted (bad length, checksum mismatch).
    #[error("invalid packet: {0}")]
    InvalidPacket(String),

    /// An invalid parameter was passed to a builder or command.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The operation is not supported by this dialect.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// An underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenience `Result` alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_device_type() {
        let e = Error::UnknownDeviceType("rgb".into());
        assert_eq!(e.to_string(), "unknown device type: rgb");
    }

    #[test]
    fn error_display_not_prepared() {
        let e = Error::NotPrepared;
        assert_eq!(
            e.to_string(),
            "formatter has not been prepared with a device id and group"
        );
    }

    #[test]
    fn error_display_transport_unavailable() {
        assert_eq!(
            Error::TransportUnavailable.to_string(),
            "transport unavailable"
        );
    }

    #[test]
    fn error_display_unknown_command() {
        let e = Error::UnknownCommand(0x07);
        assert_eq!(e.to_string(), "unknown command: 0x07");
    }

    #[test]
    fn error_display_invalid_packet() {
        let e = Error::InvalidPacket("expected 9 bytes, got 7".into());
        assert_eq!(e.to_string(), "invalid packet: expected 9 bytes, got 7");
    }

    #[test]
    fn error_display_unsupported() {
        let e = Error::Unsupported("packet parsing".into());
        assert_eq!(e.to_string(), "unsupported operation: packet parsing");
    }

    #[test]
    fn error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broken");
        let e: Error = io_err.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("pipe broken"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
