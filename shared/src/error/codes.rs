//! Unified error codes for the floor manager
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Reservation errors
//! - 2xxx: Floor errors (areas, tables)
//! - 8xxx: Record store errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the floor UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 1001,
    /// Guest name missing or blank
    GuestNameRequired = 1002,
    /// Date is not YYYY-MM-DD
    InvalidDate = 1003,
    /// Time is not HH:MM or HH:MM:SS
    InvalidTime = 1004,
    /// Neither tableId nor tableIds supplied
    TableSelectionRequired = 1005,
    /// Every payload shape was rejected by the store
    ReservationWriteFailed = 1006,
    /// Status update rejected by the store
    StatusUpdateFailed = 1007,

    // ==================== 2xxx: Floor ====================
    /// Table not found
    TableNotFound = 2001,
    /// Table has no reservation that can be released
    TableNotActive = 2003,
    /// Table is already taken for the current slot
    TableOccupied = 2004,

    // ==================== 8xxx: Store ====================
    /// Store query failed
    StoreError = 8001,
    /// Store unreachable (transport error)
    StoreUnavailable = 8002,
    /// Store returned a row that could not be decoded
    StoreDecodeError = 8003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Readiness check failed
    NotReady = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::GuestNameRequired => "missing guest name",
            ErrorCode::InvalidDate => "invalid date, expected YYYY-MM-DD",
            ErrorCode::InvalidTime => "invalid time, expected HH:MM or HH:MM:SS",
            ErrorCode::TableSelectionRequired => "must supply tableId or tableIds",
            ErrorCode::ReservationWriteFailed => "Failed to create reservation",
            ErrorCode::StatusUpdateFailed => "Failed to update reservation status",

            // Floor
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableNotActive => "table has no active reservation",
            ErrorCode::TableOccupied => "table is already taken",

            // Store
            ErrorCode::StoreError => "Record store query failed",
            ErrorCode::StoreUnavailable => "Record store is unreachable",
            ErrorCode::StoreDecodeError => "Record store returned an unreadable row",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NotReady => "Service not ready",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),

            // Reservation
            1001 => Ok(ErrorCode::ReservationNotFound),
            1002 => Ok(ErrorCode::GuestNameRequired),
            1003 => Ok(ErrorCode::InvalidDate),
            1004 => Ok(ErrorCode::InvalidTime),
            1005 => Ok(ErrorCode::TableSelectionRequired),
            1006 => Ok(ErrorCode::ReservationWriteFailed),
            1007 => Ok(ErrorCode::StatusUpdateFailed),

            // Floor
            2001 => Ok(ErrorCode::TableNotFound),
            2003 => Ok(ErrorCode::TableNotActive),
            2004 => Ok(ErrorCode::TableOccupied),

            // Store
            8001 => Ok(ErrorCode::StoreError),
            8002 => Ok(ErrorCode::StoreUnavailable),
            8003 => Ok(ErrorCode::StoreDecodeError),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NotReady),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
