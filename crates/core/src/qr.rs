//! # QR Module
//!
//! Encode/decode account number thành QR payload dạng text.
//!
//! Payload chỉ chứa định danh công khai (`Account:<number>`), không chứa
//! secret nào - việc render thành ảnh QR nằm ngoài phạm vi crate này.
//! Payload được sinh một lần khi tạo account và ổn định suốt vòng đời.

use crate::error::{CoreError, CoreResult};

/// Prefix cố định của payload
const PREFIX: &str = "Account";

/// Encode account number thành payload.
///
/// # Examples
/// ```
/// use minipay_core::qr;
///
/// assert_eq!(qr::encode(1001), "Account:1001");
/// ```
pub fn encode(account_number: u32) -> String {
    format!("{}:{}", PREFIX, account_number)
}

/// Decode payload về account number.
///
/// Tách tại dấu `:` đầu tiên; prefix hoặc số không hợp lệ trả về
/// `CoreError::InvalidPayload`.
pub fn decode(payload: &str) -> CoreResult<u32> {
    let invalid = || CoreError::InvalidPayload(payload.to_string());

    let (prefix, rest) = payload.split_once(':').ok_or_else(invalid)?;
    if prefix != PREFIX {
        return Err(invalid());
    }
    rest.parse::<u32>().map_err(|_| invalid())
}
