pub mod amount;
pub mod crc16;
pub mod masking;
pub mod payment_code;
pub mod tlv;
