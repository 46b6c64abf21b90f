mod filesystem;

pub use filesystem::{ReceiptStore, StoredReceipt, ORDERS_SUBDIR};
