//! Record types shared by all table instances.

mod record;

pub use record::Record;
pub use record::RecordId;
