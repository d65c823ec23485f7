mod record_handle;

pub use record_handle::RecordHandle;
