use smart_default::SmartDefault;

/// Configuration for [`MultiIndexStore`].
///
/// [`MultiIndexStore`]: crate::MultiIndexStore
#[derive(Debug, Clone, SmartDefault)]
pub struct StoreConfig {
    /// Name used in log events and in [`SystemInfo`] reports.
    ///
    /// [`SystemInfo`]: crate::SystemInfo
    #[default("store")]
    pub name: &'static str,
    /// Count of rows to reserve room for up front.
    #[default(0)]
    pub capacity: usize,
}

impl StoreConfig {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
