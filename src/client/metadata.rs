pub const JMS_VERSION: &str = "1.1";
pub const PROVIDER_NAME: &str = "minijms";

/// Static facts about the API version and the provider behind a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectionMetaData;

impl ConnectionMetaData {
    pub fn jms_version(&self) -> &'static str {
        JMS_VERSION
    }

    pub fn jms_major_version(&self) -> u32 {
        1
    }

    pub fn jms_minor_version(&self) -> u32 {
        1
    }

    pub fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    pub fn provider_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn provider_major_version(&self) -> u32 {
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0)
    }

    pub fn provider_minor_version(&self) -> u32 {
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0)
    }

    /// JMSX properties the provider sets. None are supported.
    pub fn jmsx_property_names(&self) -> Vec<String> {
        Vec::new()
    }
}
