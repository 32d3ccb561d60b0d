/// Options that select which metadata facets are captured and restored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetadataOptions {
    extended_attributes: bool,
    generic_attributes: bool,
    times: bool,
}

impl MetadataOptions {
    /// Creates a new [`MetadataOptions`] value with every facet enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            extended_attributes: true,
            generic_attributes: true,
            times: true,
        }
    }

    /// Requests that extended attributes be captured and restored.
    #[must_use]
    #[doc(alias = "--no-xattrs")]
    pub const fn extended_attributes(mut self, enabled: bool) -> Self {
        self.extended_attributes = enabled;
        self
    }

    /// Requests that generic (tagged, platform-specific) attributes be
    /// captured and restored.
    #[must_use]
    #[doc(alias = "--no-generic")]
    pub const fn generic_attributes(mut self, enabled: bool) -> Self {
        self.generic_attributes = enabled;
        self
    }

    /// Requests that access and modification times be restored.
    #[must_use]
    #[doc(alias = "--no-times")]
    pub const fn times(mut self, enabled: bool) -> Self {
        self.times = enabled;
        self
    }

    /// Reports whether extended attributes are handled.
    #[must_use]
    pub const fn extended_attributes_enabled(&self) -> bool {
        self.extended_attributes
    }

    /// Reports whether generic attributes are handled.
    #[must_use]
    pub const fn generic_attributes_enabled(&self) -> bool {
        self.generic_attributes
    }

    /// Reports whether timestamps are restored.
    #[must_use]
    pub const fn times_enabled(&self) -> bool {
        self.times
    }
}

impl Default for MetadataOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let options = MetadataOptions::default();
        assert!(options.extended_attributes_enabled());
        assert!(options.generic_attributes_enabled());
        assert!(options.times_enabled());
    }

    #[test]
    fn builder_toggles_are_independent() {
        let options = MetadataOptions::new()
            .extended_attributes(false)
            .times(false);
        assert!(!options.extended_attributes_enabled());
        assert!(options.generic_attributes_enabled());
        assert!(!options.times_enabled());
    }
}
