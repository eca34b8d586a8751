//! Shared XML fixtures for tests.

#[cfg(test)]
pub mod tests {
    pub const EXTENSION_CUSTOM_TRACKING: &str = r#"<Extension type="testCustomTracking"><CustomTracking><Tracking event="event.1"><![CDATA[http://event.1]]></Tracking><Tracking event="event.2"><![CDATA[http://event.2]]></Tracking></CustomTracking></Extension>"#;

    pub const EXTENSION_DATA: &str =
        r#"<Extension type="testCustomTracking"><SkippableAdType>Generic</SkippableAdType></Extension>"#;

    pub const EXTENSION_FALLBACK_0: &str = r#"<Extension type="waterfall" fallback_index="0" />"#;

    pub const EXTENSION_FALLBACK_1: &str = r#"<Extension type="waterfall" fallback_index="1" />"#;
}
