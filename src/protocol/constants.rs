//! Fixed names used on the wire.

/// Reserved key holding link relations
pub const LINKS: &str = "_links";

/// Reserved key holding embedded resources
pub const EMBEDDED: &str = "_embedded";

/// Reserved sub-key of `_links` holding curie declarations
pub const CURIES: &str = "curies";

/// The rel that is always written first
pub const SELF_REL: &str = "self";

/// Media types sent and recognised by the client.
pub mod media_types {
    /// `application/hal+json`
    pub const HAL_JSON: &str = "application/hal+json";
    /// `application/json`
    pub const JSON: &str = "application/json";
}

/// Header names the client sets.
pub mod headers {
    /// `Accept`
    pub const ACCEPT: &str = "Accept";
    /// `Content-Type`
    pub const CONTENT_TYPE: &str = "Content-Type";
}
