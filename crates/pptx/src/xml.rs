//! Small helpers shared by the XML readers.

use quick_xml::events::attributes::Attribute;

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Unescaped attribute value, falling back to the raw bytes.
pub(crate) fn attr_value(attr: &Attribute) -> String {
    attr.unescape_value()
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string())
}

/// True for a namespaced `id` attribute such as `r:id`.
pub(crate) fn is_prefixed_id(attr: &Attribute) -> bool {
    let key = attr.key.as_ref();
    key != b"id" && local_name(key) == b"id"
}
