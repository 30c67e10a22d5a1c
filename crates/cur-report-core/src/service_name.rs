pub const UNKNOWN_SERVICE: &str = "UnknownService";

const VENDOR_PREFIX_SPACED: &str = "Amazon ";
const VENDOR_PREFIX: &str = "Amazon";

/// Picks the first present candidate, falling back to [`UNKNOWN_SERVICE`].
///
/// Candidates are evaluated in the order given, so callers list the preferred
/// source first.
pub fn resolve_service_name<'a, I>(candidates: I) -> &'a str
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .next()
        .unwrap_or(UNKNOWN_SERVICE)
}

/// Strips a leading `"Amazon "` or, failing that, a leading `"Amazon"`.
pub fn strip_vendor_prefix(name: &str) -> &str {
    name.strip_prefix(VENDOR_PREFIX_SPACED)
        .or_else(|| name.strip_prefix(VENDOR_PREFIX))
        .unwrap_or(name)
}
