//! Post-authentication redirect sanitization.

use log::debug;

/// Picks the post-auth destination.
///
/// One trailing slash is stripped from `url`. The sign-in page itself
/// (`{base_url}/auth`) sends the user home. Any other URL whose text starts
/// with `base_url` is kept as-is, and everything else falls back to
/// `base_url`. The match is a plain string prefix, not an origin comparison:
/// a host that merely extends the base host (`https://x.test.evil.com` for
/// `https://x.test`) passes.
pub fn resolve_redirect(url: &str, base_url: &str) -> String {
    let clean = url.strip_suffix('/').unwrap_or(url);

    let target = if clean == format!("{base_url}/auth") || !clean.starts_with(base_url) {
        base_url
    } else {
        clean
    };

    debug!("event=auth_redirect module=auth status=ok same_as_base={}", target == base_url);
    target.to_string()
}
