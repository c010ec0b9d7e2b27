use regex::Regex;

/// Maps a display name to a filesystem-safe token. The allow-list is
/// explicit ASCII: alphanumerics plus '-', '.' and '_'. Any run of other
/// characters collapses to a single underscore, and edge underscores are
/// trimmed, so non-ASCII marks such as gender symbols simply drop out.
pub fn sanitize_filename(name: &str) -> String {
    let disallowed = Regex::new(r"[^A-Za-z0-9._-]+").expect("disallowed char regex");
    disallowed
        .replace_all(name.trim(), "_")
        .trim_matches('_')
        .to_string()
}
