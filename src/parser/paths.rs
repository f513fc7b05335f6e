//! Joining router/class base paths with route paths.

/// Join a base path and a local path.
///
/// Missing fragments count as `/`, both get a leading slash, a trailing
/// slash on the base is dropped, and a local `/` means the base alone.
pub fn join_paths(base: &str, local: &str) -> String {
    let base = with_leading_slash(base);
    let local = with_leading_slash(local);

    let base = base.strip_suffix('/').unwrap_or(&base);
    if local == "/" {
        if base.is_empty() {
            return "/".to_string();
        }
        return base.to_string();
    }
    format!("{}{}", base, local)
}

fn with_leading_slash(fragment: &str) -> String {
    if fragment.is_empty() {
        "/".to_string()
    } else if fragment.starts_with('/') {
        fragment.to_string()
    } else {
        format!("/{}", fragment)
    }
}
