//! Route labels for spans and metrics.

use uuid::Uuid;

/// The request path with ids collapsed to `{id}`, so per-user routes share a
/// span name and a metrics series.
pub(super) fn route(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{id}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ids_are_collapsed() {
        assert_eq!(
            route("/getCart/0190a5c8-3f3e-7c4a-9a51-5b2f7e6d1c00"),
            "/getCart/{id}"
        );
        assert_eq!(route("/user/0190a5c8-3f3e-7c4a-9a51-5b2f7e6d1c00"), "/user/{id}");
    }

    #[test]
    fn plain_paths_are_kept() {
        assert_eq!(route("/savepayment"), "/savepayment");
        assert_eq!(route("/"), "/");
        assert_eq!(route(""), "/");
    }
}
