use crate::helpers::clean_path;

/// Resolves a client supplied path against the working directory.
///
/// Absolute arguments replace the working directory, relative ones are
/// joined to it; the result is lexically cleaned and never escapes `/`.
/// Whitespace in `arg` is part of the name.
pub fn resolve_path(current_dir: &str, arg: &str) -> String {
    if arg.starts_with('/') {
        clean_path(arg)
    } else {
        clean_path(&format!("{}/{}", current_dir, arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_path("/a/b", ".."), "/a");
        assert_eq!(resolve_path("/", ".."), "/");
        assert_eq!(resolve_path("/a", "b/c/"), "/a/b/c");
        assert_eq!(resolve_path("/a", ""), "/a");
    }

    #[test]
    fn test_resolve_absolute() {
        assert_eq!(resolve_path("/a/b", "/x/./y"), "/x/y");
        assert_eq!(resolve_path("/a/b", "/../.."), "/");
    }

    #[test]
    fn test_resolve_keeps_surrounding_spaces() {
        assert_eq!(resolve_path("/d", " notes.txt"), "/d/ notes.txt");
        assert_eq!(resolve_path("/d", "notes.txt "), "/d/notes.txt ");
        assert_eq!(resolve_path("/d", " /x"), "/d/ /x");
    }
}
