//! Lexical path handling for compiler arguments.
//!
//! Nothing in here touches the filesystem: paths are rewritten as strings,
//! so a build directory that does not exist yet is fine.

use std::path::{Component, Path, PathBuf};

/// Argument prefixes that carry a search path directly after them.
const PATH_PREFIXES: [&str; 2] = ["-I", "-L"];

/// Rewrite `-I<dir>` and `-L<dir>` arguments so their directories are
/// absolute, resolving relative ones against `build_dir`.
///
/// Returns a new list of the same length and order; every other argument is
/// copied unchanged.
pub fn normalize_absolute_paths(args: &[String], build_dir: &Path) -> Vec<String> {
    args.iter()
        .map(|arg| match split_path_arg(arg) {
            Some((prefix, dir)) => {
                let joined = build_dir.join(dir);
                format!("{}{}", prefix, normalize_lexically(&joined).display())
            }
            None => arg.clone(),
        })
        .collect()
}

fn split_path_arg(arg: &str) -> Option<(&str, &str)> {
    PATH_PREFIXES
        .iter()
        .find(|prefix| arg.starts_with(*prefix))
        .map(|prefix| arg.split_at(prefix.len()))
}

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` above the root is dropped; `..` at the start of a relative path is
/// kept. An empty result becomes `.`.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }

    parts.iter().collect()
}

/// Path of the dependency file for an object file: the object's extension
/// is replaced by `suffix`, directory and base name are kept.
pub fn depfile_path(object: &str, suffix: &str) -> String {
    Path::new(object)
        .with_extension(suffix)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_relative_include_made_absolute() {
        let out = normalize_absolute_paths(&args(&["-Iinclude", "-L../lib"]), Path::new("/work/build"));
        assert_eq!(out, args(&["-I/work/build/include", "-L/work/lib"]));
    }

    #[test]
    fn test_absolute_include_kept() {
        let out = normalize_absolute_paths(&args(&["-I/usr/include/"]), Path::new("/work/build"));
        assert_eq!(out, args(&["-I/usr/include"]));
    }

    #[test]
    fn test_other_args_untouched() {
        let input = args(&["-c", "-o", "foo.o", "-Werror", "include", "-DI=1", "-l", "m"]);
        let out = normalize_absolute_paths(&input, Path::new("/work/build"));
        assert_eq!(out, input);
    }

    #[test]
    fn test_order_and_length_preserved() {
        let input = args(&["-x", "-Ia", "-y", "-Lb", "-z"]);
        let out = normalize_absolute_paths(&input, Path::new("/b"));
        assert_eq!(out, args(&["-x", "-I/b/a", "-y", "-L/b/b", "-z"]));
    }

    #[test]
    fn test_idempotent() {
        let build_dir = Path::new("/work/build");
        let once = normalize_absolute_paths(&args(&["-I./src/../inc", "-L/opt//lib", "-g"]), build_dir);
        let twice = normalize_absolute_paths(&once, build_dir);
        assert_eq!(once, twice);
        assert_eq!(once, args(&["-I/work/build/inc", "-L/opt/lib", "-g"]));
    }

    #[test]
    fn test_bare_prefix_resolves_to_build_dir() {
        let out = normalize_absolute_paths(&args(&["-I"]), Path::new("/work/build"));
        assert_eq!(out, args(&["-I/work/build"]));
    }

    #[test]
    fn test_input_not_mutated() {
        let input = args(&["-Iinc"]);
        let _ = normalize_absolute_paths(&input, Path::new("/b"));
        assert_eq!(input, args(&["-Iinc"]));
    }

    #[test]
    fn test_normalize_lexically() {
        assert_eq!(normalize_lexically(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_lexically(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_lexically(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(normalize_lexically(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_depfile_path() {
        assert_eq!(depfile_path("foo.o", "d"), "foo.d");
        assert_eq!(depfile_path("obj/prog.cob.o", "d"), "obj/prog.cob.d");
        assert_eq!(depfile_path("dir.v2/foo", "d"), "dir.v2/foo.d");
    }
}
