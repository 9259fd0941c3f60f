//! Input expansion with recursive directory traversal.
//!
//! The hashing dispatch wants a flat list of regular files. Directory
//! operands are walked with the [`walkdir`] crate; traversal is best-effort,
//! matching how a bulk hashing run is used in practice — one unreadable
//! subdirectory must not abort a sweep over a large tree, it is merely
//! counted so the caller can report it and adjust the exit code.
//!
//! **Symlink handling**: traversal never follows symlinks (`walkdir`'s
//! default), so cyclic links cannot loop the walk and link entries inside a
//! directory are excluded. A symlink passed directly as an operand is
//! forwarded untouched — opening it later resolves it the normal way.

use std::path::PathBuf;

use walkdir::WalkDir;

/// Expand file and directory operands into regular files to hash.
///
/// Returns the flat file list plus the number of directory entries that
/// could not be read. Non-directory operands are forwarded as-is without an
/// existence check; a bad path surfaces naturally as an open error at
/// hashing time, attributed to the right filename.
pub fn expand_inputs(inputs: &[PathBuf]) -> (Vec<PathBuf>, usize) {
    let mut files = Vec::new();
    let mut unreadable = 0usize;
    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input) {
                match entry {
                    Ok(e) if e.file_type().is_file() => files.push(e.into_path()),
                    Ok(_) => {} // subdirectory or symlink entry
                    Err(_) => unreadable += 1,
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    (files, unreadable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("one.bin"), b"1").unwrap();
        fs::write(root.join("nested/two.bin"), b"2").unwrap();
        dir
    }

    #[test]
    fn walks_directories_recursively() {
        let dir = make_tree();
        let (files, unreadable) = expand_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2);
        assert_eq!(unreadable, 0);
    }

    #[test]
    fn forwards_plain_files() {
        let dir = make_tree();
        let file = dir.path().join("one.bin");
        let (files, _) = expand_inputs(&[file.clone()]);
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn forwards_missing_paths_for_later_error_attribution() {
        let ghost = PathBuf::from("/no/such/file/anywhere");
        let (files, unreadable) = expand_inputs(&[ghost.clone()]);
        assert_eq!(files, vec![ghost]);
        assert_eq!(unreadable, 0);
    }

    #[test]
    fn empty_input_list() {
        let (files, unreadable) = expand_inputs(&[]);
        assert!(files.is_empty());
        assert_eq!(unreadable, 0);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_inside_directories_are_excluded() {
        use std::os::unix::fs::symlink;
        let dir = make_tree();
        let root = dir.path();
        symlink(root.join("one.bin"), root.join("link.bin")).unwrap();

        let (files, _) = expand_inputs(&[root.to_path_buf()]);
        // one.bin and nested/two.bin; the link entry is not a regular file.
        assert_eq!(files.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        use std::os::unix::fs::symlink;
        let dir = make_tree();
        let other = TempDir::new().unwrap();
        fs::write(other.path().join("three.bin"), b"3").unwrap();
        symlink(other.path(), dir.path().join("link_dir")).unwrap();

        let (files, _) = expand_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(files.len(), 2, "three.bin must stay invisible");
    }
}
