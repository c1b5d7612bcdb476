use std::path::{Path, PathBuf};

/// Which stream of the target file the parties open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Fork {
    #[default]
    Data,
    /// macOS resource fork, reached through `<path>/..namedfork/rsrc`.
    Resource,
}

impl Fork {
    pub fn apply(self, path: &Path) -> PathBuf {
        match self {
            Fork::Data => path.to_path_buf(),
            Fork::Resource => path.join("..namedfork").join("rsrc"),
        }
    }

    pub fn is_supported(self) -> bool {
        match self {
            Fork::Data => true,
            Fork::Resource => cfg!(target_os = "macos"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_fork_keeps_the_path() {
        let path = Path::new("/tmp/a file");
        assert_eq!(Fork::Data.apply(path), path);
        assert!(Fork::Data.is_supported());
    }

    #[test]
    fn resource_fork_addresses_the_named_fork() {
        assert_eq!(
            Fork::Resource.apply(Path::new("/Volumes/share/doc.txt")),
            PathBuf::from("/Volumes/share/doc.txt/..namedfork/rsrc")
        );
        assert_eq!(Fork::Resource.is_supported(), cfg!(target_os = "macos"));
    }
}
