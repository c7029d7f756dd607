//! In-memory directory tree built from inventory records.
//!
//! The tree is an append-only arena: directories and files live in flat
//! vectors and refer to each other by id, so parent back-references
//! never form ownership cycles. Directory ids double as creation-order
//! identities, which is what canonical pair ordering keys on.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use compact_str::CompactString;
use thiserror::Error;

use crate::intern::StringPool;
use crate::path::SplitPath;

/// Identifier of a directory node, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DirId(pub u32);

/// Identifier of a file entry, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub u32);

/// Why a record could not be inserted into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    /// A file with this hash was already seen with a different size.
    #[error("a file with this hash was first seen with {expected} bytes, not {found}")]
    HashCollision { expected: u64, found: u64 },

    /// This exact path was already inserted.
    #[error("this exact path was already inserted")]
    DuplicatePath,
}

/// A single file from the inventory.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// File name, interned.
    pub name: Arc<str>,
    /// Content hash exactly as the scanner reported it.
    pub hash: CompactString,
    /// Exact byte count.
    pub size: u64,
    /// Owning directory.
    pub dir: DirId,
}

/// A directory node with its content indexes and size aggregates.
#[derive(Debug)]
pub struct DirNode {
    /// Directory name, interned; empty for the root.
    pub name: Arc<str>,
    /// Parent directory; `None` only for the root.
    pub parent: Option<DirId>,
    /// Child directories by name.
    pub children: BTreeMap<Arc<str>, DirId>,
    /// Files directly inside this directory, by name.
    pub files: BTreeMap<Arc<str>, FileId>,
    /// Files directly inside this directory, grouped by content hash.
    pub by_hash: HashMap<CompactString, Vec<FileId>>,
    /// Sum of every file size in this subtree.
    pub total_size: u64,
    /// Sum of the directly contained file sizes only.
    pub immediate_size: u64,
    /// Rendered prefix, kept on top-level directories only.
    prefix: Option<CompactString>,
}

impl DirNode {
    fn new(name: Arc<str>, parent: Option<DirId>) -> Self {
        Self {
            name,
            parent,
            children: BTreeMap::new(),
            files: BTreeMap::new(),
            by_hash: HashMap::new(),
            total_size: 0,
            immediate_size: 0,
            prefix: None,
        }
    }

    /// Number of files directly inside this directory.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// The whole inventory tree plus the global hash index.
#[derive(Debug)]
pub struct DirTree {
    dirs: Vec<DirNode>,
    files: Vec<FileEntry>,
    by_hash: HashMap<CompactString, Vec<FileId>>,
    pool: StringPool,
}

impl DirTree {
    /// Create a tree containing only the unnamed root.
    pub fn new() -> Self {
        let mut pool = StringPool::new();
        let root = DirNode::new(pool.intern(""), None);
        Self {
            dirs: vec![root],
            files: Vec::new(),
            by_hash: HashMap::new(),
            pool,
        }
    }

    /// The root directory id.
    pub fn root(&self) -> DirId {
        DirId(0)
    }

    /// Look up a directory node.
    pub fn dir(&self, id: DirId) -> &DirNode {
        &self.dirs[id.0 as usize]
    }

    /// Look up a file entry.
    pub fn file(&self, id: FileId) -> &FileEntry {
        &self.files[id.0 as usize]
    }

    /// Number of directories, root included.
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Number of files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Every file sharing `hash`, in insertion order.
    pub fn files_with_hash(&self, hash: &str) -> &[FileId] {
        self.by_hash.get(hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Insert one inventory record.
    ///
    /// Creates missing directories along the way, registers the file in
    /// the per-directory and global hash indexes, and folds the size
    /// into every ancestor aggregate.
    pub fn insert(
        &mut self,
        hash: &str,
        size: u64,
        path: &SplitPath<'_>,
    ) -> Result<FileId, InsertError> {
        if let Some(first) = self.by_hash.get(hash).and_then(|ids| ids.first()) {
            let expected = self.files[first.0 as usize].size;
            if expected != size {
                return Err(InsertError::HashCollision {
                    expected,
                    found: size,
                });
            }
        }

        // Segments are leaf-first: everything past the first entry is a
        // directory name, outermost last.
        let mut dir = self.root();
        for &segment in path.segments[1..].iter().rev() {
            dir = self.child_dir(dir, segment, path);
        }

        if self.dirs[dir.0 as usize].files.contains_key(path.file_name()) {
            return Err(InsertError::DuplicatePath);
        }

        let name = self.pool.intern(path.file_name());
        let id = FileId(self.files.len() as u32);
        self.files.push(FileEntry {
            name: Arc::clone(&name),
            hash: CompactString::from(hash),
            size,
            dir,
        });

        let node = &mut self.dirs[dir.0 as usize];
        node.files.insert(name, id);
        node.by_hash
            .entry(CompactString::from(hash))
            .or_default()
            .push(id);
        node.immediate_size += size;
        self.by_hash
            .entry(CompactString::from(hash))
            .or_default()
            .push(id);

        let mut cursor = Some(dir);
        while let Some(current) = cursor {
            let node = &mut self.dirs[current.0 as usize];
            node.total_size += size;
            cursor = node.parent;
        }

        Ok(id)
    }

    /// Full rendered path of a directory, `/`-joined from the root.
    ///
    /// Top-level directories carry the prefix of the first record that
    /// created them, so drive prefixes round-trip into reports.
    pub fn dir_path(&self, id: DirId) -> String {
        if id == self.root() {
            return String::new();
        }
        let node = self.dir(id);
        match node.parent {
            Some(parent) if parent != self.root() => {
                let mut rendered = self.dir_path(parent);
                rendered.push('/');
                rendered.push_str(&node.name);
                rendered
            }
            _ => {
                let prefix = node.prefix.as_deref().unwrap_or("/");
                format!("{prefix}{}", node.name)
            }
        }
    }

    fn child_dir(&mut self, parent: DirId, name: &str, path: &SplitPath<'_>) -> DirId {
        if let Some(&existing) = self.dirs[parent.0 as usize].children.get(name) {
            return existing;
        }

        let interned = self.pool.intern(name);
        let id = DirId(self.dirs.len() as u32);
        let mut node = DirNode::new(Arc::clone(&interned), Some(parent));
        if parent == self.root() {
            node.prefix = Some(CompactString::from(path.prefix()));
        }
        self.dirs.push(node);
        self.dirs[parent.0 as usize].children.insert(interned, id);
        id
    }
}

impl Default for DirTree {
    fn default() -> Self {
        Self::new()
    }
}
