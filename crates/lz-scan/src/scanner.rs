//! The declaration scanner.
//!
//! Walks a directory tree depth-first, reading every declaration file it
//! meets. Symlinks are followed: a link to a directory is walked like a
//! directory, but each real directory is visited at most once per scan, so
//! link cycles terminate. Within a directory, subdirectories are visited in
//! file-name order, which makes finding order reproducible.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use lz_core::{OfferKey, SchemaRegistry};

use crate::error::{Result, ScanError};
use crate::finding::Finding;
use crate::probe::{identify, NpmProbe, PackageProbe};

/// File name of a project's declaration.
pub const DECLARATION_FILE: &str = "licensezero.json";

/// Finds declarations under a root directory.
pub struct Scanner {
    registry: Arc<SchemaRegistry>,
    declaration_file: String,
    probes: Vec<Box<dyn PackageProbe>>,
}

impl Scanner {
    /// A scanner for `licensezero.json` with the npm probe.
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            declaration_file: DECLARATION_FILE.to_string(),
            probes: vec![Box::new(NpmProbe)],
        }
    }

    /// Look for a different declaration file name.
    pub fn with_declaration_file(mut self, name: impl Into<String>) -> Self {
        self.declaration_file = name.into();
        self
    }

    /// Append a probe; it is tried after the ones already present.
    pub fn with_probe(mut self, probe: impl PackageProbe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    /// Drop all probes, including the default one.
    pub fn without_probes(mut self) -> Self {
        self.probes.clear();
        self
    }

    pub fn declaration_file(&self) -> &str {
        &self.declaration_file
    }

    /// Scan `root`.
    ///
    /// Returns one finding per distinct `(api, offerID)`, keeping the first
    /// one encountered. A missing root yields no findings.
    pub fn scan(&self, root: &Path) -> Result<Vec<Finding>> {
        match fs::metadata(root) {
            Ok(meta) if !meta.is_dir() => {
                return Err(ScanError::NotADirectory(root.to_path_buf()))
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "scan root missing");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: root.to_path_buf(),
                    source,
                })
            }
        }

        let mut walk = Walk::default();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let real = match fs::canonicalize(&dir) {
                Ok(real) => real,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => return Err(ScanError::Io { path: dir, source }),
            };
            if !walk.visited.insert(real) {
                debug!(path = %dir.display(), "already visited");
                continue;
            }

            self.read_declaration(&dir, &mut walk)?;

            let mut children = subdirectories(&dir)?;
            // Reversed so the smallest name is popped first.
            children.reverse();
            pending.extend(children);
        }

        Ok(walk.findings)
    }

    /// Emit findings for the declaration in `dir`, if there is one.
    fn read_declaration(&self, dir: &Path, walk: &mut Walk) -> Result<()> {
        let path = dir.join(&self.declaration_file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(ScanError::Io { path, source }),
        };

        let declaration = self
            .registry
            .parse_artifact_bytes(&bytes)
            .map_err(|source| ScanError::Declaration {
                path: path.clone(),
                source,
            })?
            .into_inner();

        debug!(
            path = %path.display(),
            offers = declaration.offers.len(),
            "read declaration"
        );

        let mut package = None;
        let mut probed = false;
        for offer in declaration.offers {
            let key = offer.key();
            if !walk.seen.insert(key.clone()) {
                debug!(offer = %key, path = %dir.display(), "duplicate offer reference");
                continue;
            }
            if !probed {
                package = identify(&self.probes, dir);
                probed = true;
            }
            walk.findings.push(Finding {
                path: dir.to_path_buf(),
                package: package.clone(),
                public: offer.public,
                api: offer.api,
                offer_id: offer.offer_id,
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("declaration_file", &self.declaration_file)
            .field(
                "probes",
                &self.probes.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[derive(Default)]
struct Walk {
    visited: HashSet<PathBuf>,
    seen: HashSet<OfferKey>,
    findings: Vec<Finding>,
}

/// Directories directly under `dir`, symlinks to directories included,
/// sorted by name.
fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ScanError::Io { path, source }
    };

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err(dir))? {
        let entry = entry.map_err(io_err(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_err(&path))?;

        let is_dir = if file_type.is_symlink() {
            // Relative targets resolve against the link's own directory.
            match fs::metadata(&path) {
                Ok(meta) => meta.is_dir(),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "dangling symlink");
                    false
                }
                Err(source) => return Err(ScanError::Io { path, source }),
            }
        } else {
            file_type.is_dir()
        };

        if is_dir {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
