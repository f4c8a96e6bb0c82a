// Class name handling
//
// The shrinker engine reports classes in its internal slash form, optionally
// wrapped as a type descriptor (`Lcom/foo/Bar;`). Everything else in this
// tool — keep rules, the usage log, the packaging pipeline — speaks the
// external dotted form (`com.foo.Bar`). Both directions are pure string
// rewrites with no validation: an ill-formed name maps to an ill-formed name.

use std::path::{Path, PathBuf};

/// Convert an internal class name to its external dotted form.
///
/// A descriptor wrapper is stripped only when the leading `L` and trailing
/// `;` are both present, so a plain name like `LinkedList` keeps its first
/// letter.
pub fn external_name(internal: &str) -> String {
    let stripped = match internal.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
        Some(inner) => inner,
        None => internal,
    };
    stripped.replace('/', ".")
}

/// Convert an external dotted class name to the internal slash form.
pub fn internal_name(external: &str) -> String {
    external.replace('.', "/")
}

/// Maps external class names to their on-disk location under a fixed
/// temporary output root.
///
/// The layout mirrors package names as directories, so no two distinct
/// class names share a target path.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The fixed output root this layout writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the processed bytes of `external` are written.
    ///
    /// `com.foo.Bar` becomes `<root>/com/foo/Bar.class`.
    pub fn class_file(&self, external: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in external.split('.') {
            path.push(segment);
        }
        path.set_extension("class");
        path
    }
}
