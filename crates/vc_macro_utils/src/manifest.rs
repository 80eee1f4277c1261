use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

/// Locate an accessible [`syn::Path`] for another crate as seen from the
/// caller's Cargo.toml.
///
/// This helper is intended for proc-macro code generation where the emitted
/// path must be valid from the invoking crate.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let p: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_record"));
/// ```
///
/// Reading the manifest is not cheap. Call this once per proc-macro
/// invocation and pass the result around.
///
/// # Resolution rules
///
/// 1. If the requested crate is listed in `dependencies`, return `::crate_name`.
/// 2. If it is listed under another key through `package = "crate_name"`,
///    return `::key`.
/// 3. If the requested crate name begins with `vc_` and the caller depends on
///    the facade crate `vc_pdx`, return `::vc_pdx::short_name`
///    (e.g. `vc_record` -> `::vc_pdx::record`).
/// 4. Repeat steps 1-3 in `dev-dependencies`.
/// 5. Otherwise, fall back to the absolute path `::crate_name`.
///
/// ## Note
///
/// A crate that derives its own traits sees none of the above and gets
/// `::crate_name`; `extern crate self as crate_name;` in its root makes that
/// path valid.
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_pdx";
const PREFIX: &str = "vc_";

impl Manifest {
    // Try get `Cargo.toml` path.
    #[inline(never)]
    fn get_manifest_path() -> PathBuf {
        env::var_os("CARGO_MANIFEST_DIR")
            .map(|path| {
                let mut path = PathBuf::from(path);
                path.push("Cargo.toml");
                assert!(
                    path.exists(),
                    "Cargo manifest does not exist at path {}",
                    path.display(),
                );
                path
            })
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.")
    }

    // Try get `Cargo.toml` modified time.
    #[inline(never)]
    fn get_manifest_modified_time(
        cargo_manifest_path: &Path,
    ) -> Result<SystemTime, std::io::Error> {
        std::fs::metadata(cargo_manifest_path).and_then(|metadata| metadata.modified())
    }

    #[inline(never)]
    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let manifest = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(manifest)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    #[inline]
    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid crate path"))
    }

    /// Key under which `name` is listed, following `package = "..."` renames.
    fn dependency_key<'t>(deps: &'t Table, name: &str) -> Option<&'t str> {
        if deps.contains_key(name) {
            return deps.get_key_value(name).map(|(key, _)| key.get());
        }
        deps.iter().find_map(|(key, item)| {
            let package = item.get("package")?.as_str()?;
            (package == name).then_some(key)
        })
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if let Some(key) = Self::dependency_key(deps, name) {
            return Some(Self::parse_path(&format!("::{key}")));
        }

        let module = name.strip_prefix(PREFIX)?;
        let facade = Self::dependency_key(deps, FACADE_NAME)?;
        Some(Self::parse_path(&format!("::{facade}::{module}")))
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from this
    /// crate's Cargo.toml. See the top-level documentation for the resolution
    /// order and examples.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        ["dependencies", "dev-dependencies"]
            .into_iter()
            .find_map(|section| match self.manifest.get(section) {
                Some(Item::Table(deps)) => Self::find_in_deps(deps, name),
                _ => None,
            })
            .unwrap_or_else(|| Self::parse_path(&format!("::{name}")))
    }

    /// Obtain the [Manifest] of the caller's Cargo.toml.
    ///
    /// This function reads and caches the caller's `Cargo.toml`, keyed by
    /// path and invalidated when the file's modified time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let manifest_path = Self::get_manifest_path();
        let modified_time = Self::get_manifest_modified_time(&manifest_path)
            .expect("The Cargo.toml should have a modified time.");

        let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);

        if let Some(manifest) = manifests.get(&manifest_path)
            && manifest.modified_time == modified_time
        {
            return func(manifest);
        }

        drop(manifests);

        let manifest = Manifest {
            manifest: Self::read_manifest(&manifest_path),
            modified_time,
        };

        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest_path, manifest);

        result
    }
}
