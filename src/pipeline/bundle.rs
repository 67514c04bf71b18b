//! Bundling stage.
//!
//! Hands the unbundled declaration file and the synthesized umbrella module
//! to the declaration bundler. The request routes every module under the
//! umbrella prefix into a single group named after the target's public root
//! module; the target's external-library and redistribution options pass
//! through unchanged.

use std::collections::BTreeMap;
use std::path::Path;

use crate::pipeline::discovery::UMBRELLA_MODULE;
use crate::pipeline::error::Result;
use crate::pipeline::settings::OutputTarget;
use crate::services::bundler::{BundleRequest, BundledGroup, DeclarationBundler, GroupSpec};

/// Bundles the emitted declarations behind the umbrella module.
///
/// # Errors
///
/// Propagates bundler failures; the caller is responsible for sweeping the
/// intermediates that already exist at this point.
pub async fn bundle_declarations<B: DeclarationBundler>(
    bundler: &B,
    declaration_file: &Path,
    virtual_module_file: &Path,
    out_dir: &Path,
    target: &OutputTarget,
) -> Result<Vec<BundledGroup>> {
    log::info!("Bundling...");
    let request = BundleRequest {
        input: vec![
            declaration_file.to_path_buf(),
            virtual_module_file.to_path_buf(),
        ],
        entries: BTreeMap::from([(UMBRELLA_MODULE.to_string(), UMBRELLA_MODULE.to_string())]),
        groups: vec![GroupSpec {
            test: format!("^{UMBRELLA_MODULE}.*$"),
            path: out_dir.join(format!("{}.d.ts", target.root_module_name)),
        }],
        non_exported_external_libs: target.non_exported_external_libs.clone(),
        non_exported_symbol_distribution: target.symbol_redistribution.clone(),
    };
    bundler.bundle(&request).await
}
