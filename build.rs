use std::error::Error;
use vergen::EmitBuilder;

// Emits VERGEN_GIT_DESCRIBE for the version string; falls back to "unknown"
// outside a git checkout.
fn main() -> Result<(), Box<dyn Error>> {
    if EmitBuilder::builder()
        .fail_on_error()
        .all_git()
        .git_describe(true, false, None)
        .emit()
        .is_err()
    {
        println!("cargo:rustc-env=VERGEN_GIT_DESCRIBE=unknown");
    }
    Ok(())
}
